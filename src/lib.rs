#[macro_use]
extern crate rust_i18n;

// Load all translations from the locales directory
i18n!("locales", fallback = "pt-BR");

pub mod broker;
pub mod currency;
pub mod db;
pub mod server;
pub mod services;
pub mod version;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;
