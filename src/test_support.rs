//! Shared fixtures for unit tests.

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::broker::{BrokerApi, BrokerAuthentication, BrokerError};
use crate::db::entities::user;
use crate::db::migration::Migrator;
use crate::db::services as db_services;
use crate::services::encryption_service::EncryptionService;

pub const TEST_KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// A fresh, migrated in-memory SQLite database. One connection, so every
/// query sees the same memory database.
pub async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("open sqlite memory db");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn seed_user(db: &DatabaseConnection, email: &str) -> user::Model {
    db_services::create_user(db, "Test User", email, "not-a-real-hash")
        .await
        .expect("seed user")
}

pub fn test_encryption() -> EncryptionService {
    EncryptionService::from_hex(TEST_KEY_HEX).expect("valid test key")
}

/// Broker double that accepts exactly one email/password pair.
pub struct StaticBroker {
    email: String,
    password: String,
    balance: f64,
    calls: AtomicUsize,
}

impl StaticBroker {
    pub fn accepting(email: &str, password: &str, balance: f64) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            balance,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrokerApi for StaticBroker {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<BrokerAuthentication, BrokerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if email == self.email && password == self.password {
            Ok(BrokerAuthentication {
                success: true,
                balance: self.balance,
            })
        } else {
            Ok(BrokerAuthentication::rejected())
        }
    }
}
