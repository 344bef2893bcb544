use axum::{
    body::Body as AxumBody,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

pub const DEFAULT_LOCALE: &str = "pt-BR";

tokio::task_local! {
    static REQUEST_LOCALE: String;
}

/// First language tag of an `Accept-Language` header, without its quality.
pub fn preferred_locale(accept_language: Option<&str>) -> String {
    accept_language
        .and_then(|s| s.split(',').next())
        .and_then(|tag| tag.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "*")
        .unwrap_or(DEFAULT_LOCALE)
        .to_string()
}

/// Locale of the request being served, or the default outside of one.
pub fn current_locale() -> String {
    REQUEST_LOCALE
        .try_with(Clone::clone)
        .unwrap_or_else(|_| DEFAULT_LOCALE.to_string())
}

/// Scopes the request's locale to everything that runs while serving it,
/// including error rendering after handler awaits.
pub async fn i18n_middleware(req: Request<AxumBody>, next: Next) -> Response {
    let locale = preferred_locale(
        req.headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok()),
    );

    REQUEST_LOCALE.scope(locale, next.run(req)).await
}
