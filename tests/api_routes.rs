//! Drives the HTTP router end to end against an in-memory database and a
//! scripted broker.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use auto_roleta::broker::{BrokerApi, BrokerAuthentication, BrokerError};
use auto_roleta::db::entities::user;
use auto_roleta::db::migration::Migrator;
use auto_roleta::db::services as db_services;
use auto_roleta::server::config::ServerConfig;
use auto_roleta::services::encryption_service::EncryptionService;
use auto_roleta::web::create_axum_router;

const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
const BROKER_EMAIL: &str = "player@pixstrike.com";
const BROKER_PASSWORD: &str = "broker-pass";

struct FakeBroker {
    balance: f64,
    delay: Duration,
    calls: AtomicUsize,
}

#[async_trait]
impl BrokerApi for FakeBroker {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<BrokerAuthentication, BrokerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if email == BROKER_EMAIL && password == BROKER_PASSWORD {
            Ok(BrokerAuthentication {
                success: true,
                balance: self.balance,
            })
        } else {
            Ok(BrokerAuthentication::rejected())
        }
    }
}

struct TestApp {
    router: Router,
    db: DatabaseConnection,
    broker: Arc<FakeBroker>,
}

impl TestApp {
    async fn new(broker_balance: f64) -> Self {
        Self::with_broker_delay(broker_balance, Duration::ZERO).await
    }

    async fn with_broker_delay(broker_balance: f64, delay: Duration) -> Self {
        let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let config = ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            database_url: "sqlite::memory:".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            jwt_secret: "integration-secret".to_string(),
            credentials_encryption_key: KEY_HEX.to_string(),
            broker_base_url: "http://broker.invalid".to_string(),
            broker_timeout_secs: 1,
            log_dir: "logs".to_string(),
            bcrypt_cost: 4,
        };
        let broker = Arc::new(FakeBroker {
            balance: broker_balance,
            delay,
            calls: AtomicUsize::new(0),
        });
        let router = create_axum_router(
            db.clone(),
            broker.clone(),
            Arc::new(EncryptionService::from_hex(KEY_HEX).unwrap()),
            Arc::new(config),
        );

        Self { router, db, broker }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn call(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        self.call_in(None, method, uri, token, body).await
    }

    async fn call_in(
        &self,
        language: Option<&str>,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(language) = language {
            builder = builder.header(header::ACCEPT_LANGUAGE, language);
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Registers and signs in a user, returning `(user_id, token)`.
    async fn sign_up(&self, email: &str) -> (String, String) {
        let (status, _) = self
            .call(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({"name": "Ana", "email": email, "password": "senha-forte"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self
            .call(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"email": email, "password": "senha-forte"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        (
            body["userId"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    async fn link_broker(&self, token: &str) {
        let (status, _) = self
            .call(
                "POST",
                "/api/authenticate",
                Some(token),
                Some(json!({"email": BROKER_EMAIL, "password": BROKER_PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

fn activation_body(entry: Value, gales: i32, stop_loss: Value) -> Value {
    json!({
        "strategy": "black-red-black",
        "entry": entry,
        "gales": gales,
        "stopWin": 200,
        "stopLoss": stop_loss,
    })
}

#[tokio::test]
async fn test_health_and_plans_are_public() {
    let app = TestApp::new(0.0).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = app.call("GET", "/api/plans", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let plans = body.as_array().unwrap();
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[1]["formattedPrice"], "R$ 9,90");
    assert_eq!(plans[1]["isPopular"], true);
}

#[tokio::test]
async fn test_protected_routes_require_a_session() {
    let app = TestApp::new(0.0).await;

    for (method, uri) in [
        ("POST", "/api/authenticate"),
        ("PATCH", "/api/users/some-id"),
        ("GET", "/api/users/some-id"),
        ("POST", "/api/bot/activate"),
        ("POST", "/api/bot/deactivate"),
        ("GET", "/api/auth/me"),
    ] {
        let (status, body) = app.call(method, uri, None, Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["error"], "Usuário não tem permissão!");
    }

    let (status, _) = app.call("GET", "/api/auth/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_authenticate_with_unknown_credentials() {
    let app = TestApp::new(900.0).await;
    let (user_id, token) = app.sign_up("ana@example.com").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/authenticate",
            Some(&token),
            Some(json!({"email": "someone@pixstrike.com", "password": "nope"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Não foi possível autenticar! Verifique as suas credenciais e tente novamente"
    );
    let stored = db_services::get_user_with_relations(&app.db, &user_id).await.unwrap().unwrap();
    assert!(stored.credential.is_none());
    assert_eq!(stored.user.balance, 0.0);
}

#[tokio::test]
async fn test_authenticate_links_account() {
    let app = TestApp::new(900.0).await;
    let (user_id, token) = app.sign_up("bia@example.com").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/authenticate",
            Some(&token),
            Some(json!({"email": BROKER_EMAIL, "password": BROKER_PASSWORD})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"balance": 900.0}));
    let stored = db_services::get_user_with_relations(&app.db, &user_id).await.unwrap().unwrap();
    assert_eq!(stored.user.balance, 900.0);
    assert_eq!(stored.credential.unwrap().email, BROKER_EMAIL);

    let (_, details) = app.call("GET", &format!("/api/users/{user_id}"), Some(&token), None).await;
    assert_eq!(details["credentials"]["email"], BROKER_EMAIL);
    assert!(details["credentials"].get("password").is_none());
}

#[tokio::test]
async fn test_authenticate_rejects_malformed_body() {
    let app = TestApp::new(900.0).await;
    let (_, token) = app.sign_up("caio@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/authenticate")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call("POST", "/api/authenticate", Some(&token), Some(json!({"email": "x", "password": "y"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_string());
    assert_eq!(app.broker.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_update_unknown_user_is_not_found() {
    let app = TestApp::new(0.0).await;
    let (user_id, token) = app.sign_up("davi@example.com").await;

    let (status, body) = app
        .call(
            "PATCH",
            "/api/users/00000000-0000-0000-0000-000000000000",
            Some(&token),
            Some(json!({"name": "Ghost", "bets": [{"color": "red", "time": "2024-03-01T12:00:00Z", "entry": 5, "gains": 10, "result": true}]})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Usuário não encontrado!");
    let stored = db_services::get_user_with_relations(&app.db, &user_id).await.unwrap().unwrap();
    assert!(stored.bets.is_empty());
}

#[tokio::test]
async fn test_update_appends_history_and_updates_user() {
    let app = TestApp::new(0.0).await;
    let (user_id, token) = app.sign_up("eli@example.com").await;

    let (status, body) = app
        .call(
            "PATCH",
            &format!("/api/users/{user_id}"),
            Some(&token),
            Some(json!({
                "name": "Eli",
                "balance": 1050.5,
                "status": "online",
                "bets": [
                    {"color": "red", "time": "2024-03-01T12:00:00Z", "entry": 10, "gains": 20, "result": true},
                    {"color": "black", "time": "2024-03-01T12:01:00Z", "entry": 20, "gains": 0, "result": false}
                ],
                "balanceTracks": [{"value": 1050.5, "time": "2024-03-01T12:01:00Z"}],
                "config": {"strategy": "red-red-red", "entry": "R$ 10,00", "gales": 1, "stopWin": 100, "stopLoss": 50}
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Eli");
    assert_eq!(body["balance"], 1050.5);
    assert_eq!(body["status"], "online");
    assert_eq!(body["bets"].as_array().unwrap().len(), 2);
    assert_eq!(body["balanceTracks"].as_array().unwrap().len(), 1);
    assert_eq!(body["config"]["strategy"], "red-red-red");
    assert_eq!(body["config"]["entry"], 10.0);
    assert_eq!(body["config"]["betOn"], "black");

    let (status, body) = app
        .call(
            "PATCH",
            &format!("/api/users/{user_id}"),
            Some(&token),
            Some(json!({"config": null, "bets": [{"color": "red", "time": "2024-03-01T12:02:00Z", "entry": 10, "gains": 20, "result": true}]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["config"].is_null());
    assert_eq!(body["bets"].as_array().unwrap().len(), 3);
    assert_eq!(body["name"], "Eli");
}

#[tokio::test]
async fn test_update_rejects_invalid_config() {
    let app = TestApp::new(0.0).await;
    let (user_id, token) = app.sign_up("fabi@example.com").await;

    let (status, body) = app
        .call(
            "PATCH",
            &format!("/api/users/{user_id}"),
            Some(&token),
            Some(json!({"config": {"strategy": "red-red-red", "entry": 0, "gales": 5, "stopWin": 10, "stopLoss": 10}})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["entry"].is_string());
    assert!(body["fields"]["gales"].is_string());
}

#[tokio::test]
async fn test_activation_within_balance() {
    let app = TestApp::new(1000.0).await;
    let (_, token) = app.sign_up("gabi@example.com").await;
    app.link_broker(&token).await;

    let (status, body) = app
        .call("POST", "/api/bot/activate", Some(&token), Some(activation_body(json!(100), 2, json!(500))))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActive"], true);
    assert_eq!(body["status"], "online");
    assert_eq!(body["balance"], 1000.0);
    assert_eq!(body["config"]["gales"], 2);
    assert_eq!(body["config"]["strategy"], "black-red-black");
}

#[tokio::test]
async fn test_activation_rejects_stop_loss_above_balance() {
    let app = TestApp::new(1000.0).await;
    let (user_id, token) = app.sign_up("hana@example.com").await;
    app.link_broker(&token).await;

    let (status, body) = app
        .call("POST", "/api/bot/activate", Some(&token), Some(activation_body(json!("R$ 100,00"), 2, json!("R$ 1.200,00"))))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["stopLoss"], "O stop loss deve ser menor que seu saldo.");
    assert!(body["fields"].get("entry").is_none());
    assert!(body["fields"].get("gales").is_none());

    let stored = db_services::get_user_with_relations(&app.db, &user_id).await.unwrap().unwrap();
    assert!(!stored.user.is_active);
    assert!(stored.config.is_none());
}

#[tokio::test]
async fn test_activation_without_linked_account() {
    let app = TestApp::new(1000.0).await;
    let (_, token) = app.sign_up("ivo@example.com").await;

    let (status, _) = app
        .call("POST", "/api/bot/activate", Some(&token), Some(activation_body(json!(10), 0, json!(10))))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.broker.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_deactivation_clears_config() {
    let app = TestApp::new(1000.0).await;
    let (_, token) = app.sign_up("joao@example.com").await;
    app.link_broker(&token).await;
    let (status, _) = app
        .call("POST", "/api/bot/activate", Some(&token), Some(activation_body(json!(50), 1, json!(100))))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.call("POST", "/api/bot/deactivate", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActive"], false);
    assert_eq!(body["status"], "offline");
    assert!(body["config"].is_null());
}

#[tokio::test]
async fn test_session_redirects() {
    let app = TestApp::new(0.0).await;
    let (_, token) = app.sign_up("kiko@example.com").await;

    let (status, body) = app.call("GET", "/api/session/redirect?path=/dashboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"authenticated": false, "redirect": "/accounts/login"}));

    let (_, body) = app
        .call("GET", "/api/session/redirect?path=/accounts/register", Some(&token), None)
        .await;
    assert_eq!(body, json!({"authenticated": true, "redirect": "/dashboard"}));
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::new(0.0).await;
    app.sign_up("lu@example.com").await;

    let (status, _) = app
        .call(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"name": "Lu", "email": "LU@example.com", "password": "outra-senha"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_broker_rejection_stays_portuguese_for_english_clients() {
    let app = TestApp::new(900.0).await;
    let (_, token) = app.sign_up("mia@example.com").await;

    let (status, body) = app
        .call_in(
            Some("en"),
            "POST",
            "/api/authenticate",
            Some(&token),
            Some(json!({"email": "someone@pixstrike.com", "password": "nope"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Não foi possível autenticar! Verifique as suas credenciais e tente novamente"
    );

    let (status, body) = app.call_in(Some("en"), "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "You are not allowed to do this!");
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_own_language() {
    let app = TestApp::with_broker_delay(1000.0, Duration::from_millis(200)).await;
    let (_, token) = app.sign_up("noa@example.com").await;
    app.link_broker(&token).await;

    // The activation message is rendered after the slow broker call returns,
    // while the English request has already been served.
    let portuguese = app.call(
        "POST",
        "/api/bot/activate",
        Some(&token),
        Some(activation_body(json!(100), 2, json!(1200))),
    );
    let english = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        app.call_in(Some("en"), "GET", "/api/auth/me", None, None).await
    };
    let ((pt_status, pt_body), (en_status, en_body)) = tokio::join!(portuguese, english);

    assert_eq!(pt_status, StatusCode::BAD_REQUEST);
    assert_eq!(pt_body["fields"]["stopLoss"], "O stop loss deve ser menor que seu saldo.");
    assert_eq!(pt_body["error"], "Dados inválidos");
    assert_eq!(en_status, StatusCode::UNAUTHORIZED);
    assert_eq!(en_body["error"], "You are not allowed to do this!");
}

#[tokio::test]
async fn test_stale_session_is_unauthorized() {
    let app = TestApp::new(900.0).await;
    let (user_id, token) = app.sign_up("otto@example.com").await;
    user::Entity::delete_by_id(user_id).exec(&app.db).await.unwrap();

    let (status, body) = app
        .call(
            "POST",
            "/api/authenticate",
            Some(&token),
            Some(json!({"email": BROKER_EMAIL, "password": BROKER_PASSWORD})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Usuário não tem permissão!");
    assert_eq!(app.broker.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_users_cannot_touch_other_accounts() {
    let app = TestApp::new(0.0).await;
    let (victim_id, _) = app.sign_up("pia@example.com").await;
    let (_, intruder_token) = app.sign_up("quim@example.com").await;

    let (status, _) = app
        .call(
            "PATCH",
            &format!("/api/users/{victim_id}"),
            Some(&intruder_token),
            Some(json!({"balance": 1.0, "config": null})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call("GET", &format!("/api/users/{victim_id}"), Some(&intruder_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let stored = db_services::get_user_with_relations(&app.db, &victim_id).await.unwrap().unwrap();
    assert_eq!(stored.user.balance, 0.0);
}
