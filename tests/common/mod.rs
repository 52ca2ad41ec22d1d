use std::net::SocketAddr;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use notifications::auth::identity;
use notifications::config::Config;

pub const PATH_PREFIX: &str = "/r/insights/platform";
pub const APP_NAME: &str = "notifications";
/// Account allowed to change apps, event types and levels.
pub const ADMIN_ACCOUNT: &str = "0001";

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

/// Base64 identity header for the given account and user.
pub fn identity_header(account_number: &str, username: &str) -> String {
    identity::encode(&json!({
        "identity": {
            "account_number": account_number,
            "type": "User",
            "user": {
                "email": username,
                "username": username,
                "first_name": "a",
                "last_name": "b",
                "is_active": true,
                "locale": "en_US"
            },
            "internal": { "org_id": "29329" }
        }
    }))
}

/// The identity used by most tests.
pub fn default_identity() -> String {
    identity_header("1234", "a@b.com")
}

pub fn admin_identity() -> String {
    identity_header(ADMIN_ACCOUNT, "catalog-admin")
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// URL of a resource route under the configured prefix.
    pub fn api(&self, path: &str) -> String {
        self.url(&format!("{PATH_PREFIX}/{APP_NAME}{path}"))
    }

    async fn send(&self, req: RequestBuilder) -> (Value, StatusCode) {
        let resp = req.send().await.expect("request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// GET a resource route with the given identity header.
    pub async fn get_as(&self, path: &str, identity: &str) -> (Value, StatusCode) {
        self.send(self.client.get(self.api(path)).header("x-rh-identity", identity))
            .await
    }

    /// POST a JSON body to a resource route with the given identity header.
    pub async fn post_as(&self, path: &str, identity: &str, body: &Value) -> (Value, StatusCode) {
        self.send(
            self.client
                .post(self.api(path))
                .header("x-rh-identity", identity)
                .json(body),
        )
        .await
    }

    /// PUT a JSON body to a resource route with the given identity header.
    pub async fn put_as(&self, path: &str, identity: &str, body: &Value) -> (Value, StatusCode) {
        self.send(
            self.client
                .put(self.api(path))
                .header("x-rh-identity", identity)
                .json(body),
        )
        .await
    }

    /// DELETE a resource route with the given identity header.
    pub async fn delete_as(&self, path: &str, identity: &str) -> (Value, StatusCode) {
        self.send(self.client.delete(self.api(path)).header("x-rh-identity", identity))
            .await
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        self.get_as(path, &default_identity()).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        self.post_as(path, &default_identity(), body).await
    }

    pub async fn delete(&self, path: &str) -> (Value, StatusCode) {
        self.delete_as(path, &default_identity()).await
    }

    pub async fn post_admin(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        self.post_as(path, &admin_identity(), body).await
    }

    pub async fn delete_admin(&self, path: &str) -> (Value, StatusCode) {
        self.delete_as(path, &admin_identity()).await
    }

    /// Create a level, return its id.
    pub async fn create_level(&self, title: &str) -> i64 {
        let (body, status) = self
            .post_admin("/levels", &json!({ "level": { "title": title } }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create level failed: {body}");
        id_of(&body["data"])
    }

    /// Create an app with two event types, each carrying its own level.
    /// Returns (app id, event type ids, level ids).
    pub async fn create_app_with_event_types(&self, name: &str) -> (i64, Vec<i64>, Vec<i64>) {
        let (body, status) = self.post_admin("/apps", &json!({ "app": { "name": name } })).await;
        assert_eq!(status, StatusCode::CREATED, "create app failed: {body}");
        let app_id = id_of(&body["data"]);

        let mut event_type_ids = Vec::new();
        let mut level_ids = Vec::new();
        for suffix in ["something", "something-else"] {
            let level_id = self.create_level(&format!("{name}-{suffix}-critical")).await;
            let (body, status) = self
                .post_admin(
                    &format!("/apps/{app_id}/event_types"),
                    &json!({ "event_type": { "name": suffix, "level_ids": [level_id] } }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "create event type failed: {body}");
            event_type_ids.push(id_of(&body["data"]));
            level_ids.push(level_id);
        }

        (app_id, event_type_ids, level_ids)
    }

    /// Create an endpoint for the given identity, return its id.
    pub async fn create_endpoint_as(&self, identity: &str, name: &str) -> i64 {
        let (body, status) = self
            .post_as(
                "/endpoints",
                identity,
                &json!({ "endpoint": { "name": name, "url": "http://dev.null", "active": true } }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create endpoint failed: {body}");
        id_of(&body["data"])
    }

    pub async fn create_endpoint(&self, name: &str) -> i64 {
        self.create_endpoint_as(&default_identity(), name).await
    }

    pub async fn account_id(&self, account_number: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT id FROM accounts WHERE account_number = $1")
            .bind(account_number)
            .fetch_one(&self.pool)
            .await
            .expect("account should exist")
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }
}

/// JSON:API ids are strings.
pub fn id_of(resource: &Value) -> i64 {
    resource["id"]
        .as_str()
        .expect("resource id should be a string")
        .parse()
        .expect("resource id should be numeric")
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!("notifications_test_{}", Uuid::now_v7().to_string().replace('-', ""));

    // Connect to default postgres DB to create test DB
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    // Connect to test DB and run migrations
    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        path_prefix: PATH_PREFIX.to_string(),
        app_name: APP_NAME.to_string(),
        max_body_size: 1_048_576,
        db_max_connections: 10,
        log_level: "warn".to_string(),
        catalog_admins: vec![ADMIN_ACCOUNT.to_string()],
    };

    let app = notifications::build_app(pool.clone(), config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder().build().unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
