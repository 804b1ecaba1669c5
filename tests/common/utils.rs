use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::{PgPool, PgConnection, Connection, Executor};
use std::net::TcpListener;
use uuid::Uuid;
use once_cell::sync::Lazy;
use reqwest::Client;

use clubhouse_backend::run;
use clubhouse_backend::config::settings::{get_config, DatabaseSettings, get_jwt_settings};
use clubhouse_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub const TEST_PASSWORD: &str = "password123";

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

pub struct UserRegLoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub player_id: Option<Uuid>,
    pub username: String,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    configuration.database.db_url = None;
    let connection_pool = configure_db(&configuration.database)
        .await;
    let jwt_settings = get_jwt_settings(&configuration);
    let server = run(
        listener,
        connection_pool.clone(),
        jwt_settings,
        configuration.club,
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);
    TestApp {
        address,
        db_pool: connection_pool
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(
            &config.connection_string_without_db()
        )
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Eight alphanumeric characters, unique enough for one test database.
pub fn random_national_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub async fn login(app_address: &str, username: &str, password: &str) -> reqwest::Response {
    Client::new()
        .post(&format!("{}/login", app_address))
        .json(&json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to execute login request.")
}

/// Register a player account and log in with it.
pub async fn create_test_user_and_login(app_address: &str) -> UserRegLoginResponse {
    let client = Client::new();
    let username = format!("player{}", Uuid::new_v4().simple());
    let email = format!("{}@example.com", username);

    let register_response = client
        .post(&format!("{}/register_user", app_address))
        .json(&json!({
            "username": username,
            "email": email,
            "password": TEST_PASSWORD,
            "first_name": "Test",
            "last_name": "Player",
            "national_id": random_national_id()
        }))
        .send()
        .await
        .expect("Failed to register user.");
    assert_eq!(200, register_response.status().as_u16());

    let login_response = login(app_address, &username, TEST_PASSWORD).await;
    assert_eq!(200, login_response.status().as_u16());

    let body: serde_json::Value = login_response.json().await.expect("Failed to parse login response");
    UserRegLoginResponse {
        token: body["token"].as_str().expect("No token in response").to_string(),
        user_id: body["user_id"].as_str().and_then(|s| Uuid::parse_str(s).ok()).expect("No user id in response"),
        player_id: body["player_id"].as_str().and_then(|s| Uuid::parse_str(s).ok()),
        username,
    }
}

/// Register an account, promote it to staff directly in the database and log in again.
pub async fn create_staff_user_and_login(app: &TestApp) -> UserRegLoginResponse {
    let user = create_test_user_and_login(&app.address).await;

    sqlx::query("UPDATE users SET role = 'staff' WHERE username = $1")
        .bind(&user.username)
        .execute(&app.db_pool)
        .await
        .expect("Failed to promote user to staff");

    let login_response = login(&app.address, &user.username, TEST_PASSWORD).await;
    assert_eq!(200, login_response.status().as_u16());
    let body: serde_json::Value = login_response.json().await.expect("Failed to parse login response");

    UserRegLoginResponse {
        token: body["token"].as_str().expect("No token in response").to_string(),
        ..user
    }
}
