use reqwest::Client;
use serde_json::json;

mod common;
use common::utils::{create_test_user_and_login, login, random_national_id, spawn_app, TEST_PASSWORD};

#[tokio::test]
async fn register_creates_a_player_on_the_default_team() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/register_user", &test_app.address))
        .json(&json!({
            "username": "marta",
            "email": "marta@example.com",
            "password": TEST_PASSWORD,
            "first_name": "Marta",
            "last_name": "Rojas",
            "national_id": random_national_id(),
            "birth_date": "2000-05-17"
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);

    let (team_name, first_name, age): (String, String, Option<i16>) = sqlx::query_as(
        r#"
        SELECT t.name, p.first_name, p.age
        FROM players p
        JOIN users u ON u.id = p.user_id
        JOIN teams t ON t.id = p.team_id
        WHERE u.username = 'marta'
        "#,
    )
    .fetch_one(&test_app.db_pool)
    .await
    .expect("Failed to fetch the registered player");

    assert_eq!(team_name, "Furia Nocturna FC");
    assert_eq!(first_name, "Marta");
    assert!(age.is_some());
}

#[tokio::test]
async fn register_rejects_a_taken_username() {
    let test_app = spawn_app().await;
    let user = create_test_user_and_login(&test_app.address).await;

    let response = Client::new()
        .post(&format!("{}/register_user", &test_app.address))
        .json(&json!({
            "username": user.username,
            "email": "someone-else@example.com",
            "password": TEST_PASSWORD,
            "first_name": "Other",
            "last_name": "Person",
            "national_id": random_national_id()
        }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(409, response.status().as_u16());
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let cases = vec![
        (json!({"username": "a", "email": "not-an-email", "password": TEST_PASSWORD,
                "first_name": "A", "last_name": "B", "national_id": "1234"}), "bad email"),
        (json!({"username": "b", "email": "b@example.com", "password": "short",
                "first_name": "A", "last_name": "B", "national_id": "1234"}), "short password"),
        (json!({"username": "c", "email": "c@example.com", "password": TEST_PASSWORD,
                "first_name": "A", "last_name": "B", "national_id": "123456789"}), "long national id"),
    ];

    for (body, case) in cases {
        let response = client
            .post(&format!("{}/register_user", &test_app.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(400, response.status().as_u16(), "case: {}", case);
    }
}

#[tokio::test]
async fn login_returns_token_and_player_id() {
    let test_app = spawn_app().await;
    let user = create_test_user_and_login(&test_app.address).await;

    assert!(!user.token.is_empty());
    assert!(user.player_id.is_some());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let test_app = spawn_app().await;
    let user = create_test_user_and_login(&test_app.address).await;

    let response = login(&test_app.address, &user.username, "wrong-password").await;
    assert_eq!(401, response.status().as_u16());

    let response = login(&test_app.address, "nobody-here", TEST_PASSWORD).await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn staff_routes_reject_players_and_anonymous_callers() {
    let test_app = spawn_app().await;
    let user = create_test_user_and_login(&test_app.address).await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/admin/teams", &test_app.address))
        .json(&json!({"name": "Rivals"}))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());

    let response = client
        .post(&format!("{}/admin/teams", &test_app.address))
        .bearer_auth(&user.token)
        .json(&json!({"name": "Rivals"}))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(403, response.status().as_u16());
}
