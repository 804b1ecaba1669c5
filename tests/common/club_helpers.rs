use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::utils::random_national_id;

fn id_of(body: &Value) -> Uuid {
    body["data"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("No id in response data")
}

pub async fn post_json(app_address: &str, token: &str, path: &str, body: Value) -> reqwest::Response {
    Client::new()
        .post(&format!("{}{}", app_address, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.")
}

pub async fn put_json(app_address: &str, token: &str, path: &str, body: Value) -> reqwest::Response {
    Client::new()
        .put(&format!("{}{}", app_address, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.")
}

pub async fn get_json(app_address: &str, path: &str) -> Value {
    let response = Client::new()
        .get(&format!("{}{}", app_address, path))
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success(), "GET {} failed: {}", path, response.status());
    response.json().await.expect("Failed to parse response")
}

pub async fn create_team(app_address: &str, token: &str, name: &str) -> Uuid {
    let response = post_json(app_address, token, "/admin/teams", json!({ "name": name })).await;
    assert_eq!(201, response.status().as_u16());
    id_of(&response.json().await.expect("Failed to parse team"))
}

pub async fn create_player(app_address: &str, token: &str, team_id: Uuid, first_name: &str) -> Uuid {
    let response = post_json(
        app_address,
        token,
        "/admin/players",
        json!({
            "first_name": first_name,
            "last_name": "Tester",
            "national_id": random_national_id(),
            "team_id": team_id
        }),
    )
    .await;
    assert_eq!(201, response.status().as_u16());
    id_of(&response.json().await.expect("Failed to parse player"))
}

pub async fn create_tournament(app_address: &str, token: &str, team_ids: &[Uuid]) -> Uuid {
    let response = post_json(
        app_address,
        token,
        "/admin/tournaments",
        json!({
            "name": "Apertura",
            "start_date": "2025-03-01",
            "team_ids": team_ids
        }),
    )
    .await;
    assert_eq!(201, response.status().as_u16());
    id_of(&response.json().await.expect("Failed to parse tournament"))
}

pub async fn create_match(
    app_address: &str,
    token: &str,
    home_team_id: Uuid,
    away_team_id: Uuid,
    tournament_id: Option<Uuid>,
    score: Option<(i32, i32)>,
) -> Uuid {
    let response = post_json(
        app_address,
        token,
        "/admin/matches",
        json!({
            "home_team_id": home_team_id,
            "away_team_id": away_team_id,
            "match_date": "2025-03-15",
            "tournament_id": tournament_id,
            "home_score": score.map(|s| s.0),
            "away_score": score.map(|s| s.1)
        }),
    )
    .await;
    assert_eq!(201, response.status().as_u16());
    id_of(&response.json().await.expect("Failed to parse match"))
}
