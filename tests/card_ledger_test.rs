use serde_json::{json, Value};
use uuid::Uuid;

mod common;
use common::club_helpers::{create_match, create_player, create_team, get_json, post_json};
use common::utils::{create_staff_user_and_login, create_test_user_and_login, spawn_app, TestApp};

struct Fixture {
    token: String,
    match_id: Uuid,
    player_id: Uuid,
}

async fn fixture(app: &TestApp) -> Fixture {
    let staff = create_staff_user_and_login(app).await;
    let home = create_team(&app.address, &staff.token, "Furia").await;
    let away = create_team(&app.address, &staff.token, "Rivales").await;
    let player_id = create_player(&app.address, &staff.token, home, "Lucia").await;
    let match_id = create_match(&app.address, &staff.token, home, away, None, None).await;
    Fixture { token: staff.token, match_id, player_id }
}

async fn issue(app: &TestApp, f: &Fixture, kind: &str, minute: Option<i32>) -> reqwest::Response {
    post_json(
        &app.address,
        &f.token,
        "/admin/cards",
        json!({
            "match_id": f.match_id,
            "player_id": f.player_id,
            "kind": kind,
            "minute": minute
        }),
    )
    .await
}

async fn counts(app: &TestApp, f: &Fixture) -> (u64, u64) {
    let body = get_json(&app.address, &format!("/matches/{}/cards/counts", f.match_id)).await;
    let row = body["data"]
        .as_array()
        .and_then(|rows| rows.iter().find(|r| r["player_id"] == json!(f.player_id)))
        .cloned()
        .unwrap_or(json!({"yellow": 0, "red": 0}));
    (row["yellow"].as_u64().unwrap_or(0), row["red"].as_u64().unwrap_or(0))
}

#[tokio::test]
async fn second_yellow_sends_the_player_off() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    let response = issue(&app, &f, "yellow", Some(10)).await;
    assert_eq!(201, response.status().as_u16());
    assert_eq!(counts(&app, &f).await, (1, 0));

    let response = issue(&app, &f, "yellow", Some(50)).await;
    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["kind"], "yellow");
    assert_eq!(counts(&app, &f).await, (2, 1));

    let cards = get_json(&app.address, &format!("/matches/{}/cards", f.match_id)).await;
    let red = cards["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["kind"] == "red")
        .cloned()
        .expect("automatic red card");
    assert_eq!(red["minute"], 50);

    let response = issue(&app, &f, "yellow", Some(70)).await;
    assert_eq!(422, response.status().as_u16());
    assert_eq!(counts(&app, &f).await, (2, 1));
}

#[tokio::test]
async fn second_red_is_a_conflict() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    assert_eq!(201, issue(&app, &f, "red", Some(30)).await.status().as_u16());
    assert_eq!(409, issue(&app, &f, "red", Some(31)).await.status().as_u16());
    assert_eq!(counts(&app, &f).await, (0, 1));
}

#[tokio::test]
async fn voided_cards_stay_stored_but_stop_counting() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    let body: Value = issue(&app, &f, "yellow", Some(12)).await.json().await.unwrap();
    let card_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = post_json(
        &app.address,
        &f.token,
        &format!("/admin/cards/{}/void", card_id),
        json!({"reason": "Wrong player"}),
    )
    .await;
    assert_eq!(200, response.status().as_u16());
    assert_eq!(counts(&app, &f).await, (0, 0));

    let card = get_json(&app.address, &format!("/cards/{}", card_id)).await;
    assert_eq!(card["data"]["voided"], true);
    assert_eq!(card["data"]["void_reason"], "Wrong player");

    let response = post_json(
        &app.address,
        &f.token,
        &format!("/admin/cards/{}/void", card_id),
        json!({"reason": "Again"}),
    )
    .await;
    assert_eq!(409, response.status().as_u16());

    let history = get_json(&app.address, &format!("/players/{}/cards", f.player_id)).await;
    assert_eq!(history["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn void_requires_a_reason() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    let body: Value = issue(&app, &f, "red", None).await.json().await.unwrap();
    let card_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = post_json(
        &app.address,
        &f.token,
        &format!("/admin/cards/{}/void", card_id),
        json!({"reason": "   "}),
    )
    .await;
    assert_eq!(422, response.status().as_u16());
}

#[tokio::test]
async fn unknown_match_or_player_is_not_found() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    let response = post_json(
        &app.address,
        &f.token,
        "/admin/cards",
        json!({"match_id": Uuid::new_v4(), "player_id": f.player_id, "kind": "yellow"}),
    )
    .await;
    assert_eq!(404, response.status().as_u16());

    let response = post_json(
        &app.address,
        &f.token,
        "/admin/cards",
        json!({"match_id": f.match_id, "player_id": Uuid::new_v4(), "kind": "yellow"}),
    )
    .await;
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn concurrent_yellows_never_exceed_the_limit() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    let mut handles = Vec::new();
    for minute in 0..6 {
        let address = app.address.clone();
        let token = f.token.clone();
        let body = json!({
            "match_id": f.match_id,
            "player_id": f.player_id,
            "kind": "yellow",
            "minute": minute * 10
        });
        handles.push(tokio::spawn(async move {
            post_json(&address, &token, "/admin/cards", body).await.status().as_u16()
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        if status == 201 {
            accepted += 1;
        } else {
            assert_eq!(422, status);
        }
    }

    assert_eq!(accepted, 2);
    assert_eq!(counts(&app, &f).await, (2, 1));
}

#[tokio::test]
async fn players_cannot_issue_cards() {
    let app = spawn_app().await;
    let f = fixture(&app).await;
    let player = create_test_user_and_login(&app.address).await;

    let response = post_json(
        &app.address,
        &player.token,
        "/admin/cards",
        json!({"match_id": f.match_id, "player_id": f.player_id, "kind": "yellow"}),
    )
    .await;
    assert_eq!(403, response.status().as_u16());
}
