use serde_json::{json, Value};
use uuid::Uuid;

mod common;
use common::club_helpers::{create_match, create_player, create_team, get_json, put_json};
use common::utils::{create_staff_user_and_login, spawn_app, TestApp};

struct Fixture {
    token: String,
    match_id: Uuid,
    lucia: Uuid,
    marta: Uuid,
}

async fn fixture(app: &TestApp) -> Fixture {
    let staff = create_staff_user_and_login(app).await;
    let home = create_team(&app.address, &staff.token, "Furia").await;
    let away = create_team(&app.address, &staff.token, "Rivales").await;
    let lucia = create_player(&app.address, &staff.token, home, "Lucia").await;
    let marta = create_player(&app.address, &staff.token, home, "Marta").await;
    let match_id = create_match(&app.address, &staff.token, home, away, None, Some((2, 1))).await;
    Fixture { token: staff.token, match_id, lucia, marta }
}

async fn save(app: &TestApp, f: &Fixture, body: Value) -> Value {
    let response = put_json(
        &app.address,
        &f.token,
        &format!("/admin/matches/{}/statistics", f.match_id),
        body,
    )
    .await;
    assert_eq!(200, response.status().as_u16());
    response.json().await.unwrap()
}

async fn cards(app: &TestApp, f: &Fixture) -> Vec<Value> {
    let body = get_json(&app.address, &format!("/matches/{}/cards", f.match_id)).await;
    body["data"].as_array().cloned().unwrap_or_default()
}

fn active<'a>(cards: &'a [Value], player_id: Uuid, kind: &str) -> Vec<&'a Value> {
    cards
        .iter()
        .filter(|c| c["player_id"] == json!(player_id) && c["kind"] == kind && c["voided"] == false)
        .collect()
}

#[tokio::test]
async fn booking_a_player_issues_a_yellow_and_unbooking_voids_it() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    let body = save(&app, &f, json!({"goals": 2, "scorers": [f.lucia], "booked": [f.lucia]})).await;
    assert_eq!(body["data"]["statistics"]["goals"], 2);
    assert_eq!(body["data"]["card_sync"]["issued"].as_array().unwrap().len(), 1);
    assert!(body["data"]["card_sync"]["failures"].as_array().unwrap().is_empty());

    let all = cards(&app, &f).await;
    assert_eq!(active(&all, f.lucia, "yellow").len(), 1);

    // Saving the same sets again changes nothing
    let body = save(&app, &f, json!({"goals": 2, "scorers": [f.lucia], "booked": [f.lucia]})).await;
    assert!(body["data"]["card_sync"]["issued"].as_array().unwrap().is_empty());
    assert_eq!(active(&cards(&app, &f).await, f.lucia, "yellow").len(), 1);

    let body = save(&app, &f, json!({"goals": 2, "scorers": [f.lucia], "booked": []})).await;
    assert_eq!(body["data"]["card_sync"]["voided"].as_array().unwrap().len(), 1);

    let all = cards(&app, &f).await;
    assert_eq!(all.len(), 1, "voided cards are kept");
    assert_eq!(all[0]["voided"], true);
    assert!(active(&all, f.lucia, "yellow").is_empty());
}

#[tokio::test]
async fn sending_off_issues_a_red() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    save(&app, &f, json!({"sent_off": [f.marta]})).await;

    let all = cards(&app, &f).await;
    assert_eq!(active(&all, f.marta, "red").len(), 1);
    assert!(active(&all, f.lucia, "red").is_empty());

    let overview = get_json(&app.address, &format!("/matches/{}/player_stats", f.match_id)).await;
    let marta = overview["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|line| line["player_id"] == json!(f.marta))
        .cloned()
        .expect("stat line for sent-off player");
    assert_eq!(marta["red_cards"], 1);
}

#[tokio::test]
async fn clearing_a_relation_voids_its_cards() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    save(&app, &f, json!({"booked": [f.lucia, f.marta]})).await;
    assert_eq!(cards(&app, &f).await.len(), 2);

    let client = reqwest::Client::new();
    let response = client
        .delete(&format!("{}/admin/matches/{}/statistics/booked", &app.address, f.match_id))
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["data"]["statistics"]["booked"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["card_sync"]["voided"].as_array().unwrap().len(), 2);

    let all = cards(&app, &f).await;
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|c| c["voided"] == true));
}

#[tokio::test]
async fn unknown_relation_is_rejected() {
    let app = spawn_app().await;
    let f = fixture(&app).await;
    save(&app, &f, json!({"booked": [f.lucia]})).await;

    let response = reqwest::Client::new()
        .delete(&format!("{}/admin/matches/{}/statistics/fouls", &app.address, f.match_id))
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn statistics_for_unknown_match_is_not_found() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    let response = put_json(
        &app.address,
        &f.token,
        &format!("/admin/matches/{}/statistics", Uuid::new_v4()),
        json!({"booked": [f.lucia]}),
    )
    .await;
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn duplicate_members_are_rejected() {
    let app = spawn_app().await;
    let f = fixture(&app).await;

    let response = put_json(
        &app.address,
        &f.token,
        &format!("/admin/matches/{}/statistics", f.match_id),
        json!({"scorers": [f.lucia, f.lucia]}),
    )
    .await;
    assert_eq!(400, response.status().as_u16());
}
