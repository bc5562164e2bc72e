mod common;

use axum::http::StatusCode;
use serde_json::json;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use common::TestApp;

#[tokio::test]
async fn create_room_then_duplicate_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.register("alice").await?;

    let created = app
        .post_json("/api/v1/rooms", Some(&cookie), json!({ "room": { "name": "lobby" } }))
        .await?;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(
        created.json()?,
        json!({ "status": "success", "room": { "id": 1, "name": "lobby" } })
    );

    let repeated = app
        .post_json("/api/v1/rooms", Some(&cookie), json!({ "room": { "name": "lobby" } }))
        .await?;
    assert_eq!(repeated.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        repeated.json()?,
        json!({ "status": "error", "errors": ["Name has already been taken"] })
    );
    assert_eq!(app.count("rooms").await?, 1);
    Ok(())
}

#[tokio::test]
async fn blank_room_name_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.register("alice").await?;

    let response = app
        .post_json("/api/v1/rooms", Some(&cookie), json!({ "room": { "name": "  " } }))
        .await?;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json()?["errors"], json!(["Name can't be blank"]));
    assert_eq!(app.count("rooms").await?, 0);
    Ok(())
}

#[tokio::test]
async fn malformed_room_request_is_unprocessable() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.register("alice").await?;

    for body in [json!({ "name": "lobby" }), json!({ "room": { "name": "lobby", "admin": true } })] {
        let response = app.post_json("/api/v1/rooms", Some(&cookie), body).await?;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json()?["status"], "error");
    }
    assert_eq!(app.count("rooms").await?, 0);
    Ok(())
}

#[tokio::test]
async fn room_api_requires_session_except_listing() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.register("alice").await?;
    app.post_json("/api/v1/rooms", Some(&cookie), json!({ "room": { "name": "lobby" } }))
        .await?;

    let show = app.get("/api/v1/rooms/1", None).await?;
    assert_eq!(show.status, StatusCode::UNAUTHORIZED);
    assert_eq!(show.json()?, json!({ "error": "Unauthorized" }));

    let create = app
        .post_json("/api/v1/rooms", None, json!({ "room": { "name": "other" } }))
        .await?;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.count("rooms").await?, 1);

    let list = app.get("/api/v1/rooms", None).await?;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.json()?, json!({ "rooms": [{ "id": 1, "name": "lobby" }] }));
    Ok(())
}

#[tokio::test]
async fn listing_skips_private_rooms() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let alice = app.register("alice").await?;
    app.register("bob").await?;
    app.post_json("/api/v1/rooms", Some(&alice), json!({ "room": { "name": "lobby" } }))
        .await?;

    // opens the alice/bob direct room
    let direct = app.get("/users/2", Some(&alice)).await?;
    assert_eq!(direct.status, StatusCode::OK);
    assert_eq!(app.count("rooms").await?, 2);

    let list = app.get("/api/v1/rooms", None).await?.json()?;
    assert_eq!(list, json!({ "rooms": [{ "id": 1, "name": "lobby" }] }));
    Ok(())
}

#[tokio::test]
async fn room_detail_lists_messages_oldest_first() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.register("alice").await?;
    app.post_json("/api/v1/rooms", Some(&cookie), json!({ "room": { "name": "lobby" } }))
        .await?;

    for content in ["first", "second", "third"] {
        let posted = app
            .post_json(
                "/api/v1/messages",
                Some(&cookie),
                json!({ "room_id": 1, "message": { "content": content } }),
            )
            .await?;
        assert_eq!(posted.status, StatusCode::CREATED);
    }

    let detail = app.get("/api/v1/rooms/1", Some(&cookie)).await?;
    assert_eq!(detail.status, StatusCode::OK);
    let body = detail.json()?;
    assert_eq!(body["room"], json!({ "id": 1, "name": "lobby" }));

    let messages = body["messages"].as_array().unwrap();
    let contents: Vec<_> = messages.iter().map(|m| m["content"].as_str().unwrap()).collect();
    assert_eq!(contents, ["first", "second", "third"]);

    let times = messages
        .iter()
        .map(|m| OffsetDateTime::parse(m["created_at"].as_str().unwrap(), &Rfc3339))
        .collect::<Result<Vec<_>, _>>()?;
    assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));

    let keys: Vec<_> = messages[0].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.len(), 4);
    for key in ["id", "content", "room_id", "created_at"] {
        assert!(keys.iter().any(|k| k == key), "missing {key}");
    }
    Ok(())
}

#[tokio::test]
async fn unknown_room_is_not_found() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.register("alice").await?;

    let missing = app.get("/api/v1/rooms/99", Some(&cookie)).await?;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()?, json!({ "status": "error", "errors": ["Couldn't find Room"] }));

    let garbage = app.get("/api/v1/rooms/lobby", Some(&cookie)).await?;
    assert_eq!(garbage.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn private_room_detail_is_hidden_from_outsiders() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let alice = app.register("alice").await?;
    let bob = app.register("bob").await?;
    let eve = app.register("eve").await?;
    app.get("/users/2", Some(&alice)).await?;

    assert_eq!(app.get("/api/v1/rooms/1", Some(&alice)).await?.status, StatusCode::OK);
    assert_eq!(app.get("/api/v1/rooms/1", Some(&bob)).await?.status, StatusCode::OK);
    assert_eq!(app.get("/api/v1/rooms/1", Some(&eve)).await?.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn public_rooms_cannot_squat_direct_room_names() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let alice = app.register("alice").await?;
    app.register("bob").await?;
    let eve = app.register("eve").await?;

    let squat = app
        .post_json("/api/v1/rooms", Some(&eve), json!({ "room": { "name": "private_1_2" } }))
        .await?;
    assert_eq!(squat.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        squat.json()?,
        json!({ "status": "error", "errors": ["Name can't start with private_"] })
    );

    assert_eq!(app.get("/users/2", Some(&alice)).await?.status, StatusCode::OK);
    assert_eq!(app.count("rooms").await?, 1);
    Ok(())
}

#[tokio::test]
async fn room_names_are_trimmed() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.register("alice").await?;

    let created = app
        .post_json("/api/v1/rooms", Some(&cookie), json!({ "room": { "name": " lobby " } }))
        .await?;
    assert_eq!(created.json()?["room"]["name"], "lobby");

    let padded = app
        .post_json("/api/v1/rooms", Some(&cookie), json!({ "room": { "name": "lobby " } }))
        .await?;
    assert_eq!(padded.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.count("rooms").await?, 1);
    Ok(())
}
