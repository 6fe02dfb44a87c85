mod common;

use axum::http::{Method, StatusCode};
use places_api::store::Store;
use serde_json::json;
use uuid::Uuid;

async fn signed_up_user_id(app: &axum::Router) -> String {
    let body = common::signup_user(app, "A", "a@x.com", "secret1").await;
    body["user"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn created_place_is_returned_and_listed_for_its_creator() {
    let (app, _) = common::test_app();
    let creator = signed_up_user_id(&app).await;

    let (status, body) = common::create_place(
        &app,
        "Empire State Building",
        "A famous skyscraper in New York City.",
        "20 W 34th St, New York, NY 10001",
        &creator,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    assert_eq!(body["message"], "Place created successfully!");
    let place = &body["place"];
    assert_eq!(place["creator"].as_str().unwrap(), creator);
    assert_eq!(place["location"]["lat"], common::STUB_LOCATION.lat);
    assert_eq!(place["location"]["lng"], common::STUB_LOCATION.lng);
    let place_id = place["id"].as_str().unwrap().to_string();

    // Read-after-write: listed under the creator
    let (status, body) = common::get(&app, &format!("/places/user/{}", creator)).await;
    assert_eq!(status, StatusCode::OK);
    let places = body["places"].as_array().unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0]["id"].as_str().unwrap(), place_id);

    // ...and the creator's own place set references it
    let (_, body) = common::get(&app, "/users").await;
    assert_eq!(body["users"][0]["places"], json!([place_id]));
}

#[tokio::test]
async fn unresolvable_address_fails_validation_and_persists_nothing() {
    let (app, _) = common::test_app();
    let creator = signed_up_user_id(&app).await;

    let (status, _) = common::create_place(
        &app,
        "Atlantis",
        "A sunken city of legend.",
        common::UNRESOLVABLE_ADDRESS,
        &creator,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = common::get(&app, &format!("/places/user/{}", creator)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_creator_is_a_not_found() {
    let (app, _) = common::test_app();

    let (status, _) = common::create_place(
        &app,
        "Empire State Building",
        "A famous skyscraper in New York City.",
        "20 W 34th St, New York, NY 10001",
        &Uuid::new_v4().to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn field_validation_short_circuits_before_geocoding() {
    let (app, _) = common::test_app();
    let creator = signed_up_user_id(&app).await;

    // Description below the minimum length; the unresolvable address must not
    // matter because validation fails first.
    let (status, body) = common::create_place(
        &app,
        "",
        "1234",
        common::UNRESOLVABLE_ADDRESS,
        &creator,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"].get("title").is_some());
    assert!(body["field_errors"].get("description").is_some());
    assert!(body["field_errors"].get("address").is_none());
}

#[tokio::test]
async fn get_place_by_id_is_idempotent() {
    let (app, _) = common::test_app();
    let creator = signed_up_user_id(&app).await;
    let (_, body) = common::create_place(
        &app,
        "Empire State Building",
        "A famous skyscraper in New York City.",
        "20 W 34th St, New York, NY 10001",
        &creator,
    )
    .await;
    let place_id = body["place"]["id"].as_str().unwrap().to_string();

    let (first_status, first) = common::get(&app, &format!("/places/{}", place_id)).await;
    let (second_status, second) = common::get(&app, &format!("/places/{}", place_id)).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(first["message"], "Fetching place success!");
}

#[tokio::test]
async fn unknown_place_is_a_not_found() {
    let (app, _) = common::test_app();

    let (status, body) = common::get(&app, &format!("/places/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Could not find a place for the provided id.");
}

#[tokio::test]
async fn update_changes_title_and_description_only() {
    let (app, _) = common::test_app();
    let creator = signed_up_user_id(&app).await;
    let (_, body) = common::create_place(
        &app,
        "Empire State Building",
        "A famous skyscraper in New York City.",
        "20 W 34th St, New York, NY 10001",
        &creator,
    )
    .await;
    let place_id = body["place"]["id"].as_str().unwrap().to_string();

    let (status, body) = common::send_json(
        &app,
        Method::PATCH,
        &format!("/places/{}", place_id),
        json!({"title": "ESB", "description": "Still a famous skyscraper."}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let place = &body["place"];
    assert_eq!(place["title"], "ESB");
    assert_eq!(place["description"], "Still a famous skyscraper.");
    // Immutable after creation
    assert_eq!(place["address"], "20 W 34th St, New York, NY 10001");
    assert_eq!(place["location"]["lat"], common::STUB_LOCATION.lat);
    assert_eq!(place["creator"].as_str().unwrap(), creator);
}

#[tokio::test]
async fn update_with_short_description_is_rejected() {
    let (app, _) = common::test_app();
    let creator = signed_up_user_id(&app).await;
    let (_, body) = common::create_place(
        &app,
        "Empire State Building",
        "A famous skyscraper in New York City.",
        "20 W 34th St, New York, NY 10001",
        &creator,
    )
    .await;
    let place_id = body["place"]["id"].as_str().unwrap().to_string();

    let (status, body) = common::send_json(
        &app,
        Method::PATCH,
        &format!("/places/{}", place_id),
        json!({"title": "ESB", "description": "1234"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"].get("description").is_some());
}

#[tokio::test]
async fn deleting_a_place_removes_it_and_the_owner_reference() {
    let (app, _) = common::test_app();
    let creator = signed_up_user_id(&app).await;
    let (_, body) = common::create_place(
        &app,
        "Empire State Building",
        "A famous skyscraper in New York City.",
        "20 W 34th St, New York, NY 10001",
        &creator,
    )
    .await;
    let place_id = body["place"]["id"].as_str().unwrap().to_string();

    let (status, body) = common::delete(&app, &format!("/places/{}", place_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Place deleted successfully!");

    let (status, _) = common::get(&app, &format!("/places/{}", place_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::get(&app, &format!("/places/user/{}", creator)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = common::get(&app, "/users").await;
    assert_eq!(body["users"][0]["places"], json!([]));
}

#[tokio::test]
async fn deleting_an_unknown_place_is_a_not_found() {
    let (app, _) = common::test_app();

    let (status, _) = common::delete(&app, &format!("/places/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failed_paired_write_leaves_no_partial_state() {
    let (app, store) = common::test_app();
    let creator = signed_up_user_id(&app).await;
    let creator_id: Uuid = creator.parse().unwrap();

    store.fail_next_paired_write();
    let (status, _) = common::create_place(
        &app,
        "Empire State Building",
        "A famous skyscraper in New York City.",
        "20 W 34th St, New York, NY 10001",
        &creator,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // No orphan place, no dangling reference
    assert!(store
        .find_places_by_creator(creator_id)
        .await
        .unwrap()
        .is_empty());
    let user = store.find_user(creator_id).await.unwrap().unwrap();
    assert!(user.places.is_empty());
}

#[tokio::test]
async fn place_image_upload_is_stored_and_referenced() {
    let (app, _) = common::test_app();
    let creator = signed_up_user_id(&app).await;

    let png = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
    let body = common::multipart_body(
        &[
            ("title", "Empire State Building"),
            ("description", "A famous skyscraper in New York City."),
            ("address", "20 W 34th St, New York, NY 10001"),
            ("creator", &creator),
        ],
        Some(("image", "esb.png", "image/png", &png[..])),
    );
    let (status, body) = common::post_multipart(&app, "/places", body).await;

    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    let image = body["place"]["image"].as_str().unwrap();
    assert!(image.ends_with(".png"));
}

#[tokio::test]
async fn wrong_media_type_is_rejected() {
    let (app, _) = common::test_app();
    let creator = signed_up_user_id(&app).await;

    let body = common::multipart_body(
        &[
            ("title", "Empire State Building"),
            ("description", "A famous skyscraper in New York City."),
            ("address", "20 W 34th St, New York, NY 10001"),
            ("creator", &creator),
        ],
        Some(("image", "notes.txt", "text/plain", &b"not an image"[..])),
    );
    let (status, body) = common::post_multipart(&app, "/places", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"].get("image").is_some());
}

#[tokio::test]
async fn oversized_image_is_rejected() {
    let (app, _) = common::test_app();
    let creator = signed_up_user_id(&app).await;

    let oversized = vec![0u8; 500_001];
    let body = common::multipart_body(
        &[
            ("title", "Empire State Building"),
            ("description", "A famous skyscraper in New York City."),
            ("address", "20 W 34th St, New York, NY 10001"),
            ("creator", &creator),
        ],
        Some(("image", "big.png", "image/png", &oversized[..])),
    );
    let (status, body) = common::post_multipart(&app, "/places", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"].get("image").is_some());
}
