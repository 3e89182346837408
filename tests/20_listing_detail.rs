mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Creates the reference listing through the API: two images stored out of
/// order, one feature, no demographic target, one urgency setting.
async fn create_reference_listing(server: &common::TestServer, category_id: i32, user_id: i32) -> Result<i64> {
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/listings"))
        .json(&json!({
            "title": "Four bedroom detached duplex",
            "description": "Fitted kitchen, boys quarters",
            "price": "120000000.00",
            "location": "3 Bourdillon Road",
            "city": "Ikoyi",
            "state": "Lagos",
            "country": "Nigeria",
            "category_id": category_id,
            "user_id": user_id,
            "main_image_url": "https://img.example/front.jpg"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = res.json::<Value>().await?["id"].as_i64().expect("id");

    for (url, order) in [("https://img.example/second.jpg", 2), ("https://img.example/first.jpg", 1)] {
        let res = client
            .post(server.url("/api/listing_images"))
            .json(&json!({ "listing_id": id, "image_url": url, "is_main": order == 1, "display_order": order }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .post(server.url("/api/property_features"))
        .json(&json!({ "listing_id": id, "feature_type": "bedrooms", "feature_value": "3" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(server.url("/api/urgency_settings"))
        .json(&json!({ "listing_id": id, "reason": "Price drop", "deadline": null, "is_active": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.json::<Value>().await?, json!({ "success": true }));

    Ok(id)
}

#[tokio::test]
async fn aggregated_listing_has_the_expected_shape() -> Result<()> {
    let (repo, category_id, user_id) = common::seeded_repo().await?;
    let server = common::TestServer::spawn(repo).await?;
    let id = create_reference_listing(&server, category_id, user_id).await?;

    let res = reqwest::get(server.url(&format!("/api/listings/{}", id))).await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body.get("data").is_none(), "detail view is not wrapped: {}", body);
    assert_eq!(body["id"], id);
    assert_eq!(body["category_name"], "Residential");
    assert_eq!(body["owner_name"], "Jane Doe");
    assert_eq!(body["phone_number"], "+2348012345678");

    let orders: Vec<i64> = body["images"]
        .as_array()
        .expect("images array")
        .iter()
        .filter_map(|i| i["display_order"].as_i64())
        .collect();
    assert_eq!(orders, vec![1, 2]);

    let features = body["features"].as_array().expect("features array");
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["feature_type"], "bedrooms");
    assert_eq!(features[0]["feature_value"], "3");

    assert!(body["demographic_targets"].is_null());
    assert_eq!(body["urgency_settings"]["reason"], "Price drop");
    assert_eq!(body["urgency_settings"]["is_active"], true);
    Ok(())
}

#[tokio::test]
async fn repeated_reads_return_identical_bytes() -> Result<()> {
    let (repo, category_id, user_id) = common::seeded_repo().await?;
    let server = common::TestServer::spawn(repo).await?;
    let id = create_reference_listing(&server, category_id, user_id).await?;
    let url = server.url(&format!("/api/listings/{}", id));

    let first = reqwest::get(&url).await?.bytes().await?;
    let second = reqwest::get(&url).await?.bytes().await?;

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn unknown_listing_is_404_without_related_reads() -> Result<()> {
    let (repo, _, _) = common::seeded_repo().await?;
    let server = common::TestServer::spawn(repo.clone()).await?;

    let res = reqwest::get(server.url("/api/listings/9999")).await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Listing not found" }));
    assert_eq!(server.repo.calls().listing_core, 1);
    assert_eq!(repo.calls().related(), 0);
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_404_without_touching_the_store() -> Result<()> {
    let (repo, _, _) = common::seeded_repo().await?;
    let server = common::TestServer::spawn(repo.clone()).await?;

    let res = reqwest::get(server.url("/api/listings/not-a-number")).await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(repo.calls().listing_core, 0);
    Ok(())
}

#[tokio::test]
async fn related_fetch_failure_is_a_500_with_a_generic_message() -> Result<()> {
    let (repo, category_id, user_id) = common::seeded_repo().await?;
    let server = common::TestServer::spawn(repo.clone()).await?;
    let id = create_reference_listing(&server, category_id, user_id).await?;
    repo.fail_at(listing_api::testing::FailurePoint::Urgency);

    let res = reqwest::get(server.url(&format!("/api/listings/{}", id))).await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Internal server error" }));
    Ok(())
}

#[tokio::test]
async fn listing_index_is_wrapped_and_newest_first() -> Result<()> {
    let (repo, category_id, user_id) = common::seeded_repo().await?;
    let server = common::TestServer::spawn(repo).await?;
    let first = create_reference_listing(&server, category_id, user_id).await?;
    let second = create_reference_listing(&server, category_id, user_id).await?;

    let res = reqwest::get(server.url("/api/listings")).await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .filter_map(|l| l["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(body["data"][0]["owner_name"], "Jane Doe");
    assert!(body["data"][0].get("images").is_none());
    Ok(())
}
