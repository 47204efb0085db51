mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Sales are written with a product id and read back with the product
/// expanded in full.
#[tokio::test]
async fn sale_reads_embed_the_product() -> Result<()> {
    let app = common::spawn_app().await?;
    common::login(&app).await?;

    let product = common::create_product(&app, "Hammer", "9.50", 30).await?;
    let product_id = product["id"].as_i64().unwrap();

    let sale = common::create_sale(&app, "Spring promo", product_id, 3).await?;
    assert_eq!(sale["name"], "Spring promo");
    assert_eq!(sale["quantity"], 3);
    assert_eq!(sale["date"], "2026-08-06");
    assert_eq!(sale["product"], product);
    // the write-side field never appears on reads
    assert!(sale.get("product_id").is_none());

    let res = app
        .client
        .get(app.url(&format!("/ventas/{}/", sale["id"].as_i64().unwrap())))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await?;
    assert_eq!(fetched, sale);
    Ok(())
}

/// The embedded product reflects its current state, not a snapshot taken at
/// sale time.
#[tokio::test]
async fn sale_reads_track_product_changes() -> Result<()> {
    let app = common::spawn_app().await?;
    common::login(&app).await?;

    let product = common::create_product(&app, "Saw", "24.00", 8).await?;
    let product_id = product["id"].as_i64().unwrap();
    let sale = common::create_sale(&app, "Clearance", product_id, 1).await?;

    let res = app
        .client
        .patch(app.url(&format!("/productos/{}/", product_id)))
        .json(&json!({ "name": "Circular saw", "price": "19.99" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .client
        .get(app.url(&format!("/ventas/{}/", sale["id"].as_i64().unwrap())))
        .send()
        .await?;
    let fetched: Value = res.json().await?;
    assert_eq!(fetched["product"]["name"], "Circular saw");
    assert_eq!(fetched["product"]["price"], "19.99");
    Ok(())
}

/// A broken reference is a 400 and must not leave a row behind.
#[tokio::test]
async fn sale_with_unknown_product_is_rejected_without_side_effects() -> Result<()> {
    let app = common::spawn_app().await?;
    common::login(&app).await?;

    let res = app
        .client
        .post(app.url("/ventas/"))
        .json(&json!({
            "name": "Ghost sale",
            "product_id": 9999,
            "quantity": 1,
            "date": "2026-08-06",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["fields"]["product_id"]
        .as_str()
        .unwrap()
        .contains("does not exist"));

    assert!(app.store.list_sales().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn sale_writes_reject_a_nested_product_object() -> Result<()> {
    let app = common::spawn_app().await?;
    common::login(&app).await?;

    let product = common::create_product(&app, "Wrench", "12.75", 15).await?;

    let res = app
        .client
        .post(app.url("/ventas/"))
        .json(&json!({
            "name": "Bundle",
            "product": product,
            "quantity": 2,
            "date": "2026-08-06",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["fields"]["product"].is_string());
    Ok(())
}

#[tokio::test]
async fn sale_update_revalidates_the_reference() -> Result<()> {
    let app = common::spawn_app().await?;
    common::login(&app).await?;

    let first = common::create_product(&app, "Hammer", "9.50", 30).await?;
    let second = common::create_product(&app, "Saw", "24.00", 8).await?;
    let sale = common::create_sale(&app, "Promo", first["id"].as_i64().unwrap(), 2).await?;
    let sale_id = sale["id"].as_i64().unwrap();

    // repointing at a live product works
    let res = app
        .client
        .patch(app.url(&format!("/ventas/{}/", sale_id)))
        .json(&json!({ "product_id": second["id"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["product"]["name"], "Saw");
    assert_eq!(updated["quantity"], 2);

    // repointing at a dead one does not
    let res = app
        .client
        .patch(app.url(&format!("/ventas/{}/", sale_id)))
        .json(&json!({ "product_id": 9999 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // and the sale still references the live product
    let res = app
        .client
        .get(app.url(&format!("/ventas/{}/", sale_id)))
        .send()
        .await?;
    let fetched: Value = res.json().await?;
    assert_eq!(fetched["product"]["name"], "Saw");
    Ok(())
}

/// Deleting a product removes the product and every sale referencing it,
/// atomically, while unrelated sales survive.
#[tokio::test]
async fn product_delete_cascades_to_its_sales() -> Result<()> {
    let app = common::spawn_app().await?;
    common::login(&app).await?;

    let doomed = common::create_product(&app, "Hammer", "9.50", 30).await?;
    let doomed_id = doomed["id"].as_i64().unwrap();
    let survivor = common::create_product(&app, "Saw", "24.00", 8).await?;
    let survivor_id = survivor["id"].as_i64().unwrap();

    let sale_a = common::create_sale(&app, "Promo A", doomed_id, 1).await?;
    let sale_b = common::create_sale(&app, "Promo B", doomed_id, 2).await?;
    let unrelated = common::create_sale(&app, "Promo C", survivor_id, 3).await?;

    let res = app
        .client
        .delete(app.url(&format!("/productos/{}/", doomed_id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // the product and both of its sales are gone
    for path in [
        format!("/productos/{}/", doomed_id),
        format!("/ventas/{}/", sale_a["id"].as_i64().unwrap()),
        format!("/ventas/{}/", sale_b["id"].as_i64().unwrap()),
    ] {
        let res = app.client.get(app.url(&path)).send().await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path: {}", path);
    }

    // the unrelated sale and its product are untouched
    let res = app.client.get(app.url("/ventas/")).send().await?;
    let list: Vec<Value> = res.json().await?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], unrelated["id"]);
    assert_eq!(list[0]["product"]["id"], survivor["id"]);
    Ok(())
}

/// Deleting a sale never touches its product.
#[tokio::test]
async fn sale_delete_leaves_the_product_alone() -> Result<()> {
    let app = common::spawn_app().await?;
    common::login(&app).await?;

    let product = common::create_product(&app, "Ladder", "80.00", 5).await?;
    let product_id = product["id"].as_i64().unwrap();
    let sale = common::create_sale(&app, "One-off", product_id, 1).await?;

    let res = app
        .client
        .delete(app.url(&format!("/ventas/{}/", sale["id"].as_i64().unwrap())))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .client
        .get(app.url(&format!("/productos/{}/", product_id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
