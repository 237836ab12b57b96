use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use coffee_shop::schema::{bean_order_items, bean_orders};

use crate::helpers::TestApp;

#[actix_web::test]
async fn bean_order_computes_total_and_decrements_stock(){
    let app = TestApp::spawn_app().await;
    app.seed_product("bean-001", "Mandheling Dark Roast", 1000, 5);
    let user = app.create_user_and_login().await;

    let response = app.api_client
        .post(format!("{}/bean_orders", app.get_app_url()))
        .bearer_auth(&user.token)
        .json(&serde_json::json!({
            "items": [{ "id": "bean-001", "quantity": 3 }],
            "shipping_address": "Office Building 3F"
        }))
        .send()
        .await
        .expect("Failed to send request to bean_orders endpoint");

    assert_eq!(response.status().as_u16(), 201);

    let body = response.json::<serde_json::Value>().await.unwrap();
    let order = &body["order"];

    assert_eq!(order["total_price"].as_i64().unwrap(), 3000);
    assert_eq!(order["user_id"].as_i64().unwrap() as i32, user.id);
    assert_eq!(order["status"], "paid");
    assert_eq!(order["shipping_address"], "Office Building 3F");
    assert_eq!(order["items"].as_array().unwrap().len(), 1);

    assert_eq!(app.get_product_stock("bean-001"), 2);

    let order_id = order["order_id"].as_str().unwrap();
    assert!(order_id.starts_with("bo-"), "unexpected order id: {}", order_id);

    let mut conn = app.pool.get().unwrap();
    let item_count: i64 = bean_order_items::table
        .filter(bean_order_items::bean_order_id.eq(order_id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(item_count, 1);
}

#[actix_web::test]
async fn unknown_product_rejects_the_whole_order(){
    let app = TestApp::spawn_app().await;
    app.seed_product("bean-001", "Mandheling Dark Roast", 1000, 5);
    let user = app.create_user_and_login().await;

    // bean-001 alone would succeed; the missing bean-002 must undo it
    let response = app.api_client
        .post(format!("{}/bean_orders", app.get_app_url()))
        .bearer_auth(&user.token)
        .json(&serde_json::json!({
            "items": [
                { "id": "bean-001", "quantity": 3 },
                { "id": "bean-002", "quantity": 1 }
            ],
            "shipping_address": "Office Building 3F"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(app.get_product_stock("bean-001"), 5);

    let mut conn = app.pool.get().unwrap();
    let order_count: i64 = bean_orders::table
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(order_count, 0);
}

#[actix_web::test]
async fn insufficient_stock_on_a_later_line_restores_earlier_decrements(){
    let app = TestApp::spawn_app().await;
    app.seed_product("bean-001", "Mandheling Dark Roast", 1000, 5);
    app.seed_product("bean-002", "Guatemala Antigua", 1200, 2);
    let user = app.create_user_and_login().await;

    let body = serde_json::json!({
        "items": [
            { "id": "bean-001", "quantity": 2 },
            { "id": "bean-002", "quantity": 10 }
        ],
        "shipping_address": "Office Building 3F"
    });

    // Same failing input twice; stock must be untouched both times
    for _ in 0..2 {
        let response = app.api_client
            .post(format!("{}/bean_orders", app.get_app_url()))
            .bearer_auth(&user.token)
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        let text = response.text().await.unwrap();
        assert!(text.contains("Guatemala Antigua"), "error does not name the product: {}", text);

        assert_eq!(app.get_product_stock("bean-001"), 5);
        assert_eq!(app.get_product_stock("bean-002"), 2);
    }
}

#[actix_web::test]
async fn empty_item_list_is_rejected(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user_and_login().await;

    let response = app.api_client
        .post(format!("{}/bean_orders", app.get_app_url()))
        .bearer_auth(&user.token)
        .json(&serde_json::json!({
            "items": [],
            "shipping_address": "Office Building 3F"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn non_positive_quantity_is_rejected(){
    let app = TestApp::spawn_app().await;
    app.seed_product("bean-001", "Mandheling Dark Roast", 1000, 5);
    let user = app.create_user_and_login().await;

    let response = app.api_client
        .post(format!("{}/bean_orders", app.get_app_url()))
        .bearer_auth(&user.token)
        .json(&serde_json::json!({
            "items": [{ "id": "bean-001", "quantity": 0 }],
            "shipping_address": "Office Building 3F"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(app.get_product_stock("bean-001"), 5);
}

#[actix_web::test]
async fn consecutive_orders_get_distinct_ids(){
    let app = TestApp::spawn_app().await;
    app.seed_product("bean-001", "Mandheling Dark Roast", 1000, 10);
    let user = app.create_user_and_login().await;

    let mut seen = Vec::new();
    for _ in 0..2 {
        let body = app.api_client
            .post(format!("{}/bean_orders", app.get_app_url()))
            .bearer_auth(&user.token)
            .json(&serde_json::json!({
                "items": [{ "id": "bean-001", "quantity": 1 }],
                "shipping_address": "Office Building 3F"
            }))
            .send()
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap();

        seen.push(body["order"]["order_id"].as_str().unwrap().to_string());
    }

    assert_ne!(seen[0], seen[1]);
}
