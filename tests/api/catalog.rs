use crate::helpers::TestApp;

#[actix_web::test]
async fn products_endpoint_lists_the_catalog(){
    let app = TestApp::spawn_app().await;
    app.seed_product("bean-001", "Mandheling Dark Roast", 1000, 5);
    app.seed_product("bean-002", "Guatemala Antigua", 1200, 0);

    let body = app.api_client
        .get(format!("{}/products", app.get_app_url()))
        .send()
        .await
        .expect("Failed to send request to products endpoint")
        .json::<serde_json::Value>()
        .await
        .unwrap();

    let products = body.as_array().unwrap();
    // The catalog lists sold-out products too; only /settings filters on stock
    assert_eq!(products.len(), 2);
}

#[actix_web::test]
async fn settings_only_offer_beans_with_stock(){
    let app = TestApp::spawn_app().await;
    app.seed_bean_stock("Ethiopia Sidamo", 3);
    app.seed_bean_stock("Brazil Santos", 0);

    let body = app.api_client
        .get(format!("{}/settings", app.get_app_url()))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    let inventory = body["bean_inventory"].as_object().unwrap();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory["Ethiopia Sidamo"].as_i64().unwrap(), 3);

    assert!(body["coffee_shop"]["name"].is_string());
    assert!(body["operational_hours"]["start"].is_string());
}
