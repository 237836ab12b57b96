use crate::helpers::TestApp;

#[actix_web::test]
async fn profile_update_changes_name_and_preferred_beans(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user_and_login().await;

    let response = app.api_client
        .patch(format!("{}/users/me", app.get_app_url()))
        .bearer_auth(&user.token)
        .json(&serde_json::json!({
            "name": "Hanako Sato",
            "preferred_beans": "Ethiopia Sidamo"
        }))
        .send()
        .await
        .expect("Failed to send request to users/me endpoint");

    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["name"], "Hanako Sato");
    assert_eq!(body["preferred_beans"], "Ethiopia Sidamo");
    // email is the login id and must survive the patch untouched
    assert_eq!(body["email"], user.email.as_str());
}

#[actix_web::test]
async fn empty_patch_leaves_the_profile_unchanged(){
    let app = TestApp::spawn_app().await;
    let user = app.create_user_and_login().await;

    let response = app.api_client
        .patch(format!("{}/users/me", app.get_app_url()))
        .bearer_auth(&user.token)
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["name"], "Taro Yamada");
    assert_eq!(body["email"], user.email.as_str());
}
