use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError, ErrorUnauthorized}, web, HttpResponse};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{auth::jwt::Tokenizer, db_interaction::get_user_from_email, domain::user_email::UserEmail, password::verify_password, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct LoginForm{
    pub email: String,
    pub password: SecretString
}

#[derive(Serialize, Deserialize)]
pub struct TokenResponse{
    pub access_token: String,
    pub token_type: String
}

#[tracing::instrument(
    "Logging in user",
    skip(pool, tokenizer, form)
)]
pub async fn login(
    pool: web::Data<DbPool>,
    form: web::Form<LoginForm>,
    tokenizer: web::Data<Tokenizer>
) -> Result<HttpResponse, actix_web::Error>{
    let email = UserEmail::parse(form.0.email)
                    .map_err(ErrorBadRequest)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let user = match get_user_from_email(conn, email.inner())
                        .await
                        .map_err(ErrorInternalServerError)?{
        Ok(user) => user,
        Err(e) => {
            tracing::info!("No user found for login attempt: {:?}", e);
            return Err(ErrorUnauthorized("Email or password is incorrect"))
        }
    };

    match verify_password(form.0.password, user.password.clone()).await{
        Ok(res) => {
            if res {
                let access_token = tokenizer.generate_key(&user);

                Ok(HttpResponse::Ok().json(TokenResponse{
                    access_token,
                    token_type: "bearer".to_string()
                }))
            } else {
                tracing::info!("Passwords did not match");
                Err(ErrorUnauthorized("Email or password is incorrect"))
            }
        },
        Err(e) => {
            let err = e.to_string();
            tracing::error!(err);
            Err(ErrorInternalServerError("Failed to login"))
        }
    }
}
