use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{db_interaction::{insert_user_into_database, UserInsertError}, domain::user_email::UserEmail, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct RegistrationForm{
    email: String,
    name: String,
    password: SecretString
}

// User fields returned to the client after a successful registration
#[derive(Serialize, Deserialize)]
pub struct UserResponse{
    pub id: i32,
    pub email: String,
    pub name: String,
    pub is_admin: bool
}

#[derive(Error)]
pub enum RegisterError{
    #[error("{0}")]
    InvalidEmail(String),
    #[error("this email is already registered")]
    UserAlreadyExists(#[source] UserInsertError),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for RegisterError{
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            RegisterError::InvalidEmail(_) | RegisterError::UserAlreadyExists(_) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            RegisterError::UnexpectedError(_) => {
                HttpResponse::InternalServerError().body(format!("{}", self))
            }
        }
    }
}

#[tracing::instrument(
    "User registration started",
    skip(pool, form)
)]
pub async fn register(
    form: web::Json<RegistrationForm>,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, RegisterError> {
    let form = form.into_inner();

    let email = UserEmail::parse(form.email)
        .map_err(RegisterError::InvalidEmail)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user = insert_user_into_database(conn, form.name, email.inner(), form.password)
        .await
        .map_err(|e| {
            match e {
                UserInsertError::EmailNotUnique(_) => RegisterError::UserAlreadyExists(e),
                UserInsertError::UnexpectedError(_) => RegisterError::UnexpectedError(e.into())
            }
        })?;

    Ok(HttpResponse::Created().json(UserResponse{
        id: user.id,
        email: user.email,
        name: user.name,
        is_admin: user.is_admin
    }))
}
