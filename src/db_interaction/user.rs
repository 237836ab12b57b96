use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{ExpressionMethods, QueryDsl, QueryResult, RunQueryDsl};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{models::{NewUser, User}, password::compute_password_hash, schema::users, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

// Function to query user from email id
pub async fn get_user_from_email(
    mut conn: DbConnection,
    email_string: String
) -> Result<QueryResult<User>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        let res: QueryResult<User> = users::table
            .filter(users::email.eq(email_string))
            .get_result::<User>(&mut conn);

        res
    })
    .await
    .context("Failed due to threadpool error")?;

    Ok(res)
}

// Error associated with inserting user to users table
#[derive(Error)]
pub enum UserInsertError{
    #[error("email field is not unique")]
    EmailNotUnique(#[source] diesel::result::Error),
    #[error("unexpected database / hashing error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UserInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting user into the database",
    skip(conn, password)
)]
pub async fn insert_user_into_database(
    mut conn: DbConnection,
    name: String,
    email: String,
    password: SecretString
) -> Result<User, UserInsertError> {

    let password_hash = spawn_blocking_with_tracing(move || {
        compute_password_hash(password)
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(UserInsertError::UnexpectedError)?
    .map_err(UserInsertError::UnexpectedError)?;

    let new_user = NewUser{
        name,
        email,
        password: password_hash.expose_secret().to_string(),
        preferred_beans: None,
        is_admin: false
    };

    let user = spawn_blocking_with_tracing(move || {
        diesel::insert_into(users::table)
            .values(&new_user)
            .get_result::<User>(&mut conn)
            .map_err(|e|{
                match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        ref _a
                    ) => {
                        UserInsertError::EmailNotUnique(e)
                    },

                    _ => UserInsertError::UnexpectedError(anyhow::anyhow!("Unexpected diesel / database error"))
                }
            })
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(UserInsertError::UnexpectedError)??;

    Ok(user)
}

// Profile fields visible to and editable by the logged in user
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserProfileInfo{
    pub id: i32,
    pub name: String,
    pub email: String,
    pub preferred_beans: Option<String>,
    pub is_admin: bool
}

impl From<User> for UserProfileInfo {
    fn from(user: User) -> Self {
        UserProfileInfo{
            id: user.id,
            name: user.name,
            email: user.email,
            preferred_beans: user.preferred_beans,
            is_admin: user.is_admin
        }
    }
}

#[tracing::instrument(
    "Get profile data of logged in user",
    skip(conn)
)]
pub async fn get_user_profile_info(
    mut conn: DbConnection,
    user_id: i32
) -> Result<UserProfileInfo, anyhow::Error>{
    let user = spawn_blocking_with_tracing(move || {
        users::table
            .filter(users::id.eq(user_id))
            .get_result::<User>(&mut conn)
            .context("Failed to get user from database")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(user.into())
}

// Errors associated with updating user profile in the database
#[derive(thiserror::Error)]
pub enum UpdateUserProfileError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed due to database error")]
    QueryError(#[from] diesel::result::Error)
}

impl Debug for UpdateUserProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Absent fields keep their value; email is the login id and stays fixed
#[derive(Deserialize, Debug, Clone)]
pub struct UserProfileUpdate{
    pub name: Option<String>,
    pub preferred_beans: Option<String>
}

#[tracing::instrument(
    "Updating user profile info in db",
    skip_all
)]
pub async fn update_user_profile_info(
    mut conn: DbConnection,
    update: UserProfileUpdate,
    user_id: i32
) -> Result<UserProfileInfo, UpdateUserProfileError>{

    let user = spawn_blocking_with_tracing(move || {
        if update.name.is_none() && update.preferred_beans.is_none() {
            return users::table
                .filter(users::id.eq(user_id))
                .get_result::<User>(&mut conn);
        }

        let changes = (
            update.name.map(|v| users::name.eq(v)),
            update.preferred_beans.map(|v| users::preferred_beans.eq(v))
        );

        diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(changes)
            .get_result::<User>(&mut conn)
    })
    .await??;

    Ok(user.into())
}
