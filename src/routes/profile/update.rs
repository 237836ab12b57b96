use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::{auth::extractors::IsUser, db_interaction::{update_user_profile_info, UserProfileUpdate}, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct UpdateProfileJson{
    pub name: Option<String>,
    pub preferred_beans: Option<String>
}

#[tracing::instrument(
    "Updating profile of logged in user",
    skip(pool, uid)
)]
pub async fn update_profile(
    pool: web::Data<DbPool>,
    json: web::Json<UpdateProfileJson>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let update = UserProfileUpdate{
        name: json.0.name,
        preferred_beans: json.0.preferred_beans
    };

    let profile = update_user_profile_info(conn, update, uid.0)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(profile))
}
