use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::{auth::extractors::IsUser, db_interaction::get_user_profile_info, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Get profile of logged in user",
    skip(pool, uid)
)]
pub async fn get_profile(
    pool: web::Data<DbPool>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let profile = get_user_profile_info(conn, uid.0)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(profile))
}
