use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::{auth::extractors::IsUser, db_interaction::get_orders_for_user, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Getting order history of logged in user",
    skip(pool, uid)
)]
pub async fn get_my_orders(
    pool: web::Data<DbPool>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let history = get_orders_for_user(conn, uid.0)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(history))
}
