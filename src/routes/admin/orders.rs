use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::{auth::extractors::IsAdmin, db_interaction::get_all_orders, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Getting all orders for admin",
    skip(pool)
)]
pub async fn get_all_orders_for_admin(
    pool: web::Data<DbPool>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let orders = get_all_orders(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(orders))
}
