use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::{db_interaction::get_products, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Get product catalog",
    skip(pool)
)]
pub async fn get_product_catalog(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let products = get_products(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(products))
}
