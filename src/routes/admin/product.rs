use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde_json::json;

use crate::{auth::extractors::IsAdmin, db_interaction::{update_product, ProductUpdate, UpdateProductError}, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Updating product information",
    skip(pool)
)]
pub async fn patch_product(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    json: web::Json<ProductUpdate>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let product = update_product(conn, path.into_inner(), json.into_inner())
        .await
        .map_err(|e| match e {
            UpdateProductError::NoProductError(_) => ErrorNotFound(e),
            _ => ErrorInternalServerError(e)
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Product information updated successfully",
        "product": product
    })))
}
