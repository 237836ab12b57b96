use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{auth::extractors::IsAdmin, db_interaction::{update_bean_order_status, update_delivery_order_status, UpdateOrderStatusError}, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryOrderStatus{
    Pending,
    Delivered,
    Cancelled
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum BeanOrderStatus{
    Paid,
    Shipped,
    Delivered
}

#[derive(Deserialize, Debug)]
pub struct DeliveryStatusUpdateJson{
    pub status: DeliveryOrderStatus
}

#[derive(Deserialize, Debug)]
pub struct BeanStatusUpdateJson{
    pub status: BeanOrderStatus
}

fn status_update_error(e: UpdateOrderStatusError) -> actix_web::Error {
    match e {
        UpdateOrderStatusError::NoOrderIdError(_) => ErrorNotFound(e),
        _ => ErrorInternalServerError(e)
    }
}

#[tracing::instrument(
    "Updating delivery order status",
    skip(pool)
)]
pub async fn patch_delivery_order_status(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    json: web::Json<DeliveryStatusUpdateJson>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    update_delivery_order_status(conn, json.0.status, path.into_inner())
        .await
        .map_err(status_update_error)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Delivery order status updated successfully"
    })))
}

#[tracing::instrument(
    "Updating bean order status",
    skip(pool)
)]
pub async fn patch_bean_order_status(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    json: web::Json<BeanStatusUpdateJson>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    update_bean_order_status(conn, json.0.status, path.into_inner())
        .await
        .map_err(status_update_error)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Bean order status updated successfully"
    })))
}
