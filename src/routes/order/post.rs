use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::{auth::extractors::IsUser, db_interaction::{create_delivery_order, CreateDeliveryOrderError, DeliveryOrderRequest}, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct DeliveryOrderJson{
    pub time: String,
    pub size: String,
    pub beans: String,
    #[serde(default)]
    pub notes: Option<String>
}

#[derive(Error)]
pub enum PostDeliveryOrderError{
    #[error("beans must name a bean type")]
    MissingBeans,
    #[error(transparent)]
    CreateOrderError(#[from] CreateDeliveryOrderError),
    #[error("Failed due to internal server error")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostDeliveryOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostDeliveryOrderError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            PostDeliveryOrderError::MissingBeans
            | PostDeliveryOrderError::CreateOrderError(CreateDeliveryOrderError::OutOfStock(_)) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            // Storage and threadpool failures stay opaque to the caller
            _ => HttpResponse::InternalServerError().body("Failed due to internal server error")
        }
    }
}

#[tracing::instrument(
    "Posting delivery order",
    skip(pool, uid)
)]
pub async fn post_delivery_order(
    pool: web::Data<DbPool>,
    json: web::Json<DeliveryOrderJson>,
    uid: IsUser
) -> Result<HttpResponse, PostDeliveryOrderError> {
    let json = json.into_inner();

    if json.beans.trim().is_empty() {
        return Err(PostDeliveryOrderError::MissingBeans);
    }

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let order = create_delivery_order(
        conn,
        uid.0,
        DeliveryOrderRequest{
            time: json.time,
            size: json.size,
            beans: json.beans,
            notes: json.notes
        }
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Your delivery order has been placed",
        "order": order
    })))
}
