use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::{auth::extractors::IsUser, db_interaction::{create_bean_order, BeanOrderLine, CreateBeanOrderError}, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CartItem{
    pub id: String,
    pub quantity: i32
}

#[derive(Deserialize, Debug)]
pub struct BeanOrderJson{
    pub items: Vec<CartItem>,
    pub shipping_address: String
}

#[derive(Error)]
pub enum PostBeanOrderError{
    #[error("order must contain at least one item")]
    EmptyOrder,
    #[error("quantity for {0} must be a positive integer")]
    InvalidQuantity(String),
    #[error(transparent)]
    CreateOrderError(#[from] CreateBeanOrderError),
    #[error("Failed due to internal server error")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostBeanOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostBeanOrderError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            PostBeanOrderError::EmptyOrder
            | PostBeanOrderError::InvalidQuantity(_)
            | PostBeanOrderError::CreateOrderError(CreateBeanOrderError::UnknownProduct(_))
            | PostBeanOrderError::CreateOrderError(CreateBeanOrderError::InsufficientStock(_)) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            // Storage and threadpool failures stay opaque to the caller
            _ => HttpResponse::InternalServerError().body("Failed due to internal server error")
        }
    }
}

#[tracing::instrument(
    "Posting bean order",
    skip(pool, uid)
)]
pub async fn post_bean_order(
    pool: web::Data<DbPool>,
    json: web::Json<BeanOrderJson>,
    uid: IsUser
) -> Result<HttpResponse, PostBeanOrderError> {
    let json = json.into_inner();

    if json.items.is_empty() {
        return Err(PostBeanOrderError::EmptyOrder);
    }

    for item in json.items.iter() {
        if item.quantity < 1 {
            return Err(PostBeanOrderError::InvalidQuantity(item.id.clone()));
        }
    }

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let lines = json.items.iter()
        .map(|item| BeanOrderLine{
            product_id: item.id.clone(),
            quantity: item.quantity
        })
        .collect();

    let order = create_bean_order(conn, uid.0, lines, json.shipping_address).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Your bean order has been placed",
        "order": {
            "order_id": order.order_id,
            "user_id": order.user_id,
            "date": order.date,
            "items": json.items,
            "total_price": order.total_price,
            "shipping_address": order.shipping_address,
            "status": order.status
        }
    })))
}
