use std::collections::HashMap;

use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde_json::json;

use crate::{db_interaction::get_available_bean_stock, utils::{get_pooled_connection, DbPool}};

// Shop info is fixed; the delivery bean inventory comes from the database
// and only lists bean types with stock remaining
#[tracing::instrument(
    "Get shop settings",
    skip(pool)
)]
pub async fn get_settings(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let bean_inventory: HashMap<String, i32> = get_available_bean_stock(conn)
        .await
        .map_err(ErrorInternalServerError)?
        .into_iter()
        .map(|bean| (bean.name, bean.stock))
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "coffee_shop": {
            "name": "Office Coffee Delivery",
            "address": "Office Building 3F",
            "contact": "080-1234-5678"
        },
        "operational_hours": {
            "start": "09:00",
            "end": "18:00"
        },
        "bean_inventory": bean_inventory
    })))
}
