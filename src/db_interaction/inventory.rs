use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{models::{BeanStock, Product}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

#[tracing::instrument(
    "Getting product catalog from db",
    skip_all
)]
pub async fn get_products(
    mut conn: DbConnection
) -> Result<Vec<Product>, anyhow::Error>{
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::products;

        products::table
            .load::<Product>(&mut conn)
            .context("Failed to get products")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Bean types with stock remaining, offered to the delivery order form
#[tracing::instrument(
    "Getting in-stock delivery beans from db",
    skip_all
)]
pub async fn get_available_bean_stock(
    mut conn: DbConnection
) -> Result<Vec<BeanStock>, anyhow::Error>{
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bean_inventory;

        bean_inventory::table
            .filter(bean_inventory::stock.gt(0))
            .load::<BeanStock>(&mut conn)
            .context("Failed to get bean inventory")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Full stock picture for the admin dashboard, both order flows
#[derive(Serialize, Deserialize)]
pub struct AllInventory{
    pub roasted_beans: Vec<Product>,
    pub delivery_beans: Vec<BeanStock>
}

#[tracing::instrument(
    "Getting all inventory from db",
    skip_all
)]
pub async fn get_all_inventory(
    mut conn: DbConnection
) -> Result<AllInventory, anyhow::Error>{
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::bean_inventory;
        use crate::schema::products;

        let roasted_beans = products::table
            .load::<Product>(&mut conn)
            .context("Failed to get products")?;

        let delivery_beans = bean_inventory::table
            .load::<BeanStock>(&mut conn)
            .context("Failed to get bean inventory")?;

        Ok::<AllInventory, anyhow::Error>(AllInventory{ roasted_beans, delivery_beans })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Fields of a product an admin may change; absent fields keep their value
#[derive(Deserialize, Debug, Clone)]
pub struct ProductUpdate{
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub stock: Option<i32>
}

// Error associated with updating product information
#[derive(Error)]
pub enum UpdateProductError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("product: {0} doesn't exist")]
    NoProductError(String)
}

impl Debug for UpdateProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Updating product information",
    skip(conn)
)]
pub async fn update_product(
    mut conn: DbConnection,
    product_id: String,
    update: ProductUpdate
) -> Result<Product, UpdateProductError> {

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::products;

        // An empty patch is a plain read; diesel rejects a changeset with
        // no fields
        if update.name.is_none() && update.description.is_none()
            && update.price.is_none() && update.stock.is_none() {
            return products::table
                .filter(products::id.eq(&product_id))
                .first::<Product>(&mut conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => UpdateProductError::NoProductError(product_id),
                    other => UpdateProductError::RunQueryError(other)
                });
        }

        let changes = (
            update.name.map(|v| products::name.eq(v)),
            update.description.map(|v| products::description.eq(v)),
            update.price.map(|v| products::price.eq(v)),
            update.stock.map(|v| products::stock.eq(v))
        );

        diesel::update(products::table.filter(products::id.eq(&product_id)))
            .set(changes)
            .get_result::<Product>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => UpdateProductError::NoProductError(product_id),
                other => UpdateProductError::RunQueryError(other)
            })
    })
    .await??;

    Ok(res)
}
