use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{Connection, ExpressionMethods, JoinOnDsl, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{models::{BeanOrder, DeliveryOrder}, routes::admin::status::{BeanOrderStatus, DeliveryOrderStatus}, schema::{bean_orders, delivery_orders, users}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

// Both order flows of one user, as returned by /orders/me
#[derive(Serialize, Deserialize)]
pub struct OrderHistory{
    pub delivery_orders: Vec<DeliveryOrder>,
    pub bean_orders: Vec<BeanOrder>
}

#[tracing::instrument(
    "Getting order history of user",
    skip(conn)
)]
pub async fn get_orders_for_user(
    mut conn: DbConnection,
    user_id: i32
) -> Result<OrderHistory, anyhow::Error> {

    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<OrderHistory, anyhow::Error, _>(|conn| {
            let delivery = delivery_orders::table
                .filter(delivery_orders::user_id.eq(user_id))
                .load::<DeliveryOrder>(conn)
                .context("Failed to load delivery orders")?;

            let beans = bean_orders::table
                .filter(bean_orders::user_id.eq(user_id))
                .load::<BeanOrder>(conn)
                .context("Failed to load bean orders")?;

            Ok(OrderHistory{ delivery_orders: delivery, bean_orders: beans })
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Delivery order row joined with the name of the customer who placed it
#[derive(Serialize, Deserialize)]
pub struct DeliveryOrderWithCustomer{
    pub id: i32,
    pub user_id: i32,
    pub date: String,
    pub time: String,
    pub size: String,
    pub beans: String,
    pub status: String,
    pub notes: Option<String>,
    pub customer_name: String
}

// Bean order row joined with the name of the customer who placed it
#[derive(Serialize, Deserialize)]
pub struct BeanOrderWithCustomer{
    pub order_id: String,
    pub user_id: i32,
    pub date: String,
    pub total_price: i32,
    pub shipping_address: String,
    pub status: String,
    pub customer_name: String
}

#[derive(Serialize, Deserialize)]
pub struct AllOrders{
    pub delivery_orders: Vec<DeliveryOrderWithCustomer>,
    pub bean_orders: Vec<BeanOrderWithCustomer>
}

#[tracing::instrument(
    "Getting all orders with customer names",
    skip_all
)]
pub async fn get_all_orders(
    mut conn: DbConnection
) -> Result<AllOrders, anyhow::Error> {

    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<AllOrders, anyhow::Error, _>(|conn| {
            let delivery = delivery_orders::table
                .inner_join(users::table.on(users::id.eq(delivery_orders::user_id)))
                .select((delivery_orders::all_columns, users::name))
                .load::<(DeliveryOrder, String)>(conn)
                .context("Failed to load delivery orders")?
                .into_iter()
                .map(|(order, customer_name)| DeliveryOrderWithCustomer{
                    id: order.id,
                    user_id: order.user_id,
                    date: order.date,
                    time: order.time,
                    size: order.size,
                    beans: order.beans,
                    status: order.status,
                    notes: order.notes,
                    customer_name
                })
                .collect();

            let beans = bean_orders::table
                .inner_join(users::table.on(users::id.eq(bean_orders::user_id)))
                .select((bean_orders::all_columns, users::name))
                .load::<(BeanOrder, String)>(conn)
                .context("Failed to load bean orders")?
                .into_iter()
                .map(|(order, customer_name)| BeanOrderWithCustomer{
                    order_id: order.order_id,
                    user_id: order.user_id,
                    date: order.date,
                    total_price: order.total_price,
                    shipping_address: order.shipping_address,
                    status: order.status,
                    customer_name
                })
                .collect();

            Ok(AllOrders{ delivery_orders: delivery, bean_orders: beans })
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Error associated with updating order status
#[derive(Error)]
pub enum UpdateOrderStatusError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("order_id: {0} doesn't exist")]
    NoOrderIdError(String)
}

impl Debug for UpdateOrderStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Function to update the status of a delivery order
pub async fn update_delivery_order_status(
    mut conn: DbConnection,
    status: DeliveryOrderStatus,
    order_id: i32
) -> Result<(), UpdateOrderStatusError> {

    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<(), UpdateOrderStatusError, _>(|conn| {
            let status = match status {
                DeliveryOrderStatus::Pending => "pending",
                DeliveryOrderStatus::Delivered => "delivered",
                DeliveryOrderStatus::Cancelled => "cancelled"
            }.to_string();

            let affected_rows = diesel::update(delivery_orders::table)
                                    .filter(delivery_orders::id.eq(order_id))
                                    .set(delivery_orders::status.eq(status))
                                    .execute(conn)?;

            if affected_rows == 0 {
                return Err(UpdateOrderStatusError::NoOrderIdError(order_id.to_string()))
            }

            Ok(())
        })
    })
    .await??;

    Ok(res)
}

// Function to update the status of a bean order
pub async fn update_bean_order_status(
    mut conn: DbConnection,
    status: BeanOrderStatus,
    order_id: String
) -> Result<(), UpdateOrderStatusError> {

    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<(), UpdateOrderStatusError, _>(|conn| {
            let status = match status {
                BeanOrderStatus::Paid => "paid",
                BeanOrderStatus::Shipped => "shipped",
                BeanOrderStatus::Delivered => "delivered"
            }.to_string();

            let affected_rows = diesel::update(bean_orders::table)
                                    .filter(bean_orders::order_id.eq(&order_id))
                                    .set(bean_orders::status.eq(status))
                                    .execute(conn)?;

            if affected_rows == 0 {
                return Err(UpdateOrderStatusError::NoOrderIdError(order_id))
            }

            Ok(())
        })
    })
    .await??;

    Ok(res)
}
