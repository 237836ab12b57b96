use std::{error::Error, fmt::Debug};

use chrono::Utc;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use thiserror::Error;

use crate::{models::{BeanOrder, BeanStock, DeliveryOrder, NewBeanOrderItem, NewDeliveryOrder, Product}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

// Delivery order request after payload validation; quantity is fixed at
// one cup per request
pub struct DeliveryOrderRequest{
    pub time: String,
    pub size: String,
    pub beans: String,
    pub notes: Option<String>
}

// One {product, quantity} line of a bean order
pub struct BeanOrderLine{
    pub product_id: String,
    pub quantity: i32
}

// Error associated with creating a delivery order
#[derive(Error)]
pub enum CreateDeliveryOrderError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("{0} is out of stock")]
    OutOfStock(String)
}

impl Debug for CreateDeliveryOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

/// Creates a delivery order and decrements the bean stock it draws from as
/// one transaction.
///
/// The stock row is read under `FOR UPDATE`, so two requests for the same
/// bean type are serialized and the second one sees the decremented count.
/// Any error rolls back both the decrement and the order insert.
#[tracing::instrument(
    "Creating delivery order and decrementing bean stock",
    skip_all
)]
pub async fn create_delivery_order(
    mut conn: DbConnection,
    user_id: i32,
    request: DeliveryOrderRequest
) -> Result<DeliveryOrder, CreateDeliveryOrderError> {

    let order = spawn_blocking_with_tracing(move || {
        use crate::schema::bean_inventory;
        use crate::schema::delivery_orders;

        conn.transaction::<DeliveryOrder, CreateDeliveryOrderError, _>(|conn|{
            let locked_stock = bean_inventory::table
                .filter(bean_inventory::name.eq(&request.beans))
                .for_update()
                .first::<BeanStock>(conn)
                .optional()?;

            match locked_stock {
                Some(ref stock) if stock.stock > 0 => (),
                _ => return Err(CreateDeliveryOrderError::OutOfStock(request.beans))
            }

            diesel::update(
                    bean_inventory::table.filter(bean_inventory::name.eq(&request.beans))
                )
                .set(bean_inventory::stock.eq(bean_inventory::stock - 1))
                .execute(conn)?;

            // `delivery_orders.id` comes from the table's sequence, which is
            // seeded at 1001 and safe under concurrent inserts
            let new_order = NewDeliveryOrder{
                user_id,
                date: Utc::now().format("%Y-%m-%d").to_string(),
                time: request.time,
                size: request.size,
                beans: request.beans,
                status: "pending".to_string(),
                notes: request.notes
            };

            let order = diesel::insert_into(delivery_orders::table)
                .values(&new_order)
                .get_result::<DeliveryOrder>(conn)?;

            Ok(order)
        })
    })
    .await??;

    Ok(order)
}

// Error associated with creating a bean order
#[derive(Error)]
pub enum CreateBeanOrderError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Product {0} does not exist")]
    UnknownProduct(String),
    #[error("Insufficient stock for {0}")]
    InsufficientStock(String)
}

impl Debug for CreateBeanOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

/// Creates a bean order from a list of line items.
///
/// Every product row in the list is locked `FOR UPDATE` before its stock is
/// checked; the first line that cannot be satisfied rejects the whole order.
/// The N stock decrements, the order row and the N line-item rows commit as
/// a single unit, so callers only ever observe the order fully applied or
/// fully absent.
#[tracing::instrument(
    "Creating bean order and decrementing product stock",
    skip_all
)]
pub async fn create_bean_order(
    mut conn: DbConnection,
    user_id: i32,
    lines: Vec<BeanOrderLine>,
    shipping_address: String
) -> Result<BeanOrder, CreateBeanOrderError> {

    let order = spawn_blocking_with_tracing(move || {
        use crate::schema::bean_order_items;
        use crate::schema::bean_orders;
        use crate::schema::products;

        conn.transaction::<BeanOrder, CreateBeanOrderError, _>(|conn|{
            let order_id = next_bean_order_id(conn)?;
            let mut total_price = 0;

            for line in lines.iter() {
                let product = products::table
                    .filter(products::id.eq(&line.product_id))
                    .for_update()
                    .first::<Product>(conn)
                    .optional()?;

                let product = match product {
                    Some(p) => p,
                    None => return Err(CreateBeanOrderError::UnknownProduct(line.product_id.clone()))
                };

                if product.stock < line.quantity {
                    return Err(CreateBeanOrderError::InsufficientStock(product.name));
                }

                total_price += product.price * line.quantity;

                diesel::update(products::table.filter(products::id.eq(&line.product_id)))
                    .set(products::stock.eq(products::stock - line.quantity))
                    .execute(conn)?;
            }

            let order = BeanOrder{
                order_id: order_id.clone(),
                user_id,
                date: Utc::now().format("%Y-%m-%d").to_string(),
                total_price,
                shipping_address,
                status: "paid".to_string()
            };

            diesel::insert_into(bean_orders::table)
                .values(&order)
                .execute(conn)?;

            for line in lines.iter() {
                let order_item = NewBeanOrderItem{
                    bean_order_id: order_id.clone(),
                    product_id: line.product_id.clone(),
                    quantity: line.quantity
                };

                diesel::insert_into(bean_order_items::table)
                    .values(order_item)
                    .execute(conn)?;
            }

            Ok(order)
        })
    })
    .await??;

    Ok(order)
}

// Draws the next order id from a dedicated sequence inside the caller's
// transaction, so concurrent orders can never collide on an id
fn next_bean_order_id(conn: &mut DbConnection) -> Result<String, diesel::result::Error> {
    let next: i64 = diesel::select(
            diesel::dsl::sql::<diesel::sql_types::BigInt>("nextval('bean_orders_order_id_seq')")
        )
        .get_result::<i64>(conn)?;

    Ok(format_bean_order_id(next))
}

fn format_bean_order_id(sequence_value: i64) -> String {
    format!("bo-{:03}", sequence_value)
}
