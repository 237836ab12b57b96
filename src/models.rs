use diesel::prelude::{Insertable, Queryable};
use serde::Deserialize;
use serde::Serialize;

use crate::schema::{bean_inventory, bean_order_items, bean_orders, delivery_orders, products, users};

#[derive(Queryable, Clone)]
pub struct User{
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub preferred_beans: Option<String>,
    pub is_admin: bool
}

// `users.id` comes from the table's sequence, so inserts omit it
#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser{
    pub name: String,
    pub email: String,
    pub password: String,
    pub preferred_beans: Option<String>,
    pub is_admin: bool
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone)]
#[diesel(table_name = products)]
pub struct Product{
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub stock: i32,
    pub image_url: String
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone)]
#[diesel(table_name = bean_inventory)]
pub struct BeanStock{
    pub name: String,
    pub stock: i32
}

#[derive(Queryable, Serialize, Deserialize, Clone)]
pub struct DeliveryOrder{
    pub id: i32,
    pub user_id: i32,
    pub date: String,
    pub time: String,
    pub size: String,
    pub beans: String,
    pub status: String,
    pub notes: Option<String>
}

// `delivery_orders.id` is assigned by the database sequence (seeded at 1001)
#[derive(Insertable)]
#[diesel(table_name = delivery_orders)]
pub struct NewDeliveryOrder{
    pub user_id: i32,
    pub date: String,
    pub time: String,
    pub size: String,
    pub beans: String,
    pub status: String,
    pub notes: Option<String>
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone)]
#[diesel(table_name = bean_orders)]
pub struct BeanOrder{
    pub order_id: String,
    pub user_id: i32,
    pub date: String,
    pub total_price: i32,
    pub shipping_address: String,
    pub status: String
}

#[derive(Insertable)]
#[diesel(table_name = bean_order_items)]
pub struct NewBeanOrderItem{
    pub bean_order_id: String,
    pub product_id: String,
    pub quantity: i32
}

#[derive(Queryable, Serialize, Deserialize, Clone)]
pub struct BeanOrderItem{
    pub item_id: i32,
    pub bean_order_id: String,
    pub product_id: String,
    pub quantity: i32
}
