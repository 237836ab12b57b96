pub mod authentication;
pub mod profile;
pub mod order;
pub mod bean_order;
pub mod admin;

mod health_check;
mod products;
mod settings;

pub use health_check::*;
pub use products::*;
pub use settings::*;
