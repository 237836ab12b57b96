mod orders;
mod order_history;
mod inventory;
mod user;

pub use orders::*;
pub use order_history::*;
pub use inventory::*;
pub use user::*;
