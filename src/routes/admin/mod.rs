pub mod status;

mod inventory;
mod orders;
mod product;

pub use inventory::*;
pub use orders::*;
pub use product::*;
