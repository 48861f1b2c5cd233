pub mod product;
pub mod production;

pub use product::Product;
pub use production::{Production, ProductionStatus, ProductionView};
