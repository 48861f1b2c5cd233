pub mod ingredient;
pub mod movement;

pub use ingredient::{Ingredient, IngredientView};
pub use movement::{InventoryMovement, MovementType};
