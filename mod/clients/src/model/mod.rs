pub mod client;
pub mod menu;
pub mod pet;

pub use client::Client;
pub use menu::{Menu, MenuItem};
pub use pet::Pet;
