//! Domain models for the API.
//!
//! These types mirror the documents kept in the store; the JSON shape of each
//! model is also the shape served to clients.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{CartEntry, EnrichedCartLine};
pub use order::{Order, OrderLine};
pub use product::Product;

/// Authenticated principal resolved from a bearer token.
///
/// Not persisted; carries the token's `sub` claim only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}
