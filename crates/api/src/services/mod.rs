//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Demo account login and bearer token resolution
//! - `token` - JWT signing and verification
//! - `catalog` - Product listing, search, lookup and categories
//! - `cart` - Shared cart mutations and the enriched cart view
//! - `orders` - Order placement and history
//!
//! Services are cheap to construct per request and borrow the store from
//! [`AppState`](crate::state::AppState). Reads that can degrade do so to an
//! empty result and log a warning; writes return a typed error.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod token;
