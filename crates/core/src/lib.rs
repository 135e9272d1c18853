//! Tokoku Core - Domain types and in-memory stores.
//!
//! This crate provides everything the storefront needs that does not touch
//! the network or the session:
//! - `product` / `search` / `pagination` - catalog browsing
//! - `cart` / `wishlist` - per-visitor collections
//! - `review` - product reviews with ownership checks
//! - `auth` - the hardcoded demo accounts
//! - `admin` - sample dashboard data and its aggregates
//! - `checkout` - checkout form validation and order building
//!
//! # Architecture
//!
//! The core crate contains only types and plain `&mut self` stores - no I/O,
//! no HTTP clients, no locking. Callers decide where a store lives (session,
//! shared state, test) and how it is persisted.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod pagination;
pub mod product;
pub mod review;
pub mod search;
pub mod types;
pub mod validation;
pub mod wishlist;

pub use types::*;
