//! DishDash Core - Shared domain types.
//!
//! This crate provides the types shared by every DishDash component:
//! - `client` - Application core (storage, cart, orders, favorites, addresses)
//! - `cli` - Command-line front end over the client
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, phone numbers, coordinates,
//!   language codes, and order/payment statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
