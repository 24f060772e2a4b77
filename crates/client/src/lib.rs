//! DishDash client library.
//!
//! The application core of the DishDash food-delivery app: the static
//! catalog, the cart, order history, favorites, saved addresses and user
//! preferences, all persisted to a device key-value store, plus a
//! reverse-geocoding client. Front ends hold an [`state::AppState`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
