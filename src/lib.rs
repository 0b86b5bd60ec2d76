//! Outfit recommendation service
//!
//! Combines a user's wardrobe into ranked outfit candidates under explicit
//! filters, current weather, or an event type.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
