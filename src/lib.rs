//! HTTP proxy for the Albert Heijn product catalog.
//!
//! Two endpoints sit in front of a supermarket connector:
//!
//! - `GET /search?query=..&size=..&page=..` returns simplified price records
//! - `GET /categories` returns the retailer's category tree as-is
//!
//! # Pricing
//!
//! A "buy X, get Y free" promotion is approximated as half price:
//!
//! ```text
//! priceBeforeBonus:  €3.00
//! discountLabels[0]: DISCOUNT_X_PLUS_Y_FREE
//! ─────────────────────────
//! discounted_price:  €1.50
//! ```
//!
//! Every other promotion keeps the shelf price.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`connector`]: Connector trait, AH client, and mock
//! - [`pricing`]: Discount derivation and response records
//! - [`api`]: HTTP handlers and router
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod connector;
pub mod error;
pub mod metrics;
pub mod pricing;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
