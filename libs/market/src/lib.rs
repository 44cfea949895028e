//! Marketplace domain for AgriBuyX
//!
//! Typed records for every table, plus the rules the storefront and the
//! back-office share: catalog filtering and reveal windows, the three-step
//! product form, blog slugs, vendor invite tokens, social link settings and
//! support triage. Nothing in here talks to the network; storage is reached
//! through [`store::ProductStore`].

pub mod admin;
pub mod blog;
pub mod catalog;
pub mod detail;
pub mod draft;
pub mod error;
pub mod invite;
pub mod models;
pub mod session;
pub mod settings;
pub mod store;
pub mod support;
pub mod validation;

pub use error::{MarketError, MarketResult};
