//! Quiz model, validation, scoring and session handling.
//!
//! This crate holds everything the delivery front and the CLI share: the
//! quiz record and its parser, the directory-backed store, the scoring
//! rules, the session service and result persistence.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod results;
pub mod scoring;
pub mod session;
pub mod store;
