//! # HTTP API
//!
//! Route groups mounted under `/api/v1`.

pub mod feed;
