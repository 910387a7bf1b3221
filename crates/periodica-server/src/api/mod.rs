//! HTTP API
//!
//! - `element` - Element catalog handlers
//! - `model` - Request and response types
//! - `route` - Route and extractor configuration

pub mod element;
pub mod model;
pub mod route;
