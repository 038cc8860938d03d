//! REST API layer

pub mod dto;
pub mod error;
pub mod handlers;
pub mod mapper;
pub mod rate_limit;
pub mod routes;

pub use routes::{register_routes, ApiDoc};
