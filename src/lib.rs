pub mod api;
pub mod config;
pub mod error;
pub mod fare;
pub mod geo;
pub mod models;
pub mod notify;
pub mod observability;
pub mod routing;
pub mod state;
pub mod workflow;
