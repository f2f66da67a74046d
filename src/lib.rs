pub mod config;
pub mod error;
pub mod fallback;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
