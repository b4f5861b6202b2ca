pub mod config;
pub mod crux;
pub mod error;
pub mod handlers;
pub mod insights;
pub mod models;
pub mod state;
pub mod view;
