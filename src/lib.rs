pub mod api;
pub mod client;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod models;
pub mod observability;
pub mod state;
