pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod high_score;
pub mod models;
pub mod routes;
pub mod score_client;
pub mod setup;
pub mod state;
