pub mod auth;
pub mod blobs;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod timefmt;
pub mod workflow;
