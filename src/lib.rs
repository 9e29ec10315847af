pub mod config;
pub mod error;
pub mod ezygo;
pub mod models;
pub mod preferences;
pub mod projector;
pub mod render;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
