pub mod app;
pub mod caption_client;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod image;
pub mod session;
pub mod status;
