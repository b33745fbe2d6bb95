pub mod config;
pub mod crop_service;
pub mod error;
