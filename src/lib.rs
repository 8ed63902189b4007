pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod registration;
pub mod ui;

pub use error::{AppError, Result};
