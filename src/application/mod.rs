pub mod background;
pub mod commands;
pub mod context;
pub mod dto;
pub mod error;
pub mod ports;
pub mod queries;
pub mod repository;
pub mod services;

pub use error::ApplicationResult;
