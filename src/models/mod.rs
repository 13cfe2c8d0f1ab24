//! Data models for the SARI portal API

mod databases;
mod db_config;

pub use databases::*;
pub use db_config::*;
