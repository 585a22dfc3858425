//! Core domain types and logic.

pub mod ohlcv;
pub mod alignment;
pub mod indicator;
pub mod metrics;
pub mod strategy;
pub mod config_validation;
pub mod simulator;
pub mod error;
