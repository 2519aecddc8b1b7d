pub mod analysis;
pub mod batch;
pub mod budget;
pub mod error;
pub mod filter;
pub mod generator;
pub mod models;
pub mod numbers;
pub mod pricing;
pub mod stats;

pub use error::ConfigError;
