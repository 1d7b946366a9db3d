//! Command implementations for the CLI
//!
//! - start: Start the pricing API server
//! - calculate: Run one calculation from a JSON input
//! - test: Test configuration validity
//! - config: Configuration display and validation

pub mod calculate;
pub mod config;
pub mod start;
