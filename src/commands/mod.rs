//! Command implementations for the CLI
//!
//! - start: Start the site server
//! - reload: Reload configuration of a running server
//! - test: Test configuration validity
//! - config: Configuration display and validation
//! - quote: Price a job offline
//! - contact: Exercise the phone reveal from the client side

pub mod config;
pub mod contact;
pub mod quote;
pub mod reload;
pub mod start;
