//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod dump;
pub mod init;
pub mod status;
pub mod validate;
