//! Command-line access to the analytics dashboard's saved filter state.

pub mod commands;
pub mod config;
pub mod logging;
