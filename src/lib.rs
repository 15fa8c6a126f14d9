//! Field builder: define a multi-select field, build its choice list and
//! submit the definition to a remote endpoint.

pub mod builder;
pub mod cli;
pub mod config;
pub mod models;
pub mod tui;
