//! Command line client for the cloud resource provisioning API.
//!
//! # Modules
//!
//! - `actions`: command handlers
//! - `api`: HTTP implementation of the provisioning client
//! - `cli`: dispatch of a parsed command line
//! - `client`: the `CloudClient` abstraction and its errors
//! - `commands`: CLI command parsing
//! - `configuration`: persistent defaults for the global options
//! - `context`: settings and client handle shared by every layer
//! - `format`: table, JSON and CSV output
//! - `forms`: field steps and pipelines for each command
//! - `model`: data models for organizations, environments, assets and connections
//! - `ui`: interactive terminal screens

pub mod actions;
pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod configuration;
pub mod context;
pub mod error;
pub mod error_utils;
pub mod exit_codes;
pub mod format;
pub mod forms;
pub mod http_utils;
pub mod model;
pub mod param_utils;
pub mod ui;
pub mod view;
