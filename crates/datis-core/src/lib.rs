//! Core domain + application logic for the D-ATIS relay bot.
//!
//! This crate is framework-agnostic. The upstream HTTP API and Telegram live
//! behind ports (traits) implemented in adapter crates.

pub mod callback;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod report;
pub mod resolver;
pub mod service;
pub mod stations;

pub use errors::{Error, FetchError, Result};
