//! Russian Town community client.
//!
//! Session handling, faction and forum directory caching, and the role-gated
//! admin console for the Russian Town RP server site.

pub mod access;
pub mod client;
pub mod config;
pub mod console;
pub mod directory;
pub mod errors;
pub mod forum;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;

pub use client::TownClient;
pub use config::Config;
pub use errors::{ClientError, FailureKind};
