//! Data models for the Russian Town client.
//!
//! Field names follow the JSON the auth, admin and forum services emit.

mod faction;
mod post;
mod profile;
mod role;
mod roster;
mod session;

pub use faction::*;
pub use post::*;
pub use profile::*;
pub use role::*;
pub use roster::*;
pub use session::*;
