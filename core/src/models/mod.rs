//! Request and result records for every server operation.
//!
//! # Design
//! Field names are PascalCase on the wire. Optional request fields are
//! omitted when `None` so the backend applies its own defaults. Result
//! records default every field, since the backend leaves out empty values.
//!
//! The mock server defines its own copies of the few records it needs;
//! integration tests catch drift between the two.

pub mod account;
pub mod data;
pub mod inventory;
pub mod matchmaking;
pub mod statistics;

use serde::{Deserialize, Serialize};

pub use account::*;
pub use data::*;
pub use inventory::*;
pub use matchmaking::*;
pub use statistics::*;

/// Result of operations whose success payload is `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyResult {}
