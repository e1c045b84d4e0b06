//! Free Fire player lookup.
//!
//! This module queries the upstream providers used by the `ffinfo` command
//! and renders their merged answer.
//!
//! # Modules
//!
//! - `requester` - HTTP client for the two profile providers and the outfit generator
//! - `response_structs` - Loosely typed provider responses
//! - `card` - Markdown report merging both providers

mod card;
mod requester;
mod response_structs;

pub use crate::freefire::card::render;
#[cfg(test)]
pub use crate::freefire::requester::MockPlayerRequester;
pub use crate::freefire::requester::{FreeFireRequester, PlayerRequester};
#[cfg(test)]
pub use crate::freefire::response_structs::{PlayerInfoResponse, ProfileResponse};
