//! Authentication infrastructure module
//!
//! Decodes signed personalization tokens into customer group ids.

mod group_token;

pub use group_token::{GroupClaims, JwtGroupTokenDecoder};
