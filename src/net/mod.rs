//! Networking: the remote API client and its wire types.

pub mod api;
pub mod types;
