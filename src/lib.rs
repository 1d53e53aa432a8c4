//! PubliFlow gateway: session cookies, route guarding and thin views over the
//! remote PubliFlow API.
//!
//! ARCHITECTURE
//! ============
//! `guard` decides every navigation from the raw session cookies alone.
//! `session` owns sign-in, sign-out and rehydration and is the only writer
//! of the cookies and of the API client's bearer header. `routes` wires both
//! into an Axum router next to the feed, dashboard, editor and profile views.

pub mod config;
pub mod guard;
pub mod net;
pub mod routes;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_support;
