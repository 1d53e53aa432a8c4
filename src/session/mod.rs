//! Client session: who is signed in, and the cookies that remember it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The route guard reads the raw cookies to gate navigation. Views go through
//! `SessionStore` for identity and for an API client carrying the bearer.

pub mod cookies;
pub mod role;
pub mod snapshot;
pub mod store;

pub use cookies::{RawSession, SessionCookies};
pub use role::Role;
pub use snapshot::UserSnapshot;
pub use store::{AuthError, SessionStore, SignIn};
