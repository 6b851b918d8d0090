//! `stockroom-auth`: who is acting, and whether they may.
//!
//! Authentication (tokens, sessions) happens elsewhere; this crate only models
//! the pre-authenticated actor and the binary admin/user policy.

pub mod authorize;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, Action, AuthzError};
pub use principal::Actor;
pub use roles::Role;
