//! Hack or Snooze Authentication and Authorization
//!
//! This crate provides the `token` header scheme used by the API, the
//! same-user-or-staff authorization check, and password hashing for
//! signup and login.
//!
//! Tokens have the form `<username>:<hash>`, where `hash` is the first 12
//! hex characters of the MD5 digest of the username. Anyone who knows a
//! username can build its token; the scheme exists for teaching, not for
//! protecting anything.

pub mod authenticator;
pub mod error;
pub mod password;
pub mod principal;
pub mod token;

pub use authenticator::{TokenAuthenticator, Verification};
pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use principal::{Principal, authorize_same_user_or_staff};
pub use token::{AUTH_HEADER, check_token, generate_hash, generate_token, parse_token};
