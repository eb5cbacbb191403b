//! Token derivation and parsing

use md5::{Digest, Md5};

use crate::error::AuthError;

/// Request header carrying the token
pub const AUTH_HEADER: &str = "token";

/// Number of hex characters of the digest kept in a token
const HASH_LENGTH: usize = 12;

/// Truncated hex MD5 digest of a username
pub fn generate_hash(username: &str) -> String {
    let digest = Md5::digest(username.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(HASH_LENGTH);
    hash
}

/// Build the token for a username: `<username>:<hash>`
pub fn generate_token(username: &str) -> String {
    format!("{}:{}", username, generate_hash(username))
}

/// Check a token's shape and hash, returning the username it names
///
/// The token must split on `:` into exactly two non-empty parts, and the
/// second must equal the hash of the first (exact, case-sensitive).
pub fn parse_token(token: &str) -> Result<&str, AuthError> {
    let mut parts = token.split(':');
    let (Some(username), Some(hash), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthError::MalformedToken);
    };

    if username.is_empty() || hash.is_empty() {
        return Err(AuthError::MalformedToken);
    }

    if generate_hash(username) != hash {
        return Err(AuthError::HashMismatch);
    }

    Ok(username)
}

/// Whether a token is well-formed and its hash matches
pub fn check_token(token: Option<&str>) -> bool {
    token.is_some_and(|t| parse_token(t).is_ok())
}
