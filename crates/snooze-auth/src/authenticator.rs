//! Token verification against the user store

use snooze_db::Database;
use tracing::debug;

use crate::error::AuthError;
use crate::principal::Principal;
use crate::token::parse_token;

/// Externally indistinguishable outcomes of verifying a token
///
/// Every failure becomes the same 401 response; the split only exists so
/// callers and tests can tell a badly shaped token from a well-formed one
/// that names nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Authenticated,
    Unauthenticated,
    Malformed,
}

impl Verification {
    /// Classify a verification result
    ///
    /// Returns `None` when the result is an infrastructure failure rather
    /// than an authentication outcome.
    pub fn of(result: &Result<Principal, AuthError>) -> Option<Self> {
        match result {
            Ok(_) => Some(Verification::Authenticated),
            Err(AuthError::MissingToken | AuthError::MalformedToken) => {
                Some(Verification::Malformed)
            }
            Err(AuthError::HashMismatch | AuthError::UnknownPrincipal) => {
                Some(Verification::Unauthenticated)
            }
            Err(_) => None,
        }
    }
}

/// Resolves `token` header values to principals
#[derive(Clone)]
pub struct TokenAuthenticator {
    db: Database,
}

impl TokenAuthenticator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Verify a presented token and resolve it to a principal
    ///
    /// A missing or empty token, a malformed token, a hash mismatch and an
    /// unknown username are all ordinary `Err` outcomes. A token for a
    /// username that does not exist fails exactly like a forged one.
    pub async fn verify(&self, token: Option<&str>) -> Result<Principal, AuthError> {
        let result = self.resolve(token).await;

        if let Err(e) = &result
            && e.is_unauthorized()
        {
            debug!("Token rejected: {}", e);
            metrics::counter!("snooze_auth_failures_total", "reason" => e.reason()).increment(1);
        }

        result
    }

    async fn resolve(&self, token: Option<&str>) -> Result<Principal, AuthError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let username = parse_token(token)?;

        let user = self
            .db
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UnknownPrincipal)?;

        debug!("Authenticated user: {} (staff: {})", user.username, user.is_staff);
        Ok(Principal::from(&user))
    }
}
