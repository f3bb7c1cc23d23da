use serde::{Deserialize, Serialize};

/// Body returned by the registry auth service.
///
/// Only `token` is read; `access_token`, `expires_in` and `issued_at` are
/// ignored because tokens are never reused across scrapes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}
