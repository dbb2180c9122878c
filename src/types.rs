use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The claims carried inside a compact signed token.
///
/// `exp` is mandatory; a token without it never verifies. Everything else the
/// issuer put in the payload is preserved in `extra`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claims {
    /// Expiry instant, in seconds since the Unix epoch. Verification rejects
    /// any token whose expiry is not in the future.
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Additional fields carried by the token, round-tripped untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Claims with no subject and no extra fields, expiring `lifetime` from now.
    pub fn expiring_in(lifetime: Duration) -> Self {
        let exp = (SystemTime::now() + lifetime)
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        Self {
            exp,
            sub: None,
            extra: Map::new(),
        }
    }
}
