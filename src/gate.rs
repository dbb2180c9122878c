use std::{env, sync::Arc, time::Duration};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error};

use crate::{
    error::GateError,
    qr::{self, QrOptions},
    types::Claims,
};

/// Name of the environment variable [`GateConfig::from_env`] reads.
pub const SECRET_ENV_VAR: &str = "JWT_SECRET";

#[derive(Clone)]
pub struct GateConfig {
    /// The secret used to sign and verify tokens (HMAC-SHA256).
    /// If the secret changes, all previously-issued tokens stop verifying.
    /// An empty secret is a configuration error: verification fails closed.
    pub token_secret: String,
    /// Clock-skew tolerance applied to the expiry check. Zero by default, so
    /// a token is rejected the moment its `exp` instant passes.
    pub token_leeway: Duration,
    /// Rendering options for the QR image produced for a verified token.
    pub qr: QrOptions,
}

impl GateConfig {
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_leeway: Duration::ZERO,
            qr: QrOptions::default(),
        }
    }

    /// Load the secret from the `JWT_SECRET` environment variable.
    ///
    /// A missing variable is diagnosed loudly here, once, and every later
    /// verification against the resulting config is rejected. The secret
    /// itself is never logged.
    pub fn from_env() -> Self {
        let token_secret = env::var(SECRET_ENV_VAR).unwrap_or_else(|_| {
            error!("{SECRET_ENV_VAR} environment variable is not set; all tokens will be rejected");
            String::new()
        });

        Self::new(token_secret)
    }
}

pub(crate) struct GateInternal {
    config: GateConfig,
}

impl GateInternal {
    pub fn issue_token(&self, claims: &Claims) -> Result<String, GateError> {
        if self.config.token_secret.is_empty() {
            return Err(GateError::SecretNotConfigured);
        }

        let token = encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.config.token_secret.as_ref()),
        )?;

        Ok(token)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, GateError> {
        if self.config.token_secret.is_empty() {
            error!("token secret is not configured, rejecting verification");
            return Err(GateError::InvalidToken);
        }

        let mut validation = Validation::default();
        validation.leeway = self.config.token_leeway.as_secs();

        // The reason for a rejection is logged but never returned: callers
        // must not be able to distinguish a bad signature from an expired
        // claim or a malformed token.
        let token = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.token_secret.as_ref()),
            &validation,
        )
        .map_err(|err| {
            debug!(reason = %err, "token verification failed");
            GateError::InvalidToken
        })?;

        Ok(token.claims)
    }

    pub fn render_qr(&self, payload: &str) -> Result<String, GateError> {
        qr::encode_data_uri(payload, &self.config.qr)
    }
}

/// The verification and issuance boundary: a shared, read-only handle over
/// the configured secret. Cheap to clone; safe to use concurrently, since
/// verification and rendering are pure functions of their inputs plus the
/// immutable config.
#[derive(Clone)]
pub struct Gate {
    pub(crate) internal: Arc<GateInternal>,
}

impl Gate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            internal: Arc::new(GateInternal { config }),
        }
    }

    /// Validate a compact signed token and return its decoded claims.
    ///
    /// Checks the HMAC-SHA256 signature in constant time and requires the
    /// `exp` claim to be in the future. All failures yield the same opaque
    /// [`GateError::InvalidToken`].
    pub fn verify_token(&self, token: &str) -> Result<Claims, GateError> {
        self.internal.verify_token(token)
    }

    /// Sign a set of claims with the configured secret.
    pub fn issue_token(&self, claims: &Claims) -> Result<String, GateError> {
        self.internal.issue_token(claims)
    }

    /// Render arbitrary text as a PNG QR code wrapped in a data URI, using
    /// the configured rendering options.
    pub fn render_qr(&self, payload: &str) -> Result<String, GateError> {
        self.internal.render_qr(payload)
    }
}
