use warp::reject::Reject;

#[derive(thiserror::Error, Debug)]
pub enum GateError {
    #[error("token is required")]
    MissingToken,
    /// Every authentication failure (bad signature, expired claim, malformed
    /// segments) collapses into this one variant, so a caller cannot tell
    /// which check rejected the token.
    #[error("invalid token")]
    InvalidToken,
    #[error("token secret is not configured")]
    SecretNotConfigured,
    #[error("payload too long to fit a QR code at this error-correction level")]
    PayloadTooLarge,
    #[error("payload cannot be represented in the selected QR encoding")]
    UnsupportedPayload,
    #[error("error signing token")]
    SigningError {
        #[from]
        source: jsonwebtoken::errors::Error,
    },
    #[error("error rasterizing QR image")]
    ImageError {
        #[from]
        source: image::ImageError,
    },
}

impl Reject for GateError {}
