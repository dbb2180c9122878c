use std::{convert::Infallible, sync::Arc};

use serde::{Deserialize, Serialize};
use warp::{hyper::StatusCode, path, Filter, Rejection, Reply};

use crate::{
    error::GateError,
    gate::{Gate, GateInternal},
    types::Claims,
};

/// The verification endpoint: `POST /api/verify-jwt` with a JSON body of the
/// form `{"token": "<compact signed token>"}`. A valid token is answered
/// with its decoded claims and a QR rendering of the token itself.
pub fn build_api_route_filter(
    gate: &Gate,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    path!("api" / "verify-jwt")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_gate_state(gate.internal.clone()))
        .and_then(verify_and_render)
}

/// Guard a route with the gate's verifier: extracts the claims of a valid
/// `Authorization: Bearer <token>` header, or rejects.
pub fn with_verified_claims(
    gate: &Gate,
) -> impl Filter<Extract = (Claims,), Error = Rejection> + Clone {
    warp::header("authorization")
        .and(with_gate_state(gate.internal.clone()))
        .and_then(bearer_check)
}

pub async fn handle_gate_errors(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(gate_error) = err.find::<GateError>() {
        let status = match gate_error {
            GateError::MissingToken => StatusCode::BAD_REQUEST,
            GateError::InvalidToken => StatusCode::UNAUTHORIZED,
            GateError::PayloadTooLarge | GateError::UnsupportedPayload => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Only errors carrying no secret material surface their own message.
        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_owned()
        } else {
            gate_error.to_string()
        };

        return Ok(warp::reply::with_status(
            warp::reply::json(&VerifyFailure {
                valid: false,
                error,
            }),
            status,
        ));
    }

    // An unreadable body is the same client error as a missing token.
    if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        return Ok(warp::reply::with_status(
            warp::reply::json(&VerifyFailure {
                valid: false,
                error: GateError::MissingToken.to_string(),
            }),
            StatusCode::BAD_REQUEST,
        ));
    }

    Err(err)
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub payload: Claims,
    pub qr_code: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyFailure {
    pub valid: bool,
    pub error: String,
}

async fn verify_and_render(
    input: VerifyQuery,
    gate: Arc<GateInternal>,
) -> Result<impl Reply, Rejection> {
    if input.token.trim().is_empty() {
        Err(GateError::MissingToken)?;
    }

    // Verify first; the encoder is never reached for an invalid token.
    let payload = gate.verify_token(&input.token)?;
    let qr_code = gate.render_qr(&input.token)?;

    Ok(warp::reply::json(&VerifyResponse {
        valid: true,
        payload,
        qr_code,
    }))
}

// Unwrap the bearer token and validate it
async fn bearer_check(header: String, gate: Arc<GateInternal>) -> Result<Claims, Rejection> {
    let token = strip_bearer(&header).ok_or(GateError::InvalidToken)?;

    let claims = gate.verify_token(token)?;

    Ok(claims)
}

// The scheme is matched case-insensitively, per RFC 6750.
fn strip_bearer(header: &str) -> Option<&str> {
    const SCHEME: &str = "bearer ";

    let prefix = header.get(..SCHEME.len())?;

    if prefix.eq_ignore_ascii_case(SCHEME) {
        Some(&header[SCHEME.len()..])
    } else {
        None
    }
}

// functor that adds a reference to the internal gate state into the filter chain
fn with_gate_state(
    gate: Arc<GateInternal>,
) -> impl Filter<Extract = (Arc<GateInternal>,), Error = Infallible> + Clone {
    warp::any().map(move || gate.clone())
}
