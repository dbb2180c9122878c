use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::json;
use token_qr_for_warp::{Claims, Gate, GateConfig};

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn claims(sub: &str, exp: u64) -> Claims {
    Claims {
        exp,
        sub: Some(sub.into()),
        extra: serde_json::Map::new(),
    }
}

#[test]
fn round_trip_preserves_claims() {
    let gate = Gate::new(GateConfig::new("s3cr3t"));

    let mut wanted = claims("u1", unix_now() + 3600);
    wanted.extra.insert("role".into(), json!("admin"));

    let token = gate.issue_token(&wanted).unwrap();
    let got = gate.verify_token(&token).unwrap();

    assert_eq!(got.sub.as_deref(), Some("u1"));
    assert_eq!(got.exp, wanted.exp);
    assert_eq!(got.extra["role"], json!("admin"));
}

#[test]
fn different_secret_is_rejected() {
    let issuer = Gate::new(GateConfig::new("s3cr3t"));
    let verifier = Gate::new(GateConfig::new("other"));

    let token = issuer.issue_token(&claims("u1", unix_now() + 3600)).unwrap();

    assert!(verifier.verify_token(&token).is_err());
}

#[test]
fn expired_token_is_rejected_despite_valid_signature() {
    let gate = Gate::new(GateConfig::new("s3cr3t"));

    let token = gate.issue_token(&claims("u1", unix_now() - 60)).unwrap();

    assert!(gate.verify_token(&token).is_err());
}

#[test]
fn leeway_admits_a_just_expired_token() {
    let mut config = GateConfig::new("s3cr3t");
    config.token_leeway = Duration::from_secs(120);
    let gate = Gate::new(config);

    let token = gate.issue_token(&claims("u1", unix_now() - 60)).unwrap();

    assert!(gate.verify_token(&token).is_ok());
}

#[test]
fn malformed_tokens_are_rejected_without_panicking() {
    let gate = Gate::new(GateConfig::new("s3cr3t"));

    for garbage in ["", "x", "a.b", "a.b.c.d", "not base64 at all", "🦀.🦀.🦀"] {
        assert!(gate.verify_token(garbage).is_err(), "accepted {garbage:?}");
    }
}

#[test]
fn missing_expiry_claim_is_rejected() {
    let gate = Gate::new(GateConfig::new("s3cr3t"));

    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({ "sub": "u1" }),
        &jsonwebtoken::EncodingKey::from_secret(b"s3cr3t"),
    )
    .unwrap();

    assert!(gate.verify_token(&token).is_err());
}

#[test]
fn empty_secret_fails_closed() {
    let gate = Gate::new(GateConfig::new(""));

    // Even a token signed with the matching empty secret must be refused.
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({ "sub": "u1", "exp": unix_now() + 3600 }),
        &jsonwebtoken::EncodingKey::from_secret(b""),
    )
    .unwrap();

    assert!(gate.verify_token(&token).is_err());
    assert!(gate.issue_token(&claims("u1", unix_now() + 3600)).is_err());
}
