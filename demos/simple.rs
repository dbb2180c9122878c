use std::{net::SocketAddr, time::Duration};

use serde_json::json;
use token_qr_for_warp::{
    build_api_route_filter, handle_gate_errors, with_verified_claims, Claims, Gate, GateConfig,
    DOWNLOAD_FILENAME,
};
use tracing::{info, warn};
use warp::{path, Filter};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let gate = Gate::new(GateConfig::from_env());

    // A throwaway token so the endpoint can be exercised straight away.
    match gate.issue_token(&Claims {
        sub: Some("demo".into()),
        ..Claims::expiring_in(Duration::from_secs(60 * 60))
    }) {
        Ok(token) => info!(%token, "issued a demo token valid for one hour"),
        Err(err) => warn!(error = %err, "could not issue a demo token"),
    }

    let api_routes = build_api_route_filter(&gate);

    let homepage = warp::path::end().then(|| async move {
        warp::reply::html(format!(
            "<h1>QR Code Generator</h1>\
             <p>POST {{\"token\": \"...\"}} to /api/verify-jwt to verify a token \
             and receive it back as a scannable QR code. Save the returned \
             image as {DOWNLOAD_FILENAME}.</p>"
        ))
    });

    let secure_page = path!("whoami")
        .and(with_verified_claims(&gate))
        .then(|claims: Claims| async move { warp::reply::json(&json!({ "claims": claims })) });

    let all_routes = homepage
        .or(secure_page)
        .or(api_routes)
        .recover(handle_gate_errors);

    info!("listening on 127.0.0.1:4000");

    warp::serve(all_routes)
        .run("127.0.0.1:4000".parse::<SocketAddr>().unwrap())
        .await;
}
