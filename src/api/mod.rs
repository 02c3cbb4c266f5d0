// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    minting::{NftMetadata, NftProperties},
    models::{
        EligibilityResponse, ErrorResponse, GenerateImageRequest, MintVoucherRequest,
        SessionResponse, SessionUser, SignedPayload, SignedPayloadResponse, UriResponse,
        VoucherPayload,
    },
    state::AppState,
};

pub mod auth;
pub mod avatar;
pub mod eligibility;
pub mod extract;
pub mod health;
pub mod stability;
pub mod voucher;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Only the app's own origin may call the API with credentials.
fn cors_layer(app_url: &Url) -> CorsLayer {
    let origin = app_url.origin().ascii_serialization();
    match HeaderValue::from_str(&origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(_) => CorsLayer::new(),
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.app_url);

    let routes = Router::new()
        .route("/api/server", post(voucher::issue_voucher))
        .route("/api/stability", post(stability::generate_image))
        .route(
            "/api/eligibility/{address}",
            get(eligibility::check_eligibility),
        )
        .route("/api/avatar", post(avatar::upload_avatar))
        .route("/api/auth/signin", get(auth::signin))
        .route("/api/auth/callback/twitter", get(auth::callback))
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/signout", get(auth::signout).post(auth::signout))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    // Path only: query strings carry OAuth codes.
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        voucher::issue_voucher,
        stability::generate_image,
        eligibility::check_eligibility,
        avatar::upload_avatar,
        auth::signin,
        auth::callback,
        auth::session,
        auth::signout,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            MintVoucherRequest,
            SignedPayloadResponse,
            SignedPayload,
            VoucherPayload,
            NftMetadata,
            NftProperties,
            GenerateImageRequest,
            UriResponse,
            EligibilityResponse,
            SessionResponse,
            SessionUser,
            ErrorResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Minting", description = "Mint vouchers and eligibility"),
        (name = "Images", description = "Artwork generation and upload"),
        (name = "Auth", description = "Sign-in with Twitter/X"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
