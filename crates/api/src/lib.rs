//! HTTP surface of the charity platform: routing, handlers and the
//! service layer between them and the repositories.

mod docs;
mod error;
mod state;
mod util;

pub mod routes;
pub mod services;

pub use docs::ApiDoc;
pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth routes
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/verify", post(routes::auth::verify_token))
        .route("/api/ngo/register", post(routes::auth::register_ngo))
        // Campaign routes
        .route(
            "/api/campaigns",
            get(routes::campaigns::list_campaigns)
                .post(routes::campaigns::create_campaign)
                .put(routes::campaigns::update_campaign_by_body)
                .delete(routes::campaigns::delete_campaign),
        )
        .route(
            "/api/campaigns/public",
            get(routes::campaigns::list_public_campaigns),
        )
        .route(
            "/api/campaigns/:id",
            get(routes::campaigns::get_campaign).put(routes::campaigns::update_campaign),
        )
        // Donation routes
        .route(
            "/api/donations",
            get(routes::donations::list_donations).post(routes::donations::create_donation),
        )
        .route(
            "/api/donations/my-donations",
            get(routes::donations::my_donations),
        )
        // Admin routes
        .route("/api/admin/ngos", get(routes::admin::pending_ngos))
        .route("/api/admin/ngos/approve", post(routes::admin::approve_ngo))
        .route("/api/admin/ngos/reject", post(routes::admin::reject_ngo))
        .route("/api/admin/analytics", get(routes::admin::analytics))
        // Public directory
        .route("/api/ngos", get(routes::ngos::list_ngos))
        .route("/api/ngos/:id", get(routes::ngos::get_ngo))
        // Organization management
        .route(
            "/api/organization",
            get(routes::organization::get_organization)
                .post(routes::organization::create_organization)
                .put(routes::organization::update_organization),
        )
        .route(
            "/api/organization/settings",
            get(routes::organization::get_settings).patch(routes::organization::update_settings),
        )
        .route(
            "/api/organization/reports",
            get(routes::organization::get_report),
        )
        .route(
            "/api/organization/donations",
            get(routes::organization::list_donations),
        )
        .route(
            "/api/organization/events",
            get(routes::organization::list_events).post(routes::organization::create_event),
        )
        .route(
            "/api/organization/volunteers",
            get(routes::organization::list_volunteers)
                .patch(routes::organization::update_volunteer),
        )
        .route(
            "/api/organization/volunteer-opportunities",
            get(routes::organization::list_opportunities)
                .post(routes::organization::create_opportunity),
        )
        // Volunteering
        .route(
            "/api/volunteer/opportunities",
            get(routes::volunteer::list_opportunities),
        )
        .route(
            "/api/volunteer/opportunities/public",
            get(routes::volunteer::list_public_opportunities),
        )
        .route("/api/volunteer/applications", post(routes::volunteer::apply))
        .merge(SwaggerUi::new("/docs").url("/docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(trace_layer())
        .layer(cors_layer())
}

fn trace_layer() -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
