use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use advisor_core::advice::{self, AdvisorySheet, NextStepOutcome};
use advisor_core::domain::contract::{AdvisoryRequest, InsuranceInput, InvestmentInput};
use advisor_core::domain::recommendation::{Recommendation, RecommendationId};
use advisor_core::rules::{self, RuleThresholds};
use advisor_core::storage::{PgClientStore, StoreError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = advisor_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let thresholds = RuleThresholds::from_env();
    thresholds.validate()?;

    let store = match settings.connect_pool().await {
        Ok(pool) => Some(PgClientStore::new(pool)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "client store unavailable; starting API in degraded mode");
            None
        }
    };

    let state = AppState { store, thresholds };
    let app = router(state).layer(TraceLayer::new_for_http());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/recommendations", post(post_recommendations))
        .route("/v1/recommendations/investment", post(post_investment))
        .route("/v1/recommendations/insurance", post(post_insurance))
        .route(
            "/v1/clients/:client_id/recommendations",
            get(get_client_recommendations),
        )
        .route("/v1/clients/:client_id/next_steps", post(post_next_step))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Clone)]
struct AppState {
    store: Option<PgClientStore>,
    thresholds: RuleThresholds,
}

#[derive(Debug, Deserialize)]
struct NextStepBody {
    recommendation_id: String,
}

#[derive(Debug, Serialize)]
struct NextStepCreated {
    next_step_id: Uuid,
}

async fn post_investment(
    State(state): State<AppState>,
    Json(input): Json<InvestmentInput>,
) -> Json<Vec<Recommendation>> {
    Json(rules::investment_recs(&input, &state.thresholds))
}

async fn post_insurance(
    State(state): State<AppState>,
    Json(input): Json<InsuranceInput>,
) -> Json<Vec<Recommendation>> {
    Json(rules::insurance_recs(&input, &state.thresholds))
}

async fn post_recommendations(
    State(state): State<AppState>,
    Json(request): Json<AdvisoryRequest>,
) -> Result<Json<AdvisorySheet>, StatusCode> {
    AdvisorySheet::evaluate(request, &state.thresholds)
        .map(Json)
        .map_err(|e| {
            tracing::debug!(error = %e, "rejected advisory request");
            StatusCode::BAD_REQUEST
        })
}

async fn get_client_recommendations(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<AdvisorySheet>, StatusCode> {
    let Some(store) = &state.store else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let client_id = Uuid::parse_str(&client_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    let sheet = advice::advise_client(store, client_id, &state.thresholds)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(sheet))
}

async fn post_next_step(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Json(body): Json<NextStepBody>,
) -> Result<(StatusCode, Json<NextStepCreated>), StatusCode> {
    let Some(store) = &state.store else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let client_id = Uuid::parse_str(&client_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let recommendation_id =
        RecommendationId::parse(&body.recommendation_id).ok_or(StatusCode::BAD_REQUEST)?;

    let outcome = advice::forward_next_step(
        store,
        client_id,
        recommendation_id,
        &state.thresholds,
        false,
    )
    .await
    .map_err(internal_error)?;

    match outcome {
        NextStepOutcome::Created { next_step_id, .. } => {
            Ok((StatusCode::CREATED, Json(NextStepCreated { next_step_id })))
        }
        NextStepOutcome::ClientNotFound | NextStepOutcome::NotApplicable => {
            Err(StatusCode::NOT_FOUND)
        }
        NextStepOutcome::Planned(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

fn internal_error(err: anyhow::Error) -> StatusCode {
    sentry_anyhow::capture_anyhow(&err);
    match err.downcast_ref::<StoreError>() {
        Some(store) => tracing::error!(
            table = store.table,
            stage = store.stage,
            error = %format!("{err:#}"),
            "store call failed"
        ),
        None => tracing::error!(error = %format!("{err:#}"), "request failed"),
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &advisor_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
