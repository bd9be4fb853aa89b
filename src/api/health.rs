use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) struct HealthReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    providers: Vec<&'static str>,
}

impl HealthReport {
    fn ready(providers: Vec<&'static str>) -> Self {
        Self {
            status: "ready",
            detail: None,
            providers,
        }
    }

    fn degraded(detail: impl Into<String>) -> Self {
        Self {
            status: "degraded",
            detail: Some(detail.into()),
            providers: Vec::new(),
        }
    }
}

/// 分類器が必ず応答できるかを返す。画像経路は乱数フォールバックで終わるため、
/// 外部 Vision API の状態は準備完了の条件に含めない。
pub(crate) async fn ready(
    State(state): State<AppState>,
) -> Result<Json<HealthReport>, (StatusCode, Json<HealthReport>)> {
    state.telemetry().record_ready_probe();

    if state.catalog().is_empty() {
        error!("catalog readiness check failed: no products loaded");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthReport::degraded("catalog: no products loaded")),
        ));
    }

    Ok(Json(HealthReport::ready(
        state.orchestrator().provider_names(),
    )))
}

pub(crate) async fn live(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_live_probe();
    Json(HealthReport {
        status: "live",
        detail: None,
        providers: Vec::new(),
    })
}
