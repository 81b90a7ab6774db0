// HTTP request handlers
use crate::application::catalog_service::FilterOptions;
use crate::application::dashboard_service::DashboardRequest;
use crate::domain::dashboard::Dashboard;
use crate::domain::filter::{DashboardFilter, DateRange, Selection, TrendMetric};
use crate::domain::timescale::TimeScale;
use crate::error::AppError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, Default)]
pub struct DashboardParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Comma-separated agent names; absent means all.
    pub agents: Option<String>,
    /// Comma-separated group names; absent means all.
    pub groups: Option<String>,
    pub scale: Option<String>,
    pub metric: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(AppError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::Internal(err) => {
                tracing::error!("request failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Selectable agents and groups for the filter widgets
pub async fn filter_options(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterOptions>, ApiError> {
    Ok(Json(state.catalog_service.filter_options().await?))
}

/// The full dashboard for the requested window and selections
pub async fn dashboard(
    Query(params): Query<DashboardParams>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, ApiError> {
    let request = params.into_request(Local::now().date_naive())?;
    Ok(Json(state.dashboard_service.build(&request).await?))
}

fn parse_selection(param: Option<&str>) -> Selection {
    match param {
        None | Some("") => Selection::all(),
        Some(list) => Selection::of(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        ),
    }
}

impl DashboardParams {
    /// Fill the gaps the way the page does: current week, everything
    /// selected, daily scale, mean answer time.
    fn into_request(self, today: NaiveDate) -> Result<DashboardRequest, ApiError> {
        let default_week = DateRange::current_week(today);
        let range = DateRange::new(
            self.start.unwrap_or(default_week.start),
            self.end.unwrap_or(default_week.end),
        );

        let scale: TimeScale = self
            .scale
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(ApiError::BadRequest)?
            .unwrap_or_default();
        let metric: TrendMetric = self
            .metric
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(ApiError::BadRequest)?
            .unwrap_or(TrendMetric::MeanAnswerTime);

        Ok(DashboardRequest {
            filter: DashboardFilter {
                range,
                agents: parse_selection(self.agents.as_deref()),
                groups: parse_selection(self.groups.as_deref()),
            },
            scale,
            metric,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_defaults_fill_the_current_week() {
        let request = DashboardParams::default()
            .into_request(date("2025-02-05"))
            .unwrap();
        assert_eq!(request.filter.range.start, date("2025-02-03"));
        assert_eq!(request.filter.range.end, date("2025-02-09"));
        assert_eq!(request.scale, TimeScale::Daily);
        assert_eq!(request.metric, TrendMetric::MeanAnswerTime);
        assert!(request.filter.agents.allows("anyone"));
    }

    #[test]
    fn test_selection_parsing() {
        assert!(parse_selection(None).allows("Ada"));
        assert!(parse_selection(Some("")).allows("Ada"));

        let picked = parse_selection(Some("Ada, Grace"));
        assert!(picked.allows("Ada"));
        assert!(picked.allows("Grace"));
        assert!(!picked.allows("Linus"));
    }

    #[test]
    fn test_unknown_scale_is_a_bad_request() {
        let params = DashboardParams {
            scale: Some("hourly".to_string()),
            ..DashboardParams::default()
        };
        assert!(matches!(
            params.into_request(date("2025-02-05")),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_explicit_parameters_win() {
        let params = DashboardParams {
            start: Some(date("2025-01-01")),
            end: Some(date("2025-01-31")),
            scale: Some("monthly".to_string()),
            metric: Some("sla_percentage".to_string()),
            ..DashboardParams::default()
        };
        let request = params.into_request(date("2025-02-05")).unwrap();
        assert_eq!(request.filter.range.start, date("2025-01-01"));
        assert_eq!(request.scale, TimeScale::Monthly);
        assert_eq!(request.metric, TrendMetric::SlaPercentage);
    }
}
