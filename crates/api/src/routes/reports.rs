//! Report routes: CSV exports and the dashboard summary.
//!
//! All dates are UTC calendar dates.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use crate::{ApiResult, AppState};
use goldbook_core::reports::{
    DashboardSummary, REPORT_FILE_NAME, ReportWindow, transactions_csv,
};
use goldbook_db::TransactionRepository;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/reports/daily", get(daily_report))
        .route("/transactions/reports/monthly", get(monthly_report))
        .route("/transactions/reports/range", get(range_report))
        .route("/transactions/dashboard", get(dashboard))
}

/// Query for the daily report.
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// Day to report; today when absent.
    pub date: Option<NaiveDate>,
}

/// Query for the monthly report.
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// Year; the current year when absent.
    pub year: Option<i32>,
    /// Month 1-12; the current month when absent.
    pub month: Option<u32>,
}

/// Query for the range report. Both days are included.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
}

/// Query for the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Last day of the window; today when absent.
    pub date: Option<NaiveDate>,
    /// Window length in days, at least 1.
    #[serde(default = "default_duration")]
    pub duration: i64,
}

const fn default_duration() -> i64 {
    1
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn csv_report(state: &AppState, window: ReportWindow) -> ApiResult<impl IntoResponse + use<>> {
    let lines = TransactionRepository::new((*state.db).clone())
        .report_lines(window)
        .await?;
    let rows = lines.len();
    let body = transactions_csv(lines)?;

    info!(start = %window.start, end = %window.end, rows, "Report exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}

/// GET /transactions/reports/daily?date=YYYY-MM-DD
async fn daily_report(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> ApiResult<impl IntoResponse> {
    let window = ReportWindow::day(query.date.unwrap_or_else(today))?;
    csv_report(&state, window).await
}

/// GET /transactions/reports/monthly?year=&month=
async fn monthly_report(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<impl IntoResponse> {
    let now = today();
    let window = match (query.year, query.month) {
        (None, None) => ReportWindow::month_of(now)?,
        (year, month) => ReportWindow::month(
            year.unwrap_or_else(|| now.year()),
            month.unwrap_or_else(|| now.month()),
        )?,
    };
    csv_report(&state, window).await
}

/// GET /transactions/reports/range?start_date=&end_date=
async fn range_report(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<impl IntoResponse> {
    let window = ReportWindow::range(query.start_date, query.end_date)?;
    csv_report(&state, window).await
}

/// GET /transactions/dashboard?date=&duration=
async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardSummary>> {
    let window = ReportWindow::trailing_days(query.date.unwrap_or_else(today), query.duration)?;
    let transactions = TransactionRepository::new((*state.db).clone())
        .in_window(window)
        .await?;
    Ok(Json(DashboardSummary::from_transactions(&transactions)))
}
