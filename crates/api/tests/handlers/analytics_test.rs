use axum::http::StatusCode;
use conduct_core::models::analytics::{AnalyticsReport, ReportPeriod};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::test_utils::{TestContext, as_user, today};

#[rstest]
#[case("week", ReportPeriod::Week, 8)]
#[case("month", ReportPeriod::Month, 15)]
#[case("year", ReportPeriod::Year, 366)]
#[tokio::test]
async fn test_report_window(
    #[case] period: &str,
    #[case] expected: ReportPeriod,
    #[case] days: usize,
) {
    let ctx = TestContext::new().await;

    let response = as_user(ctx.server.get("/api/analytics"), ctx.teacher.id)
        .add_query_param("period", period)
        .await;

    response.assert_status_ok();
    let report: AnalyticsReport = response.json();
    assert_eq!(report.period, expected);
    assert_eq!(report.end, today());
    assert_eq!(report.daily.len(), days);
    assert_eq!(report.attendance_rate, 0.0);
}

#[tokio::test]
async fn test_report_defaults_to_week() {
    let ctx = TestContext::new().await;

    let response = as_user(ctx.server.get("/api/analytics"), ctx.teacher.id).await;

    response.assert_status_ok();
    assert_eq!(response.json::<AnalyticsReport>().period, ReportPeriod::Week);
}

#[tokio::test]
async fn test_unknown_period_is_rejected() {
    let ctx = TestContext::new().await;

    let response = as_user(ctx.server.get("/api/analytics"), ctx.teacher.id)
        .add_query_param("period", "decade")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
