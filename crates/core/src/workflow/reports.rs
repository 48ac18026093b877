use std::collections::HashMap;

use chrono::{Days, NaiveTime};

use crate::{
    analytics::{period_start, summarize},
    errors::ConductResult,
    models::analytics::{AnalyticsReport, ReportPeriod},
};

use super::Workflow;

impl Workflow {
    /// Violation statistics for the period ending today.
    pub async fn analytics(&self, period: ReportPeriod) -> ConductResult<AnalyticsReport> {
        let end = self.clock.today();
        let start = period_start(period, end);
        let from = start.and_time(NaiveTime::MIN).and_utc();
        let until = end
            .checked_add_days(Days::new(1))
            .unwrap_or(end)
            .and_time(NaiveTime::MIN)
            .and_utc();

        let violations = self.store.list_violations_between(from, until).await?;
        let students = self
            .store
            .list_students()
            .await?
            .into_iter()
            .map(|student| (student.id, student))
            .collect::<HashMap<_, _>>();

        Ok(summarize(period, start, end, &violations, &students))
    }
}
