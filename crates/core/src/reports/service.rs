//! Report generation service.

use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;
use finbot_shared::types::UserId;
use tracing::{debug, instrument};

use super::aggregate::{aggregate, category_data};
use super::error::ReportError;
use super::period::{Averaging, PeriodWindows, ReportKind, period_label};
use super::trends::{compare_periods, daily_trends};
use super::types::{Report, Trends};
use crate::ledger::{Category, LedgerRepository, Transaction};

/// Pure report builder. Performs no I/O.
pub struct ReportEngine;

impl ReportEngine {
    /// Builds a report from already fetched data.
    ///
    /// `current` and `previous` may contain transactions outside their
    /// windows; those are filtered out here.
    #[must_use]
    pub fn build(
        kind: ReportKind,
        windows: &PeriodWindows,
        current: &[Transaction],
        previous: &[Transaction],
        categories: &[Category],
        averaging: Averaging,
    ) -> Report {
        let current_aggregate = aggregate(current, categories, &windows.current, averaging);
        let previous_aggregate = aggregate(previous, categories, &windows.previous, averaging);
        let category_data = category_data(categories, &current_aggregate, &previous_aggregate);
        let (income_trend, expense_trend) = daily_trends(current, &windows.current);
        let period_comparison = compare_periods(current, previous, windows, averaging);

        let stats = current_aggregate.stats;
        Report {
            kind,
            period: period_label(kind, &windows.current),
            start_date: windows.current.start,
            end_date: windows.current.end,
            total_income: stats.total_income,
            total_expenses: stats.total_expenses,
            balance: stats.balance,
            transaction_data: current_aggregate.transaction_data,
            category_data,
            trends: Trends {
                income_trend,
                expense_trend,
                period_comparison,
            },
        }
    }
}

/// Fetches report data from storage and hands it to the engine.
#[derive(Clone)]
pub struct ReportService {
    repo: Arc<dyn LedgerRepository>,
}

impl ReportService {
    /// Creates a new report service.
    #[must_use]
    pub fn new(repo: Arc<dyn LedgerRepository>) -> Self {
        Self { repo }
    }

    /// Report of the given kind for the period containing `now`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the failed fetch when storage fails.
    #[instrument(skip(self), fields(user_id = %user_id, kind = %kind))]
    pub async fn get_report(
        &self,
        user_id: UserId,
        kind: ReportKind,
        now: DateTime<Tz>,
    ) -> Result<Report, ReportError> {
        let windows = PeriodWindows::resolve(kind, now);
        self.build(user_id, kind, &windows, Averaging::Inclusive).await
    }

    /// Monthly summary: calendar month against the previous calendar month,
    /// averaged over whole days between the bounds.
    ///
    /// # Errors
    ///
    /// Returns an error naming the failed fetch when storage fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_monthly_report(
        &self,
        user_id: UserId,
        now: DateTime<Tz>,
    ) -> Result<Report, ReportError> {
        let windows = PeriodWindows::calendar_month(now);
        self.build(user_id, ReportKind::Monthly, &windows, Averaging::Exclusive)
            .await
    }

    async fn build(
        &self,
        user_id: UserId,
        kind: ReportKind,
        windows: &PeriodWindows,
        averaging: Averaging,
    ) -> Result<Report, ReportError> {
        let current = self
            .repo
            .get_transactions(user_id, &windows.current.filter())
            .await
            .map_err(ReportError::CurrentTransactions)?;
        debug!(count = current.len(), "Fetched current period transactions");

        let previous = self
            .repo
            .get_transactions(user_id, &windows.previous.filter())
            .await
            .map_err(ReportError::PreviousTransactions)?;
        debug!(count = previous.len(), "Fetched previous period transactions");

        let categories = self
            .repo
            .get_categories(user_id)
            .await
            .map_err(ReportError::Categories)?;

        let report =
            ReportEngine::build(kind, windows, &current, &previous, &categories, averaging);
        debug!(
            income = %report.total_income,
            expenses = %report.total_expenses,
            balance = %report.balance,
            "Report built"
        );
        Ok(report)
    }
}
