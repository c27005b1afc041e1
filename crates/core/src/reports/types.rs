//! Report types.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use finbot_shared::types::{CategoryId, TransactionId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::percent::HUNDRED;
use super::period::ReportKind;
use crate::ledger::CategoryKind;

/// Complete report handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Report granularity.
    pub kind: ReportKind,
    /// Human label of the period.
    pub period: String,
    /// First instant covered.
    pub start_date: DateTime<Tz>,
    /// Last instant covered.
    pub end_date: DateTime<Tz>,
    /// Sum of positive amounts.
    pub total_income: Decimal,
    /// Sum of the magnitudes of non-positive amounts.
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`.
    pub balance: Decimal,
    /// Transaction-level statistics.
    pub transaction_data: TransactionData,
    /// Per-category breakdown.
    pub category_data: CategoryData,
    /// Daily series and the comparison with the previous period.
    pub trends: Trends,
}

/// Totals of one window, keyed by category name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    /// Sum of positive amounts.
    pub total_income: Decimal,
    /// Sum of the magnitudes of non-positive amounts.
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`.
    pub balance: Decimal,
    /// Income per day of the window.
    pub avg_daily_income: Decimal,
    /// Expenses per day of the window.
    pub avg_daily_expense: Decimal,
    /// Expense magnitudes by category name.
    pub expenses_by_category: BTreeMap<String, Decimal>,
    /// Income by category name.
    pub income_by_category: BTreeMap<String, Decimal>,
}

impl PeriodStats {
    /// Share of income kept, in percent. Zero without income.
    #[must_use]
    pub fn savings_rate(&self) -> Decimal {
        if self.total_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.balance
            .checked_div(self.total_income)
            .and_then(|ratio| ratio.checked_mul(HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }
}

/// The transaction a maximum was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionInfo {
    /// Source transaction.
    pub transaction_id: TransactionId,
    /// Category it was filed under.
    pub category_id: CategoryId,
    /// Magnitude of the amount.
    pub amount: Decimal,
    /// Transaction date.
    pub date: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
}

/// Transaction-level statistics of a window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionData {
    /// Transactions inside the window.
    pub total_count: usize,
    /// Positive transactions.
    pub income_count: usize,
    /// Non-positive transactions.
    pub expense_count: usize,
    /// Mean income transaction.
    pub avg_income: Decimal,
    /// Mean expense magnitude.
    pub avg_expense: Decimal,
    /// Income per day of the window.
    pub daily_avg_income: Decimal,
    /// Expenses per day of the window.
    pub daily_avg_expense: Decimal,
    /// Largest income transaction; ties keep the first seen.
    pub max_income: Option<TransactionInfo>,
    /// Largest expense by magnitude; ties keep the first seen.
    pub max_expense: Option<TransactionInfo>,
}

/// Statistics of one category inside a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub name: String,
    /// Declared kind of the category.
    pub kind: CategoryKind,
    /// Signed sum of the category's transactions.
    pub amount: Decimal,
    /// Number of transactions.
    pub count: usize,
    /// `amount / count`.
    pub average_amount: Decimal,
    /// Portion of the kind's total, when that total is positive.
    pub share_percent: Option<Decimal>,
    /// Percent change against the previous window, zero without history.
    pub trend_percent: Decimal,
}

/// A category's movement between two windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChange {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub name: String,
    /// `amount - previous amount`.
    pub change_value: Decimal,
    /// Percent change of `change_value` against the previous amount.
    pub change_percent: Decimal,
}

/// Standout category movements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryChanges {
    /// Expense category with the largest positive change.
    pub fastest_growing_expense: Option<CategoryChange>,
    /// Income category with the largest positive change.
    pub fastest_growing_income: Option<CategoryChange>,
    /// Expense category with the largest negative change.
    pub largest_drop_expense: Option<CategoryChange>,
    /// Income category with the largest negative change.
    pub largest_drop_income: Option<CategoryChange>,
}

/// Per-category breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    /// Expense categories, largest magnitude first.
    pub expenses: Vec<CategoryStats>,
    /// Income categories, largest first.
    pub income: Vec<CategoryStats>,
    /// Standout movements against the previous window.
    pub changes: CategoryChanges,
}

/// One calendar day of a trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Local calendar date.
    pub date: NaiveDate,
    /// Day total; negative in the expense series.
    pub amount: Decimal,
    /// Percent deviation from the window's average active day.
    pub change: Decimal,
}

/// Current window against the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodComparison {
    /// Stats of the current window.
    pub current_period: PeriodStats,
    /// Stats of the previous window.
    pub prev_period: PeriodStats,
    /// Clamped percent change of expenses.
    pub expense_change: Decimal,
    /// Clamped percent change of income.
    pub income_change: Decimal,
    /// Clamped percent change of the balance.
    pub balance_change: Decimal,
}

/// Daily series plus the period comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Trends {
    /// Income per day.
    pub income_trend: Vec<TrendPoint>,
    /// Expenses per day, stored negative.
    pub expense_trend: Vec<TrendPoint>,
    /// Totals against the previous window.
    pub period_comparison: PeriodComparison,
}
