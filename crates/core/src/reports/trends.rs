//! Daily trend series and the period-over-period comparison.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::percent::{clamp_comparison, percent_change};
use super::period::{Averaging, PeriodWindows, Window, local_date};
use super::types::{PeriodComparison, PeriodStats, TrendPoint};
use crate::ledger::Transaction;

#[derive(Debug, Clone, Copy, Default)]
struct DayTotals {
    income: Decimal,
    expense: Decimal,
}

/// Income and expense series with one point per calendar day of `window`.
///
/// Each point's `change` is its deviation from the average of the days that
/// had activity on that side. Expense amounts are negative.
#[must_use]
pub fn daily_trends(transactions: &[Transaction], window: &Window) -> (Vec<TrendPoint>, Vec<TrendPoint>) {
    let tz = window.start.timezone();
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| window.contains(t.date)) {
        let day = days.entry(local_date(transaction.date, &tz)).or_default();
        if transaction.is_income() {
            day.income += transaction.amount;
        } else {
            day.expense += transaction.amount.abs();
        }
    }

    let avg_income = active_day_average(days.values().map(|d| d.income));
    let avg_expense = active_day_average(days.values().map(|d| d.expense));

    let mut income_trend = Vec::new();
    let mut expense_trend = Vec::new();
    for date in window.dates() {
        let day = days.get(&date).copied().unwrap_or_default();

        income_trend.push(TrendPoint {
            date,
            amount: day.income,
            change: percent_change(day.income, avg_income),
        });
        expense_trend.push(TrendPoint {
            date,
            amount: if day.expense.is_zero() {
                Decimal::ZERO
            } else {
                -day.expense
            },
            change: percent_change(day.expense, avg_expense),
        });
    }

    (income_trend, expense_trend)
}

/// Compares the current window with the previous one.
///
/// Totals are recomputed from the raw lists. Changes are clamped to
/// `[-100, 200]`.
#[must_use]
pub fn compare_periods(
    current: &[Transaction],
    previous: &[Transaction],
    windows: &PeriodWindows,
    averaging: Averaging,
) -> PeriodComparison {
    let current_period = period_totals(current, &windows.current, averaging);
    let prev_period = period_totals(previous, &windows.previous, averaging);

    PeriodComparison {
        expense_change: clamp_comparison(percent_change(
            current_period.total_expenses,
            prev_period.total_expenses,
        )),
        income_change: clamp_comparison(percent_change(
            current_period.total_income,
            prev_period.total_income,
        )),
        balance_change: clamp_comparison(percent_change(
            current_period.balance,
            prev_period.balance,
        )),
        current_period,
        prev_period,
    }
}

/// Income, expense and balance of `window` with their daily averages.
/// Category maps stay empty.
fn period_totals(transactions: &[Transaction], window: &Window, averaging: Averaging) -> PeriodStats {
    let (total_income, total_expenses) = transactions
        .iter()
        .filter(|t| window.contains(t.date))
        .fold((Decimal::ZERO, Decimal::ZERO), |(income, expenses), t| {
            if t.is_income() {
                (income + t.amount, expenses)
            } else {
                (income, expenses + t.amount.abs())
            }
        });

    let days = Decimal::from(averaging.days(window));
    PeriodStats {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        avg_daily_income: total_income / days,
        avg_daily_expense: total_expenses / days,
        ..PeriodStats::default()
    }
}

fn active_day_average(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    let (sum, days) = amounts
        .filter(|amount| *amount > Decimal::ZERO)
        .fold((Decimal::ZERO, 0u32), |(sum, days), amount| (sum + amount, days + 1));
    if days == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(days)
    }
}
