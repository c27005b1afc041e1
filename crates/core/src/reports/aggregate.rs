//! Window aggregation: totals, maxima and the per-category breakdown.

use std::collections::{BTreeMap, HashMap};

use finbot_shared::types::CategoryId;
use rust_decimal::Decimal;

use super::percent::{percent_change, share_of};
use super::period::{Averaging, Window};
use super::types::{
    CategoryChange, CategoryChanges, CategoryData, CategoryStats, PeriodStats, TransactionData,
    TransactionInfo,
};
use crate::ledger::{Category, CategoryKind, Transaction};

/// Name used for transactions whose category is unknown.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Signed sum and count of one category's transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTotal {
    /// Signed sum.
    pub amount: Decimal,
    /// Number of transactions.
    pub count: usize,
}

/// Everything the aggregator derives from one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Totals and name-keyed category maps.
    pub stats: PeriodStats,
    /// Counts, averages and maxima.
    pub transaction_data: TransactionData,
    /// Signed totals of known categories.
    pub by_category: BTreeMap<CategoryId, CategoryTotal>,
}

/// Aggregates the transactions that fall inside `window`.
///
/// Transactions outside the window are ignored even if storage returned
/// them. A transaction is income when its amount is positive and an expense
/// otherwise, whatever its category says.
#[must_use]
pub fn aggregate(
    transactions: &[Transaction],
    categories: &[Category],
    window: &Window,
    averaging: Averaging,
) -> Aggregate {
    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut stats = PeriodStats::default();
    let mut data = TransactionData::default();
    let mut by_category: BTreeMap<CategoryId, CategoryTotal> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| window.contains(t.date)) {
        let name = names.get(&transaction.category_id).copied();

        if transaction.is_income() {
            stats.total_income += transaction.amount;
            *stats
                .income_by_category
                .entry(name.unwrap_or(UNCATEGORIZED).to_string())
                .or_default() += transaction.amount;
            data.income_count += 1;
            keep_max(&mut data.max_income, transaction, transaction.amount);
        } else {
            let magnitude = transaction.amount.abs();
            stats.total_expenses += magnitude;
            *stats
                .expenses_by_category
                .entry(name.unwrap_or(UNCATEGORIZED).to_string())
                .or_default() += magnitude;
            data.expense_count += 1;
            keep_max(&mut data.max_expense, transaction, magnitude);
        }

        if name.is_some() {
            let total = by_category.entry(transaction.category_id).or_default();
            total.amount += transaction.amount;
            total.count += 1;
        }
    }

    stats.balance = stats.total_income - stats.total_expenses;

    let days = Decimal::from(averaging.days(window));
    stats.avg_daily_income = stats.total_income / days;
    stats.avg_daily_expense = stats.total_expenses / days;

    data.total_count = data.income_count + data.expense_count;
    data.avg_income = mean(stats.total_income, data.income_count);
    data.avg_expense = mean(stats.total_expenses, data.expense_count);
    data.daily_avg_income = stats.avg_daily_income;
    data.daily_avg_expense = stats.avg_daily_expense;

    Aggregate {
        stats,
        transaction_data: data,
        by_category,
    }
}

/// Builds the per-category breakdown of the current window.
///
/// Categories without transactions in the current window are left out.
/// Shares are taken against the total of the category's declared kind.
#[must_use]
pub fn category_data(
    categories: &[Category],
    current: &Aggregate,
    previous: &Aggregate,
) -> CategoryData {
    let ordered = ordered_by_id(categories);

    let mut income_total = Decimal::ZERO;
    let mut expense_total = Decimal::ZERO;
    for category in &ordered {
        if let Some(total) = current.by_category.get(&category.id) {
            match category.kind {
                CategoryKind::Income => income_total += total.amount,
                CategoryKind::Expense => expense_total += total.amount.abs(),
            }
        }
    }

    let mut data = CategoryData::default();
    for category in &ordered {
        let Some(total) = current.by_category.get(&category.id) else {
            continue;
        };
        if total.count == 0 {
            continue;
        }

        let previous_amount = previous_amount(previous, category.id);
        let trend_percent = if previous_amount.is_zero() {
            Decimal::ZERO
        } else {
            percent_change(total.amount, previous_amount)
        };

        let share_percent = match category.kind {
            CategoryKind::Income => share_of(total.amount, income_total),
            CategoryKind::Expense => share_of(total.amount.abs(), expense_total),
        };

        let stats = CategoryStats {
            category_id: category.id,
            name: category.name.clone(),
            kind: category.kind,
            amount: total.amount,
            count: total.count,
            average_amount: mean(total.amount, total.count),
            share_percent,
            trend_percent,
        };

        match category.kind {
            CategoryKind::Income => data.income.push(stats),
            CategoryKind::Expense => data.expenses.push(stats),
        }
    }

    data.income.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    data.expenses.sort_by(|a, b| {
        b.amount
            .abs()
            .cmp(&a.amount.abs())
            .then_with(|| a.category_id.cmp(&b.category_id))
    });

    data.changes = category_changes(&ordered, current, previous);
    data
}

/// Picks the fastest growing and largest dropping category per side.
///
/// Only categories with a nonzero previous amount take part. The side is
/// decided by the sign of the current amount, falling back to the declared
/// kind when the category is empty now. Ties go to the lowest category id.
#[must_use]
pub fn category_changes(
    ordered: &[&Category],
    current: &Aggregate,
    previous: &Aggregate,
) -> CategoryChanges {
    let mut changes = CategoryChanges::default();

    for category in ordered {
        let previous_amount = previous_amount(previous, category.id);
        if previous_amount.is_zero() {
            continue;
        }

        let amount = current
            .by_category
            .get(&category.id)
            .map_or(Decimal::ZERO, |t| t.amount);
        let change_value = amount - previous_amount;
        let change = CategoryChange {
            category_id: category.id,
            name: category.name.clone(),
            change_value,
            change_percent: percent_change(change_value, previous_amount),
        };

        let is_income = if amount.is_zero() {
            category.kind.is_income()
        } else {
            amount > Decimal::ZERO
        };
        let (growth, decline) = if is_income {
            (
                &mut changes.fastest_growing_income,
                &mut changes.largest_drop_income,
            )
        } else {
            (
                &mut changes.fastest_growing_expense,
                &mut changes.largest_drop_expense,
            )
        };

        if change.change_percent > Decimal::ZERO {
            if growth
                .as_ref()
                .is_none_or(|best| change.change_percent > best.change_percent)
            {
                *growth = Some(change);
            }
        } else if change.change_percent < Decimal::ZERO
            && decline
                .as_ref()
                .is_none_or(|best| change.change_percent < best.change_percent)
        {
            *decline = Some(change);
        }
    }

    changes
}

/// Categories sorted by id so iteration order never depends on input order.
#[must_use]
pub fn ordered_by_id(categories: &[Category]) -> Vec<&Category> {
    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by_key(|c| c.id);
    ordered
}

fn previous_amount(previous: &Aggregate, id: CategoryId) -> Decimal {
    previous
        .by_category
        .get(&id)
        .map_or(Decimal::ZERO, |t| t.amount)
}

fn keep_max(slot: &mut Option<TransactionInfo>, transaction: &Transaction, magnitude: Decimal) {
    if slot.as_ref().is_some_and(|best| magnitude <= best.amount) {
        return;
    }
    *slot = Some(TransactionInfo {
        transaction_id: transaction.id,
        category_id: transaction.category_id,
        amount: magnitude,
        date: transaction.date,
        description: transaction.description.clone(),
    });
}

fn mean(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total / Decimal::from(count)
}
