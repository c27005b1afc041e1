//! Property-based tests for the reports module.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregate::aggregate;
use super::percent::{COMPARISON_CEILING, COMPARISON_FLOOR, percent_change};
use super::period::{Averaging, PeriodWindows, ReportKind};
use super::service::ReportEngine;
use crate::ledger::{Category, CategoryKind, Transaction};
use crate::test_support::{category, local, transaction_on};

/// Amounts in cents, never zero, either sign.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![-1_000_000i64..-1, 1i64..1_000_000].prop_map(|cents| Decimal::new(cents, 2))
}

/// Transactions spread over September and October 2026 across three categories.
fn ledger_strategy() -> impl Strategy<Value = (Vec<Category>, Vec<Transaction>)> {
    prop::collection::vec((0usize..3, amount_strategy(), 0u32..61), 0..60).prop_map(|rows| {
        let categories = vec![
            category("Salary", CategoryKind::Income),
            category("Food", CategoryKind::Expense),
            category("Rent", CategoryKind::Expense),
        ];
        let transactions = rows
            .into_iter()
            .map(|(index, amount, offset)| {
                let (month, day) = if offset < 30 { (9, offset + 1) } else { (10, offset - 29) };
                // Keep the sign in line with the category kind.
                let amount = if categories[index].kind.is_income() {
                    amount.abs()
                } else {
                    -amount.abs()
                };
                transaction_on(&categories[index], amount, 2026, month, day)
            })
            .collect();
        (categories, transactions)
    })
}

proptest! {
    /// Property 1: Balance Identity
    /// For any transaction set, total income minus total expenses SHALL equal
    /// the balance exactly.
    #[test]
    fn test_balance_identity((categories, transactions) in ledger_strategy()) {
        let windows = PeriodWindows::resolve(ReportKind::Monthly, local(2026, 10, 18));
        let report = ReportEngine::build(
            ReportKind::Monthly,
            &windows,
            &transactions,
            &transactions,
            &categories,
            Averaging::Inclusive,
        );

        prop_assert_eq!(report.total_income - report.total_expenses, report.balance);
        let comparison = &report.trends.period_comparison;
        prop_assert_eq!(
            comparison.prev_period.total_income - comparison.prev_period.total_expenses,
            comparison.prev_period.balance
        );
    }

    /// Property 2: Category Sums Match Totals
    /// When every amount agrees with its category kind, the category amounts
    /// of each kind SHALL add up to that kind's total.
    #[test]
    fn test_category_sums_match_totals((categories, transactions) in ledger_strategy()) {
        let windows = PeriodWindows::resolve(ReportKind::Monthly, local(2026, 10, 18));
        let report = ReportEngine::build(
            ReportKind::Monthly,
            &windows,
            &transactions,
            &[],
            &categories,
            Averaging::Inclusive,
        );

        let expenses: Decimal = report.category_data.expenses.iter().map(|c| c.amount.abs()).sum();
        let income: Decimal = report.category_data.income.iter().map(|c| c.amount).sum();
        prop_assert_eq!(expenses, report.total_expenses);
        prop_assert_eq!(income, report.total_income);

        let counted: usize = report
            .category_data
            .expenses
            .iter()
            .chain(&report.category_data.income)
            .map(|c| c.count)
            .sum();
        prop_assert_eq!(counted, report.transaction_data.total_count);
    }

    /// Property 3: Trend Series Length
    /// Each daily series SHALL hold one point per calendar day of the window,
    /// active or not.
    #[test]
    fn test_trend_series_length(
        (categories, transactions) in ledger_strategy(),
        kind in prop::sample::select(ReportKind::ALL.to_vec()),
        day in 1u32..29,
    ) {
        let windows = PeriodWindows::resolve(kind, local(2026, 10, day));
        let report = ReportEngine::build(
            kind,
            &windows,
            &transactions,
            &transactions,
            &categories,
            Averaging::Inclusive,
        );

        let expected = (windows.current.end.date_naive() - windows.current.start.date_naive())
            .num_days() + 1;
        let expected = usize::try_from(expected).unwrap();
        prop_assert_eq!(report.trends.income_trend.len(), expected);
        prop_assert_eq!(report.trends.expense_trend.len(), expected);
        prop_assert!(report.trends.expense_trend.iter().all(|p| p.amount <= Decimal::ZERO));
        prop_assert!(report.trends.income_trend.iter().all(|p| p.amount >= Decimal::ZERO));
    }

    /// Property 4: No Change Against Itself
    /// For any nonzero value, the percent change against itself SHALL be zero.
    #[test]
    fn test_percent_change_against_itself(value in amount_strategy()) {
        prop_assert_eq!(percent_change(value, value), Decimal::ZERO);
    }

    /// Property 5: Sign Flip Is A Full Reversal
    /// When current and previous have opposite signs the change SHALL be -100.
    #[test]
    fn test_sign_flip_is_full_reversal(a in amount_strategy(), b in amount_strategy()) {
        prop_assume!(a.is_sign_negative() != b.is_sign_negative());
        prop_assert_eq!(percent_change(a, b), -Decimal::ONE_HUNDRED);
    }

    /// Property 6: Comparison Stays In Display Range
    /// Every stored period change SHALL lie within [-100, 200].
    #[test]
    fn test_comparison_within_range(
        (categories, transactions) in ledger_strategy(),
        day in 1u32..29,
    ) {
        let windows = PeriodWindows::resolve(ReportKind::Weekly, local(2026, 10, day));
        let report = ReportEngine::build(
            ReportKind::Weekly,
            &windows,
            &transactions,
            &transactions,
            &categories,
            Averaging::Inclusive,
        );

        let comparison = &report.trends.period_comparison;
        for change in [comparison.expense_change, comparison.income_change, comparison.balance_change] {
            prop_assert!(change >= COMPARISON_FLOOR && change <= COMPARISON_CEILING);
        }
    }

    /// Property 7: Aggregation Is Idempotent
    /// Aggregating the same input twice SHALL give identical results.
    #[test]
    fn test_aggregate_is_idempotent((categories, transactions) in ledger_strategy()) {
        let window = PeriodWindows::resolve(ReportKind::Yearly, local(2026, 10, 18)).current;

        let first = aggregate(&transactions, &categories, &window, Averaging::Inclusive);
        let second = aggregate(&transactions, &categories, &window, Averaging::Inclusive);

        prop_assert_eq!(first.stats.total_income.serialize(), second.stats.total_income.serialize());
        prop_assert_eq!(first.stats.total_expenses.serialize(), second.stats.total_expenses.serialize());
        prop_assert_eq!(first, second);
    }

    /// Property 8: Averages Never Divide By Zero
    /// Daily averages SHALL never exceed the totals they are derived from.
    #[test]
    fn test_daily_average_bounded_by_total(
        (categories, transactions) in ledger_strategy(),
        kind in prop::sample::select(ReportKind::ALL.to_vec()),
    ) {
        let windows = PeriodWindows::resolve(kind, local(2026, 10, 18));
        for averaging in [Averaging::Inclusive, Averaging::Exclusive] {
            let result = aggregate(&transactions, &categories, &windows.current, averaging);
            prop_assert!(result.stats.avg_daily_income <= result.stats.total_income);
            prop_assert!(result.stats.avg_daily_expense <= result.stats.total_expenses);
        }
    }
}
