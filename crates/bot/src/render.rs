//! Message texts.
//!
//! Everything here is pure: reports and ledger rows in, Markdown out.

use std::collections::HashMap;

use finbot_core::ledger::{Category, CategoryKind, Transaction};
use finbot_core::reports::aggregate::UNCATEGORIZED;
use finbot_core::reports::{CategoryStats, Report, percent_change};
use finbot_shared::types::{CategoryId, TransactionId};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::keyboard::kind_emoji;

/// Currency sign appended to amounts.
pub const CURRENCY: &str = "₽";

/// Bound applied to changes shown in the monthly summary.
const SUMMARY_CHANGE_LIMIT: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Greeting shown on `/start`.
pub const WELCOME: &str = "*Hi! I will help you keep track of your money* 💰\n\n\
    Here is what I can do:\n\
    • Record income and expenses\n\
    • Show reports by category\n\
    • Manage categories\n\n\
    *Pick an action from the menu below* 👇";

/// Main menu prompt.
pub const MAIN_MENU: &str = "*Main menu*\nChoose an action 👇";

/// Report period prompt.
pub const REPORT_MENU: &str = "*Choose a report period:*\n\n\
    • Today - what happened since midnight\n\
    • Week - the last 7 days and today\n\
    • Month - the current calendar month\n\
    • Year - the current calendar year";

/// Hint shown after a category was picked.
#[must_use]
pub fn amount_prompt(category: &str) -> String {
    format!(
        "*Category:* {}\n\nEnter amount and description, e.g.\n`1000 Groceries`",
        escape(category)
    )
}

/// Prompt for the name of a new category.
#[must_use]
pub const fn new_category_prompt(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Income => "*New income category*\n\nEnter a name:",
        CategoryKind::Expense => "*New expense category*\n\nEnter a name:",
    }
}

/// Header of the category picker for a new transaction.
#[must_use]
pub const fn pick_category_prompt(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Income => "*Adding income*\n\nChoose a category:",
        CategoryKind::Expense => "*Adding expense*\n\nChoose a category:",
    }
}

/// Shown when the user has no category of `kind` yet.
#[must_use]
pub const fn no_categories_prompt(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Income => {
            "*You have no income categories*\n\nCreate at least one first:"
        }
        CategoryKind::Expense => {
            "*You have no expense categories*\n\nCreate at least one first:"
        }
    }
}

/// Escapes the characters legacy Markdown treats as markup.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `value` rounded half away from zero and printed with `dp` decimals.
#[must_use]
pub fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.prec$}", prec = dp as usize)
}

fn money(value: Decimal, dp: u32) -> String {
    format!("{}{CURRENCY}", fixed(value, dp))
}

/// ` (+x.x%⬆️)` / ` (x.x%⬇️)`, or nothing when `percent` is zero.
#[must_use]
pub fn change_suffix(percent: Decimal) -> String {
    if percent.is_zero() {
        String::new()
    } else if percent > Decimal::ZERO {
        format!(" (+{}%⬆️)", fixed(percent, 1))
    } else {
        format!(" ({}%⬇️)", fixed(percent, 1))
    }
}

/// Change shown in the monthly summary: bounded to ±1000% and omitted when
/// there is nothing to compare against.
#[must_use]
pub fn summary_change(current: Decimal, previous: Decimal) -> String {
    if previous.is_zero() {
        return String::new();
    }
    let change = percent_change(current, previous)
        .clamp(-SUMMARY_CHANGE_LIMIT, SUMMARY_CHANGE_LIMIT);
    if change > Decimal::ZERO {
        format!(" (+{}%⬆️)", fixed(change, 1))
    } else {
        format!(" ({}%⬇️)", fixed(change, 1))
    }
}

/// Full report text.
#[must_use]
pub fn report(report: &Report) -> String {
    let comparison = &report.trends.period_comparison;
    let data = &report.transaction_data;

    let mut sections = vec![
        format!("📊 *Report for {}*", report.period),
        [
            "*Key figures:*".to_string(),
            format!(
                "💰 Income: *{}*{}",
                money(report.total_income, 0),
                change_suffix(comparison.income_change)
            ),
            format!(
                "💸 Expenses: *{}*{}",
                money(report.total_expenses, 0),
                change_suffix(comparison.expense_change)
            ),
            format!(
                "💵 Balance: *{}*{}",
                money(report.balance, 0),
                change_suffix(comparison.balance_change)
            ),
        ]
        .join("\n"),
        [
            "*Transactions:*".to_string(),
            format!(
                "• Total: *{}* (💰 *{}*, 💸 *{}*)",
                data.total_count, data.income_count, data.expense_count
            ),
            format!("• Average income: *{}*", money(data.avg_income, 0)),
            format!("• Average expense: *{}*", money(data.avg_expense, 0)),
            format!("• Per day (income): *{}*", money(data.daily_avg_income, 0)),
            format!("• Per day (expenses): *{}*", money(data.daily_avg_expense, 0)),
        ]
        .join("\n"),
    ];

    let largest: Vec<String> = [("💰 +", &data.max_income), ("💸 -", &data.max_expense)]
        .into_iter()
        .filter_map(|(prefix, max)| {
            max.as_ref().map(|max| {
                format!("{prefix}*{}*: {}", money(max.amount, 0), escape(&max.description))
            })
        })
        .collect();
    sections.extend(titled("*Largest transactions:*", &largest));

    sections.extend(category_section("*Top expense categories:*", &report.category_data.expenses));
    sections.extend(category_section("*Top income categories:*", &report.category_data.income));

    let changes = &report.category_data.changes;
    let notable: Vec<String> = [
        ("📈", "Expenses grow fastest in", &changes.fastest_growing_expense),
        ("📉", "Expenses dropped most in", &changes.largest_drop_expense),
        ("📈", "Income grows fastest in", &changes.fastest_growing_income),
        ("📉", "Income dropped most in", &changes.largest_drop_income),
    ]
    .into_iter()
    .filter_map(|(emoji, label, change)| {
        change.as_ref().map(|change| {
            format!(
                "{emoji} *{label} '{}': {}%*",
                escape(&change.name),
                fixed(change.change_percent, 1)
            )
        })
    })
    .collect();
    sections.extend(titled("*Notable changes:*", &notable));

    sections.join("\n\n")
}

/// `title` followed by `lines`, or nothing when there are no lines.
fn titled(title: &str, lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    Some(format!("{title}\n{}", lines.join("\n")))
}

fn category_section(title: &str, stats: &[CategoryStats]) -> Option<String> {
    let lines: Vec<String> = stats
        .iter()
        .map(|category| {
            let share = category
                .share_percent
                .map(|share| format!(" ({}%)", fixed(share, 1)))
                .unwrap_or_default();
            format!(
                "• *{}*: *{}*{share}{}",
                escape(&category.name),
                money(category.amount.abs(), 0),
                change_suffix(category.trend_percent)
            )
        })
        .collect();
    titled(title, &lines)
}

/// Month summary text with month-over-month changes.
#[must_use]
pub fn monthly_summary(report: &Report) -> String {
    let current = &report.trends.period_comparison.current_period;
    let previous = &report.trends.period_comparison.prev_period;
    let savings = current.savings_rate();
    let previous_savings = previous.savings_rate();

    let lines = [
        format!(
            "💰 Income: {}{}",
            money(current.total_income, 2),
            summary_change(current.total_income, previous.total_income)
        ),
        format!(
            "💸 Expenses: {}{}",
            money(current.total_expenses, 2),
            summary_change(current.total_expenses, previous.total_expenses)
        ),
        format!(
            "📊 Balance: {}{}",
            money(current.balance, 2),
            summary_change(current.balance, previous.balance)
        ),
        format!(
            "📈 Average daily income: {}{}",
            money(current.avg_daily_income, 2),
            summary_change(current.avg_daily_income, previous.avg_daily_income)
        ),
        format!(
            "📉 Average daily expense: {}{}",
            money(current.avg_daily_expense, 2),
            summary_change(current.avg_daily_expense, previous.avg_daily_expense)
        ),
        format!(
            "💹 Savings rate: {}%{}",
            fixed(savings, 1),
            summary_change(savings, previous_savings)
        ),
    ];

    format!("📅 *Summary for {}*\n\n{}", report.period, lines.join("\n"))
}

/// Short summary pushed once a day.
#[must_use]
pub fn daily_digest(report: &Report) -> String {
    let comparison = &report.trends.period_comparison;
    format!(
        "*Your financial summary for today:*\n\n\
         💰 Income: {}{}\n\
         💸 Expenses: {}{}\n\
         💵 Balance: {}{}",
        money(report.total_income, 2),
        change_suffix(comparison.income_change),
        money(report.total_expenses, 2),
        change_suffix(comparison.expense_change),
        money(report.balance, 2),
        change_suffix(comparison.balance_change),
    )
}

/// Category management text.
#[must_use]
pub fn categories(categories: &[Category]) -> String {
    let names = |income: bool| -> Vec<String> {
        categories
            .iter()
            .filter(|c| c.kind.is_income() == income)
            .map(|c| format!("• {}", escape(&c.name)))
            .collect()
    };

    let mut sections = vec!["*Your categories*".to_string()];
    if categories.is_empty() {
        sections.push("You have no categories yet.".to_string());
    }
    sections.extend(titled("💰 *Income:*", &names(true)));
    sections.extend(titled("💸 *Expenses:*", &names(false)));
    sections.push("Tap a category to add a transaction or 🗑 to delete it".to_string());
    sections.join("\n\n")
}

/// Recent transactions text plus one button label per transaction.
#[must_use]
pub fn transactions(
    transactions: &[Transaction],
    categories: &[Category],
) -> (String, Vec<(TransactionId, String)>) {
    if transactions.is_empty() {
        return (
            "*Transaction history*\n\nYou have no transactions yet".to_string(),
            Vec::new(),
        );
    }

    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut text = String::from("*Recent transactions*\nTap a transaction to delete it\n\n");
    let mut buttons = Vec::with_capacity(transactions.len());
    for transaction in transactions {
        let name = names
            .get(&transaction.category_id)
            .copied()
            .unwrap_or(UNCATEGORIZED);
        let kind = if transaction.is_income() {
            CategoryKind::Income
        } else {
            CategoryKind::Expense
        };
        let emoji = kind_emoji(kind);
        let amount = money(transaction.amount.abs(), 2);
        let description = if transaction.description.is_empty() {
            String::new()
        } else {
            format!(" _{}_", escape(&transaction.description))
        };

        text.push_str(&format!("{emoji} *{}*: {amount}{description}\n", escape(name)));
        buttons.push((transaction.id, format!("{emoji} {name}: {amount}")));
    }

    (text, buttons)
}
