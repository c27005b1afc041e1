//! Inline keyboards.

use finbot_core::ledger::{Category, CategoryKind};
use finbot_core::reports::ReportKind;
use finbot_shared::types::TransactionId;

use crate::callback::Callback;
use crate::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};

fn button(text: impl Into<String>, callback: Callback) -> InlineKeyboardButton {
    InlineKeyboardButton::new(text, callback.to_string())
}

fn back() -> InlineKeyboardButton {
    button("« Back", Callback::Back)
}

/// Emoji marking the kind of a category.
#[must_use]
pub const fn kind_emoji(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Income => "💰",
        CategoryKind::Expense => "💸",
    }
}

/// Main menu.
#[must_use]
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::default()
        .row([
            button("💰 Add income", Callback::AddTransaction(CategoryKind::Income)),
            button("💸 Add expense", Callback::AddTransaction(CategoryKind::Expense)),
        ])
        .row([
            button("📊 Reports", Callback::ReportMenu),
            button("📋 Categories", Callback::Categories),
        ])
        .row([button("🗑 Transaction history", Callback::Transactions)])
}

/// Category management: every category with a delete button.
#[must_use]
pub fn categories(categories: &[Category]) -> InlineKeyboardMarkup {
    let mut markup = InlineKeyboardMarkup::default();
    for category in categories {
        markup = markup.row([
            button(
                format!("{} {}", kind_emoji(category.kind), category.name),
                Callback::SelectCategory(category.id),
            ),
            button("🗑", Callback::DeleteCategory(category.id)),
        ]);
    }
    markup
        .row([
            button("➕ Income", Callback::NewCategory(CategoryKind::Income)),
            button("➕ Expense", Callback::NewCategory(CategoryKind::Expense)),
        ])
        .row([back()])
}

/// Category picker used when adding a transaction.
#[must_use]
pub fn select_category(categories: &[Category]) -> InlineKeyboardMarkup {
    let mut markup = InlineKeyboardMarkup::default();
    for category in categories {
        markup = markup.row([button(
            format!("{} {}", kind_emoji(category.kind), category.name),
            Callback::SelectCategory(category.id),
        )]);
    }
    markup
        .row([button("⚙️ Manage categories", Callback::Categories)])
        .row([back()])
}

/// Report period picker.
#[must_use]
pub fn report_periods() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::default()
        .row([
            button("📊 Today", Callback::Report(ReportKind::Daily)),
            button("📈 Week", Callback::Report(ReportKind::Weekly)),
        ])
        .row([
            button("📋 Month", Callback::Report(ReportKind::Monthly)),
            button("📅 Year", Callback::Report(ReportKind::Yearly)),
        ])
        .row([back()])
}

/// Keyboard under a finished report.
#[must_use]
pub fn after_report() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::default().row([
        button("📊 Other period", Callback::ReportMenu),
        button("« Menu", Callback::Back),
    ])
}

/// Keyboard under the daily digest.
#[must_use]
pub fn digest() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::default().row([button(
        "📊 Detailed report",
        Callback::Report(ReportKind::Daily),
    )])
}

/// One delete button per listed transaction.
#[must_use]
pub fn transactions<'a>(
    entries: impl IntoIterator<Item = (TransactionId, &'a str)>,
) -> InlineKeyboardMarkup {
    let mut markup = InlineKeyboardMarkup::default();
    for (id, label) in entries {
        markup = markup.row([button(label, Callback::DeleteTransaction(id))]);
    }
    markup.row([back()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use finbot_shared::types::{CategoryId, UserId};

    fn category(name: &str, kind: CategoryKind) -> Category {
        Category {
            id: CategoryId::new(),
            user_id: UserId(1),
            name: name.to_string(),
            kind,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_every_button_parses_back() {
        let cats = [
            category("Food", CategoryKind::Expense),
            category("Salary", CategoryKind::Income),
        ];
        let label = "x".to_string();
        let keyboards = [
            main_menu(),
            categories(&cats),
            select_category(&cats),
            report_periods(),
            after_report(),
            digest(),
            transactions([(TransactionId::new(), label.as_str())]),
        ];
        for keyboard in &keyboards {
            for data in keyboard.callback_data() {
                assert!(data.parse::<Callback>().is_ok(), "{data} does not parse");
            }
        }
    }

    #[test]
    fn test_categories_rows() {
        let food = category("Food", CategoryKind::Expense);
        let salary = category("Salary", CategoryKind::Income);
        let markup = categories(&[food.clone(), salary]);

        assert_eq!(markup.inline_keyboard.len(), 4);
        let first = &markup.inline_keyboard[0];
        assert_eq!(first[0].text, "💸 Food");
        assert_eq!(first[0].callback_data, format!("category_{}", food.id));
        assert_eq!(first[1].callback_data, format!("delete_category_{}", food.id));
        assert_eq!(markup.inline_keyboard[1][0].text, "💰 Salary");
        assert_eq!(markup.inline_keyboard[3][0].callback_data, "action_back");
    }

    #[test]
    fn test_select_category_has_no_delete_buttons() {
        let markup = select_category(&[category("Food", CategoryKind::Expense)]);
        assert!(markup.callback_data().all(|d| !d.starts_with("delete_")));
        assert_eq!(markup.inline_keyboard.len(), 3);
    }
}
