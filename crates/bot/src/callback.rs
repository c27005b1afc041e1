//! Inline button payloads.

use std::fmt;
use std::str::FromStr;

use finbot_core::ledger::CategoryKind;
use finbot_core::reports::ReportKind;
use finbot_shared::types::{CategoryId, TransactionId};

/// What a pressed button asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    /// Start entering an income or expense.
    AddTransaction(CategoryKind),
    /// Open the report period picker.
    ReportMenu,
    /// Open category management.
    Categories,
    /// Open the recent transactions list.
    Transactions,
    /// Back to the main menu.
    Back,
    /// Ask for the name of a new category.
    NewCategory(CategoryKind),
    /// Category picked for a new transaction.
    SelectCategory(CategoryId),
    /// Delete a category and its transactions.
    DeleteCategory(CategoryId),
    /// Delete one transaction.
    DeleteTransaction(TransactionId),
    /// Build a report.
    Report(ReportKind),
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddTransaction(kind) => write!(f, "action_add_{kind}"),
            Self::ReportMenu => f.write_str("action_report"),
            Self::Categories => f.write_str("action_categories"),
            Self::Transactions => f.write_str("action_transactions"),
            Self::Back => f.write_str("action_back"),
            Self::NewCategory(kind) => write!(f, "add_{kind}_category"),
            Self::SelectCategory(id) => write!(f, "category_{id}"),
            Self::DeleteCategory(id) => write!(f, "delete_category_{id}"),
            Self::DeleteTransaction(id) => write!(f, "delete_transaction_{id}"),
            Self::Report(kind) => write!(f, "report_{kind}"),
        }
    }
}

impl FromStr for Callback {
    type Err = String;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let unknown = || format!("unknown callback data: {data}");

        let parsed = match data {
            "action_add_income" => Self::AddTransaction(CategoryKind::Income),
            "action_add_expense" => Self::AddTransaction(CategoryKind::Expense),
            "action_report" => Self::ReportMenu,
            "action_categories" => Self::Categories,
            "action_transactions" => Self::Transactions,
            "action_back" => Self::Back,
            "add_income_category" => Self::NewCategory(CategoryKind::Income),
            "add_expense_category" => Self::NewCategory(CategoryKind::Expense),
            _ => {
                if let Some(id) = data.strip_prefix("delete_category_") {
                    Self::DeleteCategory(id.parse().map_err(|_| unknown())?)
                } else if let Some(id) = data.strip_prefix("delete_transaction_") {
                    Self::DeleteTransaction(id.parse().map_err(|_| unknown())?)
                } else if let Some(id) = data.strip_prefix("category_") {
                    Self::SelectCategory(id.parse().map_err(|_| unknown())?)
                } else if let Some(kind) = data.strip_prefix("report_") {
                    Self::Report(kind.parse().map_err(|_| unknown())?)
                } else {
                    return Err(unknown());
                }
            }
        };
        Ok(parsed)
    }
}
