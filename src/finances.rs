use crate::collection::{Collection, Column, Document, ListConfig, Record, SortValue};
use crate::dates::{month_key, parse_month};
use crate::errors::RecordError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const INCOME_CATEGORIES: &[&str] = &["Brandy", "Beau", "Other"];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Vehicle Expenses",
    "Groceries",
    "Mortgage",
    "Utilities",
    "Subscriptions",
    "Fuel",
    "Insurance",
    "Home/Barn MX",
    "Kids/Activities",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn categories(self) -> &'static [&'static str] {
        match self {
            Self::Income => INCOME_CATEGORIES,
            Self::Expense => EXPENSE_CATEGORIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: String,
    /// Signed: income is positive, expenses negative.
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "manual_source")]
    pub source: String,
}

fn manual_source() -> String {
    "manual".to_string()
}

impl Transaction {
    pub fn month(&self) -> String {
        month_key(self.date)
    }
}

impl Record for Transaction {
    const STORE: &'static str = "transactions";

    fn list_config() -> &'static ListConfig<Self> {
        &TRANSACTION_LIST
    }

    fn normalize(mut self) -> Self {
        self.amount = match self.kind {
            TransactionKind::Income => self.amount.abs(),
            TransactionKind::Expense => -self.amount.abs(),
        };
        self.category = self.category.trim().to_string();
        self.notes = self.notes.trim().to_string();
        if self.source.trim().is_empty() {
            self.source = manual_source();
        }
        self
    }

    fn validate(&self) -> Result<(), RecordError> {
        if !self.amount.is_finite() {
            return Err(RecordError::Missing("amount"));
        }
        if !self.kind.categories().contains(&self.category.as_str()) {
            return Err(RecordError::UnknownCategory {
                kind: self.kind.as_str(),
                category: self.category.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: String,
    pub income: f64,
    /// Reported as a positive magnitude.
    pub expense: f64,
    pub net: f64,
    pub count: usize,
}

pub fn monthly_summary(transactions: &Collection<Transaction>, month: &str) -> MonthlySummary {
    let mut summary = MonthlySummary {
        month: month.to_string(),
        income: 0.0,
        expense: 0.0,
        net: 0.0,
        count: 0,
    };
    for doc in transactions.iter().filter(|doc| doc.fields.month() == month) {
        if doc.fields.amount > 0.0 {
            summary.income += doc.fields.amount;
        } else {
            summary.expense += doc.fields.amount.abs();
        }
        summary.count += 1;
    }
    summary.net = summary.income - summary.expense;
    summary
}

fn date_cell(doc: &Document<Transaction>) -> String {
    doc.fields.date.to_string()
}

fn date_sort(doc: &Document<Transaction>) -> SortValue {
    SortValue::Date(doc.fields.date)
}

fn kind_cell(doc: &Document<Transaction>) -> String {
    doc.fields.kind.as_str().to_string()
}

fn category_cell(doc: &Document<Transaction>) -> String {
    doc.fields.category.clone()
}

fn category_sort(doc: &Document<Transaction>) -> SortValue {
    doc.fields.category.as_str().into()
}

fn amount_cell(doc: &Document<Transaction>) -> String {
    format!("{:.2}", doc.fields.amount)
}

fn amount_sort(doc: &Document<Transaction>) -> SortValue {
    SortValue::Number(doc.fields.amount)
}

fn notes_cell(doc: &Document<Transaction>) -> String {
    doc.fields.notes.clone()
}

/// Accepts a `YYYY-MM` month or a transaction kind.
fn transaction_filter(transaction: &Transaction, value: &str) -> bool {
    match parse_month(value) {
        Some(month) => transaction.month() == month,
        None => transaction.kind.as_str().eq_ignore_ascii_case(value),
    }
}

pub static TRANSACTION_LIST: ListConfig<Transaction> = ListConfig {
    columns: &[
        Column { key: "date", label: "Date", cell: date_cell, sort: Some(date_sort) },
        Column { key: "kind", label: "Type", cell: kind_cell, sort: None },
        Column { key: "category", label: "Category", cell: category_cell, sort: Some(category_sort) },
        Column { key: "amount", label: "Amount", cell: amount_cell, sort: Some(amount_sort) },
        Column { key: "notes", label: "Notes", cell: notes_cell, sort: None },
    ],
    default_sort: "date",
    default_ascending: false,
    filter: Some(transaction_filter),
    empty_message: "No transactions this month",
};
