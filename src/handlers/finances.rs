use super::{optional_date, required_number};
use crate::collection::ListQuery;
use crate::dates::{month_key, parse_month, today};
use crate::errors::AppError;
use crate::finances::{
    monthly_summary, MonthlySummary, Transaction, TransactionKind, EXPENSE_CATEGORIES,
    INCOME_CATEGORIES,
};
use crate::state::AppState;
use crate::ui::finances::render_finances;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    fn resolve(&self) -> Result<String, AppError> {
        match self.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(raw) => parse_month(raw)
                .ok_or_else(|| AppError::bad_request(format!("month must be YYYY-MM, got {raw:?}"))),
            None => Ok(month_key(today())),
        }
    }
}

fn month_redirect(month: &str) -> Redirect {
    Redirect::to(&format!("/finances?month={month}"))
}

pub async fn page(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Html<String>, AppError> {
    let month = query.resolve()?;
    let data = state.data.lock().await;
    let summary = monthly_summary(&data.transactions, &month);
    let rows = data.transactions.query(&ListQuery {
        filter: Some(month.clone()),
        ..ListQuery::default()
    });

    // New entries default to today when viewing the current month.
    let today = today();
    let default_date = if month_key(today) == month {
        today
    } else {
        NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").unwrap_or(today)
    };

    Ok(Html(render_finances(&summary, &rows, default_date)))
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    pub date: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
    pub notes: Option<String>,
}

impl TransactionForm {
    fn to_transaction(&self) -> Result<Transaction, AppError> {
        let kind = match self.kind.as_deref().map(str::trim) {
            Some("income") => TransactionKind::Income,
            Some("expense") | None => TransactionKind::Expense,
            Some(other) => {
                return Err(AppError::bad_request(format!(
                    "kind must be income or expense, got {other:?}"
                )));
            }
        };
        let date = optional_date("date", self.date.as_deref())?
            .ok_or_else(|| AppError::unprocessable("date is required"))?;

        Ok(Transaction {
            date,
            kind,
            category: self.category.clone().unwrap_or_default(),
            amount: required_number("amount", self.amount.as_deref())?,
            notes: self.notes.clone().unwrap_or_default(),
            source: "manual".to_string(),
        })
    }
}

pub async fn create_form(
    State(state): State<AppState>,
    Form(form): Form<TransactionForm>,
) -> Result<Redirect, AppError> {
    let transaction = form.to_transaction()?;
    let month = transaction.month();
    let id = state
        .mutate(|data| {
            data.transactions
                .insert(transaction, Utc::now())
                .map(|doc| doc.id.clone())
        })
        .await?;
    info!("created transaction {id}");
    Ok(month_redirect(&month))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(query): Form<MonthQuery>,
) -> Result<Redirect, AppError> {
    let month = query.resolve()?;
    state
        .mutate(|data| data.transactions.remove(&id).map(|_| ()))
        .await?;
    info!("deleted transaction {id}");
    Ok(month_redirect(&month))
}

pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlySummary>, AppError> {
    let month = query.resolve()?;
    let data = state.data.lock().await;
    Ok(Json(monthly_summary(&data.transactions, &month)))
}

#[derive(Debug, Serialize)]
pub struct Categories {
    pub income: &'static [&'static str],
    pub expense: &'static [&'static str],
}

pub async fn categories() -> Json<Categories> {
    Json(Categories {
        income: INCOME_CATEGORIES,
        expense: EXPENSE_CATEGORIES,
    })
}
