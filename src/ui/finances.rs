use super::{delete_button, escape_html, render_page, render_table};
use crate::collection::Document;
use crate::finances::{MonthlySummary, Transaction, TransactionKind, TRANSACTION_LIST};
use chrono::NaiveDate;

pub fn render_finances(
    summary: &MonthlySummary,
    rows: &[&Document<Transaction>],
    default_date: NaiveDate,
) -> String {
    let month = escape_html(&summary.month);
    let net_class = if summary.net < 0.0 { "negative" } else { "positive" };

    let table = render_table(&TRANSACTION_LIST, rows, |doc| {
        delete_button(
            &format!("/finances/transactions/{}/delete", doc.id),
            &[("month", summary.month.as_str())],
        )
    });

    let body = format!(
        r#"<header>
  <h1>Finances</h1>
  <p class="subtitle">{count} transactions in {month}</p>
</header>
<section class="toolbar">
  <form method="get" action="/finances" class="toolbar">
    <label>Month <input type="month" name="month" value="{month}" /></label>
    <button class="btn" type="submit">Show</button>
  </form>
</section>
<section class="panel">
  <div class="stat"><span class="label">Income</span><span class="value positive">{income:.2}</span></div>
  <div class="stat"><span class="label">Expenses</span><span class="value negative">{expense:.2}</span></div>
  <div class="stat"><span class="label">Net</span><span class="value {net_class}">{net:.2}</span></div>
</section>
<section class="card">
  <h2>Add transaction</h2>
  <form method="post" action="/finances/transactions" class="grid">
    <label>Date <input type="date" name="date" value="{default_date}" required /></label>
    <label>Type
      <select name="kind">
        <option value="expense">Expense</option>
        <option value="income">Income</option>
      </select>
    </label>
    <label>Category <select name="category" required>{categories}</select></label>
    <label>Amount <input type="number" step="0.01" min="0" name="amount" required /></label>
    <label>Notes <input name="notes" /></label>
    <input type="hidden" name="month" value="{month}" />
    <div><button class="btn primary" type="submit">Add</button></div>
  </form>
</section>
<section class="card">
  <h2>Transactions</h2>
  {table}
</section>"#,
        count = summary.count,
        income = summary.income,
        expense = summary.expense,
        net = summary.net,
        categories = category_options(),
    );

    render_page("Finances", "Finances", &body)
}

fn category_options() -> String {
    [TransactionKind::Expense, TransactionKind::Income]
        .iter()
        .map(|kind| {
            let options = kind
                .categories()
                .iter()
                .map(|category| {
                    let category = escape_html(category);
                    format!("<option value=\"{category}\">{category}</option>")
                })
                .collect::<String>();
            format!("<optgroup label=\"{}\">{options}</optgroup>", kind.as_str())
        })
        .collect()
}
