pub mod barn;
pub mod finances;
pub mod fitness;

use crate::collection::{Document, ListConfig};
use crate::finances::MonthlySummary;
use crate::fitness::DailyTotals;
use chrono::NaiveDate;

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render_page(title: &str, active: &str, body: &str) -> String {
    let nav = [("/", "Home"), ("/barn", "Barn"), ("/finances", "Finances"), ("/fitness", "Fitness")]
        .iter()
        .map(|(href, label)| {
            let class = if *label == active { " class=\"active\"" } else { "" };
            format!("<a href=\"{href}\"{class}>{label}</a>")
        })
        .collect::<String>();

    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{NAV}}", &nav)
        .replace("{{BODY}}", body)
}

/// Renders a list as a table using the record type's column mapping.
/// `actions` returns trusted HTML for the trailing cell of each row.
pub fn render_table<T, F>(config: &ListConfig<T>, rows: &[&Document<T>], actions: F) -> String
where
    T: 'static,
    F: Fn(&Document<T>) -> String,
{
    let mut html = String::from("<table><thead><tr>");
    for column in config.columns {
        html.push_str(&format!(
            "<th data-k=\"{}\">{}</th>",
            column.key,
            escape_html(column.label)
        ));
    }
    html.push_str("<th></th></tr></thead><tbody>");

    if rows.is_empty() {
        html.push_str(&format!(
            "<tr><td class=\"muted\" colspan=\"{}\">{}</td></tr>",
            config.columns.len() + 1,
            escape_html(config.empty_message)
        ));
    }
    for doc in rows {
        html.push_str(&format!("<tr data-id=\"{}\">", escape_html(&doc.id)));
        for column in config.columns {
            html.push_str(&format!("<td>{}</td>", escape_html(&(column.cell)(*doc))));
        }
        html.push_str(&format!("<td class=\"actions\">{}</td></tr>", actions(*doc)));
    }
    html.push_str("</tbody></table>");
    html
}

/// A POST form holding a single delete button.
pub fn delete_button(action: &str, hidden: &[(&str, &str)]) -> String {
    let fields = hidden
        .iter()
        .map(|(name, value)| {
            format!(
                "<input type=\"hidden\" name=\"{name}\" value=\"{}\" />",
                escape_html(value)
            )
        })
        .collect::<String>();
    format!(
        "<form method=\"post\" action=\"{}\" class=\"inline\" onsubmit=\"return confirm('Delete this record?')\">{fields}<button class=\"btn danger\" type=\"submit\">Delete</button></form>",
        escape_html(action)
    )
}

pub struct HomeSummary {
    pub today: NaiveDate,
    pub occupied: usize,
    pub scheduled: usize,
    pub empty: usize,
    pub month: MonthlySummary,
    pub fitness: DailyTotals,
}

pub fn render_index(summary: &HomeSummary) -> String {
    let body = format!(
        r#"<header>
  <h1>Family Dashboard</h1>
  <p class="subtitle">{today}</p>
</header>
<section class="panel">
  <a class="stat card-link" href="/barn">
    <span class="label">Barn</span>
    <span class="value">{occupied} occupied</span>
    <span class="muted">{scheduled} scheduled &middot; {empty} empty</span>
  </a>
  <a class="stat card-link" href="/finances">
    <span class="label">Finances &middot; {month}</span>
    <span class="value">{net:.2} net</span>
    <span class="muted">In {income:.2} &middot; Out {expense:.2}</span>
  </a>
  <a class="stat card-link" href="/fitness">
    <span class="label">Fitness &middot; today</span>
    <span class="value">{cal_net} kcal net</span>
    <span class="muted">In {cal_in} &middot; Out {cal_out} &middot; Protein {protein:.1} g</span>
  </a>
</section>"#,
        today = summary.today,
        occupied = summary.occupied,
        scheduled = summary.scheduled,
        empty = summary.empty,
        month = escape_html(&summary.month.month),
        net = summary.month.net,
        income = summary.month.income,
        expense = summary.month.expense,
        cal_net = summary.fitness.net,
        cal_in = summary.fitness.calories_in,
        cal_out = summary.fitness.calories_out,
        protein = summary.fitness.protein,
    );
    render_page("Family Dashboard", "Home", &body)
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg-1: #0f172a;
      --bg-2: #1e293b;
      --ink: #e6eefc;
      --mute: #94a3b8;
      --accent: #2563eb;
      --occ: rgba(37, 99, 235, 0.55);
      --sch: rgba(245, 158, 11, 0.55);
      --emp: rgba(107, 114, 128, 0.3);
      --danger: #c63b2b;
      --card: rgba(30, 41, 59, 0.9);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Inter", "Trebuchet MS", sans-serif;
    }

    nav {
      display: flex;
      gap: 6px;
      padding: 14px 24px;
      background: rgba(15, 23, 42, 0.8);
    }

    nav a {
      color: var(--mute);
      text-decoration: none;
      padding: 6px 12px;
      border-radius: 999px;
    }

    nav a.active {
      background: var(--accent);
      color: white;
    }

    main {
      width: min(1100px, 100%);
      margin: 0 auto;
      padding: 24px 18px 48px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    h2 {
      margin: 0 0 10px;
      font-size: 1.2rem;
    }

    .subtitle,
    .muted {
      color: var(--mute);
    }

    .subtitle {
      margin: 4px 0 0;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
    }

    .card,
    .stat {
      background: var(--card);
      border-radius: 16px;
      padding: 18px;
      border: 1px solid rgba(148, 163, 184, 0.15);
    }

    .stat {
      display: grid;
      gap: 6px;
    }

    .card-link {
      color: inherit;
      text-decoration: none;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--mute);
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: center;
    }

    .chip,
    .btn {
      display: inline-flex;
      align-items: center;
      border: 1px solid rgba(148, 163, 184, 0.3);
      border-radius: 999px;
      padding: 6px 12px;
      background: transparent;
      color: var(--ink);
      text-decoration: none;
      font-size: 0.9rem;
      cursor: pointer;
    }

    .chip.active,
    .btn.primary {
      background: var(--accent);
      border-color: var(--accent);
      color: white;
    }

    .btn.danger {
      border-color: var(--danger);
      color: #fca5a5;
    }

    .barn-map {
      position: relative;
      width: 100%;
      background-size: 100% 100%;
      background-color: rgba(15, 23, 42, 0.6);
      border-radius: 12px;
      overflow: hidden;
    }

    .stall-btn {
      position: absolute;
      display: grid;
      place-items: center;
      border: 2px solid rgba(255, 255, 255, 0.6);
      border-radius: 6px;
      color: white;
      font-weight: 700;
      text-decoration: none;
    }

    .stall-btn.occupied {
      background: var(--occ);
    }

    .stall-btn.scheduled {
      background: var(--sch);
    }

    .stall-btn.empty {
      background: var(--emp);
    }

    .stall-btn.faded {
      background: transparent;
      opacity: 0.25;
    }

    .stall-btn.selected {
      border-color: #60a5fa;
      box-shadow: 0 0 0 3px rgba(96, 165, 250, 0.5);
    }

    .badge {
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.8rem;
    }

    .badge.occupied {
      background: var(--occ);
    }

    .badge.scheduled {
      background: var(--sch);
    }

    .badge.empty {
      background: var(--emp);
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.92rem;
    }

    th,
    td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid rgba(148, 163, 184, 0.15);
    }

    th {
      color: var(--mute);
      font-weight: 500;
    }

    td.actions {
      white-space: nowrap;
      text-align: right;
    }

    form.grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 10px;
      align-items: end;
    }

    form.inline {
      display: inline;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.85rem;
      color: var(--mute);
    }

    input,
    select {
      padding: 8px;
      border-radius: 8px;
      border: 1px solid rgba(148, 163, 184, 0.3);
      background: rgba(15, 23, 42, 0.7);
      color: var(--ink);
    }

    .positive {
      color: #86efac;
    }

    .negative {
      color: #fca5a5;
    }
  </style>
</head>
<body>
  <nav>{{NAV}}</nav>
  <main>
{{BODY}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{Collection, ListQuery};
    use crate::fitness::{Food, FOOD_LIST};
    use chrono::Utc;

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<b a="1">Tom & Jerry's</b>"#),
            "&lt;b a=&quot;1&quot;&gt;Tom &amp; Jerry&#39;s&lt;/b&gt;"
        );
    }

    #[test]
    fn render_table_escapes_cells_and_reports_empty() {
        let mut foods = Collection::default();
        foods
            .insert(
                Food {
                    name: "<script>".into(),
                    serving: "1".into(),
                    calories: 10.0,
                    protein: 1.0,
                },
                Utc::now(),
            )
            .unwrap();
        let rows = foods.query(&ListQuery::default());
        let html = render_table(&FOOD_LIST, &rows, |_| String::new());
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));

        let html = render_table(&FOOD_LIST, &[], |_| String::new());
        assert!(html.contains("No foods yet"));
        assert!(html.contains("colspan=\"5\""));
    }

    #[test]
    fn page_marks_active_nav_entry() {
        let html = render_page("Barn", "Barn", "<p>hi</p>");
        assert!(html.contains("<a href=\"/barn\" class=\"active\">Barn</a>"));
        assert!(html.contains("<p>hi</p>"));
    }
}
