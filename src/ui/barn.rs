use super::{delete_button, escape_html, render_page, render_table};
use crate::barn::{find_stall, Stall, STALLS};
use crate::collection::Document;
use crate::config::BarnImage;
use crate::occupancy::{OccupancyRecord, StallState, StallStatus, OCCUPANCY_LIST};
use crate::view::{BarnBoard, BarnEvent, BarnView, BoardTable, StallTile, StatusFilter};

pub fn render_barn(
    board: &BarnBoard<'_>,
    image: &BarnImage,
    editing: Option<&Document<OccupancyRecord>>,
) -> String {
    let view = board.view;
    let mut body = String::new();

    body.push_str(&format!(
        r#"<header>
  <h1>Barn Stalls</h1>
  <p class="subtitle">{occupied} occupied &middot; {scheduled} scheduled &middot; {empty} empty on {as_of}</p>
</header>"#,
        occupied = board.count(StallState::Occupied),
        scheduled = board.count(StallState::Scheduled),
        empty = board.count(StallState::Empty),
        as_of = view.as_of,
    ));

    body.push_str(&render_toolbar(&view));
    body.push_str(&render_overlay(&board.tiles, &view, image));
    body.push_str(&render_board_table(&board.table, &view));
    body.push_str(&render_form(&view, editing));

    render_page("Barn Stalls", "Barn", &body)
}

fn render_toolbar(view: &BarnView) -> String {
    let chips = StatusFilter::VARIANTS
        .iter()
        .map(|&filter| {
            let class = if filter == view.filter { "chip active" } else { "chip" };
            format!(
                "<a class=\"{class}\" href=\"{}\">{}</a>",
                escape_html(&view.apply(BarnEvent::SetFilter(filter)).href()),
                filter.label()
            )
        })
        .collect::<String>();

    let stall_field = view
        .selected
        .map(|stall| format!("<input type=\"hidden\" name=\"stall\" value=\"{}\" />", stall.id))
        .unwrap_or_default();

    let clear = if view.selected.is_some() {
        format!(
            "<a class=\"btn\" href=\"{}\">Clear selection</a>",
            escape_html(&view.apply(BarnEvent::ClearSelection).href())
        )
    } else {
        String::new()
    };

    format!(
        r#"<section class="toolbar">
  <form method="get" action="/barn" class="toolbar">
    <label>As of <input type="date" name="as_of" value="{as_of}" /></label>
    <input type="hidden" name="filter" value="{filter}" />
    {stall_field}
    <button class="btn" type="submit">Show</button>
  </form>
  {chips}
  {clear}
</section>"#,
        as_of = view.as_of,
        filter = view.filter.as_str(),
    )
}

fn render_overlay(tiles: &[StallTile<'_>], view: &BarnView, image: &BarnImage) -> String {
    let background = image
        .url
        .as_deref()
        .map(|url| format!("background-image:url('{}');", escape_html(url)))
        .unwrap_or_default();

    let buttons = tiles
        .iter()
        .filter_map(|tile| {
            let rect = tile.stall.rect.to_percent(image.size)?;
            let mut class = format!("stall-btn {}", tile.status.state.as_str());
            if !tile.emphasized {
                class.push_str(" faded");
            }
            if tile.selected {
                class.push_str(" selected");
            }
            Some(format!(
                "<a class=\"{class}\" data-stall=\"{id}\" title=\"{title}\" href=\"{href}\" style=\"left:{left:.3}%;top:{top:.3}%;width:{width:.3}%;height:{height:.3}%\"><span class=\"num\">{number}</span></a>",
                id = tile.stall.id,
                title = escape_html(&tile_title(tile.stall, &tile.status)),
                href = escape_html(&view.apply(BarnEvent::SelectStall(tile.stall.id)).href()),
                left = rect.left,
                top = rect.top,
                width = rect.width,
                height = rect.height,
                number = tile.stall.number,
            ))
        })
        .collect::<String>();

    format!(
        "<section class=\"card\"><div class=\"barn-map\" style=\"aspect-ratio:{w} / {h};{background}\">{buttons}</div></section>",
        w = image.size.width,
        h = image.size.height,
    )
}

fn tile_title(stall: &Stall, status: &StallStatus<'_>) -> String {
    match status.record {
        Some(doc) => format!(
            "Stall {} - {} ({})",
            stall.number,
            doc.fields.horse_name,
            status.state.as_str()
        ),
        None => format!("Stall {} - empty", stall.number),
    }
}

fn render_board_table(table: &BoardTable<'_>, view: &BarnView) -> String {
    match table {
        BoardTable::AsOf(rows) => {
            let body = if rows.is_empty() {
                "<tr><td class=\"muted\" colspan=\"8\">No stalls match this filter.</td></tr>".to_string()
            } else {
                rows.iter()
                    .map(|(stall, status)| render_as_of_row(stall, status, view))
                    .collect()
            };
            format!(
                r#"<section class="card">
  <h2>Occupancy on {as_of}</h2>
  <p class="muted">All stalls</p>
  <table>
    <thead><tr><th>Stall</th><th>Status</th><th>Horse</th><th>Owner</th><th>Arrival</th><th>Departure</th><th>Rate / mo</th><th></th></tr></thead>
    <tbody>{body}</tbody>
  </table>
</section>"#,
                as_of = view.as_of,
            )
        }
        BoardTable::History { stall, records } => {
            let table = render_table(&OCCUPANCY_LIST, records, |doc| record_actions(doc, view));
            format!(
                r#"<section class="card">
  <h2>History &middot; Stall {number}</h2>
  <p class="muted">Newest first</p>
  {table}
</section>"#,
                number = stall.number,
            )
        }
    }
}

fn render_as_of_row(stall: &Stall, status: &StallStatus<'_>, view: &BarnView) -> String {
    let badge = format!(
        "<span class=\"badge {state}\">{state}</span>",
        state = status.state.as_str()
    );
    match status.record {
        Some(doc) => format!(
            "<tr data-id=\"{id}\"><td>{number}</td><td>{badge}</td><td>{horse}</td><td>{owner}</td><td>{arrival}</td><td>{departure}</td><td>{rate}</td><td class=\"actions\">{actions}</td></tr>",
            id = escape_html(&doc.id),
            number = stall.number,
            horse = escape_html(&doc.fields.horse_name),
            owner = escape_html(&doc.fields.owner_name),
            arrival = doc.fields.arrival_date.map(|d| d.to_string()).unwrap_or_default(),
            departure = doc.fields.departure_date.map(|d| d.to_string()).unwrap_or_default(),
            rate = doc
                .fields
                .monthly_rate
                .map(|rate| format!("{rate:.2}"))
                .unwrap_or_default(),
            actions = record_actions(doc, view),
        ),
        None => format!(
            "<tr><td>{number}</td><td>{badge}</td><td colspan=\"5\" class=\"muted\">Empty</td><td class=\"actions\"><a class=\"btn\" href=\"{href}#record-form\">Add</a></td></tr>",
            number = stall.number,
            href = escape_html(&view.apply(BarnEvent::SelectStall(stall.id)).href()),
        ),
    }
}

fn record_actions(doc: &Document<OccupancyRecord>, view: &BarnView) -> String {
    let edit_href = format!("{}&edit={}#record-form", view.href(), doc.id);
    let as_of = view.as_of.to_string();
    let stall = view.selected.map(|stall| stall.id).unwrap_or_default();
    format!(
        "<a class=\"btn\" href=\"{}\">Edit</a> {}",
        escape_html(&edit_href),
        delete_button(
            &format!("/barn/occupancies/{}/delete", doc.id),
            &[
                ("view_as_of", as_of.as_str()),
                ("view_filter", view.filter.as_str()),
                ("view_stall", stall),
            ],
        )
    )
}

fn render_form(view: &BarnView, editing: Option<&Document<OccupancyRecord>>) -> String {
    let (action, heading, submit) = match editing {
        Some(doc) => (
            format!("/barn/occupancies/{}", doc.id),
            format!("Edit record {}", doc.id),
            "Update",
        ),
        None => ("/barn/occupancies".to_string(), "New occupancy".to_string(), "Save"),
    };

    let record = editing.map(|doc| &doc.fields);
    let selected_stall = record
        .and_then(|record| record.stall_id.as_deref())
        .and_then(find_stall)
        .or(view.selected);
    let stall_options = STALLS
        .iter()
        .map(|stall| {
            let selected = if selected_stall.is_some_and(|s| s.id == stall.id) {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{id}\"{selected}>{number} ({id})</option>",
                id = stall.id,
                number = stall.number
            )
        })
        .collect::<String>();

    let text = |value: Option<&str>| escape_html(value.unwrap_or_default());
    let arrival = record
        .map(|record| record.arrival_date.map(|d| d.to_string()).unwrap_or_default())
        .unwrap_or_else(|| view.as_of.to_string());
    let departure = record
        .and_then(|record| record.departure_date)
        .map(|d| d.to_string())
        .unwrap_or_default();
    let rate = record
        .and_then(|record| record.monthly_rate)
        .map(|rate| rate.to_string())
        .unwrap_or_default();
    let cancel = if editing.is_some() {
        format!("<a class=\"btn\" href=\"{}\">Cancel</a>", escape_html(&view.href()))
    } else {
        String::new()
    };

    format!(
        r#"<section class="card" id="record-form">
  <h2>{heading}</h2>
  <form method="post" action="{action}" class="grid">
    <label>Stall <select name="stall_id" required><option value="">-</option>{stall_options}</select></label>
    <label>Horse <input name="horse_name" value="{horse}" /></label>
    <label>Owner <input name="owner_name" value="{owner}" /></label>
    <label>Arrival <input type="date" name="arrival_date" value="{arrival}" required /></label>
    <label>Departure <input type="date" name="departure_date" value="{departure}" /></label>
    <label>Rate / mo <input type="number" step="0.01" min="0" name="monthly_rate" value="{rate}" /></label>
    <label>Notes <input name="notes" value="{notes}" /></label>
    <input type="hidden" name="view_as_of" value="{view_as_of}" />
    <input type="hidden" name="view_filter" value="{view_filter}" />
    <input type="hidden" name="view_stall" value="{view_stall}" />
    <div><button class="btn primary" type="submit">{submit}</button> {cancel}</div>
  </form>
</section>"#,
        heading = escape_html(&heading),
        action = escape_html(&action),
        horse = text(record.map(|record| record.horse_name.as_str())),
        owner = text(record.map(|record| record.owner_name.as_str())),
        notes = text(record.and_then(|record| record.notes.as_deref())),
        view_as_of = view.as_of,
        view_filter = view.filter.as_str(),
        view_stall = view.selected.map(|stall| stall.id).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::view::build_board;
    use chrono::{NaiveDate, Utc};

    fn records() -> Collection<OccupancyRecord> {
        let mut records = Collection::default();
        records
            .insert(
                OccupancyRecord {
                    stall_id: Some("S02".into()),
                    horse_name: "Dusty <Jr>".into(),
                    owner_name: "Kim".into(),
                    arrival_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                    ..OccupancyRecord::default()
                },
                Utc::now(),
            )
            .unwrap();
        records
    }

    #[test]
    fn overlay_places_every_stall_and_colors_by_state() {
        let records = records();
        let view = BarnView::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let html = render_barn(&build_board(view, &records), &BarnImage::default(), None);

        assert_eq!(html.matches("class=\"stall-btn").count(), 18);
        assert!(html.contains("class=\"stall-btn occupied\" data-stall=\"S02\""));
        assert!(html.contains("Dusty &lt;Jr&gt;"));
        assert!(!html.contains("Dusty <Jr>"));
    }

    #[test]
    fn filtered_out_stalls_are_faded() {
        let records = records();
        let view = BarnView::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
            .apply(BarnEvent::SetFilter(StatusFilter::Empty));
        let html = render_barn(&build_board(view, &records), &BarnImage::default(), None);
        assert!(html.contains("class=\"stall-btn occupied faded\" data-stall=\"S02\""));
    }

    #[test]
    fn edit_form_targets_record() {
        let records = records();
        let doc = records.iter().next().unwrap();
        let view = BarnView::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let html = render_barn(&build_board(view, &records), &BarnImage::default(), Some(doc));
        assert!(html.contains(&format!("action=\"/barn/occupancies/{}\"", doc.id)));
        assert!(html.contains("<option value=\"S02\" selected>"));
    }
}
