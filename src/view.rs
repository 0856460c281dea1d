//! Barn page state and the board derived from it.
//!
//! [`BarnView`] is the whole UI state of the barn page. It is rebuilt from the
//! request query, advanced with [`BarnView::apply`], and serialized back into
//! links so every control on the page carries the state it leads to.

use crate::barn::{find_stall, Stall, STALLS};
use crate::collection::{Collection, Document};
use crate::occupancy::{
    group_by_stall, resolve_stalls, stall_history, OccupancyRecord, StallState, StallStatus,
};
use crate::dates::parse_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Occupied,
    Scheduled,
    Empty,
}

impl StatusFilter {
    pub const VARIANTS: [Self; 4] = [Self::All, Self::Occupied, Self::Scheduled, Self::Empty];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Some(Self::All),
            "occupied" | "active" => Some(Self::Occupied),
            "scheduled" => Some(Self::Scheduled),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Occupied => "occupied",
            Self::Scheduled => "scheduled",
            Self::Empty => "empty",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Occupied => "Occupied",
            Self::Scheduled => "Scheduled",
            Self::Empty => "Empty",
        }
    }

    pub fn admits(self, state: StallState) -> bool {
        match self {
            Self::All => true,
            Self::Occupied => state == StallState::Occupied,
            Self::Scheduled => state == StallState::Scheduled,
            Self::Empty => state == StallState::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarnView {
    pub as_of: NaiveDate,
    pub filter: StatusFilter,
    pub selected: Option<&'static Stall>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarnEvent<'a> {
    SetAsOf(NaiveDate),
    SetFilter(StatusFilter),
    SelectStall(&'a str),
    ClearSelection,
}

/// Raw barn page query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BarnQuery {
    pub as_of: Option<String>,
    pub filter: Option<String>,
    pub stall: Option<String>,
    pub edit: Option<String>,
}

impl BarnView {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            filter: StatusFilter::All,
            selected: None,
        }
    }

    /// Unparseable values fall back to the defaults rather than failing the page.
    pub fn from_query(query: &BarnQuery, today: NaiveDate) -> Self {
        let mut view = Self::new(today);
        if let Some(as_of) = query.as_of.as_deref().and_then(parse_date) {
            view = view.apply(BarnEvent::SetAsOf(as_of));
        }
        if let Some(filter) = query.filter.as_deref().and_then(StatusFilter::parse) {
            view = view.apply(BarnEvent::SetFilter(filter));
        }
        if let Some(stall) = query.stall.as_deref() {
            view = view.apply(BarnEvent::SelectStall(stall));
        }
        view
    }

    pub fn apply(self, event: BarnEvent<'_>) -> Self {
        match event {
            BarnEvent::SetAsOf(as_of) => Self { as_of, ..self },
            BarnEvent::SetFilter(filter) => Self { filter, ..self },
            BarnEvent::SelectStall(id) => Self {
                selected: find_stall(id),
                ..self
            },
            BarnEvent::ClearSelection => Self {
                selected: None,
                ..self
            },
        }
    }

    pub fn query_string(&self) -> String {
        let mut query = format!("as_of={}&filter={}", self.as_of, self.filter.as_str());
        if let Some(stall) = self.selected {
            query.push_str("&stall=");
            query.push_str(stall.id);
        }
        query
    }

    pub fn href(&self) -> String {
        format!("/barn?{}", self.query_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StallTile<'a> {
    pub stall: &'static Stall,
    pub status: StallStatus<'a>,
    /// False when the display filter excludes this stall's state.
    pub emphasized: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoardTable<'a> {
    /// One row per stall admitted by the filter, as of the view date.
    AsOf(Vec<(&'static Stall, StallStatus<'a>)>),
    /// Every record of the selected stall, newest arrival first.
    History {
        stall: &'static Stall,
        records: Vec<&'a Document<OccupancyRecord>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarnBoard<'a> {
    pub view: BarnView,
    pub tiles: Vec<StallTile<'a>>,
    pub table: BoardTable<'a>,
}

impl BarnBoard<'_> {
    pub fn count(&self, state: StallState) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.status.state == state)
            .count()
    }
}

pub fn build_board(view: BarnView, records: &Collection<OccupancyRecord>) -> BarnBoard<'_> {
    let grouped = group_by_stall(records);
    let statuses = resolve_stalls(&STALLS, &grouped, view.as_of);

    let tiles = statuses
        .iter()
        .map(|&(stall, status)| StallTile {
            stall,
            status,
            emphasized: view.filter.admits(status.state),
            selected: view.selected.is_some_and(|selected| selected.id == stall.id),
        })
        .collect();

    let table = match view.selected {
        Some(stall) => BoardTable::History {
            stall,
            records: stall_history(stall.id, records),
        },
        None => BoardTable::AsOf(
            statuses
                .into_iter()
                .filter(|(_, status)| view.filter.admits(status.state))
                .collect(),
        ),
    };

    BarnBoard { view, tiles, table }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn seeded() -> Collection<OccupancyRecord> {
        let mut records = Collection::default();
        for (stall, arrival, departure) in [
            ("S01", "2024-01-01", None),
            ("S02", "2024-06-01", None),
            ("S03", "2023-01-01", Some("2023-12-01")),
            ("S01", "2022-01-01", Some("2022-05-01")),
        ] {
            records
                .insert(
                    OccupancyRecord {
                        stall_id: Some(stall.to_string()),
                        horse_name: format!("{stall}-{arrival}"),
                        arrival_date: Some(date(arrival)),
                        departure_date: departure.map(date),
                        ..OccupancyRecord::default()
                    },
                    Utc::now(),
                )
                .unwrap();
        }
        records
    }

    #[test]
    fn query_builds_view_with_fallbacks() {
        let today = date("2024-03-01");
        let view = BarnView::from_query(
            &BarnQuery {
                as_of: Some("2024-02-10".into()),
                filter: Some("Scheduled".into()),
                stall: Some("s05".into()),
                edit: None,
            },
            today,
        );
        assert_eq!(view.as_of, date("2024-02-10"));
        assert_eq!(view.filter, StatusFilter::Scheduled);
        assert_eq!(view.selected.map(|s| s.id), Some("S05"));

        let fallback = BarnView::from_query(
            &BarnQuery {
                as_of: Some("garbage".into()),
                filter: Some("purple".into()),
                stall: Some("S77".into()),
                edit: None,
            },
            today,
        );
        assert_eq!(fallback, BarnView::new(today));
    }

    #[test]
    fn apply_only_touches_its_own_field() {
        let start = BarnView::new(date("2024-01-01")).apply(BarnEvent::SelectStall("S02"));
        let filtered = start.apply(BarnEvent::SetFilter(StatusFilter::Empty));
        assert_eq!(filtered.selected, start.selected);
        assert_eq!(filtered.as_of, start.as_of);

        let cleared = filtered.apply(BarnEvent::ClearSelection);
        assert_eq!(cleared.selected, None);
        assert_eq!(cleared.filter, StatusFilter::Empty);
    }

    #[test]
    fn query_string_round_trips_through_from_query() {
        let view = BarnView::new(date("2024-04-04"))
            .apply(BarnEvent::SetFilter(StatusFilter::Occupied))
            .apply(BarnEvent::SelectStall("S12"));
        assert_eq!(view.query_string(), "as_of=2024-04-04&filter=occupied&stall=S12");
    }

    #[test]
    fn filter_fades_tiles_and_narrows_table_without_reclassifying() {
        let records = seeded();
        let all = build_board(BarnView::new(date("2024-03-01")), &records);
        let occupied_only = build_board(
            BarnView::new(date("2024-03-01")).apply(BarnEvent::SetFilter(StatusFilter::Occupied)),
            &records,
        );

        let states = |board: &BarnBoard<'_>| -> Vec<StallState> {
            board.tiles.iter().map(|tile| tile.status.state).collect()
        };
        assert_eq!(states(&all), states(&occupied_only));
        assert_eq!(all.count(StallState::Occupied), 1);
        assert_eq!(all.count(StallState::Scheduled), 1);
        assert_eq!(all.count(StallState::Empty), 16);

        let emphasized: Vec<_> = occupied_only
            .tiles
            .iter()
            .filter(|tile| tile.emphasized)
            .map(|tile| tile.stall.id)
            .collect();
        assert_eq!(emphasized, ["S01"]);

        match &occupied_only.table {
            BoardTable::AsOf(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].0.id, "S01");
            }
            other => panic!("unexpected table: {other:?}"),
        }
    }

    #[test]
    fn selection_switches_table_to_history() {
        let records = seeded();
        let board = build_board(
            BarnView::new(date("2024-03-01")).apply(BarnEvent::SelectStall("S01")),
            &records,
        );
        assert!(board.tiles.iter().any(|tile| tile.selected && tile.stall.id == "S01"));
        match &board.table {
            BoardTable::History { stall, records } => {
                assert_eq!(stall.id, "S01");
                let arrivals: Vec<_> = records
                    .iter()
                    .map(|doc| doc.fields.arrival_date.unwrap().to_string())
                    .collect();
                assert_eq!(arrivals, ["2024-01-01", "2022-01-01"]);
            }
            other => panic!("unexpected table: {other:?}"),
        }
    }
}
