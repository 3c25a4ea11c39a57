use std::collections::HashMap;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::normalize::{
    bowl_label, clean_coaches, is_no_bowl, join_coach_names, normalize_ws, parse_bowl_result,
    parse_count, parse_rank, parse_year, strip_bowl_result,
};
use crate::records::{YearlyRecord, sort_newest_first};

// `data-stat` values on the school index table.
pub const FIELD_YEAR: &str = "year_id";
pub const FIELD_WINS: &str = "wins";
pub const FIELD_LOSSES: &str = "losses";
pub const FIELD_CONF_WINS: &str = "wins_conf";
pub const FIELD_CONF_LOSSES: &str = "losses_conf";
pub const FIELD_AP_PRE: &str = "rank_pre";
pub const FIELD_AP_POST: &str = "rank_final";
pub const FIELD_CFP_FINAL: &str = "rank_cfp";
pub const FIELD_COACHES: &str = "coaches";
pub const FIELD_BOWL: &str = "bowl_name";

const HEADER_ROW_CLASS: &str = "thead";

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("static selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("static selector"));

/// Extracts one record per season row with `year >= min_year`, newest first.
///
/// Rows without a year cell, repeated header rows and rows missing wins or
/// losses are dropped without error.
pub fn parse_yearly_records(html: &str, min_year: u16) -> Vec<YearlyRecord> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();
    let mut rows_seen = 0usize;

    for row in document.select(&ROW_SELECTOR) {
        if row.value().classes().any(|c| c == HEADER_ROW_CLASS) {
            continue;
        }
        let cells = row_cells(row);
        if !cells.contains_key(FIELD_YEAR) {
            continue;
        }
        rows_seen += 1;
        if let Some(record) = parse_row(&cells, min_year) {
            records.push(record);
        }
    }

    debug!(rows_seen, records = records.len(), "parsed season rows");
    sort_newest_first(&mut records);
    records
}

fn row_cells(row: ElementRef<'_>) -> HashMap<&str, ElementRef<'_>> {
    let mut cells = HashMap::new();
    for cell in row.children().filter_map(ElementRef::wrap) {
        if let Some(stat) = cell.value().attr("data-stat") {
            cells.entry(stat).or_insert(cell);
        }
    }
    cells
}

fn parse_row(cells: &HashMap<&str, ElementRef<'_>>, min_year: u16) -> Option<YearlyRecord> {
    let year = parse_year(&cell_text(cells.get(FIELD_YEAR)?))?;
    if year < min_year {
        return None;
    }
    let wins = parse_count(&cell_text(cells.get(FIELD_WINS)?))?;
    let losses = parse_count(&cell_text(cells.get(FIELD_LOSSES)?))?;

    let conf_wins = optional_count(cells, FIELD_CONF_WINS);
    let conf_losses = optional_count(cells, FIELD_CONF_LOSSES);

    let ap_pre = optional_rank(cells, FIELD_AP_PRE);
    let ap_post = optional_rank(cells, FIELD_AP_POST);
    let cfp_final = optional_rank(cells, FIELD_CFP_FINAL);

    let coach = match cells.get(FIELD_COACHES) {
        Some(cell) => extract_coaches(*cell),
        None => clean_coaches(""),
    };
    let bowl = cells.get(FIELD_BOWL).and_then(|cell| extract_bowl(*cell));

    Some(YearlyRecord {
        year,
        wins,
        losses,
        conf_wins,
        conf_losses,
        ap_pre,
        ap_post,
        cfp_final,
        coach,
        bowl,
    })
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>()
}

fn optional_count(cells: &HashMap<&str, ElementRef<'_>>, field: &str) -> u16 {
    cells
        .get(field)
        .and_then(|cell| parse_count(&cell_text(cell)))
        .unwrap_or(0)
}

fn optional_rank(cells: &HashMap<&str, ElementRef<'_>>, field: &str) -> Option<u16> {
    parse_rank(&cell_text(cells.get(field)?))
}

/// Linked coach names are taken whole, so a comma inside a name survives.
/// Unlinked cells fall back to splitting on commas.
fn extract_coaches(cell: ElementRef<'_>) -> String {
    let links = cell
        .select(&LINK_SELECTOR)
        .map(|a| a.text().collect::<String>())
        .collect::<Vec<_>>();
    if links.is_empty() {
        clean_coaches(&cell_text(&cell))
    } else {
        join_coach_names(links.iter().map(String::as_str))
    }
}

#[derive(Debug, Default)]
struct BowlEntry {
    name: String,
    trailing: String,
}

/// Splits a bowl cell into linked entries and keeps the last one.
fn extract_bowl(cell: ElementRef<'_>) -> Option<String> {
    let mut leading = String::new();
    let mut entries: Vec<BowlEntry> = Vec::new();

    for node in cell.descendants().skip(1) {
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() == "a" {
                entries.push(BowlEntry {
                    name: el.text().collect(),
                    trailing: String::new(),
                });
            }
            continue;
        }
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let inside_link = node
            .ancestors()
            .take_while(|a| a.id() != cell.id())
            .any(|a| a.value().as_element().is_some_and(|e| e.name() == "a"));
        if inside_link {
            continue;
        }
        match entries.last_mut() {
            Some(last) => last.trailing.push_str(text),
            None => leading.push_str(text),
        }
    }

    match entries.pop() {
        Some(last) => {
            let name = strip_bowl_result(&last.name);
            let result = parse_bowl_result(&format!("{} {}", last.name, last.trailing));
            bowl_label(&name, result)
        }
        None => {
            let text = normalize_ws(&leading);
            if is_no_bowl(&text) {
                return None;
            }
            let segment = text.rsplit(',').next().unwrap_or_default();
            bowl_label(&strip_bowl_result(segment), parse_bowl_result(segment))
        }
    }
}
