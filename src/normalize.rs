//! Field cleanup rules for scraped season rows.
//!
//! Everything here works on plain cell text so the rules can change with the
//! upstream site without touching the DOM walk in `history_parse`.

/// Source rank values at or above this mean "not ranked".
pub const UNRANKED_SENTINEL: u32 = 100;

pub const UNKNOWN_COACH: &str = "Unknown";

/// Sort key the source puts in empty bowl cells.
pub const NO_BOWL_PLACEHOLDER: &str = "ZZZ";

const BOWL_SIMPLIFICATIONS: &[(&str, &str)] = &[
    (
        "College Football Playoff National Championship",
        "CFP National Championship",
    ),
    ("College Football Playoff Semifinal", "CFP Semifinal"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BowlResult {
    Win,
    Loss,
}

impl BowlResult {
    fn marker(self) -> &'static str {
        match self {
            BowlResult::Win => "(W)",
            BowlResult::Loss => "(L)",
        }
    }
}

/// Collapses runs of whitespace (including `&nbsp;`) into single spaces and trims.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a non-negative count cell. Empty or non-numeric text yields `None`.
pub fn parse_count(raw: &str) -> Option<u16> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<u16>().ok()
}

/// Finds the first standalone 4-digit token, e.g. `2023` in `2023*`.
pub fn parse_year(raw: &str) -> Option<u16> {
    raw.split(|c: char| !c.is_ascii_digit())
        .find(|tok| tok.len() == 4)
        .and_then(|tok| tok.parse::<u16>().ok())
}

pub fn normalize_rank(value: u32) -> Option<u16> {
    if value == 0 || value >= UNRANKED_SENTINEL {
        return None;
    }
    u16::try_from(value).ok()
}

pub fn parse_rank(raw: &str) -> Option<u16> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // Oversized digit strings are sentinels too.
    let value = trimmed.parse::<u32>().unwrap_or(u32::MAX);
    normalize_rank(value)
}

/// Removes parenthesized win-loss records like `(12-2)` or `(5-3-1)`.
pub fn strip_record_parens(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find('(') {
        let Some(close_rel) = rest[open..].find(')') else {
            break;
        };
        let inner = &rest[open + 1..open + close_rel];
        let is_record = !inner.trim().is_empty()
            && inner
                .chars()
                .all(|c| c.is_ascii_digit() || c == '-' || c.is_whitespace());
        if is_record {
            out.push_str(&rest[..open]);
        } else {
            out.push_str(&rest[..open + close_rel + 1]);
        }
        rest = &rest[open + close_rel + 1..];
    }
    out.push_str(rest);
    out
}

/// `"Coach A (5-3), Coach B (3-2)"` becomes `"Coach A / Coach B"`.
pub fn clean_coaches(raw: &str) -> String {
    join_coach_names(strip_record_parens(raw).split(','))
}

/// Joins already separated coach names with " / ", or `Unknown` when none remain.
pub fn join_coach_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let names = names
        .into_iter()
        .map(normalize_ws)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>();
    if names.is_empty() {
        UNKNOWN_COACH.to_string()
    } else {
        names.join(" / ")
    }
}

pub fn is_no_bowl(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_BOWL_PLACEHOLDER)
}

pub fn simplify_bowl_name(name: &str) -> String {
    let mut out = normalize_ws(name);
    for (verbose, short) in BOWL_SIMPLIFICATIONS {
        if out.contains(verbose) {
            out = out.replace(verbose, short);
        }
    }
    out
}

/// Looks for a `(W)` or `(L)` marker anywhere in the text; the last one wins.
pub fn parse_bowl_result(raw: &str) -> Option<BowlResult> {
    let win = raw.rfind("(W)");
    let loss = raw.rfind("(L)");
    match (win, loss) {
        (Some(w), Some(l)) if w > l => Some(BowlResult::Win),
        (Some(_), Some(_)) => Some(BowlResult::Loss),
        (Some(_), None) => Some(BowlResult::Win),
        (None, Some(_)) => Some(BowlResult::Loss),
        (None, None) => None,
    }
}

/// Strips result markers from a bowl cell fragment, leaving the name.
pub fn strip_bowl_result(raw: &str) -> String {
    normalize_ws(&raw.replace("(W)", " ").replace("(L)", " "))
}

pub fn bowl_label(name: &str, result: Option<BowlResult>) -> Option<String> {
    if is_no_bowl(name) {
        return None;
    }
    let name = simplify_bowl_name(name);
    if name.is_empty() {
        return None;
    }
    Some(match result {
        Some(r) => format!("{name} {}", r.marker()),
        None => name,
    })
}
