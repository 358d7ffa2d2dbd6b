use chrono::NaiveDate;

use crate::domain::TournamentRecord;

/// Named filter criteria, combined with logical AND. Every criterion is
/// optional; an absent criterion matches all rows.
#[derive(Debug, Clone, Default)]
pub struct TournamentFilters {
    /// Exact match against the stored (raw-cased) type. `Some("")` matches
    /// rows with an empty type, which is distinct from the criterion being
    /// absent.
    pub tournament_type: Option<String>,
    /// Case-insensitive set membership; an empty list means no criterion.
    pub tournament_levels: Vec<String>,
    pub event_gender: Option<String>,
    pub event_type: Option<String>,
    /// Inclusive lower bound on the row's start date (date-only).
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound, applied to the row's START date. This mirrors
    /// the source system: it selects tournaments starting within the window,
    /// not tournaments ending by the bound. Preserved for compatibility.
    pub end_date: Option<NaiveDate>,
}

/// Narrow a row set by the given criteria and sort it ascending by start
/// date (rows without a start date sort last).
pub fn apply(rows: Vec<TournamentRecord>, filters: &TournamentFilters) -> Vec<TournamentRecord> {
    let mut rows: Vec<TournamentRecord> = rows
        .into_iter()
        .filter(|row| matches(row, filters))
        .collect();
    sort_by_start_date(&mut rows);
    rows
}

pub fn sort_by_start_date(rows: &mut [TournamentRecord]) {
    rows.sort_by_key(|row| (row.start_date.is_none(), row.start_date));
}

fn matches(row: &TournamentRecord, filters: &TournamentFilters) -> bool {
    matches_type(row, filters.tournament_type.as_deref())
        && matches_levels(row, &filters.tournament_levels)
        && matches_event(
            row,
            non_empty(filters.event_gender.as_deref()),
            non_empty(filters.event_type.as_deref()),
        )
        && matches_date_window(row, filters.start_date, filters.end_date)
}

fn non_empty(criterion: Option<&str>) -> Option<&str> {
    criterion.filter(|value| !value.is_empty())
}

fn matches_type(row: &TournamentRecord, criterion: Option<&str>) -> bool {
    match criterion {
        None => true,
        Some("") => row.tournament_type.is_empty(),
        Some(wanted) => row.tournament_type == wanted,
    }
}

fn matches_levels(row: &TournamentRecord, levels: &[String]) -> bool {
    if levels.is_empty() {
        return true;
    }
    levels
        .iter()
        .any(|level| level.eq_ignore_ascii_case(&row.tournament_level))
}

/// A row matches when any single event tuple satisfies the given gender
/// and/or event type. Gender-only, type-only, and both-specified are
/// three distinct predicates; both-specified requires the exact pair.
fn matches_event(row: &TournamentRecord, gender: Option<&str>, event_type: Option<&str>) -> bool {
    match (gender, event_type) {
        (None, None) => true,
        (Some(g), None) => row.events.iter().any(|t| t.gender == g),
        (None, Some(e)) => row.events.iter().any(|t| t.event_type == e),
        (Some(g), Some(e)) => row.events.iter().any(|t| t.gender == g && t.event_type == e),
    }
}

fn matches_date_window(
    row: &TournamentRecord,
    lower: Option<NaiveDate>,
    upper: Option<NaiveDate>,
) -> bool {
    if lower.is_none() && upper.is_none() {
        return true;
    }
    // Date-bound criteria compare date parts only; rows without a start
    // date fail any bound.
    let Some(start) = row.start_date.map(|dt| dt.date_naive()) else {
        return false;
    };
    if lower.is_some_and(|bound| start < bound) {
        return false;
    }
    if upper.is_some_and(|bound| start > bound) {
        return false;
    }
    true
}
