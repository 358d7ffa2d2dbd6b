use crate::domain::TournamentRecord;
use crate::filter::{self, TournamentFilters};

/// Interactive state for the dashboard: the loaded rows, the current
/// filter selections, and the table cursor.
pub struct DashboardState {
    all_rows: Vec<TournamentRecord>,
    pub visible: Vec<TournamentRecord>,
    pub selected: usize,
    pub type_options: Vec<String>,
    pub gender_options: Vec<String>,
    pub event_type_options: Vec<String>,
    pub type_index: Option<usize>,
    pub gender_index: Option<usize>,
    pub event_type_index: Option<usize>,
    pub quit: bool,
}

impl DashboardState {
    pub fn new(rows: Vec<TournamentRecord>) -> Self {
        let type_options = distinct(rows.iter().map(|row| row.tournament_type.clone()));
        let gender_options = distinct(
            rows.iter()
                .flat_map(|row| row.events.iter().map(|event| event.gender.clone())),
        );
        let event_type_options = distinct(
            rows.iter()
                .flat_map(|row| row.events.iter().map(|event| event.event_type.clone())),
        );

        let mut state = Self {
            all_rows: rows,
            visible: Vec::new(),
            selected: 0,
            type_options,
            gender_options,
            event_type_options,
            type_index: None,
            gender_index: None,
            event_type_index: None,
            quit: false,
        };
        state.refresh();
        state
    }

    /// Currently active criteria, `None` meaning "all".
    pub fn filters(&self) -> TournamentFilters {
        TournamentFilters {
            tournament_type: pick(&self.type_options, self.type_index),
            event_gender: pick(&self.gender_options, self.gender_index),
            event_type: pick(&self.event_type_options, self.event_type_index),
            ..TournamentFilters::default()
        }
    }

    pub fn selected_row(&self) -> Option<&TournamentRecord> {
        self.visible.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    pub fn cycle_type(&mut self) {
        self.type_index = cycle(self.type_index, self.type_options.len());
        self.refresh();
    }

    pub fn cycle_gender(&mut self) {
        self.gender_index = cycle(self.gender_index, self.gender_options.len());
        self.refresh();
    }

    pub fn cycle_event_type(&mut self) {
        self.event_type_index = cycle(self.event_type_index, self.event_type_options.len());
        self.refresh();
    }

    pub fn reset_filters(&mut self) {
        self.type_index = None;
        self.gender_index = None;
        self.event_type_index = None;
        self.refresh();
    }

    /// One-line summary of the active filters for the status bar.
    pub fn filter_summary(&self) -> String {
        let describe = |label: &str, value: Option<&String>| {
            format!("{label}: {}", value.map_or("all", String::as_str))
        };
        format!(
            "{} | {} | {}",
            describe("type", selected_option(&self.type_options, self.type_index)),
            describe(
                "gender",
                selected_option(&self.gender_options, self.gender_index)
            ),
            describe(
                "event",
                selected_option(&self.event_type_options, self.event_type_index)
            ),
        )
    }

    fn refresh(&mut self) {
        self.visible = filter::apply(self.all_rows.clone(), &self.filters());
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }
}

/// None -> Some(0) -> ... -> Some(len - 1) -> None.
fn cycle(index: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match index {
        None => Some(0),
        Some(i) if i + 1 < len => Some(i + 1),
        Some(_) => None,
    }
}

fn pick(options: &[String], index: Option<usize>) -> Option<String> {
    index.and_then(|i| options.get(i).cloned())
}

fn selected_option(options: &[String], index: Option<usize>) -> Option<&String> {
    index.and_then(|i| options.get(i))
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut options: Vec<String> = values.filter(|value| !value.is_empty()).collect();
    options.sort();
    options.dedup();
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventTuple;

    fn row(id: &str, tournament_type: &str, events: Vec<EventTuple>) -> TournamentRecord {
        TournamentRecord {
            id: id.to_string(),
            name: format!("Tournament {id}"),
            is_cancelled: false,
            start_date: None,
            end_date: None,
            timezone: "UTC".to_string(),
            latitude: None,
            longitude: None,
            location: String::new(),
            town: String::new(),
            county: String::new(),
            full_location: String::new(),
            tournament_type: tournament_type.to_string(),
            tournament_level: String::new(),
            entries_close: None,
            registration_timezone: "UTC".to_string(),
            events,
            tournament_url: None,
            raw: "{}".to_string(),
            last_updated: chrono::Utc::now(),
        }
    }

    fn sample_rows() -> Vec<TournamentRecord> {
        vec![
            row("a", "Adult", vec![EventTuple::new("Coed", "Singles")]),
            row("b", "Junior", vec![EventTuple::new("Boys", "Doubles")]),
            row("c", "Junior", vec![EventTuple::new("Girls", "Singles")]),
        ]
    }

    #[test]
    fn discovers_sorted_distinct_options() {
        let state = DashboardState::new(sample_rows());
        assert_eq!(state.type_options, vec!["Adult", "Junior"]);
        assert_eq!(state.gender_options, vec!["Boys", "Coed", "Girls"]);
        assert_eq!(state.event_type_options, vec!["Doubles", "Singles"]);
    }

    #[test]
    fn cycling_narrows_then_wraps_to_all() {
        let mut state = DashboardState::new(sample_rows());
        assert_eq!(state.visible.len(), 3);

        state.cycle_type();
        assert_eq!(state.filters().tournament_type.as_deref(), Some("Adult"));
        assert_eq!(state.visible.len(), 1);

        state.cycle_type();
        assert_eq!(state.visible.len(), 2);

        state.cycle_type();
        assert!(state.filters().tournament_type.is_none());
        assert_eq!(state.visible.len(), 3);
    }

    #[test]
    fn reset_clears_every_criterion() {
        let mut state = DashboardState::new(sample_rows());
        state.cycle_type();
        state.cycle_gender();
        state.cycle_event_type();
        state.reset_filters();
        assert_eq!(state.visible.len(), 3);
        assert_eq!(state.filter_summary(), "type: all | gender: all | event: all");
    }

    #[test]
    fn cursor_is_clamped_when_the_view_shrinks() {
        let mut state = DashboardState::new(sample_rows());
        state.move_down();
        state.move_down();
        assert_eq!(state.selected, 2);

        state.cycle_type(); // Adult only, one row
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_row().unwrap().id, "a");
    }

    #[test]
    fn cycling_with_no_options_stays_on_all() {
        let mut state = DashboardState::new(vec![row("a", "", vec![])]);
        state.cycle_type();
        assert!(state.type_index.is_none());
        assert_eq!(state.visible.len(), 1);
    }
}
