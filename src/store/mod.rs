pub mod schema;

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use log::{error, info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;

use crate::config::StorageSettings;
use crate::domain::TournamentRecord;
use crate::filter::{self, TournamentFilters};

/// Rows whose end date is older than this many days are swept on save.
pub const RETENTION_DAYS: i64 = 7;

const REDUCED_SUFFIX: &str = "_slim";

/// Parquet-backed tournament store holding two projections: the full file
/// (all rows, all columns) and a reduced file (cancelled rows and the raw
/// payload column excluded) that read paths use by default.
///
/// Single-writer by design: the periodic update job owns the write path,
/// and writes land via temp file + atomic rename so short-lived readers
/// never observe a half-written file.
pub struct TournamentStore {
    path: PathBuf,
}

impl TournamentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_settings(storage: &StorageSettings) -> Self {
        Self::new(storage.tournaments_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reduced-projection path: the full path with a suffix inserted
    /// before the extension (`tournaments.parquet` → `tournaments_slim.parquet`).
    pub fn reduced_path(&self) -> PathBuf {
        let stem = self.path.file_stem().and_then(|s| s.to_str()).unwrap_or("tournaments");
        let extension = self.path.extension().and_then(|s| s.to_str()).unwrap_or("parquet");
        self.path.with_file_name(format!("{stem}{REDUCED_SUFFIX}.{extension}"))
    }

    /// Merge a batch of normalized rows into the store.
    ///
    /// Full read-modify-write: existing rows sharing an id with the batch
    /// are replaced whole, the retention sweep drops long-finished rows,
    /// and both projections are rewritten. Failures are logged and degrade
    /// to a no-op; they are never fatal to the caller.
    pub fn save(&self, records: &[TournamentRecord]) {
        if records.is_empty() {
            warn!("No tournaments provided to save");
            return;
        }
        if let Err(e) = self.save_inner(records) {
            error!("Failed to save tournaments to {}: {e:#}", self.path.display());
        }
    }

    /// Load rows, apply the filter criteria, and sort ascending by start
    /// date (undated rows last). A missing file or a read failure yields
    /// an empty result.
    pub fn load(&self, filters: &TournamentFilters, use_reduced: bool) -> Vec<TournamentRecord> {
        let path = if use_reduced { self.reduced_path() } else { self.path.clone() };

        if !path.exists() {
            warn!("Tournaments file does not exist: {}", path.display());
            return Vec::new();
        }

        match read_records(&path) {
            Ok(rows) => filter::apply(rows, filters),
            Err(e) => {
                error!("Failed to load tournaments from {}: {e:#}", path.display());
                Vec::new()
            }
        }
    }

    fn save_inner(&self, records: &[TournamentRecord]) -> Result<()> {
        info!("Processing {} tournaments for storage", records.len());

        let mut merged = self.merge_with_existing(records)?;
        let removed = retention_sweep(&mut merged, Utc::now());
        if removed > 0 {
            info!("Removed {removed} tournaments that ended more than {RETENTION_DAYS} days ago");
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }

        write_records(&self.path, &merged, false)?;

        let reduced: Vec<TournamentRecord> = merged
            .iter()
            .filter(|row| !row.is_cancelled)
            .cloned()
            .collect();
        write_records(&self.reduced_path(), &reduced, true)?;

        info!("Total tournaments in store: {}", merged.len());
        Ok(())
    }

    fn merge_with_existing(&self, batch: &[TournamentRecord]) -> Result<Vec<TournamentRecord>> {
        let mut merged = if self.path.exists() {
            read_records(&self.path)?
        } else {
            Vec::new()
        };

        let incoming: HashSet<&str> = batch.iter().map(|r| r.id.as_str()).collect();
        merged.retain(|row| !incoming.contains(row.id.as_str()));
        merged.extend(batch.iter().cloned());
        Ok(merged)
    }
}

/// Drop rows whose end date is more than [`RETENTION_DAYS`] in the past
/// (compared in UTC); rows without an end date are retained indefinitely.
/// Returns the number of rows removed.
pub fn retention_sweep(rows: &mut Vec<TournamentRecord>, now: DateTime<Utc>) -> usize {
    let cutoff = now - Duration::days(RETENTION_DAYS);
    let before = rows.len();
    rows.retain(|row| row.end_date.is_none_or(|end| end >= cutoff));
    before - rows.len()
}

fn write_records(path: &Path, records: &[TournamentRecord], reduced: bool) -> Result<()> {
    let batch = schema::records_to_batch(records, reduced)?;

    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    let file = File::create(&tmp)
        .with_context(|| format!("Failed to create {}", tmp.display()))?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .with_context(|| format!("Failed to open Parquet writer for {}", tmp.display()))?;
    writer
        .write(&batch)
        .with_context(|| format!("Failed to write record batch to {}", tmp.display()))?;
    writer
        .close()
        .with_context(|| format!("Failed to close Parquet writer for {}", tmp.display()))?;

    // Atomic swap into place.
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move {} into place", tmp.display()))?;
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<TournamentRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("Failed to read Parquet metadata from {}", path.display()))?
        .build()
        .with_context(|| format!("Failed to build Parquet reader for {}", path.display()))?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.with_context(|| format!("Failed to decode batch from {}", path.display()))?;
        rows.extend(schema::batch_to_records(&batch));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventTuple;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn record(id: &str) -> TournamentRecord {
        TournamentRecord {
            id: id.to_string(),
            name: format!("Tournament {id}"),
            is_cancelled: false,
            start_date: Some(Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap()),
            end_date: Some(Utc.with_ymd_and_hms(2026, 10, 3, 18, 0, 0).unwrap()),
            timezone: "America/Chicago".to_string(),
            latitude: Some(40.0),
            longitude: Some(-75.0),
            location: "Main Courts".to_string(),
            town: "Springfield".to_string(),
            county: "IL".to_string(),
            full_location: "Main Courts, Springfield, IL".to_string(),
            tournament_type: "junior".to_string(),
            tournament_level: "Level 4".to_string(),
            entries_close: None,
            registration_timezone: "America/Chicago".to_string(),
            events: vec![EventTuple::new("Boys", "Singles")],
            tournament_url: Some("https://example.com/t".to_string()),
            raw: format!("{{\"id\":\"{id}\"}}"),
            last_updated: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> TournamentStore {
        TournamentStore::new(dir.path().join("tournaments.parquet"))
    }

    #[test]
    fn reduced_path_inserts_suffix_before_extension() {
        let store = TournamentStore::new("data/tournaments.parquet");
        assert_eq!(
            store.reduced_path(),
            PathBuf::from("data/tournaments_slim.parquet")
        );
    }

    #[test]
    fn load_from_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load(&TournamentFilters::default(), true).is_empty());
        assert!(store.load(&TournamentFilters::default(), false).is_empty());
    }

    #[test]
    fn save_and_load_round_trips_all_fields() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&[record("a")]);

        let rows = store.load(&TournamentFilters::default(), false);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.id, "a");
        assert_eq!(row.start_date, record("a").start_date);
        assert_eq!(row.latitude, Some(40.0));
        assert_eq!(row.events, vec![EventTuple::new("Boys", "Singles")]);
        assert_eq!(row.tournament_url.as_deref(), Some("https://example.com/t"));
        assert_eq!(row.raw, "{\"id\":\"a\"}");
        assert_eq!(row.full_location, "Main Courts, Springfield, IL");
    }

    #[test]
    fn save_is_idempotent_by_id() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let batch = [record("a"), record("b")];

        store.save(&batch);
        store.save(&batch);

        let rows = store.load(&TournamentFilters::default(), false);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn saving_an_existing_id_replaces_the_row_whole() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&[record("a")]);

        let mut updated = record("a");
        updated.name = "Renamed Open".to_string();
        updated.tournament_level = "Level 1".to_string();
        updated.tournament_url = None;
        store.save(&[updated]);

        let rows = store.load(&TournamentFilters::default(), false);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Renamed Open");
        assert_eq!(rows[0].tournament_level, "Level 1");
        assert_eq!(rows[0].tournament_url, None);
    }

    #[test]
    fn retention_drops_rows_ended_more_than_seven_days_ago() {
        let now = Utc::now();
        let mut expired = record("expired");
        expired.end_date = Some(now - Duration::days(8));
        let mut recent = record("recent");
        recent.end_date = Some(now - Duration::days(6));
        let mut open_ended = record("open");
        open_ended.end_date = None;

        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&[expired, recent, open_ended]);

        let ids: Vec<String> = store
            .load(&TournamentFilters::default(), false)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert!(!ids.contains(&"expired".to_string()));
        assert!(ids.contains(&"recent".to_string()));
        assert!(ids.contains(&"open".to_string()));
    }

    #[test]
    fn reduced_projection_excludes_cancelled_rows_and_raw_payload() {
        let mut cancelled = record("cancelled");
        cancelled.is_cancelled = true;

        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&[record("kept"), cancelled]);

        let full = store.load(&TournamentFilters::default(), false);
        assert_eq!(full.len(), 2);

        let reduced = store.load(&TournamentFilters::default(), true);
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced[0].id, "kept");
        assert!(reduced[0].raw.is_empty());
        assert!(!reduced[0].is_cancelled);
    }

    #[test]
    fn load_applies_filters_and_sorts_by_start_date() {
        let mut early = record("early");
        early.start_date = Some(Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
        let mut late = record("late");
        late.start_date = Some(Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap());
        let mut other_type = record("other");
        other_type.tournament_type = "adult".to_string();

        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&[late.clone(), other_type, early.clone()]);

        let filters = TournamentFilters {
            tournament_type: Some("junior".to_string()),
            ..Default::default()
        };
        let rows = store.load(&filters, true);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn empty_save_leaves_no_files_behind() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&[]);
        assert!(!store.path().exists());
        assert!(!store.reduced_path().exists());
    }
}
