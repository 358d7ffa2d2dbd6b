use std::sync::Arc;

use anyhow::{Context, Result};
use arrow_array::{Array, ArrayRef, BooleanArray, Float64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;

use crate::domain::{parse_timestamp, EventTuple, TournamentRecord};

/// Column layout shared by both projections. The reduced projection drops
/// the raw payload and the cancellation flag (cancelled rows are filtered
/// out before writing it).
fn fields(reduced: bool) -> Vec<Field> {
    let mut fields = vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
    ];
    if !reduced {
        fields.push(Field::new("is_cancelled", DataType::Boolean, false));
    }
    fields.extend([
        Field::new("start_date", DataType::Utf8, true),
        Field::new("end_date", DataType::Utf8, true),
        Field::new("timezone", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
        Field::new("location", DataType::Utf8, false),
        Field::new("town", DataType::Utf8, false),
        Field::new("county", DataType::Utf8, false),
        Field::new("full_location", DataType::Utf8, false),
        Field::new("tournament_type", DataType::Utf8, false),
        Field::new("tournament_level", DataType::Utf8, false),
        Field::new("entries_close_datetime", DataType::Utf8, true),
        Field::new("registration_timezone", DataType::Utf8, false),
        Field::new("event_tuples", DataType::Utf8, false),
        Field::new("tournament_url", DataType::Utf8, true),
    ]);
    if !reduced {
        fields.push(Field::new("data", DataType::Utf8, false));
    }
    fields.push(Field::new("last_updated", DataType::Utf8, false));
    fields
}

pub fn records_to_batch(records: &[TournamentRecord], reduced: bool) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(fields(reduced)));

    let mut columns: Vec<ArrayRef> = vec![
        string_column(records, |r| Some(r.id.clone())),
        string_column(records, |r| Some(r.name.clone())),
    ];
    if !reduced {
        columns.push(Arc::new(BooleanArray::from(
            records.iter().map(|r| r.is_cancelled).collect::<Vec<_>>(),
        )));
    }
    columns.extend([
        string_column(records, |r| r.start_date.map(encode_timestamp)),
        string_column(records, |r| r.end_date.map(encode_timestamp)),
        string_column(records, |r| Some(r.timezone.clone())),
        float_column(records, |r| r.latitude),
        float_column(records, |r| r.longitude),
        string_column(records, |r| Some(r.location.clone())),
        string_column(records, |r| Some(r.town.clone())),
        string_column(records, |r| Some(r.county.clone())),
        string_column(records, |r| Some(r.full_location.clone())),
        string_column(records, |r| Some(r.tournament_type.clone())),
        string_column(records, |r| Some(r.tournament_level.clone())),
        string_column(records, |r| r.entries_close.map(encode_timestamp)),
        string_column(records, |r| Some(r.registration_timezone.clone())),
        string_column(records, |r| Some(encode_events(&r.events))),
        string_column(records, |r| r.tournament_url.clone()),
    ]);
    if !reduced {
        columns.push(string_column(records, |r| Some(r.raw.clone())));
    }
    columns.push(string_column(records, |r| Some(encode_timestamp(r.last_updated))));

    RecordBatch::try_new(schema, columns).context("Failed to build tournament record batch")
}

pub fn batch_to_records(batch: &RecordBatch) -> Vec<TournamentRecord> {
    (0..batch.num_rows()).map(|row| read_row(batch, row)).collect()
}

fn read_row(batch: &RecordBatch, row: usize) -> TournamentRecord {
    TournamentRecord {
        id: string_value(batch, "id", row).unwrap_or_default(),
        name: string_value(batch, "name", row).unwrap_or_default(),
        // Absent in the reduced projection, which holds no cancelled rows.
        is_cancelled: bool_value(batch, "is_cancelled", row).unwrap_or(false),
        start_date: timestamp_value(batch, "start_date", row),
        end_date: timestamp_value(batch, "end_date", row),
        timezone: string_value(batch, "timezone", row).unwrap_or_default(),
        latitude: float_value(batch, "latitude", row),
        longitude: float_value(batch, "longitude", row),
        location: string_value(batch, "location", row).unwrap_or_default(),
        town: string_value(batch, "town", row).unwrap_or_default(),
        county: string_value(batch, "county", row).unwrap_or_default(),
        full_location: string_value(batch, "full_location", row).unwrap_or_default(),
        tournament_type: string_value(batch, "tournament_type", row).unwrap_or_default(),
        tournament_level: string_value(batch, "tournament_level", row).unwrap_or_default(),
        entries_close: timestamp_value(batch, "entries_close_datetime", row),
        registration_timezone: string_value(batch, "registration_timezone", row).unwrap_or_default(),
        events: decode_events(string_value(batch, "event_tuples", row).as_deref()),
        tournament_url: string_value(batch, "tournament_url", row),
        raw: string_value(batch, "data", row).unwrap_or_default(),
        last_updated: timestamp_value(batch, "last_updated", row).unwrap_or_else(Utc::now),
    }
}

// --- Column Encoding ---

fn string_column<F>(records: &[TournamentRecord], get: F) -> ArrayRef
where
    F: Fn(&TournamentRecord) -> Option<String>,
{
    Arc::new(StringArray::from(
        records.iter().map(&get).collect::<Vec<Option<String>>>(),
    ))
}

fn float_column<F>(records: &[TournamentRecord], get: F) -> ArrayRef
where
    F: Fn(&TournamentRecord) -> Option<f64>,
{
    Arc::new(Float64Array::from(
        records.iter().map(&get).collect::<Vec<Option<f64>>>(),
    ))
}

fn encode_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn encode_events(events: &[EventTuple]) -> String {
    serde_json::to_string(events).unwrap_or_else(|_| "[]".to_string())
}

fn decode_events(encoded: Option<&str>) -> Vec<EventTuple> {
    let Some(encoded) = encoded else {
        return Vec::new();
    };
    serde_json::from_str(encoded).unwrap_or_else(|e| {
        warn!("Discarding unreadable event tuples column value: {e}");
        Vec::new()
    })
}

// --- Column Decoding ---

fn string_value(batch: &RecordBatch, name: &str, row: usize) -> Option<String> {
    let column = batch.column_by_name(name)?;
    let array = column.as_any().downcast_ref::<StringArray>()?;
    if array.is_null(row) {
        return None;
    }
    Some(array.value(row).to_string())
}

fn bool_value(batch: &RecordBatch, name: &str, row: usize) -> Option<bool> {
    let column = batch.column_by_name(name)?;
    let array = column.as_any().downcast_ref::<BooleanArray>()?;
    if array.is_null(row) {
        return None;
    }
    Some(array.value(row))
}

fn float_value(batch: &RecordBatch, name: &str, row: usize) -> Option<f64> {
    let column = batch.column_by_name(name)?;
    let array = column.as_any().downcast_ref::<Float64Array>()?;
    if array.is_null(row) {
        return None;
    }
    Some(array.value(row))
}

fn timestamp_value(batch: &RecordBatch, name: &str, row: usize) -> Option<DateTime<Utc>> {
    string_value(batch, name, row).and_then(|s| parse_timestamp(&s))
}
