//! The import pipeline: raw rows → deduplicated records → idempotent upserts.

use super::fields::FieldMap;
use super::models::{EventRecord, ImportFailure, ImportSummary, RawRow};
use super::normalize::normalize_row;
use super::parse;
use crate::error::ImportError;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use surrealdb::{Surreal, engine::remote::ws::Client};

/// Persistence seam for the importer; the production implementation writes to
/// SurrealDB, tests substitute an in-memory map.
#[async_trait]
pub trait EventStore {
    async fn upsert_event(&self, record: &EventRecord) -> Result<()>;
}

pub struct SurrealEventStore<'a> {
    pub db: &'a Surreal<Client>,
}

#[async_trait]
impl EventStore for SurrealEventStore<'_> {
    async fn upsert_event(&self, record: &EventRecord) -> Result<()> {
        let resp = self
            .db
            .query(
                "INSERT INTO event (id, name, slug, category, department, team_size, prizes,
                        date, registration_fee, max_participants, venue, description,
                        coordinators, updated_at)
                 VALUES ($id, $name, $slug, $category, $department, $team_size, $prizes,
                        $date, $registration_fee, $max_participants, $venue, $description,
                        $coordinators, time::now())
                 ON DUPLICATE KEY UPDATE
                    name = $name,
                    slug = $slug,
                    category = $category,
                    department = $department,
                    team_size = $team_size,
                    prizes = $prizes,
                    date = $date,
                    registration_fee = $registration_fee,
                    max_participants = $max_participants,
                    venue = $venue,
                    description = $description,
                    coordinators = $coordinators,
                    updated_at = time::now()",
            )
            // The record id is the natural key: distinct names that happen to
            // share a slug stay distinct records.
            .bind(("id", record.name.clone()))
            .bind(("name", record.name.clone()))
            .bind(("slug", record.slug.clone()))
            .bind(("category", record.category))
            .bind(("department", record.department))
            .bind(("team_size", record.team_size))
            .bind(("prizes", record.prizes.clone()))
            .bind(("date", record.date))
            .bind(("registration_fee", record.registration_fee))
            .bind(("max_participants", record.max_participants))
            .bind(("venue", record.venue.clone()))
            .bind(("description", record.description.clone()))
            .bind(("coordinators", record.coordinators.clone()))
            .await?;
        resp.check()?;
        Ok(())
    }
}

/// Normalizes all rows and collapses them by event name, last row wins.
/// Overwritten duplicates are dropped silently.
pub fn dedupe(rows: &[RawRow], map: &FieldMap) -> Vec<EventRecord> {
    let mut by_name: HashMap<String, EventRecord> = HashMap::new();
    for row in rows {
        if let Some(record) = normalize_row(row, map) {
            by_name.insert(record.name.clone(), record);
        }
    }
    by_name.into_values().collect()
}

/// Upserts every deduplicated record, collecting per-record failures instead
/// of aborting the batch. Re-running the same source converges to the same
/// stored state.
pub async fn import_all<S: EventStore + Sync>(
    store: &S,
    rows: &[RawRow],
    map: &FieldMap,
) -> ImportSummary {
    let records = dedupe(rows, map);

    let mut summary = ImportSummary {
        total: records.len(),
        ..Default::default()
    };

    for record in &records {
        *summary
            .by_department
            .entry(record.department.to_string())
            .or_insert(0) += 1;

        match store.upsert_event(record).await {
            Ok(()) => summary.imported += 1,
            Err(e) => {
                tracing::warn!(event = %record.name, error = %e, "event upsert failed");
                summary.errors.push(ImportFailure {
                    name: record.name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
    summary
}

/// Reads whichever of the two drop files exist (CSV rows first, then sheet
/// rows) and imports the concatenated sequence. Fails fast with
/// [`ImportError::NoSource`] when neither file is present.
pub async fn import_from_sources<S: EventStore + Sync>(
    store: &S,
    csv_path: &str,
    xlsx_path: &str,
    map: &FieldMap,
) -> Result<ImportSummary, ImportError> {
    let has_csv = Path::new(csv_path).exists();
    let has_xlsx = Path::new(xlsx_path).exists();
    if !has_csv && !has_xlsx {
        return Err(ImportError::NoSource {
            csv: csv_path.to_string(),
            xlsx: xlsx_path.to_string(),
        });
    }

    let mut rows = Vec::new();
    if has_csv {
        rows.extend(parse::read_csv_file(csv_path)?);
    }
    if has_xlsx {
        rows.extend(parse::read_xlsx_file(xlsx_path)?);
    }
    tracing::info!(rows = rows.len(), csv = has_csv, xlsx = has_xlsx, "parsed import sources");

    Ok(import_all(store, &rows, map).await)
}
