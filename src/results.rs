use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::StringRecord;

use crate::model::{PresenceRecord, SLOT_COUNT, Slot, SlotPresence};
use crate::util::ensure_directory;

const LEADING_COLUMNS: [&str; 4] = ["URL", "Query", "Clicks", "Impressions"];

pub fn result_header() -> Vec<&'static str> {
    LEADING_COLUMNS
        .iter()
        .copied()
        .chain(Slot::ALL.iter().map(|slot| slot.label()))
        .collect()
}

pub fn write_results(path: &Path, records: &[PresenceRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create results file: {}", path.display()))?;

    writer
        .write_record(result_header())
        .with_context(|| format!("failed to write results header: {}", path.display()))?;

    for record in records {
        let mut row = Vec::with_capacity(LEADING_COLUMNS.len() + SLOT_COUNT);
        row.push(record.url.clone());
        row.push(record.query.clone());
        row.push(record.clicks.to_string());
        row.push(record.impressions.to_string());
        row.extend(record.presence.iter().map(|(_, present)| present.to_string()));

        writer
            .write_record(&row)
            .with_context(|| format!("failed to write results row: {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush results file: {}", path.display()))?;

    Ok(())
}

pub fn read_results(path: &Path) -> Result<Vec<PresenceRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open results file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read results header: {}", path.display()))?
        .clone();

    let mut positions = Vec::with_capacity(LEADING_COLUMNS.len() + SLOT_COUNT);
    for column in result_header() {
        let Some(position) = headers.iter().position(|header| header.trim() == column) else {
            bail!("results file {} is missing column {column}", path.display());
        };
        positions.push(position);
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let line = index + 2;
        let row =
            row.with_context(|| format!("malformed results row {line} in {}", path.display()))?;
        let record = parse_result_row(&row, &positions)
            .with_context(|| format!("invalid results row {line} in {}", path.display()))?;
        records.push(record);
    }

    Ok(records)
}

fn parse_result_row(row: &StringRecord, positions: &[usize]) -> Result<PresenceRecord> {
    let cell = |column: usize| row.get(positions[column]).unwrap_or_default();

    let clicks = cell(2)
        .trim()
        .parse::<u64>()
        .with_context(|| format!("invalid Clicks value: {:?}", cell(2)))?;
    let impressions = cell(3)
        .trim()
        .parse::<u64>()
        .with_context(|| format!("invalid Impressions value: {:?}", cell(3)))?;

    let mut presence = SlotPresence::default();
    for (offset, slot) in Slot::ALL.iter().enumerate() {
        let raw = cell(LEADING_COLUMNS.len() + offset);
        presence.set(*slot, parse_flag(raw).with_context(|| {
            format!("invalid {} value: {raw:?}", slot.label())
        })?);
    }

    Ok(PresenceRecord {
        url: cell(0).to_string(),
        query: cell(1).to_string(),
        clicks,
        impressions,
        presence,
    })
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("expected true or false"),
    }
}
