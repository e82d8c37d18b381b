//! Normalization of the first-party interactions API.
//!
//! The payload is a JSON object keyed by query gene. Each value is an array of
//! rows; `index == "2"` marks a protein-DNA interaction, everything else is a
//! protein-protein interaction. Numbers may come back as JSON numbers or as
//! strings, sometimes in scientific notation.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use aiv_core::models::{InteractionKind, InteractionRecord, OriginDatabase};
use aiv_core::utils::{normalize_decimal, normalize_locus};

use crate::error::{IngestError, Result};

/// Discriminator value of protein-DNA rows.
pub const PDI_INDEX: &str = "2";

/// Placeholder the API uses for absent text fields.
const NONE_MARKERS: [&str; 4] = ["", "none", "null", "na"];

#[derive(Deserialize, Debug, Clone)]
pub struct PrimaryRow {
    #[serde(default)]
    pub index: Value,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub reference: Value,
    #[serde(default)]
    pub published: Value,
    #[serde(default)]
    pub interolog_confidence: Value,
    #[serde(default)]
    pub correlation_coefficient: Value,
    #[serde(default)]
    pub mi: Value,
}

/// Primary API response: rows keyed by query gene.
pub type PrimaryResponse = BTreeMap<String, Vec<PrimaryRow>>;

fn value_as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if NONE_MARKERS.contains(&text.to_ascii_lowercase().as_str()) {
        None
    } else {
        Some(text)
    }
}

fn value_as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "t"
        ),
        _ => false,
    }
}

///
/// Numeric field to a fixed-point string. Non-numeric text is kept verbatim
/// so that nothing reported by the API is silently dropped.
///
fn value_as_decimal(value: &Value) -> Option<String> {
    let text = value_as_text(value)?;
    match normalize_decimal(&text) {
        Ok(fixed) => Some(fixed),
        Err(e) => {
            debug!("Keeping non-numeric value verbatim: {}", e);
            Some(text)
        }
    }
}

///
/// Turn a raw MI code (`18`, `0018`, `MI:0018`) into the canonical `MI:0018`.
///
pub fn normalize_mi_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("MI:")
        .or_else(|| trimmed.strip_prefix("mi:"))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("MI:{:0>4}", digits))
}

fn split_references(value: &Value) -> Vec<String> {
    match value_as_text(value) {
        Some(text) => text
            .split(['\n', '|'])
            .map(str::trim)
            .filter(|r| !NONE_MARKERS.contains(&r.to_ascii_lowercase().as_str()))
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn split_mi_codes(value: &Value) -> Vec<String> {
    match value_as_text(value) {
        Some(text) => text.split('|').filter_map(normalize_mi_code).collect(),
        None => Vec::new(),
    }
}

impl PrimaryRow {
    pub fn kind(&self) -> InteractionKind {
        match value_as_text(&self.index) {
            Some(index) if index == PDI_INDEX => InteractionKind::Pdi,
            _ => InteractionKind::Ppi,
        }
    }

    pub fn into_record(self) -> InteractionRecord {
        InteractionRecord {
            source_gene_id: normalize_locus(&self.source),
            target_gene_id: normalize_locus(&self.target),
            kind: self.kind(),
            origin: OriginDatabase::PrimaryApi,
            published: value_as_bool(&self.published),
            confidence: value_as_decimal(&self.interolog_confidence),
            correlation: value_as_decimal(&self.correlation_coefficient),
            references: split_references(&self.reference),
            mi_term_codes: split_mi_codes(&self.mi),
        }
    }
}

///
/// Parse and normalize a primary API payload.
///
/// Rows with an empty source or target are skipped with a warning; a payload
/// that is not a JSON object of row arrays is an error.
///
pub fn normalize_primary(payload: &str) -> Result<Vec<InteractionRecord>> {
    let response: PrimaryResponse =
        serde_json::from_str(payload).map_err(IngestError::PrimaryPayload)?;
    Ok(normalize_primary_response(response))
}

pub fn normalize_primary_response(response: PrimaryResponse) -> Vec<InteractionRecord> {
    let mut records = Vec::new();
    for (query_gene, rows) in response {
        debug!("Primary API returned {} rows for {}", rows.len(), query_gene);
        for row in rows {
            if row.source.trim().is_empty() || row.target.trim().is_empty() {
                warn!("Skipping primary API row without endpoints for {}", query_gene);
                continue;
            }
            records.push(row.into_record());
        }
    }
    records
}
