//! Token Forensics Normalizer
//!
//! The analysis service keys `detailed.token_forensics` inconsistently:
//! sometimes by bare mint, sometimes by a JSON-encoded metadata blob such as
//! `{"mint":"M1","symbol":"FOO","name":"Foo","logo":"https://..."}`.
//! This module rewrites the map so every key is a bare asset identifier.
//!
//! Per entry:
//! 1. Key looks like a JSON object and parses: canonical key is its `mint`
//!    (or the raw key when absent); `name`, `symbol`, `logo` from the key
//!    overwrite same-named fields of the value.
//! 2. Key looks like JSON but does not parse: raw key, value untouched.
//! 3. Any other key: unchanged.
//! 4. An entry that cannot be interpreted is kept under its raw key with a
//!    `normalization_error` field; the rest of the map is still processed.
//!
//! Running the normalizer on an already canonical map is a no-op.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::errors::{AppError, ErrorCode};
use crate::models::types::{AnalysisResult, TokenForensics};
use crate::utils::constants::{KEY_METADATA_FIELDS, NORMALIZATION_ERROR_FIELD};

/// Counts from one normalization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Entries in the input map
    pub total: usize,
    /// Entries re-keyed or enriched from a JSON-encoded key
    pub rewritten: usize,
    /// Entries kept exactly as they were
    pub passed_through: usize,
    /// Entries kept under their raw key with a diagnostic field
    pub faulted: usize,
    /// Entries that replaced an earlier entry with the same canonical key
    pub collisions: usize,
}

/// How a single entry was resolved
#[derive(Debug, PartialEq)]
enum EntryOutcome {
    Rewritten(String, Value),
    PassedThrough(String, Value),
}

/// Normalize `detailed.token_forensics` of an analysis result in place
pub fn normalize_result(result: &mut AnalysisResult) -> NormalizationReport {
    let Some(raw) = result.detailed.token_forensics.take() else {
        return NormalizationReport::default();
    };
    let (normalized, report) = normalize_token_forensics(raw);
    result.detailed.token_forensics = Some(normalized);

    debug!(
        wallet = %result.wallet,
        total = report.total,
        rewritten = report.rewritten,
        faulted = report.faulted,
        collisions = report.collisions,
        "🧹 Token forensics normalized"
    );
    report
}

/// Rewrite a forensic map into canonical form
pub fn normalize_token_forensics(raw: TokenForensics) -> (TokenForensics, NormalizationReport) {
    let mut report = NormalizationReport {
        total: raw.len(),
        ..Default::default()
    };
    let mut normalized = Map::with_capacity(raw.len());

    for (key, value) in raw {
        let (canonical, value) = match normalize_entry(&key, value) {
            Ok(EntryOutcome::Rewritten(canonical, value)) => {
                report.rewritten += 1;
                (canonical, value)
            }
            Ok(EntryOutcome::PassedThrough(canonical, value)) => {
                report.passed_through += 1;
                (canonical, value)
            }
            Err((fault, value)) => {
                warn!("⚠️ Token forensics entry {:?} kept as-is: {}", key, fault);
                report.faulted += 1;
                (key, with_diagnostic(value, &fault))
            }
        };

        // Later entry wins on collision
        if normalized.insert(canonical.clone(), value).is_some() {
            debug!("🔁 Forensics key collision on {}, keeping later entry", canonical);
            report.collisions += 1;
        }
    }

    (normalized, report)
}

/// Whether a key is shaped like a JSON object literal
fn looks_like_json(key: &str) -> bool {
    key.starts_with('{') && key.ends_with('}')
}

/// Whether an earlier pass already flagged this entry
fn is_faulted(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|entry| entry.contains_key(NORMALIZATION_ERROR_FIELD))
}

/// On failure the untouched value is handed back with the fault
fn normalize_entry(key: &str, value: Value) -> Result<EntryOutcome, (AppError, Value)> {
    if !looks_like_json(key) || is_faulted(&value) {
        return Ok(EntryOutcome::PassedThrough(key.to_string(), value));
    }

    let metadata: Map<String, Value> = match serde_json::from_str(key) {
        Ok(metadata) => metadata,
        Err(_) => return Ok(EntryOutcome::PassedThrough(key.to_string(), value)),
    };

    let canonical = match metadata.get("mint") {
        None => key.to_string(),
        Some(Value::String(mint)) if !mint.is_empty() => mint.clone(),
        Some(other) => {
            let details = format!("mint in key is not a non-empty string: {}", other);
            return Err((fault(details), value));
        }
    };

    let mut entry = match value {
        Value::Object(entry) => entry,
        other => {
            let details = format!(
                "value is not an object, cannot merge key metadata (got {})",
                json_type(&other)
            );
            return Err((fault(details), other));
        }
    };

    // Key-embedded metadata wins over the value's own fields
    for field in KEY_METADATA_FIELDS {
        if let Some(meta) = metadata.get(field) {
            entry.insert(field.to_string(), meta.clone());
        }
    }

    Ok(EntryOutcome::Rewritten(canonical, Value::Object(entry)))
}

fn fault(details: String) -> AppError {
    AppError::new(ErrorCode::NormalizationFault, "Token forensics entry not normalized")
        .with_details(details)
}

/// Attach the fault description to the entry. Non-object values are wrapped.
fn with_diagnostic(value: Value, fault: &AppError) -> Value {
    let diagnostic = Value::String(fault.to_string());
    match value {
        Value::Object(mut entry) => {
            entry.insert(NORMALIZATION_ERROR_FIELD.to_string(), diagnostic);
            Value::Object(entry)
        }
        other => {
            let mut entry = Map::new();
            entry.insert("value".to_string(), other);
            entry.insert(NORMALIZATION_ERROR_FIELD.to_string(), diagnostic);
            Value::Object(entry)
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
