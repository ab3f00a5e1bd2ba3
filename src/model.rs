//! Report inputs: assessment metadata, payload summary counts, and payload
//! records, plus the rectangular [`Dataset`] the table formatter consumes.

use crate::ReportError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

pub const BORDER_PROTECTION: &str = "border_protection";
pub const HOST_PROTECTION: &str = "host_protection";

const DOMAIN_PATTERN: &str =
    r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+(?:[a-z]{2,63}|xn--[a-z0-9-]{1,59})$";

static DOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DOMAIN_PATTERN).expect("domain pattern is valid"));

/// Whether `domain` is a hostname with at least two labels, e.g. `cisa.gov`.
pub fn is_valid_domain(domain: &str) -> bool {
    domain.len() <= 253 && DOMAIN_RE.is_match(domain)
}

/// Outcome of a payload at one detection checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protection {
    #[serde(rename = "Blocked")]
    Blocked,
    #[serde(rename = "Not blocked")]
    NotBlocked,
}

impl Protection {
    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["blocked"] => Some(Protection::Blocked),
            ["not", "blocked"] => Some(Protection::NotBlocked),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protection::Blocked => "Blocked",
            Protection::NotBlocked => "Not blocked",
        }
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts over the payloads of one assessment.
///
/// `total` counts checkpoint results: every payload is observed once at the
/// border and once at the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayloadSummary {
    #[serde(rename = "num_payloads")]
    pub total: u64,
    pub border_blocked: u64,
    pub border_not_blocked: u64,
    pub host_blocked: u64,
    pub host_not_blocked: u64,
    #[serde(rename = "payloads_blocked")]
    pub blocked: u64,
    #[serde(rename = "payloads_not_blocked")]
    pub not_blocked: u64,
}

impl PayloadSummary {
    pub fn from_records(records: &[PayloadRecord]) -> Self {
        let mut summary = PayloadSummary::default();
        for record in records {
            match record.border_protection() {
                Protection::Blocked => summary.border_blocked += 1,
                Protection::NotBlocked => summary.border_not_blocked += 1,
            }
            match record.host_protection() {
                Protection::Blocked => summary.host_blocked += 1,
                Protection::NotBlocked => summary.host_not_blocked += 1,
            }
        }
        summary.blocked = summary.border_blocked + summary.host_blocked;
        summary.not_blocked = summary.border_not_blocked + summary.host_not_blocked;
        summary.total = summary.blocked + summary.not_blocked;
        summary
    }

    /// Number of payloads tested.
    pub fn payload_count(&self) -> u64 {
        self.border_blocked.saturating_add(self.border_not_blocked)
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        let counts = [
            ("border_blocked", self.border_blocked),
            ("border_not_blocked", self.border_not_blocked),
            ("host_blocked", self.host_blocked),
            ("host_not_blocked", self.host_not_blocked),
            ("payloads_blocked", self.blocked),
            ("payloads_not_blocked", self.not_blocked),
        ];
        for (name, count) in counts {
            if count > self.total {
                return Err(ReportError::Schema(format!(
                    "{} ({}) exceeds num_payloads ({})",
                    name, count, self.total
                )));
            }
        }

        let border = checked_sum("border results", self.border_blocked, self.border_not_blocked)?;
        let host = checked_sum("host results", self.host_blocked, self.host_not_blocked)?;
        if border != host {
            return Err(ReportError::Schema(format!(
                "border results ({}) and host results ({}) cover different payload counts",
                border, host
            )));
        }
        let blocked = checked_sum(
            "border_blocked + host_blocked",
            self.border_blocked,
            self.host_blocked,
        )?;
        if self.blocked != blocked {
            return Err(ReportError::Schema(format!(
                "payloads_blocked ({}) is not border_blocked + host_blocked ({})",
                self.blocked, blocked
            )));
        }
        let not_blocked = checked_sum(
            "border_not_blocked + host_not_blocked",
            self.border_not_blocked,
            self.host_not_blocked,
        )?;
        if self.not_blocked != not_blocked {
            return Err(ReportError::Schema(format!(
                "payloads_not_blocked ({}) is not border_not_blocked + host_not_blocked ({})",
                self.not_blocked, not_blocked
            )));
        }
        let total = checked_sum(
            "payloads_blocked + payloads_not_blocked",
            self.blocked,
            self.not_blocked,
        )?;
        if self.total != total {
            return Err(ReportError::Schema(format!(
                "num_payloads ({}) is not payloads_blocked + payloads_not_blocked ({})",
                self.total, total
            )));
        }
        Ok(())
    }
}

fn checked_sum(what: &str, a: u64, b: u64) -> Result<u64, ReportError> {
    a.checked_add(b)
        .ok_or_else(|| ReportError::Schema(format!("{} overflows ({} + {})", what, a, b)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentMetadata {
    pub assessment_id: String,
    pub domain_tested: String,
    pub election_name: String,
    pub output_directory: PathBuf,
    #[serde(rename = "payloads_meta")]
    pub payload_summary: PayloadSummary,
}

impl AssessmentMetadata {
    pub fn validate(&self) -> Result<(), ReportError> {
        let id = self.assessment_id.as_str();
        if id.trim().is_empty() {
            return Err(ReportError::Schema("assessment_id must not be empty".into()));
        }
        if id.trim() != id {
            return Err(ReportError::Schema(format!(
                "assessment_id '{}' must not start or end with whitespace",
                id
            )));
        }
        if id.contains(['/', '\\']) || id.contains("..") {
            return Err(ReportError::Schema(format!(
                "assessment_id '{}' must not contain path separators or '..'",
                self.assessment_id
            )));
        }
        if !is_valid_domain(&self.domain_tested) {
            return Err(ReportError::Schema(format!(
                "domain_tested '{}' is not a valid domain",
                self.domain_tested
            )));
        }
        self.payload_summary.validate()
    }
}

/// One payload's results. Fields keep the order they were declared in.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadRecord {
    fields: Vec<(String, String)>,
    border_protection: Protection,
    host_protection: Protection,
}

impl PayloadRecord {
    /// Builds a record from ordered `(name, value)` pairs.
    ///
    /// `border_protection` and `host_protection` are required and must hold
    /// a protection value. Field names must be unique.
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields: Vec<(String, String)> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        for (index, (name, _)) in fields.iter().enumerate() {
            if fields[..index].iter().any(|(other, _)| other == name) {
                return Err(ReportError::Schema(format!("duplicate field '{}'", name)));
            }
        }

        let protection = |name: &str| -> Result<Protection, ReportError> {
            let value = fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .ok_or_else(|| ReportError::Schema(format!("missing required field '{}'", name)))?;
            Protection::parse(value).ok_or_else(|| {
                ReportError::Schema(format!(
                    "field '{}' must be 'Blocked' or 'Not blocked', got '{}'",
                    name, value
                ))
            })
        };
        let border_protection = protection(BORDER_PROTECTION)?;
        let host_protection = protection(HOST_PROTECTION)?;

        Ok(Self {
            fields,
            border_protection,
            host_protection,
        })
    }

    /// Builds a record from a JSON object. Non-string values are kept as
    /// their JSON text; `null` becomes an empty string.
    pub fn from_json(value: &Value) -> Result<Self, ReportError> {
        let object = value.as_object().ok_or_else(|| {
            ReportError::Schema(format!("payload record must be an object, got {}", value))
        })?;
        Self::from_map(object)
    }

    fn from_map(object: &Map<String, Value>) -> Result<Self, ReportError> {
        Self::from_fields(object.iter().map(|(k, v)| {
            let text = match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (k.clone(), text)
        }))
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn border_protection(&self) -> Protection {
        self.border_protection
    }

    pub fn host_protection(&self) -> Protection {
        self.host_protection
    }
}

impl Serialize for PayloadRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PayloadRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        PayloadRecord::from_map(&map).map_err(de::Error::custom)
    }
}

/// Reads payload records from either a bare array or an object with a
/// `payloads` array.
pub fn records_from_json(value: &Value) -> Result<Vec<PayloadRecord>, ReportError> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(object) => object
            .get("payloads")
            .and_then(Value::as_array)
            .ok_or_else(|| ReportError::Schema("expected a 'payloads' array".into()))?,
        other => {
            return Err(ReportError::Schema(format!(
                "expected an array of payload records, got {}",
                json_kind(other)
            )));
        }
    };

    list.iter()
        .enumerate()
        .map(|(index, item)| {
            PayloadRecord::from_json(item).map_err(|e| match e {
                ReportError::Schema(msg) => {
                    ReportError::Schema(format!("payload {}: {}", index, msg))
                }
                other => other,
            })
        })
        .collect()
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Records in rectangular form: column names in declared order plus one row
/// of cells per record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ReportError> {
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(ReportError::Schema(format!(
                    "row {} has {} cells but there are {} columns",
                    index,
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Columns come from the first record. Every other record must carry
    /// exactly the same field names; values are reordered to match.
    /// Protection columns hold the canonical `Blocked` / `Not blocked` text.
    pub fn from_records(records: &[PayloadRecord]) -> Result<Self, ReportError> {
        let Some(first) = records.first() else {
            return Ok(Self::default());
        };
        let columns: Vec<String> = first.field_names().map(str::to_string).collect();

        let rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| -> Result<Vec<String>, ReportError> {
                if record.fields().len() != columns.len() {
                    return Err(inconsistent_fields(index, &columns, record));
                }
                columns
                    .iter()
                    .map(|column| match column.as_str() {
                        BORDER_PROTECTION => Ok(record.border_protection().as_str().to_string()),
                        HOST_PROTECTION => Ok(record.host_protection().as_str().to_string()),
                        _ => record
                            .get(column)
                            .map(str::to_string)
                            .ok_or_else(|| inconsistent_fields(index, &columns, record)),
                    })
                    .collect()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn inconsistent_fields(index: usize, columns: &[String], record: &PayloadRecord) -> ReportError {
    let found: Vec<&str> = record.field_names().collect();
    ReportError::Schema(format!(
        "payload {} has fields [{}] but the first payload has [{}]",
        index,
        found.join(", "),
        columns.join(", ")
    ))
}
