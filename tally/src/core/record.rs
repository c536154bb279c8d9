//! Line codecs for persisted candidates.
//!
//! `csv` is the positional `id,name,votes` layout with no escaping. `jsonl`
//! stores one JSON object per line and tolerates any name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::candidate::{Candidate, MAX_NAME_CHARS};

/// On-disk record format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    #[default]
    Csv,
    Jsonl,
}

/// Why a stored line could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected 3 comma-separated fields, found {0}")]
    FieldCount(usize),
    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("name exceeds {} characters", MAX_NAME_CHARS)]
    NameTooLong,
    #[error("invalid json record: {0}")]
    Json(String),
}

impl RecordFormat {
    /// Whether `name` survives an encode/decode cycle in this format.
    pub fn accepts_name(self, name: &str) -> bool {
        match self {
            RecordFormat::Csv => !name.contains([',', '\n', '\r']),
            RecordFormat::Jsonl => true,
        }
    }

    /// Encode one candidate without a line terminator.
    pub fn encode(self, candidate: &Candidate) -> Result<String, RecordError> {
        match self {
            RecordFormat::Csv => Ok(format!(
                "{},{},{}",
                candidate.id, candidate.name, candidate.votes
            )),
            RecordFormat::Jsonl => {
                serde_json::to_string(candidate).map_err(|err| RecordError::Json(err.to_string()))
            }
        }
    }

    /// Decode one line. A trailing `\r` is ignored.
    pub fn decode(self, line: &str) -> Result<Candidate, RecordError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match self {
            RecordFormat::Csv => decode_csv(line),
            RecordFormat::Jsonl => decode_jsonl(line),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFormat::Csv => f.write_str("csv"),
            RecordFormat::Jsonl => f.write_str("jsonl"),
        }
    }
}

fn decode_csv(line: &str) -> Result<Candidate, RecordError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 3 {
        return Err(RecordError::FieldCount(fields.len()));
    }
    let id = parse_number::<i64>("id", fields[0])?;
    let name = fields[1];
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(RecordError::NameTooLong);
    }
    let votes = parse_number::<u64>("votes", fields[2])?;
    Ok(Candidate {
        id,
        name: name.to_string(),
        votes,
    })
}

fn decode_jsonl(line: &str) -> Result<Candidate, RecordError> {
    let candidate: Candidate =
        serde_json::from_str(line).map_err(|err| RecordError::Json(err.to_string()))?;
    if candidate.name.chars().count() > MAX_NAME_CHARS {
        return Err(RecordError::NameTooLong);
    }
    Ok(candidate)
}

fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, RecordError> {
    raw.trim()
        .parse()
        .map_err(|_| RecordError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}
