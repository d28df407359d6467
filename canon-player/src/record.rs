//! Parsing of annotated evaluation records into training labels.
//!
//! One record line lists every candidate considered at a ply as comma-separated
//! triplets: `move, outcome-or-score, tiebreak-or-dash`, e.g.
//! `F5, 12, ----, D6, Win, ----`. Numeric scores are normalized over the
//! whole line and squashed into `(-1, 1)`.

use canon_othello::{InvalidCoordinateText, Location};
use derive_more::{Display, Error};
use itertools::Itertools;

const FIELDS_PER_ENTRY: usize = 3;
const NO_TIEBREAK: &str = "----";

/// A recorded score before normalization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawScore {
    Win,
    Draw,
    Loss,
    Numeric(f64),
}

impl RawScore {
    /// Get the value of a game-theoretic outcome. `None` for numeric scores.
    pub fn outcome_value(self) -> Option<f64> {
        match self {
            RawScore::Win => Some(1.0),
            RawScore::Draw => Some(0.0),
            RawScore::Loss => Some(-1.0),
            RawScore::Numeric(_) => None,
        }
    }
}

/// One candidate move and its label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvalEntry {
    pub location: Location,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Display, Error)]
pub enum MalformedRecordError {
    #[display(fmt = "empty evaluation record")]
    Empty,
    #[display(fmt = "{} fields do not form move/score/tiebreak triplets", count)]
    FieldCount { count: usize },
    #[display(fmt = "invalid move {:?} in evaluation record", text)]
    InvalidMove { text: String },
    #[display(fmt = "invalid score {:?} in evaluation record", text)]
    InvalidScore { text: String },
}

impl From<InvalidCoordinateText> for MalformedRecordError {
    fn from(err: InvalidCoordinateText) -> Self {
        MalformedRecordError::InvalidMove { text: err.text }
    }
}

/// Parse one triplet into a location and its raw score.
fn parse_entry(fields: &[&str]) -> Result<(Location, RawScore), MalformedRecordError> {
    let location: Location = fields[0].parse()?;

    let score = match fields[1] {
        "Win" => RawScore::Win,
        "Draw" => RawScore::Draw,
        "Loss" => RawScore::Loss,
        score => {
            let text = if fields[2] == NO_TIEBREAK {
                score
            } else {
                fields[2]
            };
            let invalid = || MalformedRecordError::InvalidScore {
                text: text.to_string(),
            };
            let value: f64 = text.parse().map_err(|_| invalid())?;
            // Scores are normalized as a batch and must all be finite.
            if !value.is_finite() {
                return Err(invalid());
            }
            RawScore::Numeric(value)
        }
    };

    Ok((location, score))
}

/// Parse a record line into raw scores, in record order.
pub fn parse_raw_record(line: &str) -> Result<Vec<(Location, RawScore)>, MalformedRecordError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(MalformedRecordError::Empty);
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() % FIELDS_PER_ENTRY != 0 {
        return Err(MalformedRecordError::FieldCount {
            count: fields.len(),
        });
    }

    fields.chunks(FIELDS_PER_ENTRY).map(parse_entry).collect()
}

/// Map numeric scores to `tanh` of their z-score within the batch.
/// Outcomes keep their fixed values.
pub fn normalize(scores: &[(Location, RawScore)]) -> Vec<EvalEntry> {
    let numeric: Vec<f64> = scores
        .iter()
        .filter_map(|&(_, score)| match score {
            RawScore::Numeric(value) => Some(value),
            _ => None,
        })
        .collect();

    let (mean, stdev) = batch_stats(&numeric);

    scores
        .iter()
        .map(|&(location, score)| {
            let value = match score {
                RawScore::Numeric(value) => {
                    let centered = value - mean;
                    if stdev > 0.0 {
                        (centered / stdev).tanh()
                    } else {
                        centered.tanh()
                    }
                }
                outcome => outcome.outcome_value().unwrap_or_default(),
            };
            EvalEntry { location, value }
        })
        .collect()
}

/// Mean and sample standard deviation. The deviation is 0 with fewer than two values.
fn batch_stats(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

/// Parse and normalize one evaluation record line.
pub fn parse_eval_record(line: &str) -> Result<Vec<EvalEntry>, MalformedRecordError> {
    parse_raw_record(line).map(|scores| normalize(&scores))
}

/// Split a move record like `F5D6C3` into locations.
pub fn parse_move_record(record: &str) -> Result<Vec<Location>, InvalidCoordinateText> {
    let chunks = record.trim().chars().chunks(2);
    let moves = chunks
        .into_iter()
        .map(|chunk| chunk.collect::<String>().parse())
        .collect();
    moves
}
