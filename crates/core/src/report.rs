//! Analyzer report decoding.
//!
//! The external analyzer emits loosely-typed JSON. [`AnalysisReport`] is the
//! typed view of the handful of fields the dashboard cares about, with every
//! field optional. [`decode`] is the only place where a missing field turns
//! into zero.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which some analyzer builds nest the actual report.
const ENVELOPE_KEY: &str = "analysis";

/// Per-player section of an analyzer report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Typed, lenient view of an analyzer report.
///
/// Fields with the wrong JSON type are treated the same as missing fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub player1: PlayerStats,
    #[serde(default)]
    pub player2: PlayerStats,
    /// Highest break of the match (`break` on the wire).
    #[serde(rename = "break", default, skip_serializing_if = "Option::is_none")]
    pub max_break: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_shots: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fouls: Option<f64>,
}

impl AnalysisReport {
    /// Build the typed view from a raw analyzer document.
    ///
    /// Accepts either the bare report or one wrapped as
    /// `{ "analysis": { ... } }`. Never fails: anything unrecognised is
    /// simply absent.
    pub fn from_value(value: &Value) -> Self {
        let body = match value.get(ENVELOPE_KEY) {
            Some(inner) if inner.is_object() => inner,
            _ => value,
        };

        Self {
            player1: player_stats(body.get("player1")),
            player2: player_stats(body.get("player2")),
            max_break: number(body.get("break")),
            total_shots: number(body.get("total_shots")),
            fouls: number(body.get("fouls")),
        }
    }
}

fn player_stats(value: Option<&Value>) -> PlayerStats {
    PlayerStats {
        score: number(value.and_then(|v| v.get("score"))),
    }
}

/// Read a JSON number, also accepting numeric strings.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Report values with every default applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportSummary {
    pub player1_score: f64,
    pub player2_score: f64,
    pub max_break: f64,
    pub total_shots: f64,
    pub fouls: f64,
}

/// Collapse an optional report into concrete numbers, substituting `0` for
/// anything missing (including a missing report).
pub fn decode(report: Option<&AnalysisReport>) -> ReportSummary {
    let Some(report) = report else {
        return ReportSummary::default();
    };

    ReportSummary {
        player1_score: report.player1.score.unwrap_or(0.0),
        player2_score: report.player2.score.unwrap_or(0.0),
        max_break: report.max_break.unwrap_or(0.0),
        total_shots: report.total_shots.unwrap_or(0.0),
        fouls: report.fouls.unwrap_or(0.0),
    }
}

/// Render a report number the way a person would write it (`42`, `12.5`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
