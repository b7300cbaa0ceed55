//! Dashboard projection.
//!
//! Maps an optional [`AnalysisReport`] plus the two display names onto the
//! fixed set of named slots the match dashboard shows. The projection is
//! total: it never fails, whatever the analyzer sent.

use serde::Serialize;

use crate::report::{self, AnalysisReport};

/// Display name used when player one's name is blank.
pub const DEFAULT_PLAYER1_NAME: &str = "Player 1";

/// Display name used when player two's name is blank.
pub const DEFAULT_PLAYER2_NAME: &str = "Player 2";

/// Slot identifiers, in display order.
pub const SLOT_P1_NAME: &str = "p1Name";
pub const SLOT_P2_NAME: &str = "p2Name";
pub const SLOT_P1_SCORE: &str = "p1Score";
pub const SLOT_P2_SCORE: &str = "p2Score";
pub const SLOT_MAX_BREAK: &str = "maxBreak";
pub const SLOT_TOTAL_SHOTS: &str = "totalShots";
pub const SLOT_FOULS: &str = "fouls";

/// The two display names for a match.
///
/// Names are trimmed; a blank name falls back to the default for that seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerNames {
    pub player1: String,
    pub player2: String,
}

impl PlayerNames {
    pub fn new(player1: &str, player2: &str) -> Self {
        Self {
            player1: name_or(player1, DEFAULT_PLAYER1_NAME),
            player2: name_or(player2, DEFAULT_PLAYER2_NAME),
        }
    }
}

impl Default for PlayerNames {
    fn default() -> Self {
        Self::new("", "")
    }
}

fn name_or(name: &str, fallback: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Rendered dashboard slot values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub p1_name: String,
    pub p2_name: String,
    pub p1_score: String,
    pub p2_score: String,
    pub max_break: String,
    pub total_shots: String,
    pub fouls: String,
}

impl DashboardView {
    /// Project a report (or its absence) onto the dashboard slots.
    pub fn project(report: Option<&AnalysisReport>, names: &PlayerNames) -> Self {
        let summary = report::decode(report);

        Self {
            p1_name: names.player1.clone(),
            p2_name: names.player2.clone(),
            p1_score: report::format_number(summary.player1_score),
            p2_score: report::format_number(summary.player2_score),
            max_break: report::format_number(summary.max_break),
            total_shots: report::format_number(summary.total_shots),
            fouls: report::format_number(summary.fouls),
        }
    }

    /// `(slot id, value)` pairs in display order.
    pub fn slots(&self) -> [(&'static str, &str); 7] {
        [
            (SLOT_P1_NAME, &self.p1_name),
            (SLOT_P2_NAME, &self.p2_name),
            (SLOT_P1_SCORE, &self.p1_score),
            (SLOT_P2_SCORE, &self.p2_score),
            (SLOT_MAX_BREAK, &self.max_break),
            (SLOT_TOTAL_SHOTS, &self.total_shots),
            (SLOT_FOULS, &self.fouls),
        ]
    }
}
