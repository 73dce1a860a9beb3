//! Persistence/Override Engine - multi-run regime signals
//!
//! Reads the run history (including the just-appended current run) and
//! derives the sustained signals, then combines them with the current
//! run's immediate overrides into the final stand-down decision. The
//! asymmetry is deliberate: opening a risk window needs a longer
//! unanimous streak (10 good runs) than standing down does (5 bad runs
//! or a single RED on a critical indicator).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::history::RunHistory;
use crate::indicators::names;
use crate::types::Status;

/// Windows and thresholds for the persistence rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceParams {
    /// Runs that must all qualify for a risk-window opening
    #[serde(default = "default_risk_window_runs")]
    pub risk_window_runs: usize,
    /// Minimum green count for a run to support the risk window
    #[serde(default = "default_risk_window_min_green")]
    pub risk_window_min_green: u32,
    /// Runs that must all qualify for a persistent stand-down
    #[serde(default = "default_stand_down_runs")]
    pub stand_down_runs: usize,
    /// Maximum green count for a run to support stand-down
    #[serde(default = "default_stand_down_max_green")]
    pub stand_down_max_green: u32,
    /// Length of the history glyph string
    #[serde(default = "default_glyph_len")]
    pub glyph_len: usize,
}

fn default_risk_window_runs() -> usize {
    10
}
fn default_risk_window_min_green() -> u32 {
    4
}
fn default_stand_down_runs() -> usize {
    5
}
fn default_stand_down_max_green() -> u32 {
    2
}
fn default_glyph_len() -> usize {
    12
}

impl Default for PersistenceParams {
    fn default() -> Self {
        Self {
            risk_window_runs: default_risk_window_runs(),
            risk_window_min_green: default_risk_window_min_green(),
            stand_down_runs: default_stand_down_runs(),
            stand_down_max_green: default_stand_down_max_green(),
            glyph_len: default_glyph_len(),
        }
    }
}

/// Final regime decision for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeDecision {
    /// All of the last `risk_window_runs` runs had enough greens
    pub risk_window_opening: bool,
    /// All of the last `stand_down_runs` runs had too few greens
    pub stand_down_persist: bool,
    /// The current run tripped an immediate override
    pub stand_down_override: bool,
    /// override OR persist
    pub stand_down_active: bool,
    /// Names the override indicators if the override fired, else the
    /// persistence rule, else "none"
    pub stand_down_reason: String,
    /// One char per recent run, oldest first: G (>=4 greens),
    /// R (<=2), Y otherwise
    pub history_glyph: String,
}

/// Indicators whose RED reading alone forces a stand-down this run.
const OVERRIDE_INDICATORS: [&str; 3] = [
    names::CREDIT_STRESS,
    names::ASSET_CORRELATIONS,
    names::POLICY_ACTIONS,
];

/// Evaluate the regime decision from history plus the current statuses.
///
/// `history` must already include the current run's record. A history
/// shorter than a rule's window conservatively fails that rule.
pub fn evaluate(
    history: &RunHistory,
    current: &BTreeMap<String, Status>,
    params: &PersistenceParams,
) -> RegimeDecision {
    let risk_window_opening = last_n_all(history, params.risk_window_runs, |gc| {
        gc >= params.risk_window_min_green
    });
    let stand_down_persist = last_n_all(history, params.stand_down_runs, |gc| {
        gc <= params.stand_down_max_green
    });

    let red_overrides: Vec<&str> = OVERRIDE_INDICATORS
        .iter()
        .filter(|name| current.get(**name) == Some(&Status::Red))
        .copied()
        .collect();
    let stand_down_override = !red_overrides.is_empty();
    let stand_down_active = stand_down_override || stand_down_persist;

    let stand_down_reason = if stand_down_override {
        red_overrides
            .iter()
            .map(|n| format!("{n}=RED"))
            .collect::<Vec<_>>()
            .join(", ")
    } else if stand_down_persist {
        format!(
            "green_count <= {} for {} consecutive runs",
            params.stand_down_max_green, params.stand_down_runs
        )
    } else {
        "none".to_string()
    };

    RegimeDecision {
        risk_window_opening,
        stand_down_persist,
        stand_down_override,
        stand_down_active,
        stand_down_reason,
        history_glyph: history_glyph(history, params),
    }
}

/// True iff the last `n` runs all exist and all satisfy `cond` on their
/// green count. Fewer than `n` runs is false, never a partial pass.
fn last_n_all(history: &RunHistory, n: usize, cond: impl Fn(u32) -> bool) -> bool {
    let recent = history.last_n(n);
    recent.len() == n && recent.iter().all(|r| cond(r.green_count))
}

/// Compact glyph of the recent runs, oldest first, most recent last.
fn history_glyph(history: &RunHistory, params: &PersistenceParams) -> String {
    history
        .last_n(params.glyph_len)
        .iter()
        .map(|r| {
            if r.green_count >= params.risk_window_min_green {
                'G'
            } else if r.green_count <= params.stand_down_max_green {
                'R'
            } else {
                'Y'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::testutil::run;

    fn history_of(green_counts: &[u32]) -> RunHistory {
        let mut h = RunHistory::default();
        for gc in green_counts {
            h.append(run(*gc), 60);
        }
        h
    }

    #[test]
    fn test_glyph_order_and_mapping() {
        let h = history_of(&[5, 5, 5, 5, 1, 1, 1, 1, 1, 3, 3, 3]);
        let d = evaluate(&h, &BTreeMap::new(), &PersistenceParams::default());
        assert_eq!(d.history_glyph, "GGGGRRRRRYYY");
    }

    #[test]
    fn test_risk_window_needs_full_streak() {
        let ten_good = history_of(&[4; 10]);
        let d = evaluate(&ten_good, &BTreeMap::new(), &PersistenceParams::default());
        assert!(d.risk_window_opening);

        // A 9-run streak fails even though every run qualifies
        let nine_good = history_of(&[4; 9]);
        let d = evaluate(&nine_good, &BTreeMap::new(), &PersistenceParams::default());
        assert!(!d.risk_window_opening);
    }

    #[test]
    fn test_stand_down_persist() {
        let h = history_of(&[5, 5, 2, 1, 0, 2, 2]);
        let d = evaluate(&h, &BTreeMap::new(), &PersistenceParams::default());
        assert!(d.stand_down_persist);
        assert!(d.stand_down_active);
        assert!(d.stand_down_reason.contains("5 consecutive runs"));
    }

    #[test]
    fn test_override_precedence_over_short_persistence() {
        // Only 2 prior low-green runs, so no persistence; the current
        // credit RED must still activate stand-down via override.
        let h = history_of(&[5, 2, 1]);
        let mut current = BTreeMap::new();
        current.insert(names::CREDIT_STRESS.to_string(), Status::Red);
        let d = evaluate(&h, &current, &PersistenceParams::default());
        assert!(d.stand_down_override);
        assert!(!d.stand_down_persist);
        assert!(d.stand_down_active);
        assert_eq!(d.stand_down_reason, "credit_stress=RED");
    }

    #[test]
    fn test_reason_names_all_red_overrides() {
        let mut current = BTreeMap::new();
        current.insert(names::CREDIT_STRESS.to_string(), Status::Red);
        current.insert(names::POLICY_ACTIONS.to_string(), Status::Red);
        current.insert(names::HIGH_BETA.to_string(), Status::Red); // not an override
        let d = evaluate(
            &history_of(&[5]),
            &current,
            &PersistenceParams::default(),
        );
        assert_eq!(d.stand_down_reason, "credit_stress=RED, policy_actions=RED");
    }

    #[test]
    fn test_quiet_run_has_no_reason() {
        let d = evaluate(
            &history_of(&[5, 5, 5]),
            &BTreeMap::new(),
            &PersistenceParams::default(),
        );
        assert!(!d.stand_down_active);
        assert_eq!(d.stand_down_reason, "none");
    }
}
