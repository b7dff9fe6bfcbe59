//! Sentiment classification.
//!
//! Maps a fear & greed score (0–100) or a textual status label onto one of
//! the five regimes. Malformed input never fails: it is normalised to
//! `Regime::Neutral` and reported through a `warn!` diagnostic.

use tracing::{debug, warn};

use crate::types::{Regime, SentimentInput};

/// Inclusive upper bound of each band, fear to greed.
const BAND_UPPER_BOUNDS: &[(f64, Regime)] = &[
    (25.0, Regime::ExtremeFear),
    (45.0, Regime::Fear),
    (54.0, Regime::Neutral),
    (75.0, Regime::Greed),
    (100.0, Regime::ExtremeGreed),
];

/// Classify a raw sentiment reading.
pub fn classify(input: &SentimentInput) -> Regime {
    match input {
        SentimentInput::Score(score) => classify_score(*score),
        SentimentInput::Status(status) => classify_status(status),
    }
}

/// Classify a numeric fear & greed score.
///
/// Bands: [0,25] extreme fear, [26,45] fear, [46,54] neutral,
/// [55,75] greed, [76,100] extreme greed. Fractional scores fall into the
/// first band whose upper bound they do not exceed.
pub fn classify_score(score: f64) -> Regime {
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        warn!(score, "Sentiment score out of range, defaulting to neutral");
        return Regime::Neutral;
    }

    let regime = BAND_UPPER_BOUNDS
        .iter()
        .find(|(upper, _)| score <= *upper)
        .map(|(_, regime)| *regime)
        .unwrap_or(Regime::Neutral);

    debug!(score, regime = %regime, "Sentiment score classified");
    regime
}

/// Classify a textual status label (case-insensitive, whitespace-trimmed).
pub fn classify_status(status: &str) -> Regime {
    let needle = status.trim();
    match Regime::ALL
        .iter()
        .find(|r| r.label().eq_ignore_ascii_case(needle))
    {
        Some(regime) => *regime,
        None => {
            warn!(status, "Unrecognised sentiment status, defaulting to neutral");
            Regime::Neutral
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
