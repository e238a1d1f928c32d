//! Fairshare-driven priority calculation.
//!
//! The fairshare ratio, scaled by a large weight, forms the dominant term;
//! urgency nudges the result around it. Two urgency values are reserved by the
//! host and short-circuit the calculation entirely.

use serde::{Deserialize, Serialize};

/// Urgency value that holds a job until it is changed.
pub const URGENCY_HOLD: i32 = 0;
/// Urgency assigned when the submitter does not supply one.
pub const URGENCY_DEFAULT: i32 = 16;
/// Urgency value that places a job ahead of everything else.
pub const URGENCY_EXPEDITE: i32 = 31;

/// Lowest priority the host accepts.
pub const PRIORITY_MIN: u64 = 0;
/// Highest priority the host accepts.
pub const PRIORITY_MAX: u64 = 4_294_967_295;

/// Default multiplier applied to the fairshare ratio.
pub const DEFAULT_FAIRSHARE_WEIGHT: u32 = 100_000;
/// Default urgency treated as neutral.
pub const DEFAULT_URGENCY_MIDPOINT: i32 = URGENCY_DEFAULT;

/// Tunable factors for [`calculate_priority`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityWeights {
    /// Multiplier applied to the fairshare ratio.
    pub fairshare_weight: u32,
    /// Urgency that contributes nothing to the result.
    pub urgency_midpoint: i32,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            fairshare_weight: DEFAULT_FAIRSHARE_WEIGHT,
            urgency_midpoint: DEFAULT_URGENCY_MIDPOINT,
        }
    }
}

/// Priority forced by a reserved urgency, if `urgency` is one.
#[must_use]
pub const fn sentinel_priority(urgency: i32) -> Option<u64> {
    match urgency {
        URGENCY_HOLD => Some(PRIORITY_MIN),
        URGENCY_EXPEDITE => Some(PRIORITY_MAX),
        _ => None,
    }
}

/// `round(|weight * fairshare + (urgency - midpoint)|)`, clamped to
/// [`PRIORITY_MAX`]. A NaN fairshare yields [`PRIORITY_MIN`].
///
/// Reserved urgencies are not interpreted here; see [`sentinel_priority`].
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn calculate_priority(weights: PriorityWeights, fairshare: f64, urgency: i32) -> u64 {
    let raw = f64::from(weights.fairshare_weight).mul_add(
        fairshare,
        f64::from(urgency) - f64::from(weights.urgency_midpoint),
    );
    let value = raw.abs().round();
    if value.is_nan() {
        PRIORITY_MIN
    } else if value >= PRIORITY_MAX as f64 {
        PRIORITY_MAX
    } else {
        value as u64
    }
}
