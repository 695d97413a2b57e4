//! Gravity schedule

use crate::types::{BASE_GRAVITY_MS, GRAVITY_FLOOR_MS, GRAVITY_STEP_MS};

/// Get the gravity interval for a cleared-line count (in milliseconds)
/// Speeds up linearly with lines, clamped at the floor
pub fn gravity_interval_ms(lines: u32) -> u32 {
    BASE_GRAVITY_MS
        .saturating_sub(GRAVITY_STEP_MS.saturating_mul(lines))
        .max(GRAVITY_FLOOR_MS)
}
