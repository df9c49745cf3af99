//! The log-staged output-checkpoint schedule.
//!
//! Checkpoints are coarse and log-spaced early in a run, then switch to
//! fixed increments at late times. The schedule is intentionally decoupled
//! from the integrator's own adaptive step size: the integrator chooses its
//! internal steps freely subject to not overshooting the target.

use uom::si::{f64::Time, time::year};

/// Returns the checkpoint following `current`.
///
/// In years: `t ≤ 0 → 1e-7`; `(0, 1e3] → ×10`; `(1e3, 1e4] → +100`;
/// `(1e4, 1e5] → +1000`; `(1e5, 1e6] → +1e4`; `> 1e6 → +1e5`.
/// The result is strictly greater than `current`.
#[must_use]
pub fn next_target_time(current: Time) -> Time {
    let t = current.get::<year>();
    let next = if t <= 0.0 {
        1.0e-7
    } else if t <= 1.0e3 {
        t * 10.0
    } else if t <= 1.0e4 {
        t + 100.0
    } else if t <= 1.0e5 {
        t + 1_000.0
    } else if t <= 1.0e6 {
        t + 1.0e4
    } else {
        t + 1.0e5
    };
    Time::new::<year>(next)
}
