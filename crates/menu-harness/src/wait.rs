//! Wait Mechanisms
//!
//! Synchronization with asynchronously populated menus. Matching never
//! sleeps on its own; it only waits for the provider to signal a change,
//! bounded by a short maximum wait, between whole polling attempts.

use crate::match_result::{Location, MatchResult};
use crate::provider::{Dispatch, MenuModel};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default deadline for a whole match (10 seconds)
pub const DEFAULT_MATCH_TIMEOUT_MS: u64 = 10_000;

/// Default maximum wait for a menu change between polling attempts (10ms)
pub const DEFAULT_ITEM_WAIT_MS: u64 = 10;

/// Default propagation wait after an unacknowledged side effect (100ms)
pub const DEFAULT_SETTLE_MS: u64 = 100;

// =============================================================================
// POLL OUTCOME
// =============================================================================

/// Outcome of a polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Number of attempts run, including the final one
    pub attempts: usize,
    /// Whether the final attempt matched
    pub matched: bool,
    /// Time spent in the loop
    pub elapsed: Duration,
}

// =============================================================================
// POLLING
// =============================================================================

/// Block until `menu` signals new items or `timeout` elapses
///
/// Returns whether a change was observed.
pub fn wait_for_items(menu: &dyn MenuModel, timeout: Duration) -> bool {
    menu.wait_for_change(timeout)
}

/// Re-run `attempt` until it matches or the deadline of `result` passes.
///
/// Every attempt records into a fresh child of `result`. A successful
/// attempt is merged and ends the loop. A failed attempt is discarded and
/// retried after waiting on `menu`, unless the deadline has passed, in which
/// case it is merged so its failures become the reported outcome. The
/// deadline is checked only between attempts, never during one.
pub fn poll_until_match<F>(
    result: &mut MatchResult,
    menu: &dyn MenuModel,
    item_wait: Duration,
    location: &Location,
    mut attempt: F,
) -> PollOutcome
where
    F: FnMut(&mut MatchResult),
{
    let start = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;
        let mut child = result.create_child();
        attempt(&mut child);

        if child.success() {
            debug!(%location, attempts, "menu matched");
            result.merge(child);
            return PollOutcome {
                attempts,
                matched: true,
                elapsed: start.elapsed(),
            };
        }

        if result.has_timed_out() {
            warn!(
                %location,
                attempts,
                failures = child.failure_count(),
                "deadline passed before menu matched"
            );
            result.merge(child);
            return PollOutcome {
                attempts,
                matched: false,
                elapsed: start.elapsed(),
            };
        }

        debug!(%location, attempts, "menu not matched yet, waiting for items");
        wait_for_items(menu, item_wait);
    }
}

/// Give a side effect time to propagate unless the provider confirmed it
pub fn settle(menu: &dyn MenuModel, dispatch: Dispatch, settle: Duration) {
    if dispatch == Dispatch::Pending {
        debug!(settle_ms = settle.as_millis() as u64, "waiting for side effect to propagate");
        wait_for_items(menu, settle);
    }
}

// =============================================================================
// TESTS
// =============================================================================
