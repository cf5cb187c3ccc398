//! Outcome aggregation for menu matching.
//!
//! A [`MatchResult`] collects failure messages keyed by the [`Location`] of
//! the menu node they were found at, plus the deadline that bounds every
//! polling loop started on its behalf.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::wait::DEFAULT_MATCH_TIMEOUT_MS;

/// Index path from the match root to a menu node
///
/// Locations order lexicographically over their indices; a location sorts
/// before every location it is a prefix of.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(Vec<usize>);

impl Location {
    /// The root location (empty path)
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Location of the `index`-th child of this node
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// The indices making up this path
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Depth of the node (0 for the root)
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root location
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for Location {
    fn from(path: Vec<usize>) -> Self {
        Self(path)
    }
}

impl From<&[usize]> for Location {
    fn from(path: &[usize]) -> Self {
        Self(path.to_vec())
    }
}

impl FromIterator<usize> for Location {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// Accumulated outcome of a match attempt
///
/// Success is false exactly when at least one failure has been recorded.
/// Children created with [`MatchResult::create_child`] share the deadline
/// but start with no failures.
#[derive(Debug, Clone)]
pub struct MatchResult {
    success: bool,
    failures: BTreeMap<Location, Vec<String>>,
    deadline: Instant,
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchResult {
    /// Create a result whose deadline is the default match timeout from now
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(DEFAULT_MATCH_TIMEOUT_MS))
    }

    /// Create a result whose deadline is `timeout` from now
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Create a result with an absolute deadline
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            success: true,
            failures: BTreeMap::new(),
            deadline,
        }
    }

    /// Fresh result that inherits only this result's deadline
    #[must_use]
    pub fn create_child(&self) -> Self {
        Self::with_deadline(self.deadline)
    }

    /// Record a failure at `location`
    pub fn failure(&mut self, location: &Location, message: impl Into<String>) {
        self.success = false;
        self.failures
            .entry(location.clone())
            .or_default()
            .push(message.into());
    }

    /// Fold another result into this one.
    ///
    /// When both results hold failures for the same location, the messages
    /// already present here are kept and the incoming ones are dropped.
    pub fn merge(&mut self, other: Self) {
        self.success &= other.success;
        for (location, messages) in other.failures {
            self.failures.entry(location).or_insert(messages);
        }
    }

    /// Whether no failure has been recorded
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Whether the deadline has passed
    #[must_use]
    pub fn has_timed_out(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// The absolute deadline
    #[must_use]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Failures in location order
    pub fn failures(&self) -> impl Iterator<Item = (&Location, &[String])> {
        self.failures.iter().map(|(l, m)| (l, m.as_slice()))
    }

    /// Messages recorded at exactly `location`
    #[must_use]
    pub fn messages_at(&self, location: &Location) -> Option<&[String]> {
        self.failures.get(location).map(Vec::as_slice)
    }

    /// Total number of failure messages
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.values().map(Vec::len).sum()
    }

    /// Render every failure as a human-readable report
    #[must_use]
    pub fn concat_failures(&self) -> String {
        let mut out = String::from("Failed expectations:\n");
        for (location, messages) in &self.failures {
            let prefix: String = location
                .indices()
                .iter()
                .map(|i| format!(" {i}"))
                .chain(std::iter::once(" ".to_string()))
                .collect();
            for (i, message) in messages.iter().enumerate() {
                if i == 0 {
                    out.push_str(&prefix);
                } else {
                    out.push_str(&" ".repeat(prefix.len()));
                }
                out.push_str(message);
                out.push('\n');
            }
        }
        out
    }

    /// Serializable summary of this result
    #[must_use]
    pub fn report(&self) -> MatchReport {
        MatchReport {
            success: self.success,
            failures: self
                .failures
                .iter()
                .map(|(location, messages)| FailureEntry {
                    location: location.clone(),
                    messages: messages.clone(),
                })
                .collect(),
        }
    }
}

/// Failures recorded at one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Where the failures were found
    pub location: Location,
    /// Messages in recording order
    pub messages: Vec<String>,
}

/// Serializable outcome of a match, for machine-readable reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Whether the match succeeded
    pub success: bool,
    /// Failures in location order
    pub failures: Vec<FailureEntry>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn loc(path: &[usize]) -> Location {
        Location::from(path)
    }

    mod location_tests {
        use super::*;

        #[test]
        fn test_root_is_empty() {
            let root = Location::root();
            assert!(root.is_root());
            assert_eq!(root.depth(), 0);
            assert_eq!(root.to_string(), "");
        }

        #[test]
        fn test_child_appends_index() {
            let location = Location::root().child(1).child(0).child(2);
            assert_eq!(location.indices(), &[1, 0, 2]);
            assert_eq!(location.to_string(), "1 0 2");
        }

        #[test]
        fn test_prefix_sorts_first() {
            assert!(loc(&[0]) < loc(&[0, 0]));
            assert!(loc(&[0, 5]) < loc(&[1]));
            assert!(loc(&[]) < loc(&[0]));
            assert!(loc(&[2, 1]) > loc(&[2, 0, 9]));
        }

        #[test]
        fn test_collect_from_iterator() {
            let location: Location = [3, 4].into_iter().collect();
            assert_eq!(location, loc(&[3, 4]));
        }
    }

    mod accumulation_tests {
        use super::*;

        #[test]
        fn test_new_is_successful() {
            let result = MatchResult::new();
            assert!(result.success());
            assert_eq!(result.failure_count(), 0);
            assert!(!result.has_timed_out());
        }

        #[test]
        fn test_failure_flips_success() {
            let mut result = MatchResult::new();
            result.failure(&loc(&[0]), "Expected label 'a', but found 'b'");
            assert!(!result.success());
            assert_eq!(result.failure_count(), 1);
        }

        #[test]
        fn test_multiple_messages_same_location() {
            let mut result = MatchResult::new();
            result.failure(&loc(&[1]), "first");
            result.failure(&loc(&[1]), "second");
            assert_eq!(
                result.messages_at(&loc(&[1])).unwrap(),
                ["first".to_string(), "second".to_string()]
            );
        }

        #[test]
        fn test_failures_iterate_in_location_order() {
            let mut result = MatchResult::new();
            result.failure(&loc(&[1]), "b");
            result.failure(&loc(&[0, 3]), "a2");
            result.failure(&loc(&[0]), "a");
            let order: Vec<_> = result.failures().map(|(l, _)| l.clone()).collect();
            assert_eq!(order, vec![loc(&[0]), loc(&[0, 3]), loc(&[1])]);
        }
    }

    mod child_and_merge_tests {
        use super::*;

        #[test]
        fn test_child_inherits_deadline_only() {
            let mut parent = MatchResult::with_timeout(Duration::from_secs(3));
            parent.failure(&loc(&[0]), "parent failure");
            let child = parent.create_child();
            assert!(child.success());
            assert_eq!(child.deadline(), parent.deadline());
        }

        #[test]
        fn test_merge_success_into_success() {
            let mut parent = MatchResult::new();
            let child = parent.create_child();
            parent.merge(child);
            assert!(parent.success());
        }

        #[test]
        fn test_merge_propagates_failure() {
            let mut parent = MatchResult::new();
            let mut child = parent.create_child();
            child.failure(&loc(&[2, 1]), "Expected toggled = true, but found false");
            parent.merge(child);
            assert!(!parent.success());
            assert_eq!(parent.messages_at(&loc(&[2, 1])).unwrap().len(), 1);
        }

        #[test]
        fn test_merge_keeps_first_on_collision() {
            let mut first = MatchResult::new();
            first.failure(&loc(&[0]), "kept");
            let mut second = MatchResult::new();
            second.failure(&loc(&[0]), "incoming");
            second.failure(&loc(&[1]), "other");

            first.merge(second);

            assert_eq!(first.messages_at(&loc(&[0])).unwrap(), ["kept".to_string()]);
            assert_eq!(first.messages_at(&loc(&[1])).unwrap(), ["other".to_string()]);
        }

        #[test]
        fn test_discarded_child_is_never_observed() {
            let parent = MatchResult::new();
            let mut child = parent.create_child();
            child.failure(&loc(&[0]), "dropped");
            drop(child);
            assert!(parent.success());
        }
    }

    mod deadline_tests {
        use super::*;

        #[test]
        fn test_zero_timeout_has_timed_out() {
            let result = MatchResult::with_timeout(Duration::ZERO);
            assert!(result.has_timed_out());
        }

        #[test]
        fn test_past_deadline() {
            let result = MatchResult::with_deadline(Instant::now());
            assert!(result.has_timed_out());
            assert!(result.create_child().has_timed_out());
        }
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_concat_failures_header_only_when_successful() {
            assert_eq!(MatchResult::new().concat_failures(), "Failed expectations:\n");
        }

        #[test]
        fn test_concat_failures_prefixes_location() {
            let mut result = MatchResult::new();
            result.failure(&loc(&[0, 0]), "Expected toggled = true, but found false");
            assert_eq!(
                result.concat_failures(),
                "Failed expectations:\n 0 0 Expected toggled = true, but found false\n"
            );
        }

        #[test]
        fn test_concat_failures_pads_following_messages() {
            let mut result = MatchResult::new();
            result.failure(&loc(&[1]), "one");
            result.failure(&loc(&[1]), "two");
            assert_eq!(result.concat_failures(), "Failed expectations:\n 1 one\n   two\n");
        }

        #[test]
        fn test_root_location_rendering() {
            let mut result = MatchResult::new();
            result.failure(&Location::root(), "Row count mismatch, expected 1 but found 0");
            assert!(result
                .concat_failures()
                .ends_with("\n Row count mismatch, expected 1 but found 0\n"));
        }

        #[test]
        fn test_report_serializes() {
            let mut result = MatchResult::new();
            result.failure(&loc(&[0, 2]), "bad");
            let report = result.report();
            assert!(!report.success);
            let json = serde_json::to_value(&report).unwrap();
            assert_eq!(json["failures"][0]["location"], serde_json::json!([0, 2]));
            assert_eq!(json["failures"][0]["messages"][0], "bad");
        }
    }

    proptest! {
        #[test]
        fn prop_success_iff_no_failures(
            paths in proptest::collection::vec(proptest::collection::vec(0usize..4, 0..4), 0..8)
        ) {
            let mut result = MatchResult::new();
            for path in &paths {
                result.failure(&Location::from(path.clone()), "x");
            }
            prop_assert_eq!(result.success(), paths.is_empty());
            prop_assert_eq!(result.failure_count(), paths.len());
        }

        #[test]
        fn prop_merge_keeps_every_location(
            left in proptest::collection::vec(proptest::collection::vec(0usize..3, 1..3), 0..6),
            right in proptest::collection::vec(proptest::collection::vec(0usize..3, 1..3), 0..6),
        ) {
            let mut a = MatchResult::new();
            for path in &left {
                a.failure(&Location::from(path.clone()), "left");
            }
            let mut b = MatchResult::new();
            for path in &right {
                b.failure(&Location::from(path.clone()), "right");
            }
            a.merge(b);
            for path in left.iter().chain(right.iter()) {
                prop_assert!(a.messages_at(&Location::from(path.clone())).is_some());
            }
            for path in &left {
                let messages = a.messages_at(&Location::from(path.clone())).unwrap();
                prop_assert!(messages.iter().all(|m| m == "left"));
            }
            prop_assert_eq!(a.success(), left.is_empty() && right.is_empty());
        }

        #[test]
        fn prop_location_order_is_lexicographic(
            a in proptest::collection::vec(0usize..5, 0..5),
            b in proptest::collection::vec(0usize..5, 0..5),
        ) {
            let ordering = Location::from(a.clone()).cmp(&Location::from(b.clone()));
            prop_assert_eq!(ordering, a.as_slice().cmp(b.as_slice()));
        }
    }
}
