//! Test-framework integration for match results

use crate::match_result::MatchResult;

/// Error returned by [`expect_match`] for an unsuccessful result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFailure {
    /// Rendered failure report
    pub report: String,
    /// Number of failure messages
    pub count: usize,
}

impl MatchFailure {
    /// Capture the failures of `result`
    #[must_use]
    pub fn new(result: &MatchResult) -> Self {
        Self {
            report: result.concat_failures(),
            count: result.failure_count(),
        }
    }
}

impl std::fmt::Display for MatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.report)
    }
}

impl std::error::Error for MatchFailure {}

/// `Ok` when `result` succeeded, otherwise its rendered failures
pub fn expect_match(result: &MatchResult) -> Result<(), MatchFailure> {
    if result.success() {
        Ok(())
    } else {
        Err(MatchFailure::new(result))
    }
}

/// Fail the enclosing test with the rendered report unless the result succeeded
///
/// ```rust
/// use menu_harness::{assert_match, MatchResult};
///
/// assert_match!(MatchResult::new());
/// ```
///
/// ```rust,should_panic
/// use menu_harness::{assert_match, Location, MatchResult};
///
/// let mut result = MatchResult::new();
/// result.failure(&Location::root().child(0), "Expected label 'a', but found 'b'");
/// assert_match!(result, "sound menu");
/// ```
#[macro_export]
macro_rules! assert_match {
    ($result:expr $(,)?) => {{
        let result = &$result;
        if !result.success() {
            panic!("{}", result.concat_failures());
        }
    }};
    ($result:expr, $($arg:tt)+) => {{
        let result = &$result;
        if !result.success() {
            panic!("{}\n{}", format_args!($($arg)+), result.concat_failures());
        }
    }};
}
