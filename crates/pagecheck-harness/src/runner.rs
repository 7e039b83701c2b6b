//! The per-case runner: load a fixture, drain its background tasks within
//! a budget, resolve the active variant's expected vector, and assert.
//!
//! Pass/fail surfaces per single case only; nothing here aggregates or
//! suppresses across cases.

use std::time::Duration;

use tracing::debug;

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::fixture::Fixture;
use crate::host::{HostEnvironment, ScriptOutcome};
use crate::page::Page;
use crate::variant::{BrowserVariant, Expectations};

/// One test case: a fixture, its expected vectors, and a wait budget.
#[derive(Debug)]
pub struct TestCase {
    fixture: Fixture,
    expectations: Expectations,
    budget: Duration,
}

impl TestCase {
    /// Declares a case with the configured default wait budget.
    #[must_use]
    pub fn new(fixture: Fixture, expectations: Expectations) -> Self {
        Self {
            fixture,
            expectations,
            budget: HarnessConfig::cached().wait_budget(),
        }
    }

    /// Overrides the wait budget for this case.
    #[must_use]
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// The case's fixture.
    #[must_use]
    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    /// The case's expectation matrix.
    #[must_use]
    pub fn expectations(&self) -> &Expectations {
        &self.expectations
    }

    /// The case's quiescence budget.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }
}

/// What one case execution observed, returned alongside the pass signal.
#[derive(Debug, Clone)]
pub struct CaseReport {
    /// The script outcome the host reported.
    pub outcome: ScriptOutcome,
    /// The collected log at assertion time.
    pub log: Vec<String>,
    /// Tasks still pending when the wait budget ran out (0 = quiescent).
    pub remaining_tasks: usize,
}

/// Runs one case against `host` for the given `variant`.
///
/// The page is torn down before the assertion, so a fixture with a buggy
/// never-quiescing chain cannot append entries while the comparison runs.
///
/// # Errors
///
/// Returns a sequence mismatch when the collected log diverges from the
/// variant's expected vector, or an I/O error if the page cannot be opened.
pub fn run_case(
    host: &dyn HostEnvironment,
    variant: BrowserVariant,
    case: &TestCase,
) -> Result<CaseReport> {
    let page = Page::open()?;
    let outcome = host.run_fixture(case.fixture(), &page);
    let remaining_tasks = page.wait_for_quiescence(case.budget());
    page.close_window();
    let log = page.log().snapshot();
    debug!(
        %variant,
        entries = log.len(),
        remaining_tasks,
        "case execution finished"
    );

    case.expectations().check(variant, &log)?;
    Ok(CaseReport {
        outcome,
        log,
        remaining_tasks,
    })
}

/// Runs one case under the configured default variant.
///
/// # Errors
///
/// Same as [`run_case`].
pub fn run_case_with_default_variant(
    host: &dyn HostEnvironment,
    case: &TestCase,
) -> Result<CaseReport> {
    run_case(host, HarnessConfig::cached().default_variant, case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ScriptedHost;
    use crate::variant::BrowserFamily;

    const VARIANT: BrowserVariant = BrowserVariant::new(BrowserFamily::Chromium, 120);

    #[test]
    fn synchronous_fixture_passes_against_default_vector() {
        let host = ScriptedHost::completing(|_, page| {
            page.log().record("first");
            page.log().record("second");
        });
        let case = TestCase::new(Fixture::new("<html></html>"), Expectations::of(["first", "second"]));

        let report = run_case(&host, VARIANT, &case).unwrap();
        assert!(report.outcome.is_completed());
        assert_eq!(report.remaining_tasks, 0);
    }

    #[test]
    fn divergence_fails_the_single_case() {
        let host = ScriptedHost::completing(|_, page| page.log().record("actual"));
        let case = TestCase::new(Fixture::new(""), Expectations::of(["expected"]));

        assert!(run_case(&host, VARIANT, &case).is_err());
    }

    #[test]
    fn unsupported_outcome_still_checks_expectations() {
        let host = ScriptedHost::unsupported("no tree walker");
        let case = TestCase::new(Fixture::new(""), Expectations::empty());

        let report = run_case(&host, VARIANT, &case).unwrap();
        assert_eq!(report.outcome.unsupported_reason(), Some("no tree walker"));
        assert!(report.log.is_empty());
    }
}
