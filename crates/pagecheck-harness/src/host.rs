//! The host-environment seam: where the harness hands a fixture to the
//! engine under test.
//!
//! The harness does not parse HTML or execute JavaScript. Engines implement
//! [`HostEnvironment`]; the harness only requires that running a fixture
//! synchronously performs the script's immediate work (recording into
//! `page.log()`, scheduling async callbacks on `page`'s scheduler) before
//! returning.
//!
//! [`ScriptedHost`] is the reference test double: its "scripts" are Rust
//! closures over the page context, which keeps every harness test runnable
//! without a real engine behind the seam.

use std::fmt;

use crate::fixture::Fixture;
use crate::page::Page;

/// The result of running a fixture's script, as a tagged value rather than
/// a caught exception.
///
/// Fixtures probing for engine features assert `Unsupported` directly
/// instead of fishing a script error out of a failure path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutcome {
    /// The script's synchronous portion ran to completion.
    Completed,
    /// The engine does not support something the fixture requires.
    Unsupported(String),
}

impl ScriptOutcome {
    /// Returns true when the script completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, ScriptOutcome::Completed)
    }

    /// Returns the unsupported-feature reason, if any.
    #[must_use]
    pub fn unsupported_reason(&self) -> Option<&str> {
        match self {
            ScriptOutcome::Completed => None,
            ScriptOutcome::Unsupported(reason) => Some(reason),
        }
    }
}

/// A DOM/JS execution environment the harness can drive.
///
/// Implementations parse the fixture document, run its script, and wire the
/// script's observable effects to the page: log output through
/// [`Page::log`], asynchronous callbacks through the page's scheduler, and
/// secondary fetches through [`Fixture::resources`].
pub trait HostEnvironment: Send + Sync {
    /// Loads the fixture into `page` and runs its script synchronously.
    ///
    /// Asynchronous callbacks the script schedules keep running on the
    /// page's worker after this returns; the caller bounds them with the
    /// page's quiescence waits.
    fn run_fixture(&self, fixture: &Fixture, page: &Page) -> ScriptOutcome;
}

type PageScript = Box<dyn Fn(&Fixture, &Page) -> ScriptOutcome + Send + Sync>;

/// A host environment whose "script" is a Rust closure.
///
/// The closure plays the role of the fixture's embedded script: it records,
/// schedules, and cancels against the page exactly as parsed script code
/// would.
pub struct ScriptedHost {
    script: PageScript,
}

impl ScriptedHost {
    /// Wraps a closure returning an explicit [`ScriptOutcome`].
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&Fixture, &Page) -> ScriptOutcome + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
        }
    }

    /// Wraps a closure that always completes.
    pub fn completing<F>(script: F) -> Self
    where
        F: Fn(&Fixture, &Page) + Send + Sync + 'static,
    {
        Self::new(move |fixture, page| {
            script(fixture, page);
            ScriptOutcome::Completed
        })
    }

    /// A host that rejects every fixture with the given reason.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(move |_, _| ScriptOutcome::Unsupported(reason.clone()))
    }
}

impl HostEnvironment for ScriptedHost {
    fn run_fixture(&self, fixture: &Fixture, page: &Page) -> ScriptOutcome {
        (self.script)(fixture, page)
    }
}

impl fmt::Debug for ScriptedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedHost").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completing_host_reports_completed() {
        let host = ScriptedHost::completing(|_, page| page.log().record("ran"));
        let page = Page::open().unwrap();
        let outcome = host.run_fixture(&Fixture::new("<html></html>"), &page);

        assert!(outcome.is_completed());
        assert_eq!(page.log().snapshot(), vec!["ran".to_string()]);
    }

    #[test]
    fn unsupported_host_reports_reason() {
        let host = ScriptedHost::unsupported("no WebSocket");
        let page = Page::open().unwrap();
        let outcome = host.run_fixture(&Fixture::new(""), &page);

        assert_eq!(outcome.unsupported_reason(), Some("no WebSocket"));
        assert!(page.log().is_empty());
    }
}
