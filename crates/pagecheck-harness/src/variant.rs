//! Browser-variant identifiers and the per-variant expectation matrix.
//!
//! A variant is an identifier only - it selects which expected-output
//! vector applies to a shared fixture and carries no behavior. The matrix
//! distinguishes an explicitly empty override ("expect zero entries") from
//! the absence of one (fall back to the default vector).

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::check::assert_sequence;
use crate::error::Result;

/// Browser engine family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    /// Chromium-based targets.
    Chromium,
    /// Firefox targets.
    Firefox,
    /// Edge targets.
    Edge,
}

impl BrowserFamily {
    fn as_str(self) -> &'static str {
        match self {
            BrowserFamily::Chromium => "chromium",
            BrowserFamily::Firefox => "firefox",
            BrowserFamily::Edge => "edge",
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserFamily {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(BrowserFamily::Chromium),
            "firefox" => Ok(BrowserFamily::Firefox),
            "edge" => Ok(BrowserFamily::Edge),
            other => Err(format!("unknown browser family: {other}")),
        }
    }
}

/// One emulated browser target: a family plus a major version.
///
/// Serialized as its display form (`"firefox-115"`) so it can key override
/// tables in JSON and TOML fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrowserVariant {
    /// Engine family.
    pub family: BrowserFamily,
    /// Major version of the emulated target.
    pub version: u16,
}

impl BrowserVariant {
    /// Creates a variant identifier.
    #[must_use]
    pub const fn new(family: BrowserFamily, version: u16) -> Self {
        Self { family, version }
    }
}

impl fmt::Display for BrowserVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.family, self.version)
    }
}

impl FromStr for BrowserVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (family, version) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("malformed browser variant: {s}"))?;
        let family = family.parse()?;
        let version = version
            .parse()
            .map_err(|_| format!("malformed browser variant version: {s}"))?;
        Ok(Self { family, version })
    }
}

impl Serialize for BrowserVariant {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BrowserVariant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// The expected log vectors for one fixture: a default plus per-variant
/// overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectations {
    /// The vector used when no override matches the active variant.
    #[serde(default)]
    default: Vec<String>,
    /// Per-variant overrides. An entry with an empty vector means "expect
    /// zero log entries" for that variant, which is different from the
    /// variant being absent here.
    #[serde(default)]
    overrides: IndexMap<BrowserVariant, Vec<String>>,
}

impl Expectations {
    /// Declares the default expected vector.
    pub fn of<I, S>(default: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default: default.into_iter().map(Into::into).collect(),
            overrides: IndexMap::new(),
        }
    }

    /// Declares that no log entries are expected for any variant.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a per-variant override. Passing an empty iterator expects zero
    /// entries for that variant.
    #[must_use]
    pub fn with_override<I, S>(mut self, variant: BrowserVariant, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides
            .insert(variant, expected.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true when an override is declared for `variant`.
    #[must_use]
    pub fn has_override(&self, variant: BrowserVariant) -> bool {
        self.overrides.contains_key(&variant)
    }

    /// Resolves the expected vector for `variant`: the override when one is
    /// declared (even an empty one), the default otherwise.
    #[must_use]
    pub fn resolve(&self, variant: BrowserVariant) -> &[String] {
        self.overrides
            .get(&variant)
            .map_or(self.default.as_slice(), Vec::as_slice)
    }

    /// Resolves the vector for `variant` and compares `actual` against it.
    ///
    /// # Errors
    ///
    /// Returns a sequence mismatch on the first divergence.
    pub fn check(&self, variant: BrowserVariant, actual: &[String]) -> Result<()> {
        assert_sequence(self.resolve(variant), actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FF115: BrowserVariant = BrowserVariant::new(BrowserFamily::Firefox, 115);
    const CR120: BrowserVariant = BrowserVariant::new(BrowserFamily::Chromium, 120);

    #[test]
    fn resolve_prefers_override() {
        let expectations = Expectations::of(["a", "b"]).with_override(FF115, ["a"]);
        assert_eq!(expectations.resolve(FF115), ["a".to_string()]);
        assert_eq!(
            expectations.resolve(CR120),
            ["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn empty_override_differs_from_absent() {
        let expectations = Expectations::of(["a"]).with_override(FF115, Vec::<String>::new());
        assert!(expectations.has_override(FF115));
        assert!(expectations.resolve(FF115).is_empty());
        // Absent override falls back to the default.
        assert!(!expectations.has_override(CR120));
        assert_eq!(expectations.resolve(CR120), ["a".to_string()]);
    }

    #[test]
    fn check_uses_resolved_vector() {
        let expectations = Expectations::of(["a"]).with_override(FF115, ["b"]);
        assert!(expectations.check(FF115, &["b".to_string()]).is_ok());
        assert!(expectations.check(FF115, &["a".to_string()]).is_err());
        assert!(expectations.check(CR120, &["a".to_string()]).is_ok());
    }

    #[test]
    fn variant_parses_its_display_form() {
        let variant: BrowserVariant = "firefox-115".parse().unwrap();
        assert_eq!(variant, FF115);
        assert_eq!(variant.to_string(), "firefox-115");
        assert!("firefox".parse::<BrowserVariant>().is_err());
        assert!("netscape-4".parse::<BrowserVariant>().is_err());
    }

    #[test]
    fn expectation_table_loads_from_json() {
        let expectations: Expectations = serde_json::from_str(
            r#"{
                "default": ["Yo!"],
                "overrides": { "edge-18": [] }
            }"#,
        )
        .unwrap();
        assert_eq!(
            expectations.resolve(CR120),
            ["Yo!".to_string()]
        );
        let edge = BrowserVariant::new(BrowserFamily::Edge, 18);
        assert!(expectations.has_override(edge));
        assert!(expectations.resolve(edge).is_empty());
    }
}
