//! The name authority: generation and bookkeeping of obfuscated identifiers.
//!
//! A [`NameAuthority`] owns the mapping from original identifiers to their
//! obfuscated replacements for one run. Mappings are created lazily on first
//! [`resolve`](NameAuthority::resolve) and never change afterwards.
//!
//! ## Invariants
//!
//! - **Consistency**: an original always resolves to the same name.
//! - **Collision-freedom**: two originals never share a name, and no
//!   generated name equals a reserved one (keyword, literal, builtin, dunder
//!   or preserved name). Such a candidate is rejected and redrawn.
//! - **Bounded generation**: after [`NameStyle::max_attempts`] rejected
//!   candidates `resolve` fails with [`NameError::Exhausted`].
//!
//! ## Name shape
//!
//! With the default [`NameStyle`] a generated name is one character from
//! `oOlI` followed by 9 to 29 characters from `o0Ol1I`, so it never starts
//! with a digit.

use std::collections::HashSet;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::reserved::ReservedNames;

/// Default alphabet for the first character of a generated name.
pub const DEFAULT_LEADING: &str = "oOlI";

/// Default alphabet for the remaining characters of a generated name.
pub const DEFAULT_BODY: &str = "o0Ol1I";

/// Default minimum number of characters after the first one.
pub const DEFAULT_MIN_TAIL: usize = 9;

/// Default maximum number of characters after the first one.
pub const DEFAULT_MAX_TAIL: usize = 29;

/// Default bound on rejected candidates per `resolve` call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Largest `max_tail` a style may ask for.
pub const MAX_TAIL_LIMIT: usize = 255;

// ============================================================================
// Errors
// ============================================================================

/// Errors produced by the name authority.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// No unused name was found within the attempt bound.
    #[error("name space exhausted: no unused name for '{original}' after {attempts} attempts")]
    Exhausted { original: String, attempts: u32 },

    /// The name style cannot produce valid identifiers.
    #[error("invalid name style: {reason}")]
    InvalidStyle { reason: String },

    /// A name asked to keep its identity is already mapped elsewhere.
    #[error("cannot pin '{name}': already mapped to '{existing}'")]
    PinConflict { name: String, existing: String },
}

// ============================================================================
// NameStyle
// ============================================================================

/// Shape of generated names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameStyle {
    /// Alphabet for the first character. Must not contain digits.
    pub leading: String,
    /// Alphabet for every following character.
    pub body: String,
    /// Minimum number of body characters.
    pub min_tail: usize,
    /// Maximum number of body characters (inclusive).
    pub max_tail: usize,
    /// Rejected candidates allowed per `resolve` before giving up.
    pub max_attempts: u32,
}

impl Default for NameStyle {
    fn default() -> Self {
        Self {
            leading: DEFAULT_LEADING.to_string(),
            body: DEFAULT_BODY.to_string(),
            min_tail: DEFAULT_MIN_TAIL,
            max_tail: DEFAULT_MAX_TAIL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl NameStyle {
    /// Check that every name this style can generate is a Python identifier.
    pub fn validate(&self) -> Result<(), NameError> {
        let invalid = |reason: &str| {
            Err(NameError::InvalidStyle {
                reason: reason.to_string(),
            })
        };

        if self.leading.is_empty() {
            return invalid("leading alphabet is empty");
        }
        if self.body.is_empty() && self.max_tail > 0 {
            return invalid("body alphabet is empty");
        }
        if self
            .leading
            .chars()
            .any(|c| !(c.is_alphabetic() || c == '_'))
        {
            return invalid("leading alphabet may only contain letters and '_'");
        }
        if self.body.chars().any(|c| !(c.is_alphanumeric() || c == '_')) {
            return invalid("body alphabet may only contain letters, digits and '_'");
        }
        if self.min_tail > self.max_tail {
            return invalid("min_tail is greater than max_tail");
        }
        if self.max_tail > MAX_TAIL_LIMIT {
            return Err(NameError::InvalidStyle {
                reason: format!("max_tail may not exceed {MAX_TAIL_LIMIT}"),
            });
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts must be at least 1");
        }
        Ok(())
    }
}

// ============================================================================
// NameMap
// ============================================================================

/// Insertion-ordered snapshot of `original -> obfuscated` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameMap(IndexMap<String, String>);

impl NameMap {
    /// The obfuscated name for `original`, if one was assigned.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.0.get(original).map(String::as_str)
    }

    /// Returns true if `original` has a mapping.
    pub fn contains(&self, original: &str) -> bool {
        self.0.contains_key(original)
    }

    /// Number of mapped originals.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing has been mapped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate pairs in the order they were first mapped.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, original: String, obfuscated: String) {
        self.0.insert(original, obfuscated);
    }
}

// ============================================================================
// NameAuthority
// ============================================================================

/// Stateful registry of obfuscated names for one run.
///
/// The random source is a type parameter so tests can script it; production
/// code uses [`StdRng`], seeded from the OS or from a caller-provided seed.
#[derive(Debug)]
pub struct NameAuthority<R = StdRng> {
    map: NameMap,
    /// Every value in `map`, for O(1) collision checks.
    issued: HashSet<String>,
    /// Names a candidate may never take.
    reserved: ReservedNames,
    leading: Vec<char>,
    body: Vec<char>,
    min_tail: usize,
    max_tail: usize,
    max_attempts: u32,
    rejected: u64,
    rng: R,
}

impl NameAuthority<StdRng> {
    /// Create an authority seeded from the operating system.
    pub fn new(style: NameStyle) -> Result<Self, NameError> {
        Self::with_rng(style, StdRng::from_entropy())
    }

    /// Create an authority whose output is fully determined by `seed`.
    pub fn with_seed(style: NameStyle, seed: u64) -> Result<Self, NameError> {
        Self::with_rng(style, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NameAuthority<R> {
    /// Create an authority drawing from `rng`.
    pub fn with_rng(style: NameStyle, rng: R) -> Result<Self, NameError> {
        style.validate()?;
        Ok(Self {
            map: NameMap::default(),
            issued: HashSet::new(),
            reserved: ReservedNames::python(),
            leading: style.leading.chars().collect(),
            body: style.body.chars().collect(),
            min_tail: style.min_tail,
            max_tail: style.max_tail,
            max_attempts: style.max_attempts,
            rejected: 0,
            rng,
        })
    }

    /// Return the obfuscated name for `original`, generating one on first use.
    pub fn resolve(&mut self, original: &str) -> Result<String, NameError> {
        if let Some(existing) = self.map.get(original) {
            return Ok(existing.to_string());
        }

        for _ in 0..self.max_attempts {
            let candidate = self.candidate();
            if self.issued.contains(&candidate) || self.reserved.contains(&candidate) {
                self.rejected += 1;
                trace!(original, candidate = %candidate, "rejected name candidate");
                continue;
            }
            debug!(original, obfuscated = %candidate, "new name mapping");
            self.issued.insert(candidate.clone());
            self.map.insert(original.to_string(), candidate.clone());
            return Ok(candidate);
        }

        Err(NameError::Exhausted {
            original: original.to_string(),
            attempts: self.max_attempts,
        })
    }

    /// Reserve `name` so that it resolves to itself.
    ///
    /// Pinning an already pinned name is a no-op. Pinning a name that already
    /// maps elsewhere, or that was handed out as an obfuscated name for a
    /// different original, fails.
    pub fn pin(&mut self, name: &str) -> Result<(), NameError> {
        if let Some(existing) = self.map.get(name) {
            if existing == name {
                return Ok(());
            }
            return Err(NameError::PinConflict {
                name: name.to_string(),
                existing: existing.to_string(),
            });
        }
        if self.issued.contains(name) {
            return Err(NameError::PinConflict {
                name: name.to_string(),
                existing: name.to_string(),
            });
        }
        trace!(name, "pinned name");
        self.issued.insert(name.to_string());
        self.map.insert(name.to_string(), name.to_string());
        Ok(())
    }

    /// Keep generated names clear of `names`, on top of the Python reserved
    /// set. Names issued earlier are not revisited.
    pub fn reserve<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names);
    }

    /// The names this authority never generates and never renames.
    pub fn reserved(&self) -> &ReservedNames {
        &self.reserved
    }

    /// Read-only view of the mapping so far.
    pub fn snapshot(&self) -> &NameMap {
        &self.map
    }

    /// Consume the authority, keeping only its mapping.
    pub fn into_snapshot(self) -> NameMap {
        self.map
    }

    /// Number of candidates rejected so far (already issued, or reserved).
    pub fn rejected_candidates(&self) -> u64 {
        self.rejected
    }

    fn candidate(&mut self) -> String {
        let first = self.leading[self.rng.gen_range(0..self.leading.len())];
        let tail = self.rng.gen_range(self.min_tail..=self.max_tail);
        let mut name = String::with_capacity(1 + tail);
        name.push(first);
        for _ in 0..tail {
            name.push(self.body[self.rng.gen_range(0..self.body.len())]);
        }
        name
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::RngCore;

    fn seeded(seed: u64) -> NameAuthority {
        NameAuthority::with_seed(NameStyle::default(), seed).unwrap()
    }

    /// Yields zeros for the first `zeros` draws, then defers to a seeded rng.
    struct StickyRng {
        zeros: usize,
        inner: StdRng,
    }

    impl StickyRng {
        fn new(zeros: usize) -> Self {
            Self {
                zeros,
                inner: StdRng::seed_from_u64(7),
            }
        }

        fn sticky(&mut self) -> bool {
            if self.zeros > 0 {
                self.zeros -= 1;
                true
            } else {
                false
            }
        }
    }

    impl RngCore for StickyRng {
        fn next_u32(&mut self) -> u32 {
            if self.sticky() {
                0
            } else {
                self.inner.next_u32()
            }
        }

        fn next_u64(&mut self) -> u64 {
            if self.sticky() {
                0
            } else {
                self.inner.next_u64()
            }
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            if self.sticky() {
                dest.fill(0);
            } else {
                self.inner.fill_bytes(dest);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    mod resolve {
        use super::*;

        #[test]
        fn same_original_same_name() {
            let mut names = seeded(1);
            let first = names.resolve("counter").unwrap();
            let second = names.resolve("counter").unwrap();
            assert_eq!(first, second);
            assert_eq!(names.snapshot().len(), 1);
        }

        #[test]
        fn distinct_originals_never_collide() {
            let mut names = seeded(2);
            let mut seen = HashSet::new();
            for i in 0..2_000 {
                let name = names.resolve(&format!("var{i}")).unwrap();
                assert!(seen.insert(name), "duplicate name for var{i}");
            }
        }

        #[test]
        fn generated_names_follow_default_shape() {
            let mut names = seeded(3);
            for i in 0..200 {
                let name = names.resolve(&format!("v{i}")).unwrap();
                let mut chars = name.chars();
                let first = chars.next().unwrap();
                assert!(DEFAULT_LEADING.contains(first), "bad first char in {name}");
                assert!(chars.all(|c| DEFAULT_BODY.contains(c)), "bad body in {name}");
                let tail = name.chars().count() - 1;
                assert!((DEFAULT_MIN_TAIL..=DEFAULT_MAX_TAIL).contains(&tail));
            }
        }

        #[test]
        fn same_seed_same_history() {
            let mut a = seeded(42);
            let mut b = seeded(42);
            for original in ["np", "counter", "helper"] {
                assert_eq!(a.resolve(original).unwrap(), b.resolve(original).unwrap());
            }
            assert_eq!(a.snapshot(), b.snapshot());
        }

        #[test]
        fn snapshot_keeps_first_seen_order() {
            let mut names = seeded(4);
            for original in ["zeta", "alpha", "mid", "alpha"] {
                names.resolve(original).unwrap();
            }
            let keys: Vec<&str> = names.snapshot().iter().map(|(k, _)| k).collect();
            assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        }
    }

    mod collisions {
        use super::*;

        #[test]
        fn forced_collision_is_redrawn() {
            // The first candidates drawn for both originals are identical.
            let mut names = NameAuthority::with_rng(NameStyle::default(), StickyRng::new(64))
                .unwrap();
            let a = names.resolve("a").unwrap();
            let ab = names.resolve("ab").unwrap();

            assert_eq!(a, "oooooooooo");
            assert_ne!(a, ab);
            assert!(names.rejected_candidates() >= 1);
            assert_eq!(names.snapshot().get("a"), Some(a.as_str()));
            assert_eq!(names.snapshot().get("ab"), Some(ab.as_str()));
        }

        #[test]
        fn constant_source_exhausts() {
            let style = NameStyle {
                max_attempts: 25,
                ..NameStyle::default()
            };
            let mut names = NameAuthority::with_rng(style, StepRng::new(0, 0)).unwrap();
            names.resolve("first").unwrap();

            let err = names.resolve("second").unwrap_err();
            assert_eq!(
                err,
                NameError::Exhausted {
                    original: "second".to_string(),
                    attempts: 25,
                }
            );
            assert!(!names.snapshot().contains("second"));
        }

        #[test]
        fn keywords_are_never_issued() {
            let style = NameStyle {
                leading: "i".to_string(),
                body: "f".to_string(),
                min_tail: 1,
                max_tail: 1,
                max_attempts: 3,
            };
            let mut names = NameAuthority::with_seed(style, 0).unwrap();
            assert!(matches!(
                names.resolve("x"),
                Err(NameError::Exhausted { attempts: 3, .. })
            ));
        }

        #[test]
        fn builtins_are_never_issued() {
            // Only "id" and "ix" can be drawn; "id" would shadow the builtin.
            let style = NameStyle {
                leading: "i".to_string(),
                body: "dx".to_string(),
                min_tail: 1,
                max_tail: 1,
                max_attempts: 200,
            };
            let mut names = NameAuthority::with_seed(style, 11).unwrap();
            assert_eq!(names.resolve("x").unwrap(), "ix");
        }

        #[test]
        fn builtin_only_style_exhausts() {
            let style = NameStyle {
                leading: "i".to_string(),
                body: "d".to_string(),
                min_tail: 1,
                max_tail: 1,
                max_attempts: 5,
            };
            let mut names = NameAuthority::with_seed(style, 0).unwrap();
            assert!(matches!(
                names.resolve("x"),
                Err(NameError::Exhausted { attempts: 5, .. })
            ));
            assert!(names.snapshot().is_empty());
        }

        #[test]
        fn preserved_names_are_never_issued() {
            let style = NameStyle {
                leading: "qr".to_string(),
                body: String::new(),
                min_tail: 0,
                max_tail: 0,
                max_attempts: 200,
            };
            let mut names = NameAuthority::with_seed(style, 12).unwrap();
            names.reserve(["q"]);
            assert!(names.reserved().contains("q"));
            assert_eq!(names.resolve("other").unwrap(), "r");
            assert!(matches!(
                names.resolve("another"),
                Err(NameError::Exhausted { .. })
            ));
        }
    }

    mod pinning {
        use super::*;

        #[test]
        fn pinned_name_resolves_to_itself() {
            let mut names = seeded(5);
            names.pin("os").unwrap();
            names.pin("os").unwrap();
            assert_eq!(names.resolve("os").unwrap(), "os");
        }

        #[test]
        fn pin_after_resolve_conflicts() {
            let mut names = seeded(6);
            let obfuscated = names.resolve("x").unwrap();
            assert_eq!(
                names.pin("x"),
                Err(NameError::PinConflict {
                    name: "x".to_string(),
                    existing: obfuscated,
                })
            );
        }

        #[test]
        fn pin_of_issued_name_conflicts() {
            let mut names = seeded(7);
            let obfuscated = names.resolve("x").unwrap();
            assert!(names.pin(&obfuscated).is_err());
        }
    }

    mod style {
        use super::*;

        #[test]
        fn default_style_is_valid() {
            assert!(NameStyle::default().validate().is_ok());
        }

        #[test]
        fn digit_leading_alphabet_rejected() {
            let style = NameStyle {
                leading: "o0".to_string(),
                ..NameStyle::default()
            };
            assert!(matches!(
                NameAuthority::with_seed(style, 0),
                Err(NameError::InvalidStyle { .. })
            ));
        }

        #[test]
        fn inverted_length_range_rejected() {
            let style = NameStyle {
                min_tail: 10,
                max_tail: 5,
                ..NameStyle::default()
            };
            let err = style.validate().unwrap_err();
            assert_eq!(
                err.to_string(),
                "invalid name style: min_tail is greater than max_tail"
            );
        }

        #[test]
        fn oversized_tail_rejected() {
            let style = NameStyle {
                min_tail: usize::MAX,
                max_tail: usize::MAX,
                ..NameStyle::default()
            };
            assert!(matches!(
                NameAuthority::with_seed(style, 0),
                Err(NameError::InvalidStyle { .. })
            ));

            let style = NameStyle {
                max_tail: MAX_TAIL_LIMIT + 1,
                ..NameStyle::default()
            };
            assert_eq!(
                style.validate().unwrap_err().to_string(),
                "invalid name style: max_tail may not exceed 255"
            );

            let style = NameStyle {
                max_tail: MAX_TAIL_LIMIT,
                ..NameStyle::default()
            };
            assert!(style.validate().is_ok());
        }

        #[test]
        fn punctuation_in_body_rejected() {
            let style = NameStyle {
                body: "o-".to_string(),
                ..NameStyle::default()
            };
            assert!(style.validate().is_err());
        }
    }
}
