// src/version/mod.rs

//! Version handling and requirement satisfaction for package recipes
//!
//! Recipe versions are not semver: release strings like `1.0-8` or
//! `2016-03-07` are common. This module parses versions into segments
//! (numeric runs compare numerically, letter runs compare as words, and the
//! pre-release words dev/alpha/beta/pre/rc sort below a plain release of the
//! same numeric prefix) and provides version requirements as unions of
//! inclusive ranges written in `lo:hi` form.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Rank of a recognized pre-release word. `pre` and `rc` share the top rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum PreRank {
    Dev,
    Alpha,
    Beta,
    Rc,
}

/// One comparable unit of a version string.
///
/// Segments at the same position compare as pre-release < word < number.
/// Pre-release segments compare by rank alone: `1.2pre2` and `1.2rc2` tie on
/// the word, leaving the trailing number to decide. The spelled word is kept
/// only for display.
#[derive(Debug, Clone)]
enum Segment {
    Pre(PreRank, String),
    Word(String),
    Num(u64),
}

impl Segment {
    fn word(run: &str) -> Self {
        match run.to_ascii_lowercase().as_str() {
            "dev" => Segment::Pre(PreRank::Dev, run.to_string()),
            "alpha" => Segment::Pre(PreRank::Alpha, run.to_string()),
            "beta" => Segment::Pre(PreRank::Beta, run.to_string()),
            "pre" | "rc" => Segment::Pre(PreRank::Rc, run.to_string()),
            _ => Segment::Word(run.to_string()),
        }
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Pre(a, _), Segment::Pre(b, _)) => a.cmp(b),
            (Segment::Pre(..), _) => Ordering::Less,
            (_, Segment::Pre(..)) => Ordering::Greater,
            (Segment::Word(a), Segment::Word(b)) => a.cmp(b),
            (Segment::Word(_), Segment::Num(_)) => Ordering::Less,
            (Segment::Num(_), Segment::Word(_)) => Ordering::Greater,
            (Segment::Num(a), Segment::Num(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Segment::Pre(rank, _) => {
                0u8.hash(state);
                rank.hash(state);
            }
            Segment::Word(w) => {
                1u8.hash(state);
                w.hash(state);
            }
            Segment::Num(n) => {
                2u8.hash(state);
                n.hash(state);
            }
        }
    }
}

/// A parsed package version.
///
/// Display preserves the original text; comparison, equality, and hashing use
/// the parsed segments, so `1.0-8` and `1.0.8` compare equal while both
/// display as written.
#[derive(Debug, Clone)]
pub struct Version {
    text: String,
    segments: Vec<Segment>,
}

impl Version {
    /// Parse a version string.
    ///
    /// Segments are runs of digits or letters; `.`, `-`, and `_` separate
    /// segments, as does any digit/letter boundary. Examples:
    /// - "1.6.3" → [1, 6, 3]
    /// - "1.0-8" → [1, 0, 8]
    /// - "2016-03-07" → [2016, 3, 7]
    /// - "1.2rc1" → [1, 2, rc, 1]
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let bytes = text.as_bytes();
        let mut segments = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            let c = bytes[i] as char;
            if c == '.' || c == '-' || c == '_' {
                i += 1;
            } else if c.is_ascii_digit() {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let run = &text[start..i];
                let n = run.parse::<u64>().map_err(|_| {
                    Error::Parse(format!(
                        "Numeric component '{}' in version '{}' is too large",
                        run, text
                    ))
                })?;
                segments.push(Segment::Num(n));
            } else if c.is_ascii_alphabetic() {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                segments.push(Segment::word(&text[start..i]));
            } else {
                return Err(Error::Parse(format!(
                    "Invalid character '{}' in version '{}'",
                    c, text
                )));
            }
        }

        if segments.is_empty() {
            return Err(Error::Parse(format!("Empty version string '{}'", s)));
        }

        Ok(Self {
            text: text.to_string(),
            segments,
        })
    }

    /// The version as originally written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Compare two versions segment by segment.
    ///
    /// When one version is a prefix of the other, the longer one wins unless
    /// its first extra segment is a pre-release word: `1.2 < 1.2.1` but
    /// `1.2rc1 < 1.2`.
    pub fn compare(&self, other: &Version) -> Ordering {
        let a = &self.segments;
        let b = &other.segments;
        let n = a.len().min(b.len());

        for i in 0..n {
            match a[i].cmp(&b[i]) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        match a.len().cmp(&b.len()) {
            Ordering::Equal => Ordering::Equal,
            Ordering::Less => {
                if matches!(b[n], Segment::Pre(..)) {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            Ordering::Greater => {
                if matches!(a[n], Segment::Pre(..)) {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// One inclusive range of versions. `None` bounds are unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    lo: Option<Version>,
    hi: Option<Version>,
}

impl VersionRange {
    /// Whether `version` falls inside this range. Bounds are inclusive and
    /// compared with full segment ordering, so `:1.9` does not admit `1.9.1`.
    pub fn contains(&self, version: &Version) -> bool {
        if let Some(lo) = &self.lo {
            if version < lo {
                return false;
            }
        }
        if let Some(hi) = &self.hi {
            if version > hi {
                return false;
            }
        }
        true
    }

    /// Intersect two ranges; `None` when they do not overlap.
    pub fn intersect(&self, other: &VersionRange) -> Option<VersionRange> {
        let lo = match (&self.lo, &other.lo) {
            (None, x) => x.clone(),
            (x, None) => x.clone(),
            (Some(a), Some(b)) => Some(if a >= b { a.clone() } else { b.clone() }),
        };
        let hi = match (&self.hi, &other.hi) {
            (None, x) => x.clone(),
            (x, None) => x.clone(),
            (Some(a), Some(b)) => Some(if a <= b { a.clone() } else { b.clone() }),
        };
        if let (Some(l), Some(h)) = (&lo, &hi) {
            if l > h {
                return None;
            }
        }
        Some(VersionRange { lo, hi })
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.lo, &self.hi) {
            (Some(lo), Some(hi)) if lo == hi => write!(f, "{}", lo),
            (Some(lo), Some(hi)) => write!(f, "{}:{}", lo, hi),
            (Some(lo), None) => write!(f, "{}:", lo),
            (None, Some(hi)) => write!(f, ":{}", hi),
            (None, None) => write!(f, ":"),
        }
    }
}

/// A version requirement: a union of inclusive ranges.
///
/// Text syntax is the requirement part of a spec, after the `@`:
/// - "1.6.1" → exactly 1.6.1
/// - "2.1.4:" → 2.1.4 or newer
/// - ":1.9" → 1.9 or older
/// - "1.2:1.9" → between 1.2 and 1.9 inclusive
/// - "1.6.1,1.6.3" → either of the listed ranges
/// - "" or ":" → any version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReq {
    ranges: Vec<VersionRange>,
}

impl VersionReq {
    /// The requirement satisfied by every version.
    pub fn any() -> Self {
        Self {
            ranges: vec![VersionRange { lo: None, hi: None }],
        }
    }

    /// The requirement satisfied only by `version`.
    pub fn exact(version: Version) -> Self {
        Self {
            ranges: vec![VersionRange {
                lo: Some(version.clone()),
                hi: Some(version),
            }],
        }
    }

    /// Parse a requirement string (the part after `@` in a spec).
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::any());
        }

        let mut ranges = Vec::new();
        for piece in s.split(',') {
            ranges.push(Self::parse_range(piece, s)?);
        }
        Ok(Self {
            ranges: canonicalize(ranges),
        })
    }

    fn parse_range(piece: &str, full: &str) -> Result<VersionRange> {
        let piece = piece.trim();
        if piece.is_empty() {
            return Err(Error::Parse(format!(
                "Empty range in version requirement '{}'",
                full
            )));
        }

        if let Some((lo, hi)) = piece.split_once(':') {
            let lo = if lo.is_empty() {
                None
            } else {
                Some(Version::parse(lo)?)
            };
            let hi = if hi.is_empty() {
                None
            } else {
                Some(Version::parse(hi)?)
            };
            if let (Some(l), Some(h)) = (&lo, &hi) {
                if l > h {
                    return Err(Error::Parse(format!(
                        "Range '{}' in version requirement '{}' is empty",
                        piece, full
                    )));
                }
            }
            Ok(VersionRange { lo, hi })
        } else {
            let v = Version::parse(piece)?;
            Ok(VersionRange {
                lo: Some(v.clone()),
                hi: Some(v),
            })
        }
    }

    /// Check if a version satisfies this requirement.
    pub fn satisfies(&self, version: &Version) -> bool {
        self.ranges.iter().any(|r| r.contains(version))
    }

    /// Whether this requirement admits every version.
    pub fn is_any(&self) -> bool {
        self.ranges.len() == 1 && self.ranges[0].lo.is_none() && self.ranges[0].hi.is_none()
    }

    /// The single version this requirement pins, if it pins exactly one.
    pub fn as_exact(&self) -> Option<&Version> {
        if self.ranges.len() == 1 {
            if let (Some(lo), Some(hi)) = (&self.ranges[0].lo, &self.ranges[0].hi) {
                if lo == hi {
                    return Some(lo);
                }
            }
        }
        None
    }

    /// Intersect two requirements; `None` when no version can satisfy both.
    pub fn intersect(&self, other: &VersionReq) -> Option<VersionReq> {
        let mut out = Vec::new();
        for a in &self.ranges {
            for b in &other.ranges {
                if let Some(r) = a.intersect(b) {
                    out.push(r);
                }
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(VersionReq {
                ranges: canonicalize(out),
            })
        }
    }

    pub fn ranges(&self) -> &[VersionRange] {
        &self.ranges
    }
}

impl fmt::Display for VersionReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for VersionReq {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        VersionReq::parse(s)
    }
}

/// Sort ranges by lower then upper bound and drop exact duplicates.
fn canonicalize(mut ranges: Vec<VersionRange>) -> Vec<VersionRange> {
    ranges.sort_by(|a, b| cmp_lo(&a.lo, &b.lo).then_with(|| cmp_hi(&a.hi, &b.hi)));
    ranges.dedup();
    ranges
}

// Lower bounds treat None as negative infinity.
fn cmp_lo(a: &Option<Version>, b: &Option<Version>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(y),
    }
}

// Upper bounds treat None as positive infinity.
fn cmp_hi(a: &Option<Version>, b: &Option<Version>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(y),
    }
}
