//! Dotted numeric version comparison.
//!
//! Browser version keys are compared component by component as integers, so
//! `"10"` sorts after `"9"` and `"10.1"` after `"9.9"`. Trailing zero
//! components are insignificant: `"10"` and `"10.0"` are the same version.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StatsError};

/// A parsed browser version such as `"13.1"` or `"4.4.3"`.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
}

impl Version {
    /// Parse a version key, failing on anything that is not dotted digits.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StatsError::InvalidVersion(raw.to_string()));
        }

        let parts = trimmed
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(StatsError::InvalidVersion(raw.to_string()));
                }
                part.parse::<u64>()
                    .map_err(|_| StatsError::InvalidVersion(raw.to_string()))
            })
            .collect::<Result<Vec<u64>>>()?;

        Ok(Self { parts })
    }

    /// Components with trailing zeros removed.
    fn significant(&self) -> &[u64] {
        let end = self
            .parts
            .iter()
            .rposition(|&p| p != 0)
            .map_or(0, |i| i + 1);
        &self.parts[..end]
    }
}

impl FromStr for Version {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Slice ordering is lexicographic over integers, and a shorter prefix
        // sorts first, which is what "10" < "10.1" needs.
        self.significant().cmp(other.significant())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.parts.iter().map(u64::to_string).collect();
        write!(f, "{}", joined.join("."))
    }
}

/// Compare two raw version keys.
pub fn compare_keys(a: &str, b: &str) -> Result<Ordering> {
    Ok(Version::parse(a)?.cmp(&Version::parse(b)?))
}

/// Return the highest version key in `keys`, or `None` when empty.
///
/// Fails if any key does not parse; a silently skipped key could be the
/// real maximum.
pub fn max_version_key<'a, I>(keys: I) -> Result<Option<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, Version)> = None;
    for key in keys {
        let parsed = Version::parse(key)?;
        let newer = match &best {
            Some((_, current)) => parsed > *current,
            None => true,
        };
        if newer {
            best = Some((key, parsed));
        }
    }
    Ok(best.map(|(key, _)| key))
}
