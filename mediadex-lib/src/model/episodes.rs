//! Episode counts and audio-track derivation

use serde::Deserialize;
use serde::Serialize;

/// Whether a title is primarily watched subbed or dubbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubOrDub {
    Sub,
    Dub,
}

/// Sub/dub episode counters with a derived total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeCounts {
    /// Episodes available subbed.
    pub sub: u32,
    /// Episodes available dubbed.
    pub dub: u32,
    /// Derived total, see [`EpisodeCounts::derive`].
    pub total: u32,
}

impl EpisodeCounts {
    /// Derives counts from optional upstream counters.
    ///
    /// The total prefers the sub count when one is nonzero, then the dub
    /// count, then zero. Missing counters count as zero.
    pub fn derive(sub: Option<u32>, dub: Option<u32>) -> Self {
        let sub = sub.unwrap_or(0);
        let dub = dub.unwrap_or(0);
        let total = if sub > 0 { sub } else { dub };
        Self { sub, dub, total }
    }

    /// Builds counts from a source that only reports a total.
    pub fn total_only(total: u32) -> Self {
        Self {
            sub: 0,
            dub: 0,
            total,
        }
    }

    /// Preferred audio track: sub whenever a nonzero sub count is present,
    /// dub otherwise.
    pub fn sub_or_dub(&self) -> SubOrDub {
        if self.sub > 0 {
            SubOrDub::Sub
        } else {
            SubOrDub::Dub
        }
    }

    /// Returns `true` when a dubbed version exists.
    pub fn has_dub(&self) -> bool {
        self.dub > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_prefers_sub() {
        let counts = EpisodeCounts::derive(Some(3), Some(5));
        assert_eq!(counts.total, 3);
        assert_eq!(counts.sub_or_dub(), SubOrDub::Sub);
    }

    #[test]
    fn test_derive_falls_back_to_dub() {
        let counts = EpisodeCounts::derive(Some(0), Some(5));
        assert_eq!(counts.total, 5);
        assert_eq!(counts.sub_or_dub(), SubOrDub::Dub);
        assert!(counts.has_dub());
    }

    #[test]
    fn test_derive_zero_when_both_missing() {
        assert_eq!(EpisodeCounts::derive(Some(0), Some(0)).total, 0);
        assert_eq!(EpisodeCounts::derive(None, None).total, 0);
    }
}
