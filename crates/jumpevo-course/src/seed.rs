use std::{fmt, str::FromStr};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// 128-bit seed of the pipe layout. Equal seeds give identical courses.
///
/// Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use jumpevo_course::CourseSeed;
/// use rand::Rng as _;
///
/// let seed: CourseSeed = rand::rng().random();
/// let json = serde_json::to_string(&seed).unwrap();
/// assert_eq!(json.len(), 34);
/// assert_eq!(serde_json::from_str::<CourseSeed>(&json).unwrap(), seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseSeed(pub [u8; 16]);

impl CourseSeed {
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl fmt::Display for CourseSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for CourseSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Error returned when a [`CourseSeed`] is not exactly 32 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("course seed must be 32 hex digits, got {input:?}")]
pub struct ParseCourseSeedError {
    input: String,
}

impl FromStr for CourseSeed {
    type Err = ParseCourseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCourseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u128::from_str_radix(s, 16).map_err(|_| invalid())?;
        Ok(Self(value.to_be_bytes()))
    }
}

impl<'de> Deserialize<'de> for CourseSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

impl Distribution<CourseSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CourseSeed {
        CourseSeed(rng.random::<u128>().to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_format() {
        let seed = CourseSeed::from_u64(0xff);
        assert_eq!(
            serde_json::to_string(&seed).unwrap(),
            "\"000000000000000000000000000000ff\""
        );
    }

    #[test]
    fn test_rejects_bad_hex() {
        assert!(serde_json::from_str::<CourseSeed>("\"abc\"").is_err());
        assert!(serde_json::from_str::<CourseSeed>("\"zz000000000000000000000000000000\"").is_err());
        // a sign is not a hex digit even though `from_str_radix` accepts it
        assert!("+0000000000000000000000000000000".parse::<CourseSeed>().is_err());
    }

    #[test]
    fn test_parse_error_names_the_input() {
        let err = "xyz".parse::<CourseSeed>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "course seed must be 32 hex digits, got \"xyz\""
        );
    }

    #[test]
    fn test_display_parses_back() {
        let seed = CourseSeed::from_u64(0xdead_beef);
        assert_eq!(seed.to_string().parse::<CourseSeed>(), Ok(seed));
    }
}
