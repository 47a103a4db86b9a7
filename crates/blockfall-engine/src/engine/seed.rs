use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for a reproducible session.
///
/// A 128-bit value that initializes the session RNG, which drives both the
/// spawn sequence and the terrain seeding. Written as 32 hex digits.
///
/// ```
/// use blockfall_engine::{GameConfig, GameSession, SessionSeed};
///
/// let seed: SessionSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// let a = GameSession::with_seed(GameConfig::default(), seed).unwrap();
/// let b = GameSession::with_seed(GameConfig::default(), seed).unwrap();
/// assert_eq!(a.board(), b.board());
/// assert_eq!(a.falling_piece(), b.falling_piece());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl SessionSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates the RNG this seed describes.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for SessionSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl fmt::Debug for SessionSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionSeed({self})")
    }
}

impl FromStr for SessionSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for SessionSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SessionSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows drawing fresh seeds with `rng.random()`.
impl Distribution<SessionSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SessionSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SessionSeed(seed)
    }
}
