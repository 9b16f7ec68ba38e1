use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MorohashiIdError {
  #[error("invalid Morohashi id '{0}'")]
  Invalid(String),
}

/// Index number in the Dai Kan-Wa Jiten. Most are plain numbers, but some
/// carry a 'P' (Prime) suffix for supplemental entries, so "123" and "123P"
/// are different ids.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MorohashiId {
  id: u32,
  prime: bool,
}

impl MorohashiId {
  pub fn id(&self) -> u32 {
    self.id
  }

  pub fn prime(&self) -> bool {
    self.prime
  }

  /// parse an optional id: empty input is `None` rather than an error
  pub fn parse_opt(s: &str) -> Result<Option<MorohashiId>, MorohashiIdError> {
    if s.is_empty() {
      Ok(None)
    } else {
      s.parse().map(Some)
    }
  }
}

impl FromStr for MorohashiId {
  type Err = MorohashiIdError;

  fn from_str(s: &str) -> Result<MorohashiId, MorohashiIdError> {
    let (digits, prime) = if s.ends_with('P') { (&s[..s.len() - 1], true) } else { (s, false) };
    let id: u32 = digits
      .parse()
      .map_err(|_| MorohashiIdError::Invalid(s.to_string()))?;
    if id == 0 {
      return Err(MorohashiIdError::Invalid(s.to_string()));
    }
    Ok(MorohashiId { id, prime })
  }
}

impl fmt::Display for MorohashiId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}{}", self.id, if self.prime { "P" } else { "" })
  }
}
