use std::ops::{BitAnd, BitOr};

use crate::enum_list;

enum_list!(
  /// The three script types the converter translates between.
  pub enum CharType {
    Hiragana => "Hiragana",
    Katakana => "Katakana",
    Romaji => "Romaji",
  }
);

/// Conversion options. `HEPBURN` and `KUNREI` only affect Romaji output
/// (Hepburn wins when both are set), `NO_PROLONG_MARK` only affects Hiragana
/// output and `REMOVE_SPACES` only affects Kana output produced from Romaji.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConvertFlags(u8);

impl ConvertFlags {
  pub const NONE: ConvertFlags = ConvertFlags(0);
  pub const HEPBURN: ConvertFlags = ConvertFlags(1);
  pub const KUNREI: ConvertFlags = ConvertFlags(1 << 1);
  pub const NO_PROLONG_MARK: ConvertFlags = ConvertFlags(1 << 2);
  pub const REMOVE_SPACES: ConvertFlags = ConvertFlags(1 << 3);

  pub fn has(self, flags: ConvertFlags) -> bool {
    self.0 & flags.0 != 0
  }
}

impl BitOr for ConvertFlags {
  type Output = ConvertFlags;

  fn bitor(self, rhs: ConvertFlags) -> ConvertFlags {
    ConvertFlags(self.0 | rhs.0)
  }
}

impl BitAnd for ConvertFlags {
  type Output = ConvertFlags;

  fn bitand(self, rhs: ConvertFlags) -> ConvertFlags {
    ConvertFlags(self.0 & rhs.0)
  }
}
