use crate::unicode_block::{
  is_non_spacing, UnicodeBlock, COMMON_KANJI_BLOCKS, HIRAGANA_BLOCKS, KATAKANA_BLOCKS,
  PUNCTUATION_BLOCKS, RARE_KANJI_BLOCKS, SYMBOL_BLOCKS,
};
use crate::utf8::{self, Code};

// Characters rendered two terminal columns wide: all the Japanese blocks
// plus a few single code points and ranges that aren't worth full block
// entries (these can start and end on unofficial boundaries).
const WIDE_BLOCKS: [UnicodeBlock; 6] = [
  UnicodeBlock::range(0x1100, 0x115f),  // Hangul Jamo (wide subset)
  UnicodeBlock::point(0x2329),          // left-pointing angle bracket
  UnicodeBlock::point(0x232a),          // right-pointing angle bracket
  UnicodeBlock::range(0x3000, 0x303e),  // wide punctuation without 303f
  UnicodeBlock::range(0xff00, 0xff60),  // fullwidth forms
  UnicodeBlock::range(0xffe0, 0xffe6),  // fullwidth signs
];

fn is_wide(c: Code) -> bool {
  crate::unicode_block::in_any_range(
    c,
    &[
      &HIRAGANA_BLOCKS,
      &KATAKANA_BLOCKS,
      &COMMON_KANJI_BLOCKS,
      &RARE_KANJI_BLOCKS,
      &PUNCTUATION_BLOCKS,
      &SYMBOL_BLOCKS,
      &WIDE_BLOCKS,
    ],
  )
}

/// Terminal cell width of a string: wide characters count as 2 columns and
/// non-spacing characters (variation selectors, combining voice marks) count
/// as 0. Used to align chart and table output containing Japanese text.
pub fn display_size(s: &str) -> usize {
  let mut result = 0;
  for c in utf8::from_utf8(s) {
    if is_non_spacing(c) {
      continue;
    }
    result += if is_wide(c) { 2 } else { 1 };
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ascii() {
    assert_eq!(display_size(""), 0);
    assert_eq!(display_size("abc"), 3);
  }

  #[test]
  fn test_wide_characters() {
    assert_eq!(display_size("犬"), 2);
    assert_eq!(display_size("こんにちは"), 10);
    assert_eq!(display_size("ラーメン"), 8);
    assert_eq!(display_size("a犬b"), 4);
    assert_eq!(display_size("、"), 2);
    assert_eq!(display_size("　"), 2); // wide space
    assert_eq!(display_size("Ｂ"), 2); // fullwidth letter
  }

  #[test]
  fn test_non_spacing_characters() {
    assert_eq!(display_size("侮\u{fe00}"), 2);
    assert_eq!(display_size("は\u{3099}"), 2);
  }
}
