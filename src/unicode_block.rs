use crate::utf8::{self, Code, COMBINING_SEMI_VOICED, COMBINING_VOICED, MAX_MB_SIZE};

/// Unicode version a block was introduced in. To keep things simple this is
/// the first version of the whole block even though some characters may have
/// been added later (the Katakana block is 1.1, but U+30A0 came in 3.2).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnicodeVersion {
  pub version: &'static str,
  pub month: u8,
  pub year: u16,
}

pub const UVER_1_1: UnicodeVersion = UnicodeVersion { version: "1.1", month: 6, year: 1993 };
pub const UVER_3_0: UnicodeVersion = UnicodeVersion { version: "3.0", month: 9, year: 1999 };
pub const UVER_3_1: UnicodeVersion = UnicodeVersion { version: "3.1", month: 3, year: 2001 };
pub const UVER_3_2: UnicodeVersion = UnicodeVersion { version: "3.2", month: 3, year: 2002 };
pub const UVER_4_1: UnicodeVersion = UnicodeVersion { version: "4.1", month: 3, year: 2005 };
pub const UVER_5_0: UnicodeVersion = UnicodeVersion { version: "5.0", month: 7, year: 2006 };
pub const UVER_5_2: UnicodeVersion = UnicodeVersion { version: "5.2", month: 10, year: 2009 };
pub const UVER_13_0: UnicodeVersion = UnicodeVersion { version: "13.0", month: 3, year: 2020 };

/// An inclusive range of code points. Official blocks carry a version and a
/// name and start/end on 16-aligned boundaries; unofficial blocks (used for
/// wide-display tables) can be a single point or start anywhere.
#[derive(Clone, Copy, Debug)]
pub struct UnicodeBlock {
  start: Code,
  end: Code,
  version: Option<UnicodeVersion>,
  name: Option<&'static str>,
}

impl UnicodeBlock {
  pub const fn official(
    start: Code, end: Code, version: UnicodeVersion, name: &'static str,
  ) -> UnicodeBlock {
    UnicodeBlock { start, end, version: Some(version), name: Some(name) }
  }

  pub const fn range(start: Code, end: Code) -> UnicodeBlock {
    UnicodeBlock { start, end, version: None, name: None }
  }

  pub const fn point(start: Code) -> UnicodeBlock {
    UnicodeBlock::range(start, start)
  }

  pub fn start(&self) -> Code {
    self.start
  }

  pub fn end(&self) -> Code {
    self.end
  }

  pub fn version(&self) -> Option<&UnicodeVersion> {
    self.version.as_ref()
  }

  pub fn name(&self) -> Option<&'static str> {
    self.name
  }

  /// number of code points in the block (inclusive of start and end)
  pub fn size(&self) -> Code {
    self.end - self.start + 1
  }

  pub fn contains(&self, c: Code) -> bool {
    self.start <= c && c <= self.end
  }
}

/// official Hiragana block
pub const HIRAGANA_BLOCKS: [UnicodeBlock; 1] =
  [UnicodeBlock::official(0x3040, 0x309f, UVER_1_1, "Hiragana")];

/// official Katakana blocks, the second contains small letters for Ainu like ㇱ
pub const KATAKANA_BLOCKS: [UnicodeBlock; 2] = [
  UnicodeBlock::official(0x30a0, 0x30ff, UVER_1_1, "Katakana"),
  UnicodeBlock::official(0x31f0, 0x31ff, UVER_3_2, "Katakana Phonetic Extension"),
];

/// Almost all common Japanese Kanji are in the original CJK Unified block.
/// The Compatibility block contains single-grapheme versions of old/variant
/// Kanji that otherwise need a base character plus a variation selector.
pub const COMMON_KANJI_BLOCKS: [UnicodeBlock; 4] = [
  UnicodeBlock::official(0x3400, 0x4dbf, UVER_3_0, "CJK Extension A"),
  UnicodeBlock::official(0x4e00, 0x9fff, UVER_1_1, "CJK Unified Ideographs"),
  UnicodeBlock::official(0xf900, 0xfaff, UVER_1_1, "CJK Compat. Ideographs"),
  UnicodeBlock::official(0x20000, 0x2a6df, UVER_3_1, "CJK Extension B"),
];

/// Extensions C through F are contiguous so they are combined into one block
pub const RARE_KANJI_BLOCKS: [UnicodeBlock; 4] = [
  UnicodeBlock::official(0x2e80, 0x2eff, UVER_3_0, "Radicals Supp."),
  UnicodeBlock::official(0x2a700, 0x2ebef, UVER_5_2, "CJK Extension C-F"),
  UnicodeBlock::official(0x2f800, 0x2fa1f, UVER_3_1, "CJK Compat. Supp."),
  UnicodeBlock::official(0x30000, 0x3134f, UVER_13_0, "CJK Extension G"),
];

/// punctuation commonly used in Japanese text
pub const PUNCTUATION_BLOCKS: [UnicodeBlock; 3] = [
  UnicodeBlock::official(0x2000, 0x206f, UVER_1_1, "General Punctuation"),
  UnicodeBlock::official(0x3000, 0x303f, UVER_1_1, "CJK Symbols and Punctuation"),
  UnicodeBlock::official(0xfff0, 0xffff, UVER_1_1, "Specials"),
];

/// symbols commonly used in Japanese text
pub const SYMBOL_BLOCKS: [UnicodeBlock; 9] = [
  UnicodeBlock::official(0x2100, 0x214f, UVER_1_1, "Letterlike Symbols"),
  UnicodeBlock::official(0x2190, 0x21ff, UVER_1_1, "Arrows"),
  UnicodeBlock::official(0x2200, 0x22ff, UVER_1_1, "Mathematical Operators"),
  UnicodeBlock::official(0x2500, 0x257f, UVER_1_1, "Box Drawing"),
  UnicodeBlock::official(0x25a0, 0x25ff, UVER_1_1, "Geometric Shapes"),
  UnicodeBlock::official(0x2600, 0x26ff, UVER_1_1, "Miscellaneous Symbols"),
  UnicodeBlock::official(0x2ff0, 0x2fff, UVER_3_0, "CJK Ideographic Desc. Chars"),
  UnicodeBlock::official(0x3190, 0x319f, UVER_1_1, "Kanbun (Annotations)"),
  UnicodeBlock::official(0x31c0, 0x31ef, UVER_4_1, "CJK Strokes"),
];

/// non-Ascii letters commonly used in Japanese text (the last block also
/// includes halfwidth Katakana)
pub const LETTER_BLOCKS: [UnicodeBlock; 7] = [
  UnicodeBlock::official(0x0080, 0x00ff, UVER_1_1, "Latin-1 Supplement"),
  UnicodeBlock::official(0x0100, 0x017f, UVER_1_1, "Latin Extended-A"),
  UnicodeBlock::official(0x0180, 0x024f, UVER_1_1, "Latin Extended-B"),
  UnicodeBlock::official(0x2150, 0x218f, UVER_1_1, "Number Forms"),
  UnicodeBlock::official(0x2460, 0x24ff, UVER_1_1, "Enclosed Alphanumerics"),
  UnicodeBlock::official(0x2c60, 0x2c7f, UVER_5_0, "Latin Extended-C"),
  UnicodeBlock::official(0xff00, 0xffef, UVER_1_1, "Halfwidth and Fullwidth Forms"),
];

/// variation selectors are skipped when reading in Kanji since they modify
/// the preceding character
pub const NON_SPACING_BLOCKS: [UnicodeBlock; 1] =
  [UnicodeBlock::official(0xfe00, 0xfe0f, UVER_3_2, "Variation Selectors")];

/// the wide ideographic space (only accepted by `is_mb_punctuation` on request)
pub const WIDE_SPACE: &str = "　";

/// Check if `c` is in any block of `blocks`. The array must be in ascending
/// `start` order and non-overlapping (verified by tests for the arrays above)
/// so the scan can stop early.
pub fn in_range(c: Code, blocks: &[UnicodeBlock]) -> bool {
  for b in blocks {
    if c < b.start {
      break;
    }
    if b.contains(c) {
      return true;
    }
  }
  false
}

/// Check if `c` is in any block of any of the given arrays. The arrays can be
/// in any order (they may overlap each other).
pub fn in_any_range(c: Code, groups: &[&[UnicodeBlock]]) -> bool {
  groups.iter().any(|g| in_range(c, g))
}

/// true for variation selectors and the two combining voice marks
pub fn is_non_spacing(c: Code) -> bool {
  in_range(c, &NON_SPACING_BLOCKS) || c == COMBINING_VOICED || c == COMBINING_SEMI_VOICED
}

/// Return true if the first character of `s` is in the given blocks. An empty
/// string returns false. When `size_one` is set, a string longer than one
/// character also returns false unless the second character is non-spacing
/// (so one displayable grapheme still counts).
pub fn in_wchar_range(s: &str, size_one: bool, groups: &[&[UnicodeBlock]]) -> bool {
  // a single byte can't hold a multi-byte character
  if s.len() > 1 {
    if !size_one {
      let w = utf8::from_utf8_max(s, 1);
      return w.len() == 1 && in_any_range(w[0], groups);
    }
    if s.len() <= MAX_MB_SIZE * 2 {
      // convert up to three characters so the second position can be tested
      // for non-spacing (and a third would prove the string is too long)
      let w = utf8::from_utf8_max(s, 3);
      return (w.len() == 1 || w.len() == 2 && is_non_spacing(w[1])) && in_any_range(w[0], groups);
    }
  }
  false
}

/// true if `s` is empty or every character is in the given blocks (an
/// in-range character can be followed by a non-spacing character)
pub fn in_wchar_range_all(s: &str, groups: &[&[UnicodeBlock]]) -> bool {
  let mut allow_non_spacing = false;
  for c in utf8::from_utf8(s) {
    if allow_non_spacing && is_non_spacing(c) {
      allow_non_spacing = false;
    } else if in_any_range(c, groups) {
      allow_non_spacing = true;
    } else {
      return false;
    }
  }
  true
}

pub fn is_hiragana(s: &str, size_one: bool) -> bool {
  in_wchar_range(s, size_one, &[&HIRAGANA_BLOCKS])
}

pub fn is_katakana(s: &str, size_one: bool) -> bool {
  in_wchar_range(s, size_one, &[&KATAKANA_BLOCKS])
}

pub fn is_kana(s: &str, size_one: bool) -> bool {
  in_wchar_range(s, size_one, &[&HIRAGANA_BLOCKS, &KATAKANA_BLOCKS])
}

pub fn is_common_kanji(s: &str, size_one: bool) -> bool {
  in_wchar_range(s, size_one, &[&COMMON_KANJI_BLOCKS])
}

pub fn is_rare_kanji(s: &str, size_one: bool) -> bool {
  in_wchar_range(s, size_one, &[&RARE_KANJI_BLOCKS])
}

pub fn is_kanji(s: &str, size_one: bool) -> bool {
  in_wchar_range(s, size_one, &[&COMMON_KANJI_BLOCKS, &RARE_KANJI_BLOCKS])
}

pub fn is_mb_symbol(s: &str, size_one: bool) -> bool {
  in_wchar_range(s, size_one, &[&SYMBOL_BLOCKS])
}

pub fn is_mb_letter(s: &str, size_one: bool) -> bool {
  in_wchar_range(s, size_one, &[&LETTER_BLOCKS])
}

/// Wide spaces are part of the punctuation block, but aren't accepted unless
/// `include_space` is set.
pub fn is_mb_punctuation(s: &str, include_space: bool, size_one: bool) -> bool {
  if s.starts_with(WIDE_SPACE) {
    include_space && (!size_one || s.len() == WIDE_SPACE.len())
  } else {
    in_wchar_range(s, size_one, &[&PUNCTUATION_BLOCKS])
  }
}

/// true if the first character is any recognized Japanese-text character
/// (includes wide spaces)
pub fn is_recognized_utf8(s: &str, size_one: bool) -> bool {
  in_wchar_range(s, size_one, ALL_RECOGNIZED)
}

const ALL_RECOGNIZED: &[&[UnicodeBlock]] = &[
  &HIRAGANA_BLOCKS,
  &KATAKANA_BLOCKS,
  &COMMON_KANJI_BLOCKS,
  &RARE_KANJI_BLOCKS,
  &PUNCTUATION_BLOCKS,
  &SYMBOL_BLOCKS,
  &LETTER_BLOCKS,
];

pub fn is_all_hiragana(s: &str) -> bool {
  in_wchar_range_all(s, &[&HIRAGANA_BLOCKS])
}

pub fn is_all_katakana(s: &str) -> bool {
  in_wchar_range_all(s, &[&KATAKANA_BLOCKS])
}

pub fn is_all_kana(s: &str) -> bool {
  in_wchar_range_all(s, &[&HIRAGANA_BLOCKS, &KATAKANA_BLOCKS])
}

pub fn is_all_common_kanji(s: &str) -> bool {
  in_wchar_range_all(s, &[&COMMON_KANJI_BLOCKS])
}

pub fn is_all_rare_kanji(s: &str) -> bool {
  in_wchar_range_all(s, &[&RARE_KANJI_BLOCKS])
}

pub fn is_all_kanji(s: &str) -> bool {
  in_wchar_range_all(s, &[&COMMON_KANJI_BLOCKS, &RARE_KANJI_BLOCKS])
}

pub fn is_all_mb_symbol(s: &str) -> bool {
  in_wchar_range_all(s, &[&SYMBOL_BLOCKS])
}

pub fn is_all_mb_letter(s: &str) -> bool {
  in_wchar_range_all(s, &[&LETTER_BLOCKS])
}

pub fn is_all_mb_punctuation(s: &str) -> bool {
  in_wchar_range_all(s, &[&PUNCTUATION_BLOCKS])
}

pub fn is_all_recognized_utf8(s: &str) -> bool {
  in_wchar_range_all(s, ALL_RECOGNIZED)
}
