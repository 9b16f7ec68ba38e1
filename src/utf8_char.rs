use crate::kana::Kana;
use crate::utf8::{self, BIT1, TWO_BITS};

/// Iterator over the logical characters of a UTF-8 byte string. A base
/// character followed by a variation selector or a combining voiced mark
/// (U+3099) / semi-voiced mark (U+309A) is yielded as one unit, with plain
/// Kana plus a combining mark resolved to the precomposed accented Kana when
/// one exists (so は + U+3099 becomes ば). Counters keep track of how many
/// invalid bytes, variation selectors and combining marks were seen.
#[derive(Clone)]
pub struct Utf8Char<'a> {
  data: &'a [u8],
  pos: usize,
  errors: u32,
  variants: u32,
  combining_marks: u32,
}

const VARIATION_SELECTOR_BYTES: usize = 3;

impl<'a> Utf8Char<'a> {
  pub fn new<S: AsRef<[u8]> + ?Sized>(data: &'a S) -> Utf8Char<'a> {
    Utf8Char { data: data.as_ref(), pos: 0, errors: 0, variants: 0, combining_marks: 0 }
  }

  /// true if `s` starts with a UTF-8 variation selector (U+FE00 - U+FE0F,
  /// i.e., bytes 0xef 0xb8 0x80 - 0xef 0xb8 0x8f)
  pub fn is_variation_selector<S: AsRef<[u8]>>(s: S) -> bool {
    let s = s.as_ref();
    s.len() >= 3 && s[0] == 0xef && s[1] == 0xb8 && (0x80..=0x8f).contains(&s[2])
  }

  /// true if `s` starts with a combining voiced or semi-voiced mark
  /// (U+3099 or U+309A, i.e., bytes 0xe3 0x82 0x99 or 0xe3 0x82 0x9a)
  pub fn is_combining_mark<S: AsRef<[u8]>>(s: S) -> bool {
    let s = s.as_ref();
    s.len() >= 3 && s[0] == 0xe3 && s[1] == 0x82 && (s[2] == 0x99 || s[2] == 0x9a)
  }

  /// Number of characters in `s`: with `only_mb` only multi-byte sequence
  /// starts are counted. Variation selectors and combining marks are part of
  /// the preceding character so they never add to the total.
  pub fn size<S: AsRef<[u8]>>(s: S, only_mb: bool) -> usize {
    let s = s.as_ref();
    let mut len = 0;
    let mut i = 0;
    while i < s.len() {
      if Utf8Char::is_combining_mark(&s[i..]) || Utf8Char::is_variation_selector(&s[i..]) {
        i += VARIATION_SELECTOR_BYTES;
      } else {
        let b = s[i];
        if b & TWO_BITS == TWO_BITS || !only_mb && b & TWO_BITS != BIT1 {
          len += 1;
        }
        i += 1;
      }
    }
    len
  }

  /// true if `s` is a single multi-byte character (2-4 bytes) followed by a
  /// variation selector (always 3 bytes)
  pub fn is_char_with_variation_selector<S: AsRef<[u8]>>(s: S) -> bool {
    let s = s.as_ref();
    s.len() > 4 && s.len() < 8 && Utf8Char::is_variation_selector(&s[s.len() - 3..])
  }

  pub fn without_variation_selector(s: &str) -> &str {
    if Utf8Char::is_char_with_variation_selector(s) {
      &s[..s.len() - 3]
    } else {
      s
    }
  }

  /// first multi-byte character of `s` including any variation selector that
  /// follows (empty if `s` doesn't start with a multi-byte sequence)
  pub fn get_first(s: &str) -> String {
    Utf8Char::new(s).next(true).unwrap_or_default()
  }

  pub fn reset(&mut self) {
    self.pos = 0;
    self.errors = 0;
    self.variants = 0;
    self.combining_marks = 0;
  }

  /// Yield the next character, or `None` at the end of the data. With
  /// `only_mb` single-byte characters are skipped silently.
  pub fn next(&mut self, only_mb: bool) -> Option<String> {
    while self.pos < self.data.len() {
      let bytes = &self.data[self.pos..];
      let (code, used) = utf8::decode_code(bytes);
      match code {
        Err(_) => {
          self.errors += 1;
          self.pos += 1;
        }
        Ok(code) => {
          self.pos += used;
          if utf8::is_single_byte_char(code) {
            if only_mb {
              continue;
            }
            return Some(utf8::to_utf8(code));
          }
          let result = utf8::to_utf8(code);
          let rest = &self.data[self.pos..];
          if Utf8Char::is_variation_selector(rest) {
            self.variants += 1;
            self.pos += VARIATION_SELECTOR_BYTES;
            return Some(result + std::str::from_utf8(&rest[..3]).unwrap());
          }
          if Utf8Char::is_combining_mark(rest) {
            self.combining_marks += 1;
            let accented = if rest[2] == 0x99 {
              Kana::find_dakuten(&result)
            } else {
              Kana::find_han_dakuten(&result)
            };
            self.pos += VARIATION_SELECTOR_BYTES;
            return Some(match accented {
              Some(a) => a.to_string(),
              None => result + std::str::from_utf8(&rest[..3]).unwrap(),
            });
          }
          return Some(result);
        }
      }
    }
    None
  }

  /// Same as `next`, but without updating any state.
  pub fn peek(&self, only_mb: bool) -> Option<String> {
    self.clone().next(only_mb)
  }

  pub fn errors(&self) -> u32 {
    self.errors
  }

  pub fn variants(&self) -> u32 {
    self.variants
  }

  pub fn combining_marks(&self) -> u32 {
    self.combining_marks
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn all(s: &str, only_mb: bool) -> Vec<String> {
    let mut c = Utf8Char::new(s);
    let mut result = vec![];
    while let Some(g) = c.next(only_mb) {
      result.push(g);
    }
    result
  }

  #[test]
  fn test_size() {
    assert_eq!(Utf8Char::size("abc", true), 0);
    assert_eq!(Utf8Char::size("abc", false), 3);
    assert_eq!(Utf8Char::size("大blue空", true), 2);
    assert_eq!(Utf8Char::size("大blue空", false), 6);
    // variation selectors and combining marks don't add to the size
    assert_eq!(Utf8Char::size("侮\u{fe00}", true), 1);
    assert_eq!(Utf8Char::size("は\u{3099}", true), 1);
  }

  #[test]
  fn test_next_mb_only() {
    assert_eq!(all("big空higher空model", true), vec!["空", "空"]);
    assert_eq!(all("abc", true), Vec::<String>::new());
  }

  #[test]
  fn test_next_including_single_byte() {
    assert_eq!(all("a猫b", false), vec!["a", "猫", "b"]);
  }

  #[test]
  fn test_variation_selector_stays_attached() {
    let s = "侮\u{fe00}犬";
    let mut c = Utf8Char::new(s);
    assert_eq!(c.next(true).unwrap(), "侮\u{fe00}");
    assert_eq!(c.variants(), 1);
    assert_eq!(c.next(true).unwrap(), "犬");
    assert_eq!(c.next(true), None);
  }

  #[test]
  fn test_combining_marks_resolve_to_accented_kana() {
    let mut c = Utf8Char::new("は\u{3099}は\u{309a}");
    assert_eq!(c.next(true).unwrap(), "ば");
    assert_eq!(c.next(true).unwrap(), "ぱ");
    assert_eq!(c.combining_marks(), 2);
    assert_eq!(c.errors(), 0);
    // a mark after a character with no accented version stays as-is
    let mut c = Utf8Char::new("犬\u{3099}");
    assert_eq!(c.next(true).unwrap(), "犬\u{3099}");
    assert_eq!(c.combining_marks(), 1);
  }

  #[test]
  fn test_errors_counted_and_skipped() {
    let bytes: Vec<u8> = vec![b'a', 0x80, 0xe7, 0x8a, 0xac]; // a, stray, 犬
    let mut c = Utf8Char::new(&bytes[..]);
    assert_eq!(c.next(true).unwrap(), "犬");
    assert_eq!(c.errors(), 1);
  }

  #[test]
  fn test_reset() {
    let mut c = Utf8Char::new("ば\u{3099}"); // precomposed plus redundant mark
    assert!(c.next(true).is_some());
    assert_eq!(c.combining_marks(), 1);
    c.reset();
    assert_eq!(c.combining_marks(), 0);
    assert_eq!(c.next(true).unwrap(), "ば\u{3099}");
  }

  #[test]
  fn test_peek_does_not_advance() {
    let mut c = Utf8Char::new("空ა");
    assert_eq!(c.peek(true).unwrap(), "空");
    assert_eq!(c.next(true).unwrap(), "空");
  }

  #[test]
  fn test_variation_selector_helpers() {
    assert!(Utf8Char::is_variation_selector("\u{fe00}"));
    assert!(Utf8Char::is_variation_selector("\u{fe0f}"));
    assert!(!Utf8Char::is_variation_selector("あ"));
    assert!(Utf8Char::is_combining_mark("\u{3099}"));
    assert!(Utf8Char::is_combining_mark("\u{309a}"));
    assert!(!Utf8Char::is_combining_mark("\u{fe00}"));
    assert!(Utf8Char::is_char_with_variation_selector("侮\u{fe00}"));
    assert!(!Utf8Char::is_char_with_variation_selector("侮"));
    assert_eq!(Utf8Char::without_variation_selector("侮\u{fe00}"), "侮");
    assert_eq!(Utf8Char::without_variation_selector("侮"), "侮");
    assert_eq!(Utf8Char::get_first("大blue空"), "大");
    assert_eq!(Utf8Char::get_first("blue"), "");
  }
}
