use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use super::char_type::{CharType, ConvertFlags};
use super::table::{find_iteration_mark, table, Kana, PROLONG_MARK, ROMAJI_MAX_SIZE};
use crate::utf8::is_single_byte;
use crate::utf8_char::Utf8Char;

const APOSTROPHE: char = '\'';
const DASH: char = '-';

// narrow delimiters (skipping alphanumerics, apostrophe and dash) and their
// wide counterparts, in Ascii order
const DELIMITERS: &[(char, &str)] = &[
  (' ', "　"),
  ('!', "！"),
  ('"', "”"),
  ('#', "＃"),
  ('$', "＄"),
  ('%', "％"),
  ('&', "＆"),
  ('(', "（"),
  (')', "）"),
  ('*', "＊"),
  ('+', "＋"),
  (',', "、"),
  ('.', "。"),
  ('/', "・"),
  (':', "："),
  (';', "；"),
  ('<', "＜"),
  ('=', "＝"),
  ('>', "＞"),
  ('?', "？"),
  ('@', "＠"),
  ('[', "「"),
  ('\\', "￥"),
  (']', "」"),
  ('^', "＾"),
  ('_', "＿"),
  ('`', "｀"),
  ('{', "『"),
  ('|', "｜"),
  ('}', "』"),
  ('~', "〜"),
];

struct Tokens {
  repeating_consonants: HashSet<char>,
  after_n_hiragana: HashSet<&'static str>,
  after_n_katakana: HashSet<&'static str>,
  small_hiragana: HashSet<&'static str>,
  small_katakana: HashSet<&'static str>,
  narrow_delims: HashMap<char, &'static str>,
  wide_delims: HashMap<&'static str, char>,
}

impl Tokens {
  fn after_n(&self, t: CharType) -> &HashSet<&'static str> {
    if t == CharType::Hiragana {
      &self.after_n_hiragana
    } else {
      &self.after_n_katakana
    }
  }

  fn small_kana(&self, t: CharType) -> &HashSet<&'static str> {
    if t == CharType::Hiragana {
      &self.small_hiragana
    } else {
      &self.small_katakana
    }
  }

  fn is_narrow_delim(&self, c: char) -> bool {
    c == APOSTROPHE || c == DASH || self.narrow_delims.contains_key(&c)
  }
}

fn build_tokens() -> Tokens {
  let mut t = Tokens {
    repeating_consonants: HashSet::new(),
    after_n_hiragana: HashSet::new(),
    after_n_katakana: HashSet::new(),
    small_hiragana: HashSet::new(),
    small_katakana: HashSet::new(),
    narrow_delims: HashMap::new(),
    wide_delims: HashMap::new(),
  };
  for k in table().entries() {
    let r = k.romaji();
    if !r.starts_with('n') {
      if r.len() == 1 || r == "ya" || r == "yu" || r == "yo" {
        t.after_n_hiragana.insert(k.hiragana());
        t.after_n_katakana.insert(k.katakana());
      } else if r.starts_with('l') {
        if k != Kana::small_tsu() && !r.starts_with("lk") {
          t.small_hiragana.insert(k.hiragana());
          t.small_katakana.insert(k.katakana());
        }
      } else {
        t.repeating_consonants.insert(r.chars().next().unwrap());
      }
    }
  }
  for &(narrow, wide) in DELIMITERS {
    t.narrow_delims.insert(narrow, wide);
    t.wide_delims.insert(wide, narrow);
  }
  t
}

lazy_static! {
  static ref TOKENS: Tokens = build_tokens();
}

fn tokens() -> &'static Tokens {
  &TOKENS
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum State {
  New,
  SmallTsu,
  Done,
}

/// Converts a string of one script type into the configured target script.
/// The converter itself holds no per-call state so one instance can be
/// reused for any number of conversions.
pub struct Converter {
  target: CharType,
  flags: ConvertFlags,
}

impl Default for Converter {
  fn default() -> Converter {
    Converter::new(CharType::Hiragana, ConvertFlags::NONE)
  }
}

impl Converter {
  pub fn new(target: CharType, flags: ConvertFlags) -> Converter {
    Converter { target, flags }
  }

  pub fn target(&self) -> CharType {
    self.target
  }

  pub fn set_target(&mut self, target: CharType) {
    self.target = target;
  }

  pub fn flags(&self) -> ConvertFlags {
    self.flags
  }

  pub fn set_flags(&mut self, flags: ConvertFlags) {
    self.flags = flags;
  }

  pub fn flag_string(&self) -> String {
    if self.flags == ConvertFlags::NONE {
      return String::from("None");
    }
    let mut result = String::new();
    let all = [
      (ConvertFlags::HEPBURN, "Hepburn"),
      (ConvertFlags::KUNREI, "Kunrei"),
      (ConvertFlags::NO_PROLONG_MARK, "NoProlongMark"),
      (ConvertFlags::REMOVE_SPACES, "RemoveSpaces"),
    ];
    for &(flag, name) in &all {
      if self.flags.has(flag) {
        if !result.is_empty() {
          result.push('|');
        }
        result += name;
      }
    }
    result
  }

  /// convert `input` of any (non-target) script into the target script
  pub fn convert(&self, input: &str) -> String {
    let mut result = input.to_string();
    for &t in CharType::ALL {
      if t != self.target {
        result = self.convert_from(t, &result);
      }
    }
    result
  }

  /// convert `input` treating it as `source` script
  pub fn convert_from(&self, source: CharType, input: &str) -> String {
    if source == self.target {
      return input.to_string();
    }
    match source {
      CharType::Hiragana | CharType::Katakana => self.from_kana(input, source),
      // break Romaji input into words separated by narrow delimiters and
      // process each word (this helps deal with words ending in 'n')
      CharType::Romaji => self.from_romaji(input),
    }
  }

  fn romaji_target(&self) -> bool {
    self.target == CharType::Romaji
  }

  // Kana source

  fn from_kana(&self, input: &str, source: CharType) -> String {
    let mut state = State::New;
    let mut result = String::new();
    let mut group = String::new();
    let mut prev_kana: Option<&'static Kana> = None;
    let mut chars = Utf8Char::new(input);
    while let Some(kana) = chars.next(false) {
      // prolong and iteration marks come first since they aren't in the map
      if kana == PROLONG_MARK {
        // prolong is Katakana, but can appear in (non-standard) Hiragana
        self.flush(&mut result, &mut group, source, &mut prev_kana, true, &kana, false);
        state = State::New;
      } else if let Some(repeat) = find_iteration_mark(source, &kana) {
        self.flush(&mut result, &mut group, source, &mut prev_kana, false, &kana, false);
        state = State::New;
        result += &repeat.get(self.target, self.flags, prev_kana);
      } else if Kana::find(source, &kana).is_some() {
        if Kana::small_tsu().contains_kana(&kana) {
          // a small tsu always processes the stored group
          self.flush(&mut result, &mut group, source, &mut prev_kana, false, &kana, true);
          state = State::SmallTsu;
        } else if Kana::n().contains_kana(&kana) {
          // mark the new group as done so the next kana ends it (and can
          // trigger the romaji apostrophe)
          self.flush(&mut result, &mut group, source, &mut prev_kana, false, &kana, true);
          state = State::Done;
        } else if state != State::Done && tokens().small_kana(source).contains(kana.as_str()) {
          // a small letter finishes the digraph, but keep collecting in case
          // a prolong mark follows
          state = State::Done;
          group += &kana;
        } else if state != State::Done
          && group.len() <= if state == State::SmallTsu { 3 } else { 0 }
        {
          // a normal letter can start a group or follow a small tsu
          group += &kana;
        } else {
          self.flush(&mut result, &mut group, source, &mut prev_kana, false, &kana, true);
          state = State::New;
        }
      } else {
        // not kana: flush the group and pass the character through (romaji
        // targets translate wide delimiters to their narrow versions)
        self.flush(&mut result, &mut group, source, &mut prev_kana, false, &kana, false);
        state = State::New;
        if self.romaji_target() {
          if let Some(&narrow) = tokens().wide_delims.get(kana.as_str()) {
            result.push(narrow);
            continue;
          }
        }
        result += &kana;
      }
    }
    result + &self.process_kana(&group, source, &mut prev_kana, false)
  }

  #[allow(clippy::too_many_arguments)]
  fn flush(
    &self, result: &mut String, group: &mut String, source: CharType,
    prev_kana: &mut Option<&'static Kana>, prolong: bool, kana: &str, new_group: bool,
  ) {
    *result += &self.process_kana(group, source, prev_kana, prolong);
    if self.romaji_target()
      && Kana::n().contains_kana(group)
      && tokens().after_n(source).contains(kana)
    {
      result.push(APOSTROPHE);
    }
    *group = if new_group { kana.to_string() } else { String::new() };
  }

  fn process_kana(
    &self, group: &str, source: CharType, prev_kana: &mut Option<&'static Kana>, prolong: bool,
  ) -> String {
    if !group.is_empty() {
      *prev_kana = None;
      if let Some(k) = Kana::find(source, group) {
        return self.process_kana_macron(prolong, prev_kana, k, false);
      }
      // an unknown group gets split into first kana plus remainder
      if group.len() > 3 {
        let first_kana = &group[..3];
        if let Some(k) = Kana::find(source, &group[3..]) {
          let sokuon = self.romaji_target()
            && Kana::small_tsu().contains_kana(first_kana)
            && tokens().repeating_consonants.contains(&k.romaji().chars().next().unwrap());
          if sokuon {
            return self.process_kana_macron(prolong, prev_kana, k, true);
          }
          return self.process_kana(first_kana, source, prev_kana, false)
            + &self.process_kana_macron(prolong, prev_kana, k, false);
        }
        return self.process_kana(first_kana, source, prev_kana, false) + &group[3..];
      }
    } else if prolong {
      // a prolong mark at the start of a group is passed through unchanged
      return PROLONG_MARK.to_string();
    }
    group.to_string()
  }

  fn process_kana_macron(
    &self, prolong: bool, prev_kana: &mut Option<&'static Kana>, kana: &'static Kana,
    sokuon: bool,
  ) -> String {
    let result = if sokuon {
      kana.get_sokuon_romaji(self.flags)
    } else {
      kana.get(self.target, self.flags).to_string()
    };
    if prolong {
      if !self.romaji_target() {
        return result + PROLONG_MARK;
      }
      let macron = match result.chars().last() {
        Some('a') => "ā",
        Some('i') => "ī",
        Some('u') => "ū",
        Some('e') => "ē",
        Some('o') => "ō",
        _ => return result + PROLONG_MARK, // prolong after a consonant
      };
      let mut result = result;
      result.pop();
      return result + macron;
    }
    *prev_kana = Some(kana);
    result
  }

  // Romaji source

  fn from_romaji(&self, input: &str) -> String {
    let keep_spaces = !self.flags.has(ConvertFlags::REMOVE_SPACES);
    let mut result = String::new();
    let mut word = String::new();
    for c in input.chars() {
      if tokens().is_narrow_delim(c) {
        result += &self.to_kana(&word);
        word.clear();
        // apostrophe and dash are consumed with no output
        if c != APOSTROPHE && c != DASH && (keep_spaces || c != ' ') {
          result += tokens().narrow_delims[&c];
        }
      } else {
        word.push(c);
      }
    }
    result + &self.to_kana(&word)
  }

  fn to_kana(&self, word: &str) -> String {
    let mut result = String::new();
    let mut letters = String::new();
    let mut chars = Utf8Char::new(word);
    while let Some(letter) = chars.next(false) {
      if is_single_byte(&letter, true) {
        if !letter.eq_ignore_ascii_case("n") {
          letters += &letter;
          self.process_romaji(&mut letters, &mut result);
        } else if letters.is_empty() {
          letters += &letter;
        } else if letters.eq_ignore_ascii_case("n") {
          // two n's in a row: output one, but keep waiting
          result += self.get_n();
        } else {
          // partial romaji followed by n: output the partial group unconverted
          result += &letters;
          letters = letter;
        }
      } else if !self.process_romaji_macron(&letter, &mut letters, &mut result) {
        self.process_romaji(&mut letters, &mut result);
        result += &letter;
      }
    }
    while !letters.is_empty() {
      if letters.eq_ignore_ascii_case("n") {
        result += self.get_n(); // the normal case for a word ending in 'n'
        letters.clear();
      } else {
        result.push(letters.chars().next().unwrap()); // unprocessed letter
        letters = letters[1..].to_string();
        self.process_romaji(&mut letters, &mut result);
      }
    }
    result
  }

  fn process_romaji(&self, letters: &mut String, result: &mut String) {
    let lower = letters.to_ascii_lowercase();
    if let Some(k) = Kana::find(CharType::Romaji, &lower) {
      *result += k.get(self.target, self.flags);
      letters.clear();
    } else if letters.len() == ROMAJI_MAX_SIZE {
      // no valid romaji is longer than 3 letters so emit a correction: a
      // leading 'n' becomes ん, a repeated (or 'tc') repeatable consonant
      // becomes small tsu, anything else passes through unconverted
      let bytes = lower.as_bytes();
      if bytes[0] == b'n' {
        *result += self.get_n();
      } else if (bytes[0] == bytes[1] || bytes[0] == b't' && bytes[1] == b'c')
        && tokens().repeating_consonants.contains(&char::from(bytes[0]))
      {
        *result += self.get_small_tsu();
      } else {
        result.push(letters.chars().next().unwrap());
      }
      *letters = letters[1..].to_string();
      self.process_romaji(letters, result);
    }
  }

  fn process_romaji_macron(
    &self, letter: &str, letters: &mut String, result: &mut String,
  ) -> bool {
    // the NoProlongMark vowel for a long 'o' is う as in とうきょう (standard
    // for modern Hepburn even though some words actually use おお)
    let (plain, vowel_kana) = match letter {
      "ā" => ('a', "あ"),
      "ī" => ('i', "い"),
      "ū" => ('u', "う"),
      "ē" => ('e', "え"),
      "ō" => ('o', "う"),
      _ => return false,
    };
    letters.push(plain);
    self.process_romaji(letters, result);
    if letters.is_empty() {
      *result +=
        if self.target == CharType::Hiragana && self.flags.has(ConvertFlags::NO_PROLONG_MARK) {
          vowel_kana
        } else {
          PROLONG_MARK
        };
    } else {
      // a bad romaji group followed by a macron (like 'vyī'): output the
      // group unconverted and treat the macron as a plain vowel
      letters.pop();
      *result += letters;
      *letters = plain.to_string();
      self.process_romaji(letters, result);
    }
    true
  }

  fn get_n(&self) -> &'static str {
    Kana::n().get(self.target, self.flags)
  }

  fn get_small_tsu(&self) -> &'static str {
    Kana::small_tsu().get(self.target, self.flags)
  }
}
