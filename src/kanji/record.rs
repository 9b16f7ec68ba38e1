use std::fmt;

use super::enums::{Grade, JinmeiReason, JlptLevel, KanjiType, KenteiKyu};
use super::morohashi::MorohashiId;
use super::pinyin::Pinyin;
use crate::utf8_char::Utf8Char;

/// Handle to a Kanji stored in the aggregator's arena. Handles stay valid
/// for the life of the aggregator (nothing is ever removed).
pub type KanjiIndex = usize;

pub type Frequency = u16;
pub type NelsonId = u16;
pub type Year = u16;

/// Stroke count plus the count of a well-known variant when one exists.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Strokes {
  value: u8,
  variant: Option<u8>,
}

impl Strokes {
  pub fn new(value: u8) -> Strokes {
    Strokes { value, variant: None }
  }

  pub fn with_variant(value: u8, variant: Option<u8>) -> Strokes {
    Strokes { value, variant }
  }

  pub fn value(&self) -> u8 {
    self.value
  }

  pub fn variant(&self) -> Option<u8> {
    self.variant
  }

  pub fn has_variant(&self) -> bool {
    self.variant.is_some()
  }
}

impl fmt::Display for Strokes {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.value)
  }
}

/// Per-type payload of a Kanji record (the fields only one type populates).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KanjiKind {
  /// one of the 2,136 official Jouyou Kanji (all have a school grade)
  Jouyou { number: u16, grade: Grade, year: Option<Year> },
  /// officially allowed in names, with the reason it was added
  Jinmei { number: u16, year: Option<Year>, reason: JinmeiReason },
  /// rare Kanji loaded from the extra list
  Extra { number: u16 },
  /// officially recognized variant of a Jouyou or Jinmei Kanji
  LinkedJinmei { link: KanjiIndex },
  /// old form of a Jouyou Kanji that isn't a LinkedJinmei
  LinkedOld { link: KanjiIndex },
  /// in the top frequency list, but not in any of the official lists
  Frequency,
  /// only in a Kentei list
  Kentei,
  /// the remaining Unicode data entries
  Ucd,
}

/// A catalogued Kanji. Common attributes live here directly and `kind`
/// carries the per-type extras. The name is globally unique in the catalog;
/// a name carrying a variation selector also has a compatibility name (the
/// precomposed single code point) registered with the aggregator.
#[derive(Clone, Debug)]
pub struct Kanji {
  name: String,
  compatibility_name: Option<String>,
  radical: u8,
  strokes: Strokes,
  pinyin: Pinyin,
  morohashi: Option<MorohashiId>,
  nelson_ids: Vec<NelsonId>,
  level: Option<JlptLevel>,
  kyu: Option<KenteiKyu>,
  frequency: Option<Frequency>,
  meaning: String,
  reading: String,
  old_names: Vec<String>,
  new_name: Option<String>,
  linked_readings: bool,
  kind: KanjiKind,
}

/// All the common fields needed to build a Kanji (the loaders fill this in
/// from the various source files plus Ucd lookups).
pub struct KanjiFields {
  pub name: String,
  pub compatibility_name: Option<String>,
  pub radical: u8,
  pub strokes: Strokes,
  pub pinyin: Pinyin,
  pub morohashi: Option<MorohashiId>,
  pub nelson_ids: Vec<NelsonId>,
  pub level: Option<JlptLevel>,
  pub kyu: Option<KenteiKyu>,
  pub frequency: Option<Frequency>,
  pub meaning: String,
  pub reading: String,
  pub old_names: Vec<String>,
  pub new_name: Option<String>,
  pub linked_readings: bool,
}

impl KanjiFields {
  pub fn new(name: &str, radical: u8, strokes: Strokes) -> KanjiFields {
    KanjiFields {
      name: name.to_string(),
      compatibility_name: None,
      radical,
      strokes,
      pinyin: Pinyin::empty(),
      morohashi: None,
      nelson_ids: vec![],
      level: None,
      kyu: None,
      frequency: None,
      meaning: String::new(),
      reading: String::new(),
      old_names: vec![],
      new_name: None,
      linked_readings: false,
    }
  }
}

impl Kanji {
  pub fn new(fields: KanjiFields, kind: KanjiKind) -> Kanji {
    Kanji {
      name: fields.name,
      compatibility_name: fields.compatibility_name,
      radical: fields.radical,
      strokes: fields.strokes,
      pinyin: fields.pinyin,
      morohashi: fields.morohashi,
      nelson_ids: fields.nelson_ids,
      level: fields.level,
      kyu: fields.kyu,
      frequency: fields.frequency,
      meaning: fields.meaning,
      reading: fields.reading,
      old_names: fields.old_names,
      new_name: fields.new_name,
      linked_readings: fields.linked_readings,
      kind,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// true if the name carries a variation selector
  pub fn variant(&self) -> bool {
    Utf8Char::is_char_with_variation_selector(&self.name)
  }

  /// the name without any variation selector
  pub fn non_variant_name(&self) -> &str {
    Utf8Char::without_variation_selector(&self.name)
  }

  /// the single code point equivalent of a variant name (or the name itself)
  pub fn compatibility_name(&self) -> &str {
    self.compatibility_name.as_deref().unwrap_or(&self.name)
  }

  pub fn kind(&self) -> &KanjiKind {
    &self.kind
  }

  pub fn kanji_type(&self) -> KanjiType {
    match self.kind {
      KanjiKind::Jouyou { .. } => KanjiType::Jouyou,
      KanjiKind::Jinmei { .. } => KanjiType::Jinmei,
      KanjiKind::Extra { .. } => KanjiType::Extra,
      KanjiKind::LinkedJinmei { .. } => KanjiType::LinkedJinmei,
      KanjiKind::LinkedOld { .. } => KanjiType::LinkedOld,
      KanjiKind::Frequency => KanjiType::Frequency,
      KanjiKind::Kentei => KanjiType::Kentei,
      KanjiKind::Ucd => KanjiType::Ucd,
    }
  }

  pub fn is(&self, t: KanjiType) -> bool {
    self.kanji_type() == t
  }

  pub fn radical(&self) -> u8 {
    self.radical
  }

  pub fn strokes(&self) -> Strokes {
    self.strokes
  }

  pub fn pinyin(&self) -> Pinyin {
    self.pinyin
  }

  pub fn morohashi(&self) -> Option<MorohashiId> {
    self.morohashi
  }

  pub fn nelson_ids(&self) -> &[NelsonId] {
    &self.nelson_ids
  }

  pub fn level(&self) -> Option<JlptLevel> {
    self.level
  }

  pub fn kyu(&self) -> Option<KenteiKyu> {
    self.kyu
  }

  pub fn frequency(&self) -> Option<Frequency> {
    self.frequency
  }

  /// frequency rank, or `max` when this Kanji isn't in the top list
  pub fn frequency_or(&self, max: Frequency) -> Frequency {
    self.frequency.unwrap_or(max)
  }

  pub fn meaning(&self) -> &str {
    &self.meaning
  }

  pub fn reading(&self) -> &str {
    &self.reading
  }

  pub fn grade(&self) -> Option<Grade> {
    match self.kind {
      KanjiKind::Jouyou { grade, .. } => Some(grade),
      _ => None,
    }
  }

  pub fn reason(&self) -> Option<JinmeiReason> {
    match self.kind {
      KanjiKind::Jinmei { reason, .. } => Some(reason),
      _ => None,
    }
  }

  pub fn year(&self) -> Option<Year> {
    match self.kind {
      KanjiKind::Jouyou { year, .. } | KanjiKind::Jinmei { year, .. } => year,
      _ => None,
    }
  }

  pub fn number(&self) -> Option<u16> {
    match self.kind {
      KanjiKind::Jouyou { number, .. }
      | KanjiKind::Jinmei { number, .. }
      | KanjiKind::Extra { number } => Some(number),
      _ => None,
    }
  }

  /// link to the official Kanji for the two linked types
  pub fn link(&self) -> Option<KanjiIndex> {
    match self.kind {
      KanjiKind::LinkedJinmei { link } | KanjiKind::LinkedOld { link } => Some(link),
      _ => None,
    }
  }

  /// true if the readings came in via a Unicode data link
  pub fn linked_readings(&self) -> bool {
    self.linked_readings
  }

  pub fn old_names(&self) -> &[String] {
    &self.old_names
  }

  pub fn new_name(&self) -> Option<&str> {
    self.new_name.as_deref()
  }

  pub fn has_grade(&self) -> bool {
    self.grade().is_some()
  }

  pub fn has_level(&self) -> bool {
    self.level.is_some()
  }

  pub fn has_kyu(&self) -> bool {
    self.kyu.is_some()
  }

  pub fn has_meaning(&self) -> bool {
    !self.meaning.is_empty()
  }

  pub fn has_reading(&self) -> bool {
    !self.reading.is_empty()
  }

  pub fn has_nelson_ids(&self) -> bool {
    !self.nelson_ids.is_empty()
  }

  /// Suffix used by `qualified_name`, from most to least official:
  /// `.` Jouyou, `'` JLPT, `"` top frequency, `^` Jinmei, `~` Linked Jinmei,
  /// `%` Linked Old, `+` Extra, `@` Kentei (below K1), `#` K1 Kentei, `*` Ucd
  pub fn qualified_suffix(&self) -> char {
    match self.kanji_type() {
      KanjiType::Jouyou => '.',
      _ if self.has_level() => '\'',
      _ if self.frequency.is_some() => '"',
      KanjiType::Jinmei => '^',
      KanjiType::LinkedJinmei => '~',
      KanjiType::LinkedOld => '%',
      KanjiType::Extra => '+',
      KanjiType::Kentei => {
        if self.kyu == Some(KenteiKyu::K1) {
          '#'
        } else {
          '@'
        }
      }
      _ => '*',
    }
  }

  /// name plus a single-character suffix showing how official the Kanji is
  pub fn qualified_name(&self) -> String {
    let mut result = self.name.clone();
    result.push(self.qualified_suffix());
    result
  }

  fn qualified_name_rank(&self) -> usize {
    const SUFFIXES: [char; 10] = ['.', '\'', '"', '^', '~', '%', '+', '@', '#', '*'];
    let suffix = self.qualified_suffix();
    SUFFIXES.iter().position(|&s| s == suffix).unwrap()
  }

  /// Order corresponding to `qualified_name` output: Jouyou before JLPT
  /// before frequency and so on, with ties broken by `cmp_strokes`.
  pub fn cmp_qualified_name(&self, other: &Kanji) -> std::cmp::Ordering {
    self
      .qualified_name_rank()
      .cmp(&other.qualified_name_rank())
      .then_with(|| self.cmp_strokes(other))
  }

  /// Order by stroke count (smallest first), then frequency, then the
  /// compatibility name in code point order.
  pub fn cmp_strokes(&self, other: &Kanji) -> std::cmp::Ordering {
    self
      .strokes
      .value()
      .cmp(&other.strokes.value())
      .then_with(|| {
        self
          .frequency_or(Frequency::max_value())
          .cmp(&other.frequency_or(Frequency::max_value()))
      })
      .then_with(|| self.compatibility_name().cmp(other.compatibility_name()))
  }

  /// legend for the `qualified_name` suffixes
  pub const QUALIFIED_NAME_LEGEND: &'static str =
    ".=常用 '=JLPT \"=Freq ^=人名用 ~=LinkJ %=LinkO +=Extra @=検定 #=1級 *=Ucd";
}

#[cfg(test)]
mod tests {
  use super::*;

  fn base(name: &str) -> KanjiFields {
    KanjiFields::new(name, 1, Strokes::new(4))
  }

  #[test]
  fn test_common_fields() {
    let mut fields = base("亘");
    fields.level = Some(JlptLevel::N1);
    fields.kyu = Some(KenteiKyu::KJ1);
    fields.frequency = Some(1728);
    fields.reading = String::from("コウ、カン、わた-る、もと-める");
    fields.old_names = vec![String::from("亙")];
    let k = Kanji::new(
      fields,
      KanjiKind::Jinmei { number: 8, year: Some(1951), reason: JinmeiReason::Names },
    );
    assert_eq!(k.name(), "亘");
    assert_eq!(k.kanji_type(), KanjiType::Jinmei);
    assert!(k.is(KanjiType::Jinmei));
    assert!(!k.is(KanjiType::Jouyou));
    assert!(!k.has_grade());
    assert_eq!(k.level(), Some(JlptLevel::N1));
    assert_eq!(k.frequency(), Some(1728));
    assert_eq!(k.frequency_or(9999), 1728);
    assert_eq!(k.kyu(), Some(KenteiKyu::KJ1));
    assert_eq!(k.old_names(), &[String::from("亙")]);
    assert_eq!(k.reason(), Some(JinmeiReason::Names));
    assert_eq!(k.year(), Some(1951));
    assert_eq!(k.number(), Some(8));
    assert_eq!(k.qualified_name(), "亘'"); // Jinmei in JLPT gets the JLPT suffix
  }

  #[test]
  fn test_jouyou() {
    let mut fields = base("一");
    fields.level = Some(JlptLevel::N5);
    fields.frequency = Some(2);
    let k = Kanji::new(fields, KanjiKind::Jouyou { number: 1, grade: Grade::G1, year: None });
    assert_eq!(k.grade(), Some(Grade::G1));
    assert!(k.has_grade());
    assert_eq!(k.qualified_name(), "一."); // Jouyou beats JLPT
  }

  #[test]
  fn test_extra_suffix_beats_kentei_kyu() {
    let mut fields = base("霙");
    fields.kyu = Some(KenteiKyu::K1);
    let k = Kanji::new(fields, KanjiKind::Extra { number: 1 });
    assert_eq!(k.qualified_name(), "霙+");
    assert_eq!(k.frequency_or(9999), 9999);
  }

  #[test]
  fn test_kentei_suffixes() {
    let mut fields = base("牙");
    fields.kyu = Some(KenteiKyu::K1);
    let k1 = Kanji::new(fields, KanjiKind::Kentei);
    assert_eq!(k1.qualified_suffix(), '#');
    let mut fields = base("兄");
    fields.kyu = Some(KenteiKyu::K9);
    let k9 = Kanji::new(fields, KanjiKind::Kentei);
    assert_eq!(k9.qualified_suffix(), '@');
  }

  #[test]
  fn test_variant_names() {
    let mut fields = base("免\u{fe00}");
    fields.compatibility_name = Some(String::from("勉"));
    let k = Kanji::new(fields, KanjiKind::Ucd);
    assert!(k.variant());
    assert_eq!(k.non_variant_name(), "免");
    assert_eq!(k.compatibility_name(), "勉");
    assert_eq!(k.qualified_suffix(), '*');

    let k = Kanji::new(base("免"), KanjiKind::Ucd);
    assert!(!k.variant());
    assert_eq!(k.compatibility_name(), "免");
  }

  #[test]
  fn test_links() {
    let k = Kanji::new(base("亙"), KanjiKind::LinkedJinmei { link: 7 });
    assert_eq!(k.link(), Some(7));
    assert_eq!(k.qualified_suffix(), '~');
    let k = Kanji::new(base("辨"), KanjiKind::LinkedOld { link: 3 });
    assert_eq!(k.link(), Some(3));
    assert_eq!(k.qualified_suffix(), '%');
    assert_eq!(Kanji::new(base("一"), KanjiKind::Ucd).link(), None);
  }

  #[test]
  fn test_ordering() {
    use std::cmp::Ordering;
    let mut jouyou = base("一");
    jouyou.frequency = Some(2);
    let jouyou = Kanji::new(jouyou, KanjiKind::Jouyou { number: 1, grade: Grade::G1, year: None });
    let mut jinmei = base("云");
    jinmei.kyu = Some(KenteiKyu::KJ1);
    let jinmei = Kanji::new(
      jinmei,
      KanjiKind::Jinmei { number: 7, year: Some(2004), reason: JinmeiReason::Print },
    );
    assert_eq!(jouyou.cmp_qualified_name(&jinmei), Ordering::Less);
    assert_eq!(jinmei.cmp_qualified_name(&jouyou), Ordering::Greater);
    assert_eq!(jouyou.cmp_qualified_name(&jouyou), Ordering::Equal);

    let mut thin = base("二");
    thin.frequency = Some(9);
    let thin = Kanji::new(thin, KanjiKind::Ucd);
    let mut thick = KanjiFields::new("霙", 1, Strokes::new(16));
    thick.frequency = Some(2);
    let thick = Kanji::new(thick, KanjiKind::Ucd);
    // fewer strokes wins even with a worse frequency
    assert_eq!(thin.cmp_strokes(&thick), Ordering::Less);
    let mut same_strokes = KanjiFields::new("雲", 1, Strokes::new(16));
    same_strokes.frequency = Some(1);
    let same_strokes = Kanji::new(same_strokes, KanjiKind::Ucd);
    assert_eq!(same_strokes.cmp_strokes(&thick), Ordering::Less);
  }

  #[test]
  fn test_strokes() {
    let s = Strokes::new(16);
    assert_eq!(s.value(), 16);
    assert!(!s.has_variant());
    assert_eq!(s.to_string(), "16");
    let v = Strokes::with_variant(33, Some(32));
    assert_eq!(v.variant(), Some(32));
    assert!(v.has_variant());
  }
}
