use fnv::FnvHashMap;
use lazy_static::lazy_static;

use super::char_type::{CharType, ConvertFlags};
use crate::unicode_block::{is_all_hiragana, is_all_katakana};
use crate::utf8::is_all_single_byte;

/// The prolong mark is officially in the Katakana block, but it can also
/// occasionally appear in non-standard Hiragana like らーめん.
pub const PROLONG_MARK: &str = "ー";

/// all monograph Kana are 3 bytes of UTF-8 (digraphs are 6)
pub const ONE_KANA_SIZE: usize = 3;
/// romaji keys are 1 to 3 characters
pub const ROMAJI_MAX_SIZE: usize = 3;

/// A Monograph (single Kana) or Digraph (two Kana combo typeable with
/// standard IMEs: a full sized Kana followed by a small vowel, small y-kana
/// or small wa). The romaji key is unique across the whole table; `hepburn`
/// and `kunrei` carry standard spellings when they differ from the key, and
/// `variants` holds further IME combos that map to the same value (the first
/// can be marked as the Kunrei-shiki form). Accent relations (dakuten,
/// han-dakuten, plain) are indices into the one-shot table.
#[derive(Debug)]
pub struct Kana {
  romaji: &'static str,
  hiragana: &'static str,
  katakana: &'static str,
  hepburn: Option<&'static str>,
  kunrei: Option<&'static str>,
  variants: &'static [&'static str],
  kunrei_variant: bool,
  dakuten: Option<usize>,
  han_dakuten: Option<usize>,
  plain: Option<usize>,
}

#[derive(Clone, Copy)]
struct Def {
  romaji: &'static str,
  hiragana: &'static str,
  katakana: &'static str,
  hepburn: Option<&'static str>,
  kunrei: Option<&'static str>,
  variants: &'static [&'static str],
  kunrei_variant: bool,
}

const fn k(romaji: &'static str, hiragana: &'static str, katakana: &'static str) -> Def {
  Def { romaji, hiragana, katakana, hepburn: None, kunrei: None, variants: &[], kunrei_variant: false }
}

const fn k_hk(
  romaji: &'static str, hiragana: &'static str, katakana: &'static str, hepburn: &'static str,
  kunrei: &'static str,
) -> Def {
  Def {
    romaji,
    hiragana,
    katakana,
    hepburn: Some(hepburn),
    kunrei: Some(kunrei),
    variants: &[],
    kunrei_variant: false,
  }
}

const fn k_v(
  romaji: &'static str, hiragana: &'static str, katakana: &'static str,
  variants: &'static [&'static str],
) -> Def {
  Def { romaji, hiragana, katakana, hepburn: None, kunrei: None, variants, kunrei_variant: false }
}

// the first variant is the Kunrei-shiki spelling
const fn k_kv(
  romaji: &'static str, hiragana: &'static str, katakana: &'static str,
  variants: &'static [&'static str],
) -> Def {
  Def { romaji, hiragana, katakana, hepburn: None, kunrei: None, variants, kunrei_variant: true }
}

// Monographs and digraphs with no accented versions. Small Kana romaji keys
// start with 'l' ('x' forms are variants). Small tsu and 'n' must stay as
// the last two entries.
const PLAIN_KANA: &[Def] = &[
  // --- あ 行 ---
  k("a", "あ", "ア"),
  k("na", "な", "ナ"),
  k("ma", "ま", "マ"),
  k("ya", "や", "ヤ"),
  k("ra", "ら", "ラ"),
  k("wa", "わ", "ワ"),
  // あ digraphs
  k("qwa", "くゎ", "クヮ"),
  k("swa", "すぁ", "スァ"),
  k("tsa", "つぁ", "ツァ"),
  k("nya", "にゃ", "ニャ"),
  k_v("fa", "ふぁ", "ファ", &["fwa", "hwa"]),
  k("fya", "ふゃ", "フャ"),
  k("mya", "みゃ", "ミャ"),
  k("rya", "りゃ", "リャ"),
  // --- い 行 ---
  k("i", "い", "イ"),
  k("ni", "に", "ニ"),
  k("mi", "み", "ミ"),
  k("ri", "り", "リ"),
  k_hk("wyi", "ゐ", "ヰ", "i", "i"),
  // い digraphs
  k("swi", "すぃ", "スィ"),
  k("tsi", "つぃ", "ツィ"),
  k("nyi", "にぃ", "ニィ"),
  k_v("fi", "ふぃ", "フィ", &["fyi", "fwi", "hwi"]),
  k("myi", "みぃ", "ミィ"),
  k("ryi", "りぃ", "リィ"),
  // --- う 行 ---
  k("nu", "ぬ", "ヌ"),
  k("mu", "む", "ム"),
  k("yu", "ゆ", "ユ"),
  k("ru", "る", "ル"),
  // う digraphs
  k("swu", "すぅ", "スゥ"),
  k("nyu", "にゅ", "ニュ"),
  k("fwu", "ふぅ", "フゥ"),
  k("fyu", "ふゅ", "フュ"),
  k("myu", "みゅ", "ミュ"),
  k("ryu", "りゅ", "リュ"),
  // --- え 行 ---
  k("e", "え", "エ"),
  k("ne", "ね", "ネ"),
  k("me", "め", "メ"),
  k("re", "れ", "レ"),
  k_hk("wye", "ゑ", "ヱ", "e", "e"),
  // え digraphs
  k("ye", "いぇ", "イェ"),
  k("swe", "すぇ", "スェ"),
  k("tse", "つぇ", "ツェ"),
  k("nye", "にぇ", "ニェ"),
  k_v("fe", "ふぇ", "フェ", &["fye", "fwe", "hwe"]),
  k("mye", "みぇ", "ミェ"),
  k("rye", "りぇ", "リェ"),
  // --- お 行 ---
  k("o", "お", "オ"),
  k("no", "の", "ノ"),
  k("mo", "も", "モ"),
  k("yo", "よ", "ヨ"),
  k("ro", "ろ", "ロ"),
  k_hk("wo", "を", "ヲ", "o", "o"),
  // お digraphs
  k("swo", "すぉ", "スォ"),
  k("tso", "つぉ", "ツォ"),
  k("nyo", "にょ", "ニョ"),
  k_v("fo", "ふぉ", "フォ", &["fwo", "hwo"]),
  k("fyo", "ふょ", "フョ"),
  k("myo", "みょ", "ミョ"),
  k("ryo", "りょ", "リョ"),
  // digraphs that only exist in accented form (all start with 'v')
  k("va", "ゔぁ", "ヴァ"),
  k("vo", "ゔぉ", "ヴォ"),
  k("vya", "ゔゃ", "ヴャ"),
  k("vyu", "ゔゅ", "ヴュ"),
  k("vyo", "ゔょ", "ヴョ"),
  // 12 small letters (5 vowels, 2 k's, 3 y's, small wa and small tsu)
  k_v("la", "ぁ", "ァ", &["xa"]),
  k_v("li", "ぃ", "ィ", &["xi"]),
  k_v("lu", "ぅ", "ゥ", &["xu"]),
  k_v("le", "ぇ", "ェ", &["xe", "lye", "xye"]),
  k_v("lo", "ぉ", "ォ", &["xo"]),
  k_v("lka", "ゕ", "ヵ", &["xka"]),
  k_v("lke", "ゖ", "ヶ", &["xke"]),
  k_v("lya", "ゃ", "ャ", &["xya"]),
  k_v("lyu", "ゅ", "ュ", &["xyu"]),
  k_v("lyo", "ょ", "ョ", &["xyo"]),
  k_v("lwa", "ゎ", "ヮ", &["xwa"]),
  // keep small tsu and 'n' at the end of the list
  k_v("ltu", "っ", "ッ", &["xtu"]),
  k("n", "ん", "ン"),
];

// Kana with a dakuten version, but not an 'h' row: (accented, plain)
const DAKUTEN_KANA: &[(Def, Def)] = &[
  // --- あ 行 ---
  (k("ga", "が", "ガ"), k("ka", "か", "カ")),
  (k("za", "ざ", "ザ"), k("sa", "さ", "サ")),
  (k("da", "だ", "ダ"), k("ta", "た", "タ")),
  (k("gya", "ぎゃ", "ギャ"), k("kya", "きゃ", "キャ")),
  // あ digraphs
  (k("gwa", "ぐぁ", "グァ"), k_v("qa", "くぁ", "クァ", &["kwa"])),
  (k_kv("ja", "じゃ", "ジャ", &["zya", "jya"]), k_kv("sha", "しゃ", "シャ", &["sya"])),
  (k_hk("dya", "ぢゃ", "ヂャ", "ja", "zya"), k_kv("cha", "ちゃ", "チャ", &["tya"])),
  (k("dha", "でゃ", "デャ"), k("tha", "てゃ", "テャ")),
  (k("dwa", "どぁ", "ドァ"), k("twa", "とぁ", "トァ")),
  // --- い 行 ---
  (k("gi", "ぎ", "ギ"), k("ki", "き", "キ")),
  (k_kv("ji", "じ", "ジ", &["zi"]), k_kv("shi", "し", "シ", &["si"])),
  (k_hk("di", "ぢ", "ヂ", "ji", "zi"), k_kv("chi", "ち", "チ", &["ti"])),
  // い digraphs
  (k("vi", "ゔぃ", "ヴィ"), k("wi", "うぃ", "ウィ")),
  (k("gwi", "ぐぃ", "グィ"), k_v("qi", "くぃ", "クィ", &["kwi", "qwi"])),
  (k("gyi", "ぎぃ", "ギィ"), k("kyi", "きぃ", "キィ")),
  (k_v("jyi", "じぃ", "ジィ", &["zyi"]), k("syi", "しぃ", "シィ")),
  (k("dyi", "ぢぃ", "ヂィ"), k("tyi", "ちぃ", "チィ")),
  (k("dwi", "どぃ", "ドィ"), k("twi", "とぃ", "トィ")),
  (k("dhi", "でぃ", "ディ"), k("thi", "てぃ", "ティ")),
  // --- う 行 ---
  (k("vu", "ゔ", "ヴ"), k_v("u", "う", "ウ", &["wu"])),
  (k("gu", "ぐ", "グ"), k("ku", "く", "ク")),
  (k("zu", "ず", "ズ"), k("su", "す", "ス")),
  (k_hk("du", "づ", "ヅ", "zu", "zu"), k_kv("tsu", "つ", "ツ", &["tu"])),
  // う digraphs
  (k("gyu", "ぎゅ", "ギュ"), k("kyu", "きゅ", "キュ")),
  (k("gwu", "ぐぅ", "グゥ"), k_v("qu", "くぅ", "クゥ", &["kwu", "qwu"])),
  (k_kv("ju", "じゅ", "ジュ", &["zyu", "jyu"]), k_kv("shu", "しゅ", "シュ", &["syu"])),
  (k_hk("dyu", "ぢゅ", "ヂュ", "ju", "zyu"), k_kv("chu", "ちゅ", "チュ", &["tyu"])),
  (k("dhu", "でゅ", "デュ"), k("thu", "てゅ", "テュ")),
  (k("dwu", "どぅ", "ドゥ"), k("twu", "とぅ", "トゥ")),
  // --- え 行 ---
  (k("ge", "げ", "ゲ"), k("ke", "け", "ケ")),
  (k("gye", "ぎぇ", "ギェ"), k("kye", "きぇ", "キェ")),
  (k("ze", "ぜ", "ゼ"), k("se", "せ", "セ")),
  (k("de", "で", "デ"), k("te", "て", "テ")),
  // え digraphs
  (k("ve", "ゔぇ", "ヴェ"), k("we", "うぇ", "ウェ")),
  (k("gwe", "ぐぇ", "グェ"), k_v("qe", "くぇ", "クェ", &["kwe", "qwe"])),
  (k_v("je", "じぇ", "ジェ", &["zye", "jye"]), k("she", "しぇ", "シェ")),
  (k("dye", "ぢぇ", "ヂェ"), k_v("che", "ちぇ", "チェ", &["tye"])),
  (k("dhe", "でぇ", "デェ"), k("the", "てぇ", "テェ")),
  (k("dwe", "どぇ", "ドェ"), k("twe", "とぇ", "トェ")),
  // --- お 行 ---
  (k("go", "ご", "ゴ"), k("ko", "こ", "コ")),
  (k("zo", "ぞ", "ゾ"), k("so", "そ", "ソ")),
  (k("do", "ど", "ド"), k("to", "と", "ト")),
  // お digraphs
  (k("gyo", "ぎょ", "ギョ"), k("kyo", "きょ", "キョ")),
  (k("gwo", "ぐぉ", "グォ"), k_v("qo", "くぉ", "クォ", &["kwo", "qwo"])),
  (k_kv("jo", "じょ", "ジョ", &["zyo", "jyo"]), k_kv("sho", "しょ", "ショ", &["syo"])),
  (k_hk("dyo", "ぢょ", "ヂョ", "jo", "zyo"), k_kv("cho", "ちょ", "チョ", &["tyo"])),
  (k("dho", "でょ", "デョ"), k("tho", "てょ", "テョ")),
  (k("dwo", "どぉ", "ドォ"), k("two", "とぉ", "トォ")),
];

// the 'h' row has both a dakuten and a han-dakuten version:
// (han-dakuten, dakuten, plain)
const HAN_DAKUTEN_KANA: &[(Def, Def, Def)] = &[
  (k("pa", "ぱ", "パ"), k("ba", "ば", "バ"), k("ha", "は", "ハ")),
  (k("pi", "ぴ", "ピ"), k("bi", "び", "ビ"), k("hi", "ひ", "ヒ")),
  (k("pu", "ぷ", "プ"), k("bu", "ぶ", "ブ"), k_kv("fu", "ふ", "フ", &["hu"])),
  (k("pe", "ぺ", "ペ"), k("be", "べ", "ベ"), k("he", "へ", "ヘ")),
  (k("po", "ぽ", "ポ"), k("bo", "ぼ", "ボ"), k("ho", "ほ", "ホ")),
  // digraphs
  (k("pya", "ぴゃ", "ピャ"), k("bya", "びゃ", "ビャ"), k("hya", "ひゃ", "ヒャ")),
  (k("pyi", "ぴぃ", "ピィ"), k("byi", "びぃ", "ビィ"), k("hyi", "ひぃ", "ヒィ")),
  (k("pyu", "ぴゅ", "ピュ"), k("byu", "びゅ", "ビュ"), k("hyu", "ひゅ", "ヒュ")),
  (k("pye", "ぴぇ", "ピェ"), k("bye", "びぇ", "ビェ"), k("hye", "ひぇ", "ヒェ")),
  (k("pyo", "ぴょ", "ピョ"), k("byo", "びょ", "ビョ"), k("hyo", "ひょ", "ヒョ")),
];

pub(super) struct KanaTable {
  entries: Vec<Kana>,
  romaji_map: FnvHashMap<&'static str, usize>,
  hiragana_map: FnvHashMap<&'static str, usize>,
  katakana_map: FnvHashMap<&'static str, usize>,
  small_tsu: usize,
  n: usize,
}

fn push_entry(entries: &mut Vec<Kana>, d: &Def, plain: Option<usize>) -> usize {
  assert!(is_all_single_byte(d.romaji), "bad romaji '{}'", d.romaji);
  for v in d.variants {
    assert!(is_all_single_byte(v), "bad variant '{}'", v);
  }
  assert!(is_all_hiragana(d.hiragana), "bad hiragana for '{}'", d.romaji);
  assert!(is_all_katakana(d.katakana), "bad katakana for '{}'", d.romaji);
  assert!(!d.romaji.is_empty() && d.romaji.len() <= ROMAJI_MAX_SIZE);
  assert_eq!(d.hiragana.len(), d.katakana.len());
  entries.push(Kana {
    romaji: d.romaji,
    hiragana: d.hiragana,
    katakana: d.katakana,
    hepburn: d.hepburn,
    kunrei: d.kunrei,
    variants: d.variants,
    kunrei_variant: d.kunrei_variant,
    dakuten: None,
    han_dakuten: None,
    plain,
  });
  entries.len() - 1
}

fn build() -> KanaTable {
  let mut entries = vec![];
  for d in PLAIN_KANA {
    push_entry(&mut entries, d, None);
  }
  let small_tsu = entries.len() - 2;
  let n = entries.len() - 1;
  for (accented, plain) in DAKUTEN_KANA {
    let p = push_entry(&mut entries, plain, None);
    let a = push_entry(&mut entries, accented, Some(p));
    entries[p].dakuten = Some(a);
  }
  for (han, daku, plain) in HAN_DAKUTEN_KANA {
    let p = push_entry(&mut entries, plain, None);
    let a = push_entry(&mut entries, daku, Some(p));
    let h = push_entry(&mut entries, han, Some(p));
    entries[p].dakuten = Some(a);
    entries[p].han_dakuten = Some(h);
  }
  let mut romaji_map = FnvHashMap::default();
  let mut hiragana_map = FnvHashMap::default();
  let mut katakana_map = FnvHashMap::default();
  for (i, entry) in entries.iter().enumerate() {
    assert!(
      romaji_map.insert(entry.romaji, i).is_none(),
      "key '{}' already in Romaji map",
      entry.romaji
    );
    for v in entry.variants {
      assert!(romaji_map.insert(*v, i).is_none(), "key '{}' already in Romaji map", v);
    }
    assert!(
      hiragana_map.insert(entry.hiragana, i).is_none(),
      "key '{}' already in Hiragana map",
      entry.hiragana
    );
    assert!(
      katakana_map.insert(entry.katakana, i).is_none(),
      "key '{}' already in Katakana map",
      entry.katakana
    );
  }
  assert_eq!(entries[small_tsu].romaji, "ltu");
  assert_eq!(entries[n].romaji, "n");
  KanaTable { entries, romaji_map, hiragana_map, katakana_map, small_tsu, n }
}

lazy_static! {
  static ref TABLE: KanaTable = build();
}

pub(super) fn table() -> &'static KanaTable {
  &TABLE
}

impl KanaTable {
  pub(super) fn entries(&self) -> &[Kana] {
    &self.entries
  }

  pub(super) fn find(&self, t: CharType, s: &str) -> Option<&Kana> {
    let map = match t {
      CharType::Romaji => &self.romaji_map,
      CharType::Hiragana => &self.hiragana_map,
      CharType::Katakana => &self.katakana_map,
    };
    map.get(s).map(|&i| &self.entries[i])
  }
}

impl Kana {
  /// look up a Kana by its value in the given script (romaji lookup covers
  /// variants as well as the canonical key)
  pub fn find(t: CharType, s: &str) -> Option<&'static Kana> {
    table().find(t, s)
  }

  /// the reserved small tsu (っ) entry
  pub fn small_tsu() -> &'static Kana {
    &table().entries[table().small_tsu]
  }

  /// the reserved ん entry
  pub fn n() -> &'static Kana {
    &table().entries[table().n]
  }

  /// dakuten version of an unaccented Kana string, e.g., "と" returns "ど"
  /// and "セ" returns "ゼ"
  pub fn find_dakuten(s: &str) -> Option<&'static str> {
    if let Some(k) = table().find(CharType::Hiragana, s) {
      k.dakuten_value(CharType::Hiragana)
    } else {
      table().find(CharType::Katakana, s).and_then(|k| k.dakuten_value(CharType::Katakana))
    }
  }

  /// han-dakuten version of an unaccented Kana string, e.g., "ひ" returns "ぴ"
  pub fn find_han_dakuten(s: &str) -> Option<&'static str> {
    if let Some(k) = table().find(CharType::Hiragana, s) {
      k.han_dakuten_value(CharType::Hiragana)
    } else {
      table().find(CharType::Katakana, s).and_then(|k| k.han_dakuten_value(CharType::Katakana))
    }
  }

  pub fn romaji(&self) -> &'static str {
    self.romaji
  }

  pub fn hiragana(&self) -> &'static str {
    self.hiragana
  }

  pub fn katakana(&self) -> &'static str {
    self.katakana
  }

  pub fn romaji_variants(&self) -> &'static [&'static str] {
    self.variants
  }

  pub fn kunrei_variant(&self) -> bool {
    self.kunrei_variant
  }

  /// accented version of this Kana (None for Kana with no dakuten form)
  pub fn dakuten(&self) -> Option<&'static Kana> {
    self.dakuten.map(|i| &table().entries[i])
  }

  /// semi-voiced version of this Kana (only the 'h' row has one)
  pub fn han_dakuten(&self) -> Option<&'static Kana> {
    self.han_dakuten.map(|i| &table().entries[i])
  }

  /// The unaccented version of this Kana, or None if this Kana is unaccented
  /// or a combination with no standard unaccented form ('va', 'vo', etc. -
  /// ウォ can be typed as 'u' then 'lo', but that's two separate Kana).
  pub fn plain(&self) -> Option<&'static Kana> {
    self.plain.map(|i| &table().entries[i])
  }

  pub fn dakuten_value(&self, t: CharType) -> Option<&'static str> {
    self.dakuten().map(|d| d.get(t, ConvertFlags::NONE))
  }

  pub fn han_dakuten_value(&self, t: CharType) -> Option<&'static str> {
    self.han_dakuten().map(|d| d.get(t, ConvertFlags::NONE))
  }

  /// small Kana are also all monographs
  pub fn is_small(&self) -> bool {
    self.romaji.starts_with('l')
  }

  pub fn is_monograph(&self) -> bool {
    self.hiragana.len() == ONE_KANA_SIZE
  }

  pub fn is_digraph(&self) -> bool {
    self.hiragana.len() == ONE_KANA_SIZE * 2
  }

  pub fn is_dakuten(&self) -> bool {
    if let Some(p) = self.plain() {
      p.dakuten().map_or(false, |d| std::ptr::eq(d, self))
    } else {
      // a few digraphs start with 'v' and have no unaccented version
      self.romaji.starts_with('v')
    }
  }

  pub fn is_han_dakuten(&self) -> bool {
    self
      .plain()
      .and_then(|p| p.han_dakuten())
      .map_or(false, |h| std::ptr::eq(h, self))
  }

  /// romaji value based on `flags`: Hepburn and Kunrei overrides only apply
  /// when the relevant standard spelling differs from the unique key
  pub fn get_romaji(&self, flags: ConvertFlags) -> &'static str {
    if flags.has(ConvertFlags::HEPBURN) && self.hepburn.is_some() {
      self.hepburn.unwrap()
    } else if flags.has(ConvertFlags::KUNREI) && self.kunrei_variant {
      self.variants[0]
    } else if flags.has(ConvertFlags::KUNREI) && self.kunrei.is_some() {
      self.kunrei.unwrap()
    } else {
      self.romaji
    }
  }

  /// repeat the first letter for sokuon output ('t' is doubled even when the
  /// romaji starts with 'c', i.e., っち is 'tchi')
  pub fn get_sokuon_romaji(&self, flags: ConvertFlags) -> String {
    let r = self.get_romaji(flags);
    let first = r.as_bytes()[0];
    let mut result = String::with_capacity(r.len() + 1);
    result.push(char::from(if first == b'c' { b't' } else { first }));
    result + r
  }

  pub fn get(&self, t: CharType, flags: ConvertFlags) -> &'static str {
    match t {
      CharType::Romaji => self.get_romaji(flags),
      CharType::Hiragana => self.hiragana,
      CharType::Katakana => self.katakana,
    }
  }

  /// true if `s` is this Kana's hiragana or katakana value
  pub fn contains_kana(&self, s: &str) -> bool {
    s == self.hiragana || s == self.katakana
  }
}

impl PartialEq for Kana {
  // romaji keys are unique so comparing them is enough
  fn eq(&self, other: &Kana) -> bool {
    self.romaji == other.romaji
  }
}

impl Eq for Kana {}

/// Repetition symbols: the plain marks ゝ/ヽ repeat the previous Kana and the
/// accented marks ゞ/ヾ repeat it with dakuten applied.
pub struct IterationMark {
  hiragana: &'static str,
  katakana: &'static str,
  dakuten: bool,
}

pub const REPEAT_PLAIN: IterationMark =
  IterationMark { hiragana: "ゝ", katakana: "ヽ", dakuten: false };
pub const REPEAT_ACCENTED: IterationMark =
  IterationMark { hiragana: "ゞ", katakana: "ヾ", dakuten: true };

impl IterationMark {
  pub fn hiragana(&self) -> &'static str {
    self.hiragana
  }

  pub fn katakana(&self) -> &'static str {
    self.katakana
  }

  /// true if `s` is this iteration mark in script `t` (always false for
  /// Romaji since the marks only exist in Kana)
  pub fn matches(&self, t: CharType, s: &str) -> bool {
    t == CharType::Hiragana && self.hiragana == s
      || t == CharType::Katakana && self.katakana == s
  }

  /// The value this mark resolves to: for Kana targets the mark itself, for
  /// Romaji the romaji of the previous Kana with the accent applied or
  /// removed as appropriate (empty when there is no previous Kana).
  pub fn get(&self, target: CharType, flags: ConvertFlags, prev: Option<&Kana>) -> String {
    match target {
      CharType::Hiragana => return self.hiragana.to_string(),
      CharType::Katakana => return self.katakana.to_string(),
      CharType::Romaji => {}
    }
    let prev = match prev {
      Some(prev) => prev,
      None => return String::new(),
    };
    let k = if self.dakuten {
      prev.dakuten().unwrap_or(prev)
    } else {
      prev.plain().unwrap_or(prev)
    };
    k.get_romaji(flags).to_string()
  }
}

/// the mark matching `kana` for the source script, if there is one
pub fn find_iteration_mark(source: CharType, kana: &str) -> Option<&'static IterationMark> {
  if REPEAT_PLAIN.matches(source, kana) {
    Some(&REPEAT_PLAIN)
  } else if REPEAT_ACCENTED.matches(source, kana) {
    Some(&REPEAT_ACCENTED)
  } else {
    None
  }
}
