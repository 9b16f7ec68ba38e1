use crate::enum_list;

enum_list!(
  /// The one primary type every catalogued Kanji gets assigned.
  pub enum KanjiType {
    Jouyou => "Jouyou",
    Jinmei => "Jinmei",
    LinkedJinmei => "LinkedJinmei",
    LinkedOld => "LinkedOld",
    Frequency => "Frequency",
    Extra => "Extra",
    Kentei => "Kentei",
    Ucd => "Ucd",
  }
);

enum_list!(
  /// Jouyou school grades: first through sixth grade plus secondary school.
  pub enum Grade {
    G1 => "G1",
    G2 => "G2",
    G3 => "G3",
    G4 => "G4",
    G5 => "G5",
    G6 => "G6",
    S => "S",
  }
);

enum_list!(
  /// JLPT levels from easiest (N5) to hardest (N1).
  pub enum JlptLevel {
    N5 => "N5",
    N4 => "N4",
    N3 => "N3",
    N2 => "N2",
    N1 => "N1",
  }
);

enum_list!(
  /// Kanji Kentei kyus from easiest (K10) to hardest (K1). KJ2 sits between
  /// K3 and K2, KJ1 between K2 and K1.
  pub enum KenteiKyu {
    K10 => "K10",
    K9 => "K9",
    K8 => "K8",
    K7 => "K7",
    K6 => "K6",
    K5 => "K5",
    K4 => "K4",
    K3 => "K3",
    KJ2 => "KJ2",
    K2 => "K2",
    KJ1 => "KJ1",
    K1 => "K1",
  }
);

enum_list!(
  /// Official reason a Kanji was added to the Jinmei list.
  pub enum JinmeiReason {
    Names => "Names",
    Print => "Print",
    Moyou => "Moyou",
    Simple => "Simple",
    Variant => "Variant",
    Other => "Other",
  }
);

enum_list!(
  /// Type of a link loaded from the Unicode data ('*' suffixes marking
  /// linked readings are handled separately).
  pub enum UcdLinkType {
    Compatibility => "Compatibility",
    Definition => "Definition",
    Jinmei => "Jinmei",
    Semantic => "Semantic",
    Simplified => "Simplified",
    Traditional => "Traditional",
  }
);

#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  #[test]
  fn test_kanji_type_order() {
    assert_eq!(KanjiType::ALL.first(), Some(&KanjiType::Jouyou));
    assert_eq!(KanjiType::ALL.last(), Some(&KanjiType::Ucd));
    assert_eq!(KanjiType::ALL.len(), 8);
  }

  #[test]
  fn test_from_str() {
    assert_eq!(Grade::from_str("G4").unwrap(), Grade::G4);
    assert_eq!(Grade::from_str("S").unwrap(), Grade::S);
    assert!(Grade::from_str("G7").is_err());
    assert_eq!(JlptLevel::from_str("N3").unwrap(), JlptLevel::N3);
    assert_eq!(KenteiKyu::from_str("KJ2").unwrap(), KenteiKyu::KJ2);
    assert_eq!(JinmeiReason::from_str("Print").unwrap(), JinmeiReason::Print);
    assert_eq!(UcdLinkType::from_str("Traditional").unwrap(), UcdLinkType::Traditional);
  }

  #[test]
  fn test_kyu_order() {
    // harder kyus come later so list processing can go easiest to hardest
    assert!(KenteiKyu::K10 < KenteiKyu::K3);
    assert!(KenteiKyu::K3 < KenteiKyu::KJ2);
    assert!(KenteiKyu::KJ2 < KenteiKyu::K2);
    assert!(KenteiKyu::K2 < KenteiKyu::KJ1);
    assert!(KenteiKyu::KJ1 < KenteiKyu::K1);
  }
}
