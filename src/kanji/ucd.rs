use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use super::enums::UcdLinkType;
use super::morohashi::MorohashiId;
use super::pinyin::Pinyin;
use crate::column_file::{Column, ColumnFile, ColumnFileError};
use crate::kana::{CharType, ConvertFlags, Converter};
use crate::utf8::{to_unicode, BracketType, Code};
use crate::utf8_char::Utf8Char;

pub const MAX_STROKES: u8 = 48; // 龘 (U+9F98) has 48 strokes
pub const MAX_VARIANT_STROKES: u8 = 33;

#[derive(Error, Debug)]
pub enum UcdError {
  #[error("{0}")]
  ColumnFile(#[from] ColumnFileError),
  #[error("{0}")]
  Validate(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UcdLink {
  code: Code,
  name: String,
}

impl UcdLink {
  pub fn code(&self) -> Code {
    self.code
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

/// One entry of the Unicode character data file. The name is the canonical
/// single-character UTF-8 string for the code point.
#[derive(Clone, Debug)]
pub struct Ucd {
  code: Code,
  name: String,
  block: String,
  version: String,
  radical: u8,
  strokes: u8,
  variant_strokes: Option<u8>,
  pinyin: Pinyin,
  morohashi: Option<MorohashiId>,
  nelson_ids: Vec<u16>,
  sources: String,
  j_source: String,
  joyo: bool,
  jinmei: bool,
  links: Vec<UcdLink>,
  link_type: Option<UcdLinkType>,
  linked_readings: bool,
  meaning: String,
  on_reading: String,
  kun_reading: String,
}

impl Ucd {
  pub fn code(&self) -> Code {
    self.code
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn block(&self) -> &str {
    &self.block
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  pub fn radical(&self) -> u8 {
    self.radical
  }

  pub fn strokes(&self) -> u8 {
    self.strokes
  }

  pub fn variant_strokes(&self) -> Option<u8> {
    self.variant_strokes
  }

  pub fn pinyin(&self) -> Pinyin {
    self.pinyin
  }

  pub fn morohashi(&self) -> Option<MorohashiId> {
    self.morohashi
  }

  pub fn nelson_ids(&self) -> &[u16] {
    &self.nelson_ids
  }

  pub fn sources(&self) -> &str {
    &self.sources
  }

  pub fn j_source(&self) -> &str {
    &self.j_source
  }

  pub fn joyo(&self) -> bool {
    self.joyo
  }

  pub fn jinmei(&self) -> bool {
    self.jinmei
  }

  pub fn links(&self) -> &[UcdLink] {
    &self.links
  }

  pub fn link_type(&self) -> Option<UcdLinkType> {
    self.link_type
  }

  pub fn has_links(&self) -> bool {
    !self.links.is_empty()
  }

  /// true when the link type ended with '*' (readings come via the link)
  pub fn linked_readings(&self) -> bool {
    self.linked_readings
  }

  pub fn meaning(&self) -> &str {
    &self.meaning
  }

  pub fn on_reading(&self) -> &str {
    &self.on_reading
  }

  pub fn kun_reading(&self) -> &str {
    &self.kun_reading
  }

  /// "[4E00] 一" style string for diagnostics
  pub fn code_and_name(&self) -> String {
    format!("{} {}", to_unicode(self.code, BracketType::Square), self.name)
  }

  /// comma-list of "[code] name" for all links
  pub fn link_code_and_names(&self) -> String {
    let mut result = String::new();
    for link in &self.links {
      if !result.is_empty() {
        result += ", ";
      }
      result += &format!("{} {}", to_unicode(link.code, BracketType::Square), link.name);
    }
    result
  }
}

/// The full Unicode data table keyed by name, with two derived link indexes:
/// `linked_jinmei` maps a standard form to its unique Jinmei variant and
/// `linked_other` collects all non-Jinmei links per name.
#[derive(Default, Debug)]
pub struct UcdData {
  map: HashMap<String, Ucd>,
  linked_jinmei: HashMap<String, String>,
  linked_other: HashMap<String, Vec<String>>,
}

impl UcdData {
  pub fn load<P: AsRef<Path>>(path: P) -> Result<UcdData, UcdError> {
    let code_col = Column::new("Code");
    let name_col = Column::new("Name");
    let block_col = Column::new("Block");
    let version_col = Column::new("Version");
    let radical_col = Column::new("Radical");
    let strokes_col = Column::new("Strokes");
    let v_strokes_col = Column::new("VStrokes");
    let pinyin_col = Column::new("Pinyin");
    let morohashi_col = Column::new("MorohashiId");
    let nelson_col = Column::new("NelsonIds");
    let sources_col = Column::new("Sources");
    let j_source_col = Column::new("JSource");
    let joyo_col = Column::new("Joyo");
    let jinmei_col = Column::new("Jinmei");
    let link_codes_col = Column::new("LinkCodes");
    let link_names_col = Column::new("LinkNames");
    let link_type_col = Column::new("LinkType");
    let meaning_col = Column::new("Meaning");
    let on_col = Column::new("On");
    let kun_col = Column::new("Kun");
    let columns = [
      code_col.clone(),
      name_col.clone(),
      block_col.clone(),
      version_col.clone(),
      radical_col.clone(),
      strokes_col.clone(),
      v_strokes_col.clone(),
      pinyin_col.clone(),
      morohashi_col.clone(),
      nelson_col.clone(),
      sources_col.clone(),
      j_source_col.clone(),
      joyo_col.clone(),
      jinmei_col.clone(),
      link_codes_col.clone(),
      link_names_col.clone(),
      link_type_col.clone(),
      meaning_col.clone(),
      on_col.clone(),
      kun_col.clone(),
    ];
    let mut f = ColumnFile::new(path, &columns)?;
    let mut data = UcdData::default();
    while f.next_row()? {
      let fail = |msg: String| UcdError::Validate(f.row_error(&msg).to_string());
      let code = f.get_code(&code_col)?;
      let name = f.get(&name_col)?.to_string();
      if name.is_empty() || name.len() > 4 {
        return Err(fail(format!("name '{}' must be a single character", name)));
      }
      let radical = f.get_u64(&radical_col, u64::from(super::radical::MAX_RADICAL))? as u8;
      if radical == 0 {
        return Err(fail(String::from("radical out of range")));
      }
      let strokes = f.get_u64(&strokes_col, u64::from(MAX_STROKES))? as u8;
      if strokes == 0 {
        return Err(fail(String::from("strokes out of range")));
      }
      let variant_strokes = f.get_opt_u8(&v_strokes_col)?;
      if let Some(v) = variant_strokes {
        if v < 2 || v > MAX_VARIANT_STROKES {
          return Err(fail(format!("variant strokes '{}' out of range", v)));
        }
      }
      let joyo = f.get_bool(&joyo_col)?;
      let jinmei = f.get_bool(&jinmei_col)?;
      if joyo && jinmei {
        return Err(fail(String::from("can't be both joyo and jinmei")));
      }
      let link_names = f.get(&link_names_col)?;
      let mut links = vec![];
      if !link_names.is_empty() {
        let mut codes = f.get(&link_codes_col)?.split(',');
        for link_name in link_names.split(',') {
          match codes.next() {
            Some(link_code) => links.push(UcdLink {
              code: parse_link_code(link_code)
                .ok_or_else(|| fail(format!("invalid LinkCode '{}'", link_code)))?,
              name: link_name.to_string(),
            }),
            None => return Err(fail(String::from("LinkNames has more values than LinkCodes"))),
          }
        }
        // Joyo are standard Kanji so they never link back to a standard form
        // (some Jinmei do since they are officially allowed variants)
        if joyo {
          return Err(fail(String::from("joyo shouldn't have links")));
        }
        if f.get(&link_type_col)?.is_empty() {
          return Err(fail(String::from("LinkNames has a value, but LinkType is empty")));
        }
      } else if !f.get(&link_type_col)?.is_empty() {
        return Err(fail(String::from("LinkType has a value, but LinkNames is empty")));
      } else if !f.get(&link_codes_col)?.is_empty() {
        return Err(fail(String::from("LinkCodes has a value, but LinkNames is empty")));
      }
      let mut link_type_value = f.get(&link_type_col)?;
      let linked_readings = link_type_value.ends_with('*');
      if linked_readings {
        link_type_value = &link_type_value[..link_type_value.len() - 1];
      }
      let link_type = if link_type_value.is_empty() {
        None
      } else {
        Some(
          UcdLinkType::from_str(link_type_value)
            .map_err(|_| fail(format!("unrecognized LinkType '{}'", link_type_value)))?,
        )
      };
      let meaning = f.get(&meaning_col)?.to_string();
      // meaning can be empty for entries like 乁, but never for a Joyo
      if joyo && meaning.is_empty() {
        return Err(fail(String::from("meaning is empty for Joyo Kanji")));
      }
      let morohashi = MorohashiId::parse_opt(f.get(&morohashi_col)?)
        .map_err(|e| fail(e.to_string()))?;
      let j_source = f.get(&j_source_col)?.to_string();
      let on_reading = f.get(&on_col)?.to_string();
      let kun_reading = f.get(&kun_col)?.to_string();
      if on_reading.is_empty() && kun_reading.is_empty() && morohashi.is_none()
        && j_source.is_empty()
      {
        return Err(fail(String::from(
          "one of 'On', 'Kun', 'MorohashiId' or 'JSource' must be populated",
        )));
      }
      let mut nelson_ids = vec![];
      let nelson_value = f.get(&nelson_col)?;
      if !nelson_value.is_empty() {
        for id in nelson_value.split(',') {
          nelson_ids.push(
            id.parse::<u16>().map_err(|_| fail(format!("invalid NelsonIds '{}'", id)))?,
          );
        }
      }
      let entry = Ucd {
        code,
        name: name.clone(),
        block: f.get(&block_col)?.to_string(),
        version: f.get(&version_col)?.to_string(),
        radical,
        strokes,
        variant_strokes,
        pinyin: Pinyin::new(f.get(&pinyin_col)?),
        morohashi,
        nelson_ids,
        sources: f.get(&sources_col)?.to_string(),
        j_source,
        joyo,
        jinmei,
        links: links.clone(),
        link_type,
        linked_readings,
        meaning,
        on_reading,
        kun_reading,
      };
      if data.map.insert(name.clone(), entry).is_some() {
        return Err(fail(format!("duplicate entry '{}'", name)));
      }
      for link in &links {
        if jinmei {
          if let Some(existing) =
            data.linked_jinmei.insert(link.name.clone(), name.clone())
          {
            return Err(fail(format!(
              "jinmei link {} to {} failed - already has {}",
              link.name, name, existing
            )));
          }
        } else {
          data.linked_other.entry(link.name.clone()).or_insert_with(Vec::new).push(name.clone());
        }
      }
    }
    Ok(data)
  }

  pub fn map(&self) -> &HashMap<String, Ucd> {
    &self.map
  }

  /// Find an entry by name. A name carrying a variation selector is resolved
  /// through the link indexes: the Jinmei variant is preferred, otherwise
  /// the first of the other linked variants is used.
  pub fn find(&self, name: &str) -> Option<&Ucd> {
    let mut lookup = name;
    if Utf8Char::is_char_with_variation_selector(name) {
      let non_variant = Utf8Char::without_variation_selector(name);
      match self.linked_jinmei.get(non_variant) {
        Some(variant) => lookup = variant,
        None => match self.linked_other.get(non_variant) {
          Some(variants) => lookup = &variants[0],
          None => return None,
        },
      }
    }
    self.map.get(lookup)
  }

  /// On readings (converted to Katakana) followed by Kun readings (converted
  /// to Hiragana), joined with commas.
  pub fn get_readings_as_kana(&self, u: Option<&Ucd>) -> String {
    let u = match u {
      Some(u) => u,
      None => return String::new(),
    };
    let mut result = Converter::new(CharType::Katakana, ConvertFlags::NONE)
      .convert_from(CharType::Romaji, &u.on_reading.replace(' ', ","));
    let kun = u.kun_reading.replace(' ', ",");
    if !kun.is_empty() {
      let kun = Converter::new(CharType::Hiragana, ConvertFlags::NONE)
        .convert_from(CharType::Romaji, &kun);
      if !result.is_empty() {
        result.push('、');
      }
      result += &kun;
    }
    result
  }
}

// link codes have the same format as the Code column (4-5 upper-case hex)
fn parse_link_code(s: &str) -> Option<Code> {
  if s.len() < 4
    || s.len() > 5
    || !s.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
  {
    return None;
  }
  Code::from_str_radix(s, 16).ok()
}
