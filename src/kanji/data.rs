use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info};
use thiserror::Error;

use super::enums::{Grade, JinmeiReason, JlptLevel, KanjiType, KenteiKyu, UcdLinkType};
use super::list_file::{ListFile, ListFileError};
use super::morohashi::MorohashiId;
use super::pinyin::Pinyin;
use super::radical::{Radical, RadicalData, RadicalError};
use super::record::{Frequency, Kanji, KanjiFields, KanjiIndex, KanjiKind, NelsonId, Strokes};
use super::ucd::{Ucd, UcdData, UcdError};
use crate::column_file::{Column, ColumnFile, ColumnFileError};
use crate::enum_list::{EnumList, EnumMap};

pub const DATA_ARG: &str = "-data";
pub const DEBUG_ARG: &str = "-debug";
pub const INFO_ARG: &str = "-info";

/// frequency ranks are grouped into 5 buckets of 500 (the last bucket holds
/// one extra entry since the full list has 2,501 ranks)
pub const FREQUENCY_BUCKETS: usize = 5;
pub const FREQUENCY_ENTRIES: usize = 500;

// top-level .txt files expected in a valid data directory (the jlpt and
// kentei lists live in subdirectories)
const TEXT_FILES_IN_DATA_DIR: usize = 8;

const EMPTY_INDEXES: &[KanjiIndex] = &[];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DebugMode {
  Off,
  Info,
  Full,
}

#[derive(Error, Debug)]
pub enum DataError {
  #[error("{0}")]
  Usage(String),
  #[error("{0}")]
  ColumnFile(#[from] ColumnFileError),
  #[error("{0}")]
  Radical(#[from] RadicalError),
  #[error("{0}")]
  Ucd(#[from] UcdError),
  #[error("{0}")]
  ListFile(#[from] ListFileError),
  #[error("{0}")]
  IOError(#[from] std::io::Error),
}

// the list files and reading overrides only needed while loading
struct SourceLists {
  levels: Vec<ListFile>,
  kyus: Vec<ListFile>,
  frequency: ListFile,
  readings: HashMap<String, String>,
}

impl SourceLists {
  fn level(&self, name: &str) -> Option<JlptLevel> {
    self.levels.iter().find(|f| f.exists(name)).and_then(|f| f.level())
  }

  fn kyu(&self, name: &str) -> Option<KenteiKyu> {
    self.kyus.iter().find(|f| f.exists(name)).and_then(|f| f.kyu())
  }

  fn frequency(&self, name: &str) -> Option<Frequency> {
    self.frequency.index_of(name).map(|i| (i + 1) as Frequency)
  }
}

/// The assembled catalog: every Kanji record (stored by value in an arena
/// and addressed by `KanjiIndex` handles) plus all the lookup indexes.
/// Construction does all the file loading; afterwards the data is immutable
/// and every query is a pure lookup.
#[derive(Debug)]
pub struct KanjiData {
  data_dir: PathBuf,
  debug_mode: DebugMode,
  radicals: RadicalData,
  ucd: UcdData,
  kanji: Vec<Kanji>,
  name_map: HashMap<String, KanjiIndex>,
  compatibility_map: HashMap<String, KanjiIndex>,
  types: EnumMap<KanjiType, Vec<KanjiIndex>>,
  grades: EnumMap<Grade, Vec<KanjiIndex>>,
  levels: EnumMap<JlptLevel, Vec<KanjiIndex>>,
  kyus: EnumMap<KenteiKyu, Vec<KanjiIndex>>,
  frequencies: Vec<Vec<KanjiIndex>>,
  morohashi_map: HashMap<MorohashiId, Vec<KanjiIndex>>,
  nelson_map: HashMap<NelsonId, Vec<KanjiIndex>>,
  max_frequency: Frequency,
  error_count: u32,
}

impl KanjiData {
  /// Load the catalog from `args` (handles `-data`, `-debug` and `-info`).
  pub fn from_args(args: &[String]) -> Result<KanjiData, DataError> {
    KanjiData::new(get_data_dir(args)?, get_debug_mode(args)?)
  }

  pub fn new<P: AsRef<Path>>(data_dir: P, debug_mode: DebugMode) -> Result<KanjiData, DataError> {
    let data_dir = data_dir.as_ref().to_path_buf();
    debug!("begin loading data from '{}'", data_dir.display());
    let mut data = KanjiData {
      data_dir: data_dir.clone(),
      debug_mode,
      radicals: RadicalData::default(),
      ucd: UcdData::default(),
      kanji: vec![],
      name_map: HashMap::new(),
      compatibility_map: HashMap::new(),
      types: EnumMap::default(),
      grades: EnumMap::default(),
      levels: EnumMap::default(),
      kyus: EnumMap::default(),
      frequencies: vec![vec![]; FREQUENCY_BUCKETS],
      morohashi_map: HashMap::new(),
      nelson_map: HashMap::new(),
      max_frequency: 0,
      error_count: 0,
    };
    data.ucd = UcdData::load(data_dir.join("ucd.txt"))?;
    data.radicals = RadicalData::load(data_dir.join("radicals.txt"))?;
    let lists = data.load_source_lists(&data_dir)?;
    data.populate_jouyou(&data_dir.join("jouyou.txt"), &lists)?;
    data.populate_linked_jinmei(&data_dir.join("linked-jinmei.txt"))?;
    data.populate_linked_old();
    data.populate_jinmei(&data_dir.join("jinmei.txt"), &lists)?;
    data.populate_extra(&data_dir.join("extra.txt"), &lists)?;
    data.process_levels(&lists)?;
    // process frequency before kentei so the Frequency type is claimed by
    // kanji in the top frequency list, but not in any more official list
    data.process_frequency(&lists);
    data.process_kyus(&lists);
    data.process_ucd();
    if debug_mode != DebugMode::Off {
      data.print_stats();
    }
    Ok(data)
  }

  fn load_source_lists(&mut self, dir: &Path) -> Result<SourceLists, DataError> {
    let mut readings = HashMap::new();
    let name_col = Column::new("Name");
    let reading_col = Column::new("Reading");
    let mut f = ColumnFile::new(
      dir.join("frequency-readings.txt"),
      &[name_col.clone(), reading_col.clone()],
    )?;
    while f.next_row()? {
      if readings
        .insert(f.get(&name_col)?.to_string(), f.get(&reading_col)?.to_string())
        .is_some()
      {
        return Err(f.row_error("duplicate name").into());
      }
    }
    let mut level_names = HashSet::new();
    let mut levels = vec![];
    for &level in JlptLevel::ALL {
      let file = dir.join("jlpt").join(format!("{}.txt", level.name().to_lowercase()));
      levels.push(ListFile::load_level(file, level, &mut level_names)?);
    }
    let mut kyu_names = HashSet::new();
    let mut kyus = vec![];
    for &kyu in KenteiKyu::ALL {
      let file = dir.join("kentei").join(format!("{}.txt", kyu.name().to_lowercase()));
      kyus.push(ListFile::load_kyu(file, kyu, &mut kyu_names)?);
    }
    let frequency = ListFile::load(dir.join("frequency.txt"), None)?;
    Ok(SourceLists { levels, kyus, frequency, readings })
  }

  // common fields for kanji loaded from the jouyou/jinmei/extra files
  fn file_kanji_fields(
    &self, name: &str, radical: u8, strokes: Strokes, lists: &SourceLists,
  ) -> KanjiFields {
    let mut fields = KanjiFields::new(name, radical, strokes);
    if let Some(u) = self.ucd.find(name) {
      fields.pinyin = u.pinyin();
      fields.morohashi = u.morohashi();
      fields.nelson_ids = u.nelson_ids().to_vec();
      if u.name() != name {
        fields.compatibility_name = Some(u.name().to_string());
      }
    }
    fields.level = lists.level(name);
    fields.kyu = lists.kyu(name);
    fields.frequency = lists.frequency(name);
    fields
  }

  fn radical_number(
    &self, f: &ColumnFile, radical_col: &Column,
  ) -> Result<u8, DataError> {
    let name = f.get(radical_col)?;
    match self.radicals.find_by_name(name) {
      Some(r) => Ok(r.number()),
      None => Err(DataError::Usage(
        f.row_error(&format!("unrecognized radical '{}'", name)).to_string(),
      )),
    }
  }

  fn populate_jouyou(&mut self, path: &Path, lists: &SourceLists) -> Result<(), DataError> {
    let number_col = Column::new("Number");
    let name_col = Column::new("Name");
    let radical_col = Column::new("Radical");
    let old_names_col = Column::new("OldNames");
    let year_col = Column::new("Year");
    let strokes_col = Column::new("Strokes");
    let grade_col = Column::new("Grade");
    let meaning_col = Column::new("Meaning");
    let reading_col = Column::new("Reading");
    let columns = [
      number_col.clone(),
      name_col.clone(),
      radical_col.clone(),
      old_names_col.clone(),
      year_col.clone(),
      strokes_col.clone(),
      grade_col.clone(),
      meaning_col.clone(),
      reading_col.clone(),
    ];
    let mut f = ColumnFile::new(path, &columns)?;
    while f.next_row()? {
      let name = f.get(&name_col)?.to_string();
      let radical = self.radical_number(&f, &radical_col)?;
      // every Jouyou Kanji has a grade
      let grade = Grade::from_str(f.get(&grade_col)?).map_err(|e| {
        DataError::Usage(f.row_error(&e.to_string()).to_string())
      })?;
      let mut fields =
        self.file_kanji_fields(&name, radical, Strokes::new(f.get_u8(&strokes_col)?), lists);
      fields.meaning = f.get(&meaning_col)?.to_string();
      fields.reading = f.get(&reading_col)?.to_string();
      fields.old_names = split_names(f.get(&old_names_col)?);
      let kind = KanjiKind::Jouyou {
        number: f.get_u16(&number_col)?,
        grade,
        year: f.get_opt_u16(&year_col)?,
      };
      self.check_insert(Kanji::new(fields, kind));
    }
    Ok(())
  }

  /// Each line links a Jouyou Kanji (which must already be catalogued) to
  /// its officially recognized Jinmei variant.
  fn populate_linked_jinmei(&mut self, path: &Path) -> Result<(), DataError> {
    let file_name = path
      .file_name()
      .map(|f| f.to_string_lossy().to_string())
      .unwrap_or_default();
    let content = fs::read_to_string(path)?;
    for line in content.lines() {
      let mut parts = line.split('\t');
      match (parts.next(), parts.next()) {
        (Some(jouyou), Some(linked)) if !jouyou.is_empty() && !linked.is_empty() => {
          match self.name_map.get(jouyou).copied() {
            Some(link) => {
              let kanji = self.make_linked(linked, link, true);
              self.check_insert(kanji);
            }
            None => self.print_error(&format!(
              "'{}' not found while processing {}", jouyou, file_name
            )),
          }
        }
        _ => self.print_error(&format!("bad line '{}' in {}", line, file_name)),
      }
    }
    Ok(())
  }

  // Old names of catalogued Kanji with no entry of their own become
  // LinkedOld type (the old Jouyou forms that aren't LinkedJinmei).
  fn populate_linked_old(&mut self) {
    let snapshot: Vec<(KanjiIndex, Vec<String>)> = self
      .kanji
      .iter()
      .enumerate()
      .filter(|(_, k)| !k.old_names().is_empty())
      .map(|(i, k)| (i, k.old_names().to_vec()))
      .collect();
    for (link, old_names) in snapshot {
      for name in old_names {
        if self.find_by_name(&name).is_none() {
          if self.kanji[link].is(KanjiType::Jouyou) {
            let kanji = self.make_linked_old(&name, link);
            self.check_insert(kanji);
          } else {
            self.print_error(&format!(
              "LinkedOld '{}' link '{}' is not Jouyou", name, self.kanji[link].name()
            ));
          }
        }
      }
    }
  }

  fn populate_jinmei(&mut self, path: &Path, lists: &SourceLists) -> Result<(), DataError> {
    let number_col = Column::new("Number");
    let name_col = Column::new("Name");
    let radical_col = Column::new("Radical");
    let old_names_col = Column::new("OldNames");
    let year_col = Column::new("Year");
    let reason_col = Column::new("Reason");
    let reading_col = Column::new("Reading");
    let columns = [
      number_col.clone(),
      name_col.clone(),
      radical_col.clone(),
      old_names_col.clone(),
      year_col.clone(),
      reason_col.clone(),
      reading_col.clone(),
    ];
    let mut f = ColumnFile::new(path, &columns)?;
    while f.next_row()? {
      let name = f.get(&name_col)?.to_string();
      let radical = self.radical_number(&f, &radical_col)?;
      let reason = JinmeiReason::from_str(f.get(&reason_col)?).map_err(|e| {
        DataError::Usage(f.row_error(&e.to_string()).to_string())
      })?;
      let ucd = self.ucd.find(&name);
      let strokes = Strokes::new(ucd.map_or(0, |u| u.strokes()));
      let mut fields = self.file_kanji_fields(&name, radical, strokes, lists);
      // Jinmei meanings come from the Unicode data, readings from the file
      fields.meaning = ucd.map_or(String::new(), |u| u.meaning().to_string());
      fields.reading = f.get(&reading_col)?.to_string();
      fields.old_names = split_names(f.get(&old_names_col)?);
      let old_names = fields.old_names.clone();
      let kind = KanjiKind::Jinmei {
        number: f.get_u16(&number_col)?,
        year: f.get_opt_u16(&year_col)?,
        reason,
      };
      if let Some(index) = self.check_insert(Kanji::new(fields, kind)) {
        for old_name in old_names {
          let kanji = self.make_linked(&old_name, index, true);
          self.check_insert(kanji);
        }
      }
    }
    Ok(())
  }

  fn populate_extra(&mut self, path: &Path, lists: &SourceLists) -> Result<(), DataError> {
    let number_col = Column::new("Number");
    let name_col = Column::new("Name");
    let radical_col = Column::new("Radical");
    let strokes_col = Column::new("Strokes");
    let meaning_col = Column::new("Meaning");
    let reading_col = Column::new("Reading");
    let columns = [
      number_col.clone(),
      name_col.clone(),
      radical_col.clone(),
      strokes_col.clone(),
      meaning_col.clone(),
      reading_col.clone(),
    ];
    let mut f = ColumnFile::new(path, &columns)?;
    while f.next_row()? {
      let name = f.get(&name_col)?.to_string();
      let radical = self.radical_number(&f, &radical_col)?;
      let mut fields =
        self.file_kanji_fields(&name, radical, Strokes::new(f.get_u8(&strokes_col)?), lists);
      // Extra Kanji are by definition not in the JLPT or frequency lists
      fields.level = None;
      fields.frequency = None;
      fields.meaning = f.get(&meaning_col)?.to_string();
      fields.reading = f.get(&reading_col)?.to_string();
      let kind = KanjiKind::Extra { number: f.get_u16(&number_col)? };
      self.check_insert(Kanji::new(fields, kind));
    }
    Ok(())
  }

  // linked kanji derive reading and meaning from their link and have no
  // frequency, grade, level or kyu of their own
  fn make_linked(&self, name: &str, link: KanjiIndex, jinmei: bool) -> Kanji {
    let fields = self.linked_fields(name, link);
    let kind = if jinmei { KanjiKind::LinkedJinmei { link } } else { KanjiKind::LinkedOld { link } };
    Kanji::new(fields, kind)
  }

  fn make_linked_old(&self, name: &str, link: KanjiIndex) -> Kanji {
    self.make_linked(name, link, false)
  }

  fn linked_fields(&self, name: &str, link: KanjiIndex) -> KanjiFields {
    let ucd = self.ucd.find(name);
    let mut fields = KanjiFields::new(
      name,
      ucd.map_or(0, |u| u.radical()),
      Strokes::new(ucd.map_or(0, |u| u.strokes())),
    );
    if let Some(u) = ucd {
      fields.pinyin = u.pinyin();
      fields.morohashi = u.morohashi();
      fields.nelson_ids = u.nelson_ids().to_vec();
      if u.name() != name {
        fields.compatibility_name = Some(u.name().to_string());
      }
    }
    let target = &self.kanji[link];
    fields.meaning = target.meaning().to_string();
    fields.reading = target.reading().to_string();
    fields.new_name = Some(target.name().to_string());
    fields
  }

  fn process_levels(&mut self, lists: &SourceLists) -> Result<(), DataError> {
    for file in &lists.levels {
      let level = file.level().unwrap();
      for name in file.list() {
        match self.find_index(name) {
          // JLPT lists only overlap with already-loaded official types
          None => {
            return Err(DataError::Usage(format!(
              "'{}' from {} not found in the catalog", name, file.file_name()
            )))
          }
          Some(index) => self.levels[level].push(index),
        }
      }
    }
    Ok(())
  }

  fn process_frequency(&mut self, lists: &SourceLists) {
    for (i, name) in lists.frequency.list().iter().enumerate() {
      let rank = (i + 1) as Frequency;
      let index = match self.find_index(name) {
        Some(index) => index,
        None => {
          // only in 'frequency.txt' so by definition not Jouyou, Jinmei or
          // any JLPT level
          let kanji = self.make_frequency(name, rank, lists);
          match self.check_insert(kanji) {
            Some(index) => index,
            None => continue,
          }
        }
      };
      let bucket = (usize::from(rank) - 1) / FREQUENCY_ENTRIES;
      self.frequencies[bucket.min(FREQUENCY_BUCKETS - 1)].push(index);
    }
  }

  fn make_frequency(&self, name: &str, rank: Frequency, lists: &SourceLists) -> Kanji {
    let mut fields = self.ucd_fields(name);
    fields.kyu = lists.kyu(name);
    fields.frequency = Some(rank);
    fields.reading = match lists.readings.get(name) {
      Some(reading) => reading.clone(),
      None => self.ucd.get_readings_as_kana(self.ucd.find(name)),
    };
    Kanji::new(fields, KanjiKind::Frequency)
  }

  fn process_kyus(&mut self, lists: &SourceLists) {
    for file_index in 0..lists.kyus.len() {
      let file = &lists.kyus[file_index];
      let kyu = file.kyu().unwrap();
      for name in file.list() {
        let index = match self.find_index(name) {
          Some(index) => index,
          None => {
            let mut fields = self.ucd_fields(name);
            fields.kyu = Some(kyu);
            fields.reading = self.ucd.get_readings_as_kana(self.ucd.find(name));
            match self.check_insert(Kanji::new(fields, KanjiKind::Kentei)) {
              Some(index) => index,
              None => continue,
            }
          }
        };
        self.kyus[kyu].push(index);
      }
    }
  }

  // the remaining Unicode data entries not claimed by any other type
  fn process_ucd(&mut self) {
    let mut names: Vec<String> = self.ucd.map().keys().cloned().collect();
    names.sort();
    for name in names {
      // find_by_name handles variation selectors, avoiding redundant entries
      // for compatibility versions of already catalogued variants
      if self.find_by_name(&name).is_none() {
        let mut fields = self.ucd_fields(&name);
        fields.reading = self.ucd.get_readings_as_kana(self.ucd.find(&name));
        self.check_insert(Kanji::new(fields, KanjiKind::Ucd));
      }
    }
  }

  // common fields for kanji created straight from a Unicode data entry
  fn ucd_fields(&self, name: &str) -> KanjiFields {
    let ucd = self.ucd.find(name);
    let mut fields = KanjiFields::new(
      name,
      ucd.map_or(0, |u| u.radical()),
      ucd.map_or(Strokes::new(0), |u| Strokes::with_variant(u.strokes(), u.variant_strokes())),
    );
    if let Some(u) = ucd {
      fields.pinyin = u.pinyin();
      fields.morohashi = u.morohashi();
      fields.nelson_ids = u.nelson_ids().to_vec();
      fields.meaning = u.meaning().to_string();
      fields.linked_readings = u.linked_readings();
      if u.name() != name {
        fields.compatibility_name = Some(u.name().to_string());
      }
      if u.link_type() == Some(UcdLinkType::Traditional) {
        fields.old_names = u.links().iter().map(|l| l.name().to_string()).collect();
      } else if let Some(link) = u.links().first() {
        fields.new_name = Some(link.name().to_string());
      }
    }
    fields
  }

  /// Insert a Kanji, enforcing name uniqueness and running the sanity checks
  /// against the Unicode data. Failures are printed to stderr and counted,
  /// but loading continues so that a bad file shows all its problems at once.
  fn check_insert(&mut self, kanji: Kanji) -> Option<KanjiIndex> {
    if self.name_map.contains_key(kanji.name()) {
      self.print_error(&format!("failed to insert '{}' into map", kanji.name()));
      return None;
    }
    for msg in self.sanity_check_messages(&kanji) {
      self.print_error(&msg);
    }
    let index = self.kanji.len();
    if kanji.variant()
      && self
        .compatibility_map
        .insert(kanji.compatibility_name().to_string(), index)
        .is_some()
    {
      self.print_error(&format!("failed to insert variant '{}' into map", kanji.name()));
    }
    if let Some(freq) = kanji.frequency() {
      if freq >= self.max_frequency {
        self.max_frequency = freq + 1;
      }
    }
    if let Some(grade) = kanji.grade() {
      self.grades[grade].push(index);
    }
    if let Some(id) = kanji.morohashi() {
      self.morohashi_map.entry(id).or_insert_with(Vec::new).push(index);
    }
    for &id in kanji.nelson_ids() {
      self.nelson_map.entry(id).or_insert_with(Vec::new).push(index);
    }
    self.types[kanji.kanji_type()].push(index);
    self.name_map.insert(kanji.name().to_string(), index);
    self.kanji.push(kanji);
    Some(index)
  }

  fn sanity_check_messages(&self, kanji: &Kanji) -> Vec<String> {
    let describe = |s: &str| {
      let variant = if kanji.variant() {
        format!(" (non-variant: {})", kanji.non_variant_name())
      } else {
        String::new()
      };
      format!(
        "{} {}{} {} in ucd",
        kanji.name(),
        crate::utf8::to_unicode_str(kanji.name(), crate::utf8::BracketType::Square),
        variant,
        s
      )
    };
    let mut result = vec![];
    match self.ucd.find(kanji.name()) {
      None => result.push(describe("not found")),
      Some(ucd) => match kanji.kanji_type() {
        KanjiType::Jouyou if !ucd.joyo() => result.push(describe("not marked as 'Joyo'")),
        KanjiType::Jinmei if !ucd.jinmei() => result.push(describe("not marked as 'Jinmei'")),
        KanjiType::LinkedJinmei if !ucd.jinmei() => {
          result.push(describe("with link not marked as 'Jinmei'"))
        }
        KanjiType::LinkedJinmei if !ucd.has_links() => {
          result.push(describe(&format!("missing 'JinmeiLink' for {}", ucd.code_and_name())))
        }
        _ => {}
      },
    }
    result
  }

  fn print_error(&mut self, msg: &str) {
    self.error_count += 1;
    eprintln!("ERROR[{:04}] --- {}", self.error_count, msg);
  }

  // query API

  pub fn data_dir(&self) -> &Path {
    &self.data_dir
  }

  pub fn debug_mode(&self) -> DebugMode {
    self.debug_mode
  }

  pub fn radicals(&self) -> &RadicalData {
    &self.radicals
  }

  pub fn ucd(&self) -> &UcdData {
    &self.ucd
  }

  /// number of loading errors printed to stderr
  pub fn error_count(&self) -> u32 {
    self.error_count
  }

  /// total number of catalogued Kanji
  pub fn total(&self) -> usize {
    self.kanji.len()
  }

  /// resolve a handle returned by one of the index queries
  pub fn kanji(&self, index: KanjiIndex) -> &Kanji {
    &self.kanji[index]
  }

  fn find_index(&self, name: &str) -> Option<KanjiIndex> {
    self
      .name_map
      .get(name)
      .or_else(|| self.compatibility_map.get(name))
      .copied()
  }

  /// find by name, also accepting the compatibility form of a variant name
  pub fn find_by_name(&self, name: &str) -> Option<&Kanji> {
    self.find_index(name).map(|i| &self.kanji[i])
  }

  /// O(1) lookup by frequency rank (1 to 2,501)
  pub fn find_by_frequency(&self, frequency: Frequency) -> Option<&Kanji> {
    if frequency == 0 || frequency >= self.max_frequency {
      return None;
    }
    let position = usize::from(frequency) - 1;
    let bucket = (position / FREQUENCY_ENTRIES).min(FREQUENCY_BUCKETS - 1);
    self
      .frequencies[bucket]
      .get(position - bucket * FREQUENCY_ENTRIES)
      .map(|&i| &self.kanji[i])
  }

  /// all Kanji with the given Morohashi id (accepts a trailing 'P')
  pub fn find_by_morohashi_id(&self, id: &str) -> &[KanjiIndex] {
    match id.parse::<MorohashiId>() {
      Ok(id) => self.morohashi_map.get(&id).map_or(EMPTY_INDEXES, |v| v),
      Err(_) => EMPTY_INDEXES,
    }
  }

  pub fn find_by_nelson_id(&self, id: NelsonId) -> &[KanjiIndex] {
    self.nelson_map.get(&id).map_or(EMPTY_INDEXES, |v| v)
  }

  pub fn types(&self, t: KanjiType) -> &[KanjiIndex] {
    &self.types[t]
  }

  pub fn grades(&self, g: Grade) -> &[KanjiIndex] {
    &self.grades[g]
  }

  pub fn levels(&self, l: JlptLevel) -> &[KanjiIndex] {
    &self.levels[l]
  }

  pub fn kyus(&self, k: KenteiKyu) -> &[KanjiIndex] {
    &self.kyus[k]
  }

  pub fn frequency_list(&self, bucket: usize) -> &[KanjiIndex] {
    self.frequencies.get(bucket).map_or(EMPTY_INDEXES, |v| v)
  }

  /// one more than the highest loaded frequency rank
  pub fn max_frequency(&self) -> Frequency {
    self.max_frequency
  }

  pub fn get_type(&self, name: &str) -> Option<KanjiType> {
    self.find_by_name(name).map(|k| k.kanji_type())
  }

  pub fn get_pinyin(ucd: Option<&Ucd>) -> Pinyin {
    ucd.map_or_else(Pinyin::empty, |u| u.pinyin())
  }

  pub fn get_morohashi_id(ucd: Option<&Ucd>) -> Option<MorohashiId> {
    ucd.and_then(|u| u.morohashi())
  }

  pub fn get_nelson_ids(ucd: Option<&Ucd>) -> Vec<NelsonId> {
    ucd.map_or_else(Vec::new, |u| u.nelson_ids().to_vec())
  }

  /// the single code point form of a variant name (None when the name is
  /// already canonical)
  pub fn get_compatibility_name(&self, name: &str) -> Option<String> {
    self
      .ucd
      .find(name)
      .filter(|u| u.name() != name)
      .map(|u| u.name().to_string())
  }

  /// strokes from the catalog entry, falling back to the Unicode data
  pub fn get_strokes(&self, name: &str) -> Option<Strokes> {
    self
      .find_by_name(name)
      .map(|k| k.strokes())
      .or_else(|| self.ucd_strokes(name))
  }

  pub fn ucd_strokes(&self, name: &str) -> Option<Strokes> {
    self.ucd.find(name).map(|u| Strokes::with_variant(u.strokes(), u.variant_strokes()))
  }

  pub fn ucd_radical(&self, name: &str) -> Option<&Radical> {
    self
      .ucd
      .find(name)
      .and_then(|u| self.radicals.find_by_number(u.radical()))
  }

  /// comma-separated description of a Kanji's attributes
  pub fn kanji_info(&self, kanji: &Kanji) -> String {
    let mut parts = vec![];
    if let Some(radical) = self.radicals.find_by_number(kanji.radical()) {
      parts.push(format!("Rad {}", radical));
    }
    parts.push(format!("Strokes {}", kanji.strokes()));
    if !kanji.pinyin().is_empty() {
      parts.push(kanji.pinyin().to_string());
    }
    if let Some(grade) = kanji.grade() {
      parts.push(grade.to_string());
    }
    if let Some(level) = kanji.level() {
      parts.push(level.to_string());
    }
    if let Some(frequency) = kanji.frequency() {
      parts.push(format!("Frq {}", frequency));
    }
    if !kanji.old_names().is_empty() {
      parts.push(format!("Old {}", kanji.old_names().join("／")));
    }
    if let Some(new_name) = kanji.new_name() {
      parts.push(format!("New {}", new_name));
    }
    if let Some(kyu) = kanji.kyu() {
      parts.push(kyu.to_string());
    }
    parts.join(", ")
  }

  pub fn print_stats(&self) {
    let mut summary = String::new();
    for (t, list) in self.types.iter() {
      if !summary.is_empty() {
        summary.push(' ');
      }
      summary += &format!("{} {}", t, list.len());
    }
    info!("loaded {} kanji ({})", self.total(), summary);
    if self.debug_mode == DebugMode::Full {
      self.print_grades();
      self.print_breakdown("level", JlptLevel::ALL.iter().map(|&l| (l.name(), self.levels(l))));
      self.print_breakdown("kyu", KenteiKyu::ALL.iter().map(|&k| (k.name(), self.kyus(k))));
    }
  }

  fn print_grades(&self) {
    let mut all = 0;
    for (grade, list) in self.grades.iter() {
      if !list.is_empty() {
        let no_frequency =
          list.iter().filter(|&&i| self.kanji[i].frequency().is_none()).count();
        debug!("total for grade {}: {} (nf {})", grade, list.len(), no_frequency);
        all += list.len();
      }
    }
    debug!("total for all grades: {}", all);
  }

  fn print_breakdown<'a, I: Iterator<Item = (&'static str, &'a [KanjiIndex])>>(
    &self, what: &str, groups: I,
  ) {
    let mut all = 0;
    for (name, list) in groups {
      if !list.is_empty() {
        debug!("total for {} {}: {}", what, name, list.len());
        all += list.len();
      }
    }
    debug!("total for all {}s: {}", what, all);
  }
}

fn split_names(value: &str) -> Vec<String> {
  if value.is_empty() {
    vec![]
  } else {
    value.split(',').map(|s| s.to_string()).collect()
  }
}

/// Resolve the data directory: an explicit `-data <dir>` argument wins,
/// otherwise search up from the current directory and then up from the
/// program path (args[0]) for a valid 'data' directory.
pub fn get_data_dir(args: &[String]) -> Result<PathBuf, DataError> {
  for i in 1..args.len() {
    if args[i] == DATA_ARG {
      let dir = match args.get(i + 1) {
        Some(dir) => PathBuf::from(dir),
        None => {
          return Err(DataError::Usage(String::from(
            "'-data' must be followed by a directory name",
          )))
        }
      };
      if !dir.is_dir() {
        return Err(DataError::Usage(format!(
          "'{}' is not a valid directory", dir.display()
        )));
      }
      if !is_valid_data_dir(&dir) {
        return Err(DataError::Usage(format!(
          "'{}' does not contain {} expected '.txt' files", dir.display(),
          TEXT_FILES_IN_DATA_DIR
        )));
      }
      return Ok(dir);
    }
  }
  if let Ok(current) = std::env::current_dir() {
    if let Some(found) = search_up_for_data_dir(current) {
      return Ok(found);
    }
  }
  if let Some(arg0) = args.first() {
    if let Some(parent) = Path::new(arg0).parent() {
      if let Some(found) = search_up_for_data_dir(parent.to_path_buf()) {
        return Ok(found);
      }
    }
  }
  Err(DataError::Usage(format!(
    "couldn't find 'data' directory with {} expected '.txt' files - run in a directory where \
     'data' can be found or use '-data <dir>'",
    TEXT_FILES_IN_DATA_DIR
  )))
}

fn search_up_for_data_dir(start: PathBuf) -> Option<PathBuf> {
  let mut parent = start;
  loop {
    let data = parent.join("data");
    if data.is_dir() && is_valid_data_dir(&data) {
      return Some(data);
    }
    match parent.parent() {
      Some(p) if p != parent => parent = p.to_path_buf(),
      _ => return None,
    }
  }
}

fn is_valid_data_dir(dir: &Path) -> bool {
  let txt_files = match fs::read_dir(dir) {
    Ok(entries) => entries
      .filter_map(|e| e.ok())
      .filter(|e| e.path().extension().map_or(false, |ext| ext == "txt"))
      .count(),
    Err(_) => return false,
  };
  txt_files == TEXT_FILES_IN_DATA_DIR && dir.join("jlpt").is_dir() && dir.join("kentei").is_dir()
}

/// only one of `-debug` (full) and `-info` (summary) can be given
pub fn get_debug_mode(args: &[String]) -> Result<DebugMode, DataError> {
  let mut result = DebugMode::Off;
  for arg in args.iter().skip(1) {
    let mode = if arg == DEBUG_ARG {
      DebugMode::Full
    } else if arg == INFO_ARG {
      DebugMode::Info
    } else {
      continue;
    };
    if result != DebugMode::Off {
      return Err(DataError::Usage(format!(
        "can only specify one '{}' or '{}' option", DEBUG_ARG, INFO_ARG
      )));
    }
    result = mode;
  }
  Ok(result)
}

/// Next argument position after skipping the options consumed by the data
/// loader (`-data` plus its directory, `-debug` and `-info`).
pub fn next_arg(args: &[String], current: usize) -> usize {
  let result = current + 1;
  if let Some(arg) = args.get(result) {
    if arg == DATA_ARG {
      return next_arg(args, result + 1);
    }
    if arg == DEBUG_ARG || arg == INFO_ARG {
      return next_arg(args, result);
    }
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs::{create_dir_all, File};
  use std::io::Write;

  const UCD_HEADER: &str = "Code\tName\tBlock\tVersion\tRadical\tStrokes\tVStrokes\tPinyin\t\
                            MorohashiId\tNelsonIds\tSources\tJSource\tJoyo\tJinmei\tLinkCodes\t\
                            LinkNames\tLinkType\tMeaning\tOn\tKun\n";

  fn write_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(&path).unwrap();
    write!(f, "{}", content).unwrap();
  }

  // A small but complete data directory: three radicals, eight ucd entries
  // covering every kanji type, and all the official lists.
  fn build_data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("kanjitools_data_tests").join(name);
    if dir.exists() {
      std::fs::remove_dir_all(&dir).unwrap();
    }
    create_dir_all(&dir).unwrap();
    let ucd = format!(
      "{}{}{}{}{}{}{}{}{}",
      UCD_HEADER,
      "4E00\t一\tCJK\t1.1\t1\t1\t\tyī\t1\t1\t\tJ0-306C\tY\t\t\t\t\tone\tICHI ITSU\tHITO-TSU\n",
      "4E98\t亘\tCJK\t1.1\t2\t6\t\t\t262\t80\t\tJ0-4F4B\tY\t\t\t\t\tspan\tKOU KAN\tWATA-RU\n",
      "4E99\t亙\tCJK\t1.1\t2\t6\t\t\t\t\t\tJ0-5041\t\tY\t4E98\t亘\tJinmei*\tspan\tKOU\t\n",
      "4E91\t云\tCJK\t1.1\t2\t4\t\t\t\t\t\tJ0-313E\t\tY\t\t\t\tsay\tUN\tI-U\n",
      "9719\t霙\tCJK\t1.1\t3\t16\t\t\t\t\t\tJ0-7071\t\t\t\t\t\tsleet\tEI YOU\tMIZORE\n",
      "53EA\t只\tCJK\t1.1\t3\t5\t\t\t\t\t\tJ0-427E\t\t\t\t\t\tonly\tSHI\tTADA\n",
      "7259\t牙\tCJK\t1.1\t3\t4\t\t\t\t\t\tJ0-3267\t\t\t\t\t\ttusk\tGA\tKIBA\n",
      "5451\t呑\tCJK\t1.1\t3\t7\t\t\t3330\t713\t\tJ0-465D\t\t\t\t\t\tdrink\tDON\tNO-MU\n",
    );
    write_file(&dir, "ucd.txt", &ucd);
    write_file(
      &dir,
      "radicals.txt",
      "Number\tName\tLongName\tReading\n\
       1\t一\t一部（いちぶ）\tイチ\n\
       2\t二\t二部（にぶ）\tニ\n\
       3\t雨\t雨部（あめぶ）\tあめ\n",
    );
    write_file(
      &dir,
      "jouyou.txt",
      "Number\tName\tRadical\tOldNames\tYear\tStrokes\tGrade\tMeaning\tReading\n\
       1\t一\t一\t\t\t1\tG1\tone\tイチ、イツ、ひと-つ\n\
       2\t亘\t二\t\t2010\t6\tS\tspan\tコウ、カン、わた-る\n",
    );
    write_file(
      &dir,
      "jinmei.txt",
      "Number\tName\tRadical\tOldNames\tYear\tReason\tReading\n\
       1\t云\t二\t\t2004\tPrint\tウン、い-う\n",
    );
    write_file(
      &dir,
      "extra.txt",
      "Number\tName\tRadical\tStrokes\tMeaning\tReading\n\
       1\t霙\t雨\t16\tsleet\tエイ、ヨウ、みぞれ\n",
    );
    write_file(&dir, "linked-jinmei.txt", "亘\t亙\n");
    write_file(&dir, "frequency.txt", "亘\n一\n只\n");
    write_file(&dir, "frequency-readings.txt", "Name\tReading\n只\tシ、ただ\n");
    write_file(&dir, "jlpt/n5.txt", "一\n");
    for level in &["n4", "n3", "n2", "n1"] {
      write_file(&dir, &format!("jlpt/{}.txt", level), "");
    }
    write_file(&dir, "kentei/k10.txt", "一\n");
    write_file(&dir, "kentei/kj1.txt", "亘\n云\n");
    write_file(&dir, "kentei/k1.txt", "霙\n牙\n");
    for kyu in &["k9", "k8", "k7", "k6", "k5", "k4", "k3", "kj2", "k2"] {
      write_file(&dir, &format!("kentei/{}.txt", kyu), "");
    }
    dir
  }

  fn load(name: &str) -> KanjiData {
    KanjiData::new(build_data_dir(name), DebugMode::Off).unwrap()
  }

  #[test]
  fn test_jouyou_kanji() {
    let data = load("jouyou");
    assert_eq!(data.error_count(), 0);
    let one = data.find_by_name("一").unwrap();
    assert_eq!(one.kanji_type(), KanjiType::Jouyou);
    assert_eq!(one.frequency(), Some(2));
    assert_eq!(one.grade(), Some(Grade::G1));
    assert_eq!(one.level(), Some(JlptLevel::N5));
    assert_eq!(one.kyu(), Some(KenteiKyu::K10));
    assert_eq!(one.radical(), 1);
    assert_eq!(one.strokes().value(), 1);
    assert_eq!(one.meaning(), "one");
    assert_eq!(one.pinyin().to_string(), "yī");
    assert_eq!(one.morohashi().unwrap().to_string(), "1");
    assert_eq!(one.year(), None);
    assert_eq!(one.qualified_name(), "一.");
    assert_eq!(data.get_type("一"), Some(KanjiType::Jouyou));
  }

  #[test]
  fn test_linked_jinmei() {
    let data = load("linked_jinmei");
    let variant = data.find_by_name("亙").unwrap();
    assert_eq!(variant.kanji_type(), KanjiType::LinkedJinmei);
    let link = variant.link().unwrap();
    assert_eq!(data.kanji(link).name(), "亘");
    // readings and meaning come from the linked Jouyou kanji
    assert_eq!(variant.reading(), "コウ、カン、わた-る");
    assert_eq!(variant.meaning(), "span");
    assert_eq!(variant.new_name(), Some("亘"));
    assert!(variant.frequency().is_none());
    assert!(variant.level().is_none());
    assert!(variant.kyu().is_none());
  }

  #[test]
  fn test_jinmei_kanji() {
    let data = load("jinmei");
    let k = data.find_by_name("云").unwrap();
    assert_eq!(k.kanji_type(), KanjiType::Jinmei);
    assert_eq!(k.reason(), Some(JinmeiReason::Print));
    assert_eq!(k.year(), Some(2004));
    assert_eq!(k.strokes().value(), 4); // from the Unicode data
    assert_eq!(k.meaning(), "say"); // also from the Unicode data
    assert_eq!(k.reading(), "ウン、い-う");
    assert_eq!(k.kyu(), Some(KenteiKyu::KJ1));
    assert_eq!(k.qualified_name(), "云^");
  }

  #[test]
  fn test_extra_kanji() {
    let data = load("extra");
    let k = data.find_by_name("霙").unwrap();
    assert_eq!(k.kanji_type(), KanjiType::Extra);
    assert_eq!(k.strokes().value(), 16);
    assert_eq!(k.kyu(), Some(KenteiKyu::K1));
    assert_eq!(k.meaning(), "sleet");
    assert_eq!(k.reading(), "エイ、ヨウ、みぞれ");
    assert_eq!(k.qualified_name(), "霙+");
    assert_eq!(data.kanji_info(k), "Rad 雨(3), Strokes 16, K1");
  }

  #[test]
  fn test_frequency_kanji() {
    let data = load("frequency");
    let k = data.find_by_name("只").unwrap();
    assert_eq!(k.kanji_type(), KanjiType::Frequency);
    assert_eq!(k.frequency(), Some(3));
    // reading comes from the frequency-readings override
    assert_eq!(k.reading(), "シ、ただ");
    assert_eq!(k.qualified_name(), "只\"");
  }

  #[test]
  fn test_kentei_kanji() {
    let data = load("kentei");
    let k = data.find_by_name("牙").unwrap();
    assert_eq!(k.kanji_type(), KanjiType::Kentei);
    assert_eq!(k.kyu(), Some(KenteiKyu::K1));
    // readings are built from the Unicode data (On then Kun)
    assert_eq!(k.reading(), "ガ、きば");
    assert_eq!(k.qualified_name(), "牙#");
  }

  #[test]
  fn test_ucd_kanji() {
    let data = load("ucd");
    let k = data.find_by_name("呑").unwrap();
    assert_eq!(k.kanji_type(), KanjiType::Ucd);
    assert_eq!(k.morohashi().unwrap().to_string(), "3330");
    assert_eq!(k.nelson_ids(), &[713]);
    assert_eq!(k.qualified_name(), "呑*");
  }

  #[test]
  fn test_find_by_frequency() {
    let data = load("by_frequency");
    assert_eq!(data.max_frequency(), 4);
    assert_eq!(data.find_by_frequency(1).unwrap().name(), "亘");
    assert_eq!(data.find_by_frequency(2).unwrap().name(), "一");
    assert_eq!(data.find_by_frequency(3).unwrap().name(), "只");
    assert!(data.find_by_frequency(0).is_none());
    assert!(data.find_by_frequency(4).is_none());
    assert_eq!(data.frequency_list(0).len(), 3);
    assert_eq!(data.frequency_list(4).len(), 0);
  }

  #[test]
  fn test_find_by_ids() {
    let data = load("by_ids");
    let result = data.find_by_morohashi_id("3330");
    assert_eq!(result.len(), 1);
    assert_eq!(data.kanji(result[0]).name(), "呑");
    assert!(data.find_by_morohashi_id("9999").is_empty());
    assert!(data.find_by_morohashi_id("bad").is_empty());
    let result = data.find_by_nelson_id(713);
    assert_eq!(result.len(), 1);
    assert_eq!(data.kanji(result[0]).name(), "呑");
    assert!(data.find_by_nelson_id(999).is_empty());
  }

  #[test]
  fn test_type_and_group_indexes() {
    let data = load("groups");
    assert_eq!(data.types(KanjiType::Jouyou).len(), 2);
    assert_eq!(data.types(KanjiType::Jinmei).len(), 1);
    assert_eq!(data.types(KanjiType::LinkedJinmei).len(), 1);
    assert_eq!(data.types(KanjiType::Extra).len(), 1);
    assert_eq!(data.types(KanjiType::Frequency).len(), 1);
    assert_eq!(data.types(KanjiType::Kentei).len(), 1);
    assert_eq!(data.types(KanjiType::Ucd).len(), 1);
    assert_eq!(data.total(), 8);
    assert_eq!(data.grades(Grade::G1).len(), 1);
    assert_eq!(data.grades(Grade::S).len(), 1);
    assert_eq!(data.levels(JlptLevel::N5).len(), 1);
    assert_eq!(data.levels(JlptLevel::N1).len(), 0);
    assert_eq!(data.kyus(KenteiKyu::K10).len(), 1);
    assert_eq!(data.kyus(KenteiKyu::KJ1).len(), 2);
    assert_eq!(data.kyus(KenteiKyu::K1).len(), 2);
  }

  #[test]
  fn test_ucd_queries() {
    let data = load("queries");
    assert_eq!(data.ucd_radical("霙").unwrap().name(), "雨");
    assert_eq!(data.ucd_strokes("霙").unwrap().value(), 16);
    assert_eq!(data.get_strokes("一").unwrap().value(), 1);
    assert!(data.get_strokes("犬").is_none());
    assert_eq!(KanjiData::get_pinyin(data.ucd().find("一")).to_string(), "yī");
    assert_eq!(
      KanjiData::get_morohashi_id(data.ucd().find("一")).unwrap().to_string(),
      "1"
    );
    assert_eq!(KanjiData::get_nelson_ids(data.ucd().find("一")), vec![1]);
    assert_eq!(KanjiData::get_nelson_ids(None), Vec::<NelsonId>::new());
  }

  #[test]
  fn test_missing_jlpt_entry_is_a_hard_error() {
    let dir = build_data_dir("bad_jlpt");
    write_file(&dir, "jlpt/n1.txt", "犬\n");
    let err = KanjiData::new(&dir, DebugMode::Off).unwrap_err().to_string();
    assert!(err.contains("'犬' from n1.txt not found in the catalog"), "{}", err);
  }

  #[test]
  fn test_get_debug_mode() {
    let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    assert_eq!(get_debug_mode(&args(&["prog"])).unwrap(), DebugMode::Off);
    assert_eq!(get_debug_mode(&args(&["prog", "-debug"])).unwrap(), DebugMode::Full);
    assert_eq!(get_debug_mode(&args(&["prog", "-info"])).unwrap(), DebugMode::Info);
    assert!(get_debug_mode(&args(&["prog", "-debug", "-info"])).is_err());
  }

  #[test]
  fn test_get_data_dir_with_arg() {
    let dir = build_data_dir("data_dir_arg");
    let args = vec![String::from("prog"), String::from("-data"), dir.display().to_string()];
    assert_eq!(get_data_dir(&args).unwrap(), dir);
    let args = vec![String::from("prog"), String::from("-data")];
    assert!(get_data_dir(&args).is_err());
    let args = vec![
      String::from("prog"),
      String::from("-data"),
      String::from("/no/such/directory"),
    ];
    assert!(get_data_dir(&args).is_err());
  }

  #[test]
  fn test_next_arg() {
    let args: Vec<String> = ["prog", "-data", "dir", "-info", "other"]
      .iter()
      .map(|s| s.to_string())
      .collect();
    // skips '-data dir' and '-info', landing on 'other'
    assert_eq!(next_arg(&args, 0), 4);
    assert_eq!(next_arg(&args, 4), 5);
    let args: Vec<String> = ["prog", "first"].iter().map(|s| s.to_string()).collect();
    assert_eq!(next_arg(&args, 0), 1);
  }
}
