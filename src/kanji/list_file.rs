use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use thiserror::Error;

use super::enums::{JlptLevel, KenteiKyu};

#[derive(Error, Debug)]
pub enum ListFileError {
  #[error("{0}")]
  Format(String),
  #[error("{0}")]
  IOError(#[from] std::io::Error),
}

/// Reader for the one-name-per-line list files (frequency, JLPT levels and
/// Kentei kyus). Blank lines and '#' comments are skipped and multiple
/// space-separated names per line are allowed. Names must be unique within
/// the file and, when a shared set is passed in, across the whole group of
/// files (a Kanji can't be in two JLPT levels).
#[derive(Debug)]
pub struct ListFile {
  name: String,
  list: Vec<String>,
  index: HashMap<String, usize>,
  level: Option<JlptLevel>,
  kyu: Option<KenteiKyu>,
}

impl ListFile {
  pub fn load<P: AsRef<Path>>(
    path: P, group: Option<&mut HashSet<String>>,
  ) -> Result<ListFile, ListFileError> {
    ListFile::load_tagged(path, group, None, None)
  }

  pub fn load_level<P: AsRef<Path>>(
    path: P, level: JlptLevel, group: &mut HashSet<String>,
  ) -> Result<ListFile, ListFileError> {
    ListFile::load_tagged(path, Some(group), Some(level), None)
  }

  pub fn load_kyu<P: AsRef<Path>>(
    path: P, kyu: KenteiKyu, group: &mut HashSet<String>,
  ) -> Result<ListFile, ListFileError> {
    ListFile::load_tagged(path, Some(group), None, Some(kyu))
  }

  fn load_tagged<P: AsRef<Path>>(
    path: P, mut group: Option<&mut HashSet<String>>, level: Option<JlptLevel>,
    kyu: Option<KenteiKyu>,
  ) -> Result<ListFile, ListFileError> {
    let path = path.as_ref();
    let name = path
      .file_name()
      .map(|f| f.to_string_lossy().to_string())
      .unwrap_or_else(|| path.to_string_lossy().to_string());
    let only_spaces = Regex::new(r"^\s*$").unwrap();
    let mut result =
      ListFile { name, list: vec![], index: HashMap::new(), level, kyu };
    let reader = BufReader::new(File::open(path).map_err(|e| {
      ListFileError::Format(format!("{} - file: {}", e, result.name))
    })?);
    for (line_number, line) in reader.lines().enumerate() {
      let line = line?;
      if only_spaces.is_match(&line) || line.starts_with('#') {
        continue;
      }
      for token in line.split_whitespace() {
        let error = |msg: String| {
          ListFileError::Format(format!(
            "{} - file: {}, line: {}", msg, result.name, line_number + 1
          ))
        };
        if result.index.contains_key(token) {
          return Err(error(format!("duplicate entry '{}'", token)));
        }
        if let Some(group) = group.as_mut() {
          if !group.insert(token.to_string()) {
            return Err(error(format!("'{}' already in another list", token)));
          }
        }
        result.index.insert(token.to_string(), result.list.len());
        result.list.push(token.to_string());
      }
    }
    Ok(result)
  }

  pub fn file_name(&self) -> &str {
    &self.name
  }

  pub fn list(&self) -> &[String] {
    &self.list
  }

  pub fn exists(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  /// zero-based position of `name` in the file
  pub fn index_of(&self, name: &str) -> Option<usize> {
    self.index.get(name).copied()
  }

  pub fn level(&self) -> Option<JlptLevel> {
    self.level
  }

  pub fn kyu(&self) -> Option<KenteiKyu> {
    self.kyu
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs::create_dir_all;
  use std::io::Write;
  use std::path::PathBuf;

  fn write_list(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("kanjitools_list_file_tests");
    create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let mut f = File::create(&path).unwrap();
    write!(f, "{}", content).unwrap();
    path
  }

  #[test]
  fn test_load() {
    let path = write_list("n5.txt", "一\n二\n\n# comment\n三 四\n");
    let mut group = HashSet::new();
    let f = ListFile::load_level(&path, JlptLevel::N5, &mut group).unwrap();
    assert_eq!(f.file_name(), "n5.txt");
    assert_eq!(f.list(), &["一", "二", "三", "四"]);
    assert!(f.exists("三"));
    assert!(!f.exists("五"));
    assert_eq!(f.index_of("一"), Some(0));
    assert_eq!(f.index_of("四"), Some(3));
    assert_eq!(f.index_of("五"), None);
    assert_eq!(f.level(), Some(JlptLevel::N5));
    assert_eq!(f.kyu(), None);
  }

  #[test]
  fn test_duplicate_in_file() {
    let path = write_list("dup.txt", "一\n一\n");
    let err = ListFile::load(&path, None).unwrap_err().to_string();
    assert_eq!(err, "duplicate entry '一' - file: dup.txt, line: 2");
  }

  #[test]
  fn test_duplicate_across_group() {
    let n5 = write_list("group_n5.txt", "一\n");
    let n4 = write_list("group_n4.txt", "一\n");
    let mut group = HashSet::new();
    ListFile::load_level(&n5, JlptLevel::N5, &mut group).unwrap();
    let err = ListFile::load_level(&n4, JlptLevel::N4, &mut group).unwrap_err().to_string();
    assert_eq!(err, "'一' already in another list - file: group_n4.txt, line: 1");
  }

  #[test]
  fn test_separate_groups_can_share_names() {
    let level = write_list("share_n5.txt", "一\n");
    let kyu = write_list("share_k10.txt", "一\n");
    let mut level_group = HashSet::new();
    let mut kyu_group = HashSet::new();
    ListFile::load_level(&level, JlptLevel::N5, &mut level_group).unwrap();
    let f = ListFile::load_kyu(&kyu, KenteiKyu::K10, &mut kyu_group).unwrap();
    assert_eq!(f.kyu(), Some(KenteiKyu::K10));
  }

  #[test]
  fn test_empty_file() {
    let path = write_list("empty.txt", "");
    let f = ListFile::load(&path, None).unwrap();
    assert!(f.list().is_empty());
    assert_eq!(f.level(), None);
  }

  #[test]
  fn test_missing_file() {
    let path = std::env::temp_dir().join("kanjitools_list_file_tests/missing.txt");
    assert!(ListFile::load(&path, None).is_err());
  }
}
