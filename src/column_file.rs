use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::sync::Mutex;

use lazy_static::lazy_static;
use thiserror::Error;

use crate::utf8::Code;

lazy_static! {
  // process-wide name -> number registry so columns with the same name are
  // interchangeable across ColumnFile instances
  static ref ALL_COLUMNS: Mutex<HashMap<String, usize>> = Mutex::new(HashMap::new());
}

/// A named column for use with `ColumnFile`. Columns with the same name get
/// the same number, different names get different numbers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Column {
  name: String,
  number: usize,
}

impl Column {
  pub fn new(name: &str) -> Column {
    let mut all = ALL_COLUMNS.lock().unwrap();
    let next = all.len();
    let number = *all.entry(name.to_string()).or_insert(next);
    Column { name: name.to_string(), number }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn number(&self) -> usize {
    self.number
  }
}

#[derive(Error, Debug)]
pub enum ColumnFileError {
  #[error("{0}")]
  Format(String),
}

type Result<T> = std::result::Result<T, ColumnFileError>;

/// Reader for delimiter-separated files with a header row. The header is
/// validated against the expected columns on construction and every row must
/// have exactly the expected number of fields. Getters convert values with
/// errors that carry file, row, column and value context.
pub struct ColumnFile {
  name: String,
  lines: Lines<BufReader<File>>,
  row_values: Vec<String>,
  column_to_position: Vec<Option<usize>>,
  current_row: u32,
  delim: char,
}

impl ColumnFile {
  pub fn new<P: AsRef<Path>>(path: P, columns: &[Column]) -> Result<ColumnFile> {
    ColumnFile::with_delim(path, columns, '\t')
  }

  pub fn with_delim<P: AsRef<Path>>(
    path: P, columns: &[Column], delim: char,
  ) -> Result<ColumnFile> {
    let path = path.as_ref();
    let name = path
      .file_name()
      .map(|f| f.to_string_lossy().to_string())
      .unwrap_or_else(|| path.to_string_lossy().to_string());
    let error = |msg: String| ColumnFileError::Format(format!("{} - file: {}", msg, name));
    if columns.is_empty() {
      return Err(error(String::from("must specify at least one column")));
    }
    if !path.exists() {
      return Err(error(String::from("doesn't exist")));
    }
    if !path.is_file() {
      return Err(error(String::from("not regular file")));
    }
    let mut col_names: HashMap<&str, &Column> = HashMap::new();
    for c in columns {
      if col_names.insert(c.name(), c).is_some() {
        return Err(error(format!("duplicate column '{}'", c.name())));
      }
    }
    let mut lines = BufReader::new(
      File::open(path).map_err(|e| error(e.to_string()))?,
    )
    .lines();
    let header = match lines.next() {
      Some(line) => line.map_err(|e| error(e.to_string()))?,
      None => return Err(error(String::from("missing header row"))),
    };
    let mut column_to_position = vec![None; ALL_COLUMNS.lock().unwrap().len()];
    for (pos, cell) in header.split(delim).enumerate() {
      match col_names.remove(cell) {
        Some(c) => column_to_position[c.number()] = Some(pos),
        None => {
          let msg = if columns.iter().any(|c| c.name() == cell) {
            format!("duplicate header '{}'", cell)
          } else {
            format!("unrecognized header '{}'", cell)
          };
          return Err(error(msg));
        }
      }
    }
    if col_names.len() == 1 {
      let missing = col_names.keys().next().unwrap();
      return Err(error(format!("column '{}' not found", missing)));
    }
    if col_names.len() > 1 {
      let mut names: Vec<&str> = col_names.keys().copied().collect();
      names.sort_unstable();
      let list = names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ");
      return Err(error(format!("{} columns not found: {}", names.len(), list)));
    }
    Ok(ColumnFile {
      name,
      lines,
      row_values: vec![String::new(); columns.len()],
      column_to_position,
      current_row: 0,
      delim,
    })
  }

  pub fn file_name(&self) -> &str {
    &self.name
  }

  pub fn columns(&self) -> usize {
    self.row_values.len()
  }

  pub fn current_row(&self) -> u32 {
    self.current_row
  }

  fn error(&self, msg: &str) -> ColumnFileError {
    let mut full = format!("{} - file: {}", msg, self.name);
    if self.current_row > 0 {
      full += &format!(", row: {}", self.current_row);
    }
    ColumnFileError::Format(full)
  }

  fn conversion_error(&self, msg: &str, column: &Column, value: &str) -> ColumnFileError {
    self.error(&format!("{}, column: '{}', value: '{}'", msg, column.name(), value))
  }

  /// an error with the current file/row context, for callers layering their
  /// own validation on top of the typed getters
  pub fn row_error(&self, msg: &str) -> ColumnFileError {
    self.error(msg)
  }

  /// Read the next row, returning false at end of file. A trailing empty
  /// column is allowed when the line ends with the delimiter.
  pub fn next_row(&mut self) -> Result<bool> {
    let line = match self.lines.next() {
      None => return Ok(false),
      Some(line) => {
        self.current_row += 1;
        line.map_err(|e| self.error(&e.to_string()))?
      }
    };
    let mut pos = 0;
    for field in line.split(self.delim) {
      if pos == self.row_values.len() {
        return Err(self.error("too many columns"));
      }
      self.row_values[pos] = field.to_string();
      pos += 1;
    }
    if pos < self.row_values.len() {
      return Err(self.error("not enough columns"));
    }
    Ok(true)
  }

  pub fn get(&self, column: &Column) -> Result<&str> {
    if self.current_row == 0 {
      return Err(self.error("'next_row' must be called before calling 'get'"));
    }
    if column.number() >= self.column_to_position.len() {
      return Err(self.error(&format!("unrecognized column '{}'", column.name())));
    }
    match self.column_to_position[column.number()] {
      Some(pos) => Ok(&self.row_values[pos]),
      None => Err(self.error(&format!("invalid column '{}'", column.name()))),
    }
  }

  pub fn is_empty(&self, column: &Column) -> Result<bool> {
    Ok(self.get(column)?.is_empty())
  }

  /// Parse an unsigned number, enforcing `max` when it's non-zero.
  pub fn get_u64(&self, column: &Column, max: u64) -> Result<u64> {
    let s = self.get(column)?;
    let result: u64 = s
      .parse()
      .map_err(|_| self.conversion_error("failed to convert to unsigned number", column, s))?;
    if max > 0 && result > max {
      return Err(self.conversion_error(&format!("exceeded max value of {}", max), column, s));
    }
    Ok(result)
  }

  pub fn get_u8(&self, column: &Column) -> Result<u8> {
    self.get_u64(column, u64::from(u8::max_value())).map(|x| x as u8)
  }

  pub fn get_u16(&self, column: &Column) -> Result<u16> {
    self.get_u64(column, u64::from(u16::max_value())).map(|x| x as u16)
  }

  /// Like `get_u64`, but an empty value returns `None`.
  pub fn get_opt_u64(&self, column: &Column, max: u64) -> Result<Option<u64>> {
    if self.get(column)?.is_empty() {
      Ok(None)
    } else {
      self.get_u64(column, max).map(Some)
    }
  }

  pub fn get_opt_u8(&self, column: &Column) -> Result<Option<u8>> {
    Ok(self.get_opt_u64(column, u64::from(u8::max_value()))?.map(|x| x as u8))
  }

  pub fn get_opt_u16(&self, column: &Column) -> Result<Option<u16>> {
    Ok(self.get_opt_u64(column, u64::from(u16::max_value()))?.map(|x| x as u16))
  }

  /// `Y`/`T` are true, `N`/`F` and empty are false, anything else fails.
  pub fn get_bool(&self, column: &Column) -> Result<bool> {
    let s = self.get(column)?;
    match s {
      "Y" | "T" => Ok(true),
      "N" | "F" | "" => Ok(false),
      _ => Err(self.conversion_error("failed to convert to bool", column, s)),
    }
  }

  /// 4 or 5 upper-case hex digits parsed into a code point.
  pub fn get_code(&self, column: &Column) -> Result<Code> {
    let s = self.get(column)?;
    if s.len() < 4 || s.len() > 5 {
      return Err(self.conversion_error(
        "failed to convert to Code, size must be 4 or 5",
        column,
        s,
      ));
    }
    if !s.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)) {
      return Err(self.conversion_error("failed to convert to Code, invalid hex", column, s));
    }
    Ok(Code::from_str_radix(s, 16).unwrap())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs::{create_dir_all, remove_file, File};
  use std::io::Write;
  use std::path::PathBuf;

  fn test_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("kanjitools_column_file_tests");
    create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    if path.is_file() {
      remove_file(&path).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    write!(f, "{}", content).unwrap();
    f.flush().unwrap();
    path
  }

  fn err(result: Result<ColumnFile>) -> String {
    match result {
      Ok(_) => panic!("expected an error"),
      Err(e) => e.to_string(),
    }
  }

  #[test]
  fn test_columns_get_stable_numbers() {
    let a = Column::new("TestA");
    let b = Column::new("TestB");
    let a2 = Column::new("TestA");
    assert_ne!(a.number(), b.number());
    assert_eq!(a.number(), a2.number());
    assert_eq!(a, a2);
  }

  #[test]
  fn test_single_column_file() {
    let path = test_file("single.txt", "Col\nVal\n");
    let col = Column::new("Col");
    let mut f = ColumnFile::new(&path, &[col.clone()]).unwrap();
    assert_eq!(f.file_name(), "single.txt");
    assert_eq!(f.columns(), 1);
    assert_eq!(f.current_row(), 0);
    assert!(f.next_row().unwrap());
    assert_eq!(f.current_row(), 1);
    assert_eq!(f.get(&col).unwrap(), "Val");
    assert!(!f.next_row().unwrap());
    assert_eq!(f.current_row(), 1);
  }

  #[test]
  fn test_no_columns_error() {
    let path = test_file("no_columns.txt", "Col\n");
    assert_eq!(
      err(ColumnFile::new(&path, &[])),
      "must specify at least one column - file: no_columns.txt"
    );
  }

  #[test]
  fn test_missing_file_error() {
    let path = std::env::temp_dir().join("kanjitools_column_file_tests/never_created.txt");
    assert_eq!(
      err(ColumnFile::new(&path, &[Column::new("Col")])),
      "doesn't exist - file: never_created.txt"
    );
  }

  #[test]
  fn test_not_regular_file_error() {
    let dir = std::env::temp_dir().join("kanjitools_column_file_tests");
    create_dir_all(&dir).unwrap();
    let msg = err(ColumnFile::new(&dir, &[Column::new("Col")]));
    assert_eq!(msg, "not regular file - file: kanjitools_column_file_tests");
  }

  #[test]
  fn test_missing_header_row_error() {
    let path = test_file("empty.txt", "");
    assert_eq!(
      err(ColumnFile::new(&path, &[Column::new("Col")])),
      "missing header row - file: empty.txt"
    );
  }

  #[test]
  fn test_unrecognized_header_error() {
    let path = test_file("unrecognized.txt", "A\n");
    assert_eq!(
      err(ColumnFile::new(&path, &[Column::new("B")])),
      "unrecognized header 'A' - file: unrecognized.txt"
    );
  }

  #[test]
  fn test_duplicate_header_error() {
    let path = test_file("dup_header.txt", "Col\tCol\n");
    assert_eq!(
      err(ColumnFile::new(&path, &[Column::new("Col")])),
      "duplicate header 'Col' - file: dup_header.txt"
    );
  }

  #[test]
  fn test_duplicate_column_error() {
    let path = test_file("dup_column.txt", "\n");
    let c1 = Column::new("Col1");
    let c2 = Column::new("Col2");
    assert_eq!(
      err(ColumnFile::new(&path, &[c1.clone(), c2, c1])),
      "duplicate column 'Col1' - file: dup_column.txt"
    );
  }

  #[test]
  fn test_one_missing_column_error() {
    let path = test_file("one_missing.txt", "Col1\n");
    assert_eq!(
      err(ColumnFile::new(&path, &[Column::new("Col1"), Column::new("Col2")])),
      "column 'Col2' not found - file: one_missing.txt"
    );
  }

  #[test]
  fn test_multiple_missing_columns_error() {
    let path = test_file("two_missing.txt", "Col1\tCol3\n");
    let columns = [
      Column::new("Col1"),
      Column::new("Col2"),
      Column::new("Col3"),
      Column::new("Col4"),
    ];
    assert_eq!(
      err(ColumnFile::new(&path, &columns)),
      "2 columns not found: 'Col2', 'Col4' - file: two_missing.txt"
    );
  }

  #[test]
  fn test_header_order_can_differ_from_columns() {
    let path = test_file("order.txt", "Col1\tCol2\tCol3\nVal1\tVal2\tVal3\n");
    let (c1, c2, c3) = (Column::new("Col1"), Column::new("Col2"), Column::new("Col3"));
    let mut f = ColumnFile::new(&path, &[c3.clone(), c2.clone(), c1.clone()]).unwrap();
    assert!(f.next_row().unwrap());
    assert_eq!(f.get(&c1).unwrap(), "Val1");
    assert_eq!(f.get(&c2).unwrap(), "Val2");
    assert_eq!(f.get(&c3).unwrap(), "Val3");
  }

  #[test]
  fn test_non_default_delimiter_and_trailing_empty() {
    let path = test_file("delim.txt", "Col1|Col2|Col3\nVal1|Val2|\n");
    let (c1, c2, c3) = (Column::new("Col1"), Column::new("Col2"), Column::new("Col3"));
    let mut f =
      ColumnFile::with_delim(&path, &[c1.clone(), c2.clone(), c3.clone()], '|').unwrap();
    assert!(f.next_row().unwrap());
    assert_eq!(f.get(&c1).unwrap(), "Val1");
    assert_eq!(f.get(&c2).unwrap(), "Val2");
    assert_eq!(f.get(&c3).unwrap(), "");
  }

  #[test]
  fn test_empty_values() {
    let path = test_file("empty_values.txt", "Col1\tCol2\tCol3\tCol4\n\tVal2\t\t\n");
    let columns: Vec<Column> =
      ["Col1", "Col2", "Col3", "Col4"].iter().map(|n| Column::new(n)).collect();
    let mut f = ColumnFile::new(&path, &columns).unwrap();
    assert!(f.next_row().unwrap());
    assert!(f.is_empty(&columns[0]).unwrap());
    assert!(!f.is_empty(&columns[1]).unwrap());
    assert!(f.is_empty(&columns[2]).unwrap());
    assert!(f.is_empty(&columns[3]).unwrap());
    assert_eq!(f.get(&columns[1]).unwrap(), "Val2");
  }

  #[test]
  fn test_wrong_column_counts() {
    let (c1, c2, c3) = (Column::new("Col1"), Column::new("Col2"), Column::new("Col3"));
    let columns = [c1, c2, c3];
    let path = test_file("not_enough.txt", "Col1\tCol2\tCol3\nVal1\tVal2\n");
    let mut f = ColumnFile::new(&path, &columns).unwrap();
    assert_eq!(
      f.next_row().unwrap_err().to_string(),
      "not enough columns - file: not_enough.txt, row: 1"
    );
    let path = test_file("too_many.txt", "Col1\tCol2\tCol3\nVal1\tVal2\tVal3\tVal4\n");
    let mut f = ColumnFile::new(&path, &columns).unwrap();
    assert_eq!(
      f.next_row().unwrap_err().to_string(),
      "too many columns - file: too_many.txt, row: 1"
    );
  }

  #[test]
  fn test_get_before_next_row_error() {
    let path = test_file("get_before.txt", "Col\n");
    let col = Column::new("Col");
    let f = ColumnFile::new(&path, &[col.clone()]).unwrap();
    assert_eq!(
      f.get(&col).unwrap_err().to_string(),
      "'next_row' must be called before calling 'get' - file: get_before.txt"
    );
  }

  #[test]
  fn test_get_invalid_column_error() {
    let path = test_file("invalid_column.txt", "Col\nVal\n");
    let col = Column::new("Col");
    let other = Column::new("Not Included");
    let mut f = ColumnFile::new(&path, &[col]).unwrap();
    assert!(f.next_row().unwrap());
    assert_eq!(
      f.get(&other).unwrap_err().to_string(),
      "invalid column 'Not Included' - file: invalid_column.txt, row: 1"
    );
  }

  #[test]
  fn test_get_u64() {
    let path = test_file("u64.txt", "Col\n123\nblah\n124\n");
    let col = Column::new("Col");
    let mut f = ColumnFile::new(&path, &[col.clone()]).unwrap();
    assert!(f.next_row().unwrap());
    assert_eq!(f.get_u64(&col, 0).unwrap(), 123);
    assert_eq!(f.get_u64(&col, 123).unwrap(), 123);
    assert!(f.next_row().unwrap());
    assert_eq!(
      f.get_u64(&col, 0).unwrap_err().to_string(),
      "failed to convert to unsigned number - file: u64.txt, row: 2, column: 'Col', value: 'blah'"
    );
    assert!(f.next_row().unwrap());
    assert_eq!(
      f.get_u64(&col, 123).unwrap_err().to_string(),
      "exceeded max value of 123 - file: u64.txt, row: 3, column: 'Col', value: '124'"
    );
  }

  #[test]
  fn test_get_u8_and_u16() {
    let path = test_file("u8.txt", "Col\n123\n1234\n");
    let col = Column::new("Col");
    let mut f = ColumnFile::new(&path, &[col.clone()]).unwrap();
    assert!(f.next_row().unwrap());
    assert_eq!(f.get_u8(&col).unwrap(), 123);
    assert_eq!(f.get_u16(&col).unwrap(), 123);
    assert!(f.next_row().unwrap());
    assert_eq!(
      f.get_u8(&col).unwrap_err().to_string(),
      "exceeded max value of 255 - file: u8.txt, row: 2, column: 'Col', value: '1234'"
    );
    assert_eq!(f.get_u16(&col).unwrap(), 1234);
  }

  #[test]
  fn test_get_opt() {
    let path = test_file("opt.txt", "Col\n123\n\n256\n");
    let col = Column::new("Col");
    let mut f = ColumnFile::new(&path, &[col.clone()]).unwrap();
    assert!(f.next_row().unwrap());
    assert_eq!(f.get_opt_u64(&col, 0).unwrap(), Some(123));
    assert_eq!(f.get_opt_u16(&col).unwrap(), Some(123));
    assert!(f.next_row().unwrap());
    assert_eq!(f.get_opt_u64(&col, 0).unwrap(), None);
    assert_eq!(f.get_opt_u8(&col).unwrap(), None);
    assert!(f.next_row().unwrap());
    assert_eq!(
      f.get_opt_u8(&col).unwrap_err().to_string(),
      "exceeded max value of 255 - file: opt.txt, row: 3, column: 'Col', value: '256'"
    );
  }

  #[test]
  fn test_get_bool() {
    let columns: Vec<Column> = ["1", "2", "3", "4", "5"].iter().map(|n| Column::new(n)).collect();
    let path = test_file("bool.txt", "1\t2\t3\t4\t5\nY\tT\tN\tF\t\n");
    let mut f = ColumnFile::new(&path, &columns).unwrap();
    assert!(f.next_row().unwrap());
    assert!(f.get_bool(&columns[0]).unwrap());
    assert!(f.get_bool(&columns[1]).unwrap());
    assert!(!f.get_bool(&columns[2]).unwrap());
    assert!(!f.get_bool(&columns[3]).unwrap());
    assert!(!f.get_bool(&columns[4]).unwrap());
    let path = test_file("bool_bad.txt", "Col\nx\n");
    let col = Column::new("Col");
    let mut f = ColumnFile::new(&path, &[col.clone()]).unwrap();
    assert!(f.next_row().unwrap());
    assert_eq!(
      f.get_bool(&col).unwrap_err().to_string(),
      "failed to convert to bool - file: bool_bad.txt, row: 1, column: 'Col', value: 'x'"
    );
  }

  #[test]
  fn test_get_code() {
    let (c1, c2) = (Column::new("1"), Column::new("2"));
    let path = test_file("code.txt", "1\t2\n898B\t20B9F\n");
    let mut f = ColumnFile::new(&path, &[c1.clone(), c2.clone()]).unwrap();
    assert!(f.next_row().unwrap());
    assert_eq!(f.get_code(&c1).unwrap(), 0x898b);
    assert_eq!(f.get_code(&c2).unwrap(), 0x20b9f);
  }

  #[test]
  fn test_get_code_errors() {
    let col = Column::new("Col");
    let path = test_file("code_bad.txt", "Col\nAAA\n123456\nABCd\nDEFG\n");
    let mut f = ColumnFile::new(&path, &[col.clone()]).unwrap();
    let expected = [
      "failed to convert to Code, size must be 4 or 5 - file: code_bad.txt, row: 1, \
       column: 'Col', value: 'AAA'",
      "failed to convert to Code, size must be 4 or 5 - file: code_bad.txt, row: 2, \
       column: 'Col', value: '123456'",
      "failed to convert to Code, invalid hex - file: code_bad.txt, row: 3, column: 'Col', \
       value: 'ABCd'",
      "failed to convert to Code, invalid hex - file: code_bad.txt, row: 4, column: 'Col', \
       value: 'DEFG'",
    ];
    for e in &expected {
      assert!(f.next_row().unwrap());
      assert_eq!(&f.get_code(&col).unwrap_err().to_string(), e);
    }
  }
}
