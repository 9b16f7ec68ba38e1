use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::column_file::{Column, ColumnFile, ColumnFileError};

/// the traditional CJK radical count
pub const MAX_RADICAL: u8 = 214;

#[derive(Error, Debug)]
pub enum RadicalError {
  #[error("{0}")]
  ColumnFile(#[from] ColumnFileError),
  #[error("{0}")]
  Validate(String),
}

/// One of the 214 official radicals. The Name column holds the primary form
/// first, followed by any alternate forms, separated by spaces.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Radical {
  number: u8,
  name: String,
  alt_forms: Vec<String>,
  long_name: String,
  reading: String,
}

impl Radical {
  pub fn number(&self) -> u8 {
    self.number
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn alt_forms(&self) -> &[String] {
    &self.alt_forms
  }

  pub fn long_name(&self) -> &str {
    &self.long_name
  }

  pub fn reading(&self) -> &str {
    &self.reading
  }
}

impl fmt::Display for Radical {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}({})", self.name, self.number)
  }
}

/// All radicals indexed by number as well as by every name form.
#[derive(Default, Debug)]
pub struct RadicalData {
  radicals: Vec<Radical>,
  name_map: HashMap<String, usize>,
}

impl RadicalData {
  pub fn load<P: AsRef<Path>>(path: P) -> Result<RadicalData, RadicalError> {
    let number_col = Column::new("Number");
    let name_col = Column::new("Name");
    let long_name_col = Column::new("LongName");
    let reading_col = Column::new("Reading");
    let mut f = ColumnFile::new(
      path,
      &[number_col.clone(), name_col.clone(), long_name_col.clone(), reading_col.clone()],
    )?;
    let mut data = RadicalData::default();
    while f.next_row()? {
      let number = f.get_u64(&number_col, u64::from(MAX_RADICAL))? as u8;
      if usize::from(number) != data.radicals.len() + 1 {
        return Err(RadicalError::Validate(
          f.row_error(&format!("radicals must be sequential, got number {}", number)).to_string(),
        ));
      }
      let mut forms = f.get(&name_col)?.split(' ').filter(|s| !s.is_empty());
      let name = match forms.next() {
        Some(name) => name.to_string(),
        None => {
          return Err(RadicalError::Validate(f.row_error("radical name is empty").to_string()))
        }
      };
      let alt_forms: Vec<String> = forms.map(|s| s.to_string()).collect();
      let radical = Radical {
        number,
        name,
        alt_forms,
        long_name: f.get(&long_name_col)?.to_string(),
        reading: f.get(&reading_col)?.to_string(),
      };
      let index = data.radicals.len();
      for form in std::iter::once(&radical.name).chain(radical.alt_forms.iter()) {
        if data.name_map.insert(form.clone(), index).is_some() {
          return Err(RadicalError::Validate(
            f.row_error(&format!("duplicate radical name '{}'", form)).to_string(),
          ));
        }
      }
      data.radicals.push(radical);
    }
    Ok(data)
  }

  pub fn len(&self) -> usize {
    self.radicals.len()
  }

  pub fn is_empty(&self) -> bool {
    self.radicals.is_empty()
  }

  /// radical numbers are 1-based
  pub fn find_by_number(&self, number: u8) -> Option<&Radical> {
    number.checked_sub(1).and_then(|i| self.radicals.get(usize::from(i)))
  }

  /// look up by the primary name or any alternate form
  pub fn find_by_name(&self, name: &str) -> Option<&Radical> {
    self.name_map.get(name).map(|&i| &self.radicals[i])
  }
}
