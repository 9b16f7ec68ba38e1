use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;

use lazy_static::lazy_static;

lazy_static! {
  // many Ucd entries share the same reading so the backing strings are
  // interned and stored once for the life of the process
  static ref INTERNED: Mutex<HashSet<&'static str>> = Mutex::new(HashSet::new());
}

fn intern(s: &str) -> &'static str {
  let mut interned = INTERNED.lock().unwrap();
  match interned.get(s) {
    Some(existing) => existing,
    None => {
      let leaked: &'static str = Box::leak(s.to_string().into_boxed_str());
      interned.insert(leaked);
      leaked
    }
  }
}

/// Most common hànyǔ pīnyīn reading (from the UCD 'kMandarin' property).
/// Empty for entries with no Mandarin reading.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Pinyin(Option<&'static str>);

impl Pinyin {
  pub fn new(s: &str) -> Pinyin {
    if s.is_empty() {
      Pinyin(None)
    } else {
      Pinyin(Some(intern(s)))
    }
  }

  pub fn empty() -> Pinyin {
    Pinyin(None)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_none()
  }

  pub fn value(&self) -> Option<&'static str> {
    self.0
  }
}

impl Default for Pinyin {
  fn default() -> Pinyin {
    Pinyin::empty()
  }
}

impl fmt::Display for Pinyin {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0.unwrap_or(""))
  }
}
