//! ```no_run
//! use kanjitools::prelude::*;
//!
//! // Kana conversion works without any data files
//! let converter = Converter::new(CharType::Hiragana, ConvertFlags::NONE);
//! println!("{}", converter.convert("kitte"));
//! // => きって
//!
//! let converter = Converter::new(CharType::Romaji, ConvertFlags::HEPBURN);
//! println!("{}", converter.convert_from(CharType::Katakana, "ラーメン"));
//! // => rāmen
//!
//! // The kanji catalog is assembled from a directory of data files
//! let data = KanjiData::new("data", DebugMode::Off).unwrap();
//! let kanji = data.find_by_name("一").unwrap();
//! println!("{} {:?} {:?}", kanji.name(), kanji.grade(), kanji.level());
//! // => 一 Some(G1) Some(N5)
//! ```

pub mod enum_list;

pub mod column_file;
pub mod display;
pub mod kana;
pub mod kanji;
pub mod unicode_block;
pub mod utf8;
pub mod utf8_char;

pub mod prelude {
  pub use crate::kana::{CharType, ConvertFlags, Converter, Kana};
  pub use crate::kanji::{DebugMode, KanjiData, KanjiType};
  pub use crate::utf8_char::Utf8Char;
}
