mod data;
mod enums;
mod list_file;
mod morohashi;
mod pinyin;
mod radical;
mod record;
mod ucd;

pub use data::{
  get_data_dir, get_debug_mode, next_arg, DataError, DebugMode, KanjiData, DATA_ARG, DEBUG_ARG,
  FREQUENCY_BUCKETS, FREQUENCY_ENTRIES, INFO_ARG,
};
pub use enums::{Grade, JinmeiReason, JlptLevel, KanjiType, KenteiKyu, UcdLinkType};
pub use list_file::{ListFile, ListFileError};
pub use morohashi::{MorohashiId, MorohashiIdError};
pub use pinyin::Pinyin;
pub use radical::{Radical, RadicalData, RadicalError, MAX_RADICAL};
pub use record::{Frequency, Kanji, KanjiFields, KanjiIndex, KanjiKind, NelsonId, Strokes, Year};
pub use ucd::{Ucd, UcdData, UcdError, UcdLink};
