mod char_type;
mod converter;
mod table;

pub use char_type::{CharType, ConvertFlags};
pub use converter::Converter;
pub use table::{
  find_iteration_mark, IterationMark, Kana, PROLONG_MARK, REPEAT_ACCENTED, REPEAT_PLAIN,
};
