use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnumError {
  #[error("key error {0}")]
  UnknownName(String),
}

/// Implemented (via the `enum_list!` macro) by contiguous scoped enums that
/// provide string conversion, iteration and array indexing. Absence of a
/// value is always modelled with `Option` rather than a "None" variant.
pub trait EnumList: Copy + Sized + 'static {
  const ALL: &'static [Self];

  fn name(self) -> &'static str;

  fn index(self) -> usize;
}

/// Generate a contiguous enum with `ALL` iteration, `name`/`index` methods,
/// `Display` and `FromStr` (the listed strings are the only accepted names).
#[macro_export]
macro_rules! enum_list {
  ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
    $(#[$meta])*
    #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
    $vis enum $name {
      $($variant),+
    }

    impl $name {
      pub const ALL: &'static [$name] = &[$($name::$variant),+];
    }

    impl $crate::enum_list::EnumList for $name {
      const ALL: &'static [$name] = $name::ALL;

      fn name(self) -> &'static str {
        match self {
          $($name::$variant => $str),+
        }
      }

      fn index(self) -> usize {
        self as usize
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", $crate::enum_list::EnumList::name(*self))
      }
    }

    impl std::str::FromStr for $name {
      type Err = $crate::enum_list::EnumError;

      fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
          $($str => Ok($name::$variant),)+
          _ => Err($crate::enum_list::EnumError::UnknownName(key.to_string())),
        }
      }
    }
  };
}

/// Fixed-size container indexed by the values of an `enum_list!` enum.
#[derive(Clone, Debug)]
pub struct EnumMap<T: EnumList, V> {
  values: Vec<V>,
  _marker: PhantomData<T>,
}

impl<T: EnumList, V: Default> Default for EnumMap<T, V> {
  fn default() -> EnumMap<T, V> {
    EnumMap {
      values: (0..T::ALL.len()).map(|_| V::default()).collect(),
      _marker: PhantomData,
    }
  }
}

impl<T: EnumList, V> EnumMap<T, V> {
  pub fn iter(&self) -> impl Iterator<Item = (T, &V)> {
    T::ALL.iter().copied().zip(self.values.iter())
  }
}

impl<T: EnumList, V> Index<T> for EnumMap<T, V> {
  type Output = V;

  fn index(&self, t: T) -> &V {
    &self.values[t.index()]
  }
}

impl<T: EnumList, V> IndexMut<T> for EnumMap<T, V> {
  fn index_mut(&mut self, t: T) -> &mut V {
    &mut self.values[t.index()]
  }
}
