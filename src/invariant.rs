use crate::common::*;

pub(crate) trait Invariant<T> {
  fn invariant_unwrap(self, invariant: &str) -> T;
}

impl<T, E: Display> Invariant<T> for std::result::Result<T, E> {
  fn invariant_unwrap(self, invariant: &str) -> T {
    match self {
      Ok(value) => value,
      Err(error) => panic!("Invariant violated: {}: {}", invariant, error),
    }
  }
}

impl<T> Invariant<T> for Option<T> {
  fn invariant_unwrap(self, invariant: &str) -> T {
    match self {
      Some(value) => value,
      None => panic!("Invariant violated: {}", invariant),
    }
  }
}
