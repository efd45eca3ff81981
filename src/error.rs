//! Error conditions raised by the library itself.
//!
//! Errors produced by a stream's own producer travel through the stream's
//! `Err` type and are never wrapped here.

/// Misuse of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
  /// A value or terminal event was pushed into a subject that had already
  /// completed or failed. The push is dropped.
  #[error("event pushed into a subject that has already terminated")]
  UseAfterCompletion,
}

/// An operator was constructed with arguments it cannot work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OperatorError {
  #[error("`{operator}` needs at least one upstream observable")]
  NoUpstream { operator: &'static str },
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn display() {
    assert_eq!(
      SubjectError::UseAfterCompletion.to_string(),
      "event pushed into a subject that has already terminated"
    );
    assert_eq!(
      OperatorError::NoUpstream { operator: "zip_all" }.to_string(),
      "`zip_all` needs at least one upstream observable"
    );
  }
}
