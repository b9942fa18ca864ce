use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DisplayRow {
  pub(crate) is_history: bool,
  pub(crate) suggestion: Suggestion,
}
