use super::*;

pub(crate) enum Event {
  Suggestions {
    request_id: u64,
    result: Result<Vec<Suggestion>>,
  },
}
