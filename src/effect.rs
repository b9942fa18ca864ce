#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Effect {
  FetchSuggestions {
    page: usize,
    query: String,
    request_id: u64,
  },
}
