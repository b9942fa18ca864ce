use super::*;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AutocompleteResponse {
  #[serde(default)]
  pub(crate) autocomplete: Vec<Suggestion>,
}

impl AutocompleteResponse {
  pub(crate) fn decode(value: Value) -> Vec<Suggestion> {
    serde_json::from_value::<Self>(value)
      .unwrap_or_default()
      .autocomplete
  }
}
