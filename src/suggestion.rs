use super::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Suggestion {
  pub(crate) avatar: Option<String>,
  pub(crate) id: String,
  pub(crate) name: String,
}
