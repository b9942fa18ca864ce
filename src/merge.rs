use super::*;

pub(crate) fn combine(
  query: &str,
  history: &[Suggestion],
  suggestions: &[Suggestion],
) -> Vec<DisplayRow> {
  let needle = query.to_lowercase();

  let matching_history = history
    .iter()
    .filter(|item| item.name.to_lowercase().contains(&needle))
    .map(|item| DisplayRow {
      is_history: true,
      suggestion: item.clone(),
    });

  // suggestions are deduplicated against the full history, not the filtered
  // slice, and by exact name
  let remote = suggestions
    .iter()
    .filter(|suggestion| {
      !history.iter().any(|item| item.name == suggestion.name)
    })
    .map(|suggestion| DisplayRow {
      is_history: false,
      suggestion: suggestion.clone(),
    });

  matching_history.chain(remote).collect()
}
