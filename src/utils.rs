pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
  match text.char_indices().nth(max_chars) {
    None => text.to_string(),
    Some((byte_index, _)) => {
      let mut truncated = text[..byte_index].trim_end().to_string();
      truncated.push_str("...");
      truncated
    }
  }
}
