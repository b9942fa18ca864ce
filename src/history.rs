use super::*;

#[derive(Debug)]
pub(crate) struct History {
  entries: Vec<Suggestion>,
  path: PathBuf,
}

impl History {
  pub(crate) const CAPACITY: usize = 10;

  fn ensure_parent_dir(path: &Path) -> Result {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }

    Ok(())
  }

  pub(crate) fn entries(&self) -> &[Suggestion] {
    &self.entries
  }

  fn history_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("CONVOSE_HISTORY_FILE") {
      return Ok(PathBuf::from(path));
    }

    let base_dir = if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
      PathBuf::from(dir)
    } else if let Ok(home) = env::var("HOME") {
      PathBuf::from(home).join(".config")
    } else {
      env::current_dir()?.join(".config")
    };

    Ok(base_dir.join("convose").join("search_history.json"))
  }

  pub(crate) fn load() -> Result<Self> {
    Ok(Self::load_from(Self::history_path()?))
  }

  pub(crate) fn load_from(path: PathBuf) -> Self {
    let entries = fs::read(&path)
      .ok()
      .and_then(|data| serde_json::from_slice::<Vec<Suggestion>>(&data).ok())
      .unwrap_or_default();

    Self { entries, path }
  }

  fn persist(&self) -> Result {
    Self::ensure_parent_dir(&self.path)?;

    let serialized = serde_json::to_vec_pretty(&self.entries)?;

    fs::write(&self.path, serialized)?;

    Ok(())
  }

  pub(crate) fn record(&mut self, item: &Suggestion) -> Result {
    self.entries.retain(|entry| entry.id != item.id);
    self.entries.insert(0, item.clone());
    self.entries.truncate(Self::CAPACITY);
    self.persist()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::sync::atomic::{AtomicUsize, Ordering};

  static COUNTER: AtomicUsize = AtomicUsize::new(0);

  fn temp_path() -> PathBuf {
    let unique = COUNTER.fetch_add(1, Ordering::Relaxed);

    env::temp_dir().join(format!(
      "convose_history_test_{}_{unique}.json",
      process::id()
    ))
  }

  fn sample(id: &str, name: &str) -> Suggestion {
    Suggestion {
      avatar: None,
      id: id.to_string(),
      name: name.to_string(),
    }
  }

  #[test]
  fn record_caps_entries_at_capacity() {
    let path = temp_path();

    let mut history = History::load_from(path.clone());

    for i in 0..History::CAPACITY + 2 {
      history
        .record(&sample(&i.to_string(), &format!("Interest {i}")))
        .unwrap();
    }

    assert_eq!(history.entries().len(), History::CAPACITY);
    assert_eq!(history.entries()[0].id, "11");
    assert!(!history.entries().iter().any(|entry| entry.id == "0"));

    let _ = fs::remove_file(path);
  }

  #[test]
  fn record_moves_existing_entry_to_front_without_duplicating() {
    let path = temp_path();

    let mut history = History::load_from(path.clone());

    let guitar = sample("1", "Guitar");

    history.record(&guitar).unwrap();
    history.record(&sample("2", "Chess")).unwrap();
    history.record(&guitar).unwrap();

    assert_eq!(history.entries().len(), 2);
    assert_eq!(history.entries()[0].id, "1");
    assert_eq!(history.entries()[1].id, "2");

    let _ = fs::remove_file(path);
  }

  #[test]
  fn recorded_entries_survive_a_reload() {
    let path = temp_path();

    let mut history = History::load_from(path.clone());
    history.record(&sample("1", "Guitar")).unwrap();
    history.record(&sample("2", "Chess")).unwrap();

    let reloaded = History::load_from(path.clone());

    assert_eq!(reloaded.entries(), history.entries());

    let _ = fs::remove_file(path);
  }

  #[test]
  fn missing_or_malformed_file_falls_back_to_empty() {
    let missing = History::load_from(temp_path());
    assert!(missing.entries().is_empty());

    let path = temp_path();
    fs::write(&path, b"not json").unwrap();

    let malformed = History::load_from(path.clone());
    assert!(malformed.entries().is_empty());

    let _ = fs::remove_file(path);
  }
}
