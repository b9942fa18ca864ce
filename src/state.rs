use super::*;

pub(crate) struct State {
  focus: Focus,
  has_more: bool,
  help: HelpView,
  history: History,
  list_height: usize,
  loading: bool,
  next_request_id: u64,
  offset: usize,
  page: usize,
  pending_effects: Vec<Effect>,
  pending_fetch: Option<PendingFetch>,
  query: String,
  selected: usize,
  status: StatusLine,
  suggestions: Vec<Suggestion>,
}

impl State {
  fn activate(&mut self) {
    let Some(row) = self.combined().into_iter().nth(self.selected) else {
      return;
    };

    self.query = row.suggestion.name.clone();
    self.suggestions.clear();
    self.pending_fetch = None;
    self.loading = false;
    self.selected = 0;
    self.offset = 0;

    self.set_focus(Focus::Results);

    let name = truncate(&row.suggestion.name, 40);

    match self.history.record(&row.suggestion) {
      Ok(()) => self.status.flash(format!("Saved \"{name}\" to history")),
      Err(error) => {
        self
          .status
          .flash(format!("Could not save history: {error}"));
      }
    }
  }

  fn clamp_selection(&mut self) {
    let len = self.combined().len();

    if len == 0 {
      self.selected = 0;
      self.offset = 0;
    } else {
      self.selected = self.selected.min(len.saturating_sub(1));
      self.offset = self.offset.min(self.selected);
    }
  }

  fn clear_query(&mut self) {
    self.set_focus(Focus::Input);

    if self.query.is_empty() {
      return;
    }

    self.query.clear();
    self.reset_search();
  }

  pub(crate) fn combined(&self) -> Vec<DisplayRow> {
    combine(&self.query, self.history.entries(), &self.suggestions)
  }

  fn delete_char(&mut self) {
    self.set_focus(Focus::Input);

    if self.query.pop().is_some() {
      self.reset_search();
    }
  }

  pub(crate) fn dispatch_command(
    &mut self,
    command: Command,
  ) -> CommandDispatch {
    debug_assert!(
      self.pending_effects.is_empty(),
      "command dispatch should start without pending effects"
    );

    let mut should_exit = false;

    match command {
      Command::Activate => self.activate(),
      Command::ClearQuery => self.clear_query(),
      Command::DeleteChar => self.delete_char(),
      Command::FocusInput => self.focus_input(),
      Command::FocusResults => self.focus_results(),
      Command::HideHelp => self.help.hide(&mut self.status),
      Command::InsertChar(ch) => self.insert_char(ch),
      Command::None => {}
      Command::PageDown => self.page_down(),
      Command::PageUp => self.page_up(),
      Command::Quit => should_exit = true,
      Command::SelectFirst => self.select_index(0),
      Command::SelectLast => self.select_last(),
      Command::SelectNext => self.select_next(),
      Command::SelectPrevious => self.select_previous(),
      Command::ShowHelp => self.help.show(&mut self.status),
    }

    CommandDispatch {
      effects: std::mem::take(&mut self.pending_effects),
      should_exit,
    }
  }

  fn ensure_more(&mut self, target: usize) {
    let len = self.combined().len();

    if target.saturating_add(LOAD_MORE_MARGIN) < len {
      return;
    }

    if self.loading || !self.has_more {
      return;
    }

    if !self.help.is_visible() {
      self.status.flash(LOADING_MORE_STATUS.into());
    }

    self.start_fetch(self.page.saturating_add(1));
  }

  pub(crate) fn focus(&self) -> Focus {
    self.focus
  }

  fn focus_input(&mut self) {
    self.set_focus(Focus::Input);
  }

  fn focus_results(&mut self) {
    if self.combined().is_empty() {
      return;
    }

    self.set_focus(Focus::Results);
    self.clamp_selection();
  }

  pub(crate) fn handle_event(&mut self, event: Event) {
    match event {
      Event::Suggestions { request_id, result } => {
        let Some(pending) = self.pending_fetch.as_ref() else {
          return;
        };

        if pending.request_id != request_id {
          return;
        }

        let Some(pending) = self.pending_fetch.take() else {
          return;
        };

        self.loading = false;

        match result {
          Ok(batch) => {
            self.has_more = !batch.is_empty();
            self.page = pending.page;

            if pending.page == 0 {
              self.suggestions = batch;
            } else {
              self.suggestions.extend(batch);
            }

            self.clamp_selection();

            if !self.help.is_visible() {
              if pending.query.is_empty() {
                self.status.set(self.focus.status().into());
              } else {
                let count = self.combined().len();
                let truncated = truncate(&pending.query, 40);

                self.status.set(match count {
                  0 => format!("No results for \"{truncated}\""),
                  1 => format!("Found 1 result for \"{truncated}\""),
                  _ => format!("Found {count} results for \"{truncated}\""),
                });
              }
            }
          }
          Err(error) => {
            if !self.help.is_visible() {
              self
                .status
                .flash(format!("Could not load suggestions: {error}"));
            }
          }
        }
      }
    }
  }

  fn handle_input_key(key: KeyEvent) -> Command {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      return match key.code {
        KeyCode::Char('c') => Command::Quit,
        KeyCode::Char('u') => Command::ClearQuery,
        _ => Command::None,
      };
    }

    match key.code {
      KeyCode::Backspace => Command::DeleteChar,
      KeyCode::Char(ch) => {
        if key.modifiers.contains(KeyModifiers::ALT)
          || key.modifiers.contains(KeyModifiers::SUPER)
        {
          Command::None
        } else {
          Command::InsertChar(ch)
        }
      }
      KeyCode::Down | KeyCode::Enter | KeyCode::Tab | KeyCode::Up => {
        Command::FocusResults
      }
      KeyCode::Esc => Command::Quit,
      KeyCode::F(1) => Command::ShowHelp,
      _ => Command::None,
    }
  }

  pub(crate) fn handle_key(&self, key: KeyEvent) -> Command {
    match self.focus {
      Focus::Input => Self::handle_input_key(key),
      Focus::Results => Self::handle_results_key(key),
    }
  }

  fn handle_results_key(key: KeyEvent) -> Command {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      return match key.code {
        KeyCode::Char('c') => Command::Quit,
        KeyCode::Char('d') => Command::PageDown,
        KeyCode::Char('u') => Command::PageUp,
        _ => Command::None,
      };
    }

    match key.code {
      KeyCode::Backspace => Command::DeleteChar,
      KeyCode::Char(ch) => {
        if key.modifiers.contains(KeyModifiers::ALT)
          || key.modifiers.contains(KeyModifiers::SUPER)
        {
          Command::None
        } else {
          Command::InsertChar(ch)
        }
      }
      KeyCode::Down => Command::SelectNext,
      KeyCode::End => Command::SelectLast,
      KeyCode::Enter => Command::Activate,
      KeyCode::Esc => Command::FocusInput,
      KeyCode::F(1) => Command::ShowHelp,
      KeyCode::Home => Command::SelectFirst,
      KeyCode::PageDown => Command::PageDown,
      KeyCode::PageUp => Command::PageUp,
      KeyCode::Up => Command::SelectPrevious,
      _ => Command::None,
    }
  }

  pub(crate) fn help(&self) -> &HelpView {
    &self.help
  }

  pub(crate) fn help_is_visible(&self) -> bool {
    self.help.is_visible()
  }

  fn insert_char(&mut self, ch: char) {
    self.set_focus(Focus::Input);
    self.query.push(ch);
    self.reset_search();
  }

  pub(crate) fn loading(&self) -> bool {
    self.loading
  }

  pub(crate) fn new(history: History) -> Self {
    Self {
      focus: Focus::Input,
      has_more: true,
      help: HelpView::new(),
      history,
      list_height: 0,
      loading: false,
      next_request_id: 0,
      offset: 0,
      page: 0,
      pending_effects: Vec::new(),
      pending_fetch: None,
      query: String::new(),
      selected: 0,
      status: StatusLine::new(Focus::Input.status().into()),
      suggestions: Vec::new(),
    }
  }

  pub(crate) fn offset(&self) -> usize {
    self.offset
  }

  fn page_down(&mut self) {
    self.select_index(self.selected.saturating_add(self.page_jump()));
  }

  fn page_jump(&self) -> usize {
    self.list_height.saturating_sub(1).max(1)
  }

  fn page_up(&mut self) {
    self.select_index(self.selected.saturating_sub(self.page_jump()));
  }

  pub(crate) fn query(&self) -> &str {
    &self.query
  }

  fn reset_search(&mut self) {
    self.suggestions.clear();
    self.page = 0;
    self.has_more = true;
    self.selected = 0;
    self.offset = 0;
    self.start_fetch(0);
  }

  fn select_index(&mut self, target: usize) {
    let len = self.combined().len();

    if len == 0 {
      return;
    }

    self.selected = target.min(len.saturating_sub(1));
    self.ensure_more(self.selected);
  }

  fn select_last(&mut self) {
    let len = self.combined().len();

    if len != 0 {
      self.select_index(len.saturating_sub(1));
    }
  }

  fn select_next(&mut self) {
    self.select_index(self.selected.saturating_add(1));
  }

  fn select_previous(&mut self) {
    self.select_index(self.selected.saturating_sub(1));
  }

  pub(crate) fn selected(&self) -> usize {
    self.selected
  }

  fn set_focus(&mut self, focus: Focus) {
    self.focus = focus;

    if !self.help.is_visible() {
      self.status.set(focus.status().into());
    }
  }

  pub(crate) fn set_list_height(&mut self, height: usize) {
    self.list_height = height;
  }

  pub(crate) fn set_offset(&mut self, offset: usize) {
    self.offset = offset;
  }

  fn start_fetch(&mut self, page: usize) {
    if page > 0 && (self.loading || !self.has_more) {
      return;
    }

    let request_id = self.next_request_id;

    self.next_request_id = self.next_request_id.wrapping_add(1);

    self.loading = true;

    self.pending_fetch = Some(PendingFetch {
      page,
      query: self.query.clone(),
      request_id,
    });

    self.pending_effects.push(Effect::FetchSuggestions {
      page,
      query: self.query.clone(),
      request_id,
    });
  }

  pub(crate) fn status_text(&self) -> &str {
    self.status.current()
  }

  pub(crate) fn tick(&mut self) {
    self.status.tick();
  }
}

#[cfg(test)]
mod tests {
  use {super::*, anyhow::anyhow};

  use std::sync::atomic::{AtomicUsize, Ordering};

  static COUNTER: AtomicUsize = AtomicUsize::new(0);

  fn temp_history() -> History {
    let unique = COUNTER.fetch_add(1, Ordering::Relaxed);

    History::load_from(env::temp_dir().join(format!(
      "convose_state_test_{}_{unique}.json",
      process::id()
    )))
  }

  fn sample(id: &str, name: &str) -> Suggestion {
    Suggestion {
      avatar: None,
      id: id.to_string(),
      name: name.to_string(),
    }
  }

  fn batch(start: usize, count: usize) -> Vec<Suggestion> {
    (start..start + count)
      .map(|i| sample(&i.to_string(), &format!("Interest {i}")))
      .collect()
  }

  #[test]
  fn each_query_edit_emits_a_fresh_page_zero_fetch() {
    let mut state = State::new(temp_history());

    let dispatch = state.dispatch_command(Command::InsertChar('r'));

    assert_eq!(
      dispatch.effects,
      vec![Effect::FetchSuggestions {
        page: 0,
        query: "r".into(),
        request_id: 0,
      }]
    );

    let dispatch = state.dispatch_command(Command::InsertChar('o'));

    assert_eq!(
      dispatch.effects,
      vec![Effect::FetchSuggestions {
        page: 0,
        query: "ro".into(),
        request_id: 1,
      }]
    );
  }

  #[test]
  fn clearing_the_query_still_issues_a_fetch() {
    let mut state = State::new(temp_history());

    state.dispatch_command(Command::InsertChar('r'));

    let dispatch = state.dispatch_command(Command::DeleteChar);

    assert_eq!(
      dispatch.effects,
      vec![Effect::FetchSuggestions {
        page: 0,
        query: String::new(),
        request_id: 1,
      }]
    );
  }

  #[test]
  fn responses_for_superseded_requests_are_discarded() {
    let mut state = State::new(temp_history());

    state.dispatch_command(Command::InsertChar('r'));
    state.dispatch_command(Command::InsertChar('u'));

    state.handle_event(Event::Suggestions {
      request_id: 0,
      result: Ok(batch(0, 10)),
    });

    assert!(state.combined().is_empty());
    assert!(state.loading());

    state.handle_event(Event::Suggestions {
      request_id: 1,
      result: Ok(batch(10, 3)),
    });

    assert_eq!(state.combined().len(), 3);
    assert!(!state.loading());
  }

  #[test]
  fn walking_past_the_end_pages_until_an_empty_batch() {
    let mut state = State::new(temp_history());

    state.dispatch_command(Command::InsertChar('i'));

    state.handle_event(Event::Suggestions {
      request_id: 0,
      result: Ok(batch(0, 10)),
    });

    assert_eq!(state.combined().len(), 10);

    let dispatch = state.dispatch_command(Command::SelectLast);

    assert_eq!(
      dispatch.effects,
      vec![Effect::FetchSuggestions {
        page: 1,
        query: "i".into(),
        request_id: 1,
      }]
    );

    state.handle_event(Event::Suggestions {
      request_id: 1,
      result: Ok(batch(10, 10)),
    });

    assert_eq!(state.combined().len(), 20);

    let dispatch = state.dispatch_command(Command::SelectLast);

    assert_eq!(
      dispatch.effects,
      vec![Effect::FetchSuggestions {
        page: 2,
        query: "i".into(),
        request_id: 2,
      }]
    );

    state.handle_event(Event::Suggestions {
      request_id: 2,
      result: Ok(Vec::new()),
    });

    assert_eq!(state.combined().len(), 20);

    let dispatch = state.dispatch_command(Command::SelectLast);

    assert!(dispatch.effects.is_empty());
  }

  #[test]
  fn load_more_is_gated_while_a_fetch_is_in_flight() {
    let mut state = State::new(temp_history());

    state.dispatch_command(Command::InsertChar('i'));

    state.handle_event(Event::Suggestions {
      request_id: 0,
      result: Ok(batch(0, 10)),
    });

    let dispatch = state.dispatch_command(Command::SelectLast);
    assert_eq!(dispatch.effects.len(), 1);

    let dispatch = state.dispatch_command(Command::SelectLast);
    assert!(dispatch.effects.is_empty());
  }

  #[test]
  fn activating_a_row_records_history_and_clears_suggestions() {
    let mut state = State::new(temp_history());

    state.dispatch_command(Command::InsertChar('g'));

    state.handle_event(Event::Suggestions {
      request_id: 0,
      result: Ok(vec![sample("7", "Guitar")]),
    });

    state.dispatch_command(Command::FocusResults);
    let dispatch = state.dispatch_command(Command::Activate);

    assert!(dispatch.effects.is_empty());
    assert_eq!(state.query(), "Guitar");
    assert_eq!(state.focus(), Focus::Results);

    let rows = state.combined();

    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_history);
    assert_eq!(rows[0].suggestion.id, "7");
  }

  #[test]
  fn activation_invalidates_the_in_flight_fetch() {
    let mut history = temp_history();
    history.record(&sample("1", "Guitar")).unwrap();

    let mut state = State::new(history);

    state.dispatch_command(Command::InsertChar('g'));
    state.dispatch_command(Command::FocusResults);
    state.dispatch_command(Command::Activate);

    assert_eq!(state.query(), "Guitar");

    state.handle_event(Event::Suggestions {
      request_id: 0,
      result: Ok(vec![sample("9", "Gardening")]),
    });

    let rows = state.combined();

    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_history);
  }

  #[test]
  fn fetch_errors_clear_loading_and_preserve_results() {
    let mut state = State::new(temp_history());

    state.dispatch_command(Command::InsertChar('i'));

    state.handle_event(Event::Suggestions {
      request_id: 0,
      result: Ok(batch(0, 10)),
    });

    state.dispatch_command(Command::SelectLast);

    state.handle_event(Event::Suggestions {
      request_id: 1,
      result: Err(anyhow!("boom")),
    });

    assert!(!state.loading());
    assert_eq!(state.combined().len(), 10);
    assert!(state.status_text().contains("Could not load suggestions"));

    let dispatch = state.dispatch_command(Command::SelectLast);
    assert_eq!(dispatch.effects.len(), 1);
  }

  #[test]
  fn focus_results_requires_rows() {
    let mut state = State::new(temp_history());

    state.dispatch_command(Command::FocusResults);

    assert_eq!(state.focus(), Focus::Input);
  }

  #[test]
  fn quit_sets_should_exit() {
    let mut state = State::new(temp_history());

    let dispatch = state.dispatch_command(Command::Quit);

    assert!(dispatch.should_exit);
    assert!(dispatch.effects.is_empty());
  }
}
