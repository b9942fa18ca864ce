use super::*;

pub(crate) struct App {
  client: Client,
  event_rx: UnboundedReceiver<Event>,
  event_tx: UnboundedSender<Event>,
  handle: Handle,
  state: State,
}

impl App {
  fn draw(&mut self, frame: &mut Frame) {
    let layout = Layout::default()
      .direction(Direction::Vertical)
      .margin(1)
      .constraints([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
      ])
      .split(frame.area());

    self.state.set_list_height(layout[0].height as usize);

    let rows = self.state.combined();
    let loading = self.state.loading();

    let mut list_items: Vec<ListItem> = if rows.is_empty() {
      let text = if loading {
        SEARCHING_STATUS
      } else if self.state.query().is_empty() {
        "Type to search interests."
      } else {
        "No matches. Keep typing."
      };

      vec![ListItem::new(Line::from(vec![
        Span::raw(BASE_INDENT),
        Span::raw(text),
      ]))]
    } else {
      rows.iter().map(Self::suggestion_list_item).collect()
    };

    if loading && !rows.is_empty() {
      list_items.push(ListItem::new(Line::from(vec![
        Span::raw(BASE_INDENT),
        Span::styled(SEARCHING_STATUS, Style::default().fg(Color::DarkGray)),
      ])));
    }

    let in_results = self.state.focus() == Focus::Results;

    let selected = if in_results && !rows.is_empty() {
      Some(self.state.selected().min(rows.len().saturating_sub(1)))
    } else {
      None
    };

    let mut list_state = ListState::default()
      .with_selected(selected)
      .with_offset(self.state.offset());

    let list = List::new(list_items)
      .highlight_style(
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("");

    frame.render_stateful_widget(list, layout[0], &mut list_state);

    self.state.set_offset(list_state.offset());

    let input = Paragraph::new(self.state.query().to_string())
      .block(Block::default().borders(Borders::ALL).title("Search"));

    frame.render_widget(input, layout[1]);

    if self.state.focus() == Focus::Input {
      let inner_x = layout[1].x.saturating_add(1);

      let max_x = layout[1]
        .x
        .saturating_add(layout[1].width.saturating_sub(2));

      let query_width =
        u16::try_from(self.state.query().chars().count()).unwrap_or(u16::MAX);

      frame.set_cursor_position(Position::new(
        inner_x.saturating_add(query_width).min(max_x),
        layout[1].y.saturating_add(1),
      ));
    }

    let status = Paragraph::new(self.state.status_text().to_string())
      .style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, layout[2]);

    self.state.help().draw(frame);
  }

  fn execute_effect(&mut self, effect: Effect) {
    match effect {
      Effect::FetchSuggestions {
        page,
        query,
        request_id,
      } => {
        let (client, sender) = (self.client.clone(), self.event_tx.clone());

        let handle = self.handle.clone();

        handle.spawn(async move {
          let _ = sender.send(Event::Suggestions {
            request_id,
            result: client.autocomplete(&query, page).await,
          });
        });
      }
    }
  }

  pub(crate) fn new(client: Client, history: History) -> Self {
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let state = State::new(history);

    Self {
      client,
      event_rx,
      event_tx,
      handle: Handle::current(),
      state,
    }
  }

  fn process_pending_events(&mut self) {
    self.state.tick();

    while let Ok(event) = self.event_rx.try_recv() {
      self.state.handle_event(event);
    }
  }

  pub(crate) fn run(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
  ) -> Result {
    loop {
      self.process_pending_events();

      terminal.draw(|frame| self.draw(frame))?;

      if !crossterm_event::poll(Duration::from_millis(200))? {
        continue;
      }

      let CrosstermEvent::Key(key) = crossterm_event::read()? else {
        continue;
      };

      if key.kind != KeyEventKind::Press {
        continue;
      }

      let command = if self.state.help_is_visible() {
        HelpView::handle_key(key)
      } else {
        self.state.handle_key(key)
      };

      let dispatch = self.state.dispatch_command(command);

      for effect in dispatch.effects {
        self.execute_effect(effect);
      }

      if dispatch.should_exit {
        break;
      }
    }

    Ok(())
  }

  fn suggestion_list_item(row: &DisplayRow) -> ListItem {
    let mut spans = vec![
      Span::raw(BASE_INDENT),
      Span::styled(
        row.suggestion.name.clone(),
        Style::default().fg(Color::White),
      ),
    ];

    if row.is_history {
      spans.push(Span::raw(" "));
      spans.push(Span::styled(
        "(already added)",
        Style::default().fg(Color::DarkGray),
      ));
    }

    ListItem::new(Line::from(spans))
  }
}
