use {
  anyhow::Context,
  app::App,
  autocomplete_response::AutocompleteResponse,
  client::Client,
  command::Command,
  command_dispatch::CommandDispatch,
  crossterm::{
    event as crossterm_event,
    event::{
      Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    },
    execute,
    style::Stylize,
    terminal::{
      EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
      enable_raw_mode,
    },
  },
  display_row::DisplayRow,
  effect::Effect,
  event::Event,
  focus::Focus,
  help_view::HelpView,
  history::History,
  merge::combine,
  pending_fetch::PendingFetch,
  ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
      Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
    },
  },
  serde::{Deserialize, Serialize},
  serde_json::Value,
  state::State,
  status_line::StatusLine,
  std::{
    backtrace::BacktraceStatus,
    env, fs,
    io::{self, IsTerminal, Stdout},
    path::{Path, PathBuf},
    process,
    time::{Duration, Instant},
  },
  suggestion::Suggestion,
  tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
  },
  utils::truncate,
};

mod app;
mod autocomplete_response;
mod client;
mod command;
mod command_dispatch;
mod display_row;
mod effect;
mod event;
mod focus;
mod help_view;
mod history;
mod merge;
mod pending_fetch;
mod state;
mod status_line;
mod suggestion;
mod utils;

const PAGE_SIZE: usize = 10;

const LOAD_MORE_MARGIN: usize = 2;

const INPUT_STATUS: &str =
  "type to search • ↑/↓/tab results • ctrl+u clear • esc quit • F1 help";

const RESULTS_STATUS: &str =
  "↑/↓ move • enter select • type to edit search • esc back • F1 help";

const HELP_TITLE: &str = "Help";
const HELP_STATUS: &str = "Press F1 or esc to close help";

const SEARCHING_STATUS: &str = "Searching...";
const LOADING_MORE_STATUS: &str = "Loading more suggestions...";

const BASE_INDENT: &str = " ";

const HELP_TEXT: &str = "\
Search input:
  type     edit the query (every edit fetches fresh suggestions)
  bksp     delete the last character
  ctrl+u   clear the query
  ↑/↓/tab  move into the result list
  enter    move into the result list
  esc      quit

Result list:
  ↑ / ↓    move the selection
  pg↑/pg↓  page up / page down
  ctrl+u   page up
  ctrl+d   page down
  home     jump to the first row
  end      jump to the last row
  enter    select the highlighted interest
  type     go back to editing the query
  esc      return to the search input
  scroll   keep going past the end to load more suggestions

Rows marked (already added) come from your search history.
The ten most recently selected interests are kept on disk.
";

type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

fn initialize_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
  enable_raw_mode()?;

  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen)?;

  Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(
  terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result {
  disable_raw_mode()?;

  execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

  terminal.show_cursor()?;

  Ok(())
}

async fn run() -> Result {
  let client = Client::default();

  let history = History::load().context("could not load search history")?;

  let mut terminal = initialize_terminal()?;

  let mut app = App::new(client, history);

  app.run(&mut terminal)?;

  restore_terminal(&mut terminal)
}

#[tokio::main]
async fn main() {
  if let Err(error) = run().await {
    let use_color = io::stderr().is_terminal();

    if use_color {
      eprintln!("{} {error}", "error:".bold().red());
    } else {
      eprintln!("error: {error}");
    }

    for (i, error) in error.chain().skip(1).enumerate() {
      if i == 0 {
        eprintln!();

        if use_color {
          eprintln!("{}", "because:".bold().red());
        } else {
          eprintln!("because:");
        }
      }

      if use_color {
        eprintln!("{} {error}", "-".bold().red());
      } else {
        eprintln!("- {error}");
      }
    }

    let backtrace = error.backtrace();

    if backtrace.status() == BacktraceStatus::Captured {
      if use_color {
        eprintln!("{}", "backtrace:".bold().red());
      } else {
        eprintln!("backtrace:");
      }

      eprintln!("{backtrace}");
    }

    process::exit(1);
  }
}
