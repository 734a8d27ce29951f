use crate::event::{Event, EventHandler, TICK_RATE};
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::{draw_footer, draw_header};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::{InfoPage, InfoPageView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use tracing::{info, warn};

/// Main application state
pub struct App {
  /// Navigation stack - the listing is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// `:` command palette, available on every view
  command: CommandInput,

  /// Header title
  title: String,

  /// One-line message in the footer, cleared on the next key press
  status: Option<String>,

  should_quit: bool,
}

impl App {
  pub fn new(title: String, root: Box<dyn View>) -> Self {
    Self {
      view_stack: vec![root],
      command: CommandInput::new(),
      title,
      status: None,
      should_quit: false,
    }
  }

  /// Open `view` on top of the stack
  pub fn push(&mut self, view: Box<dyn View>) {
    self.view_stack.push(view);
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.event_loop().await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(TICK_RATE);

    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    info!("Exiting");
    Ok(())
  }

  fn tick(&mut self) {
    // The listing keeps applying responses while a detail view is open
    for view in &mut self.view_stack {
      view.tick();
    }
  }

  fn current_view(&self) -> Option<&dyn View> {
    self.view_stack.last().map(|v| v.as_ref())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    self.status = None;

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let editing = self.current_view().is_some_and(|v| v.is_editing());
    if !editing {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(cmd)) => {
          self.execute_command(&cmd);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    if let Some(view) = self.view_stack.last_mut() {
      let action = view.handle_key(key);
      self.apply(action);
    }
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  fn execute_command(&mut self, cmd: &str) {
    match cmd {
      "news" => self.view_stack.truncate(1),
      "about" => self.show_page(InfoPage::About),
      "help" => self.show_page(InfoPage::Help),
      "quit" => self.should_quit = true,
      "" => {}
      other => {
        warn!("Unknown command: {}", other);
        self.status = Some(format!("Unknown command: {}", other));
      }
    }
  }

  /// Info pages sit directly on top of the listing
  fn show_page(&mut self, page: InfoPage) {
    self.view_stack.truncate(1);
    self.view_stack.push(Box::new(InfoPageView::new(page)));
  }

  fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }

  fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Main content
        Constraint::Length(1), // Footer
      ])
      .split(frame.area());

    // Header context comes from the listing, whatever is on top
    let context = self.view_stack.first().and_then(|v| v.context());
    let shortcuts = if self.command.is_active() {
      palette_shortcuts()
    } else {
      self
        .current_view()
        .map(|v| v.shortcuts())
        .unwrap_or_default()
    };
    draw_header(frame, chunks[0], &self.title, context.as_deref(), &shortcuts);

    if let Some(view) = self.view_stack.last_mut() {
      view.render(frame, chunks[1]);
    }
    self.command.render_overlay(frame, chunks[1]);

    draw_footer(frame, chunks[2], &self.breadcrumb(), self.status.as_deref());
  }
}

fn palette_shortcuts() -> Vec<ShortcutInfo> {
  vec![
    ShortcutInfo::new("Enter", "run"),
    ShortcutInfo::new("Tab", "next"),
    ShortcutInfo::new("Esc", "cancel"),
  ]
}
