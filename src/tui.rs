use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::client::{HttpBackend, RoleBackend};
use crate::config::Config;
use crate::form::{reduce, Action, FormState, StatusMessage};
use crate::roles::ROLE_CHOICES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Email,
    Role,
    SubPermission,
    AddButton,
    List,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Email => Focus::Role,
            Focus::Role => Focus::SubPermission,
            Focus::SubPermission => Focus::AddButton,
            Focus::AddButton => Focus::List,
            Focus::List => Focus::Email,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Email => Focus::List,
            Focus::Role => Focus::Email,
            Focus::SubPermission => Focus::Role,
            Focus::AddButton => Focus::SubPermission,
            Focus::List => Focus::AddButton,
        }
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

pub struct FormApp {
    pub state: FormState,
    pub focus: Focus,
    pub selected: usize,
}

impl Default for FormApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FormApp {
    pub fn new() -> Self {
        Self {
            state: FormState::new(),
            focus: Focus::Email,
            selected: 0,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
        self.selected = self.selected.min(self.state.users.len().saturating_sub(1));
    }

    /// Translates a key press into reducer actions.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return KeyOutcome::Quit;
        }

        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            _ => match self.focus {
                Focus::Email => self.handle_email_key(key),
                Focus::Role | Focus::SubPermission | Focus::AddButton
                    if key.code == KeyCode::Enter =>
                {
                    self.dispatch(Action::SubmitAdd);
                }
                Focus::Role => {
                    if let Some(step) = cycle_step(key.code) {
                        let role = cycle(&ROLE_CHOICES, self.state.draft.role, step);
                        self.dispatch(Action::SetRole(role));
                    }
                }
                Focus::SubPermission => {
                    if let Some(step) = cycle_step(key.code) {
                        let options = self.state.draft.role.sub_permissions();
                        let sub = cycle(options, self.state.draft.sub_permission, step);
                        self.dispatch(Action::SetSubPermission(sub));
                    }
                }
                Focus::AddButton => {
                    if key.code == KeyCode::Char(' ') {
                        self.dispatch(Action::SubmitAdd);
                    }
                }
                Focus::List => self.handle_list_key(key.code),
            },
        }

        KeyOutcome::Continue
    }

    fn handle_email_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) => {
                let mut email = self.state.draft.email.clone();
                email.push(c);
                self.dispatch(Action::SetEmail(email));
            }
            KeyCode::Backspace => {
                let mut email = self.state.draft.email.clone();
                email.pop();
                self.dispatch(Action::SetEmail(email));
            }
            KeyCode::Enter => self.dispatch(Action::SubmitAdd),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Down => {
                if self.selected < self.state.users.len().saturating_sub(1) {
                    self.selected += 1;
                }
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(user) = self.state.users.get(self.selected) {
                    let email = user.email.clone();
                    self.dispatch(Action::SubmitDelete(email));
                }
            }
            _ => {}
        }
    }
}

fn cycle_step(code: KeyCode) -> Option<isize> {
    match code {
        KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => Some(1),
        KeyCode::Left | KeyCode::Up => Some(-1),
        _ => None,
    }
}

fn cycle<T: Copy + PartialEq>(options: &[T], current: T, step: isize) -> T {
    let len = options.len() as isize;
    let index = options.iter().position(|o| *o == current).unwrap_or(0) as isize;
    options[(index + step).rem_euclid(len) as usize]
}

pub async fn run_form(config: &Config) -> Result<()> {
    let backend: Arc<dyn RoleBackend> = Arc::new(HttpBackend::new(config)?);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    let mut app = FormApp::new();
    let result = run_app(&mut terminal, &mut app, backend).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut FormApp,
    backend: Arc<dyn RoleBackend>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

    loop {
        while let Ok(outcome) = rx.try_recv() {
            app.dispatch(outcome);
        }

        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let was_submitting = app.state.is_submitting();
                if app.handle_key(key) == KeyOutcome::Quit {
                    return Ok(());
                }

                if !was_submitting {
                    if let Some(operation) = app.state.pending().cloned() {
                        let backend = Arc::clone(&backend);
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let outcome = crate::sync::perform(backend.as_ref(), operation).await;
                            let _ = tx.send(outcome);
                        });
                    }
                }
            }
        }
    }
}

fn ui(f: &mut Frame, app: &FormApp) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(size);

    render_header(f, chunks[0]);
    render_email(f, chunks[1], app);
    render_selector(
        f,
        chunks[2],
        "Role",
        &ROLE_CHOICES.map(|r| (r.as_str(), r == app.state.draft.role)),
        app.focus == Focus::Role,
    );
    let subs: Vec<(&str, bool)> = app
        .state
        .draft
        .role
        .sub_permissions()
        .iter()
        .map(|s| (s.as_str(), *s == app.state.draft.sub_permission))
        .collect();
    render_selector(f, chunks[3], "Sub-permission", &subs, app.focus == Focus::SubPermission);
    render_status(f, chunks[4], app.state.status.as_ref());
    render_add_button(f, chunks[5], app);
    render_users(f, chunks[6], app);
    render_footer(f, chunks[7]);
}

fn focused_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border))
}

fn render_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![Span::styled(
        "Manage Users & Roles",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )]))
    .block(Block::default().borders(Borders::ALL))
    .style(Style::default().fg(Color::White));

    f.render_widget(title, area);
}

fn render_email(f: &mut Frame, area: Rect, app: &FormApp) {
    let focused = app.focus == Focus::Email;
    let line = if app.state.draft.email.is_empty() && !focused {
        Line::from(Span::styled("Enter email", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(app.state.draft.email.as_str())
    };

    f.render_widget(Paragraph::new(line).block(focused_block("Email", focused)), area);

    if focused {
        let x = area.x + 1 + app.state.draft.email.chars().count() as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_selector(f: &mut Frame, area: Rect, title: &str, options: &[(&str, bool)], focused: bool) {
    let mut spans = Vec::new();
    for (label, selected) in options {
        let style = if *selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::raw(" "));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(focused_block(title, focused)),
        area,
    );
}

fn render_status(f: &mut Frame, area: Rect, status: Option<&StatusMessage>) {
    let line = match status {
        Some(message) => {
            let color = if message.is_error() { Color::Red } else { Color::Green };
            Line::from(Span::styled(message.text(), Style::default().fg(color)))
        }
        None => Line::default(),
    };

    f.render_widget(Paragraph::new(line), area);
}

fn render_add_button(f: &mut Frame, area: Rect, app: &FormApp) {
    let label = if app.state.is_submitting() {
        "Saving..."
    } else {
        "+ Add User"
    };
    let button = Paragraph::new(Line::from(Span::styled(
        label,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )))
    .block(focused_block("", app.focus == Focus::AddButton));

    f.render_widget(button, area);
}

fn render_users(f: &mut Frame, area: Rect, app: &FormApp) {
    let focused = app.focus == Focus::List;

    if app.state.users.is_empty() {
        let paragraph = Paragraph::new("No users added yet.")
            .block(focused_block("User List", focused))
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .users
        .iter()
        .map(|user| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    user.email.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{} - {}", user.role, user.permission),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(focused_block("User List", focused))
        .highlight_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(app.selected));
    }

    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("tab", Style::default().fg(Color::Cyan)),
        Span::raw(" next field  "),
        Span::styled("←→", Style::default().fg(Color::Cyan)),
        Span::raw(" choose  "),
        Span::styled("enter", Style::default().fg(Color::Cyan)),
        Span::raw(" add  "),
        Span::styled("d", Style::default().fg(Color::Cyan)),
        Span::raw(" delete  "),
        Span::styled("esc", Style::default().fg(Color::Cyan)),
        Span::raw(" quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));

    f.render_widget(footer, area);
}
