use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};
use std::borrow::Cow;
use std::io::{self, Stdout};
use tracing::debug;

use crate::error::CertError;
use crate::summary::CertSummary;

/// Space kept around the list on each side.
const DOC_MARGIN: Margin = Margin { horizontal: 2, vertical: 1 };
/// Title row, gap, status row. Help rows come on top.
const CHROME_ROWS: u16 = 3;
/// Title, description, spacer.
const ITEM_HEIGHT: u16 = 3;

const SHORT_HELP: &[&str] = &["↑/k up • ↓/j down • / filter • q quit • ? more"];
const FULL_HELP: &[&str] = &[
    "↑/k up • ↓/j down • ←/h/b/u prev page • →/l/f/d next page",
    "g/home go to start • G/end go to end",
    "/ filter • esc clear filter • q quit • ? close help",
];

/// Something the list can show and filter on.
pub trait Item {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn filter_value(&self) -> &str;
}

/// One labelled certificate attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    title: String,
    description: String,
}

impl Field {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Field {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl Item for Field {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn filter_value(&self) -> &str {
        &self.title
    }
}

pub fn fields_from(summary: &CertSummary) -> Vec<Field> {
    summary
        .fields()
        .into_iter()
        .map(|(title, description)| Field::new(title, description))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterState {
    Unfiltered,
    Filtering,
    Applied,
}

/// Case-insensitive subsequence match.
pub fn fuzzy_match(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars().flat_map(char::to_lowercase);
    needle
        .chars()
        .flat_map(char::to_lowercase)
        .all(|n| hay.any(|h| h == n))
}

/// Filterable list of items. Selection and scrolling live in ratatui's
/// `ListState`; this type only decides which items are visible.
pub struct ListView<I> {
    title: String,
    items: Vec<I>,
    // indices into `items` that pass the filter
    visible: Vec<usize>,
    state: ListState,
    filter: String,
    filter_state: FilterState,
    full_help: bool,
    width: u16,
    height: u16,
}

impl<I: Item> ListView<I> {
    pub fn new(title: impl Into<String>, items: Vec<I>) -> Self {
        let visible: Vec<usize> = (0..items.len()).collect();
        let state = ListState::default().with_selected((!visible.is_empty()).then_some(0));
        ListView {
            title: title.into(),
            items,
            visible,
            state,
            filter: String::new(),
            filter_state: FilterState::Unfiltered,
            full_help: false,
            width: 0,
            height: 0,
        }
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    fn help_lines(&self) -> &'static [&'static str] {
        if self.full_help {
            FULL_HELP
        } else {
            SHORT_HELP
        }
    }

    /// Number of items that fit on screen at once.
    pub fn page_size(&self) -> u16 {
        let chrome = CHROME_ROWS + self.help_lines().len() as u16;
        (self.height.saturating_sub(chrome) / ITEM_HEIGHT).max(1)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind == KeyEventKind::Release {
            return Action::Continue;
        }
        if self.filter_state == FilterState::Filtering {
            self.handle_filter_key(key);
            return Action::Continue;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.state.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::Left
            | KeyCode::PageUp
            | KeyCode::Char('h')
            | KeyCode::Char('b')
            | KeyCode::Char('u') => self.state.scroll_up_by(self.page_size()),
            KeyCode::Right
            | KeyCode::PageDown
            | KeyCode::Char('l')
            | KeyCode::Char('f')
            | KeyCode::Char('d') => self.state.scroll_down_by(self.page_size()),
            KeyCode::Home | KeyCode::Char('g') => self.state.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.state.select_last(),
            KeyCode::Char('?') => self.full_help = !self.full_help,
            KeyCode::Char('/') => self.filter_state = FilterState::Filtering,
            KeyCode::Esc if self.filter_state == FilterState::Applied => self.clear_filter(),
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            _ => {}
        }
        Action::Continue
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.filter_state = if self.filter.is_empty() {
                    FilterState::Unfiltered
                } else {
                    FilterState::Applied
                };
            }
            KeyCode::Esc => self.clear_filter(),
            KeyCode::Backspace => {
                self.filter.pop();
                self.refilter();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.filter.push(c);
                self.refilter();
            }
            _ => {}
        }
    }

    fn clear_filter(&mut self) {
        self.filter.clear();
        self.filter_state = FilterState::Unfiltered;
        self.refilter();
    }

    fn refilter(&mut self) {
        let filter = &self.filter;
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| fuzzy_match(filter, item.filter_value()))
            .map(|(i, _)| i)
            .collect();
        self.state = ListState::default().with_selected((!self.visible.is_empty()).then_some(0));
    }

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let help = self.help_lines();
        let [title_area, _, list_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(help.len() as u16),
        ])
        .areas(area);

        let title = if self.filter_state == FilterState::Filtering {
            Line::from(vec![
                Span::styled("Filter: ", Style::new().fg(Color::Magenta)),
                Span::raw(self.filter.as_str()),
                Span::styled("█", Style::new().fg(Color::Magenta)),
            ])
        } else {
            Line::from(Span::styled(
                format!(" {} ", self.title),
                Style::new()
                    .fg(Color::White)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ))
        };
        frame.render_widget(Paragraph::new(title), title_area);

        let desc_width = usize::from(self.width).saturating_sub(2);
        let rows: Vec<ListItem<'_>> = self
            .visible
            .iter()
            .map(|&index| {
                let item = &self.items[index];
                ListItem::new(vec![
                    Line::styled(item.title(), Style::new().fg(Color::Gray)),
                    Line::styled(
                        truncate(item.description(), desc_width),
                        Style::new().fg(Color::DarkGray),
                    ),
                    Line::default(),
                ])
            })
            .collect();
        let list = List::new(rows)
            .highlight_symbol("│ ")
            .highlight_style(Style::new().fg(Color::LightMagenta).add_modifier(Modifier::BOLD));
        frame.render_stateful_widget(list, list_area, &mut self.state);

        let status = match (self.visible.len(), self.filter.is_empty()) {
            (0, _) => "No items.".to_string(),
            (n, true) => format!("{} item{}", n, if n == 1 { "" } else { "s" }),
            (n, false) => format!("“{}” {} of {} items", self.filter, n, self.items.len()),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(status, Style::new().fg(Color::DarkGray))),
            status_area,
        );
        let help: Vec<Line<'_>> = help
            .iter()
            .map(|line| Line::styled(*line, Style::new().fg(Color::DarkGray)))
            .collect();
        frame.render_widget(Paragraph::new(help), help_area);
    }
}

/// Cut `s` to `max` columns, ending in an ellipsis. `max == 0` means unbounded.
pub fn truncate(s: &str, max: usize) -> Cow<'_, str> {
    if max == 0 || s.chars().count() <= max {
        return Cow::Borrowed(s);
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    Cow::Owned(out)
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Owns the list and routes terminal events to it.
pub struct App<I> {
    list: ListView<I>,
}

impl<I: Item> App<I> {
    pub fn new(list: ListView<I>) -> Self {
        App { list }
    }

    /// Ctrl-C quits, resizes shrink the list by the margin, everything else
    /// goes to the list untouched.
    pub fn update(&mut self, event: &Event) -> Action {
        match event {
            Event::Key(key) if is_ctrl_c(key) => Action::Quit,
            Event::Resize(width, height) => {
                self.list.set_size(
                    width.saturating_sub(2 * DOC_MARGIN.horizontal),
                    height.saturating_sub(2 * DOC_MARGIN.vertical),
                );
                Action::Continue
            }
            Event::Key(key) => self.list.handle_key(*key),
            _ => Action::Continue,
        }
    }

    pub fn view(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area().inner(DOC_MARGIN);
        self.list.render(frame, area);
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let size = terminal.size()?;
        self.update(&Event::Resize(size.width, size.height));
        loop {
            terminal.draw(|frame| self.view(frame))?;
            let event = event::read()?;
            if self.update(&event) == Action::Quit {
                return Ok(());
            }
        }
    }
}

/// Raw mode plus alternate screen for as long as the guard lives.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(TerminalGuard { terminal }),
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                Err(e)
            }
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Take over the terminal and show `items` under `title` until the user quits.
pub fn show<I: Item>(title: String, items: Vec<I>) -> Result<(), CertError> {
    debug!(%title, items = items.len(), "entering alternate screen");
    let mut guard = TerminalGuard::enter()?;
    let mut app = App::new(ListView::new(title, items));
    app.run(guard.terminal_mut())?;
    Ok(())
}
