use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use color_eyre::Result;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Margin, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::*,
};

use crate::chapter::NavTarget;
use crate::favorites::{self, FavoritesStore};
use crate::library::BookSource;
use crate::render::{NO_RESULTS, Renderer};
use crate::search::SearchView;
use crate::session::Session;
use crate::view::{self, ACCENT, TerminalView};

const FONT_STEP: i32 = 2;
const SIDEBAR_WIDTH: u16 = 28;
const DEFAULT_COLUMN: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Content,
    Sidebar,
}

pub struct App {
    running: bool,
    session: Session,
    source: Box<dyn BookSource>,
    store: Box<dyn FavoritesStore>,
    view: TerminalView,
    offset: usize,
    page: usize,
    column: usize,
    focus: Focus,
    chapter_state: ListState,
    result_state: ListState,
    sidebar_area: Rect,
    status: Option<String>,
}

impl App {
    pub fn new(session: Session, source: Box<dyn BookSource>, store: Box<dyn FavoritesStore>) -> Self {
        Self {
            running: false,
            session,
            source,
            store,
            view: TerminalView::default(),
            offset: 0,
            page: 1,
            column: DEFAULT_COLUMN,
            focus: Focus::Content,
            chapter_state: ListState::default(),
            result_state: ListState::default(),
            sidebar_area: Rect::default(),
            status: None,
        }
    }

    /// Loads `id`, or leaves the reader empty when there is none.
    pub fn open(&mut self, id: Option<&str>) {
        if let Some(id) = id {
            self.session.load(self.source.as_ref(), self.store.as_ref(), id);
        }
        self.offset = 0;
        self.chapter_state.select(None);
        self.result_state.select(None);
        self.session.present(&mut self.view);
    }

    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|f| {
                self.render(f);
            })?;
            self.handle_crossterm_event()?;
        }
        Ok(())
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = self.get_layout_chunks(frame.area());
        self.render_title(frame, chunks[0]);

        let body = if self.session.sidebar_visible {
            let parts = Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                .split(chunks[1]);
            self.render_sidebar(frame, parts[0]);
            parts[1]
        } else {
            self.sidebar_area = Rect::default();
            chunks[1]
        };
        self.render_content(frame, body);
        self.render_footer(frame, chunks[2]);

        if self.session.search_open {
            self.render_search(frame, body);
        }
    }

    fn get_layout_chunks(&self, area: Rect) -> Vec<Rect> {
        let bar = if self.session.fullscreen { 0 } else { 1 };
        Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(bar),
                    Constraint::Min(1),
                    Constraint::Length(bar),
                ]
                .as_ref(),
            )
            .split(area)
            .to_vec()
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            self.view.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )];
        if self.session.book_id.is_some() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                favorites::symbol(self.view.favorite),
                Style::default().fg(ACCENT),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_sidebar(&mut self, frame: &mut Frame, area: Rect) {
        self.sidebar_area = area;
        let border = if self.focus == Focus::Sidebar {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        };
        let items: Vec<ListItem> = self
            .view
            .chapters
            .iter()
            .map(|c| ListItem::new(c.title.as_str()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Chapters ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.chapter_state);
    }

    fn render_content(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.page = usize::from(inner.height.max(1));

        if let Some(error) = &self.view.error {
            let p = Paragraph::new(error.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(p, inner);
            return;
        }

        let width = view::column_width(inner.width, self.session.font_size);
        let [column] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(inner);
        self.column = usize::from(width);
        let wrapped = self.view.wrapped(self.column);
        self.offset = self.offset.min(wrapped.lines.len().saturating_sub(1));
        let visible: Vec<Line> = wrapped
            .lines
            .iter()
            .skip(self.offset)
            .take(usize::from(column.height))
            .cloned()
            .collect();
        frame.render_widget(Paragraph::new(Text::from(visible)), column);
    }

    fn render_search(&mut self, frame: &mut Frame, area: Rect) {
        let [popup] = Layout::horizontal([Constraint::Percentage(80)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::vertical([Constraint::Percentage(80)])
            .flex(Flex::Center)
            .areas(popup);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [input, results] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);
        let prompt = Line::from(vec![
            Span::styled("/ ", Style::default().fg(ACCENT)),
            Span::raw(self.session.query.as_str()),
        ]);
        frame.render_widget(Paragraph::new(prompt), input);

        if let Some(err) = &self.session.search_error {
            let p = Paragraph::new(err.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(p, results);
            return;
        }

        match &self.view.search {
            SearchView::Cleared => {}
            SearchView::NoResults => {
                let p = Paragraph::new(NO_RESULTS)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(p, results);
            }
            SearchView::Results(found) => {
                let items: Vec<ListItem> = found
                    .iter()
                    .map(|r| ListItem::new(Text::from(view::result_lines(r))))
                    .collect();
                let list = List::new(items)
                    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
                frame.render_stateful_widget(list, results, &mut self.result_state);
            }
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hint = match &self.status {
            Some(status) => status.clone(),
            None => format!(
                " quit (q) | chapters (t) | search (/) | favorite (f) | size {} (+/-) | fullscreen (F) | top (g) ",
                self.session.font_size
            ),
        };
        let footer = Paragraph::new(hint)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true })
            .style(Style::default());
        frame.render_widget(footer, area);
    }

    fn handle_crossterm_event(&mut self) -> Result<()> {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;
        if self.session.search_open {
            self.handle_search_key(key);
            return;
        }
        if self.focus == Focus::Sidebar && self.handle_sidebar_key(key) {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_down(self.page),
            KeyCode::PageUp => self.scroll_up(self.page),
            KeyCode::Char('g') | KeyCode::Home => self.offset = 0,
            KeyCode::Char('G') | KeyCode::End => self.offset = usize::MAX,
            KeyCode::Char('t') => {
                self.session.toggle_sidebar();
                if !self.session.sidebar_visible {
                    self.focus = Focus::Content;
                }
            }
            KeyCode::Tab if self.session.sidebar_visible => {
                self.focus = match self.focus {
                    Focus::Content => Focus::Sidebar,
                    Focus::Sidebar => Focus::Content,
                };
                if self.focus == Focus::Sidebar && self.chapter_state.selected().is_none() {
                    self.chapter_state.select_first();
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.session.change_font_size(FONT_STEP);
            }
            KeyCode::Char('-') => {
                self.session.change_font_size(-FONT_STEP);
            }
            KeyCode::Char('F') => self.session.toggle_fullscreen(),
            KeyCode::Char('/') => {
                self.session.toggle_search();
                self.focus = Focus::Content;
            }
            KeyCode::Char('f') => self.toggle_favorite(),
            _ => {}
        }
    }

    /// Returns true when the key was consumed by the chapter list.
    fn handle_sidebar_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.chapter_state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.chapter_state.select_previous(),
            KeyCode::Enter => {
                if let Some(chapter) = self
                    .chapter_state
                    .selected()
                    .and_then(|i| self.view.chapters.get(i))
                {
                    let target = chapter.target();
                    self.jump(&target);
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.session.close_search(),
            KeyCode::Down => self.result_state.select_next(),
            KeyCode::Up => self.result_state.select_previous(),
            KeyCode::Enter => {
                let target = self
                    .result_state
                    .selected()
                    .and_then(|i| self.view.search.results().get(i))
                    .map(|r| r.target());
                if let Some(target) = target {
                    self.jump(&target);
                }
            }
            KeyCode::Backspace => {
                let mut query = self.session.query.clone();
                query.pop();
                self.update_query(&query);
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let query = format!("{}{c}", self.session.query);
                self.update_query(&query);
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_down(3),
            MouseEventKind::ScrollUp => self.scroll_up(3),
            MouseEventKind::Down(MouseButton::Left) => {
                // Only the list rows count, not the rounded border around them.
                let list = self.sidebar_area.inner(Margin::new(1, 1));
                let at = Position::new(mouse.column, mouse.row);
                if self.session.search_open || !list.contains(at) {
                    return;
                }
                let index = self.chapter_state.offset() + usize::from(mouse.row - list.y);
                if let Some(chapter) = self.view.chapters.get(index) {
                    let target = chapter.target();
                    self.chapter_state.select(Some(index));
                    self.jump(&target);
                }
            }
            _ => {}
        }
    }

    fn update_query(&mut self, query: &str) {
        if let Err(err) = self.session.set_query(query) {
            tracing::debug!(error = %err, "search query rejected");
        }
        self.result_state.select(match self.session.search_view {
            SearchView::Results(_) => Some(0),
            _ => None,
        });
        self.view.show_search(&self.session.search_view);
    }

    fn toggle_favorite(&mut self) {
        match self.session.toggle_favorite(self.store.as_ref()) {
            Ok(favorite) => {
                self.view.show_title(&self.session.title, favorite);
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not update favorites");
                self.status = Some(format!(" favorites: {err} "));
            }
        }
    }

    fn jump(&mut self, target: &NavTarget) {
        let Some(resolved) = self.session.activate(target) else {
            return;
        };
        if let Some(row) = self.view.wrapped(self.column).row_of(&resolved) {
            self.offset = row;
        }
    }

    fn scroll_down(&mut self, rows: usize) {
        self.offset = self.offset.saturating_add(rows);
    }

    fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }
}
