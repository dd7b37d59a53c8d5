//! Terminal side of the `Renderer` seam.
//!
//! Blocks are wrapped ahead of drawing so every chapter anchor has a known
//! row; jumping to a chapter is then just setting the scroll offset.

use std::collections::HashMap;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::chapter::{Block, Chapter, NavTarget};
use crate::render::Renderer;
use crate::search::{SearchResult, SearchView};
use crate::session::DEFAULT_FONT_SIZE;

pub const ACCENT: Color = Color::Yellow;
const MIN_COLUMN: u16 = 20;

pub fn heading_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn highlight_style() -> Style {
    Style::default().fg(Color::Black).bg(ACCENT)
}

/// Width of the reading column for a pane of `pane` cells.
///
/// Larger font sizes give a narrower column, the way zooming narrows the
/// number of characters per line in a browser.
pub fn column_width(pane: u16, font_size: u16) -> u16 {
    let scaled = u32::from(pane) * u32::from(DEFAULT_FONT_SIZE) / u32::from(font_size.max(1));
    let width = scaled.min(u32::from(pane)) as u16;
    width.max(MIN_COLUMN.min(pane))
}

#[derive(Debug, Clone)]
pub struct Wrapped {
    pub width: usize,
    pub lines: Vec<Line<'static>>,
    pub anchors: HashMap<String, usize>,
}

impl Wrapped {
    pub fn row_of(&self, target: &NavTarget) -> Option<usize> {
        match target {
            NavTarget::Top => Some(0),
            NavTarget::Anchor(id) => self.anchors.get(id).copied(),
        }
    }
}

pub fn wrap_blocks(blocks: &[Block], width: usize) -> Wrapped {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut anchors = HashMap::new();

    for block in blocks {
        match block {
            Block::Heading { id, title } => {
                anchors.insert(id.clone(), lines.len());
                for row in textwrap::wrap(title, width) {
                    lines.push(Line::styled(row.into_owned(), heading_style()));
                }
            }
            Block::Paragraph(text) => {
                for row in textwrap::wrap(text, width) {
                    lines.push(Line::from(row.into_owned()));
                }
            }
        }
        lines.push(Line::default());
    }

    Wrapped {
        width,
        lines,
        anchors,
    }
}

pub fn result_lines(result: &SearchResult) -> Vec<Line<'static>> {
    let chapter = Line::styled(result.chapter_title.clone(), Style::default().fg(ACCENT));
    let spans: Vec<Span<'static>> = result
        .line
        .segments
        .iter()
        .map(|segment| {
            if segment.highlighted {
                Span::styled(segment.text.clone(), highlight_style())
            } else {
                Span::raw(segment.text.clone())
            }
        })
        .collect();
    vec![chapter, Line::from(spans)]
}

/// What the terminal currently shows.
#[derive(Debug, Default)]
pub struct TerminalView {
    pub title: String,
    pub favorite: bool,
    pub blocks: Vec<Block>,
    pub chapters: Vec<Chapter>,
    pub search: SearchView,
    pub error: Option<String>,
    wrapped: Option<Wrapped>,
}

impl TerminalView {
    /// The wrapped reading pane for `width` columns, rewrapped only when the
    /// width or the book changes.
    pub fn wrapped(&mut self, width: usize) -> &Wrapped {
        let stale = self.wrapped.as_ref().is_none_or(|w| w.width != width.max(1));
        if stale {
            self.wrapped = None;
        }
        self.wrapped
            .get_or_insert_with(|| wrap_blocks(&self.blocks, width))
    }
}

impl Renderer for TerminalView {
    fn show_title(&mut self, title: &str, favorite: bool) {
        self.title = title.to_string();
        self.favorite = favorite;
    }

    fn show_book(&mut self, blocks: &[Block], chapters: &[Chapter]) {
        self.blocks = blocks.to_vec();
        self.chapters = chapters.to_vec();
        self.error = None;
        self.wrapped = None;
    }

    fn show_search(&mut self, view: &SearchView) {
        self.search = view.clone();
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.blocks.clear();
        self.chapters.clear();
        self.wrapped = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapter::parse;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn anchors_point_at_heading_rows() {
        let parsed = parse("intro text\n## One\nfirst body\n## Two\nsecond");
        let wrapped = wrap_blocks(&parsed.blocks, 40);

        let one = wrapped.row_of(&NavTarget::Anchor("chap-0".into())).unwrap();
        let two = wrapped.row_of(&NavTarget::Anchor("chap-1".into())).unwrap();
        assert_eq!(text(&wrapped.lines[one]), "One");
        assert_eq!(text(&wrapped.lines[two]), "Two");
        assert_eq!(wrapped.row_of(&NavTarget::Top), Some(0));
        assert_eq!(wrapped.row_of(&NavTarget::Anchor("chap-7".into())), None);
    }

    #[test]
    fn long_paragraphs_wrap_to_width() {
        let parsed = parse("one two three four five six\n## After");
        let wrapped = wrap_blocks(&parsed.blocks, 10);
        assert!(wrapped.lines.iter().all(|l| l.width() <= 10));
        let after = wrapped.anchors["chap-0"];
        assert_eq!(text(&wrapped.lines[after]), "After");
        assert!(after > 2);
    }

    #[test]
    fn column_narrows_as_font_grows() {
        assert_eq!(column_width(100, 22), 100);
        assert_eq!(column_width(100, 12), 100);
        assert_eq!(column_width(100, 44), 50);
        assert_eq!(column_width(10, 48), 10);
    }

    #[test]
    fn result_lines_style_matches() {
        let view =
            crate::search::search("x\nfind me", "find", crate::search::SearchMode::Pattern).unwrap();
        let lines = result_lines(&view.results()[0]);
        assert_eq!(text(&lines[0]), crate::search::START_OF_BOOK);
        assert_eq!(lines[1].spans[0].content, "find");
        assert_eq!(lines[1].spans[0].style, highlight_style());
    }

    #[test]
    fn error_drops_book_content() {
        let mut view = TerminalView::default();
        let parsed = parse("## A\nb");
        view.show_book(&parsed.blocks, &parsed.chapters);
        assert_eq!(view.wrapped(20).anchors.len(), 1);
        view.show_error("Failed to load book: x");
        assert!(view.wrapped(20).lines.is_empty());
        assert!(view.chapters.is_empty());
    }
}
