//! Presentation seam between the session and whatever draws it.

use crate::chapter::{Block, Chapter};
use crate::search::{SearchResult, SearchView};

pub const NO_RESULTS: &str = "No results";

/// Receives everything the reader shows. The session never draws directly.
pub trait Renderer {
    fn show_title(&mut self, title: &str, favorite: bool);
    fn show_book(&mut self, blocks: &[Block], chapters: &[Chapter]);
    fn show_search(&mut self, view: &SearchView);
    fn show_error(&mut self, message: &str);
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn highlight_markup(result: &SearchResult) -> String {
    result
        .line
        .marked(r#"<span class="highlight">"#, "</span>", escape_html)
}

/// Builds HTML fragments for the reading pane, sidebar and search results.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    pub title: String,
    pub content: String,
    pub sidebar: String,
    pub results: String,
}

impl Renderer for HtmlRenderer {
    fn show_title(&mut self, title: &str, _favorite: bool) {
        self.title = escape_html(title);
    }

    fn show_book(&mut self, blocks: &[Block], chapters: &[Chapter]) {
        self.content.clear();
        for block in blocks {
            match block {
                Block::Heading { id, title } => {
                    self.content.push_str(&format!(
                        "<h2 id=\"{id}\" class=\"chapter-heading\">{}</h2>\n",
                        escape_html(title)
                    ));
                }
                Block::Paragraph(text) => {
                    self.content
                        .push_str(&format!("<p>{}</p>\n", escape_html(text)));
                }
            }
        }

        self.sidebar.clear();
        self.sidebar.push_str("<ul class=\"chapter-list\">\n");
        for chapter in chapters {
            self.sidebar.push_str(&format!(
                "<li class=\"chapter-item\"><a href=\"#{}\">{}</a></li>\n",
                chapter.id,
                escape_html(&chapter.title)
            ));
        }
        self.sidebar.push_str("</ul>\n");
    }

    fn show_search(&mut self, view: &SearchView) {
        self.results.clear();
        match view {
            SearchView::Cleared => {}
            SearchView::NoResults => {
                self.results
                    .push_str(&format!("<div class=\"no-results\">{NO_RESULTS}</div>\n"));
            }
            SearchView::Results(results) => {
                for result in results {
                    let href = if result.chapter_id.is_empty() {
                        "#top".to_string()
                    } else {
                        format!("#{}", result.chapter_id)
                    };
                    self.results.push_str(&format!(
                        "<a class=\"search-result-item\" href=\"{href}\"><div class=\"result-chapter\">{}</div><div>{}</div></a>\n",
                        escape_html(&result.chapter_title),
                        highlight_markup(result)
                    ));
                }
            }
        }
    }

    fn show_error(&mut self, message: &str) {
        self.content = format!("<div class=\"load-error\">{}</div>\n", escape_html(message));
        self.sidebar.clear();
    }
}

impl HtmlRenderer {
    /// A standalone page with the body text at `font_size` pixels.
    pub fn page(&self, font_size: u16) -> String {
        let mut page = String::new();
        page.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        page.push_str(&format!("<title>{}</title>\n", self.title));
        page.push_str("<style>.highlight{background:#ffe08a}</style>\n");
        page.push_str("</head>\n");
        page.push_str(&format!(
            "<body id=\"top\" style=\"font-size:{font_size}px\">\n"
        ));
        page.push_str(&format!("<h1>{}</h1>\n", self.title));
        page.push_str("<nav>\n");
        page.push_str(&self.sidebar);
        page.push_str("</nav>\n<main>\n");
        page.push_str(&self.content);
        page.push_str("</main>\n</body>\n</html>\n");
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapter::parse;
    use crate::search::{SearchMode, search};

    #[test]
    fn renders_headings_with_anchor_ids() {
        let parsed = parse("## Intro\nHello <world>\n\n## Two");
        let mut html = HtmlRenderer::default();
        html.show_book(&parsed.blocks, &parsed.chapters);

        assert_eq!(
            html.content,
            "<h2 id=\"chap-0\" class=\"chapter-heading\">Intro</h2>\n<p>Hello &lt;world&gt;</p>\n<h2 id=\"chap-1\" class=\"chapter-heading\">Two</h2>\n"
        );
        assert!(html.sidebar.contains("<a href=\"#chap-1\">Two</a>"));
    }

    #[test]
    fn wraps_matches_in_highlight_spans() {
        let view = search("## Intro\nHello world", "hello", SearchMode::Pattern).unwrap();
        assert_eq!(
            highlight_markup(&view.results()[0]),
            "<span class=\"highlight\">Hello</span> world"
        );

        let mut html = HtmlRenderer::default();
        html.show_search(&view);
        assert!(html.results.contains("href=\"#chap-0\""));
    }

    #[test]
    fn no_results_placeholder_only_for_empty_scans() {
        let mut html = HtmlRenderer::default();
        html.show_search(&SearchView::Cleared);
        assert!(html.results.is_empty());
        html.show_search(&SearchView::NoResults);
        assert!(html.results.contains(NO_RESULTS));
    }

    #[test]
    fn error_replaces_content() {
        let mut html = HtmlRenderer::default();
        html.content = "<p>old</p>".into();
        html.show_error("Failed to load book: boom");
        assert_eq!(html.content, "<div class=\"load-error\">Failed to load book: boom</div>\n");
    }

    #[test]
    fn page_carries_font_size() {
        let mut html = HtmlRenderer::default();
        html.show_title("A & B", false);
        let page = html.page(30);
        assert!(page.contains("font-size:30px"));
        assert!(page.contains("<title>A &amp; B</title>"));
    }
}
