/// Prefix that turns a trimmed line into a chapter heading.
pub const HEADING_MARKER: &str = "##";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub id: String,
}

impl Chapter {
    pub fn target(&self) -> NavTarget {
        NavTarget::Anchor(self.id.clone())
    }
}

/// One rendered unit of the reading pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { id: String, title: String },
    Paragraph(String),
}

/// Where activating a sidebar item or search result should scroll to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    Top,
    Anchor(String),
}

impl NavTarget {
    /// An empty chapter id means the line sits before the first heading.
    pub fn from_chapter_id(id: &str) -> Self {
        if id.is_empty() {
            NavTarget::Top
        } else {
            NavTarget::Anchor(id.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub blocks: Vec<Block>,
    pub chapters: Vec<Chapter>,
}

pub fn chapter_id(ordinal: usize) -> String {
    format!("chap-{ordinal}")
}

/// Returns the heading title if `line` is a heading line.
///
/// Only a line whose trimmed form begins with the marker qualifies; a marker
/// further into the line is ordinary text. A bare marker yields `""`.
pub fn heading_title(line: &str) -> Option<&str> {
    line.trim().strip_prefix(HEADING_MARKER).map(str::trim)
}

pub fn parse(text: &str) -> Parsed {
    let mut parsed = Parsed::default();

    for line in text.split('\n') {
        if let Some(title) = heading_title(line) {
            let id = chapter_id(parsed.chapters.len());
            parsed.blocks.push(Block::Heading {
                id: id.clone(),
                title: title.to_string(),
            });
            parsed.chapters.push(Chapter {
                title: title.to_string(),
                id,
            });
            continue;
        }

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            parsed.blocks.push(Block::Paragraph(trimmed.to_string()));
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading_lines(text: &str) -> usize {
        text.split('\n')
            .filter(|l| l.trim().starts_with("##"))
            .count()
    }

    #[test]
    fn splits_headings_and_paragraphs_in_order() {
        let parsed = parse("## Intro\nHello world\n\n  ## Chapter Two  \n  Hello again  ");

        assert_eq!(
            parsed.blocks,
            vec![
                Block::Heading {
                    id: "chap-0".into(),
                    title: "Intro".into()
                },
                Block::Paragraph("Hello world".into()),
                Block::Heading {
                    id: "chap-1".into(),
                    title: "Chapter Two".into()
                },
                Block::Paragraph("Hello again".into()),
            ]
        );
        assert_eq!(
            parsed.chapters,
            vec![
                Chapter {
                    title: "Intro".into(),
                    id: "chap-0".into()
                },
                Chapter {
                    title: "Chapter Two".into(),
                    id: "chap-1".into()
                },
            ]
        );
    }

    #[test]
    fn blank_lines_produce_no_blocks() {
        let parsed = parse("\n\n   \nonly\n\t\n");
        assert_eq!(parsed.blocks, vec![Block::Paragraph("only".into())]);
        assert!(parsed.chapters.is_empty());
    }

    #[test]
    fn bare_marker_gives_empty_title() {
        let parsed = parse("##\n##   \n");
        let titles: Vec<_> = parsed.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["", ""]);
        assert_eq!(parsed.chapters[1].id, "chap-1");
    }

    #[test]
    fn marker_inside_a_line_is_not_a_heading() {
        let parsed = parse("see ## below\ntext");
        assert!(parsed.chapters.is_empty());
        assert_eq!(parsed.blocks[0], Block::Paragraph("see ## below".into()));
    }

    #[test]
    fn deeper_markers_still_count_as_headings() {
        // "###" trims to a title that keeps the third '#'.
        let parsed = parse("### Part");
        assert_eq!(parsed.chapters[0].title, "# Part");
    }

    #[test]
    fn chapter_count_matches_heading_lines() {
        let texts = [
            "",
            "## a\n## b\n## c",
            "x\n  ##y\nz ## w\n##\n\r\n## tail\r",
            "no headings at all\njust text",
        ];
        for text in texts {
            assert_eq!(parse(text).chapters.len(), heading_lines(text), "{text:?}");
        }
    }

    #[test]
    fn heading_blocks_follow_chapter_order() {
        let parsed = parse("pre\n## one\nbody\n## two\n## three\nend");
        let from_blocks: Vec<&str> = parsed
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading { title, .. } => Some(title.as_str()),
                Block::Paragraph(_) => None,
            })
            .collect();
        let from_chapters: Vec<&str> = parsed.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(from_blocks, from_chapters);
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = "## A\n1\n\n## B\n2";
        assert_eq!(parse(text), parse(text));
    }

    #[test]
    fn crlf_lines_are_trimmed() {
        let parsed = parse("## Title\r\nbody\r\n");
        assert_eq!(parsed.chapters[0].title, "Title");
        assert_eq!(parsed.blocks[1], Block::Paragraph("body".into()));
    }

    #[test]
    fn empty_chapter_id_targets_top() {
        assert_eq!(NavTarget::from_chapter_id(""), NavTarget::Top);
        assert_eq!(
            NavTarget::from_chapter_id("chap-3"),
            NavTarget::Anchor("chap-3".into())
        );
    }
}
