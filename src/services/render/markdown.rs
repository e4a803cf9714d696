use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

pub const DEFAULT_TITLE: &str = "Chapter";

/// Splits a chapter into its display title and the remaining body.
///
/// The first `# ` heading line is the title and is removed from the body;
/// deeper headings are left alone. Without one, the title is "Chapter".
pub fn split_title(markdown: &str) -> (String, String) {
    let mut title = None;
    let mut body = String::with_capacity(markdown.len());

    for line in markdown.split_inclusive('\n') {
        if title.is_none() {
            if let Some(text) = heading_text(line) {
                title = Some(text);
                continue;
            }
        }
        body.push_str(line);
    }

    (title.unwrap_or_else(|| DEFAULT_TITLE.to_string()), body)
}

fn heading_text(line: &str) -> Option<String> {
    let rest = line.trim_end_matches(['\n', '\r']).strip_prefix('#')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

pub fn markdown_to_html(body: &str) -> String {
    let parser = Parser::new_ext(body, options());
    let mut html_output = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}

/// Renders a one-line title's inline markup (emphasis, code, links) without
/// the paragraph wrapper. A title that parses as a block, such as `1. Scope`
/// read as a list, or one carrying raw HTML is kept as plain escaped text.
pub fn inline_markdown_to_html(text: &str) -> String {
    let events: Vec<Event> = Parser::new_ext(text, options()).collect();
    let inline_only = events.iter().all(|event| match event {
        Event::Start(tag) => matches!(
            tag,
            Tag::Paragraph | Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. }
        ),
        Event::Html(_) | Event::InlineHtml(_) => false,
        _ => true,
    });

    let mut html_output = String::with_capacity(text.len());
    if inline_only {
        let inline = events
            .into_iter()
            .filter(|event| !matches!(event, Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph)));
        html::push_html(&mut html_output, inline);
    } else {
        html::push_html(&mut html_output, std::iter::once(Event::Text(text.into())));
    }
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_title() {
        let (title, body) = split_title("# Title\n\nHello\n");
        assert_eq!(title, "Title");
        assert_eq!(body, "\nHello\n");
    }

    #[test]
    fn test_split_title_only_first_heading() {
        let (title, body) = split_title("Intro\n## Section\n# First\n# Second\n");
        assert_eq!(title, "First");
        assert_eq!(body, "Intro\n## Section\n# Second\n");
    }

    #[test]
    fn test_split_title_default() {
        let (title, body) = split_title("#hashtag\nno heading here");
        assert_eq!(title, DEFAULT_TITLE);
        assert_eq!(body, "#hashtag\nno heading here");
    }

    #[test]
    fn test_markdown_tables() {
        let html = markdown_to_html("| A | B |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_markdown_tasklist_and_strikethrough() {
        let html = markdown_to_html("- [ ] register\n- ~~old~~\n");
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn test_inline_title_markup() {
        assert_eq!(inline_markdown_to_html("**Bold** Title"), "<strong>Bold</strong> Title");
        assert_eq!(inline_markdown_to_html("Using `serde`"), "Using <code>serde</code>");
        assert_eq!(inline_markdown_to_html("R&D <Rules>"), "R&amp;D &lt;Rules&gt;");
    }

    #[test]
    fn test_inline_title_block_syntax_stays_text() {
        assert_eq!(inline_markdown_to_html("1. Scope"), "1. Scope");
        assert_eq!(inline_markdown_to_html("- Draft"), "- Draft");
    }
}
