use pulldown_cmark::{html, Options, Parser};

/// Render a note body to HTML for the detail view.
pub(crate) fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraph_and_emphasis() {
        let html = markdown_to_html("A *pitch* about **things**.");
        assert!(html.contains("<p>"));
        assert!(html.contains("<em>pitch</em>"));
        assert!(html.contains("<strong>things</strong>"));
    }

    #[test]
    fn renders_headings_and_lists() {
        let html = markdown_to_html("# Idea\n\n- one\n- two\n");
        assert!(html.contains("<h1>Idea</h1>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn renders_strikethrough_extension() {
        let html = markdown_to_html("~~scrapped~~");
        assert!(html.contains("<del>scrapped</del>"));
    }

    #[test]
    fn empty_body_renders_empty() {
        assert_eq!(markdown_to_html(""), "");
    }
}
