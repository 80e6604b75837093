//! Markdown to article conversion.
//!
//! Markdown is converted to HTML by comrak. The first `<h1>` becomes the article title
//! and is cut from the body; the rest of the HTML is parsed into display elements.

use comrak::{Options, markdown_to_html};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

use super::models::{Article, ArticleElement};
use crate::utils::html_parser::{fragment_text, parse_article_html};

/// How long a heading stays highlighted after jumping to it.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(2);

static H1_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<h1[^>]*>(.*?)</h1>").unwrap());

/// Render `markdown` to HTML with the digest's markdown flavour (GFM tables, autolinks).
pub fn render_html(markdown: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    markdown_to_html(markdown, &options)
}

/// Split rendered HTML into the first level-1 heading's text and the remaining body.
/// Returns `None` for the title when the document has no level-1 heading.
pub fn split_title(html: &str) -> (Option<String>, String) {
    match H1_REGEX.captures(html) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            let title = caps
                .get(1)
                .map(|m| fragment_text(m.as_str()).trim().to_string())
                .unwrap_or_default();
            let mut body = String::with_capacity(html.len());
            body.push_str(&html[..whole.start]);
            body.push_str(&html[whole.end..]);
            (Some(title), body)
        }
        None => (None, html.to_string()),
    }
}

/// Build the article for `identifier` from its markdown. The identifier is the title
/// when the markdown has no level-1 heading.
#[tracing::instrument(skip(markdown), fields(len = markdown.len()))]
pub fn render_article(identifier: &str, markdown: &str) -> Article {
    let html = render_html(markdown);
    let (title, body) = split_title(&html);
    Article {
        title: title.unwrap_or_else(|| identifier.to_string()),
        elements: parse_article_html(&body),
    }
}

impl Article {
    /// Index of the first level-2 heading whose trimmed text equals `text`.
    pub fn find_heading(&self, text: &str) -> Option<usize> {
        self.elements.iter().position(|element| {
            matches!(element, ArticleElement::Heading(2, heading) if heading.trim() == text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_extracted_and_removed_from_body() {
        let article = render_article("hacker_news", "# Title\n\nBody");
        assert_eq!(article.title, "Title");
        assert_eq!(
            article.elements,
            vec![ArticleElement::Paragraph("Body".to_string())]
        );
    }

    #[test]
    fn test_identifier_is_fallback_title() {
        let article = render_article("tech_feed", "## Section\n\nText");
        assert_eq!(article.title, "tech_feed");
        assert_eq!(
            article.elements[0],
            ArticleElement::Heading(2, "Section".to_string())
        );
    }

    #[test]
    fn test_only_first_h1_is_removed() {
        let article = render_article("x", "# First\n\n# Second\n");
        assert_eq!(article.title, "First");
        assert_eq!(
            article.elements,
            vec![ArticleElement::Heading(1, "Second".to_string())]
        );
    }

    #[test]
    fn test_inline_markup_in_title_is_flattened() {
        let article = render_article("x", "# Daily *digest* & more\n");
        assert_eq!(article.title, "Daily digest & more");
    }

    #[test]
    fn test_find_heading_matches_exact_trimmed_level_two() {
        let article = render_article(
            "reddit_explorer",
            "# Reddit\n\n## rust\n\nposts\n\n### rustacean\n\n## rustacean\n",
        );
        assert_eq!(article.find_heading("rustacean"), Some(3));
        assert_eq!(article.find_heading("rust"), Some(0));
        assert_eq!(article.find_heading("Rust"), None);
        assert_eq!(article.find_heading("Summary"), None);
    }

    #[test]
    fn test_split_title_without_h1() {
        let (title, body) = split_title("<p>plain</p>\n");
        assert_eq!(title, None);
        assert_eq!(body, "<p>plain</p>\n");
    }
}
