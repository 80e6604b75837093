//! Level-2 heading scan over raw markdown text.
//!
//! This is a line scan, not a markdown parser: a heading is any line that starts with
//! `## ` (exactly two markers followed by a space). When a non-blank document has no
//! such line the scan yields a single synthetic [`SUMMARY_HEADING`].

/// Label used when a document has no level-2 headings.
pub const SUMMARY_HEADING: &str = "Summary";

/// Restartable view over a markdown document; each call to [`Headings::iter`] starts a
/// fresh scan.
#[derive(Debug, Clone, Copy)]
pub struct Headings<'a> {
    markdown: &'a str,
}

impl<'a> Headings<'a> {
    pub fn new(markdown: &'a str) -> Self {
        Self { markdown }
    }

    pub fn iter(&self) -> HeadingIter<'a> {
        HeadingIter {
            lines: self.markdown.lines(),
            found_any: false,
            fallback: !self.markdown.trim().is_empty(),
        }
    }
}

impl<'a> IntoIterator for Headings<'a> {
    type Item = &'a str;
    type IntoIter = HeadingIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct HeadingIter<'a> {
    lines: std::str::Lines<'a>,
    found_any: bool,
    fallback: bool,
}

impl<'a> Iterator for HeadingIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if let Some(text) = parse_heading_line(line) {
                self.found_any = true;
                return Some(text);
            }
        }
        if !self.found_any && self.fallback {
            self.fallback = false;
            return Some(SUMMARY_HEADING);
        }
        None
    }
}

fn parse_heading_line(line: &str) -> Option<&str> {
    let text = line.strip_prefix("## ")?.trim();
    (!text.is_empty()).then_some(text)
}

/// Collect the headings of `markdown` in source order.
pub fn extract_headings(markdown: &str) -> Vec<String> {
    Headings::new(markdown)
        .iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_in_source_order() {
        let md = "# Daily digest\n\n## A\nsome text\n\n## B\n- item\n";
        assert_eq!(extract_headings(md), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_document_has_no_headings() {
        assert!(extract_headings("").is_empty());
        assert!(extract_headings("  \n\n").is_empty());
    }

    #[test]
    fn test_summary_fallback_for_plain_text() {
        assert_eq!(extract_headings("just a paragraph"), vec![SUMMARY_HEADING]);
        assert_eq!(extract_headings("# Only a title"), vec![SUMMARY_HEADING]);
    }

    #[test]
    fn test_only_exactly_two_markers_count() {
        let md = "### Deep\n#### Deeper\n##NoSpace\n ## Indented\n## Real\n";
        assert_eq!(extract_headings(md), vec!["Real"]);
    }

    #[test]
    fn test_heading_text_is_trimmed_and_crlf_tolerated() {
        let md = "##   Spaced out   \r\n## Next\r\n";
        assert_eq!(extract_headings(md), vec!["Spaced out", "Next"]);
    }

    #[test]
    fn test_scan_is_lazy_and_restartable() {
        let headings = Headings::new("## One\n## Two\n## Three");
        let mut first = headings.iter();
        assert_eq!(first.next(), Some("One"));

        let again: Vec<_> = headings.iter().collect();
        assert_eq!(again, vec!["One", "Two", "Three"]);
        assert_eq!(first.next(), Some("Two"));
    }

    #[test]
    fn test_iterator_is_fused_after_summary() {
        let mut iter = Headings::new("text").iter();
        assert_eq!(iter.next(), Some(SUMMARY_HEADING));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
