use nook_viewer::internal::content::render_article;
use nook_viewer::internal::headings::{SUMMARY_HEADING, extract_headings};
use nook_viewer::internal::models::ArticleElement;

const DIGEST: &str = r#"# Hacker News Digest

Top stories of the day.

## Show HN: A tiny database

Built in **Rust**, with a [write-up](https://example.com).

```rust
fn main() {}
```

## Ask HN: Favourite editor?

| Editor | Votes |
| --- | --- |
| Helix | 42 |

> Quoted comment

---
"#;

#[test]
fn should_use_first_h1_as_title_and_drop_it_from_body() {
    let article = render_article("hacker_news", DIGEST);
    assert_eq!(article.title, "Hacker News Digest");
    assert!(
        !article
            .elements
            .iter()
            .any(|e| matches!(e, ArticleElement::Heading(1, _))),
        "Title heading should not be repeated in the body"
    );
}

#[test]
fn should_keep_block_structure_in_order() {
    let article = render_article("hacker_news", DIGEST);
    let kinds: Vec<&str> = article
        .elements
        .iter()
        .map(|e| match e {
            ArticleElement::Paragraph(_) => "p",
            ArticleElement::Heading(_, _) => "h",
            ArticleElement::CodeBlock { .. } => "code",
            ArticleElement::List(_) => "list",
            ArticleElement::Table(_) => "table",
            ArticleElement::Image(_) => "img",
            ArticleElement::Quote(_) => "quote",
            ArticleElement::Rule => "hr",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["p", "h", "p", "code", "h", "table", "quote", "hr"]
    );
    assert_eq!(
        article.elements[3],
        ArticleElement::CodeBlock {
            lang: Some("rust".to_string()),
            code: "fn main() {}\n".to_string(),
        }
    );
}

#[test]
fn should_find_every_scanned_heading_in_the_rendered_body() {
    let article = render_article("hacker_news", DIGEST);
    for heading in extract_headings(DIGEST) {
        assert!(
            article.find_heading(&heading).is_some(),
            "heading {:?} should be present in the body",
            heading
        );
    }
}

#[test]
fn should_fall_back_to_identifier_and_summary() {
    let markdown = "Nothing but a paragraph.";
    let article = render_article("tech_feed", markdown);
    assert_eq!(article.title, "tech_feed");
    assert_eq!(extract_headings(markdown), vec![SUMMARY_HEADING]);
    assert_eq!(article.find_heading(SUMMARY_HEADING), None);
}

#[test]
fn should_render_nested_list_items_once() {
    let article = render_article("x", "- parent\n  - child\n- sibling\n");
    assert_eq!(
        article.elements,
        vec![ArticleElement::List(vec![
            "parent".to_string(),
            "  child".to_string(),
            "sibling".to_string(),
        ])]
    );
}
