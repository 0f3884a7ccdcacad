use maud::{Markup, PreEscaped, html};

use crate::builtin;
use crate::normalize::DisplayRecord;

/// One card. Fields go in verbatim: the API already renders titles and names HTML-safe.
pub fn render_card(record: &DisplayRecord) -> Markup {
    let media = record.featured_media.to_string();

    html! {
        div class="col-4" {
            div class="p-card" {
                div class="p-card__content" {
                    span id="title-1" { (PreEscaped(&record.topic)) }
                    hr class="u-sv1";
                    img class="p-card__image" alt="" height="185" width="330" src=(PreEscaped(&media));
                    h3 {
                        a href=(PreEscaped(&record.link)) { (PreEscaped(&record.title)) }
                    }
                    div class="p-card__inner" {
                        "By "
                        a href=(PreEscaped(&record.author.link)) { (PreEscaped(&record.author.name)) }
                        " on "
                        (record.date)
                    }
                    hr class="u-sv1";
                    p class="u-no-padding--bottom" { (PreEscaped(&record.category)) }
                }
            }
        }
    }
}

/// Cards in input order, newline separated. No records, no markup.
pub fn render_grid(records: &[DisplayRecord]) -> Markup {
    let cards: Vec<String> = records
        .iter()
        .map(|r| render_card(r).into_string())
        .collect();
    PreEscaped(cards.join("\n"))
}

pub fn render_error_panel() -> Markup {
    html! {
        div class="p-strip" {
            div class="row" {
                div class="u-align--right col-4 col-medium-2 col-small-1" {
                    img src=(builtin::ERROR_LOGO_URL) alt="empty state" width="80";
                }
                div class="u-align--left col-8 col-medium-4 col-small-3" {
                    p class="p-heading--4 u-no-margin--bottom" { "Blog posts are not available" }
                    p { "Please try reloading the page" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{Author, FeaturedMedia};
    use serde_json::json;

    fn record(title: &str, link: &str) -> DisplayRecord {
        DisplayRecord {
            topic: "CLOUD".to_string(),
            category: "Article".to_string(),
            date: "5 March 2024".to_string(),
            featured_media: FeaturedMedia(json!("https://img.example.com/a.png")),
            link: link.to_string(),
            title: title.to_string(),
            author: Author {
                name: "Jane &amp; John".to_string(),
                link: "https://ubuntu.com/blog/author/jane".to_string(),
            },
        }
    }

    #[test]
    fn card_contains_every_field() {
        let html = render_card(&record("Hello", "https://ubuntu.com/blog/hello")).into_string();
        assert!(html.contains(r#"<span id="title-1">CLOUD</span>"#));
        assert!(html.contains(r#"src="https://img.example.com/a.png""#));
        assert!(html.contains(r#"<a href="https://ubuntu.com/blog/hello">Hello</a>"#));
        assert!(html.contains(
            r#"By <a href="https://ubuntu.com/blog/author/jane">Jane &amp; John</a> on 5 March 2024"#
        ));
        assert!(html.contains(r#"<p class="u-no-padding--bottom">Article</p>"#));
    }

    #[test]
    fn title_is_not_escaped_again() {
        let html = render_card(&record("Snaps &#8211; <em>fast</em>", "https://x")).into_string();
        assert!(html.contains("Snaps &#8211; <em>fast</em>"));
    }

    #[test]
    fn grid_keeps_order() {
        let records = vec![
            record("First", "https://ubuntu.com/blog/1"),
            record("Second", "https://ubuntu.com/blog/2"),
        ];
        let html = render_grid(&records).into_string();
        assert_eq!(html.matches(r#"class="p-card""#).count(), 2);
        let first = html.find("First").unwrap();
        let second = html.find("Second").unwrap();
        assert!(first < second);
        assert!(html.contains("</div>\n<div class=\"col-4\">"));
    }

    #[test]
    fn empty_grid_is_empty() {
        assert_eq!(render_grid(&[]).into_string(), "");
    }

    #[test]
    fn error_panel_is_static() {
        let a = render_error_panel().into_string();
        assert_eq!(a, render_error_panel().into_string());
        assert!(a.contains("Blog posts are not available"));
        assert!(a.contains("Please try reloading the page"));
        assert!(a.contains(builtin::ERROR_LOGO_URL));
        assert!(!a.contains("p-card"));
    }
}
