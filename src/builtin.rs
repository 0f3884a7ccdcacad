use maud::{DOCTYPE, Markup, html};

pub const DEFAULT_FETCH_URL: &str =
    "https://people.canonical.com/~anthonydillon/wp-json/wp/v2/posts.json";

pub const DEFAULT_TOPIC: &str = "Articles";
pub const DEFAULT_CATEGORY: &str = "Article";

pub const DEFAULT_AUTHOR_NAME: &str = "Canonical";
pub const DEFAULT_AUTHOR_LINK: &str = "https://ubuntu.com/blog/author/canonical/";

pub const DEFAULT_INNER_PROPS_PATH: &[&str] = &["_embedded", "wp:term"];
pub const DEFAULT_AUTHOR_PATH: &[&str] = &["_embedded", "author"];

pub const MOUNT_SELECTOR: &str = "#mount-point";

pub const ERROR_LOGO_URL: &str =
    "https://blog.documentfoundation.org/wp-content/uploads/2016/07/canonical-logo3.png";

/// Page used when no `--template` is given: an empty grid row holding the mount point.
pub fn page_shell() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Blog" }
            }
            body {
                div class="row" id="mount-point" {}
            }
        }
    }
}
