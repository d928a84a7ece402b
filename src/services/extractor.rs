// src/services/extractor.rs

//! Post extraction from a fetched news page.
//!
//! Pure: no network or storage access. The caller hands in the document body
//! and the base URL that relative links resolve against.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Post, PostSelectors};
use crate::utils::resolve_link;

/// Site-specific HTML to [`Post`] converter with pre-compiled selectors.
#[derive(Debug, Clone)]
pub struct Extractor {
    source_name: String,
    post: Selector,
    title: Selector,
    link: Option<Selector>,
    link_attr: String,
    date: Option<Selector>,
    contents: Option<Selector>,
}

impl Extractor {
    /// Compile the selectors for one source.
    pub fn new(source_name: impl Into<String>, selectors: &PostSelectors) -> Result<Self> {
        Ok(Self {
            source_name: source_name.into(),
            post: parse_selector(&selectors.post)?,
            title: parse_selector(&selectors.title)?,
            link: selectors.link.as_deref().map(parse_selector).transpose()?,
            link_attr: selectors.link_attr.clone(),
            date: selectors.date.as_deref().map(parse_selector).transpose()?,
            contents: selectors.contents.as_deref().map(parse_selector).transpose()?,
        })
    }

    /// Extract every valid post from the document, in page order.
    ///
    /// Elements missing a title or a link are skipped. Zero matches is an
    /// empty result, not an error.
    pub fn extract(&self, raw_html: &str, base_url: &Url) -> Result<Vec<Post>> {
        self.check_document(raw_html)?;

        let document = Html::parse_document(raw_html);
        let posts: Vec<Post> = document
            .select(&self.post)
            .filter_map(|element| self.parse_post(&element, base_url))
            .collect();

        log::debug!(
            "Extracted {} posts from {} ({} matched elements)",
            posts.len(),
            self.source_name,
            document.select(&self.post).count()
        );
        Ok(posts)
    }

    /// Reject bodies that are not markup at all.
    fn check_document(&self, raw_html: &str) -> Result<()> {
        if raw_html.contains('\0') {
            return Err(AppError::parse(
                &self.source_name,
                "body contains binary data",
            ));
        }
        if !raw_html.trim().is_empty() && !raw_html.contains('<') {
            return Err(AppError::parse(
                &self.source_name,
                "body contains no HTML markup",
            ));
        }
        Ok(())
    }

    fn parse_post(&self, element: &ElementRef, base_url: &Url) -> Option<Post> {
        let title_elem = element.select(&self.title).next()?;
        let title = element_text(&title_elem);
        if title.is_empty() {
            return None;
        }

        let link_elem = match &self.link {
            Some(sel) => element.select(sel).next()?,
            None => title_elem,
        };
        let href = link_elem.value().attr(&self.link_attr)?;
        let link = resolve_link(base_url, href)?;

        Some(Post {
            title,
            link,
            date: optional_text(element, self.date.as_ref()),
            contents: optional_text(element, self.contents.as_ref()),
        })
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn optional_text(element: &ElementRef, selector: Option<&Selector>) -> Option<String> {
    let found = element.select(selector?).next()?;
    let text = element_text(&found);
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.org";

    fn base_url() -> Url {
        Url::parse(BASE).unwrap()
    }

    fn extractor() -> Extractor {
        let selectors = PostSelectors::new("div.post", "h2 a")
            .with_date("span.date")
            .with_contents("p.lead");
        Extractor::new("test", &selectors).unwrap()
    }

    const PAGE: &str = r#"
        <html><body>
          <div class="post">
            <h2><a href="/news/123">  Rekrutacja na studia  </a></h2>
            <span class="date"> 12.10.2026 </span>
            <p class="lead">
              Ruszyła rekrutacja.
            </p>
          </div>
          <div class="post">
            <h2><a href="https://other.org/abs">Absolute link</a></h2>
          </div>
          <div class="post">
            <h2><a>No href here</a></h2>
          </div>
          <div class="post">
            <span class="date">01.01.2026</span>
          </div>
          <div class="post">
            <h2><a href="/news/empty">   </a></h2>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_valid_posts_in_order() {
        let posts = extractor().extract(PAGE, &base_url()).unwrap();
        assert_eq!(posts.len(), 2);

        assert_eq!(posts[0].title, "Rekrutacja na studia");
        assert_eq!(posts[0].link, "https://example.org/news/123");
        assert_eq!(posts[0].date.as_deref(), Some("12.10.2026"));
        assert_eq!(posts[0].contents.as_deref(), Some("Ruszyła rekrutacja."));

        assert_eq!(posts[1].title, "Absolute link");
        assert_eq!(posts[1].link, "https://other.org/abs");
    }

    #[test]
    fn test_missing_optional_fields_are_unset() {
        let posts = extractor().extract(PAGE, &base_url()).unwrap();
        assert!(posts[1].date.is_none());
        assert!(posts[1].contents.is_none());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let ex = extractor();
        let first = ex.extract(PAGE, &base_url()).unwrap();
        let second = ex.extract(PAGE, &base_url()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_matches_is_empty() {
        let html = "<html><body><p>Strona w przebudowie</p></body></html>";
        assert!(extractor().extract(html, &base_url()).unwrap().is_empty());
        assert!(extractor().extract("", &base_url()).unwrap().is_empty());
    }

    #[test]
    fn test_separate_link_selector() {
        let selectors = PostSelectors::new("li.item", "span.title").with_link("a.more");
        let ex = Extractor::new("test", &selectors).unwrap();
        let html = r#"
            <ul>
              <li class="item"><span class="title">Z linkiem</span><a class="more" href="/a/1">więcej</a></li>
              <li class="item"><span class="title">Bez linku</span></li>
            </ul>
        "#;
        let posts = ex.extract(html, &base_url()).unwrap();
        assert_eq!(posts, vec![Post::new("Z linkiem", "https://example.org/a/1")]);
    }

    #[test]
    fn test_custom_link_attribute() {
        let mut selectors = PostSelectors::new("div.card", "h3");
        selectors.link = Some("div.card-body".to_string());
        selectors.link_attr = "data-url".to_string();
        let ex = Extractor::new("test", &selectors).unwrap();
        let html = r#"<div class="card"><h3>Karta</h3><div class="card-body" data-url="/k/9"></div></div>"#;
        let posts = ex.extract(html, &base_url()).unwrap();
        assert_eq!(posts[0].link, "https://example.org/k/9");
    }

    #[test]
    fn test_non_markup_body_is_parse_error() {
        let err = extractor()
            .extract(r#"{"error": "maintenance"}"#, &base_url())
            .unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));

        let err = extractor().extract("<html>\0\0</html>", &base_url()).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let selectors = PostSelectors::new("[[invalid", "a");
        assert!(matches!(
            Extractor::new("test", &selectors),
            Err(AppError::Selector { .. })
        ));
    }
}
