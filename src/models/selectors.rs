// src/models/selectors.rs

//! CSS selectors describing where posts live on a source page.

use serde::{Deserialize, Serialize};

/// CSS selectors for scraping a news listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostSelectors {
    /// Selector for each repeated post container
    pub post: String,

    /// Selector for the title element within a post
    pub title: String,

    /// Optional selector for the link element (if different from title)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "default_link_attr")]
    pub link_attr: String,

    /// Selector for the date element within a post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Selector for the excerpt element within a post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

fn default_link_attr() -> String {
    "href".to_string()
}

impl PostSelectors {
    /// Create selectors with only the required post and title queries.
    pub fn new(post: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            post: post.into(),
            title: title.into(),
            link: None,
            link_attr: default_link_attr(),
            date: None,
            contents: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Iterate over every configured selector string.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        [Some(&self.post), Some(&self.title)]
            .into_iter()
            .chain([self.link.as_ref(), self.date.as_ref(), self.contents.as_ref()])
            .flatten()
            .map(String::as_str)
    }
}
