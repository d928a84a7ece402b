//! Post data structure.

use serde::{Deserialize, Serialize};

/// A news post discovered on a source page.
///
/// `link` is the identity key: two posts with the same link are the same post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Absolute URL to the post
    pub link: String,

    /// Publication date as printed on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Short excerpt shown next to the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

impl Post {
    /// Create a post with only the required fields set.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            date: None,
            contents: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }
}
