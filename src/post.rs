//! Defines the [`Post`] type and its [`Frontmatter`].

use crate::entry::Entry;
use crate::reading_time;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A blog post, parsed from a Markdown source file.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The post's slug, derived from its path within the posts directory.
    pub id: String,

    pub title: String,
    pub description: String,
    pub publish_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,

    /// Path or URL of the cover image. Posts without one get a gradient from
    /// [`crate::gradient`].
    pub cover_image: Option<String>,

    pub tags: Vec<String>,
    pub is_featured: bool,
    pub draft: bool,

    /// The Markdown body, without frontmatter.
    pub body: String,

    /// The reading-time estimate for `body`, e.g. `4 min read`.
    pub minutes_read: String,
}

impl Post {
    /// Builds a post from its id, parsed frontmatter, and Markdown body. The
    /// reading time is estimated at `words_per_minute`.
    pub fn new(id: String, frontmatter: Frontmatter, body: &str, words_per_minute: u32) -> Post {
        Post {
            id,
            title: frontmatter.title,
            description: frontmatter.description,
            publish_date: frontmatter.publish_date,
            updated_date: frontmatter.updated_date,
            cover_image: frontmatter.cover_image,
            tags: frontmatter.tags,
            is_featured: frontmatter.is_featured,
            draft: frontmatter.draft,
            minutes_read: reading_time::estimate(body, words_per_minute).to_string(),
            body: body.to_owned(),
        }
    }

    /// The date readers should see as "last changed": the updated date if the
    /// post has one, else the publish date.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_date.unwrap_or(self.publish_date)
    }
}

impl Entry for Post {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn draft(&self) -> bool {
        self.draft
    }
}

/// The YAML frontmatter of a post source file.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: String,
    pub description: String,

    #[serde(deserialize_with = "crate::date::deserialize")]
    pub publish_date: DateTime<Utc>,

    #[serde(default, deserialize_with = "crate::date::deserialize_option")]
    pub updated_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub cover_image: Option<String>,

    pub tags: Vec<String>,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub draft: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_frontmatter_defaults() -> Result<(), serde_yaml::Error> {
        let frontmatter: Frontmatter = serde_yaml::from_str(
            "title: Hello\ndescription: A greeting\npublishDate: 2024-01-15\ntags: [swift, ios]\n",
        )?;
        assert_eq!(None, frontmatter.updated_date);
        assert_eq!(None, frontmatter.cover_image);
        assert!(!frontmatter.is_featured);
        assert!(!frontmatter.draft);
        assert_eq!(vec!["swift", "ios"], frontmatter.tags);
        Ok(())
    }

    #[test]
    fn test_frontmatter_rejects_bad_date() {
        let result: Result<Frontmatter, _> = serde_yaml::from_str(
            "title: Hello\ndescription: A greeting\npublishDate: someday\ntags: []\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_post() -> Result<(), serde_yaml::Error> {
        let frontmatter: Frontmatter = serde_yaml::from_str(
            "title: Hello\ndescription: A greeting\npublishDate: 2024-01-15\n\
             updatedDate: 2024-02-01\nisFeatured: true\ntags: [swift]\n",
        )?;
        let body = "word ".repeat(450);
        let post = Post::new("hello".to_owned(), frontmatter, &body, 200);
        assert_eq!("hello", post.id());
        assert!(post.is_featured);
        assert_eq!("3 min read", post.minutes_read);
        assert_eq!(post.updated_date, Some(post.last_modified()));
        Ok(())
    }
}
