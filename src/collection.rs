//! Defines [`Collection`], the published view of a site's content and the
//! queries pages are built from.

use crate::config::Config;
use crate::entry::Entry;
use crate::parser::{Parser, Result};
use crate::post::Post;
use crate::project::Project;
use crate::related;
use tracing::debug;

/// A tag together with the number of published posts that carry it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// The published content of a site. Drafts are dropped on construction;
/// posts are kept newest first and projects in ascending `order`. Both sorts
/// are stable, so entries which compare equal keep their load order.
pub struct Collection {
    posts: Vec<Post>,
    projects: Vec<Project>,
}

impl Collection {
    /// Builds the published view from freshly parsed entries.
    pub fn new(posts: Vec<Post>, projects: Vec<Project>) -> Collection {
        let mut posts: Vec<Post> = posts.into_iter().filter(|p| !p.draft()).collect();
        posts.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));

        let mut projects: Vec<Project> =
            projects.into_iter().filter(|p| !p.draft()).collect();
        projects.sort_by(|a, b| a.order.total_cmp(&b.order));

        debug!(
            posts = posts.len(),
            projects = projects.len(),
            "built published collection"
        );
        Collection { posts, projects }
    }

    /// Loads and publishes the posts and projects named by `config`.
    pub fn load(config: &Config) -> Result<Collection> {
        let parser = Parser::new(config.words_per_minute);
        let posts = parser.parse_posts(&config.posts_directory)?;
        let projects = parser.parse_projects(&config.projects_directory)?;
        Ok(Collection::new(posts, projects))
    }

    /// All published posts, newest first.
    pub fn published_posts(&self) -> &[Post] {
        &self.posts
    }

    /// The `n` newest featured posts.
    pub fn featured_posts(&self, n: usize) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.is_featured).take(n).collect()
    }

    /// The `n` newest posts.
    pub fn recent_posts(&self, n: usize) -> &[Post] {
        &self.posts[..n.min(self.posts.len())]
    }

    /// Every tag in use with its post count, in the order tags are first seen
    /// walking posts newest first.
    pub fn tag_counts(&self) -> Vec<TagCount> {
        let mut counts: Vec<TagCount> = Vec::new();
        for tag in self.posts.iter().flat_map(|p| p.tags.iter()) {
            match counts.iter_mut().find(|c| &c.tag == tag) {
                Some(c) => c.count += 1,
                None => counts.push(TagCount {
                    tag: tag.clone(),
                    count: 1,
                }),
            }
        }
        counts
    }

    /// Published posts tagged `tag`, newest first.
    pub fn posts_by_tag(&self, tag: &str) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| p.tags.iter().any(|t| t == tag))
            .collect()
    }

    /// Up to `n` posts related to the post `id` with tags `tags`. Candidates
    /// are passed to [`related::rank`] newest first, so equally relevant
    /// posts come out newest first too.
    pub fn related_posts<S: AsRef<str>>(&self, id: &str, tags: &[S], n: usize) -> Vec<&Post> {
        related::rank(id, tags, &self.posts, n)
    }

    /// Looks up a published post by id.
    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// All published projects in ascending `order`.
    pub fn published_projects(&self) -> &[Project] {
        &self.projects
    }
}
