//! Defines the [`Project`] type, a portfolio entry.

use crate::entry::Entry;
use serde::Deserialize;

/// A portfolio project, parsed from a Markdown source file.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub gallery: Vec<String>,
    pub tags: Vec<String>,
    pub links: Vec<ProjectLink>,
    pub role: Option<String>,
    pub date_range: Option<String>,

    /// Position in the project listing, ascending.
    pub order: f64,

    pub draft: bool,
    pub metrics: Vec<Metric>,
    pub body: String,
}

impl Project {
    pub fn new(id: String, frontmatter: Frontmatter, body: &str) -> Project {
        Project {
            id,
            title: frontmatter.title,
            description: frontmatter.description,
            cover_image: frontmatter.cover_image,
            gallery: frontmatter.gallery,
            tags: frontmatter.tags,
            links: frontmatter.links,
            role: frontmatter.role,
            date_range: frontmatter.date_range,
            order: frontmatter.order,
            draft: frontmatter.draft,
            metrics: frontmatter.metrics,
            body: body.to_owned(),
        }
    }
}

impl Entry for Project {
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

/// An outbound link from a project page.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ProjectLink {
    pub label: String,
    pub url: String,

    #[serde(rename = "type")]
    pub kind: LinkKind,
}

/// What a [`ProjectLink`] points at. Themes use it to pick an icon.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    AppStore,
    PlayStore,
    GitHub,
    Website,
    Demo,
    Video,
    Other,
}

/// A headline number shown on a project, e.g. `{label: Users, value: 1M+}`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

/// The YAML frontmatter of a project source file.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: String,
    pub description: String,
    pub cover_image: String,

    #[serde(default)]
    pub gallery: Vec<String>,

    pub tags: Vec<String>,

    #[serde(default)]
    pub links: Vec<ProjectLink>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub date_range: Option<String>,

    #[serde(default)]
    pub order: f64,

    #[serde(default)]
    pub draft: bool,

    #[serde(default)]
    pub metrics: Vec<Metric>,
}
