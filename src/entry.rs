//! Defines the [`Entry`] trait, the view of a content item that the ranking
//! and collection logic needs. Both [`crate::post::Post`] and
//! [`crate::project::Project`] implement it.

/// A single content item, identified by a unique `id` (its slug) and tagged
/// with an ordered list of tags.
pub trait Entry {
    /// The entry's unique identifier.
    fn id(&self) -> &str;

    /// The entry's tags, in frontmatter order.
    fn tags(&self) -> &[String];

    /// Whether the entry is a draft. Drafts are never published.
    fn draft(&self) -> bool;
}
