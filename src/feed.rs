//! Support for creating Atom feeds from a list of posts.

use crate::config::{Author, Site};
use crate::post::Post;
use atom_syndication::{Category, Entry, Error as AtomError, Feed, Link, Person, Text};
use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;
use std::io::Write;
use url::{ParseError, Url};

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub description: String,
    pub author: Option<Author>,
    pub site_url: Url,
}

impl FeedConfig {
    /// Builds the feed configuration from the site metadata.
    pub fn new(site: &Site, author: Option<&Author>) -> FeedConfig {
        FeedConfig {
            title: site.title.clone(),
            description: site.description.clone(),
            author: author.cloned(),
            site_url: site.url.clone(),
        }
    }
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// published [`Post`]s and writes the result to a [`std::io::Write`].
pub fn write_feed<W: Write>(config: FeedConfig, posts: &[Post], w: W) -> Result<()> {
    feed(config, posts)?.write_to(w)?;
    Ok(())
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// published [`Post`]s. The feed's `updated` stamp is the newest post change
/// so that rebuilding unchanged content yields an identical feed.
pub fn feed(config: FeedConfig, posts: &[Post]) -> Result<Feed> {
    let updated = posts
        .iter()
        .map(Post::last_modified)
        .max()
        .unwrap_or_else(Utc::now);
    Ok(Feed {
        entries: feed_entries(&config, posts)?,
        title: Text::plain(config.title),
        id: config.site_url.to_string(),
        subtitle: match config.description.is_empty() {
            true => None,
            false => Some(Text::plain(config.description)),
        },
        updated: fixed(updated),
        authors: author_to_people(config.author),
        links: vec![alternate(config.site_url.to_string())],
        ..Default::default()
    })
}

/// The public URL of a post: `{site_url}/posts/{id}/`.
pub fn post_url(site_url: &Url, post: &Post) -> std::result::Result<Url, ParseError> {
    site_url.join(&format!("posts/{}/", post.id))
}

fn feed_entries(config: &FeedConfig, posts: &[Post]) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::with_capacity(posts.len());
    for post in posts {
        let url = post_url(&config.site_url, post)?.to_string();
        entries.push(Entry {
            id: url.clone(),
            title: Text::plain(post.title.clone()),
            updated: fixed(post.last_modified()),
            published: Some(fixed(post.publish_date)),
            authors: author_to_people(config.author.clone()),
            links: vec![alternate(url)],
            summary: Some(Text::plain(post.description.clone())),
            categories: post
                .tags
                .iter()
                .map(|tag| Category {
                    term: tag.clone(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        });
    }
    Ok(entries)
}

fn fixed(date: DateTime<Utc>) -> DateTime<FixedOffset> {
    date.into()
}

fn alternate(href: String) -> Link {
    Link {
        href,
        rel: "alternate".to_owned(),
        ..Default::default()
    }
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name,
            email: author.email,
            uri: None,
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, and URL
/// issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when a post URL can't be built from the site URL.
    Url(ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::Url(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::Url(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator when joining post URLs.
    fn from(err: ParseError) -> Error {
        Error::Url(err)
    }
}
