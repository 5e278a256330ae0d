//! The library code for `folio`, the content core of a static portfolio and
//! blog. Two small, pure components sit at its center:
//!
//! 1. Deriving a deterministic cover gradient from an entry's slug
//!    ([`crate::gradient`])
//! 2. Ranking related entries by tag overlap ([`crate::related`])
//!
//! Around them sit the pieces that feed them and consume their output:
//! loading posts and projects from Markdown files ([`crate::parser`]),
//! the published-content queries pages are built from
//! ([`crate::collection`]), reading-time estimates ([`crate::reading_time`]),
//! date handling ([`crate::date`]), the Atom feed ([`crate::feed`]), and the
//! `folio.yaml` project configuration ([`crate::config`]).
//!
//! The gradient and ranking functions never fail and hold no state, so they
//! can be called from anywhere, on any thread, without coordination.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod collection;
pub mod config;
pub mod date;
pub mod entry;
pub mod feed;
pub mod gradient;
pub mod parser;
pub mod post;
pub mod project;
pub mod reading_time;
pub mod related;
