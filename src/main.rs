use anyhow::{anyhow, Context, Result};
use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use folio::collection::Collection;
use folio::config::Config;
use folio::date::format_date;
use folio::feed::{write_feed, FeedConfig};
use folio::gradient::Palette;
use folio::post::Post;
use folio::reading_time;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let matches = App::new("folio")
        .version(crate_version!())
        .about("Content tools for a static portfolio and blog")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .long("project")
                .short("p")
                .takes_value(true)
                .help("Directory to start looking for `folio.yaml` in (defaults to the current directory)"),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .multiple(true)
                .help("Increases log verbosity; repeat for more"),
        )
        .subcommand(
            SubCommand::with_name("gradient")
                .about("Prints the cover gradient for each id")
                .arg(Arg::with_name("id").required(true).multiple(true)),
        )
        .subcommand(
            SubCommand::with_name("related")
                .about("Lists the posts related to a post")
                .arg(Arg::with_name("id").required(true))
                .arg(limit_arg()),
        )
        .subcommand(
            SubCommand::with_name("posts")
                .about("Lists published posts, newest first")
                .arg(
                    Arg::with_name("featured")
                        .long("featured")
                        .help("Only featured posts"),
                )
                .arg(
                    Arg::with_name("tag")
                        .long("tag")
                        .takes_value(true)
                        .help("Only posts with this tag"),
                )
                .arg(limit_arg()),
        )
        .subcommand(SubCommand::with_name("tags").about("Lists tags with their post counts"))
        .subcommand(SubCommand::with_name("projects").about("Lists published projects in order"))
        .subcommand(
            SubCommand::with_name("feed")
                .about("Writes the Atom feed of published posts")
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .help("File to write the feed to (defaults to stdout)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("reading-time")
                .about("Estimates the reading time of a Markdown file")
                .arg(Arg::with_name("file").required(true)),
        )
        .get_matches();

    init_tracing(matches.occurrences_of("verbose"));

    let project_dir = match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("Getting the current directory")?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match matches.subcommand() {
        ("gradient", Some(sub)) => gradient(&project_dir, sub, &mut out),
        ("related", Some(sub)) => related(&load(&project_dir)?, sub, &mut out),
        ("posts", Some(sub)) => posts(&load(&project_dir)?, sub, &mut out),
        ("tags", Some(_)) => tags(&load(&project_dir)?, &mut out),
        ("projects", Some(_)) => projects(&load(&project_dir)?, &mut out),
        ("feed", Some(sub)) => write_atom_feed(&load(&project_dir)?, sub, &mut out),
        ("reading-time", Some(sub)) => estimate_reading_time(&project_dir, sub, &mut out),
        (name, _) => Err(anyhow!("Unknown subcommand `{}`", name)),
    }
}

fn limit_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("limit")
        .long("limit")
        .short("n")
        .takes_value(true)
        .help("Maximum number of entries to list")
}

fn init_tracing(verbosity: u64) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Loads the configuration and the published collection.
fn load(project_dir: &Path) -> Result<(Config, Collection)> {
    let config = Config::from_directory(project_dir)?;
    let collection = Collection::load(&config).context("Loading content")?;
    Ok((config, collection))
}

fn parse_limit(matches: &ArgMatches, default: usize) -> Result<usize> {
    match matches.value_of("limit") {
        None => Ok(default),
        Some(n) => n
            .parse()
            .with_context(|| format!("Parsing limit `{}`", n)),
    }
}

// Gradients work without a project; a project's palette is used if one is
// found.
fn gradient<W: Write>(project_dir: &Path, matches: &ArgMatches, out: &mut W) -> Result<()> {
    let palette = match Config::from_directory_if_present(project_dir)? {
        Some(config) => config.palette,
        None => {
            tracing::debug!("no project configuration; using the default palette");
            Palette::default()
        }
    };
    for id in matches.values_of("id").into_iter().flatten() {
        writeln!(out, "{}\t{}", id, palette.derive(id))?;
    }
    Ok(())
}

fn related<W: Write>(
    (config, collection): &(Config, Collection),
    matches: &ArgMatches,
    out: &mut W,
) -> Result<()> {
    let id = matches.value_of("id").unwrap_or_default();
    let target = collection
        .post(id)
        .ok_or_else(|| anyhow!("No published post with id `{}`", id))?;
    let limit = parse_limit(matches, config.related_limit)?;
    for post in collection.related_posts(&target.id, &target.tags, limit) {
        writeln!(out, "{}\t{}", post.id, post.title)?;
    }
    Ok(())
}

fn posts<W: Write>(
    (_, collection): &(Config, Collection),
    matches: &ArgMatches,
    out: &mut W,
) -> Result<()> {
    let limit = parse_limit(matches, usize::MAX)?;
    let featured = matches.is_present("featured");
    let posts: Vec<&Post> = match matches.value_of("tag") {
        Some(tag) => collection
            .posts_by_tag(tag)
            .into_iter()
            .filter(|p| !featured || p.is_featured)
            .take(limit)
            .collect(),
        None if featured => collection.featured_posts(limit),
        None => collection.recent_posts(limit).iter().collect(),
    };
    for post in posts {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            format_date(&post.publish_date),
            post.id,
            post.title,
            post.minutes_read
        )?;
    }
    Ok(())
}

fn tags<W: Write>((_, collection): &(Config, Collection), out: &mut W) -> Result<()> {
    for tag in collection.tag_counts() {
        writeln!(out, "{}\t{}", tag.tag, tag.count)?;
    }
    Ok(())
}

fn projects<W: Write>((_, collection): &(Config, Collection), out: &mut W) -> Result<()> {
    for project in collection.published_projects() {
        writeln!(out, "{}\t{}\t{}", project.order, project.id, project.title)?;
    }
    Ok(())
}

fn write_atom_feed<W: Write>(
    (config, collection): &(Config, Collection),
    matches: &ArgMatches,
    out: &mut W,
) -> Result<()> {
    let feed_config = FeedConfig::new(&config.site, config.author.as_ref());
    let posts = collection.published_posts();
    match matches.value_of("output") {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Creating `{}`", path))?;
            write_feed(feed_config, posts, file)?;
            tracing::info!(path = %path, entries = posts.len(), "wrote feed");
        }
        None => write_feed(feed_config, posts, out)?,
    }
    Ok(())
}

fn estimate_reading_time<W: Write>(project_dir: &Path, matches: &ArgMatches, out: &mut W) -> Result<()> {
    let path = matches.value_of("file").unwrap_or_default();
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut contents))
        .with_context(|| format!("Reading `{}`", path))?;

    // Frontmatter isn't read by anyone, so it doesn't count.
    let body = match folio::parser::split_frontmatter(&contents) {
        Ok((_, body)) => body,
        Err(_) => &contents,
    };
    let words_per_minute = Config::from_directory_if_present(project_dir)?
        .map_or(reading_time::DEFAULT_WORDS_PER_MINUTE, |config| {
            config.words_per_minute
        });
    let estimate = reading_time::estimate(body, words_per_minute);
    writeln!(out, "{}\t{} words", estimate, estimate.words)?;
    Ok(())
}
