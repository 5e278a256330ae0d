//! Defines the [`Parser`] and [`Error`] types: the logic for loading content
//! collections ([`Post`]s and [`Project`]s) from Markdown source files on
//! disk.

use std::{
    collections::HashMap,
    fmt,
    fs::File,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{post, post::Post, project::Project};

const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Parses content entries from source files.
pub struct Parser {
    /// The reading speed used to estimate each post's reading time.
    words_per_minute: u32,
}

impl Parser {
    /// Constructs a new parser which estimates reading time at
    /// `words_per_minute`.
    pub fn new(words_per_minute: u32) -> Parser {
        Parser { words_per_minute }
    }

    /// Loads every post under `source_directory`. Each post file must be
    /// structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `title`, `description`, `publishDate`,
    ///    `tags`, and optionally `updatedDate`, `coverImage`, `isFeatured`
    ///    and `draft`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// description: The first post.
    /// publishDate: 2024-04-16
    /// tags: [greet]
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    ///
    /// Posts are returned in file-name order, drafts included; see
    /// [`crate::collection::Collection`] for the published view.
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        let words_per_minute = self.words_per_minute;
        parse_collection(
            source_directory,
            |id, frontmatter: post::Frontmatter, body| {
                Post::new(id, frontmatter, body, words_per_minute)
            },
        )
    }

    /// Loads every project under `source_directory`. Project files follow the
    /// same layout as posts (see [`Parser::parse_posts`]) with
    /// [`crate::project::Frontmatter`] fields.
    pub fn parse_projects(&self, source_directory: &Path) -> Result<Vec<Project>> {
        parse_collection(source_directory, Project::new)
    }
}

/// Walks `source_directory` recursively and builds one entry per Markdown
/// file. A missing directory is an empty collection. Two files whose ids
/// collide (e.g. `hello-world.md` and `Hello World.mdx`) are an error.
fn parse_collection<F, T, B>(source_directory: &Path, build: B) -> Result<Vec<T>>
where
    F: DeserializeOwned,
    B: Fn(String, F, &str) -> T,
{
    if !source_directory.is_dir() {
        warn!(
            directory = %source_directory.display(),
            "collection directory not found; treating it as empty"
        );
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let walker = WalkDir::new(source_directory)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));
    for result in walker {
        let entry = result?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }

        // strip_prefix() should never fail since every walked path is below
        // `source_directory`
        let relative_path = entry
            .path()
            .strip_prefix(source_directory)
            .unwrap_or_else(|_| entry.path());
        let annotate = |e| {
            Error::Annotated(format!("parsing `{}`", relative_path.display()), Box::new(e))
        };
        let id = entry_id(relative_path).map_err(annotate)?;
        if let Some(first) = seen.get(&id) {
            return Err(Error::DuplicateId(
                id,
                first.clone(),
                relative_path.to_owned(),
            ));
        }
        let item = parse_entry(entry.path(), id.clone(), &build).map_err(annotate)?;
        seen.insert(id, relative_path.to_owned());
        debug!(path = %relative_path.display(), "parsed entry");
        entries.push(item);
    }

    debug!(
        directory = %source_directory.display(),
        count = entries.len(),
        "loaded collection"
    );
    Ok(entries)
}

fn parse_entry<F, T, B>(path: &Path, id: String, build: &B) -> Result<T>
where
    F: DeserializeOwned,
    B: Fn(String, F, &str) -> T,
{
    use std::io::Read;
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;

    let (yaml, body) = split_frontmatter(&contents)?;
    let frontmatter: F = serde_yaml::from_str(yaml)?;
    Ok(build(id, frontmatter, body))
}

/// Splits a source file into its YAML frontmatter and its body.
pub fn split_frontmatter(input: &str) -> Result<(&str, &str)> {
    const FENCE: &str = "---";
    if !input.starts_with(FENCE) {
        return Err(Error::FrontmatterMissingStartFence);
    }

    // The closing fence has to start a line, so a `---` inside a YAML value
    // doesn't end the frontmatter.
    let rest = &input[FENCE.len()..];
    let yaml_stop = if rest.starts_with(FENCE) {
        0
    } else {
        match rest.find("\n---") {
            None => return Err(Error::FrontmatterMissingEndFence),
            Some(offset) => offset + 1,
        }
    };

    let body = &rest[yaml_stop + FENCE.len()..];
    let body = body.strip_prefix("\r\n").or_else(|| body.strip_prefix('\n')).unwrap_or(body);
    Ok((&rest[..yaml_stop], body))
}

/// Derives an entry's id from its path relative to the collection directory:
/// the extension is dropped, a trailing `index` component is dropped (so
/// `foo/index.md` is `foo`), and every remaining component is slugified.
pub fn entry_id(relative_path: &Path) -> Result<String> {
    let without_extension = relative_path.with_extension("");
    let path = if without_extension.file_name().map_or(false, |name| name == "index")
        && without_extension.parent().map_or(false, |p| !p.as_os_str().is_empty())
    {
        without_extension.parent().unwrap_or(&without_extension).to_owned()
    } else {
        without_extension
    };

    let mut segments = Vec::new();
    for component in path.components() {
        let segment = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| InvalidFileNameError(relative_path.to_owned()))?;
        segments.push(slug::slugify(segment));
    }
    if segments.iter().all(String::is_empty) {
        return Err(InvalidFileNameError(relative_path.to_owned()).into());
    }
    Ok(segments.join("/"))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| MARKDOWN_EXTENSIONS.contains(&ext))
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of a content-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a content entry.
#[derive(Debug)]
pub enum Error {
    /// Returned when a source file is missing its starting frontmatter fence
    /// (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a source file is missing its terminal frontmatter fence
    /// (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML,
    /// including missing fields and malformed dates.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a source file name isn't valid UTF-8 or has no usable
    /// id.
    InvalidFileName(InvalidFileNameError),

    /// Returned when two source files map to the same id. Holds the id and
    /// both paths, relative to the collection directory.
    DuplicateId(String, PathBuf, PathBuf),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "content file must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::DuplicateId(id, first, second) => write!(
                f,
                "`{}` and `{}` both have id `{}`",
                first.display(),
                second.display(),
                id
            ),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::DuplicateId(..) => None,
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while walking collection directories.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entry::Entry;

    #[test]
    fn test_parse_posts() -> Result<()> {
        let posts = Parser::new(200).parse_posts(Path::new("./testdata/content/posts/"))?;
        let ids: Vec<&str> = posts.iter().map(|p| p.id()).collect();
        assert_eq!(
            vec![
                "building-an-ios-app",
                "hello-world",
                "swift-concurrency",
                "swiftui-layouts",
                "unfinished-thoughts",
            ],
            ids
        );

        let hello = &posts[1];
        assert_eq!("Hello, World", hello.title);
        assert_eq!(vec!["meta"], hello.tags);
        assert!(hello.body.starts_with("Welcome"));
        assert_eq!("1 min read", hello.minutes_read);
        Ok(())
    }

    #[test]
    fn test_parse_projects() -> Result<()> {
        let projects =
            Parser::new(200).parse_projects(Path::new("./testdata/content/projects/"))?;
        let ids: Vec<&str> = projects.iter().map(|p| p.id()).collect();
        assert_eq!(vec!["habit-tracker", "secret-prototype", "weather"], ids);
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_empty() -> Result<()> {
        let posts = Parser::new(200).parse_posts(Path::new("./testdata/does-not-exist/"))?;
        assert!(posts.is_empty());
        Ok(())
    }

    #[test]
    fn test_colliding_ids_are_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let post = "---\ntitle: Hi\ndescription: x\npublishDate: 2024-01-01\ntags: []\n---\nBody\n";
        std::fs::write(dir.path().join("hello-world.md"), post)?;
        std::fs::write(dir.path().join("Hello World.mdx"), post)?;

        match Parser::new(200).parse_posts(dir.path()) {
            Err(Error::DuplicateId(id, first, second)) => {
                assert_eq!("hello-world", id);
                // Files are walked in name order and uppercase sorts first.
                assert_eq!(Path::new("Hello World.mdx"), first);
                assert_eq!(Path::new("hello-world.md"), second);
            }
            other => panic!("expected a duplicate id error, got {:?}", other.map(|p| p.len())),
        }
        Ok(())
    }

    #[test]
    fn test_split_frontmatter() -> Result<()> {
        let (yaml, body) = split_frontmatter("---\ntitle: a --- b\n---\nBody\n")?;
        assert_eq!("\ntitle: a --- b\n", yaml);
        assert_eq!("Body\n", body);
        Ok(())
    }

    #[test]
    fn test_split_frontmatter_missing_fences() {
        assert!(matches!(
            split_frontmatter("title: x\n"),
            Err(Error::FrontmatterMissingStartFence)
        ));
        assert!(matches!(
            split_frontmatter("---\ntitle: x\n"),
            Err(Error::FrontmatterMissingEndFence)
        ));
    }

    #[test]
    fn test_entry_id() -> Result<()> {
        assert_eq!("hello-world", entry_id(Path::new("hello-world.md"))?);
        assert_eq!("swiftui-layouts", entry_id(Path::new("SwiftUI Layouts.mdx"))?);
        assert_eq!("building-an-ios-app", entry_id(Path::new("building-an-ios-app/index.md"))?);
        assert_eq!("2024/recap", entry_id(Path::new("2024/Recap.md"))?);
        assert_eq!("index", entry_id(Path::new("index.md"))?);
        Ok(())
    }

    #[test]
    fn test_errors_are_annotated_with_path() {
        let err = parse_collection(
            Path::new("./testdata/broken/"),
            |id, _: post::Frontmatter, _| id,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("parsing `no-fence.md`"), "{}", message);
    }
}
