use crate::gradient::Palette;
use crate::reading_time::DEFAULT_WORDS_PER_MINUTE;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const PROJECT_FILE: &str = "folio.yaml";

#[derive(Deserialize)]
struct RelatedLimit(usize);
impl Default for RelatedLimit {
    fn default() -> Self {
        RelatedLimit(3)
    }
}

#[derive(Deserialize)]
struct WordsPerMinute(u32);
impl Default for WordsPerMinute {
    fn default() -> Self {
        WordsPerMinute(DEFAULT_WORDS_PER_MINUTE)
    }
}

fn default_content_directory() -> PathBuf {
    PathBuf::from("content")
}

#[derive(Deserialize)]
struct Project {
    site: Site,

    #[serde(default)]
    author: Option<Author>,

    #[serde(default = "default_content_directory")]
    content_directory: PathBuf,

    #[serde(default)]
    related_limit: RelatedLimit,

    #[serde(default)]
    words_per_minute: WordsPerMinute,

    #[serde(default)]
    palette: Option<Palette>,
}

/// Site-wide metadata, used for the feed.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Site {
    /// The site's root URL, e.g. `https://example.com/`.
    pub url: Url,
    pub title: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

pub struct Config {
    pub site: Site,
    pub author: Option<Author>,
    pub posts_directory: PathBuf,
    pub projects_directory: PathBuf,
    pub related_limit: usize,
    pub words_per_minute: u32,
    pub palette: Palette,
}

impl Config {
    /// Looks for `folio.yaml` in `dir` and then in each of its ancestors, and
    /// loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        Config::from_directory_if_present(dir)?.ok_or_else(|| {
            anyhow!("Could not find `{}` in any parent directory", PROJECT_FILE)
        })
    }

    /// Like [`Config::from_directory`], but `Ok(None)` when there is no
    /// `folio.yaml` at all. A project file that exists but doesn't load is
    /// still an error.
    pub fn from_directory_if_present(dir: &Path) -> Result<Option<Config>> {
        match find_project_file(dir) {
            None => Ok(None),
            Some(path) => Config::from_project_file(&path)
                .with_context(|| format!("Loading configuration `{}`", path.display()))
                .map(Some),
        }
    }

    /// Loads a project file. Relative paths in the file are resolved against
    /// the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;
        let content_directory = project_root.join(&project.content_directory);
        debug!(
            project_file = %path.display(),
            content_directory = %content_directory.display(),
            "loaded configuration"
        );
        Ok(Config {
            site: project.site,
            author: project.author,
            posts_directory: content_directory.join("posts"),
            projects_directory: content_directory.join("projects"),
            related_limit: project.related_limit.0,
            words_per_minute: project.words_per_minute.0,
            palette: project.palette.unwrap_or_default(),
        })
    }
}

fn find_project_file(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(PROJECT_FILE))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_project_file() -> Result<()> {
        let config = Config::from_project_file(Path::new("./testdata/folio.yaml"))?;
        assert_eq!("https://example.com/", config.site.url.as_str());
        assert_eq!("Example Portfolio", config.site.title);
        assert_eq!(Some("jane@example.com".to_owned()), config.author.and_then(|a| a.email));
        assert_eq!(Path::new("./testdata/content/posts"), config.posts_directory);
        assert_eq!(Path::new("./testdata/content/projects"), config.projects_directory);
        assert_eq!(2, config.related_limit);
        assert_eq!(220, config.words_per_minute);
        assert_eq!(Palette::default(), config.palette);
        Ok(())
    }

    #[test]
    fn test_from_directory_walks_up() -> Result<()> {
        let root = tempfile::tempdir()?;
        fs::write(
            root.path().join(PROJECT_FILE),
            "site: { url: 'https://example.org/', title: Nested }\n\
             palette: ['#000000', '#ffffff']\n",
        )?;
        let nested = root.path().join("content").join("posts");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!("Nested", config.site.title);
        assert_eq!(root.path().join("content").join("posts"), config.posts_directory);
        assert_eq!(3, config.related_limit);
        assert_eq!(DEFAULT_WORDS_PER_MINUTE, config.words_per_minute);
        assert_eq!(2, config.palette.colors().len());
        Ok(())
    }

    #[test]
    fn test_invalid_palette_is_rejected() -> Result<()> {
        let root = tempfile::tempdir()?;
        let path = root.path().join(PROJECT_FILE);
        fs::write(
            &path,
            "site: { url: 'https://example.org/', title: Bad }\npalette: ['#000000']\n",
        )?;
        assert!(Config::from_project_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_broken_project_file_is_not_absent() -> Result<()> {
        let root = tempfile::tempdir()?;
        fs::write(
            root.path().join(PROJECT_FILE),
            "site: { url: 'https://example.org/', title: Bad }\n\
             palette: ['#111111', '#111111']\n",
        )?;
        let nested = root.path().join("content");
        fs::create_dir_all(&nested)?;

        let err = match Config::from_directory_if_present(&nested) {
            Ok(_) => panic!("a project file with a duplicated colour loaded"),
            Err(err) => err,
        };
        assert!(format!("{:#}", err).contains("#111111"), "{:#}", err);
        Ok(())
    }

    #[test]
    fn test_open_missing_project_file() {
        let err = match Config::from_project_file(Path::new("./testdata/missing.yaml")) {
            Ok(_) => panic!("loaded a missing project file"),
            Err(err) => err,
        };
        assert!(err
            .to_string()
            .starts_with("Opening project file `./testdata/missing.yaml`"));
    }
}
