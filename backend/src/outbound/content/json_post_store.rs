//! Filesystem-backed post catalogue.
//!
//! Posts live in a `posts.json` file maintained by hand alongside the site
//! content. The file is loose: entries may be a top-level array or an
//! object keyed by slug, tags may be an array or free text, and slugs or
//! dates may be absent. Reading normalises all of that through the domain
//! constructors. When the file is missing or unreadable the compiled-in
//! fallback set keeps the blog page alive, mirroring the site's original
//! loader behaviour.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ports::{PostCatalogue, PostCatalogueError};
use crate::domain::{Post, PostDraft, Tag};

/// Date format used by the content files.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One entry as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFileEntry {
    /// Optional explicit slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Card title.
    #[serde(default)]
    pub title: String,
    /// Short teaser shown on the card.
    #[serde(default)]
    pub excerpt: String,
    /// Optional image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Tags, either a list or free text.
    #[serde(default)]
    pub tags: TagsField,
    /// Optional byline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Optional publication date (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Full body text.
    #[serde(default)]
    pub content: String,
}

/// Tags arrive as an array or as comma/whitespace-separated text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    /// Proper list of tag strings.
    List(Vec<String>),
    /// Free-form text to be split.
    Text(String),
}

impl Default for TagsField {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl TagsField {
    fn into_tags(self) -> Vec<Tag> {
        match self {
            Self::List(values) => values
                .iter()
                .filter_map(|value| Tag::new(value).ok())
                .collect(),
            Self::Text(text) => Tag::split_list(&text),
        }
    }
}

impl PostFileEntry {
    fn into_draft(self) -> PostDraft {
        PostDraft {
            slug: self.slug,
            title: self.title,
            excerpt: self.excerpt,
            image: self.image,
            tags: self.tags.into_tags(),
            author: self.author,
            date: self
                .date
                .as_deref()
                .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()),
            content: self.content,
        }
    }

    /// Render a normalised post back into the on-disk shape.
    #[must_use]
    pub fn from_post(post: &Post) -> Self {
        Self {
            slug: Some(post.slug().to_owned()),
            title: post.title().to_owned(),
            excerpt: post.excerpt().to_owned(),
            image: post.image().map(str::to_owned),
            tags: TagsField::List(post.tags().iter().map(|tag| tag.as_str().to_owned()).collect()),
            author: post.author().map(str::to_owned),
            date: post.date().map(|date| date.format(DATE_FORMAT).to_string()),
            content: post.content().to_owned(),
        }
    }
}

/// Post catalogue reading a JSON file from disk.
#[derive(Debug, Clone)]
pub struct JsonPostStore {
    path: PathBuf,
}

impl JsonPostStore {
    /// Create a store over the given `posts.json` path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the store reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Read and normalise the catalogue, failing on any file or document
    /// defect.
    ///
    /// Individual entries that fail validation are skipped with a warning;
    /// the tooling that rewrites the file must not lose the rest of the
    /// catalogue over one bad record.
    ///
    /// # Errors
    ///
    /// Returns [`PostCatalogueError::Read`] when the file cannot be opened
    /// and [`PostCatalogueError::Decode`] when the document is not the
    /// expected JSON shape.
    pub fn read_posts(&self) -> Result<Vec<Post>, PostCatalogueError> {
        let (dir, file_name) = self.open_parent()?;
        let raw = dir
            .read_to_string(file_name)
            .map_err(|error| PostCatalogueError::read(error.to_string()))?;
        parse_document(&raw)
    }

    /// Rewrite the catalogue file with normalised entries.
    ///
    /// # Errors
    ///
    /// Returns [`PostCatalogueError::Read`] when the directory cannot be
    /// opened or written and [`PostCatalogueError::Decode`] when the
    /// entries fail to serialise.
    pub fn write_posts(&self, posts: &[Post]) -> Result<(), PostCatalogueError> {
        let entries: Vec<PostFileEntry> = posts.iter().map(PostFileEntry::from_post).collect();
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(|error| PostCatalogueError::decode(error.to_string()))?;
        let (dir, file_name) = self.open_parent()?;
        dir.write(file_name, rendered.as_bytes())
            .map_err(|error| PostCatalogueError::read(error.to_string()))
    }

    fn open_parent(&self) -> Result<(Dir, &std::ffi::OsStr), PostCatalogueError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| PostCatalogueError::read("catalogue path must be a file"))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|error| PostCatalogueError::read(error.to_string()))?;
        Ok((dir, file_name))
    }
}

#[async_trait]
impl PostCatalogue for JsonPostStore {
    async fn load(&self) -> Result<Vec<Post>, PostCatalogueError> {
        match self.read_posts() {
            Ok(posts) => Ok(posts),
            Err(error) => {
                warn!(path = %self.path.display(), %error, "post catalogue unavailable, serving fallback posts");
                Ok(fallback_posts())
            }
        }
    }
}

fn parse_document(raw: &str) -> Result<Vec<Post>, PostCatalogueError> {
    let document: serde_json::Value = serde_json::from_str(raw)
        .map_err(|error| PostCatalogueError::decode(error.to_string()))?;

    let values: Vec<serde_json::Value> = match document {
        serde_json::Value::Array(values) => values,
        serde_json::Value::Object(map) => map.into_iter().map(|(_, value)| value).collect(),
        _ => {
            return Err(PostCatalogueError::decode(
                "catalogue document must be a JSON array or object",
            ));
        }
    };

    let mut posts = Vec::with_capacity(values.len());
    for value in values {
        let entry: PostFileEntry = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(error) => {
                warn!(%error, "skipping malformed catalogue entry");
                continue;
            }
        };
        match Post::from_draft(entry.into_draft()) {
            Ok(post) => posts.push(post),
            Err(error) => {
                warn!(%error, "skipping invalid catalogue entry");
            }
        }
    }
    Ok(posts)
}

/// Compiled-in posts served when the catalogue file is unavailable.
#[must_use]
pub fn fallback_posts() -> Vec<Post> {
    let drafts = [
        PostFileEntry {
            slug: Some("blog-1".to_owned()),
            title: "When grief collided with tradition".to_owned(),
            excerpt: "Silhouette of a woman and two girls at the doorway of a modest house."
                .to_owned(),
            image: Some("images/blog1.jpg".to_owned()),
            tags: TagsField::List(vec!["Grief".to_owned(), "Tradition".to_owned()]),
            author: Some("Irene Ground Initiative".to_owned()),
            date: Some("2025-10-08".to_owned()),
            content: String::new(),
        },
        PostFileEntry {
            slug: Some("blog-2".to_owned()),
            title: "A single act of kindness can open door of hope".to_owned(),
            excerpt: "How one generous donor changed everything for a widow named Grace and her children."
                .to_owned(),
            image: Some("images/blog2.jpg".to_owned()),
            tags: TagsField::List(vec!["Donation".to_owned(), "Renewed Hope".to_owned()]),
            author: Some("Communications Unit, Women of Strength Project".to_owned()),
            date: Some("2025-04-08".to_owned()),
            content: String::new(),
        },
        PostFileEntry {
            slug: Some("blog-5".to_owned()),
            title: "Hope Across Borders".to_owned(),
            excerpt: "A widow's desperate cry for help became a story of faith and healing."
                .to_owned(),
            image: Some("images/blog4.jpg".to_owned()),
            tags: TagsField::List(vec![
                "Medical Support".to_owned(),
                "Child Health".to_owned(),
                "Widow Empowerment".to_owned(),
            ]),
            author: Some("Communications Team".to_owned()),
            date: Some("2025-08-05".to_owned()),
            content: String::new(),
        },
        PostFileEntry {
            slug: Some("blog-9".to_owned()),
            title: "From Grief to Growth".to_owned(),
            excerpt: "How the foundation helped build a tailoring business.".to_owned(),
            image: Some("images/blog9.jpg".to_owned()),
            tags: TagsField::List(vec![
                "Widow Empowerment".to_owned(),
                "Skill Training".to_owned(),
                "Financial Independence".to_owned(),
            ]),
            author: Some("Nancy Ground Initiative".to_owned()),
            date: Some("2025-10-10".to_owned()),
            content: String::new(),
        },
    ];

    drafts
        .into_iter()
        .filter_map(|entry| Post::from_draft(entry.into_draft()).ok())
        .collect()
}
