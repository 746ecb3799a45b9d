//! Blog post content model.
//!
//! Posts are loaded from a JSON catalogue rather than persisted. Input data
//! is messy: slugs may be absent, tags arrive as arrays or as comma- or
//! whitespace-separated strings, and image URLs may point nowhere. The
//! constructors here normalise all of that so the rest of the crate only
//! sees well-formed values.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::slug::{is_valid_slug, slugify};

/// Validation errors raised by the post constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// Title was blank once trimmed.
    EmptyTitle,
    /// Neither the given slug nor the title produced a usable slug.
    UnusableSlug,
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "post title must not be empty"),
            Self::UnusableSlug => write!(f, "post slug could not be derived"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Lowercased content tag.
///
/// ## Invariants
/// - Trimmed, non-empty, lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "widow empowerment")]
pub struct Tag(String);

/// Validation error raised when a tag is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyTagError;

impl fmt::Display for EmptyTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag must not be empty")
    }
}

impl std::error::Error for EmptyTagError {}

impl Tag {
    /// Normalise and validate a tag.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyTagError`] when the input is blank once trimmed.
    pub fn new(raw: &str) -> Result<Self, EmptyTagError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(EmptyTagError);
        }
        Ok(Self(normalised))
    }

    /// The normalised tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether this tag matches a filter value.
    ///
    /// Filters arrive either as the tag text itself or as its slug form
    /// (`medical-support` for `medical support`), so both are accepted.
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        let wanted = filter.trim().to_lowercase();
        self.0 == wanted || slugify(&self.0) == slugify(&wanted)
    }

    /// Split a free-form tag field into tags.
    ///
    /// Accepts comma- or whitespace-separated text; blank fragments are
    /// dropped.
    #[must_use]
    pub fn split_list(raw: &str) -> Vec<Self> {
        raw.split([',', ' ', '\t', '\n'])
            .filter_map(|fragment| Self::new(fragment).ok())
            .collect()
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Tag {
    type Error = EmptyTagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

/// A blog post card.
///
/// ## Invariants
/// - `slug` is a valid slug (see [`crate::domain::slug::is_valid_slug`]),
///   derived from the title when the source omits one.
/// - `title` is non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    slug: String,
    title: String,
    excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(skip)]
    content: String,
}

/// Builder-style raw inputs for a [`Post`].
///
/// Mirrors the loose JSON catalogue shape before normalisation.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    /// Optional explicit slug; derived from the title when absent.
    pub slug: Option<String>,
    /// Card title.
    pub title: String,
    /// Short teaser shown on the card.
    pub excerpt: String,
    /// Optional image URL.
    pub image: Option<String>,
    /// Normalised tags.
    pub tags: Vec<Tag>,
    /// Optional byline.
    pub author: Option<String>,
    /// Optional publication date.
    pub date: Option<NaiveDate>,
    /// Full body text.
    pub content: String,
}

impl Post {
    /// Validate a draft into a post, deriving the slug when needed.
    ///
    /// # Errors
    ///
    /// Returns [`PostValidationError::EmptyTitle`] for blank titles and
    /// [`PostValidationError::UnusableSlug`] when no usable slug can be
    /// derived from either the explicit slug or the title.
    pub fn from_draft(draft: PostDraft) -> Result<Self, PostValidationError> {
        let title = draft.title.trim().to_owned();
        if title.is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }

        let slug = match draft.slug.as_deref().map(str::trim) {
            Some(given) if is_valid_slug(given) => given.to_owned(),
            Some(given) if !given.is_empty() => slugify(given),
            _ => slugify(&title),
        };
        if !is_valid_slug(&slug) {
            return Err(PostValidationError::UnusableSlug);
        }

        Ok(Self {
            slug,
            title,
            excerpt: draft.excerpt.trim().to_owned(),
            image: draft
                .image
                .map(|url| url.trim().to_owned())
                .filter(|url| !url.is_empty()),
            tags: draft.tags,
            author: draft
                .author
                .map(|author| author.trim().to_owned())
                .filter(|author| !author.is_empty()),
            date: draft.date,
            content: draft.content,
        })
    }

    /// Stable identifier used in permalinks.
    #[must_use]
    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    /// Card title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Short teaser shown on the card.
    #[must_use]
    pub fn excerpt(&self) -> &str {
        self.excerpt.as_str()
    }

    /// Image URL, if the source provided one.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Replace the image URL (used when a preflight substitutes the
    /// placeholder).
    pub fn set_image(&mut self, url: Option<String>) {
        self.image = url.filter(|value| !value.is_empty());
    }

    /// Normalised tags.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        self.tags.as_slice()
    }

    /// Byline, if present.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Publication date, if present.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Full body text.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Body preview clipped to `max_chars` characters, with an ellipsis when
    /// clipped.
    #[must_use]
    pub fn content_preview(&self, max_chars: usize) -> String {
        let mut preview: String = self.content.chars().take(max_chars).collect();
        if self.content.chars().count() > max_chars {
            preview.push('\u{2026}');
        }
        preview
    }

    /// Case-insensitive search across title, excerpt, and tags.
    ///
    /// A blank needle matches everything, mirroring an empty search box.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.excerpt.to_lowercase().contains(&needle)
            || self.tags.iter().any(|tag| tag.as_str().contains(&needle))
    }

    /// Whether any tag matches the filter value (text or slug form).
    #[must_use]
    pub fn has_tag(&self, filter: &str) -> bool {
        self.tags.iter().any(|tag| tag.matches(filter))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for post normalisation and matching.

    use rstest::rstest;

    use super::*;

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_owned(),
            excerpt: "A story of renewed hope.".to_owned(),
            ..PostDraft::default()
        }
    }

    #[test]
    fn slug_is_derived_from_title_when_absent() {
        let post = Post::from_draft(draft("A Home for Grace")).expect("valid draft");
        assert_eq!(post.slug(), "a-home-for-grace");
    }

    #[test]
    fn explicit_valid_slug_is_kept() {
        let mut input = draft("A Home for Grace");
        input.slug = Some("blog-7".to_owned());
        let post = Post::from_draft(input).expect("valid draft");
        assert_eq!(post.slug(), "blog-7");
    }

    #[test]
    fn messy_explicit_slug_is_normalised() {
        let mut input = draft("A Home for Grace");
        input.slug = Some("  Hope Across Borders ".to_owned());
        let post = Post::from_draft(input).expect("valid draft");
        assert_eq!(post.slug(), "hope-across-borders");
    }

    #[rstest]
    #[case("", PostValidationError::EmptyTitle)]
    #[case("   ", PostValidationError::EmptyTitle)]
    #[case("!!!", PostValidationError::UnusableSlug)]
    fn unusable_drafts_are_rejected(#[case] title: &str, #[case] expected: PostValidationError) {
        let err = Post::from_draft(draft(title)).expect_err("draft must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn tag_lists_split_on_commas_and_whitespace() {
        let tags = Tag::split_list("Grief, Tradition  renewed-hope\nImpact");
        let texts: Vec<&str> = tags.iter().map(Tag::as_str).collect();
        assert_eq!(texts, vec!["grief", "tradition", "renewed-hope", "impact"]);
    }

    #[rstest]
    #[case("medical support", "Medical Support", true)]
    #[case("medical support", "medical-support", true)]
    #[case("medical support", "medical", false)]
    fn tags_match_text_and_slug_forms(
        #[case] tag: &str,
        #[case] filter: &str,
        #[case] expected: bool,
    ) {
        let tag = Tag::new(tag).expect("valid tag");
        assert_eq!(tag.matches(filter), expected);
    }

    #[rstest]
    #[case("hope", true)]
    #[case("HOPE", true)]
    #[case("", true)]
    #[case("unrelated", false)]
    fn search_scans_title_excerpt_and_tags(#[case] needle: &str, #[case] expected: bool) {
        let mut input = draft("Hope Across Borders");
        input.tags = vec![Tag::new("Widow Empowerment").expect("valid tag")];
        let post = Post::from_draft(input).expect("valid draft");
        assert_eq!(post.matches_search(needle), expected);
    }

    #[test]
    fn search_matches_inside_tags() {
        let mut input = draft("Quiet Title");
        input.tags = vec![Tag::new("Child Health").expect("valid tag")];
        let post = Post::from_draft(input).expect("valid draft");
        assert!(post.matches_search("child"));
    }

    #[test]
    fn content_preview_clips_and_marks_truncation() {
        let mut input = draft("A Home for Grace");
        input.content = "x".repeat(450);
        let post = Post::from_draft(input).expect("valid draft");
        let preview = post.content_preview(400);
        assert_eq!(preview.chars().count(), 401);
        assert!(preview.ends_with('\u{2026}'));
        assert_eq!(post.content_preview(500), "x".repeat(450));
    }
}
