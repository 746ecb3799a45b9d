//! Paginated post cards endpoint.
//!
//! ```text
//! GET /posts?search=hope&tag=grief&cursor=<token>&limit=6
//! ```
//!
//! Search scans title, excerpt, and tags case-insensitively; `tag` filters
//! exactly (text or slug form). Pages advance through an opaque cursor
//! bound to the active query, so a stale cursor from a different search is
//! rejected instead of silently paging the wrong result set. Image URLs
//! failing their preflight are replaced with the placeholder before the
//! card leaves the server.

use actix_web::{get, web};
use chrono::NaiveDate;
use futures_util::future::join_all;
use pagination::{Cursor, Page, clamp_limit};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::needs_probe;
use crate::domain::{DomainError, Post, Tag};

use super::error::ApiResult;
use super::state::HttpState;

/// Cards shown before the first "load more".
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Upper bound on one page.
pub const MAX_PAGE_SIZE: usize = 60;

/// Characters of body text included in the card preview.
const PREVIEW_CHARS: usize = 400;

/// Query parameters for `GET /posts`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PostsQuery {
    /// Case-insensitive search term.
    pub search: Option<String>,
    /// Tag filter (text or slug form).
    pub tag: Option<String>,
    /// Continuation token from a previous page.
    pub cursor: Option<String>,
    /// Page size (defaults to 6, capped at 60).
    pub limit: Option<usize>,
}

/// One post card.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostCard {
    /// Stable identifier used in permalinks.
    pub slug: String,
    /// Card title.
    pub title: String,
    /// Short teaser.
    pub excerpt: String,
    /// Resolved image URL (placeholder when the original failed preflight).
    pub image: String,
    /// Normalised tags.
    pub tags: Vec<Tag>,
    /// Byline, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Publication date, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Clipped body preview for the read-excerpt toggle.
    pub preview: String,
}

/// Response body for `GET /posts`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostsResponse {
    /// Always `success`.
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    /// Cards on this page.
    pub posts: Vec<PostCard>,
    /// Total matches for the query.
    pub total: usize,
    /// Matches still undelivered after this page.
    pub remaining: usize,
    /// Token for the next page, absent once exhausted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Paginated, searchable, tag-filterable post cards.
#[utoipa::path(
    get,
    path = "/posts",
    params(PostsQuery),
    tags = ["posts"],
    security([]),
    responses(
        (status = 200, description = "One page of post cards", body = PostsResponse),
        (status = 400, description = "Invalid cursor"),
        (status = 500, description = "Internal server error")
    )
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    query: web::Query<PostsQuery>,
) -> ApiResult<web::Json<PostsResponse>> {
    let query = query.into_inner();
    let fingerprint = query_fingerprint(query.search.as_deref(), query.tag.as_deref());

    let cursor = match query.cursor.as_deref() {
        Some(token) => Cursor::decode(token, &fingerprint).map_err(|error| {
            DomainError::invalid_request(error.to_string())
                .with_details(json!({ "field": "cursor" }))
        })?,
        None => Cursor::initial(fingerprint),
    };
    let limit = clamp_limit(query.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);

    let posts = state
        .posts
        .load()
        .await
        .map_err(|error| DomainError::internal(error.to_string()))?;
    let matched: Vec<Post> = posts
        .into_iter()
        .filter(|post| post.matches_search(query.search.as_deref().unwrap_or_default()))
        .filter(|post| match query.tag.as_deref() {
            Some(tag) if !tag.trim().is_empty() && tag.trim() != "all" => post.has_tag(tag),
            _ => true,
        })
        .collect();

    let page = Page::paginate(matched, &cursor, limit);
    let cards = join_all(
        page.items
            .into_iter()
            .map(|post| resolve_card(post, state.get_ref())),
    )
    .await;

    Ok(web::Json(PostsResponse {
        status: "success",
        posts: cards,
        total: page.total,
        remaining: page.remaining,
        next_cursor: page.next_cursor,
    }))
}

fn query_fingerprint(search: Option<&str>, tag: Option<&str>) -> String {
    let normalise = |value: Option<&str>| value.unwrap_or_default().trim().to_lowercase();
    format!("search={}|tag={}", normalise(search), normalise(tag))
}

async fn resolve_card(post: Post, state: &HttpState) -> PostCard {
    let image = match post.image() {
        Some(url) if !needs_probe(url) => url.to_owned(),
        Some(url) => {
            if state.images.exists(url).await {
                url.to_owned()
            } else {
                tracing::debug!(slug = post.slug(), %url, "image failed preflight, using placeholder");
                state.placeholder_image.clone()
            }
        }
        None => state.placeholder_image.clone(),
    };

    PostCard {
        slug: post.slug().to_owned(),
        title: post.title().to_owned(),
        excerpt: post.excerpt().to_owned(),
        image,
        tags: post.tags().to_vec(),
        author: post.author().map(str::to_owned),
        date: post.date(),
        preview: post.content_preview(PREVIEW_CHARS),
    }
}
