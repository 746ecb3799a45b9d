//! Content outbound adapters.

mod json_post_store;

pub use json_post_store::{JsonPostStore, PostFileEntry, TagsField, fallback_posts};
