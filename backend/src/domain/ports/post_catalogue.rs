//! Driven port for loading the post catalogue.

use async_trait::async_trait;

use crate::domain::Post;

use super::define_port_error;

define_port_error! {
    /// Failures raised by post catalogue adapters.
    pub enum PostCatalogueError {
        /// The catalogue source could not be read.
        Read => "post catalogue could not be read: {message}",
        /// The catalogue contents could not be decoded.
        Decode => "post catalogue could not be decoded: {message}",
    }
}

/// Driven port over the post catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCatalogue: Send + Sync {
    /// Load every post, in source order.
    async fn load(&self) -> Result<Vec<Post>, PostCatalogueError>;
}

/// Static catalogue used in tests and as the compiled-in fallback carrier.
#[derive(Debug, Clone, Default)]
pub struct FixturePostCatalogue {
    posts: Vec<Post>,
}

impl FixturePostCatalogue {
    /// Create a catalogue serving exactly `posts`.
    #[must_use]
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl PostCatalogue for FixturePostCatalogue {
    async fn load(&self) -> Result<Vec<Post>, PostCatalogueError> {
        Ok(self.posts.clone())
    }
}
