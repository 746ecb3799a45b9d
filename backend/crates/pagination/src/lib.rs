//! Opaque cursor and pagination envelope primitives for list endpoints.
//!
//! List endpoints hand clients an opaque continuation token instead of a raw
//! offset. The token is a base64url-encoded JSON payload carrying the offset
//! and a fingerprint of the query that produced it, so a cursor minted for one
//! search cannot silently page through the results of another.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for an encoded cursor token.
///
/// Tokens beyond this length are rejected before any decoding work happens.
pub const MAX_CURSOR_TOKEN_LEN: usize = 512;

/// Failures raised while decoding or validating a cursor token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The token was not valid base64url or exceeded the length bound.
    #[error("cursor token is not valid: {message}")]
    InvalidEncoding {
        /// Reason the token was rejected.
        message: String,
    },
    /// The decoded bytes did not contain the expected JSON payload.
    #[error("cursor payload is not valid: {message}")]
    InvalidPayload {
        /// Reason the payload was rejected.
        message: String,
    },
    /// The cursor was minted for a different query.
    #[error("cursor does not match the requested query")]
    QueryMismatch,
}

impl CursorError {
    fn invalid_encoding(message: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            message: message.into(),
        }
    }

    fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }
}

/// Continuation point inside a filtered listing.
///
/// ## Invariants
/// - `offset` counts items already delivered for the fingerprinted query.
/// - `fingerprint` is an exact, caller-chosen digest of the query parameters;
///   [`Cursor::decode`] rejects tokens whose fingerprint differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Number of items already delivered.
    pub offset: usize,
    /// Digest of the query parameters the cursor belongs to.
    pub fingerprint: String,
}

impl Cursor {
    /// Build a cursor at the start of a listing for the given query.
    #[must_use]
    pub fn initial(fingerprint: impl Into<String>) -> Self {
        Self {
            offset: 0,
            fingerprint: fingerprint.into(),
        }
    }

    /// Encode the cursor as an opaque base64url token.
    ///
    /// # Examples
    /// ```
    /// use pagination::Cursor;
    ///
    /// let token = Cursor::initial("q").encode();
    /// let decoded = Cursor::decode(&token, "q").expect("token round-trips");
    /// assert_eq!(decoded.offset, 0);
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        // Serialising a struct of (usize, String) cannot fail.
        let payload = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(payload)
    }

    /// Decode a token and verify it belongs to the query identified by
    /// `expected_fingerprint`.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::InvalidEncoding`] for oversized or non-base64url
    /// tokens, [`CursorError::InvalidPayload`] when the decoded bytes are not
    /// the expected JSON shape, and [`CursorError::QueryMismatch`] when the
    /// fingerprint differs from the one supplied.
    pub fn decode(token: &str, expected_fingerprint: &str) -> Result<Self, CursorError> {
        if token.is_empty() {
            return Err(CursorError::invalid_encoding("token must not be empty"));
        }
        if token.len() > MAX_CURSOR_TOKEN_LEN {
            return Err(CursorError::invalid_encoding("token exceeds length bound"));
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|error| CursorError::invalid_encoding(error.to_string()))?;
        let cursor: Self = serde_json::from_slice(&bytes)
            .map_err(|error| CursorError::invalid_payload(error.to_string()))?;

        if cursor.fingerprint != expected_fingerprint {
            return Err(CursorError::QueryMismatch);
        }
        Ok(cursor)
    }
}

/// Clamp a client-requested page size into `1..=max`, falling back to
/// `default` when absent or zero.
#[must_use]
pub fn clamp_limit(requested: Option<usize>, default: usize, max: usize) -> usize {
    match requested {
        None | Some(0) => default.min(max),
        Some(value) => value.min(max),
    }
}

/// One page of a listing together with continuation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items delivered on this page.
    pub items: Vec<T>,
    /// Total number of items matching the query.
    pub total: usize,
    /// Items still undelivered after this page.
    pub remaining: usize,
    /// Token for the next page, absent once the listing is exhausted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Slice `items` according to the cursor and produce the page envelope.
    ///
    /// The next cursor inherits the fingerprint of the incoming cursor so a
    /// whole listing is paged under one query identity.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Cursor, Page};
    ///
    /// let page = Page::paginate(vec![1, 2, 3], &Cursor::initial("q"), 2);
    /// assert_eq!(page.items, vec![1, 2]);
    /// assert_eq!(page.remaining, 1);
    /// assert!(page.next_cursor.is_some());
    /// ```
    #[must_use]
    pub fn paginate(items: Vec<T>, cursor: &Cursor, limit: usize) -> Self {
        let total = items.len();
        let offset = cursor.offset.min(total);
        let page: Vec<T> = items.into_iter().skip(offset).take(limit).collect();
        let delivered = offset.saturating_add(page.len());
        let remaining = total.saturating_sub(delivered);

        let next_cursor = (remaining > 0).then(|| {
            Cursor {
                offset: delivered,
                fingerprint: cursor.fingerprint.clone(),
            }
            .encode()
        });

        Self {
            items: page,
            total,
            remaining,
            next_cursor,
        }
    }
}
