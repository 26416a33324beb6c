// crates/dapr-testcontainers/src/image.rs
// ============================================================================
// Module: Image References
// Description: Parsed `repository:tag` container image references.
// Purpose: Accept the docker-style image strings the fixtures are built from.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Fixtures accept docker-style image strings such as
//! `confluentinc/cp-kafka:8.1.0`. [`ImageRef`] splits them into repository and
//! tag, defaulting the tag to `latest`, and rejects empty parts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::error::FixtureError;

// ============================================================================
// SECTION: Image Reference
// ============================================================================

/// A parsed `repository:tag` image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Image repository, possibly registry-qualified.
    repository: String,
    /// Image tag.
    tag: String,
}

impl ImageRef {
    /// Parses a docker-style image string.
    ///
    /// A `:` after the last `/` separates the tag; otherwise the tag defaults
    /// to `latest` (registry ports like `localhost:5000/img` stay intact).
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Invalid`] for empty repositories or tags.
    pub fn parse(image: &str) -> Result<Self, FixtureError> {
        let split_at = image
            .rfind(':')
            .filter(|idx| !image[*idx..].contains('/'));
        let (repository, tag) = match split_at {
            Some(idx) => (&image[..idx], &image[idx + 1..]),
            None => (image, "latest"),
        };
        if repository.trim().is_empty() {
            return Err(FixtureError::Invalid(format!("image repository is empty in {image:?}")));
        }
        if tag.trim().is_empty() {
            return Err(FixtureError::Invalid(format!("image tag is empty in {image:?}")));
        }
        Ok(Self {
            repository: repository.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Returns the image repository.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the image tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
