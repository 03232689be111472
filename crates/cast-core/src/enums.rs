//! Enums shared across crates.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// PhotoSource
// ---------------------------------------------------------------------------

/// How a payload's photo reference will be delivered.
///
/// ```text
/// "https://…"       → Url
/// existing file     → Upload
/// none / not found  → None (plain text)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum PhotoSource {
    Url(String),
    Upload(PathBuf),
    None,
}

impl PhotoSource {
    /// Classify a photo reference.
    ///
    /// Remote URLs win over local paths. A reference that is neither a URL
    /// nor an existing file falls back to text-only delivery.
    #[must_use]
    pub fn classify(photo: Option<&str>) -> Self {
        let Some(photo) = photo.map(str::trim).filter(|p| !p.is_empty()) else {
            return Self::None;
        };
        if photo.starts_with("http://") || photo.starts_with("https://") {
            return Self::Url(photo.to_string());
        }
        let path = Path::new(photo);
        if path.is_file() {
            Self::Upload(path.to_path_buf())
        } else {
            Self::None
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Upload(_) => "upload",
            Self::None => "none",
        }
    }
}

impl fmt::Display for PhotoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
