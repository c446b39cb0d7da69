//! Painting content: manifests that list what hangs on the walls, and the images on the canvases.
//!
//! Images are keyed by a content digest, so the renderer uploads identical artwork once no
//! matter how many paintings reference it.

pub mod canvas;
pub mod manifest;

pub use canvas::{ImageDigest, ImageLibrary, MAX_TEXTURE_SIZE, PaintingImage, load_image, preload};
pub use manifest::{ManifestFormat, load_manifest, parse_manifest};

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("painting {title:?} has an invalid accent {value:?} (expected #rrggbb)")]
    InvalidAccent { title: String, value: String },
    #[error("image decode error for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },
}
