use crate::AssetError;
use gallery_scene::PaintingDescriptor;
use image::imageops::FilterType;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Largest edge uploaded as a canvas texture. Bigger images are downscaled on load.
pub const MAX_TEXTURE_SIZE: u32 = 4096;

/// Content hash of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageDigest(pub u64);

impl fmt::Display for ImageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A decoded canvas image, tightly packed RGBA8 in sRGB.
#[derive(Debug, Clone)]
pub struct PaintingImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub digest: ImageDigest,
}

fn content_hash(width: u32, height: u32, rgba: &[u8]) -> ImageDigest {
    let mut hasher = Sha256::new();
    hasher.update(width.to_le_bytes());
    hasher.update(height.to_le_bytes());
    hasher.update(rgba);
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    ImageDigest(u64::from_le_bytes(bytes))
}

/// Decode an image file into RGBA8.
pub fn load_image(path: &Path) -> Result<PaintingImage, AssetError> {
    let mut decoded = image::open(path).map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    if decoded.width().max(decoded.height()) > MAX_TEXTURE_SIZE {
        tracing::debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "downscaling oversized canvas image"
        );
        decoded = decoded.resize(MAX_TEXTURE_SIZE, MAX_TEXTURE_SIZE, FilterType::Triangle);
    }
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let rgba = rgba.into_raw();
    let digest = content_hash(width, height, &rgba);
    Ok(PaintingImage {
        width,
        height,
        rgba,
        digest,
    })
}

/// Decoded canvas images, deduplicated by content.
#[derive(Debug, Default)]
pub struct ImageLibrary {
    by_path: BTreeMap<PathBuf, ImageDigest>,
    images: BTreeMap<ImageDigest, PaintingImage>,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` unless it is already known. Identical content at another path is stored once.
    pub fn load(&mut self, path: &Path) -> Result<ImageDigest, AssetError> {
        if let Some(digest) = self.by_path.get(path) {
            return Ok(*digest);
        }
        let image = load_image(path)?;
        let digest = image.digest;
        self.by_path.insert(path.to_path_buf(), digest);
        self.images.entry(digest).or_insert(image);
        Ok(digest)
    }

    pub fn get(&self, path: &Path) -> Option<&PaintingImage> {
        self.by_path.get(path).and_then(|d| self.images.get(d))
    }

    pub fn digest_for(&self, path: &Path) -> Option<ImageDigest> {
        self.by_path.get(path).copied()
    }

    pub fn image(&self, digest: ImageDigest) -> Option<&PaintingImage> {
        self.images.get(&digest)
    }

    /// Distinct images, in digest order.
    pub fn images(&self) -> impl Iterator<Item = &PaintingImage> {
        self.images.values()
    }

    /// Number of distinct images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of paths that resolved to an image.
    pub fn path_count(&self) -> usize {
        self.by_path.len()
    }
}

/// Decode every referenced image up front.
///
/// A painting whose image fails to load keeps its slot and hangs as an accent placeholder;
/// the failure is logged, not returned.
pub fn preload(paintings: &[PaintingDescriptor]) -> (Vec<PaintingDescriptor>, ImageLibrary) {
    let mut library = ImageLibrary::new();
    let resolved = paintings
        .iter()
        .map(|desc| {
            let mut desc = desc.clone();
            if let Some(path) = desc.image.as_deref() {
                if let Err(err) = library.load(path) {
                    tracing::warn!(title = %desc.title, error = %err, "canvas image unavailable, hanging placeholder");
                    desc.image = None;
                }
            }
            desc
        })
        .collect();
    tracing::info!(
        paintings = paintings.len(),
        images = library.len(),
        "canvas images loaded"
    );
    (resolved, library)
}
