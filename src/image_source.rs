//! Image sources handed to the gallery at startup.
//!
//! Every source is reduced to a [`GalleryImage`]: a display id plus an
//! opaque URL. Local files become `file://` URLs so that the gallery core
//! never has to care where an image lives.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

use crate::error::{GalleryError, Result};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GalleryImage {
    pub id: String,
    pub src: Url,
}

impl GalleryImage {
    pub fn new(id: impl Into<String>, src: Url) -> Self {
        Self { id: id.into(), src }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let src = Url::from_file_path(&absolute)
            .map_err(|_| GalleryError::InvalidSource(absolute.display().to_string()))?;
        let id = absolute
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| src.to_string());

        Ok(Self { id, src })
    }

    pub fn from_url(src: Url) -> Self {
        let id = src
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| src.to_string());
        Self { id, src }
    }

    /// Accepts either an absolute URL or a filesystem path.
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(GalleryError::InvalidSource("empty source".to_string()));
        }

        match Url::parse(source) {
            Ok(url) if url.scheme().len() > 1 => Ok(Self::from_url(url)),
            _ => Self::from_path(Path::new(source)),
        }
    }

    /// Path on disk when the source is a `file://` URL.
    pub fn local_path(&self) -> Option<PathBuf> {
        if self.src.scheme() == "file" {
            self.src.to_file_path().ok()
        } else {
            None
        }
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Lists the images directly inside `dir`, sorted by path.
pub fn scan_directory(dir: &Path) -> Result<Vec<GalleryImage>> {
    let mut paths = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            paths.push(path);
        }
    }

    paths.sort();
    info!("Found {} images in {}", paths.len(), dir.display());

    paths.iter().map(|path| GalleryImage::from_path(path)).collect()
}

/// Builds the initial display order: the scanned directory first, then any
/// explicitly listed sources in the order given.
pub fn collect_sources(image_dir: Option<&Path>, sources: &[String]) -> Result<Vec<GalleryImage>> {
    let mut images = match image_dir {
        Some(dir) => scan_directory(dir)?,
        None => Vec::new(),
    };

    for source in sources {
        let image = GalleryImage::parse(source)?;
        debug!("Added source {} as {}", source, image.src);
        images.push(image);
    }

    Ok(images)
}
