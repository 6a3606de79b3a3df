use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::PreparedImage;
use crate::assets::decode::decode_image;
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::foundation::math::Fnv1a64;
use crate::layers::model::AssetSource;

/// Resolves layer sources into decoded rasters.
///
/// Compositing asks for every contributing layer before drawing; an error for one layer means
/// that layer contributes nothing.
pub trait AssetLoader {
    /// Decode (or fetch from cache) the raster behind `source`.
    fn load_image(&mut self, source: &AssetSource) -> CanvasResult<PreparedImage>;

    /// Encoded bytes behind `source`, e.g. to reuse a layer as a reference image.
    fn load_bytes(&mut self, source: &AssetSource) -> CanvasResult<Arc<[u8]>>;
}

/// Default loader: decodes in-memory bytes and files under `root`, caching by source.
#[derive(Debug, Default)]
pub struct AssetStore {
    root: PathBuf,
    cache: HashMap<u64, PreparedImage>,
}

impl AssetStore {
    /// Store resolving relative file sources against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// Number of decoded rasters held.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached raster.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub(crate) fn key_for(source: &AssetSource) -> u64 {
        let mut h = Fnv1a64::new_default();
        match source {
            AssetSource::Bytes(bytes) => {
                h.write_u8(b'B');
                h.write_bytes(bytes);
            }
            AssetSource::File(path) => {
                h.write_u8(b'F');
                h.write_bytes(path.to_string_lossy().as_bytes());
            }
            AssetSource::Remote(uri) => {
                h.write_u8(b'R');
                h.write_bytes(uri.as_bytes());
            }
        }
        h.finish()
    }

    fn resolve_path(&self, path: &Path) -> CanvasResult<PathBuf> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let rel = normalize_rel_path(&path.to_string_lossy())?;
        Ok(self.root.join(rel))
    }
}

impl AssetLoader for AssetStore {
    fn load_image(&mut self, source: &AssetSource) -> CanvasResult<PreparedImage> {
        let key = Self::key_for(source);
        if let Some(img) = self.cache.get(&key) {
            return Ok(img.clone());
        }
        let bytes = self.load_bytes(source)?;
        let img = decode_image(&bytes)?;
        self.cache.insert(key, img.clone());
        Ok(img)
    }

    fn load_bytes(&mut self, source: &AssetSource) -> CanvasResult<Arc<[u8]>> {
        match source {
            AssetSource::Bytes(bytes) => Ok(bytes.clone()),
            AssetSource::File(path) => {
                let path = self.resolve_path(path)?;
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("read asset '{}'", path.display()))?;
                Ok(bytes.into())
            }
            AssetSource::Remote(uri) => Err(CanvasError::decode(format!(
                "remote asset '{uri}' cannot be rasterized locally"
            ))),
        }
    }
}

/// Normalize and validate store-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> CanvasResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CanvasError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(CanvasError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CanvasError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CanvasError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
