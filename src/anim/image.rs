//! Image collaborator — opaque handles for texture paths.
//!
//! Decoding and GPU upload belong to the renderer. This side only needs a
//! stable handle per distinct texture so playback states can refer to it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use tracing::trace;

/// Opaque reference to a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read image {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Turns a declared texture path into an image handle. Implementations are
/// expected to cache, so repeated paths yield the same handle.
pub trait ImageLoader {
    fn load(&self, path: &str) -> Result<ImageHandle, ImageError>;
}

impl<F> ImageLoader for F
where
    F: Fn(&str) -> Result<ImageHandle, ImageError>,
{
    fn load(&self, path: &str) -> Result<ImageHandle, ImageError> {
        self(path)
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    by_path: HashMap<PathBuf, ImageHandle>,
    /// Canonical path per handle, indexed by handle id.
    paths: Vec<PathBuf>,
}

/// File-backed image cache. Paths are canonicalized, so the same file
/// reached through different relative paths shares one handle.
#[derive(Debug, Default)]
pub struct ImageCache {
    root: Option<PathBuf>,
    inner: RefCell<CacheInner>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative texture paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            inner: RefCell::default(),
        }
    }

    pub fn load_path(&self, path: &Path) -> Result<ImageHandle, ImageError> {
        let resolved = std::fs::canonicalize(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ImageError::NotFound(path.to_path_buf()),
            _ => ImageError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        if let Some(handle) = self.inner.borrow().by_path.get(&resolved) {
            return Ok(*handle);
        }

        let meta = std::fs::metadata(&resolved).map_err(|e| ImageError::Io {
            path: resolved.clone(),
            source: e,
        })?;
        if !meta.is_file() {
            return Err(ImageError::NotFound(resolved));
        }

        let mut inner = self.inner.borrow_mut();
        let handle = ImageHandle(inner.paths.len() as u32);
        trace!(path = %resolved.display(), id = handle.0, bytes = meta.len(), "image loaded");
        inner.paths.push(resolved.clone());
        inner.by_path.insert(resolved, handle);
        Ok(handle)
    }

    /// Canonical path behind a handle.
    pub fn path(&self, handle: ImageHandle) -> Option<PathBuf> {
        self.inner.borrow().paths.get(handle.0 as usize).cloned()
    }

    /// Number of distinct images loaded.
    pub fn len(&self) -> usize {
        self.inner.borrow().paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }
}

impl ImageLoader for ImageCache {
    fn load(&self, path: &str) -> Result<ImageHandle, ImageError> {
        self.load_path(&self.resolve(path))
    }
}

/// Resolves paths against one asset's base directory while sharing a cache
/// with other assets.
#[derive(Debug, Clone)]
pub struct ScopedLoader {
    base: PathBuf,
    cache: Rc<ImageCache>,
}

impl ScopedLoader {
    pub fn new(base: impl Into<PathBuf>, cache: Rc<ImageCache>) -> Self {
        Self {
            base: base.into(),
            cache,
        }
    }
}

impl ImageLoader for ScopedLoader {
    fn load(&self, path: &str) -> Result<ImageHandle, ImageError> {
        self.cache.load_path(&self.base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"png").unwrap();
    }

    #[test]
    fn same_file_same_handle() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.png");
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let cache = ImageCache::with_root(dir.path());

        let first = cache.load("a.png").unwrap();
        let again = cache.load("sub/../a.png").unwrap();
        assert_eq!(first, again);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_files_distinct_handles() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.png");
        touch(dir.path(), "b.png");
        let cache = ImageCache::with_root(dir.path());

        let a = cache.load("a.png").unwrap();
        let b = cache.load("b.png").unwrap();
        assert_ne!(a, b);
        assert!(cache.path(b).unwrap().ends_with("b.png"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageCache::with_root(dir.path());
        assert!(matches!(cache.load("nope.png"), Err(ImageError::NotFound(_))));
        assert!(cache.is_empty());
    }

    #[test]
    fn directories_are_not_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("frames")).unwrap();
        let cache = ImageCache::with_root(dir.path());
        assert!(cache.load("frames").is_err());
    }

    #[test]
    fn scoped_loaders_share_one_cache() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("hero")).unwrap();
        touch(&dir.path().join("hero"), "idle.png");
        let cache = Rc::new(ImageCache::new());

        let from_root = ScopedLoader::new(dir.path(), cache.clone());
        let from_hero = ScopedLoader::new(dir.path().join("hero"), cache.clone());
        assert_eq!(
            from_root.load("hero/idle.png").unwrap(),
            from_hero.load("idle.png").unwrap()
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn closures_are_loaders() {
        let loader = |path: &str| -> Result<ImageHandle, ImageError> { Ok(ImageHandle(path.len() as u32)) };
        assert_eq!(loader.load("abc").unwrap(), ImageHandle(3));
    }
}
