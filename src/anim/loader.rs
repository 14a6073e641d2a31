//! File-level loading — `.anim` file on disk to a ready [`Animation`].

use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use tracing::info;

use super::image::{ImageCache, ScopedLoader};
use super::{AnimError, Animation};
use crate::config::AnimConfig;
use crate::dsl::{CompileError, Compiler};

/// Failure turning an `.anim` file into an [`Animation`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("{}: {source}", .path.display())]
    CompileFile {
        path: PathBuf,
        #[source]
        source: CompileError,
    },
    #[error(transparent)]
    Anim(#[from] AnimError),
}

/// Loads animation assets, sharing one image cache between them.
pub struct AnimationLoader {
    config: AnimConfig,
    images: Rc<ImageCache>,
}

impl AnimationLoader {
    pub fn new(config: AnimConfig) -> Self {
        Self {
            config,
            images: Rc::new(ImageCache::new()),
        }
    }

    pub fn config(&self) -> &AnimConfig {
        &self.config
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Read and compile an `.anim` file. Texture paths resolve against the
    /// configured asset root, or the file's own directory.
    pub fn load(&self, path: &Path) -> Result<Animation, LoadError> {
        let source = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let base = match &self.config.asset_root {
            Some(root) => root.clone(),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let anim = self
            .load_source(&source, &base)
            .map_err(|e| match e {
                LoadError::Compile(source) => LoadError::CompileFile {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })?;
        info!(
            path = %path.display(),
            params = anim.parameters().len(),
            states = anim.definition().states.len(),
            "animation loaded"
        );
        Ok(anim)
    }

    /// Compile source text whose texture paths are relative to `base`.
    pub fn load_source(&self, source: &str, base: &Path) -> Result<Animation, LoadError> {
        let def = Compiler::compile_with(source, self.config.duplicate_keys)?;
        let loader = Rc::new(ScopedLoader::new(base, self.images.clone()));
        let mut anim =
            Animation::with_defaults(def, loader, self.config.default_frames_per_update);
        if self.config.preload {
            anim.preload()?;
        }
        Ok(anim)
    }
}

impl Default for AnimationLoader {
    fn default() -> Self {
        Self::new(AnimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{DuplicateKeyPolicy, ErrorKind};

    const SRC: &str = "@ANIM_ROOT;\n@PARAM str s: { @VALUE a: { @USE_TEX a.png; } }\n";

    #[test]
    fn missing_file_is_io_error() {
        let loader = AnimationLoader::default();
        let err = loader.load(Path::new("/nonexistent/hero.anim")).err().unwrap();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn compile_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.anim");
        std::fs::write(&path, "@ANIM_ROOT;\n}").unwrap();
        let err = AnimationLoader::default().load(&path).err().unwrap();
        match err {
            LoadError::CompileFile { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind, ErrorKind::ParseError);
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn strict_policy_is_applied() {
        let config = AnimConfig {
            duplicate_keys: DuplicateKeyPolicy::Reject,
            ..AnimConfig::default()
        };
        let src = "@ANIM_ROOT; @PARAM str s: { @VALUE a: { @USE_TEX a.png; } @VALUE a: { @USE_TEX b.png; } }";
        let err = AnimationLoader::new(config)
            .load_source(src, Path::new("."))
            .err()
            .unwrap();
        assert!(matches!(err, LoadError::Compile(_)));
    }

    #[test]
    fn preload_reports_missing_textures_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnimConfig {
            preload: true,
            ..AnimConfig::default()
        };
        let err = AnimationLoader::new(config)
            .load_source(SRC, dir.path())
            .err()
            .unwrap();
        assert!(matches!(err, LoadError::Anim(AnimError::Image(_))));
    }

    #[test]
    fn textures_resolve_next_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.anim");
        std::fs::write(&path, SRC).unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();

        let loader = AnimationLoader::default();
        let mut anim = loader.load(&path).unwrap();
        anim.set_string("s", "a").unwrap();
        let frame = anim.current_frame().unwrap();
        assert!(loader.images().path(frame).unwrap().ends_with("a.png"));
    }
}
