//! Texture sources for the terminal: PGM files or procedural swatches
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use wheel3d_core::{pgm, AssetError, AssetLoader, Bitmap};

/// Prefix selecting a generated texture instead of a file, e.g. `swatch:3`
pub const SWATCH_PREFIX: &str = "swatch:";

const SWATCH_SIZE: usize = 32;

/// Reads each source as a PGM file, or generates a swatch for `swatch:<seed>`
#[derive(Debug, Default)]
pub struct FileLoader {
    loaded: usize,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sources resolved so far
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    fn load_one(&self, source: &str) -> Result<Bitmap, AssetError> {
        if let Some(seed) = source.strip_prefix(SWATCH_PREFIX) {
            let seed = seed.parse::<u64>().map_err(|e| AssetError::Decode {
                source_id: source.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(Bitmap::swatch(seed, SWATCH_SIZE));
        }

        let path = PathBuf::from(source);
        let data = fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(source.to_string()),
            _ => AssetError::Io { path, source: e },
        })?;
        pgm::parse_pgm(&data).map_err(|e| AssetError::Decode {
            source_id: source.to_string(),
            reason: e.to_string(),
        })
    }
}

impl AssetLoader for FileLoader {
    type Texture = Arc<Bitmap>;

    fn load(&mut self, sources: &[String]) -> Result<Vec<Arc<Bitmap>>, AssetError> {
        let mut textures = Vec::with_capacity(sources.len());
        for source in sources {
            let bitmap = self.load_one(source).map_err(|e| {
                log::warn!("could not load {}: {}", source, e);
                e
            })?;
            log::debug!("loaded {} ({}x{})", source, bitmap.width(), bitmap.height());
            textures.push(Arc::new(bitmap));
            self.loaded += 1;
        }
        Ok(textures)
    }
}

/// Default source list: eight swatches, each used twice
pub fn default_sources() -> Vec<String> {
    (0..16)
        .map(|i| format!("{}{}", SWATCH_PREFIX, i % 8))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wheel3d_core::CachingLoader;

    #[test]
    fn test_swatch_sources() {
        let mut loader = FileLoader::new();
        let textures = loader
            .load(&["swatch:1".to_string(), "swatch:2".to_string()])
            .unwrap();
        assert_eq!(textures.len(), 2);
        assert_eq!(textures[0].width(), SWATCH_SIZE);
    }

    #[test]
    fn test_bad_swatch_seed() {
        let mut loader = FileLoader::new();
        let result = loader.load(&["swatch:abc".to_string()]);
        assert!(matches!(result, Err(AssetError::Decode { .. })));
    }

    #[test]
    fn test_missing_file() {
        let mut loader = FileLoader::new();
        let result = loader.load(&["/nonexistent/wheel3d/image.pgm".to_string()]);
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_pgm_file() {
        let path = std::env::temp_dir().join(format!("wheel3d-loader-{}.pgm", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            file.write_all(b"P2\n2 1\n255\n0 255\n").unwrap();
        }
        let mut loader = FileLoader::new();
        let textures = loader.load(&[path.to_string_lossy().into_owned()]).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(textures[0].texels(), [0, 255]);
    }

    #[test]
    fn test_default_sources_reuse_swatches() {
        let sources = default_sources();
        assert_eq!(sources.len(), 16);

        let mut loader = CachingLoader::new(FileLoader::new());
        let textures = loader.load(&sources).unwrap();
        assert_eq!(textures.len(), 16);
        assert_eq!(loader.cached(), 8);
        assert!(Arc::ptr_eq(&textures[0], &textures[8]));
        assert_eq!(loader.into_inner().loaded(), 8);
    }
}
