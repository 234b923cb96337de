//! Texture handles, per-element materials and asset loading
use std::collections::HashMap;

use crate::error::AssetError;

/// Resolves texture identifiers into backend texture handles.
///
/// Implementations return exactly one handle per requested source, in
/// request order. Any failure aborts the whole batch.
pub trait AssetLoader {
    type Texture: Clone;

    fn load(&mut self, sources: &[String]) -> Result<Vec<Self::Texture>, AssetError>;
}

/// Loader adapter that resolves each distinct identifier only once.
///
/// Repeated sources share the handle produced by the first load, which lets
/// callers pad a ring with duplicates without multiplying asset work.
pub struct CachingLoader<L: AssetLoader> {
    inner: L,
    cache: HashMap<String, L::Texture>,
}

impl<L: AssetLoader> CachingLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: AssetLoader> AssetLoader for CachingLoader<L> {
    type Texture = L::Texture;

    fn load(&mut self, sources: &[String]) -> Result<Vec<Self::Texture>, AssetError> {
        let mut missing: Vec<String> = Vec::new();
        for source in sources {
            if !self.cache.contains_key(source) && !missing.contains(source) {
                missing.push(source.clone());
            }
        }

        if !missing.is_empty() {
            let loaded = self.inner.load(&missing)?;
            if loaded.len() != missing.len() {
                return Err(AssetError::CountMismatch {
                    expected: missing.len(),
                    actual: loaded.len(),
                });
            }
            log::debug!(
                "loaded {} unique textures for {} sources",
                missing.len(),
                sources.len()
            );
            self.cache.extend(missing.into_iter().zip(loaded));
        }

        sources
            .iter()
            .map(|source| {
                self.cache
                    .get(source)
                    .cloned()
                    .ok_or_else(|| AssetError::NotFound(source.clone()))
            })
            .collect()
    }
}

/// Per-element surface state: a texture binding plus transparency
#[derive(Debug, Clone, PartialEq)]
pub struct Material<T> {
    pub texture: T,
    pub transparent: bool,
    pub opacity: f32,
}

impl<T> Material<T> {
    pub fn new(texture: T) -> Self {
        Self {
            texture,
            transparent: false,
            opacity: 1.0,
        }
    }

    pub fn highlight(&mut self, opacity: f32) {
        self.transparent = true;
        self.opacity = opacity;
    }

    pub fn reset(&mut self) {
        self.transparent = false;
        self.opacity = 1.0;
    }

    pub fn is_opaque(&self) -> bool {
        !self.transparent
    }
}

/// CPU-side greyscale texture
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    /// Row-major, top row first
    texels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize, texels: Vec<u8>) -> Option<Self> {
        let len = width.checked_mul(height)?;
        (len > 0 && texels.len() == len).then_some(Self {
            width,
            height,
            texels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn texels(&self) -> &[u8] {
        &self.texels
    }

    /// Procedural stand-in texture: a diagonal gradient crossed by a checker
    /// whose cell size and phase depend on `seed`.
    pub fn swatch(seed: u64, size: usize) -> Self {
        let size = size.max(2);
        let cell = 2 + (seed % 5) as usize;
        let phase = (seed / 5 % 2) as usize;
        let mut texels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let gradient = ((x + y) * 160 / (2 * size - 2)) as u8;
                let checker = ((x / cell + y / cell + phase) % 2) as u8 * 95;
                texels.push(gradient.saturating_add(checker));
            }
        }
        Self {
            width: size,
            height: size,
            texels,
        }
    }

    /// Nearest-texel lookup; `v = 0` is the bottom row. Returns `[0, 1]`.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let x = (u.clamp(0.0, 1.0) * (self.width - 1) as f32).round() as usize;
        let y = ((1.0 - v.clamp(0.0, 1.0)) * (self.height - 1) as f32).round() as usize;
        self.texels[y * self.width + x] as f32 / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out sequential ids and records every batch it was asked for
    #[derive(Default)]
    struct CountingLoader {
        batches: Vec<Vec<String>>,
        next: u32,
    }

    impl AssetLoader for CountingLoader {
        type Texture = u32;

        fn load(&mut self, sources: &[String]) -> Result<Vec<u32>, AssetError> {
            self.batches.push(sources.to_vec());
            Ok(sources
                .iter()
                .map(|_| {
                    self.next += 1;
                    self.next
                })
                .collect())
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicates_share_one_load() {
        let mut loader = CachingLoader::new(CountingLoader::default());
        let textures = loader.load(&names(&["a", "b", "a", "c", "b"])).unwrap();

        assert_eq!(textures, vec![1, 2, 1, 3, 2]);
        assert_eq!(loader.cached(), 3);
        assert_eq!(loader.into_inner().batches, vec![names(&["a", "b", "c"])]);
    }

    #[test]
    fn test_second_batch_only_loads_new_sources() {
        let mut loader = CachingLoader::new(CountingLoader::default());
        loader.load(&names(&["a", "b"])).unwrap();
        let textures = loader.load(&names(&["b", "d"])).unwrap();

        assert_eq!(textures, vec![2, 3]);
        assert_eq!(loader.into_inner().batches.len(), 2);
    }

    #[test]
    fn test_material_highlight_and_reset() {
        let mut material = Material::new(7u32);
        assert!(material.is_opaque());

        material.highlight(0.1);
        assert!(material.transparent);
        assert!((material.opacity - 0.1).abs() < 1e-6);

        material.reset();
        assert!(material.is_opaque());
        assert_eq!(material.opacity, 1.0);
    }

    #[test]
    fn test_bitmap_sample_orientation() {
        // top row dark, bottom row bright
        let bitmap = Bitmap::new(2, 2, vec![0, 0, 255, 255]).unwrap();
        assert_eq!(bitmap.sample(0.0, 0.0), 1.0);
        assert_eq!(bitmap.sample(1.0, 1.0), 0.0);
        assert_eq!(bitmap.sample(-3.0, 9.0), 0.0);
    }

    #[test]
    fn test_bitmap_rejects_bad_dimensions() {
        assert!(Bitmap::new(3, 2, vec![0; 5]).is_none());
        assert!(Bitmap::new(0, 0, Vec::new()).is_none());
        assert!(Bitmap::new(usize::MAX, 2, Vec::new()).is_none());
    }

    #[test]
    fn test_swatches_differ_by_seed() {
        let a = Bitmap::swatch(0, 16);
        let b = Bitmap::swatch(3, 16);
        assert_eq!(a.texels().len(), 256);
        assert_ne!(a, b);
    }
}
