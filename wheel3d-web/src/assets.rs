//! Bookkeeping for browser-side image loading
use std::collections::HashMap;

use wheel3d_core::{AssetError, AssetLoader};

/// Distinct sources in first-seen order; duplicates fetch one image
pub fn unique_sources(sources: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for source in sources {
        if !unique.contains(source) {
            unique.push(source.clone());
        }
    }
    unique
}

/// Textures already decoded and uploaded, keyed by source.
///
/// The browser resolves images asynchronously; once every one of them has
/// arrived this hands them to the carousel through the normal loader path.
#[derive(Debug)]
pub struct ResolvedTextures<T> {
    textures: HashMap<String, T>,
    expected: usize,
    failed: Vec<String>,
}

impl<T: Clone> ResolvedTextures<T> {
    pub fn new(expected: usize) -> Self {
        Self {
            textures: HashMap::new(),
            expected,
            failed: Vec::new(),
        }
    }

    pub fn insert(&mut self, source: String, texture: T) {
        self.textures.insert(source, texture);
    }

    pub fn fail(&mut self, source: String) {
        self.failed.push(source);
    }

    pub fn has_failed(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Take every resolved texture out, leaving the set empty
    pub fn drain(&mut self) -> Vec<T> {
        self.textures.drain().map(|(_, texture)| texture).collect()
    }

    /// Every expected image arrived and none failed
    pub fn is_complete(&self) -> bool {
        !self.has_failed() && self.textures.len() == self.expected
    }
}

impl<T: Clone> AssetLoader for ResolvedTextures<T> {
    type Texture = T;

    fn load(&mut self, sources: &[String]) -> Result<Vec<T>, AssetError> {
        if let Some(source) = self.failed.first() {
            return Err(AssetError::NotFound(source.clone()));
        }
        sources
            .iter()
            .map(|source| {
                self.textures
                    .get(source)
                    .cloned()
                    .ok_or_else(|| AssetError::NotFound(source.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unique_sources_keep_order() {
        let sources = names(&["b.jpg", "a.jpg", "b.jpg", "c.jpg", "a.jpg"]);
        assert_eq!(unique_sources(&sources), names(&["b.jpg", "a.jpg", "c.jpg"]));
    }

    #[test]
    fn test_resolved_textures_fan_out() {
        let mut resolved = ResolvedTextures::new(2);
        resolved.insert("a.jpg".to_string(), 1u32);
        assert!(!resolved.is_complete());
        resolved.insert("b.jpg".to_string(), 2u32);
        assert!(resolved.is_complete());

        let textures = resolved.load(&names(&["a.jpg", "b.jpg", "a.jpg"])).unwrap();
        assert_eq!(textures, vec![1, 2, 1]);
    }

    #[test]
    fn test_drain_hands_back_each_texture_once() {
        let mut resolved = ResolvedTextures::new(2);
        resolved.insert("a.jpg".to_string(), 1u32);
        resolved.insert("b.jpg".to_string(), 2u32);

        let mut drained = resolved.drain();
        drained.sort();
        assert_eq!(drained, vec![1, 2]);
        assert!(resolved.drain().is_empty());
        assert!(!resolved.is_complete());
    }

    #[test]
    fn test_failure_blocks_loading() {
        let mut resolved = ResolvedTextures::new(2);
        resolved.insert("a.jpg".to_string(), 1u32);
        resolved.fail("b.jpg".to_string());
        assert!(!resolved.is_complete());
        assert!(matches!(
            resolved.load(&names(&["a.jpg"])),
            Err(AssetError::NotFound(s)) if s == "b.jpg"
        ));
    }
}
