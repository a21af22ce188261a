//! LRU cache for rendered page thumbnails

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::debug;
use lru::LruCache;

use super::document::DocumentService;
use super::error::Result;
use super::types::RenderedImage;

/// Cache key for thumbnails
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ThumbnailKey {
    /// Page number (1-based)
    pub page: usize,
    /// Scale factor (stored as millionths for stable hashing)
    pub scale_millionths: u32,
}

impl ThumbnailKey {
    #[must_use]
    pub fn new(page: usize, scale: f32) -> Self {
        Self {
            page,
            scale_millionths: (scale * 1_000_000.0) as u32,
        }
    }
}

/// LRU cache of thumbnails rendered by the PDF engine
pub struct ThumbnailCache {
    cache: LruCache<ThumbnailKey, Arc<RenderedImage>>,
    scale: f32,
}

impl ThumbnailCache {
    /// Create a new cache with the given capacity and thumbnail scale
    #[must_use]
    pub fn new(capacity: usize, scale: f32) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            scale,
        }
    }

    /// Thumbnail of a page (1-based), rendering it on a miss
    pub fn get_or_render(
        &mut self,
        document: &DocumentService,
        page: usize,
    ) -> Result<Arc<RenderedImage>> {
        let key = ThumbnailKey::new(page, self.scale);
        if let Some(image) = self.cache.get(&key) {
            return Ok(image.clone());
        }

        debug!("Rendering thumbnail for page {page} at scale {}", self.scale);
        let image = Arc::new(document.page(page)?.render(self.scale)?);
        self.cache.put(key, image.clone());
        Ok(image)
    }

    /// Check if a page is cached without promoting it
    #[cfg(test)]
    fn contains(&self, page: usize) -> bool {
        self.cache.contains(&ThumbnailKey::new(page, self.scale))
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.cache.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}
