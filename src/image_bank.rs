use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::Arc,
};

use image::RgbaImage;
use rand::seq::SliceRandom;

use crate::error::{ThumbnailError, ThumbnailResult};

pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Environment override for the decode cache capacity.
pub const CACHE_CAPACITY_ENV: &str = "THUMBNAIL_IMAGE_CACHE_CAPACITY";

/// Images listed from a directory, decoded on first access.
///
/// Decoded images are shared as `Arc<RgbaImage>`; callers that want to modify one must copy it.
pub struct ImageBank {
    paths: Vec<PathBuf>,
    cache: DecodeCache,
}

impl ImageBank {
    /// List every entry of `dir` (non-recursive, no extension filtering).
    ///
    /// The cache capacity defaults to [`DEFAULT_CACHE_CAPACITY`] unless
    /// `THUMBNAIL_IMAGE_CACHE_CAPACITY` holds a positive integer.
    pub fn load(dir: impl AsRef<Path>) -> ThumbnailResult<Self> {
        let capacity = std::env::var(CACHE_CAPACITY_ENV)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_CACHE_CAPACITY);
        Self::with_capacity(dir, capacity)
    }

    pub fn with_capacity(dir: impl AsRef<Path>, capacity: usize) -> ThumbnailResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            ThumbnailError::input(format!("read image directory '{}': {e}", dir.display()))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                ThumbnailError::input(format!("list image directory '{}': {e}", dir.display()))
            })?;
            paths.push(entry.path());
        }

        tracing::debug!(dir = %dir.display(), images = paths.len(), "listed image directory");
        Ok(Self {
            paths,
            cache: DecodeCache::new(capacity),
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Pick one image uniformly at random using the thread-local RNG.
    pub fn random(&mut self) -> ThumbnailResult<Arc<RgbaImage>> {
        self.random_with(&mut rand::thread_rng())
    }

    pub fn random_with<R: rand::Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> ThumbnailResult<Arc<RgbaImage>> {
        let path = self
            .paths
            .choose(rng)
            .cloned()
            .ok_or_else(|| ThumbnailError::empty("cannot pick a random image from an empty bank"))?;
        self.load_from_file(&path)
    }

    /// Decode `path` as RGBA8, serving it from the cache when resident.
    pub fn load_from_file(&mut self, path: &Path) -> ThumbnailResult<Arc<RgbaImage>> {
        if let Some(img) = self.cache.get(path) {
            tracing::trace!(path = %path.display(), "image cache hit");
            return Ok(img);
        }

        let img = Arc::new(decode_rgba8(path)?);
        self.cache.insert(path.to_path_buf(), img.clone());
        Ok(img)
    }

    /// Decode every image in listing order. Each call starts a fresh pass.
    pub fn iter(&mut self) -> Images<'_> {
        Images {
            bank: self,
            next: 0,
        }
    }

    /// Number of decoded images currently resident.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

/// Lazy pass over an [`ImageBank`], yielding one decoded image per listed path.
pub struct Images<'a> {
    bank: &'a mut ImageBank,
    next: usize,
}

impl Iterator for Images<'_> {
    type Item = ThumbnailResult<Arc<RgbaImage>>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.bank.paths.get(self.next)?.clone();
        self.next += 1;
        Some(self.bank.load_from_file(&path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.bank.paths.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

fn decode_rgba8(path: &Path) -> ThumbnailResult<RgbaImage> {
    let reader = image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| ThumbnailError::decode(format!("open image '{}': {e}", path.display())))?;
    let dyn_img = reader
        .decode()
        .map_err(|e| ThumbnailError::decode(format!("decode image '{}': {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "decoded image");
    Ok(dyn_img.to_rgba8())
}

/// Fixed-capacity least-recently-used cache of decoded images keyed by path.
pub struct DecodeCache {
    entries: HashMap<PathBuf, Arc<RgbaImage>>,
    lru: VecDeque<PathBuf>,
    capacity: usize,
}

impl DecodeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&mut self, key: &Path) -> Option<Arc<RgbaImage>> {
        let img = self.entries.get(key).cloned()?;
        self.touch(key);
        Some(img)
    }

    pub fn insert(&mut self, key: PathBuf, img: Arc<RgbaImage>) {
        self.entries.insert(key.clone(), img);
        self.touch(&key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                tracing::debug!(path = %old.display(), "evicting decoded image");
                self.entries.remove(&old);
            }
        }
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &Path) {
        if let Some(pos) = self.lru.iter().position(|p| p == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key.to_path_buf());
    }
}
