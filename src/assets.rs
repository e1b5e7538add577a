//! Image and animation decode cache.
//!
//! Decoding is delegated to an [`AssetLoader`]; the cache hands out small
//! copyable handles so placed objects can refer to shared, read-only data.
//! Entries are keyed by their path relative to the asset root and are never
//! evicted within a run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::AssetError;

/// Image shown when an object's sprite cannot be loaded.
pub const PLACEHOLDER_IMAGE: &str = "assets/graphics/texture_error/error.png";

/// Handle to a decoded image inside an [`AssetCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(pub u32);

/// Handle to an ordered frame sequence inside an [`AssetCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(pub u32);

/// Decodes image files into whatever the renderer draws with.
pub trait AssetLoader {
    /// Decoded image type.
    type Image;

    /// Decodes the file at `path`.
    fn load_image(&mut self, path: &Path) -> Result<Self::Image, AssetError>;

    /// Pixel size of a decoded image.
    fn image_size(&self, image: &Self::Image) -> (u32, u32);

    /// Last-resort image used when even the placeholder file is missing.
    fn fallback_image(&mut self) -> Self::Image;
}

/// Path-keyed store of decoded images and frame sequences.
pub struct AssetCache<L: AssetLoader> {
    loader: L,
    root: PathBuf,
    images: Vec<L::Image>,
    image_paths: HashMap<String, ImageHandle>,
    animations: Vec<Vec<ImageHandle>>,
    animation_paths: HashMap<String, AnimationHandle>,
    placeholder: Option<ImageHandle>,
}

impl<L: AssetLoader> AssetCache<L> {
    /// Empty cache resolving paths against `root`.
    pub fn new(loader: L, root: impl Into<PathBuf>) -> Self {
        AssetCache {
            loader,
            root: root.into(),
            images: Vec::new(),
            image_paths: HashMap::new(),
            animations: Vec::new(),
            animation_paths: HashMap::new(),
            placeholder: None,
        }
    }

    /// Returns the handle for `rel_path`, decoding it on first use.
    ///
    /// A missing or undecodable file is replaced by the placeholder image and
    /// the substitution is remembered for that path.
    pub fn image(&mut self, rel_path: &str) -> ImageHandle {
        let key = normalize(rel_path);
        if let Some(&handle) = self.image_paths.get(&key) {
            return handle;
        }
        let handle = match self.loader.load_image(&self.root.join(&key)) {
            Ok(image) => self.push_image(image),
            Err(err) => {
                warn!("{err}; substituting placeholder");
                self.placeholder()
            }
        };
        self.image_paths.insert(key, handle);
        handle
    }

    /// Handle of the error placeholder, loading it on first use.
    pub fn placeholder(&mut self) -> ImageHandle {
        if let Some(handle) = self.placeholder {
            return handle;
        }
        let image = match self.loader.load_image(&self.root.join(PLACEHOLDER_IMAGE)) {
            Ok(image) => image,
            Err(err) => {
                warn!("{err}; using built-in fallback image");
                self.loader.fallback_image()
            }
        };
        let handle = self.push_image(image);
        self.placeholder = Some(handle);
        handle
    }

    /// Loads every `.png` in `rel_dir`, ordered by file name, as one sequence.
    ///
    /// Returns `None` when the directory is missing or holds no frames.
    pub fn animation(&mut self, rel_dir: &str) -> Option<AnimationHandle> {
        let key = normalize(rel_dir);
        if let Some(&handle) = self.animation_paths.get(&key) {
            return Some(handle);
        }
        let names = match list_frames(&self.root.join(&key)) {
            Ok(names) if !names.is_empty() => names,
            Ok(_) => {
                warn!("animation directory {key} holds no frames");
                return None;
            }
            Err(err) => {
                warn!("cannot read animation directory {key}: {err}");
                return None;
            }
        };
        let frames: Vec<ImageHandle> = names
            .iter()
            .map(|name| self.image(&format!("{key}/{name}")))
            .collect();
        debug!("loaded {} frames from {key}", frames.len());
        let handle = AnimationHandle(self.animations.len() as u32);
        self.animations.push(frames);
        self.animation_paths.insert(key, handle);
        Some(handle)
    }

    /// Decoded image for `handle`.
    pub fn get(&self, handle: ImageHandle) -> Option<&L::Image> {
        self.images.get(handle.0 as usize)
    }

    /// Pixel size of `handle`, `(0, 0)` for unknown handles.
    pub fn size(&self, handle: ImageHandle) -> (u32, u32) {
        self.get(handle)
            .map(|image| self.loader.image_size(image))
            .unwrap_or((0, 0))
    }

    /// Frames of a sequence, empty for unknown handles.
    pub fn frames(&self, handle: AnimationHandle) -> &[ImageHandle] {
        self.animations
            .get(handle.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Frame `index` of a sequence, wrapping modulo its length.
    pub fn frame(&self, handle: AnimationHandle, index: usize) -> Option<ImageHandle> {
        let frames = self.frames(handle);
        if frames.is_empty() {
            None
        } else {
            Some(frames[index % frames.len()])
        }
    }

    fn push_image(&mut self, image: L::Image) -> ImageHandle {
        let handle = ImageHandle(self.images.len() as u32);
        self.images.push(image);
        handle
    }
}

/// Sorted `.png` file names directly inside `dir`.
pub fn list_frames(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if path.is_file() && is_png {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Asset paths are stored with forward slashes and no trailing separator.
pub fn normalize(rel_path: &str) -> String {
    rel_path.replace('\\', "/").trim_end_matches('/').to_owned()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Headless loader: an "image" is the path it came from, and its size
    /// is fixed. Files must exist on disk to load.
    #[derive(Default, Clone)]
    pub struct FakeLoader {
        pub decoded: Rc<RefCell<Vec<PathBuf>>>,
        pub size: (u32, u32),
    }

    impl AssetLoader for FakeLoader {
        type Image = PathBuf;

        fn load_image(&mut self, path: &Path) -> Result<PathBuf, AssetError> {
            if !path.is_file() {
                return Err(AssetError::Missing {
                    path: path.to_path_buf(),
                });
            }
            self.decoded.borrow_mut().push(path.to_path_buf());
            Ok(path.to_path_buf())
        }

        fn image_size(&self, _image: &PathBuf) -> (u32, u32) {
            self.size
        }

        fn fallback_image(&mut self) -> PathBuf {
            PathBuf::from("<fallback>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeLoader;
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"png").unwrap();
    }

    #[test]
    fn repeated_paths_share_one_decode() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "tiles/land/a.png");
        let loader = FakeLoader::default();
        let decoded = loader.decoded.clone();
        let mut cache = AssetCache::new(loader, dir.path());

        let a = cache.image("tiles/land/a.png");
        let b = cache.image("tiles\\land\\a.png");
        assert_eq!(a, b);
        assert_eq!(decoded.borrow().len(), 1);
    }

    #[test]
    fn missing_image_falls_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), PLACEHOLDER_IMAGE);
        let mut cache = AssetCache::new(FakeLoader::default(), dir.path());

        let missing = cache.image("nope.png");
        assert_eq!(missing, cache.placeholder());
        assert_eq!(
            cache.get(missing).unwrap(),
            &dir.path().join(PLACEHOLDER_IMAGE)
        );
    }

    #[test]
    fn placeholder_uses_loader_fallback_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = AssetCache::new(FakeLoader::default(), dir.path());
        let handle = cache.image("nope.png");
        assert_eq!(cache.get(handle).unwrap(), &PathBuf::from("<fallback>"));
    }

    #[test]
    fn animation_frames_are_sorted_and_wrap() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["2.png", "0.png", "1.png", "notes.txt"] {
            touch(dir.path(), &format!("water/animation/{name}"));
        }
        let mut cache = AssetCache::new(FakeLoader::default(), dir.path());
        let anim = cache.animation("water/animation").unwrap();
        assert_eq!(cache.frames(anim).len(), 3);

        let first = cache.image("water/animation/0.png");
        assert_eq!(cache.frame(anim, 0), Some(first));
        assert_eq!(cache.frame(anim, 3), Some(first));
        assert_eq!(cache.animation("water/animation/"), Some(anim));
    }

    #[test]
    fn missing_animation_directory_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = AssetCache::new(FakeLoader::default(), dir.path());
        assert_eq!(cache.animation("does/not/exist"), None);
    }
}
