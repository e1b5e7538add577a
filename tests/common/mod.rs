#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use parallax_platformer::editor::prompt::UserPrompt;
use parallax_platformer::{AssetError, AssetLoader};

/// Loads nothing but checks the file exists; every image is 64x64.
#[derive(Debug, Default)]
pub struct HeadlessLoader;

impl AssetLoader for HeadlessLoader {
    type Image = PathBuf;

    fn load_image(&mut self, path: &Path) -> Result<PathBuf, AssetError> {
        if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(AssetError::Missing {
                path: path.to_path_buf(),
            })
        }
    }

    fn image_size(&self, _image: &PathBuf) -> (u32, u32) {
        (64, 64)
    }

    fn fallback_image(&mut self) -> PathBuf {
        PathBuf::new()
    }
}

/// Answers dialogs from queues and keeps the errors it was shown.
#[derive(Debug, Default)]
pub struct Answers {
    pub directories: VecDeque<PathBuf>,
    pub texts: VecDeque<String>,
    pub confirms: VecDeque<bool>,
    pub errors: Vec<String>,
}

impl UserPrompt for Answers {
    fn pick_directory(&mut self, _title: &str, _start: &Path) -> Option<PathBuf> {
        self.directories.pop_front()
    }

    fn ask_text(&mut self, _title: &str, _message: &str) -> Option<String> {
        self.texts.pop_front()
    }

    fn confirm(&mut self, _title: &str, _message: &str) -> bool {
        self.confirms.pop_front().unwrap_or(false)
    }

    fn show_error(&mut self, _title: &str, message: &str) {
        self.errors.push(message.to_owned());
    }
}

/// Creates empty sprite files under `root`.
pub fn touch(root: &Path, files: &[&str]) {
    for rel in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"png").unwrap();
    }
}
