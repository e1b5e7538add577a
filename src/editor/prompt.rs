//! Blocking questions the editor asks the user.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Synchronous dialogs. `None`/`false` mean the user cancelled.
pub trait UserPrompt {
    /// Existing directory, starting the browse at `start`.
    fn pick_directory(&mut self, title: &str, start: &Path) -> Option<PathBuf>;

    /// Free-text answer.
    fn ask_text(&mut self, title: &str, message: &str) -> Option<String>;

    /// Yes/no question.
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    /// Reports a failure.
    fn show_error(&mut self, title: &str, message: &str);

    /// Directory and scene name for a save.
    fn pick_save_target(&mut self, start: &Path) -> Option<(PathBuf, String)> {
        let Some(dir) = self.pick_directory("Choose a save directory", start) else {
            self.show_error("Save", "No directory chosen.");
            return None;
        };
        match self.ask_text("Scene name", "Enter a name for the scene:") {
            Some(name) if !name.trim().is_empty() => Some((dir, name.trim().to_owned())),
            _ => {
                self.show_error("Save", "No scene name given.");
                None
            }
        }
    }
}

/// Reads a line from stdin. Used for free-text answers, which the native
/// dialogs cannot ask for.
pub fn read_line_prompt(title: &str, message: &str) -> Option<String> {
    print!("[{title}] {message} ");
    if let Err(e) = io::stdout().flush() {
        warn!("cannot flush prompt: {e}");
    }
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => {
            let line = line.trim().to_owned();
            (!line.is_empty()).then_some(line)
        }
        Err(e) => {
            warn!("cannot read answer: {e}");
            None
        }
    }
}

/// Native dialogs.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct DialogPrompt;

#[cfg(not(target_arch = "wasm32"))]
impl UserPrompt for DialogPrompt {
    fn pick_directory(&mut self, title: &str, start: &Path) -> Option<PathBuf> {
        let picked = rfd::FileDialog::new()
            .set_title(title)
            .set_directory(start)
            .pick_folder();
        if picked.is_none() {
            debug!("{title}: cancelled");
        }
        picked
    }

    fn ask_text(&mut self, title: &str, message: &str) -> Option<String> {
        read_line_prompt(title, message)
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let answer = rfd::MessageDialog::new()
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        matches!(answer, rfd::MessageDialogResult::Yes)
    }

    fn show_error(&mut self, title: &str, message: &str) {
        warn!("{title}: {message}");
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn pick_save_target(&mut self, start: &Path) -> Option<(PathBuf, String)> {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save scene as")
            .set_directory(start)
            .set_file_name("new_scene")
            .save_file()
        else {
            self.show_error("Save", "No directory chosen.");
            return None;
        };
        let name = path.file_name()?.to_string_lossy().into_owned();
        let dir = path.parent()?.to_path_buf();
        Some((dir, name))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedPrompt;
    use super::*;

    #[test]
    fn save_target_needs_a_name() {
        let mut prompt = ScriptedPrompt::default();
        prompt.directories.push_back(Some(PathBuf::from("saves")));
        prompt.texts.push_back(Some("  ".into()));
        assert_eq!(prompt.pick_save_target(Path::new(".")), None);
        assert_eq!(prompt.errors.len(), 1);

        prompt.directories.push_back(Some(PathBuf::from("saves")));
        prompt.texts.push_back(Some("cave".into()));
        assert_eq!(
            prompt.pick_save_target(Path::new(".")),
            Some((PathBuf::from("saves"), "cave".to_owned()))
        );
    }
}
