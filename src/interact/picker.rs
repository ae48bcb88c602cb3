use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::foundation::error::MediaResult;
use crate::interact::dialogs::TerminalDialogs;

/// Chooses files and folders. `None` means the user cancelled.
pub trait FilePicker {
    fn pick_file(&mut self, start: &Path) -> MediaResult<Option<PathBuf>>;
    fn pick_folder(&mut self, start: &Path) -> MediaResult<Option<PathBuf>>;
}

impl<R: BufRead, W: Write> TerminalDialogs<R, W> {
    fn pick_path(
        &mut self,
        title: &str,
        start: &Path,
        accept: fn(&Path) -> bool,
        hint: &str,
    ) -> MediaResult<Option<PathBuf>> {
        let message = format!("path (relative to {})", start.display());
        loop {
            let Some(answer) = self.ask(title, &message)? else {
                return Ok(None);
            };
            let path = start.join(answer);
            if accept(&path) {
                return Ok(Some(path));
            }
            self.say(&format!("'{}' {hint}", path.display()))?;
        }
    }
}

/// Typed paths, resolved against the starting folder and re-asked until they exist.
impl<R: BufRead, W: Write> FilePicker for TerminalDialogs<R, W> {
    fn pick_file(&mut self, start: &Path) -> MediaResult<Option<PathBuf>> {
        self.pick_path("Pick a file", start, Path::is_file, "is not a file.")
    }

    fn pick_folder(&mut self, start: &Path) -> MediaResult<Option<PathBuf>> {
        self.pick_path("Pick a folder", start, Path::is_dir, "is not a folder.")
    }
}

#[cfg(feature = "native-dialogs")]
#[derive(Debug, Default)]
pub struct NativeFilePicker;

#[cfg(feature = "native-dialogs")]
impl FilePicker for NativeFilePicker {
    fn pick_file(&mut self, start: &Path) -> MediaResult<Option<PathBuf>> {
        Ok(rfd::FileDialog::new()
            .set_title("Pick a file")
            .set_directory(start)
            .pick_file())
    }

    fn pick_folder(&mut self, start: &Path) -> MediaResult<Option<PathBuf>> {
        Ok(rfd::FileDialog::new()
            .set_title("Pick a folder")
            .set_directory(start)
            .pick_folder())
    }
}

pub fn default_file_picker() -> Box<dyn FilePicker> {
    #[cfg(feature = "native-dialogs")]
    {
        Box::new(NativeFilePicker)
    }
    #[cfg(not(feature = "native-dialogs"))]
    {
        Box::new(crate::interact::dialogs::StdioDialogs::stdio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_paths_resolve_against_start() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("beach.jpg"), b"")?;
        std::fs::create_dir(dir.path().join("frames"))?;

        let mut d = TerminalDialogs::new("nope.jpg\nbeach.jpg\n".as_bytes(), Vec::new());
        assert_eq!(d.pick_file(dir.path())?, Some(dir.path().join("beach.jpg")));

        let mut d = TerminalDialogs::new("beach.jpg\nframes\n".as_bytes(), Vec::new());
        assert_eq!(d.pick_folder(dir.path())?, Some(dir.path().join("frames")));
        let (_, out) = d.into_parts();
        assert!(String::from_utf8(out)?.contains("is not a folder."));
        Ok(())
    }

    #[test]
    fn cancel_returns_none() -> anyhow::Result<()> {
        let mut d = TerminalDialogs::new("\n".as_bytes(), Vec::new());
        assert_eq!(d.pick_file(Path::new("."))?, None);
        Ok(())
    }
}
