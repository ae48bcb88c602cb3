//! Showing pictures and frame sequences to the user.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::error::MediaResult;
use crate::movie::numbered_frame_name;
use crate::picture::Picture;

pub trait Viewer {
    /// Open a window for `picture`.
    fn show(&mut self, picture: &Picture) -> MediaResult<()>;
    /// Refresh the window for `picture`, opening one if it was never shown.
    fn repaint(&mut self, picture: &Picture) -> MediaResult<()>;
    /// Play `frames` in order at `fps` frames per second.
    fn play_frames(&mut self, frames: &[Picture], fps: u32) -> MediaResult<()>;
}

/// Writes pictures as PNGs into a scratch directory and hands them to the desktop's default
/// image viewer. Frame sequences are played with `ffplay`.
#[derive(Debug)]
pub struct ExternalViewer {
    scratch: PathBuf,
    ffplay: PathBuf,
    shown: HashSet<PathBuf>,
    movies: usize,
}

impl ExternalViewer {
    pub fn new(ffplay: impl Into<PathBuf>) -> Self {
        Self::with_scratch_dir(
            std::env::temp_dir().join(format!("mediacomp-{}", std::process::id())),
            ffplay,
        )
    }

    pub fn with_scratch_dir(scratch: impl Into<PathBuf>, ffplay: impl Into<PathBuf>) -> Self {
        Self {
            scratch: scratch.into(),
            ffplay: ffplay.into(),
            shown: HashSet::new(),
            movies: 0,
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch
    }

    /// Scratch file backing the window of `picture`. Keyed on the picture's id, so pictures
    /// sharing a title get separate windows.
    pub fn window_file(&self, picture: &Picture) -> PathBuf {
        let stem: String = picture
            .title()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.scratch.join(format!("{stem}-{}.png", picture.id()))
    }

    fn write_window(&self, picture: &Picture) -> MediaResult<PathBuf> {
        std::fs::create_dir_all(&self.scratch)
            .with_context(|| format!("create viewer directory '{}'", self.scratch.display()))?;
        let file = self.window_file(picture);
        picture.write(&file)?;
        Ok(file)
    }
}

impl Drop for ExternalViewer {
    /// Best-effort removal of the windows and frame directories this viewer wrote. The scratch
    /// directory itself goes only if nothing else is left in it.
    fn drop(&mut self) {
        for file in &self.shown {
            let _ = std::fs::remove_file(file);
        }
        for n in 1..=self.movies {
            let _ = std::fs::remove_dir_all(self.scratch.join(format!("movie-{n}")));
        }
        if std::fs::remove_dir(&self.scratch).is_ok() {
            tracing::debug!(dir = %self.scratch.display(), "viewer scratch removed");
        }
    }
}

fn opener() -> Command {
    if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    }
}

fn spawn_detached(mut cmd: Command) -> MediaResult<()> {
    tracing::debug!(?cmd, "launching viewer");
    let program = cmd.get_program().to_os_string();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| anyhow::anyhow!("failed to launch {program:?}: {e}"))?;
    Ok(())
}

impl Viewer for ExternalViewer {
    fn show(&mut self, picture: &Picture) -> MediaResult<()> {
        let file = self.write_window(picture)?;
        let mut cmd = opener();
        cmd.arg(&file);
        spawn_detached(cmd)?;
        self.shown.insert(file);
        Ok(())
    }

    fn repaint(&mut self, picture: &Picture) -> MediaResult<()> {
        if self.shown.contains(&self.window_file(picture)) {
            self.write_window(picture).map(drop)
        } else {
            self.show(picture)
        }
    }

    fn play_frames(&mut self, frames: &[Picture], fps: u32) -> MediaResult<()> {
        self.movies += 1;
        let dir = self.scratch.join(format!("movie-{}", self.movies));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create frame directory '{}'", dir.display()))?;
        for (i, frame) in frames.iter().enumerate() {
            frame.write(&dir.join(numbered_frame_name(i)))?;
        }

        let mut cmd = Command::new(&self.ffplay);
        cmd.args(["-loglevel", "error", "-autoexit", "-framerate"])
            .arg(fps.max(1).to_string())
            .arg("-i")
            .arg(dir.join("frame%04d.png"));
        spawn_detached(cmd)
    }
}

pub fn default_viewer(ffplay: &Path) -> Box<dyn Viewer> {
    Box::new(ExternalViewer::new(ffplay))
}
