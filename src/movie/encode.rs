//! Movie encoding through the system `ffmpeg` binary.

use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::Context as _;

use crate::foundation::error::{MediaError, MediaResult, reject};
use crate::movie::Movie;
use crate::picture::Picture;

/// Frame rate used when the caller does not pick one.
pub const DEFAULT_FPS: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    /// `.mov`, H.264 in yuv420p.
    QuickTime,
    /// `.avi`, motion JPEG.
    Avi,
}

impl Container {
    fn codec_args(self) -> &'static [&'static str] {
        match self {
            Container::QuickTime => &["-c:v", "libx264", "-pix_fmt", "yuv420p"],
            Container::Avi => &["-c:v", "mjpeg", "-q:v", "3", "-pix_fmt", "yuvj420p"],
        }
    }
}

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub ffmpeg: PathBuf,
    pub container: Container,
    pub fps: u32,
    pub out_path: PathBuf,
}

impl EncodeConfig {
    pub fn validate(&self) -> MediaResult<()> {
        if self.fps == 0 {
            return reject(MediaError::out_of_range("frame rate must be a positive number"));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_available(ffmpeg: &Path) -> bool {
    Command::new(ffmpeg)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn ensure_parent_dir(path: &Path) -> MediaResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams RGB frames into an `ffmpeg` child process.
///
/// Every frame is scaled to the size of the first one. Odd dimensions are padded to even so
/// chroma subsampling works.
pub struct MovieEncoder {
    width: u32,
    height: u32,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl MovieEncoder {
    pub fn new(cfg: &EncodeConfig, width: u32, height: u32) -> MediaResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        let mut cmd = Command::new(&cfg.ffmpeg);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args([
                "-y",
                "-loglevel",
                "error",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgb24",
                "-s",
                &format!("{width}x{height}"),
                "-r",
                &cfg.fps.to_string(),
                "-i",
                "pipe:0",
                "-an",
                "-vf",
                "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            ])
            .args(cfg.container.codec_args())
            .arg(&cfg.out_path);

        tracing::debug!(ffmpeg = %cfg.ffmpeg.display(), out = %cfg.out_path.display(), "spawning movie encoder");
        let mut child = cmd.spawn().map_err(|e| {
            anyhow::anyhow!(
                "failed to spawn '{}' (is it installed and on PATH?): {e}",
                cfg.ffmpeg.display()
            )
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow::anyhow!("failed to open ffmpeg stdin"))?;

        Ok(Self {
            width,
            height,
            child,
            stdin: Some(stdin),
        })
    }

    pub fn encode_frame(&mut self, frame: &Picture) -> MediaResult<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(anyhow::anyhow!("movie encoder is already finalized").into());
        };
        let scaled;
        let rgb = if frame.width() == self.width && frame.height() == self.height {
            frame.image()
        } else {
            scaled = image::imageops::resize(
                frame.image(),
                self.width,
                self.height,
                image::imageops::FilterType::Triangle,
            );
            &scaled
        };
        stdin
            .write_all(rgb.as_raw())
            .context("failed to write frame to ffmpeg stdin")?;
        Ok(())
    }

    pub fn finish(mut self) -> MediaResult<()> {
        drop(self.stdin.take());
        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }
        let status = self
            .child
            .wait()
            .context("failed to wait for ffmpeg to finish")?;
        if !status.success() {
            return Err(anyhow::anyhow!("ffmpeg exited with status {status}: {}", stderr.trim()).into());
        }
        Ok(())
    }
}

impl Drop for MovieEncoder {
    /// An encoder dropped before `finish` kills and reaps its ffmpeg child.
    fn drop(&mut self) {
        if self.stdin.take().is_none() {
            return;
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
        tracing::debug!("unfinished movie encoder killed");
    }
}

impl Movie {
    /// Decode the frames and encode them into a movie file.
    #[tracing::instrument(skip(self), fields(frames = self.len()))]
    pub fn encode(&self, cfg: &EncodeConfig) -> MediaResult<()> {
        cfg.validate()?;
        let mut frames = self.iter();
        let Some(first) = frames.next() else {
            return reject(MediaError::out_of_range("movie has no frames to encode"));
        };
        let first = Picture::load(first)?;
        let encoder = MovieEncoder::new(cfg, first.width(), first.height())?;
        let written = write_all_frames(encoder, &first, frames);
        if written.is_err() {
            let _ = std::fs::remove_file(&cfg.out_path);
        }
        written
    }
}

fn write_all_frames<'a>(
    mut encoder: MovieEncoder,
    first: &Picture,
    rest: impl Iterator<Item = &'a Path>,
) -> MediaResult<()> {
    encoder.encode_frame(first)?;
    for frame in rest {
        encoder.encode_frame(&Picture::load(frame)?)?;
    }
    encoder.finish()
}
