//! The media session: state that the student functions share.
//!
//! A [`MediaSession`] owns the media folder used to resolve relative file names, the channel
//! policy for integer color writes, the tool paths, and the interactive collaborators (viewer,
//! audio output, dialogs, MIDI and file picker). Everything that needs one of those is a method
//! here; pure value operations live in [`crate::facade`].

pub mod config;

use std::path::{Path, PathBuf};

use crate::facade::{self, Media};
use crate::foundation::error::{MediaError, MediaResult, reject};
use crate::foundation::index::sample_index;
use crate::interact::dialogs::{Dialogs, default_dialogs};
use crate::interact::midi::{NoteOut, default_note_out};
use crate::interact::picker::{FilePicker, default_file_picker};
use crate::interact::plot;
use crate::interact::viewer::{Viewer, default_viewer};
use crate::movie::Movie;
use crate::movie::encode::{Container, EncodeConfig};
use crate::picture::Picture;
use crate::picture::color::Color;
use crate::picture::pixel::{ChannelPolicy, PixelMut};
use crate::sound::Sound;
use crate::sound::codec;
use crate::sound::playback::{AudioOut, Clip, default_audio_out};

pub use config::MediaConfig;

/// Size of the sound visualizer opened by [`MediaSession::explore`].
pub const PLOT_WIDTH: u32 = 640;
pub const PLOT_HEIGHT: u32 = 480;

pub struct MediaSession {
    media_folder: PathBuf,
    policy: ChannelPolicy,
    fps: u32,
    ffmpeg: PathBuf,
    viewer: Box<dyn Viewer>,
    audio: Box<dyn AudioOut>,
    dialogs: Box<dyn Dialogs>,
    notes: Box<dyn NoteOut>,
    picker: Box<dyn FilePicker>,
}

impl MediaSession {
    /// A session using the default collaborators for this build.
    pub fn new(config: MediaConfig) -> Self {
        let media_folder = config.media_folder.unwrap_or_else(working_dir);
        Self {
            media_folder,
            policy: ChannelPolicy::from_wrap_levels(config.wrap_levels),
            fps: config.frames_per_second,
            viewer: default_viewer(&config.ffplay),
            ffmpeg: config.ffmpeg,
            audio: default_audio_out(),
            dialogs: default_dialogs(),
            notes: default_note_out(),
            picker: default_file_picker(),
        }
    }

    /// Defaults overridden by the `MEDIACOMP_*` environment.
    pub fn from_env() -> MediaResult<Self> {
        Ok(Self::new(MediaConfig::load(None)?))
    }

    pub fn with_viewer(mut self, viewer: impl Viewer + 'static) -> Self {
        self.viewer = Box::new(viewer);
        self
    }

    pub fn with_audio_out(mut self, audio: impl AudioOut + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_dialogs(mut self, dialogs: impl Dialogs + 'static) -> Self {
        self.dialogs = Box::new(dialogs);
        self
    }

    pub fn with_note_out(mut self, notes: impl NoteOut + 'static) -> Self {
        self.notes = Box::new(notes);
        self
    }

    pub fn with_file_picker(mut self, picker: impl FilePicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    pub fn frames_per_second(&self) -> u32 {
        self.fps
    }

    // Media folder

    /// Use `dir` as the media folder, or ask the file picker when `dir` is `None`. A cancelled
    /// pick keeps the current folder. Returns the folder now in effect.
    pub fn set_media_path(&mut self, dir: Option<&Path>) -> MediaResult<&Path> {
        let chosen = match dir {
            Some(d) => Some(d.to_path_buf()),
            None => self.picker.pick_folder(&self.media_folder)?,
        };
        if let Some(d) = chosen {
            if !d.is_dir() {
                return reject(MediaError::missing_file(format!(
                    "set_media_path(directory): '{}' is not a directory",
                    d.display()
                )));
            }
            tracing::debug!(folder = %d.display(), "media folder set");
            self.media_folder = d;
        }
        Ok(&self.media_folder)
    }

    pub fn set_media_folder(&mut self, dir: Option<&Path>) -> MediaResult<&Path> {
        self.set_media_path(dir)
    }

    /// `name` inside the media folder; an empty name gives the folder itself.
    pub fn get_media_path(&self, name: &str) -> PathBuf {
        if name.is_empty() {
            return self.media_folder.clone();
        }
        self.media_folder.join(name)
    }

    pub fn get_media_folder(&self, name: &str) -> PathBuf {
        self.get_media_path(name)
    }

    /// Point the media folder back at the working directory.
    pub fn set_test_media_folder(&mut self) {
        self.media_folder = working_dir();
    }

    pub fn show_media_folder(&self) {
        facade::print_now(&format!(
            "The media path is currently: {}",
            self.media_folder.display()
        ));
    }

    /// Absolute paths as given, relative ones inside the media folder.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.media_folder.join(file)
        }
    }

    fn existing_file(&self, func: &str, file: &Path) -> MediaResult<PathBuf> {
        let path = self.resolve(file);
        tracing::debug!(path = %path.display(), "resolved media file");
        if !path.is_file() {
            return reject(MediaError::missing_file(format!(
                "{func}: there is no file at {}",
                path.display()
            )));
        }
        Ok(path)
    }

    // Pictures and colors

    #[tracing::instrument(skip(self))]
    pub fn make_picture(&self, file: &Path) -> MediaResult<Picture> {
        let path = self.existing_file("make_picture(filename)", file)?;
        Picture::load(&path)
    }

    #[tracing::instrument(skip(self, picture))]
    pub fn write_picture_to(&self, picture: &Picture, file: &Path) -> MediaResult<()> {
        picture.write(&self.resolve(file))
    }

    pub fn set_color_wrap_around(&mut self, wrap: bool) {
        self.policy = ChannelPolicy::from_wrap_levels(wrap);
    }

    pub fn get_color_wrap_around(&self) -> bool {
        self.policy.wraps()
    }

    pub fn channel_policy(&self) -> ChannelPolicy {
        self.policy
    }

    /// Store `value` in the red channel, wrapped or clamped by the session policy.
    pub fn set_red(&self, pixel: &mut PixelMut<'_>, value: i64) {
        pixel.set_red(self.policy.correct(value));
    }

    pub fn set_green(&self, pixel: &mut PixelMut<'_>, value: i64) {
        pixel.set_green(self.policy.correct(value));
    }

    pub fn set_blue(&self, pixel: &mut PixelMut<'_>, value: i64) {
        pixel.set_blue(self.policy.correct(value));
    }

    pub fn pick_a_color(&mut self) -> MediaResult<Option<Color>> {
        self.dialogs.pick_color(Color::BLACK)
    }

    // Sounds

    /// WAV files are read directly; anything else goes through ffmpeg.
    #[tracing::instrument(skip(self))]
    pub fn make_sound(&self, file: &Path) -> MediaResult<Sound> {
        let path = self.existing_file("make_sound(filename)", file)?;
        if codec::is_wav(&path) {
            codec::read_wav(&path)
        } else {
            codec::read_with_ffmpeg(&self.ffmpeg, &path)
        }
    }

    #[tracing::instrument(skip(self, sound))]
    pub fn write_sound_to(&self, sound: &Sound, file: &Path) -> MediaResult<()> {
        let path = self.resolve(file);
        if codec::is_wav(&path) {
            codec::write_wav(sound, &path)
        } else {
            codec::write_with_ffmpeg(&self.ffmpeg, sound, &path)
        }
    }

    pub fn play(&mut self, sound: &Sound) -> MediaResult<()> {
        self.audio.start(Clip::whole(sound))
    }

    pub fn blocking_play(&mut self, sound: &Sound) -> MediaResult<()> {
        self.audio.play_blocking(Clip::whole(sound))
    }

    /// Silence everything this session started.
    pub fn stop_playing(&mut self) -> MediaResult<()> {
        self.audio.stop()
    }

    pub fn play_at_rate(&mut self, sound: &Sound, rate: f64) -> MediaResult<()> {
        check_rate("play_at_rate(sound, rate)", rate)?;
        self.audio
            .start(Clip::from_range(sound, 0, sound.len(), rate))
    }

    /// Play the first `dur` samples at `rate`.
    pub fn play_at_rate_dur(&mut self, sound: &Sound, rate: f64, dur: i64) -> MediaResult<()> {
        const FUNC: &str = "play_at_rate_dur(sound, rate, dur)";
        check_rate(FUNC, rate)?;
        let Ok(dur) = usize::try_from(dur) else {
            return reject(MediaError::out_of_range(format!(
                "{FUNC}: dur (= {dur}) must be at least 1"
            )));
        };
        if dur == 0 {
            return reject(MediaError::out_of_range(format!(
                "{FUNC}: dur (= 0) must be at least 1"
            )));
        }
        self.audio.start(Clip::from_range(sound, 0, dur, rate))
    }

    pub fn play_in_range(&mut self, sound: &Sound, start: i64, stop: i64) -> MediaResult<()> {
        let clip = range_clip("play_in_range(sound, start, stop)", sound, 1.0, start, stop)?;
        self.audio.start(clip)
    }

    pub fn blocking_play_in_range(&mut self, sound: &Sound, start: i64, stop: i64) -> MediaResult<()> {
        let clip = range_clip(
            "blocking_play_in_range(sound, start, stop)",
            sound,
            1.0,
            start,
            stop,
        )?;
        self.audio.play_blocking(clip)
    }

    pub fn play_at_rate_in_range(
        &mut self,
        sound: &Sound,
        rate: f64,
        start: i64,
        stop: i64,
    ) -> MediaResult<()> {
        let clip = range_clip(
            "play_at_rate_in_range(sound, rate, start, stop)",
            sound,
            rate,
            start,
            stop,
        )?;
        self.audio.start(clip)
    }

    pub fn blocking_play_at_rate_in_range(
        &mut self,
        sound: &Sound,
        rate: f64,
        start: i64,
        stop: i64,
    ) -> MediaResult<()> {
        let clip = range_clip(
            "blocking_play_at_rate_in_range(sound, rate, start, stop)",
            sound,
            rate,
            start,
            stop,
        )?;
        self.audio.play_blocking(clip)
    }

    // Viewing

    /// Show `picture`, retitling it first when `title` is given.
    pub fn show(&mut self, picture: &mut Picture, title: Option<&str>) -> MediaResult<()> {
        if let Some(t) = title {
            picture.set_title(t);
        }
        self.viewer.show(picture)
    }

    pub fn repaint(&mut self, picture: &Picture) -> MediaResult<()> {
        self.viewer.repaint(picture)
    }

    /// Open the tool for any media value: the picture viewer, the sound plot, or movie playback.
    pub fn explore<'a>(&mut self, media: impl Into<Media<'a>>) -> MediaResult<()> {
        match media.into() {
            Media::Picture(p) => self.viewer.show(p),
            Media::Sound(s) => {
                let plot = plot::waveform(s, PLOT_WIDTH, PLOT_HEIGHT)?;
                self.viewer.show(&plot)
            }
            Media::Movie(m) => self.play_movie(m),
        }
    }

    /// Explore a picture made of `count` random pixels of `picture`.
    pub fn random_pixels(&mut self, picture: &Picture, count: usize) -> MediaResult<Picture> {
        let out = facade::random_pixels(picture, count)?;
        self.explore(&out)?;
        Ok(out)
    }

    /// Explore a sound made of `count` random samples of `sound`.
    pub fn random_samples(&mut self, sound: &Sound, count: usize) -> MediaResult<Sound> {
        let out = facade::random_samples(sound, count)?;
        self.explore(&out)?;
        Ok(out)
    }

    // Movies

    pub fn make_movie_from_initial_file(&self, file: &Path) -> MediaResult<Movie> {
        Movie::from_initial_file(&self.resolve(file))
    }

    pub fn play_movie(&mut self, movie: &Movie) -> MediaResult<()> {
        if movie.is_empty() {
            return reject(MediaError::out_of_range("play_movie(movie): the movie has no frames"));
        }
        let frames = movie.pictures()?;
        self.viewer.play_frames(&frames, self.fps)
    }

    /// Write every frame as a numbered PNG into `dir`, or into the home folder by default.
    pub fn write_frames_to_directory(&self, movie: &mut Movie, dir: Option<&Path>) -> MediaResult<()> {
        let dir = match dir {
            Some(d) => self.resolve(d),
            None => home_dir().unwrap_or_else(|| self.media_folder.clone()),
        };
        movie.write_frames_to_directory(&dir)
    }

    pub fn write_quicktime(&self, movie: &Movie, file: &Path, fps: Option<i64>) -> MediaResult<()> {
        self.write_movie(
            "write_quicktime(movie, path, frames_per_sec)",
            Container::QuickTime,
            movie,
            file,
            fps,
        )
    }

    pub fn write_avi(&self, movie: &Movie, file: &Path, fps: Option<i64>) -> MediaResult<()> {
        self.write_movie(
            "write_avi(movie, path, frames_per_sec)",
            Container::Avi,
            movie,
            file,
            fps,
        )
    }

    fn write_movie(
        &self,
        func: &str,
        container: Container,
        movie: &Movie,
        file: &Path,
        fps: Option<i64>,
    ) -> MediaResult<()> {
        let fps = match fps {
            None => self.fps,
            Some(n) => match u32::try_from(n) {
                Ok(n) if n > 0 => n,
                _ => {
                    return reject(MediaError::out_of_range(format!(
                        "{func}: frame rate must be a positive number"
                    )));
                }
            },
        };
        let cfg = EncodeConfig {
            ffmpeg: self.ffmpeg.clone(),
            container,
            fps,
            out_path: self.resolve(file),
        };
        movie.encode(&cfg)
    }

    // Dialogs

    pub fn pick_a_file(&mut self) -> MediaResult<Option<PathBuf>> {
        self.picker.pick_file(&self.media_folder)
    }

    pub fn pick_a_folder(&mut self) -> MediaResult<Option<PathBuf>> {
        self.picker.pick_folder(&self.media_folder)
    }

    pub fn request_number(&mut self, message: &str) -> MediaResult<Option<f64>> {
        self.dialogs.request_number(message)
    }

    pub fn request_integer(&mut self, message: &str) -> MediaResult<Option<i64>> {
        self.dialogs.request_integer(message)
    }

    /// Fails before asking anything unless `min < max`.
    pub fn request_integer_in_range(
        &mut self,
        message: &str,
        min: i64,
        max: i64,
    ) -> MediaResult<Option<i64>> {
        if min >= max {
            return reject(MediaError::out_of_range(
                "request_integer_in_range(message, min, max): min >= max not allowed",
            ));
        }
        self.dialogs.request_integer_in_range(message, min, max)
    }

    pub fn request_string(&mut self, message: &str) -> MediaResult<Option<String>> {
        self.dialogs.request_string(message)
    }

    pub fn show_warning(&mut self, message: &str) -> MediaResult<()> {
        self.dialogs.show_warning(message)
    }

    pub fn show_information(&mut self, message: &str) -> MediaResult<()> {
        self.dialogs.show_information(message)
    }

    pub fn show_error(&mut self, message: &str) -> MediaResult<()> {
        self.dialogs.show_error(message)
    }

    pub fn play_note(&mut self, note: i64, duration_ms: i64, intensity: i64) -> MediaResult<()> {
        crate::interact::midi::play_note(self.notes.as_mut(), note, duration_ms, intensity)
    }
}

impl Default for MediaSession {
    fn default() -> Self {
        Self::new(MediaConfig::default())
    }
}

fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn check_rate(func: &str, rate: f64) -> MediaResult<()> {
    if !(rate.is_finite() && rate > 0.0) {
        return reject(MediaError::out_of_range(format!(
            "{func}: rate (= {rate}) must be greater than 0"
        )));
    }
    Ok(())
}

/// Samples `start..=stop` (1-based) of `sound`.
fn range_clip(func: &str, sound: &Sound, rate: f64, start: i64, stop: i64) -> MediaResult<Clip> {
    check_rate(func, rate)?;
    let first = sample_index(func, start, sound.len())?;
    let last = sample_index(func, stop, sound.len())?;
    if first > last {
        return reject(MediaError::out_of_range(format!(
            "{func}: start (= {start}) must not be after stop (= {stop})"
        )));
    }
    Ok(Clip::from_range(sound, first, last + 1, rate))
}
