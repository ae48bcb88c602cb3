//! Student-facing functions.
//!
//! Each function checks its numeric arguments, translates 1-based indices to buffer indices,
//! and forwards to the media types. Rejections are logged with `tracing::warn!` and returned as
//! [`MediaError`](crate::MediaError) values whose message names the function and the broken
//! constraint. Operations that need the media folder, the channel policy or an interactive
//! collaborator live on [`MediaSession`](crate::MediaSession) instead.

mod colors;
mod media;
mod movies;
mod pictures;
mod sounds;
mod turtles;

use std::io::Write as _;
use std::path::{Component, Path};

pub use colors::*;
pub use media::Media;
pub use movies::*;
pub use pictures::*;
pub use sounds::*;
pub use turtles::*;

/// The last two components of `path` (`"pics/beach.jpg"`), or the whole path when it has fewer.
pub fn get_short_path(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(p) => Some(p.to_string_lossy().into_owned()),
            Component::CurDir => Some(".".to_string()),
            Component::ParentDir => Some("..".to_string()),
            Component::RootDir | Component::Prefix(_) => None,
        })
        .collect();
    match parts.as_slice() {
        [] => ".".to_string(),
        [only] => only.clone(),
        [.., dir, file] => format!("{dir}{}{file}", std::path::MAIN_SEPARATOR),
    }
}

/// Print `text` and flush stdout right away.
pub fn print_now(text: &str) {
    let mut out = std::io::stdout();
    let _ = writeln!(out, "{text}");
    let _ = out.flush();
}

/// End the program.
pub fn quit() -> ! {
    std::process::exit(0)
}
