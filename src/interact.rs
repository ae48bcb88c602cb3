//! Interactive collaborators: dialogs, file choosers, picture viewer, MIDI and the sound plot.
//!
//! Each one sits behind a small trait so the session can be driven headless in tests and by the
//! CLI. Native backends are opt-in features.

pub mod dialogs;
pub mod midi;
pub mod picker;
pub mod plot;
pub mod viewer;

pub use dialogs::{Dialogs, TerminalDialogs};
pub use midi::{NoteOut, play_note};
pub use picker::FilePicker;
pub use viewer::{ExternalViewer, Viewer};
