//! Single-note MIDI playback.

use std::time::Duration;

use crate::foundation::error::{MediaError, MediaResult, reject};

/// Default note velocity.
pub const DEFAULT_INTENSITY: i64 = 64;

const MIDI_RANGE: std::ops::RangeInclusive<i64> = 0..=127;

/// A MIDI output port that can be opened for the duration of one note.
pub trait NoteOut {
    fn open(&mut self) -> MediaResult<()>;
    fn note_on(&mut self, note: u8, velocity: u8) -> MediaResult<()>;
    fn note_off(&mut self, note: u8, velocity: u8) -> MediaResult<()>;
    fn close(&mut self);
}

/// Sound `note` for `duration_ms` milliseconds at `intensity`, blocking the caller.
///
/// Both `note` and `intensity` must lie in `0..=127`; they are checked before the port is
/// touched. The port is closed even when sending fails.
pub fn play_note(
    out: &mut dyn NoteOut,
    note: i64,
    duration_ms: i64,
    intensity: i64,
) -> MediaResult<()> {
    const SIG: &str = "play_note(note, duration, intensity)";
    if !MIDI_RANGE.contains(&note) {
        return reject(MediaError::out_of_range(format!(
            "{SIG}: note must be between 0 and 127"
        )));
    }
    if !MIDI_RANGE.contains(&intensity) {
        return reject(MediaError::out_of_range(format!(
            "{SIG}: intensity must be between 0 and 127"
        )));
    }
    let Ok(duration_ms) = u64::try_from(duration_ms) else {
        return reject(MediaError::out_of_range(format!(
            "{SIG}: duration must not be negative"
        )));
    };

    let (note, velocity) = (note as u8, intensity as u8);
    out.open()?;
    let played = out.note_on(note, velocity).and_then(|()| {
        std::thread::sleep(Duration::from_millis(duration_ms));
        out.note_off(note, velocity)
    });
    out.close();
    played
}

/// Port used when MIDI support is not compiled in.
#[derive(Debug, Default)]
pub struct NoMidiOut;

impl NoteOut for NoMidiOut {
    fn open(&mut self) -> MediaResult<()> {
        reject(MediaError::unsupported(
            "note playback requires the 'midi' feature",
        ))
    }

    fn note_on(&mut self, _note: u8, _velocity: u8) -> MediaResult<()> {
        Ok(())
    }

    fn note_off(&mut self, _note: u8, _velocity: u8) -> MediaResult<()> {
        Ok(())
    }

    fn close(&mut self) {}
}

#[cfg(feature = "midi")]
pub use native::MidirNoteOut;

#[cfg(feature = "midi")]
mod native {
    use midir::{MidiOutput, MidiOutputConnection};

    use super::NoteOut;
    use crate::foundation::error::{MediaError, MediaResult, reject};

    const NOTE_ON: u8 = 0x90;
    const NOTE_OFF: u8 = 0x80;

    /// First MIDI output port reported by the system.
    #[derive(Default)]
    pub struct MidirNoteOut {
        connection: Option<MidiOutputConnection>,
    }

    impl MidirNoteOut {
        pub fn new() -> Self {
            Self::default()
        }

        fn send(&mut self, message: [u8; 3]) -> MediaResult<()> {
            let conn = self
                .connection
                .as_mut()
                .ok_or_else(|| anyhow::anyhow!("MIDI output is not open"))?;
            conn.send(&message)
                .map_err(|e| anyhow::anyhow!("MIDI send failed: {e}"))?;
            Ok(())
        }
    }

    impl NoteOut for MidirNoteOut {
        fn open(&mut self) -> MediaResult<()> {
            let out = MidiOutput::new("mediacomp")
                .map_err(|e| anyhow::anyhow!("MIDI init failed: {e}"))?;
            let ports = out.ports();
            let Some(port) = ports.first() else {
                return reject(MediaError::unsupported("no MIDI output port available"));
            };
            let name = out.port_name(port).unwrap_or_else(|_| "MIDI output".to_string());
            let conn = out
                .connect(port, "mediacomp-note")
                .map_err(|e| anyhow::anyhow!("MIDI connect to '{name}' failed: {e}"))?;
            tracing::debug!(port = %name, "MIDI output opened");
            self.connection = Some(conn);
            Ok(())
        }

        fn note_on(&mut self, note: u8, velocity: u8) -> MediaResult<()> {
            self.send([NOTE_ON, note, velocity])
        }

        fn note_off(&mut self, note: u8, velocity: u8) -> MediaResult<()> {
            self.send([NOTE_OFF, note, velocity])
        }

        fn close(&mut self) {
            if let Some(conn) = self.connection.take() {
                conn.close();
            }
        }
    }
}

pub fn default_note_out() -> Box<dyn NoteOut> {
    #[cfg(feature = "midi")]
    {
        Box::new(MidirNoteOut::new())
    }
    #[cfg(not(feature = "midi"))]
    {
        Box::new(NoMidiOut)
    }
}
