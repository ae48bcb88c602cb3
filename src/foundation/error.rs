pub type MediaResult<T> = Result<T, MediaError>;

/// Error type shared by every media operation.
///
/// The first four variants are argument rejections raised by the student-facing facade. From a
/// caller's point of view they are all the same "invalid argument" condition (see
/// [`MediaError::is_invalid_argument`]); the split exists so tests can assert precisely.
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("missing file: {0}")]
    MissingFile(String),

    #[error("unsupported option: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MediaError {
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    pub fn missing_file(msg: impl Into<String>) -> Self {
        Self::MissingFile(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// `true` for every rejection of a caller-supplied argument.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// Log a rejected argument and hand the error back as `Err`.
pub(crate) fn reject<T>(err: MediaError) -> MediaResult<T> {
    tracing::warn!("{err}");
    Err(err)
}

/// Run `f` under a subscriber that records warnings, returning its result and the log text.
#[cfg(test)]
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buf(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Buf {
        fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let buf = Buf::default();
    let sink = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned();
    (out, text)
}
