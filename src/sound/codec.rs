//! Reading and writing sound files.
//!
//! WAV goes through `hound` and is always available. Other containers (mp3, ogg, flac, ...)
//! are decoded and encoded by the system `ffmpeg` binary when the `media-ffmpeg` feature is on.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{MediaError, MediaResult, reject};
use crate::sound::{Sound, clamp_sample};

pub(crate) fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

/// Decode a WAV file, mixing all channels down to mono and rescaling to 16 bits.
#[tracing::instrument]
pub fn read_wav(path: &Path) -> MediaResult<Sound> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("open wav '{}'", path.display()))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<i64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (f64::from(v) * f64::from(i16::MAX)).round() as i64))
            .collect::<Result<Vec<i64>, hound::Error>>(),
        hound::SampleFormat::Int => {
            let bits = u32::from(spec.bits_per_sample);
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| rescale_to_16_bits(v, bits)))
                .collect::<Result<Vec<i64>, hound::Error>>()
        }
    }
    .with_context(|| format!("read wav samples from '{}'", path.display()))?;

    let mono: Vec<i16> = interleaved
        .chunks(channels)
        .map(|frame| clamp_sample(frame.iter().sum::<i64>() / frame.len() as i64))
        .collect();

    tracing::debug!(
        samples = mono.len(),
        rate = spec.sample_rate,
        channels,
        "wav decoded"
    );
    Ok(Sound::from_samples(mono, spec.sample_rate).with_file_name(path))
}

fn rescale_to_16_bits(v: i32, bits: u32) -> i64 {
    let v = i64::from(v);
    match bits {
        16 => v,
        b if b > 16 => v >> (b - 16),
        b => v << (16 - b),
    }
}

/// Encode `sound` as a 16-bit mono WAV file.
#[tracing::instrument(skip(sound))]
pub fn write_wav(sound: &Sound, path: &Path) -> MediaResult<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sound.sampling_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("create wav '{}'", path.display()))?;
    for &v in sound.as_slice() {
        writer
            .write_sample(v)
            .with_context(|| format!("write wav samples to '{}'", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("finalize wav '{}'", path.display()))?;
    Ok(())
}

/// Decode any file `ffmpeg` understands, keeping its native sampling rate.
///
/// ffmpeg transcodes to a 16-bit WAV in the temp directory, which is then read like any other
/// WAV and removed.
#[cfg(feature = "media-ffmpeg")]
#[tracing::instrument]
pub fn read_with_ffmpeg(ffmpeg: &Path, path: &Path) -> MediaResult<Sound> {
    use std::sync::atomic::{AtomicU64, Ordering};

    static DECODES: AtomicU64 = AtomicU64::new(0);
    let wav = std::env::temp_dir().join(format!(
        "mediacomp-decode-{}-{}.wav",
        std::process::id(),
        DECODES.fetch_add(1, Ordering::Relaxed)
    ));

    let out = std::process::Command::new(ffmpeg)
        .args(["-y", "-v", "error", "-i"])
        .arg(path)
        .args(["-vn", "-map_metadata", "-1", "-acodec", "pcm_s16le", "-f", "wav"])
        .arg(&wav)
        .output()
        .map_err(|e| anyhow::anyhow!("failed to run ffmpeg for audio decode: {e}"))?;

    let decoded = if out.status.success() {
        read_wav(&wav)
    } else {
        Err(anyhow::anyhow!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )
        .into())
    };
    let _ = std::fs::remove_file(&wav);
    Ok(decoded?.with_file_name(path))
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn read_with_ffmpeg(_ffmpeg: &Path, path: &Path) -> MediaResult<Sound> {
    reject(MediaError::unsupported(format!(
        "'{}' is not a WAV file; other sound formats require the 'media-ffmpeg' feature",
        path.display()
    )))
}

/// Encode `sound` into whatever container the extension of `path` names.
#[cfg(feature = "media-ffmpeg")]
#[tracing::instrument(skip(sound))]
pub fn write_with_ffmpeg(ffmpeg: &Path, sound: &Sound, path: &Path) -> MediaResult<()> {
    use std::io::Write as _;
    use std::process::{Command, Stdio};

    let mut child = Command::new(ffmpeg)
        .args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "s16le",
            "-ar",
            &sound.sampling_rate().to_string(),
            "-ac",
            "1",
            "-i",
            "pipe:0",
        ])
        .arg(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| anyhow::anyhow!("failed to spawn ffmpeg (is it installed and on PATH?): {e}"))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow::anyhow!("failed to open ffmpeg stdin"))?;
    let bytes: Vec<u8> = sound
        .as_slice()
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();
    stdin
        .write_all(&bytes)
        .context("write samples to ffmpeg stdin")?;
    drop(stdin);

    let output = child
        .wait_with_output()
        .context("wait for ffmpeg to finish")?;
    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "ffmpeg exited with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )
        .into());
    }
    Ok(())
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn write_with_ffmpeg(_ffmpeg: &Path, _sound: &Sound, path: &Path) -> MediaResult<()> {
    reject(MediaError::unsupported(format!(
        "cannot write '{}': only WAV output is available without the 'media-ffmpeg' feature",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_extension_is_case_insensitive() {
        assert!(is_wav(Path::new("a/b/tone.WAV")));
        assert!(!is_wav(Path::new("tone.mp3")));
        assert!(!is_wav(Path::new("tone")));
    }

    #[test]
    fn rescale_handles_narrow_and_wide_ints() {
        assert_eq!(rescale_to_16_bits(127, 8), 127 << 8);
        assert_eq!(rescale_to_16_bits(-8_388_608, 24), -32_768);
        assert_eq!(rescale_to_16_bits(1234, 16), 1234);
    }

    #[test]
    fn wav_round_trip_keeps_samples_and_rate() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tone.wav");
        let sound = Sound::from_samples(vec![0, 1000, -1000, i16::MAX, i16::MIN], 11_025);
        write_wav(&sound, &path)?;
        let back = read_wav(&path)?;
        assert_eq!(back.as_slice(), sound.as_slice());
        assert_eq!(back.sampling_rate(), 11_025);
        assert_eq!(back.file_name(), Some(path.as_path()));
        Ok(())
    }

    #[test]
    fn stereo_wav_is_mixed_to_mono() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut w = hound::WavWriter::create(&path, spec)?;
        for v in [100i16, 300, -50, -150] {
            w.write_sample(v)?;
        }
        w.finalize()?;

        let s = read_wav(&path)?;
        assert_eq!(s.as_slice(), &[200, -100]);
        Ok(())
    }

    #[cfg(feature = "media-ffmpeg")]
    #[test]
    fn ffmpeg_decode_keeps_native_rate() -> anyhow::Result<()> {
        let ffmpeg = Path::new("ffmpeg");
        if !crate::movie::encode::is_ffmpeg_available(ffmpeg) {
            return Ok(());
        }
        let dir = tempfile::tempdir()?;
        let flac = dir.path().join("tone.flac");
        let samples: Vec<i16> = (0..44_100)
            .map(|i| ((f64::from(i) * 0.05).sin() * 8000.0) as i16)
            .collect();
        let tone = Sound::from_samples(samples, 44_100);
        write_with_ffmpeg(ffmpeg, &tone, &flac)?;

        let back = read_with_ffmpeg(ffmpeg, &flac)?;
        assert_eq!(back.sampling_rate(), 44_100);
        assert_eq!(back.len(), tone.len());
        assert_eq!(back.file_name(), Some(flac.as_path()));
        Ok(())
    }

    #[cfg(not(feature = "media-ffmpeg"))]
    #[test]
    fn non_wav_needs_ffmpeg_feature() {
        let err = read_with_ffmpeg(Path::new("ffmpeg"), Path::new("tone.mp3")).unwrap_err();
        assert!(matches!(err, MediaError::Unsupported(_)));
    }
}
