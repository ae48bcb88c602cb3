//! Audio output.
//!
//! Playback is a collaborator behind [`AudioOut`]. The `audio-out` feature provides
//! [`CpalAudioOut`]; without it the session falls back to [`NoAudioOut`], which reports the
//! missing feature instead of failing silently.

use std::time::Duration;

use crate::foundation::error::{MediaError, MediaResult, reject};
use crate::sound::Sound;

/// A stretch of a sound queued for output.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    pub samples: Vec<i16>,
    pub sampling_rate: u32,
    /// Playback speed multiplier; 2.0 plays twice as fast (and an octave higher).
    pub rate: f64,
}

impl Clip {
    /// Samples `start..end` (0-based, end exclusive) of `sound`.
    pub fn from_range(sound: &Sound, start: usize, end: usize, rate: f64) -> Self {
        let end = end.min(sound.len());
        let start = start.min(end);
        Self {
            samples: sound.as_slice()[start..end].to_vec(),
            sampling_rate: sound.sampling_rate(),
            rate,
        }
    }

    pub fn whole(sound: &Sound) -> Self {
        Self::from_range(sound, 0, sound.len(), 1.0)
    }

    /// Wall-clock time the clip takes to play.
    pub fn duration(&self) -> Duration {
        let rate = f64::from(self.sampling_rate) * self.rate;
        if rate <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / rate)
    }
}

/// Audio output device.
pub trait AudioOut {
    /// Start playing and return immediately.
    fn start(&mut self, clip: Clip) -> MediaResult<()>;
    /// Play to completion on the calling thread.
    fn play_blocking(&mut self, clip: Clip) -> MediaResult<()>;
    /// Stop everything started with [`AudioOut::start`].
    fn stop(&mut self) -> MediaResult<()>;
}

/// Output used when no audio backend is compiled in.
#[derive(Debug, Default)]
pub struct NoAudioOut;

impl NoAudioOut {
    fn missing() -> MediaError {
        MediaError::unsupported("sound playback requires the 'audio-out' feature")
    }
}

impl AudioOut for NoAudioOut {
    fn start(&mut self, _clip: Clip) -> MediaResult<()> {
        reject(Self::missing())
    }

    fn play_blocking(&mut self, _clip: Clip) -> MediaResult<()> {
        reject(Self::missing())
    }

    fn stop(&mut self) -> MediaResult<()> {
        Ok(())
    }
}

/// Default output for this build.
pub fn default_audio_out() -> Box<dyn AudioOut> {
    #[cfg(feature = "audio-out")]
    {
        Box::new(CpalAudioOut::new())
    }
    #[cfg(not(feature = "audio-out"))]
    {
        Box::new(NoAudioOut)
    }
}

#[cfg(feature = "audio-out")]
pub use native::CpalAudioOut;

#[cfg(feature = "audio-out")]
mod native {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

    use super::{AudioOut, Clip};
    use crate::foundation::error::{MediaError, MediaResult, reject};

    struct Voice {
        stream: cpal::Stream,
        finished: Arc<AtomicBool>,
    }

    /// Plays clips on the default output device, resampling to the device rate.
    #[derive(Default)]
    pub struct CpalAudioOut {
        voices: Vec<Voice>,
    }

    impl CpalAudioOut {
        pub fn new() -> Self {
            Self::default()
        }

        fn open(&mut self, clip: Clip) -> MediaResult<Arc<AtomicBool>> {
            self.voices
                .retain(|v| !v.finished.load(Ordering::Acquire));

            let host = cpal::default_host();
            let Some(device) = host.default_output_device() else {
                return reject(MediaError::unsupported("no audio output device available"));
            };
            let supported = device
                .default_output_config()
                .map_err(|e| anyhow::anyhow!("query audio output config: {e}"))?;
            let config = cpal::StreamConfig {
                channels: supported.channels(),
                sample_rate: supported.sample_rate(),
                buffer_size: cpal::BufferSize::Default,
            };

            let channels = usize::from(config.channels.max(1));
            let step =
                f64::from(clip.sampling_rate) * clip.rate / f64::from(config.sample_rate.0);
            let finished = Arc::new(AtomicBool::new(false));
            let done = Arc::clone(&finished);
            let samples = clip.samples;
            let mut cursor = 0.0f64;

            let stream = device
                .build_output_stream(
                    &config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        for frame in data.chunks_mut(channels) {
                            let idx = cursor as usize;
                            let value = match samples.get(idx) {
                                Some(&s) => f32::from(s) / 32_768.0,
                                None => {
                                    done.store(true, Ordering::Release);
                                    0.0
                                }
                            };
                            frame.fill(value);
                            cursor += step;
                        }
                    },
                    |err| tracing::warn!("audio stream error: {err}"),
                    None,
                )
                .map_err(|e| anyhow::anyhow!("open audio output stream: {e}"))?;
            stream
                .play()
                .map_err(|e| anyhow::anyhow!("start audio output stream: {e}"))?;

            self.voices.push(Voice {
                stream,
                finished: Arc::clone(&finished),
            });
            Ok(finished)
        }
    }

    impl AudioOut for CpalAudioOut {
        fn start(&mut self, clip: Clip) -> MediaResult<()> {
            self.open(clip).map(|_| ())
        }

        fn play_blocking(&mut self, clip: Clip) -> MediaResult<()> {
            let budget = clip.duration() + std::time::Duration::from_millis(250);
            let started = std::time::Instant::now();
            let finished = self.open(clip)?;
            while !finished.load(Ordering::Acquire) && started.elapsed() < budget {
                std::thread::sleep(std::time::Duration::from_millis(10));
            }
            self.voices
                .retain(|v| !Arc::ptr_eq(&v.finished, &finished));
            Ok(())
        }

        fn stop(&mut self) -> MediaResult<()> {
            for voice in self.voices.drain(..) {
                let _ = voice.stream.pause();
            }
            Ok(())
        }
    }
}
