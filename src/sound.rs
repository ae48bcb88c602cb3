//! Mono 16-bit sounds and the samples students read and write.

pub mod codec;
pub mod playback;
pub mod sample;

use std::path::{Path, PathBuf};

use crate::sound::sample::{SampleMut, SampleRef};

/// Highest sampling rate a sound may be created with.
pub const MAX_SAMPLING_RATE: u32 = 192_000;
/// Longest sound that may be created from scratch.
pub const MAX_DURATION_SECS: f64 = 600.0;

/// Clamp an arbitrary integer into the signed 16-bit sample range.
pub fn clamp_sample(value: i64) -> i16 {
    value.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}

/// A buffer of mono samples at a fixed sampling rate.
#[derive(Clone, Debug, PartialEq)]
pub struct Sound {
    samples: Vec<i16>,
    sampling_rate: u32,
    file_name: Option<PathBuf>,
}

impl Sound {
    /// `num_samples` zero samples. Callers are expected to have validated the size.
    pub fn silent(num_samples: usize, sampling_rate: u32) -> Self {
        Self::from_samples(vec![0; num_samples], sampling_rate)
    }

    pub fn from_samples(samples: Vec<i16>, sampling_rate: u32) -> Self {
        Self {
            samples,
            sampling_rate,
            file_name: None,
        }
    }

    pub(crate) fn with_file_name(mut self, path: &Path) -> Self {
        self.file_name = Some(path.to_path_buf());
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sampling_rate)
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.samples
    }

    pub fn value(&self, index: usize) -> Option<i16> {
        self.samples.get(index).copied()
    }

    /// Store `value` at `index`, clamped to the 16-bit range. Returns `false` when out of bounds.
    pub fn set_value(&mut self, index: usize, value: i64) -> bool {
        match self.samples.get_mut(index) {
            Some(slot) => {
                *slot = clamp_sample(value);
                true
            }
            None => false,
        }
    }

    pub fn sample(&self, index: usize) -> Option<SampleRef<'_>> {
        (index < self.samples.len()).then_some(SampleRef { sound: self, index })
    }

    pub fn sample_mut(&mut self, index: usize) -> Option<SampleMut<'_>> {
        self.samples
            .get_mut(index)
            .map(|value| SampleMut { index, value })
    }

    pub fn samples(&self) -> impl Iterator<Item = SampleRef<'_>> {
        (0..self.samples.len()).map(move |index| SampleRef { sound: self, index })
    }

    pub fn samples_mut(&mut self) -> impl Iterator<Item = SampleMut<'_>> {
        self.samples
            .iter_mut()
            .enumerate()
            .map(|(index, value)| SampleMut { index, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::sample::Sample as _;

    #[test]
    fn silent_sound_is_all_zero() {
        let s = Sound::silent(100, 8000);
        assert_eq!(s.len(), 100);
        assert!(s.as_slice().iter().all(|&v| v == 0));
        assert_eq!(s.duration_secs(), 100.0 / 8000.0);
    }

    #[test]
    fn set_value_clamps_and_reports_bounds() {
        let mut s = Sound::silent(2, 8000);
        assert!(s.set_value(0, 40_000));
        assert!(s.set_value(1, -40_000));
        assert!(!s.set_value(2, 1));
        assert_eq!(s.as_slice(), &[i16::MAX, i16::MIN]);
    }

    #[test]
    fn sample_iterators_visit_in_order() {
        let mut s = Sound::from_samples(vec![1, 2, 3], 8000);
        for mut smp in s.samples_mut() {
            let v = smp.value();
            smp.set_value(i64::from(v) * 10);
        }
        let seen: Vec<(usize, i16)> = s.samples().map(|x| (x.index(), x.value())).collect();
        assert_eq!(seen, vec![(0, 10), (1, 20), (2, 30)]);
    }
}
