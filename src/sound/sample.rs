use std::fmt;

use crate::sound::{Sound, clamp_sample};

/// Read access shared by [`SampleRef`] and [`SampleMut`]. `index` is the 0-based buffer index.
pub trait Sample {
    fn index(&self) -> usize;
    fn value(&self) -> i16;
}

/// Read-only view of one sample.
#[derive(Clone, Copy, Debug)]
pub struct SampleRef<'a> {
    pub(crate) sound: &'a Sound,
    pub(crate) index: usize,
}

impl<'a> SampleRef<'a> {
    /// The sound this sample belongs to.
    pub fn sound(&self) -> &'a Sound {
        self.sound
    }
}

impl Sample for SampleRef<'_> {
    fn index(&self) -> usize {
        self.index
    }

    fn value(&self) -> i16 {
        self.sound.samples[self.index]
    }
}

/// Writable view of one sample.
#[derive(Debug)]
pub struct SampleMut<'a> {
    pub(crate) index: usize,
    pub(crate) value: &'a mut i16,
}

impl SampleMut<'_> {
    /// Store `value`, clamped to `-32768..=32767`.
    pub fn set_value(&mut self, value: i64) {
        *self.value = clamp_sample(value);
    }
}

impl Sample for SampleMut<'_> {
    fn index(&self) -> usize {
        self.index
    }

    fn value(&self) -> i16 {
        *self.value
    }
}

fn describe(f: &mut fmt::Formatter<'_>, sample: &impl Sample) -> fmt::Result {
    write!(f, "Sample at {} with value {}", sample.index() + 1, sample.value())
}

impl fmt::Display for SampleRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, self)
    }
}

impl fmt::Display for SampleMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_one_based_index() {
        let mut s = Sound::from_samples(vec![5, -7], 8000);
        assert_eq!(s.sample(1).unwrap().to_string(), "Sample at 2 with value -7");
        let mut m = s.sample_mut(0).unwrap();
        m.set_value(99_999);
        assert_eq!(m.to_string(), "Sample at 1 with value 32767");
    }
}
