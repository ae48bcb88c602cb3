use rand::Rng as _;

use crate::foundation::error::{MediaError, MediaResult, reject};
use crate::foundation::index::{sample_index, sample_to_student};
use crate::sound::sample::{Sample, SampleMut, SampleRef};
use crate::sound::{MAX_DURATION_SECS, MAX_SAMPLING_RATE, Sound};

fn positive_rate(func: &str, count_name: &str, ok: bool, sampling_rate: i64) -> MediaResult<u32> {
    match u32::try_from(sampling_rate) {
        Ok(rate) if rate > MAX_SAMPLING_RATE => reject(MediaError::out_of_range(format!(
            "{func}: sampling_rate must be at most {MAX_SAMPLING_RATE}, got {rate}"
        ))),
        Ok(rate) if ok && rate > 0 => Ok(rate),
        _ => reject(MediaError::out_of_range(format!(
            "{func}: {count_name} and sampling_rate must each be greater than 0"
        ))),
    }
}

pub fn make_empty_sound(num_samples: i64, sampling_rate: i64) -> MediaResult<Sound> {
    const FUNC: &str = "make_empty_sound(num_samples, sampling_rate)";
    let rate = positive_rate(FUNC, "num_samples", num_samples > 0, sampling_rate)?;
    if num_samples as f64 / f64::from(rate) > MAX_DURATION_SECS {
        return reject(MediaError::out_of_range(format!(
            "{FUNC}: created sound must be less than {MAX_DURATION_SECS} seconds"
        )));
    }
    Ok(Sound::silent(num_samples as usize, rate))
}

pub fn make_empty_sound_by_seconds(seconds: f64, sampling_rate: i64) -> MediaResult<Sound> {
    const FUNC: &str = "make_empty_sound_by_seconds(seconds, sampling_rate)";
    let rate = positive_rate(FUNC, "seconds", seconds > 0.0, sampling_rate)?;
    if seconds > MAX_DURATION_SECS {
        return reject(MediaError::out_of_range(format!(
            "{FUNC}: created sound must be less than {MAX_DURATION_SECS} seconds"
        )));
    }
    let num_samples = (seconds * f64::from(rate)).round().max(1.0) as usize;
    Ok(Sound::silent(num_samples, rate))
}

/// Sound just long enough to hold every sample at its own index, at the first sample's rate.
/// Indices no sample covers are silent.
pub fn samples_to_sound(samples: &[SampleRef<'_>]) -> MediaResult<Sound> {
    let Some(first) = samples.first() else {
        return reject(MediaError::out_of_range(
            "samples_to_sound(samples): there must be at least one sample",
        ));
    };
    let len = samples.iter().map(|s| s.index() + 1).max().unwrap_or(1);
    let mut buffer = vec![0; len];
    for s in samples {
        buffer[s.index()] = s.value();
    }
    Ok(Sound::from_samples(buffer, first.sound().sampling_rate()))
}

/// Deep copy, keeping the source file name.
pub fn duplicate_sound(sound: &Sound) -> Sound {
    sound.clone()
}

pub fn get_samples(sound: &Sound) -> Vec<SampleRef<'_>> {
    sound.samples().collect()
}

pub fn get_samples_mut(sound: &mut Sound) -> Vec<SampleMut<'_>> {
    sound.samples_mut().collect()
}

fn out_of_sound(func: &str) -> MediaError {
    MediaError::out_of_range(format!("{func}: sample lies outside the sound"))
}

pub fn get_sample_value_at(sound: &Sound, index: i64) -> MediaResult<i16> {
    const FUNC: &str = "get_sample_value_at(sound, index)";
    let i = sample_index(FUNC, index, sound.len())?;
    sound.value(i).ok_or_else(|| out_of_sound(FUNC))
}

/// Values beyond the 16-bit range are clamped.
pub fn set_sample_value_at(sound: &mut Sound, index: i64, value: i64) -> MediaResult<()> {
    const FUNC: &str = "set_sample_value_at(sound, index, value)";
    let i = sample_index(FUNC, index, sound.len())?;
    if !sound.set_value(i, value) {
        return Err(out_of_sound(FUNC));
    }
    Ok(())
}

pub fn get_sample_object_at(sound: &Sound, index: i64) -> MediaResult<SampleRef<'_>> {
    const FUNC: &str = "get_sample_object_at(sound, index)";
    let i = sample_index(FUNC, index, sound.len())?;
    sound.sample(i).ok_or_else(|| out_of_sound(FUNC))
}

pub fn get_sample_value(sample: &impl Sample) -> i16 {
    sample.value()
}

pub fn get_sample(sample: &impl Sample) -> i16 {
    sample.value()
}

pub fn set_sample_value(sample: &mut SampleMut<'_>, value: i64) {
    sample.set_value(value);
}

pub fn set_sample(sample: &mut SampleMut<'_>, value: i64) {
    sample.set_value(value);
}

pub fn get_sound<'a>(sample: &SampleRef<'a>) -> &'a Sound {
    sample.sound()
}

/// 1-based index of `sample`.
pub fn get_index(sample: &impl Sample) -> i64 {
    sample_to_student(sample.index())
}

pub fn get_length(sound: &Sound) -> usize {
    sound.len()
}

pub fn get_num_samples(sound: &Sound) -> usize {
    sound.len()
}

pub fn get_sampling_rate(sound: &Sound) -> u32 {
    sound.sampling_rate()
}

/// Length in seconds.
pub fn get_duration(sound: &Sound) -> f64 {
    sound.duration_secs()
}

/// Pick `count` samples of `sound` at random (with repeats) and gather them with
/// [`samples_to_sound`].
pub fn random_samples(sound: &Sound, count: usize) -> MediaResult<Sound> {
    let mut rng = rand::thread_rng();
    let chosen: Vec<SampleRef<'_>> = if sound.is_empty() {
        Vec::new()
    } else {
        (0..count)
            .filter_map(|_| sound.sample(rng.gen_range(0..sound.len())))
            .collect()
    };
    samples_to_sound(&chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sound_limits() {
        let s = make_empty_sound(100, 8000).unwrap();
        assert_eq!(get_length(&s), 100);
        assert!(s.as_slice().iter().all(|&v| v == 0));
        assert!(make_empty_sound(0, 8000).is_err());
        assert!(make_empty_sound(10, 0).is_err());
        assert!(make_empty_sound(10, -1).is_err());
        let err = make_empty_sound(601 * 10, 10).unwrap_err();
        assert!(err.to_string().contains("600"));
        assert!(make_empty_sound(600 * 10, 10).is_ok());
    }

    #[test]
    fn sampling_rate_is_capped() {
        let err = make_empty_sound(10, i64::from(u32::MAX)).unwrap_err();
        assert!(err.to_string().contains("at most 192000"), "{err}");
        assert!(make_empty_sound_by_seconds(1.0, i64::from(MAX_SAMPLING_RATE) + 1).is_err());
        let s = make_empty_sound(10, i64::from(MAX_SAMPLING_RATE)).unwrap();
        assert_eq!(s.sampling_rate(), MAX_SAMPLING_RATE);
    }

    #[test]
    fn empty_sound_by_seconds() {
        let s = make_empty_sound_by_seconds(1.5, 1000).unwrap();
        assert_eq!(get_num_samples(&s), 1500);
        assert_eq!(get_duration(&s), 1.5);
        assert!(make_empty_sound_by_seconds(0.0, 1000).is_err());
        assert!(make_empty_sound_by_seconds(600.5, 1000).is_err());
    }

    #[test]
    fn sample_values_clamp_and_round_trip() {
        let mut s = make_empty_sound(4, 8000).unwrap();
        set_sample_value_at(&mut s, 1, 40_000).unwrap();
        set_sample_value_at(&mut s, 2, -40_000).unwrap();
        set_sample_value_at(&mut s, 4, 1234).unwrap();
        assert_eq!(get_sample_value_at(&s, 1).unwrap(), i16::MAX);
        assert_eq!(get_sample_value_at(&s, 2).unwrap(), i16::MIN);
        assert_eq!(get_sample_value_at(&s, 4).unwrap(), 1234);
        let err = get_sample_value_at(&s, 5).unwrap_err();
        assert!(err.to_string().contains("last valid index is 4"));
        assert!(set_sample_value_at(&mut s, 0, 1).is_err());
    }

    #[test]
    fn sample_objects_know_their_sound() {
        let s = Sound::from_samples(vec![5, 6, 7], 11_025);
        let sample = get_sample_object_at(&s, 3).unwrap();
        assert_eq!(get_index(&sample), 3);
        assert_eq!(get_sample_value(&sample), 7);
        assert_eq!(get_sampling_rate(get_sound(&sample)), 11_025);
    }

    #[test]
    fn mutable_samples_write_through() {
        let mut s = Sound::silent(3, 8000);
        for mut sample in get_samples_mut(&mut s) {
            let v = get_index(&sample) * 100;
            set_sample(&mut sample, v);
        }
        assert_eq!(s.as_slice(), &[100, 200, 300]);
    }

    #[test]
    fn samples_keep_their_indices() {
        let s = Sound::from_samples(vec![1, 2, 3, 4], 8000);
        let picked = vec![
            get_sample_object_at(&s, 3).unwrap(),
            get_sample_object_at(&s, 1).unwrap(),
        ];
        let out = samples_to_sound(&picked).unwrap();
        assert_eq!(out.as_slice(), &[1, 0, 3]);
        assert_eq!(out.sampling_rate(), 8000);
        assert!(samples_to_sound(&[]).is_err());
    }

    #[test]
    fn random_samples_stay_within_the_source() {
        let s = Sound::from_samples(vec![9; 50], 8000);
        let out = random_samples(&s, 10).unwrap();
        assert!(out.len() <= 50);
        assert!(out.as_slice().iter().all(|&v| v == 0 || v == 9));
    }
}
