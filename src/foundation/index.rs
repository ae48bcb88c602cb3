//! Conversion between the 1-based indices students use and 0-based buffer indices.
//!
//! Every check here fails instead of clamping; out-of-range access is always an error.

use crate::foundation::error::{MediaError, MediaResult, reject};

/// First valid pixel coordinate on either axis.
pub const PICTURE_INDEX_OFFSET: i64 = 1;
/// First valid sample index.
pub const SOUND_INDEX_OFFSET: i64 = 1;

/// Picture axis named in out-of-range messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }

    fn extent_name(self) -> &'static str {
        match self {
            Self::X => "width",
            Self::Y => "height",
        }
    }
}

/// Translate a 1-based pixel coordinate into a buffer coordinate, checking `1 ..= extent`.
pub fn pixel_coord(func: &str, axis: Axis, value: i64, extent: u32) -> MediaResult<u32> {
    let last = i64::from(extent) - 1 + PICTURE_INDEX_OFFSET;
    if value < PICTURE_INDEX_OFFSET || value > last {
        return reject(MediaError::out_of_range(format!(
            "{func}: {} (= {value}) is less than {PICTURE_INDEX_OFFSET} or bigger than the {} (= {last})",
            axis.name(),
            axis.extent_name(),
        )));
    }
    Ok((value - PICTURE_INDEX_OFFSET) as u32)
}

/// Translate a 1-based sample index into a buffer index, checking `1 ..= len`.
pub fn sample_index(func: &str, index: i64, len: usize) -> MediaResult<usize> {
    let last = len as i64 - 1 + SOUND_INDEX_OFFSET;
    if index < SOUND_INDEX_OFFSET {
        return reject(MediaError::out_of_range(format!(
            "{func}: you asked for the sample at index {index}, which is less than \
             {SOUND_INDEX_OFFSET}; try again using an index in the range [{SOUND_INDEX_OFFSET},{last}]"
        )));
    }
    if index > last {
        return reject(MediaError::out_of_range(format!(
            "{func}: you are trying to access the sample at index {index}, but the last valid index is {last}"
        )));
    }
    Ok((index - SOUND_INDEX_OFFSET) as usize)
}

/// Buffer pixel coordinate to the student convention.
pub fn pixel_to_student(coord: u32) -> i64 {
    i64::from(coord) + PICTURE_INDEX_OFFSET
}

/// Buffer sample index to the student convention.
pub fn sample_to_student(index: usize) -> i64 {
    index as i64 + SOUND_INDEX_OFFSET
}
