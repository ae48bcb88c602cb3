pub mod error;
pub mod index;
pub(crate) mod math;
