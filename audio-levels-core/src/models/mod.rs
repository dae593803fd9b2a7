pub mod error;
pub mod format;
pub mod levels;
pub mod params;
pub mod source;
