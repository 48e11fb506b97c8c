pub mod decode;
pub mod signal;

pub use decode::AudioClip;
