pub mod classifier;
pub mod landmark;

pub use classifier::{classify, classify_extension, extension, Extension, Gesture};
pub use landmark::{HandLandmarks, Landmark, LandmarkIndex};
