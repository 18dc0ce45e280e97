mod sample;

pub use sample::ActivitySample;
