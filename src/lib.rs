pub mod models;
pub mod sensing;

pub use models::ActivitySample;
