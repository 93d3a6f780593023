pub mod metrics;
pub mod providers;
pub mod recognition;

pub use recognition::{Recognition, RecognitionService};
