pub mod lang;
pub mod ornament;
pub mod recognition;

pub use lang::{Lang, UnknownLang};
pub use ornament::{Ornament, OrnamentDescription};
pub use recognition::{ImageError, JpegImage, RecognitionRequest};
