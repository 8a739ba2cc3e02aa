pub mod frame;
pub mod preprocess;

pub use frame::RawFrame;
pub use preprocess::{resize, ANALYSIS_MAX_DIMENSION};
