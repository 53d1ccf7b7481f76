//! Mock extraction backend
pub mod mock_extractor;

#[allow(unused_imports)]
pub use mock_extractor::{MockExtractor, MockOutcome};
