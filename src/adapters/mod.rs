// Adapters layer: concrete implementations for local files and the JSON artifacts.

pub mod artifacts;
pub mod preprocessor;
pub mod regressor;
pub mod storage;
