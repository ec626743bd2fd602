//! Core conversion logic and ambient services

pub mod config;
pub mod converter;
pub mod currency;
pub mod error;
pub mod log;
pub mod state;

// Re-export main types for cleaner imports
pub use converter::Converter;
pub use currency::{Conversion, ConversionProvider, Currency};
pub use error::ConversionError;
pub use state::{ConversionParams, InputState, OutputView};
