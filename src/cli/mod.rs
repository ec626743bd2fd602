pub mod convert;
pub mod input;
pub mod interactive;
pub mod setup;
pub mod ui;
