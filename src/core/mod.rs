pub mod analysis;
pub mod prompt;
