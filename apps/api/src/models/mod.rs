pub mod document;
pub mod term;
