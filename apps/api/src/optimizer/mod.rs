pub mod edits;
pub mod handlers;
pub mod updater;
