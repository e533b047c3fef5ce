pub mod ats_score;
pub mod categorizer;
pub mod gap;
pub mod handlers;
pub mod pipeline;
pub mod segmenter;
pub mod similarity;
