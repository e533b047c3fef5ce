// Text layer: word tables, normalization, and term ranking.
// Everything here is pure and synchronous; the analysis and optimizer layers build on it.

pub mod extractor;
pub mod lexicon;
pub mod normalizer;
