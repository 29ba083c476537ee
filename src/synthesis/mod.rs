pub mod dedup;
pub mod merge;
pub mod pipeline;

pub use dedup::FactDeduplicator;
pub use merge::ArticleSynthesizer;
pub use pipeline::{synthesize_articles, SynthesisPipeline, SynthesisReport, SynthesisStats};
