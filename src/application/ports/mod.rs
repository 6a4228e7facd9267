// src/application/ports/mod.rs
pub mod cache;
pub mod id;
pub mod time;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type ArticleCachePort = dyn cache::ArticleCache;
pub type ClockPort = dyn time::Clock;
pub type IdGeneratorPort = dyn id::IdGenerator;
