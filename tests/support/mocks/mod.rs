// tests/support/mocks/mod.rs
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod stores;
pub mod time;

pub use stores::{CountingDraftStore, StalledDraftStore};
pub use time::fixed_now;
