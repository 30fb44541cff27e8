// src/ingest/providers/mod.rs
pub mod demo;
pub mod newsdata;

pub use demo::{demo_articles, DemoProvider, DEMO_TOP_UP};
pub use newsdata::NewsDataProvider;
