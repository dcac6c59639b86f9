//! Asynchronous record ingestion from the upstream metrics backend.

pub mod fetcher;

pub use fetcher::{FetchOutcome, RecordFetcher, RecordPage};
