//! Core data types: documents, chunks, queries, answers

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document};
pub use query::QueryRequest;
pub use response::{Answer, Citation, DocumentSummary, EngineStatus, IngestReceipt};
