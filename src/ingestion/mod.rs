//! Document ingestion: splitting extracted text into retrievable chunks

mod chunker;

pub use chunker::TextChunker;
