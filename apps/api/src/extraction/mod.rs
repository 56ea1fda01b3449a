// Resume text extraction: document reading, keyword/pattern extraction, and the
// upload → store → extract pipeline that persists the derived record.

pub mod extractor;
pub mod handlers;
pub mod pipeline;
pub mod reader;
pub mod vocabulary;
