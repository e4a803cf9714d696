pub mod illustrations;
pub mod llm;
pub mod render;
pub mod writer;
