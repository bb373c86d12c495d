//! Backend implementations for EduMentor.
//!
//! All backends implement traits from `edumentor_core`: text generation
//! (Gemini), web search (Google Custom Search), and document text
//! extraction (Apache Tika).

pub mod gemini;
pub mod google_search;
pub mod tika;

pub use gemini::GeminiGenerator;
pub use google_search::GoogleSearch;
pub use tika::TikaExtractor;
