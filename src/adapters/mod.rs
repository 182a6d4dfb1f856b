// Adapters layer: concrete implementations for external systems (Gemini API, HTTP server).

pub mod gemini;
pub mod http;
