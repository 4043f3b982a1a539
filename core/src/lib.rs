// Core building blocks shared by the document QA crates:
// - Gemini API clients (generation and embedding)
// - Request/response data structures and conversation turns
// - Service traits the pipeline is written against
// - Configuration loading
// - Shared error types

// Export client module - generateContent client
pub mod client;
pub use client::*;

// Export embedding module - embedContent client
pub mod embedding;
pub use embedding::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export services module - Traits for the external collaborators
pub mod services;
pub use services::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
