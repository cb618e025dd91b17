//! Agent System
//!
//! The document analyst is the only agent: it takes one user action, runs it
//! through extraction, prompt building and completion, and updates the session.
//!
//! ```text
//! Upload ──▶ validate ──▶ extract ──▶ session.document
//!
//! Question / quick action
//!      │
//!      ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Prompt    │ ─▶ │ Completion  │ ─▶ │  Transcript │
//! │   Builder   │    │   Client    │    │   (append)  │
//! └─────────────┘    └─────────────┘    └─────────────┘
//! ```

pub mod analyst;

pub use analyst::DocumentAnalyst;
