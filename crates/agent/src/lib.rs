//! The query pipeline, the heart of Lu-Gang Connect.
//!
//! Every question follows the same single pass:
//!
//! 1. **Look up** context facts in the knowledge base
//! 2. **Classify** the question to pick Deepseek or Qwen
//! 3. **Build** the system prompt around the context
//! 4. **Dispatch** once to the selected upstream
//! 5. **Render** the answer, or a fixed failure string, into a response
//!
//! Upstream failures never abort the pipeline; they become the answer text.

pub mod assistant;
pub mod prompt;

pub use assistant::Assistant;
pub use prompt::{render_failure, system_prompt};
