//! Agent definitions deployed to the hosting service.
//!
//! Agents are declared in TOML. The built-in definitions are embedded in the
//! binary; more can be dropped into the configured agents directory.
//!
//! # Example
//!
//! ```toml
//! [agent]
//! id = "simple-test"
//! name = "simple_test_agent"
//! description = "A simple test agent"
//! kind = "llm"
//!
//! [model]
//! name = "gemini-2.5-pro"
//! instruction = "You are a helpful assistant."
//! tools = []
//! ```
//!
//! `echo` agents carry no model and answer `Processed: <input>` locally; they
//! exist for smoke tests and cannot be deployed.

pub mod definition;
pub mod registry;

pub use definition::{Agent, AgentKind, AgentMeta, ModelConfig};
pub use registry::AgentRegistry;
