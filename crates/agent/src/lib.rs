//! Conversation engine for the storefront assistant.
//!
//! Each inbound message runs a fixed pipeline:
//! 1. **Salutation** (`salutation`) - stored honorific, else inferred from text
//! 2. **Routing** (`router`) - first matching intent in a fixed priority order
//! 3. **Composition** (`composer`) - reply text for the intent
//!
//! `AgentRuntime` wires the three together over the storage ports and records
//! submitted orders when an order log is attached.
//!
//! Routing is keyword matching only. Prices and delivery fees come from the
//! catalog and configuration, never from the message text.

pub mod composer;
pub mod router;
pub mod runtime;
pub mod salutation;

pub use composer::ResponseComposer;
pub use router::{Intent, IntentRouter, Routed, SmallTalkCategory};
pub use runtime::{AgentRuntime, AssistantSettings, Collaborators, InboundMessage, OutboundReply};
pub use salutation::{Resolution, SalutationResolver};
