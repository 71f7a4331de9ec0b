//! Ticket search agent: retrieval-augmented answers over support tickets.
//!
//! Public entry point: [`TicketSearchAgent::execute`]. It embeds the query,
//! finds related ticket fragments in Qdrant, reassembles each matched ticket
//! from all of its fragments, summarizes every ticket with the language
//! model, and synthesizes one answer from the summaries.

mod agent;
mod api_types;
pub mod cfg;
mod error;
mod pipeline;
pub mod prompt;
pub mod session;

pub use agent::{LanguageModel, LlmAgent, Runner};
pub use api_types::{AgentInfo, SearchOutcome, SearchResult, TicketId, TicketSummary};
pub use cfg::AgentConfig;
pub use error::{AgentError, Stage, StageError};
pub use pipeline::{
    NO_ANSWER_PLACEHOLDER, NO_RELEVANT_TICKETS, NO_SUMMARIES, NO_SUMMARY_PLACEHOLDER,
    TicketFragments, TicketSearchAgent, extract_ticket_ids,
};
