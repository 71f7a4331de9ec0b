//! Language-model agent and the runner that drives it inside a session.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use rag_store::BoxFuture;
use tracing::{debug, instrument};

use crate::cfg::{AGENT_DESCRIPTION, AGENT_INSTRUCTION, AGENT_NAME};
use crate::error::AgentError;
use crate::session::{Author, Event, InMemorySessionService, SessionHandle};

/// Text generation backend used by the agent.
pub trait LanguageModel: Send + Sync {
    /// Model identifier, for logs and agent info.
    fn model_id(&self) -> &str;

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        system: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, AgentError>>;
}

impl LanguageModel for LlmServiceProfiles {
    fn model_id(&self) -> &str {
        &self.chat_profile().model
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        system: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, AgentError>> {
        Box::pin(async move {
            LlmServiceProfiles::generate(self, prompt, system)
                .await
                .map_err(AgentError::from)
        })
    }
}

/// Static agent identity plus its model.
#[derive(Clone)]
pub struct LlmAgent {
    pub name: String,
    pub description: String,
    pub instruction: String,
    model: Arc<dyn LanguageModel>,
}

impl LlmAgent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instruction: impl Into<String>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            instruction: instruction.into(),
            model,
        }
    }

    /// The support-ticket analyst agent.
    pub fn ticket_analyst(model: Arc<dyn LanguageModel>) -> Self {
        Self::new(AGENT_NAME, AGENT_DESCRIPTION, AGENT_INSTRUCTION, model)
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }
}

/// Runs one user message through the agent within a session.
pub struct Runner {
    agent: LlmAgent,
    sessions: Arc<InMemorySessionService>,
}

impl Runner {
    pub fn new(agent: LlmAgent, sessions: Arc<InMemorySessionService>) -> Self {
        Self { agent, sessions }
    }

    pub fn agent(&self) -> &LlmAgent {
        &self.agent
    }

    pub fn sessions(&self) -> &Arc<InMemorySessionService> {
        &self.sessions
    }

    /// Sends `message` and returns the agent's reply.
    ///
    /// Both the message and the reply are recorded as session events.
    /// A blank reply yields `Ok(None)`.
    #[instrument(target = "ticket_agent::runner", skip_all, fields(session = %session.session_id))]
    pub async fn run(
        &self,
        session: &SessionHandle,
        message: &str,
    ) -> Result<Option<String>, AgentError> {
        self.sessions
            .append_event(
                session,
                Event {
                    author: Author::User,
                    text: message.to_string(),
                },
            )
            .await?;

        let reply = self
            .agent
            .model
            .generate(message, Some(&self.agent.instruction))
            .await?;

        self.sessions
            .append_event(
                session,
                Event {
                    author: Author::Agent(self.agent.name.clone()),
                    text: reply.clone(),
                },
            )
            .await?;

        let trimmed = reply.trim();
        debug!(target: "ticket_agent::runner", reply_len = trimmed.len(), "agent replied");
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Echo {
        seen_system: Mutex<Option<String>>,
        reply: String,
    }

    impl LanguageModel for Echo {
        fn model_id(&self) -> &str {
            "echo"
        }

        fn generate<'a>(
            &'a self,
            _prompt: &'a str,
            system: Option<&'a str>,
        ) -> BoxFuture<'a, Result<String, AgentError>> {
            *self.seen_system.lock().unwrap() = system.map(str::to_string);
            let reply = self.reply.clone();
            Box::pin(async move { Ok(reply) })
        }
    }

    fn runner(reply: &str) -> (Runner, Arc<Echo>) {
        let model = Arc::new(Echo {
            seen_system: Mutex::new(None),
            reply: reply.into(),
        });
        let sessions = Arc::new(InMemorySessionService::new("app"));
        (
            Runner::new(LlmAgent::ticket_analyst(model.clone()), sessions),
            model,
        )
    }

    #[tokio::test]
    async fn reply_is_recorded_and_instruction_sent_as_system() {
        let (r, model) = runner("  done  ");
        let h = r.sessions().create_session("user", "s").await.unwrap();

        let out = r.run(&h, "question").await.unwrap();
        assert_eq!(out.as_deref(), Some("done"));
        assert_eq!(
            model.seen_system.lock().unwrap().as_deref(),
            Some(AGENT_INSTRUCTION)
        );

        let s = r.sessions().get_session(&h).await.unwrap();
        assert_eq!(s.events.len(), 2);
        assert_eq!(s.events[0].author, Author::User);
        assert_eq!(s.events[1].author, Author::Agent(AGENT_NAME.into()));
    }

    #[tokio::test]
    async fn blank_reply_is_none() {
        let (r, _) = runner(" \n ");
        let h = r.sessions().create_session("user", "s").await.unwrap();
        assert_eq!(r.run(&h, "q").await.unwrap(), None);
    }

    #[tokio::test]
    async fn closed_session_fails() {
        let (r, _) = runner("x");
        let h = SessionHandle {
            user_id: "user".into(),
            session_id: "missing".into(),
        };
        assert!(matches!(
            r.run(&h, "q").await,
            Err(AgentError::SessionNotFound { .. })
        ));
    }
}
