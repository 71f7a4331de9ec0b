//! Ephemeral conversational sessions.
//!
//! Every language-model exchange runs inside its own session. A
//! [`RequestScope`] names the sessions of one pipeline run and removes them
//! when it is dropped, so the registry only holds in-flight exchanges, even
//! when a run unwinds.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::AgentError;

/// Who produced an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Author {
    User,
    Agent(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub author: Author,
    pub text: String,
}

/// Identity of an open session.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionHandle {
    pub user_id: String,
    pub session_id: String,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub app_name: String,
    pub handle: SessionHandle,
    pub events: Vec<Event>,
}

/// App-scoped in-memory session registry.
///
/// The lock is never held across an await point, which lets
/// [`RequestScope`] release sessions from `Drop`.
#[derive(Debug)]
pub struct InMemorySessionService {
    app_name: String,
    sessions: RwLock<HashMap<SessionHandle, Session>>,
}

impl InMemorySessionService {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    // Poisoning is ignored: no critical section can leave the map inconsistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionHandle, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionHandle, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a new session.
    ///
    /// # Errors
    /// [`AgentError::SessionExists`] if the same user already holds `session_id`.
    pub async fn create_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<SessionHandle, AgentError> {
        let handle = SessionHandle {
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
        };

        let mut map = self.write();
        if map.contains_key(&handle) {
            return Err(AgentError::SessionExists {
                user_id: handle.user_id,
                session_id: handle.session_id,
            });
        }
        map.insert(
            handle.clone(),
            Session {
                app_name: self.app_name.clone(),
                handle: handle.clone(),
                events: Vec::new(),
            },
        );
        trace!(target: "ticket_agent::session", user_id, session_id, "session created");
        Ok(handle)
    }

    /// Appends an event to an open session.
    pub async fn append_event(
        &self,
        handle: &SessionHandle,
        event: Event,
    ) -> Result<(), AgentError> {
        let mut map = self.write();
        match map.get_mut(handle) {
            Some(s) => {
                s.events.push(event);
                Ok(())
            }
            None => Err(AgentError::SessionNotFound {
                user_id: handle.user_id.clone(),
                session_id: handle.session_id.clone(),
            }),
        }
    }

    /// Snapshot of a session.
    pub async fn get_session(&self, handle: &SessionHandle) -> Option<Session> {
        self.read().get(handle).cloned()
    }

    /// Removes a session; returns whether it existed.
    pub async fn delete_session(&self, handle: &SessionHandle) -> bool {
        self.write().remove(handle).is_some()
    }

    /// Number of open sessions.
    pub async fn len(&self) -> usize {
        self.read().len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes every listed session in one critical section.
    pub fn release(&self, handles: &[SessionHandle]) -> usize {
        let mut map = self.write();
        handles.iter().filter(|h| map.remove(*h).is_some()).count()
    }
}

/// Per-request session namespace.
///
/// Session ids are `{token}:{stage}:{key}` where `token` is a random v4 UUID,
/// so concurrent requests never share a session even for the same ticket.
/// Sessions opened through the scope are deleted when it is dropped.
#[derive(Debug)]
pub struct RequestScope {
    token: Uuid,
    sessions: Arc<InMemorySessionService>,
    opened: Vec<SessionHandle>,
}

impl RequestScope {
    pub fn new(sessions: Arc<InMemorySessionService>) -> Self {
        Self {
            token: Uuid::new_v4(),
            sessions,
            opened: Vec::new(),
        }
    }

    pub fn token(&self) -> Uuid {
        self.token
    }

    pub fn session_id(&self, stage: &str, key: &str) -> String {
        format!("{}:{stage}:{key}", self.token)
    }

    /// Opens a session owned by this scope.
    pub async fn open(
        &mut self,
        user_id: &str,
        stage: &str,
        key: &str,
    ) -> Result<SessionHandle, AgentError> {
        let id = self.session_id(stage, key);
        let handle = self.sessions.create_session(user_id, &id).await?;
        self.opened.push(handle.clone());
        Ok(handle)
    }

    /// Ends the scope, deleting its sessions.
    pub fn close(self) {}
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        let released = self.sessions.release(&self.opened);
        debug!(
            target: "ticket_agent::session",
            token = %self.token,
            released,
            unwinding = std::thread::panicking(),
            "request scope closed"
        );
    }
}

/// Stable digest of a query, used as a session key.
pub fn query_digest(query: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, query.as_bytes())
}
