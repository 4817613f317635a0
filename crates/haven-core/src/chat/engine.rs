//! The per-turn chat engine.
//!
//! One turn = configuration lookup → inference call → state append →
//! audit write. The engine owns the injected provider and store; it holds
//! no session state of its own. Error policy:
//!
//! - an inference failure propagates to the caller with session state
//!   untouched and no record written;
//! - an audit-write failure is caught here, logged at `warn`, and
//!   surfaced as an advisory string. Best-effort logging is the
//!   documented policy: no retry, no rollback of the displayed reply.

use haven_types::llm::{CompletionRequest, LlmError, Message};
use haven_types::persona::{Language, Persona};
use haven_types::record::InteractionRecord;

use crate::audit::InteractionStore;
use crate::llm::LlmProvider;
use crate::chat::session::SessionState;

/// One user submission plus the knobs in effect for it.
#[derive(Debug, Clone)]
pub struct TurnRequest<'a> {
    pub persona: &'a Persona,
    pub prompt: String,
    pub language: Language,
    /// Replaces the persona's model id for this turn when set.
    pub model_override: Option<String>,
    /// Replaces the persona's output bound for this turn when set.
    pub max_tokens_override: Option<u32>,
    /// Recorded on the interaction record; never interpreted.
    pub web_search: bool,
}

/// Result of a successful turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    /// Model identifier actually used (override or persona default).
    pub model: String,
    /// Set when the audit write failed; the exchange itself succeeded.
    pub audit_warning: Option<String>,
}

/// Orchestrates turns against injected collaborators.
pub struct ChatEngine<P, S> {
    provider: P,
    store: S,
}

impl<P: LlmProvider, S: InteractionStore> ChatEngine<P, S> {
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    /// Run one turn for the given session.
    ///
    /// On success both session histories grow by exactly two entries
    /// (user, assistant) and exactly one record write is attempted. On
    /// inference failure the session is unchanged and nothing is written.
    pub async fn run_turn(
        &self,
        session: &mut SessionState,
        request: TurnRequest<'_>,
    ) -> Result<TurnOutcome, LlmError> {
        let model = request
            .model_override
            .unwrap_or_else(|| request.persona.model.clone());
        let max_tokens = request
            .max_tokens_override
            .unwrap_or(request.persona.max_tokens);

        let mut system = request.persona.system_prompt.clone();
        if let Some(directive) = request.language.directive() {
            system.push_str(directive);
        }

        let mut messages: Vec<Message> = session.history().to_vec();
        messages.push(Message::user(request.prompt.clone()));

        let response = self
            .provider
            .complete(&CompletionRequest {
                model: model.clone(),
                messages,
                system: Some(system),
                max_tokens,
            })
            .await?;

        session.append_exchange(&request.prompt, &response.content);

        let record = InteractionRecord::new(
            session.id(),
            request.persona.name.clone(),
            request.prompt,
            response.content.clone(),
            model.clone(),
            request.web_search,
        );

        let audit_warning = match self.store.put(&record).await {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(session_id = %session.id(), error = %err, "interaction logging failed");
                Some(format!("Logging failed: {err}"))
            }
        };

        Ok(TurnOutcome {
            reply: response.content,
            model,
            audit_warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use haven_types::error::StoreError;
    use haven_types::llm::{CompletionResponse, StopReason, Usage};
    use haven_types::record::TableStatus;
    use uuid::Uuid;

    struct FakeProvider {
        reply: Option<String>,
        /// Captures the last request for assertions.
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl FakeProvider {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                last_request: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                last_request: Mutex::new(None),
            }
        }
    }

    impl LlmProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Some(reply) => Ok(CompletionResponse {
                    id: "msg_test".to_string(),
                    content: reply.clone(),
                    model: request.model.clone(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                None => Err(LlmError::Provider {
                    message: "model unavailable".to_string(),
                }),
            }
        }
    }

    struct RecordingStore {
        puts: Mutex<Vec<InteractionRecord>>,
        fail_puts: bool,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                puts: Mutex::new(Vec::new()),
                fail_puts: false,
            }
        }

        fn failing() -> Self {
            Self {
                puts: Mutex::new(Vec::new()),
                fail_puts: true,
            }
        }

        fn put_count(&self) -> usize {
            self.puts.lock().unwrap().len()
        }
    }

    impl InteractionStore for RecordingStore {
        async fn put(&self, record: &InteractionRecord) -> Result<(), StoreError> {
            if self.fail_puts {
                return Err(StoreError::Transport("connection refused".to_string()));
            }
            self.puts.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn recent_for_session(
            &self,
            _session_id: &Uuid,
            _limit: u32,
        ) -> Result<Vec<InteractionRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn scan(&self, _limit: Option<u32>) -> Result<Vec<InteractionRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn create_log_table(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn table_status(&self) -> Result<TableStatus, StoreError> {
            Ok(TableStatus::Active)
        }
    }

    fn test_persona() -> Persona {
        Persona {
            name: "Trauma Support Counselor".to_string(),
            model: "anthropic.claude-3-5-sonnet-20241022-v2:0".to_string(),
            system_prompt: "You are a compassionate trauma counselor.".to_string(),
            max_tokens: 4096,
            context_window: 200_000,
        }
    }

    fn turn<'a>(persona: &'a Persona, prompt: &str) -> TurnRequest<'a> {
        TurnRequest {
            persona,
            prompt: prompt.to_string(),
            language: Language::En,
            model_override: None,
            max_tokens_override: None,
            web_search: false,
        }
    }

    #[tokio::test]
    async fn test_success_appends_two_and_writes_one_record() {
        let persona = test_persona();
        let engine = ChatEngine::new(FakeProvider::replying("R"), RecordingStore::new());
        let mut session = SessionState::new();

        let outcome = engine
            .run_turn(&mut session, turn(&persona, "I feel anxious"))
            .await
            .unwrap();

        assert_eq!(outcome.reply, "R");
        assert!(outcome.audit_warning.is_none());
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.display().len(), 2);
        assert_eq!(engine.store.put_count(), 1);

        let puts = engine.store.puts.lock().unwrap();
        let record = &puts[0];
        assert_eq!(record.session_id, session.id());
        assert_eq!(record.bot_name, "Trauma Support Counselor");
        assert_eq!(record.prompt, "I feel anxious");
        assert_eq!(record.response, "R");
    }

    #[tokio::test]
    async fn test_failure_leaves_session_untouched_and_writes_nothing() {
        let persona = test_persona();
        let engine = ChatEngine::new(FakeProvider::failing(), RecordingStore::new());
        let mut session = SessionState::new();

        let err = engine
            .run_turn(&mut session, turn(&persona, "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Provider { .. }));
        assert!(session.history().is_empty());
        assert!(session.display().is_empty());
        assert_eq!(engine.store.put_count(), 0);
    }

    #[tokio::test]
    async fn test_audit_failure_is_downgraded_to_warning() {
        let persona = test_persona();
        let engine = ChatEngine::new(FakeProvider::replying("R"), RecordingStore::failing());
        let mut session = SessionState::new();

        let outcome = engine
            .run_turn(&mut session, turn(&persona, "hello"))
            .await
            .unwrap();

        // The reply survives; the failure only surfaces as an advisory.
        assert_eq!(outcome.reply, "R");
        let warning = outcome.audit_warning.unwrap();
        assert!(warning.contains("Logging failed"));
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_language_directive_appended_for_farsi_only() {
        let persona = test_persona();
        let engine = ChatEngine::new(FakeProvider::replying("R"), RecordingStore::new());
        let mut session = SessionState::new();

        let mut request = turn(&persona, "سلام");
        request.language = Language::Fa;
        engine.run_turn(&mut session, request).await.unwrap();

        let sent = engine.provider.last_request.lock().unwrap().clone().unwrap();
        let system = sent.system.unwrap();
        assert!(system.starts_with(&persona.system_prompt));
        assert!(system.ends_with(" Respond in Persian/Farsi language."));

        // English turn: suffix absent, and the earlier exchange is intact.
        engine
            .run_turn(&mut session, turn(&persona, "hello"))
            .await
            .unwrap();
        let sent = engine.provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.system.unwrap(), persona.system_prompt);
        assert_eq!(session.history()[0].content, "سلام");
    }

    #[tokio::test]
    async fn test_history_precedes_new_prompt_in_request() {
        let persona = test_persona();
        let engine = ChatEngine::new(FakeProvider::replying("R"), RecordingStore::new());
        let mut session = SessionState::new();

        engine
            .run_turn(&mut session, turn(&persona, "first"))
            .await
            .unwrap();
        engine
            .run_turn(&mut session, turn(&persona, "second"))
            .await
            .unwrap();

        let sent = engine.provider.last_request.lock().unwrap().clone().unwrap();
        let contents: Vec<&str> = sent.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "R", "second"]);
    }

    #[tokio::test]
    async fn test_overrides_replace_persona_defaults() {
        let persona = test_persona();
        let engine = ChatEngine::new(FakeProvider::replying("R"), RecordingStore::new());
        let mut session = SessionState::new();

        let mut request = turn(&persona, "hello");
        request.model_override = Some("anthropic.claude-3-haiku-20240307-v1:0".to_string());
        request.max_tokens_override = Some(1000);

        let outcome = engine.run_turn(&mut session, request).await.unwrap();
        assert_eq!(outcome.model, "anthropic.claude-3-haiku-20240307-v1:0");

        let sent = engine.provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.model, "anthropic.claude-3-haiku-20240307-v1:0");
        assert_eq!(sent.max_tokens, 1000);

        // The override model is what gets logged.
        let puts = engine.store.puts.lock().unwrap();
        assert_eq!(puts[0].model, "anthropic.claude-3-haiku-20240307-v1:0");
    }

    #[tokio::test]
    async fn test_web_search_flag_is_recorded_verbatim() {
        let persona = test_persona();
        let engine = ChatEngine::new(FakeProvider::replying("R"), RecordingStore::new());
        let mut session = SessionState::new();

        let mut request = turn(&persona, "hello");
        request.web_search = true;
        engine.run_turn(&mut session, request).await.unwrap();

        let puts = engine.store.puts.lock().unwrap();
        assert!(puts[0].web_search_enabled);
    }
}
