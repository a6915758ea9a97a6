use crate::completion::{Completion, Completions, ResponseOrdering};
use crate::error::ValidationError;
use crate::history::{ChatEntry, ChatHistory};
use smart_analyst_backend::{AnalystBackend, ApiResult, AskResponse};
use std::sync::Arc;

pub const NO_ANSWER_MESSAGE: &str = "AI did not return a response.";
pub const AI_UNAVAILABLE_MESSAGE: &str = "Error: AI service is unavailable.";

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pending_question: String,
    history: ChatHistory,
}

impl ChatState {
    pub fn pending_question(&self) -> &str {
        &self.pending_question
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }
}

struct AskOutcome {
    question: String,
    result: ApiResult<AskResponse>,
}

/// Owns the question/answer exchange. Every finished ask adds exactly one
/// history entry, in the order responses arrive.
pub struct ChatController {
    state: ChatState,
    backend: Arc<dyn AnalystBackend>,
    completions: Completions<AskOutcome>,
}

impl ChatController {
    pub fn new(backend: Arc<dyn AnalystBackend>) -> Self {
        Self {
            state: ChatState::default(),
            backend,
            // History growth must not depend on ordering, so nothing is ever dropped here.
            completions: Completions::new(ResponseOrdering::LastArrival),
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn pending_question(&self) -> &str {
        &self.state.pending_question
    }

    pub fn history(&self) -> &ChatHistory {
        &self.state.history
    }

    pub fn set_pending_question(&mut self, text: impl Into<String>) {
        self.state.pending_question = text.into();
    }

    pub fn ask(&mut self) -> Result<(), ValidationError> {
        if self.state.pending_question.is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }

        let question = self.state.pending_question.clone();
        let backend = Arc::clone(&self.backend);
        let seq = self.completions.spawn(async move {
            let result = backend.ask(&question).await;
            AskOutcome { question, result }
        });
        tracing::info!(seq, "Question sent");
        Ok(())
    }

    pub fn in_flight(&self) -> usize {
        self.completions.in_flight()
    }

    pub fn process_completions(&mut self) -> usize {
        let mut handled = 0;
        while let Some(completion) = self.completions.try_next() {
            self.apply(completion);
            handled += 1;
        }
        handled
    }

    pub async fn wait_for_completion(&mut self) -> bool {
        match self.completions.next().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, completion: Completion<AskOutcome>) {
        let Completion { seq, outcome } = completion;
        let AskOutcome { question, result } = outcome;

        let entry = match result {
            Ok(response) => {
                let answer = match response.non_empty_answer() {
                    Some(answer) => answer.to_string(),
                    None => {
                        tracing::info!(seq, "Backend returned no answer");
                        NO_ANSWER_MESSAGE.to_string()
                    }
                };
                // The input is cleared even if the user has typed something new meanwhile.
                self.state.pending_question.clear();
                ChatEntry::new(question, answer)
            }
            Err(e) => {
                tracing::warn!(seq, kind = e.kind(), "Ask failed: {e}");
                ChatEntry::new(question, AI_UNAVAILABLE_MESSAGE)
            }
        };
        self.state.history.append(entry);
    }
}
