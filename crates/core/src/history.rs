use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    question: String,
    answer: String,
    answered_at: DateTime<Utc>,
}

impl ChatEntry {
    pub(crate) fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            answered_at: Utc::now(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn answered_at(&self) -> DateTime<Utc> {
        self.answered_at
    }
}

/// Conversation log. Entries can only be appended; a clone taken earlier is a
/// snapshot that never sees later appends.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    entries: Arc<Vec<ChatEntry>>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, entry: ChatEntry) {
        Arc::make_mut(&mut self.entries).push(entry);
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChatHistory {
    type Item = &'a ChatEntry;
    type IntoIter = std::slice::Iter<'a, ChatEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
