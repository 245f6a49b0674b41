//! Conversation state and the upload/send flow.
//!
//! [`ChatState`] is the whole state of a chat: the chosen file, the question
//! being typed, the log, and a busy flag. It only changes through the
//! transition methods below, so the flow can be tested without any terminal
//! or network.
//!
//! [`Chat`] drives those transitions against a [`ChatBackend`].

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::classify::classify;
use crate::client::ChatBackend;
use crate::models::{BotContent, ConversationEntry};

/// File extensions the upload accepts.
const ACCEPTED_EXTENSIONS: [&str; 2] = ["json", "txt"];

/// A user action that was refused before any request was made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Please select a file before uploading.")]
    NoFile,

    #[error("Please type a question before sending.")]
    EmptyQuestion,

    #[error("Only .json and .txt files can be uploaded: {0}")]
    UnsupportedFile(String),

    #[error("Still waiting for the previous request.")]
    Busy,
}

#[derive(Debug, Clone)]
pub struct ChatState {
    file: Option<PathBuf>,
    question: String,
    history: Vec<ConversationEntry>,
    busy: bool,
}

impl ChatState {
    /// A fresh state whose log holds only the bot greeting.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            file: None,
            question: String::new(),
            history: vec![ConversationEntry::bot(BotContent::text(greeting))],
            busy: false,
        }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn history(&self) -> &[ConversationEntry] {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the upload action is currently available.
    pub fn can_upload(&self) -> bool {
        !self.busy && self.file.is_some()
    }

    /// Whether the send action is currently available.
    pub fn can_send(&self) -> bool {
        !self.busy && !self.question.trim().is_empty()
    }

    pub fn choose_file(&mut self, path: impl Into<PathBuf>) -> Result<(), StateError> {
        let path = path.into();
        let accepted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            });
        if !accepted {
            return Err(StateError::UnsupportedFile(path.display().to_string()));
        }
        self.file = Some(path);
        Ok(())
    }

    pub fn set_question(&mut self, text: impl Into<String>) {
        self.question = text.into();
    }

    /// Mark an upload as in flight and return the file to send.
    pub fn begin_upload(&mut self) -> Result<PathBuf, StateError> {
        let file = self.file.clone().ok_or(StateError::NoFile)?;
        if self.busy {
            return Err(StateError::Busy);
        }
        self.busy = true;
        Ok(file)
    }

    pub fn finish_upload(&mut self) {
        self.busy = false;
    }

    /// Append the user's question to the log and return it for sending.
    ///
    /// The entry is in the log before the request is issued, whatever the
    /// outcome of that request.
    pub fn begin_send(&mut self) -> Result<String, StateError> {
        if self.question.trim().is_empty() {
            return Err(StateError::EmptyQuestion);
        }
        if self.busy {
            return Err(StateError::Busy);
        }
        let query = std::mem::take(&mut self.question);
        self.history.push(ConversationEntry::user(query.clone()));
        self.busy = true;
        Ok(query)
    }

    /// Classify a response body and append it as a bot entry.
    pub fn receive_response(&mut self, raw: &str) -> &ConversationEntry {
        self.busy = false;
        self.history.push(ConversationEntry::bot(classify(raw)));
        &self.history[self.history.len() - 1]
    }

    /// A request failed. The log is left as it is.
    pub fn fail(&mut self) {
        self.busy = false;
    }
}

/// A one-shot message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The server's upload message, verbatim.
    Uploaded(String),
    UploadFailed,
    ChatFailed,
    Refused(StateError),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded(message) => f.write_str(message),
            Self::UploadFailed => f.write_str("Failed to upload file."),
            Self::ChatFailed => f.write_str("Failed to get chatbot response."),
            Self::Refused(e) => write!(f, "{}", e),
        }
    }
}

impl From<StateError> for Notice {
    fn from(e: StateError) -> Self {
        Self::Refused(e)
    }
}

/// A chat session bound to a backend.
pub struct Chat<B> {
    backend: B,
    state: ChatState,
}

impl<B: ChatBackend> Chat<B> {
    pub fn new(backend: B, greeting: impl Into<String>) -> Self {
        Self {
            backend,
            state: ChatState::new(greeting),
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ChatState {
        &mut self.state
    }

    /// Upload the chosen file.
    ///
    /// Always yields a notice: the server's message, or why it failed.
    pub async fn upload(&mut self) -> Notice {
        let path = match self.state.begin_upload() {
            Ok(path) => path,
            Err(e) => return e.into(),
        };

        let result = self.backend.upload(&path).await;
        self.state.finish_upload();

        match result {
            Ok(message) => {
                tracing::info!("Uploaded {}", path.display());
                Notice::Uploaded(message)
            }
            Err(e) => {
                tracing::error!("Error uploading file: {}", e);
                Notice::UploadFailed
            }
        }
    }

    /// Send the drafted question and append the answer to the log.
    pub async fn send(&mut self) -> Result<&ConversationEntry, Notice> {
        let query = self.state.begin_send()?;

        match self.backend.ask(&query).await {
            Ok(raw) => Ok(self.state.receive_response(&raw)),
            Err(e) => {
                self.state.fail();
                tracing::error!("Error fetching chatbot response: {}", e);
                Err(Notice::ChatFailed)
            }
        }
    }

    /// Draft and send in one step.
    pub async fn ask(&mut self, question: impl Into<String>) -> Result<&ConversationEntry, Notice> {
        self.state.set_question(question);
        self.send().await
    }
}
