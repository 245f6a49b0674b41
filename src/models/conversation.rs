use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BotContent, TableRow};

/// Who wrote a conversation entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    /// Short label shown in place of an avatar image.
    pub fn avatar(&self) -> &'static str {
        match self {
            Self::User => "U",
            Self::Bot => "AI",
        }
    }
}

/// A message in the conversation log.
///
/// Entries are immutable once appended. The log only ever grows, and its
/// insertion order is the only ordering there is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: Uuid,
    pub role: Role,
    pub content: BotContent,
    /// Optional sub-feature estimates rendered after the content.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub table_data: Vec<TableRow>,
    /// Optional contact line rendered last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ConversationEntry {
    fn new(role: Role, content: BotContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            table_data: Vec::new(),
            contact_details: None,
            created_at: Utc::now(),
        }
    }

    /// A message typed by the user. Always plain text.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, BotContent::text(text))
    }

    pub fn bot(content: BotContent) -> Self {
        Self::new(Role::Bot, content)
    }

    /// Attach sub-feature rows.
    pub fn with_table_data(mut self, rows: Vec<TableRow>) -> Self {
        self.table_data = rows;
        self
    }

    pub fn with_contact_details(mut self, details: impl Into<String>) -> Self {
        self.contact_details = Some(details.into());
        self
    }
}
