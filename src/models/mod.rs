//! Domain models for dash-chat.
//!
//! # Core Concepts
//!
//! - [`ConversationEntry`]: One message in the append-only conversation log,
//!   spoken either by the user or by the bot.
//! - [`BotContent`]: What the classifier made of a response body: plain text,
//!   a single hours table, or one hours table per feature.
//! - [`TableRow`]: A sub-feature estimate row that can be attached to an entry
//!   and is rendered as its own table.

mod content;
mod conversation;

pub use content::*;
pub use conversation::*;
