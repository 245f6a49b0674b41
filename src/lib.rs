//! dash-chat: a terminal client for an estimate chatbot.
//!
//! Questions go to a chat endpoint, context files to an upload endpoint.
//! Answers come back as text or loosely shaped JSON and are classified
//! ([`classify`]) before being rendered ([`render`]).

pub mod classify;
pub mod client;
pub mod config;
pub mod models;
pub mod render;
pub mod session;
