//! # korthai
//!
//! Webhook relay that translates chat messages between Korean and Thai with
//! an LLM and answers in the same chat.
//!
//! | Module        | Role                                                    |
//! |---------------|---------------------------------------------------------|
//! | [`config`]    | `settings.toml` + environment overrides                 |
//! | [`lang`]      | script detection and translation direction              |
//! | [`llm`]       | prompts, completion retry/fallback, answer parsing      |
//! | [`postprocess`] | name, script, laughter and politeness rules           |
//! | [`reply`]     | reply segments and the messaging API client             |
//! | [`pipeline`]  | per-event orchestration                                 |
//! | [`server`]    | axum router (`/webhook`, `/health`)                     |

pub mod config;
pub mod lang;
pub mod llm;
pub mod pipeline;
pub mod postprocess;
pub mod reply;
pub mod server;
