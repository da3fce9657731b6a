//! Внешний API турнирного движка.
//!
//! Здесь описываются:
//! - команды (commands.rs) — всё, что меняет состояние;
//! - запросы (queries.rs) — только чтение;
//! - DTO (dto.rs) — данные, которые оркестратор превращает в текст и кнопки;
//! - ошибки (errors.rs) — то, что видит пользователь;
//! - политика доступа (auth.rs) и уведомления (notify.rs);
//! - фасад `TournamentService` (service.rs), через который всё это исполняется.

pub mod auth;
pub mod commands;
pub mod dto;
pub mod errors;
pub mod notify;
pub mod queries;
pub mod service;

pub use auth::*;
pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use notify::*;
pub use queries::*;
pub use service::*;
