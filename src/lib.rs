//! Движок регистрации и проведения турнира 2×2.
//!
//! Слои:
//! - `domain` — команды, анкеты, промокоды, сетка, победитель;
//! - `infra` — хранилище JSON-документов, пул кодов, RNG, часы, id команд;
//! - `engine` — промокоды и ростер поверх хранилища;
//! - `tournament` — отбор команд, сетка, победитель;
//! - `api` — фасад `TournamentService`, команды/запросы/DTO, права, уведомления;
//! - `dialogue` — машина состояний диалога регистрации;
//! - `config`, `telemetry` — окружение и логи.
//!
//! Транспорт (бот, кнопки, тексты) сюда не входит: оркестратор вызывает
//! фасад и сам рисует ответы.

pub mod api;
pub mod config;
pub mod dialogue;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod telemetry;
pub mod tournament;

pub use api::{Actor, ApiError, TournamentService};
pub use config::AppConfig;
pub use dialogue::{DialogueInput, DialogueState, Reply, Session};
