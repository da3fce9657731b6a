//! Движок регистрации: промокоды, команды, анкеты, активации.
//!
//! Основные объекты:
//!   - `PromoRegistry` – пул промокодов и их погашение
//!   - `RosterEngine` – команды, анкеты соло-игроков, активации, приглашения
//!
//! Оба объекта — короткоживущие «взгляды» поверх хранилища документов:
//! создаются на одну операцию и держат `&mut` на хранилище, поэтому
//! read-modify-write внутри процесса не перемежаются.

pub mod errors;
pub mod promo;
pub mod roster;
pub mod validation;

pub use errors::EngineError;
pub use promo::PromoRegistry;
pub use roster::RosterEngine;
pub use validation::{parse_mmr, validate_mmr, validate_team_name};

/// RNG интерфейс для движка.
/// Реализации — в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
