//! Доменная модель турнира: команды, анкеты, промокоды, сетка, победитель.

pub mod bracket;
pub mod invite;
pub mod player;
pub mod promo;
pub mod team;
pub mod time;

// Базовые идентификаторы.
//
// UserId — числовой id пользователя в мессенджере (chat id),
// TeamId — десятичная строка, ключ записи в документе `teams`.
pub type UserId = i64;
pub type TeamId = String;
pub type MatchId = u32;

pub use bracket::*;
pub use invite::*;
pub use player::*;
pub use promo::*;
pub use team::*;
