//! Инфраструктурный слой вокруг движка:
//! - хранилище документов (JSON-файлы / память);
//! - пул промокодов;
//! - RNG и часы;
//! - выдача id команд.

pub mod clock;
pub mod codes;
pub mod ids;
pub mod persistence;
pub mod rng;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codes::{CodePool, StaticCodePool, TextFileCodePool};
pub use ids::{TeamIdAllocator, TeamIdScheme};
pub use persistence::{Document, DocumentName, DocumentStore, InMemoryDocumentStore, JsonFileStore, StoreError};
pub use rng::{DeterministicRng, SystemRng};
