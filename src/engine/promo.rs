// src/engine/promo.rs

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::domain::{normalize_code, CodeStatus};
use crate::engine::errors::EngineError;
use crate::infra::{CodePool, DocumentName, DocumentStore};

/// Реестр промокодов.
///
/// Пул кодов живёт в отдельном текстовом файле (`CodePool`),
/// погашенные коды — в документе `used_promo_codes` (`код -> true`).
pub struct PromoRegistry<'a, S: DocumentStore> {
    store: &'a mut S,
    pool: &'a mut dyn CodePool,
}

impl<'a, S: DocumentStore> PromoRegistry<'a, S> {
    pub fn new(store: &'a mut S, pool: &'a mut dyn CodePool) -> Self {
        Self { store, pool }
    }

    /// Создать пул кодов, если его ещё нет.
    pub fn ensure_pool(&mut self) -> Result<(), EngineError> {
        self.pool.ensure()?;
        Ok(())
    }

    /// Весь пул: код -> погашен ли.
    ///
    /// Если пул прочитать не удалось, считаем его пустым (ошибка в логе).
    pub fn codes(&mut self) -> IndexMap<String, bool> {
        let pool = match self.pool.codes() {
            Ok(pool) => pool,
            Err(err) => {
                error!(error = %err, "не удалось прочитать пул промокодов");
                return IndexMap::new();
            }
        };

        let used = self.store.load(DocumentName::UsedPromoCodes);

        pool.into_iter()
            .map(|code| {
                let redeemed = used.contains_key(&code);
                (code, redeemed)
            })
            .collect()
    }

    /// Проверить код (ввод нормализуется).
    pub fn check(&mut self, code: &str) -> CodeStatus {
        let code = normalize_code(code);
        match self.codes().get(&code) {
            None => CodeStatus::NotFound,
            Some(true) => CodeStatus::Used,
            Some(false) => CodeStatus::Valid,
        }
    }

    /// Погасить код.
    ///
    /// `Ok(false)` — кода нет в пуле или он уже погашен.
    /// Ошибка — только если не удалось записать `used_promo_codes`.
    pub fn redeem(&mut self, code: &str) -> Result<bool, EngineError> {
        let code = normalize_code(code);

        if self.codes().get(&code) != Some(&false) {
            return Ok(false);
        }

        let mut used = self.store.load(DocumentName::UsedPromoCodes);
        used.insert(code.clone(), Value::Bool(true));

        if !self.store.save(DocumentName::UsedPromoCodes, &used) {
            return Err(EngineError::Storage(DocumentName::UsedPromoCodes));
        }

        info!(code = %code, "промокод погашен");
        Ok(true)
    }

    /// Вернуть погашенный код в пул.
    ///
    /// Используется, когда после погашения не удалось записать активацию.
    /// `Ok(false)` — код и не был погашен.
    pub fn release(&mut self, code: &str) -> Result<bool, EngineError> {
        let code = normalize_code(code);

        let mut used = self.store.load(DocumentName::UsedPromoCodes);
        if used.shift_remove(&code).is_none() {
            return Ok(false);
        }

        if !self.store.save(DocumentName::UsedPromoCodes, &used) {
            return Err(EngineError::Storage(DocumentName::UsedPromoCodes));
        }

        warn!(code = %code, "промокод возвращён в пул");
        Ok(true)
    }
}
