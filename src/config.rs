//! Конфигурация из переменных окружения (и `.env`, если он есть).

use std::env;
use std::io;
use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use crate::api::ServiceSettings;
use crate::domain::UserId;
use crate::infra::TeamIdScheme;
use crate::tournament::DEFAULT_SELECTION_SIZE;

pub const ENV_DATA_DIR: &str = "TOURNAMENT_DATA_DIR";
pub const ENV_PROMO_FILE: &str = "TOURNAMENT_PROMO_FILE";
pub const ENV_PROMO_PREFIX: &str = "TOURNAMENT_PROMO_PREFIX";
pub const ENV_PROMO_POOL_SIZE: &str = "TOURNAMENT_PROMO_POOL_SIZE";
pub const ENV_ADMIN_IDS: &str = "TOURNAMENT_ADMIN_IDS";
pub const ENV_SELECTION_SIZE: &str = "TOURNAMENT_SELECTION_SIZE";
pub const ENV_INVITE_TTL_HOURS: &str = "TOURNAMENT_INVITE_TTL_HOURS";
pub const ENV_TEAM_IDS: &str = "TOURNAMENT_TEAM_IDS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("переменная {name} не задана")]
    Missing { name: &'static str },

    #[error("некорректное значение {name}={value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("не удалось открыть {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Настройки приложения.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Каталог с JSON-документами.
    pub data_dir: PathBuf,
    /// Текстовый файл с пулом промокодов.
    pub promo_file: PathBuf,
    pub promo_prefix: String,
    pub promo_pool_size: u32,
    /// Администраторы. Минимум один.
    pub admin_ids: Vec<UserId>,
    pub selection_size: usize,
    /// Срок жизни приглашения.
    pub invite_ttl: Duration,
    pub team_ids: TeamIdScheme,
}

impl AppConfig {
    /// Загрузить `.env` (если есть) и прочитать окружение.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Собрать конфиг из произвольного источника переменных.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = PathBuf::from(lookup(ENV_DATA_DIR).unwrap_or_else(|| "data".into()));
        let promo_file =
            PathBuf::from(lookup(ENV_PROMO_FILE).unwrap_or_else(|| "promocodes.txt".into()));
        let promo_prefix = lookup(ENV_PROMO_PREFIX).unwrap_or_else(|| "TG2024".into());

        let promo_pool_size = parse_or(&lookup, ENV_PROMO_POOL_SIZE, 50u32)?;
        let selection_size = parse_or(&lookup, ENV_SELECTION_SIZE, DEFAULT_SELECTION_SIZE)?;
        let invite_ttl_hours = parse_or(&lookup, ENV_INVITE_TTL_HOURS, 24i64)?;

        if selection_size == 0 {
            return Err(invalid(ENV_SELECTION_SIZE, "0", "нужно хотя бы 1"));
        }
        if invite_ttl_hours <= 0 {
            return Err(invalid(
                ENV_INVITE_TTL_HOURS,
                &invite_ttl_hours.to_string(),
                "срок должен быть положительным",
            ));
        }
        let invite_ttl = Duration::try_hours(invite_ttl_hours).ok_or_else(|| {
            invalid(
                ENV_INVITE_TTL_HOURS,
                &invite_ttl_hours.to_string(),
                "слишком большой срок",
            )
        })?;

        let team_ids = match lookup(ENV_TEAM_IDS) {
            Some(raw) => raw
                .parse::<TeamIdScheme>()
                .map_err(|reason| invalid(ENV_TEAM_IDS, &raw, &reason))?,
            None => TeamIdScheme::default(),
        };

        let admin_raw = lookup(ENV_ADMIN_IDS).ok_or(ConfigError::Missing {
            name: ENV_ADMIN_IDS,
        })?;
        let admin_ids = parse_admin_ids(&admin_raw)?;

        Ok(Self {
            data_dir,
            promo_file,
            promo_prefix,
            promo_pool_size,
            admin_ids,
            selection_size,
            invite_ttl,
            team_ids,
        })
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            selection_size: self.selection_size,
            invite_ttl: self.invite_ttl,
            team_ids: self.team_ids,
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| invalid(name, &raw, &err.to_string())),
    }
}

fn parse_admin_ids(raw: &str) -> Result<Vec<UserId>, ConfigError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<UserId>()
                .map_err(|err| invalid(ENV_ADMIN_IDS, raw, &err.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(invalid(ENV_ADMIN_IDS, raw, "нужен хотя бы один id"));
    }
    Ok(ids)
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_admin_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(ENV_ADMIN_IDS, "42")])).unwrap();

        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.promo_prefix, "TG2024");
        assert_eq!(cfg.promo_pool_size, 50);
        assert_eq!(cfg.selection_size, 5);
        assert_eq!(cfg.invite_ttl, Duration::hours(24));
        assert_eq!(cfg.team_ids, TeamIdScheme::Sequence);
        assert_eq!(cfg.admin_ids, vec![42]);
    }

    #[test]
    fn several_admins_are_parsed() {
        let cfg =
            AppConfig::from_lookup(lookup_from(&[(ENV_ADMIN_IDS, " 1, 2 ,3 ")])).unwrap();
        assert_eq!(cfg.admin_ids, vec![1, 2, 3]);
    }

    #[test]
    fn missing_or_broken_values_are_errors() {
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[])),
            Err(ConfigError::Missing { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[(ENV_ADMIN_IDS, "admin")])),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[
                (ENV_ADMIN_IDS, "1"),
                (ENV_SELECTION_SIZE, "0")
            ])),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[(ENV_ADMIN_IDS, "1"), (ENV_TEAM_IDS, "uuid")])),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[
                (ENV_ADMIN_IDS, "1"),
                (ENV_INVITE_TTL_HOURS, "9223372036854775807")
            ])),
            Err(ConfigError::Invalid { name: ENV_INVITE_TTL_HOURS, .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[(ENV_ADMIN_IDS, "1"), (ENV_INVITE_TTL_HOURS, "0")])),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
