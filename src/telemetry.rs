use tracing_subscriber::EnvFilter;

/// Переменная окружения с фильтром логов (`info`, `tournament_engine=debug`, …).
pub const LOG_ENV: &str = "TOURNAMENT_LOG";

/// Поднять tracing-подписчика. Повторный вызов ничего не делает.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
