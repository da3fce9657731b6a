use crate::engine::errors::EngineError;

pub const TEAM_NAME_MIN_CHARS: usize = 2;
pub const TEAM_NAME_MAX_CHARS: usize = 30;

pub const MMR_MIN: u32 = 0;
pub const MMR_MAX: u32 = 50_000;

/// Проверить название команды. Возвращает обрезанное название.
///
/// Длина считается в символах, а не в байтах (кириллица).
pub fn validate_team_name(raw: &str) -> Result<String, EngineError> {
    let name = raw.trim();
    let len = name.chars().count();

    if !(TEAM_NAME_MIN_CHARS..=TEAM_NAME_MAX_CHARS).contains(&len) {
        return Err(EngineError::InvalidTeamName {
            min: TEAM_NAME_MIN_CHARS,
            max: TEAM_NAME_MAX_CHARS,
        });
    }

    Ok(name.to_string())
}

/// Проверить диапазон MMR.
pub fn validate_mmr(value: i64) -> Result<u32, EngineError> {
    if value < MMR_MIN as i64 || value > MMR_MAX as i64 {
        return Err(EngineError::MmrOutOfRange {
            value,
            min: MMR_MIN,
            max: MMR_MAX,
        });
    }
    Ok(value as u32)
}

/// Разобрать MMR из текста сообщения.
pub fn parse_mmr(raw: &str) -> Result<u32, EngineError> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| EngineError::MmrNotANumber(raw.trim().to_string()))?;

    validate_mmr(value)
}
