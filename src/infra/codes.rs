//! Источник промокодов: текстовый файл, один код на строку.
//!
//! После кода может идти пометка через ` # `, она отбрасывается.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::info;

use crate::domain::normalize_code;

/// Пул промокодов.
pub trait CodePool {
    /// Создать пул, если его ещё нет.
    fn ensure(&mut self) -> io::Result<()>;

    /// Все коды пула в исходном порядке, нормализованные.
    fn codes(&mut self) -> io::Result<Vec<String>>;
}

/// Сгенерировать пул: `prefix` + номер, дополненный нулями до трёх цифр.
pub fn generate_codes(prefix: &str, size: u32) -> Vec<String> {
    (1..=size).map(|i| format!("{prefix}{i:03}")).collect()
}

/// Достать код из строки файла. Пустые строки дают `None`.
pub fn parse_code_line(line: &str) -> Option<String> {
    let line = line.trim();
    let code = line.split(" # ").next().unwrap_or("").trim();
    if code.is_empty() {
        None
    } else {
        Some(normalize_code(code))
    }
}

/// Пул в текстовом файле. Если файла нет — генерируется.
#[derive(Clone, Debug)]
pub struct TextFileCodePool {
    path: PathBuf,
    prefix: String,
    size: u32,
}

impl TextFileCodePool {
    pub fn new(path: impl Into<PathBuf>, prefix: impl Into<String>, size: u32) -> Self {
        Self {
            path: path.into(),
            prefix: prefix.into(),
            size,
        }
    }
}

impl CodePool for TextFileCodePool {
    fn ensure(&mut self) -> io::Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = fs::File::create(&self.path)?;
        for code in generate_codes(&self.prefix, self.size) {
            writeln!(file, "{code}")?;
        }

        info!(path = %self.path.display(), size = self.size, "сгенерирован пул промокодов");
        Ok(())
    }

    fn codes(&mut self) -> io::Result<Vec<String>> {
        self.ensure()?;
        let raw = fs::read_to_string(&self.path)?;
        Ok(raw.lines().filter_map(parse_code_line).collect())
    }
}

/// Пул, заданный списком (тесты, локальный запуск).
#[derive(Clone, Debug, Default)]
pub struct StaticCodePool {
    codes: Vec<String>,
}

impl StaticCodePool {
    pub fn new<I, C>(codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .filter_map(|c| parse_code_line(c.as_ref()))
                .collect(),
        }
    }

    pub fn generated(prefix: &str, size: u32) -> Self {
        Self::new(generate_codes(prefix, size))
    }
}

impl CodePool for StaticCodePool {
    fn ensure(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn codes(&mut self) -> io::Result<Vec<String>> {
        Ok(self.codes.clone())
    }
}
