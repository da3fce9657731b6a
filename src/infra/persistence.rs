use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Документ: JSON-объект верхнего уровня, ключ -> запись.
///
/// Порядок ключей = порядок вставки (как в файле).
pub type Document = IndexMap<String, Value>;

/// Логические коллекции. Один документ = одна коллекция.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentName {
    Teams,
    SoloProfiles,
    SelectedTeams,
    Bracket,
    Winner,
    ActivatedPlayers,
    UsedPromoCodes,
    PendingInvites,
    /// Счётчики id (последовательность команд).
    Counters,
}

impl DocumentName {
    pub const ALL: [DocumentName; 9] = [
        DocumentName::Teams,
        DocumentName::SoloProfiles,
        DocumentName::SelectedTeams,
        DocumentName::Bracket,
        DocumentName::Winner,
        DocumentName::ActivatedPlayers,
        DocumentName::UsedPromoCodes,
        DocumentName::PendingInvites,
        DocumentName::Counters,
    ];

    /// Имя документа на диске (без `.json`).
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentName::Teams => "teams",
            DocumentName::SoloProfiles => "solo_profiles",
            DocumentName::SelectedTeams => "selected_teams",
            DocumentName::Bracket => "bracket",
            DocumentName::Winner => "winner",
            DocumentName::ActivatedPlayers => "activated_players",
            DocumentName::UsedPromoCodes => "used_promo_codes",
            DocumentName::PendingInvites => "pending_invites",
            DocumentName::Counters => "counters",
        }
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ошибки хранилища документов.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ошибка ввода-вывода для документа {name}: {source}")]
    Io {
        name: DocumentName,
        #[source]
        source: io::Error,
    },

    #[error("документ {name} не является JSON-объектом: {source}")]
    Json {
        name: DocumentName,
        #[source]
        source: serde_json::Error,
    },
}

/// Абстракция хранилища документов.
///
/// Реализация обязана уметь только `read`/`write` целого документа.
/// Никаких блокировок и транзакций: каждая запись — полная перезапись,
/// read-modify-write делает вызывающая сторона.
pub trait DocumentStore {
    /// Прочитать документ. `Ok(None)` — документа ещё нет.
    fn read(&self, name: DocumentName) -> Result<Option<Document>, StoreError>;

    /// Перезаписать документ целиком.
    fn write(&mut self, name: DocumentName, doc: &Document) -> Result<(), StoreError>;

    /// Загрузить документ. При отсутствии или любой ошибке — пустой документ
    /// (ошибка пишется в лог).
    fn load(&self, name: DocumentName) -> Document {
        match self.read(name) {
            Ok(Some(doc)) => doc,
            Ok(None) => Document::new(),
            Err(err) => {
                error!(document = %name, error = %err, "не удалось загрузить документ");
                Document::new()
            }
        }
    }

    /// Сохранить документ. `false` — запись не удалась (ошибка в логе).
    fn save(&mut self, name: DocumentName, doc: &Document) -> bool {
        match self.write(name, doc) {
            Ok(()) => true,
            Err(err) => {
                error!(document = %name, error = %err, "не удалось сохранить документ");
                false
            }
        }
    }

    /// Загрузить коллекцию типизированных записей.
    ///
    /// Битые записи пропускаются с предупреждением, остальные возвращаются
    /// в порядке документа.
    fn load_records<T>(&self, name: DocumentName) -> IndexMap<String, T>
    where
        T: DeserializeOwned,
        Self: Sized,
    {
        decode_records(name, self.load(name))
    }

    /// Загрузить документ, который целиком является одной записью (`winner`).
    fn load_single<T>(&self, name: DocumentName) -> Option<T>
    where
        T: DeserializeOwned,
        Self: Sized,
    {
        let doc = self.load(name);
        if doc.is_empty() {
            return None;
        }

        let value = Value::Object(doc.into_iter().collect());
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(document = %name, error = %err, "документ не разобран как запись");
                None
            }
        }
    }
}

/// Разобрать записи документа, пропуская некорректные.
pub fn decode_records<T: DeserializeOwned>(name: DocumentName, doc: Document) -> IndexMap<String, T> {
    let mut records = IndexMap::with_capacity(doc.len());

    for (key, value) in doc {
        match serde_json::from_value::<T>(value) {
            Ok(record) => {
                records.insert(key, record);
            }
            Err(err) => {
                warn!(document = %name, key = %key, error = %err, "пропущена некорректная запись");
            }
        }
    }

    records
}

/// Хранилище: один pretty-printed JSON-файл на документ в каталоге `dir`.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Открыть хранилище, создав каталог при необходимости.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: DocumentName) -> PathBuf {
        self.dir.join(format!("{}.json", name.as_str()))
    }
}

impl DocumentStore for JsonFileStore {
    fn read(&self, name: DocumentName) -> Result<Option<Document>, StoreError> {
        let path = self.path_of(name);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { name, source }),
        };

        let doc = serde_json::from_str::<Document>(&raw)
            .map_err(|source| StoreError::Json { name, source })?;

        Ok(Some(doc))
    }

    fn write(&mut self, name: DocumentName, doc: &Document) -> Result<(), StoreError> {
        let path = self.path_of(name);
        let tmp = path.with_extension("json.tmp");

        let body =
            serde_json::to_string_pretty(doc).map_err(|source| StoreError::Json { name, source })?;

        // Пишем во временный файл и переименовываем, чтобы читатель
        // никогда не увидел половину документа.
        fs::write(&tmp, body).map_err(|source| StoreError::Io { name, source })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { name, source })?;

        debug!(document = %name, entries = doc.len(), "документ сохранён");
        Ok(())
    }
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    docs: HashMap<DocumentName, Document>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn read(&self, name: DocumentName) -> Result<Option<Document>, StoreError> {
        Ok(self.docs.get(&name).cloned())
    }

    fn write(&mut self, name: DocumentName, doc: &Document) -> Result<(), StoreError> {
        self.docs.insert(name, doc.clone());
        Ok(())
    }
}
