use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Политика доступа к админ-операциям
/// (отбор, сетка, победитель, чистка приглашений, статистика).
pub trait AccessPolicy {
    fn is_admin(&self, user_id: UserId) -> bool;
}

/// Список администраторов из конфигурации.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminList {
    admins: Vec<UserId>,
}

impl AdminList {
    pub fn new(admins: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }

    pub fn single(admin: UserId) -> Self {
        Self::new([admin])
    }

    pub fn admins(&self) -> &[UserId] {
        &self.admins
    }
}

impl AccessPolicy for AdminList {
    fn is_admin(&self, user_id: UserId) -> bool {
        self.admins.contains(&user_id)
    }
}
