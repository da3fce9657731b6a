//! Граница с мессенджером: уведомления капитанам.
//!
//! Движок не рендерит текст, он отдаёт `Notification` как данные,
//! шлюз сам решает, как её показать.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{TeamId, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Notification {
    /// Команда прошла отбор на турнир.
    TeamSelected { team_id: TeamId, team_name: String },

    /// Команда победила.
    TournamentWon {
        team_id: TeamId,
        team_name: String,
        player1: String,
        player2: Option<String>,
    },
}

#[derive(Debug, Error)]
#[error("не удалось уведомить пользователя {recipient}: {reason}")]
pub struct NotifyError {
    pub recipient: UserId,
    pub reason: String,
}

pub trait Notifier {
    fn notify(&mut self, recipient: UserId, notification: &Notification) -> Result<(), NotifyError>;
}

/// Уведомитель, который только пишет в лог (CLI, локальный запуск).
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, recipient: UserId, notification: &Notification) -> Result<(), NotifyError> {
        info!(recipient, ?notification, "уведомление");
        Ok(())
    }
}

/// Итог рассылки.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: Vec<UserId>,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed.len()
    }
}

/// Разослать уведомления. Ошибка одному получателю не прерывает рассылку.
pub fn deliver_all<N>(notifier: &mut N, batch: Vec<(UserId, Notification)>) -> DeliveryReport
where
    N: Notifier + ?Sized,
{
    let mut report = DeliveryReport::default();

    for (recipient, notification) in batch {
        match notifier.notify(recipient, &notification) {
            Ok(()) => report.delivered += 1,
            Err(err) => {
                warn!(recipient, error = %err, "уведомление не доставлено");
                report.failed.push(recipient);
            }
        }
    }

    report
}
