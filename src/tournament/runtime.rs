// src/tournament/runtime.rs

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::time::format_iso_seconds;
use crate::domain::{Bracket, Match, Team, TeamId, TeamListing, Winner};
use crate::engine::{EngineError, RandomSource};
use crate::infra::{Clock, Document, DocumentName, DocumentStore};

use super::bracket::{bracket_from_records, bracket_to_document, pair_teams, MIN_BRACKET_TEAMS};
use super::selection::pick_teams;

/// Турнирный движок:
/// - отбирает команды из зарегистрированных (`selected_teams`);
/// - строит сетку первого круга (`bracket`);
/// - фиксирует победителя (`winner`).
///
/// Каждый снапшот перезаписывается целиком.
pub struct TournamentEngine<'a, S: DocumentStore, R: RandomSource> {
    store: &'a mut S,
    rng: &'a mut R,
    clock: &'a dyn Clock,
}

impl<'a, S: DocumentStore, R: RandomSource> TournamentEngine<'a, S, R> {
    pub fn new(store: &'a mut S, rng: &'a mut R, clock: &'a dyn Clock) -> Self {
        Self { store, rng, clock }
    }

    /// Отобрать до `target` команд и сохранить снапшот отбора.
    ///
    /// Повторный вызов даёт новый случайный отбор.
    /// Если команд нет вовсе, прежний снапшот не трогаем.
    pub fn select_teams(&mut self, target: usize) -> Result<Vec<TeamId>, EngineError> {
        let teams = self.store.load(DocumentName::Teams);
        if teams.is_empty() {
            warn!("отбор: нет зарегистрированных команд");
            return Ok(Vec::new());
        }

        let candidates: Vec<TeamId> = teams.keys().cloned().collect();
        let selected = pick_teams(candidates, target, &mut *self.rng);

        // Порядок снапшота = порядок отбора.
        let snapshot: Document = selected
            .iter()
            .filter_map(|id| teams.get(id).map(|team| (id.clone(), team.clone())))
            .collect();

        if !self.store.save(DocumentName::SelectedTeams, &snapshot) {
            return Err(EngineError::Storage(DocumentName::SelectedTeams));
        }

        info!(
            registered = teams.len(),
            selected = selected.len(),
            "команды отобраны на турнир"
        );
        Ok(selected)
    }

    /// Текущий отбор.
    pub fn selected_teams(&self) -> Vec<TeamListing> {
        self.store
            .load_records::<Team>(DocumentName::SelectedTeams)
            .into_iter()
            .map(|(id, team)| TeamListing::new(id, team))
            .collect()
    }

    /// Построить сетку по текущему отбору и сохранить её.
    pub fn build_bracket(&mut self) -> Result<Bracket, EngineError> {
        let selected: Vec<TeamId> = self
            .store
            .load(DocumentName::SelectedTeams)
            .keys()
            .cloned()
            .collect();
        let selected_count = selected.len();

        let bracket =
            pair_teams(selected, &mut *self.rng).ok_or(EngineError::NotEnoughTeams {
                required: MIN_BRACKET_TEAMS,
                selected: selected_count,
            })?;

        let doc = bracket_to_document(&bracket)?;
        if !self.store.save(DocumentName::Bracket, &doc) {
            return Err(EngineError::Storage(DocumentName::Bracket));
        }

        info!(
            matches = bracket.len(),
            unpaired = ?bracket.unpaired,
            "турнирная сетка сгенерирована"
        );
        Ok(bracket)
    }

    /// Сохранённая сетка (пустая, если её ещё нет).
    pub fn bracket(&self) -> Bracket {
        bracket_from_records(self.store.load_records::<Match>(DocumentName::Bracket))
    }

    /// Записать победителя. Принадлежность команды к сетке не проверяется.
    pub fn record_winner(&mut self, team_id: &str) -> Result<Winner, EngineError> {
        let winner = Winner {
            team_id: team_id.to_string(),
            date: self.clock.now(),
            fans_rewarded: false,
        };

        let mut doc = Document::new();
        doc.insert("team_id".into(), Value::from(winner.team_id.clone()));
        doc.insert("date".into(), Value::from(format_iso_seconds(&winner.date)));
        doc.insert("fans_rewarded".into(), Value::Bool(winner.fans_rewarded));

        if !self.store.save(DocumentName::Winner, &doc) {
            return Err(EngineError::Storage(DocumentName::Winner));
        }

        info!(team_id = %winner.team_id, date = %winner.date, "победитель записан");
        Ok(winner)
    }

    pub fn winner(&self) -> Option<Winner> {
        self.store.load_single(DocumentName::Winner)
    }
}
