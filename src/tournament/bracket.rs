// src/tournament/bracket.rs

use indexmap::IndexMap;

use crate::domain::{Bracket, Match, MatchId, TeamId};
use crate::engine::RandomSource;
use crate::infra::Document;

/// Минимум команд для сетки.
pub const MIN_BRACKET_TEAMS: usize = 2;

/// Единственный круг, который строит движок.
pub const FIRST_ROUND: u32 = 1;

/// Перетасовать команды и разбить на пары (0–1, 2–3, …).
///
/// Нечётная команда остаётся без матча (в `unpaired`), без bye-логики.
/// Меньше двух команд — `None`.
pub fn pair_teams<R: RandomSource>(mut teams: Vec<TeamId>, rng: &mut R) -> Option<Bracket> {
    if teams.len() < MIN_BRACKET_TEAMS {
        return None;
    }

    rng.shuffle(&mut teams);

    let unpaired = if teams.len() % 2 == 1 {
        teams.pop()
    } else {
        None
    };

    let matches = teams
        .chunks_exact(2)
        .enumerate()
        .map(|(idx, pair)| Match {
            match_id: idx as MatchId + 1,
            team1: pair[0].clone(),
            team2: pair[1].clone(),
            winner: None,
            round: FIRST_ROUND,
        })
        .collect();

    Some(Bracket { matches, unpaired })
}

/// Сетка -> документ `bracket` (`"1" -> матч`).
pub fn bracket_to_document(bracket: &Bracket) -> Result<Document, serde_json::Error> {
    bracket
        .matches
        .iter()
        .map(|m| serde_json::to_value(m).map(|value| (m.match_id.to_string(), value)))
        .collect()
}

/// Документ `bracket` -> сетка. Матчи упорядочены по id.
pub fn bracket_from_records(records: IndexMap<String, Match>) -> Bracket {
    let mut matches: Vec<Match> = records.into_values().collect();
    matches.sort_by_key(|m| m.match_id);

    Bracket {
        matches,
        unpaired: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::DeterministicRng;

    fn ids(n: usize) -> Vec<TeamId> {
        (1..=n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn fewer_than_two_teams_gives_no_bracket() {
        let mut rng = DeterministicRng::from_seed(3);
        assert!(pair_teams(Vec::new(), &mut rng).is_none());
        assert!(pair_teams(ids(1), &mut rng).is_none());
    }

    #[test]
    fn odd_team_is_left_out() {
        let mut rng = DeterministicRng::from_seed(3);
        let bracket = pair_teams(ids(5), &mut rng).unwrap();

        assert_eq!(bracket.len(), 2);
        assert!(bracket.unpaired.is_some());

        let ids_in_matches: Vec<u32> = bracket.matches.iter().map(|m| m.match_id).collect();
        assert_eq!(ids_in_matches, vec![1, 2]);
        assert!(bracket.matches.iter().all(|m| m.round == 1 && m.winner.is_none()));
    }

    #[test]
    fn document_keys_are_match_ids() {
        let mut rng = DeterministicRng::from_seed(9);
        let bracket = pair_teams(ids(4), &mut rng).unwrap();
        let doc = bracket_to_document(&bracket).unwrap();

        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1", "2"]);
    }
}
