// src/tournament/selection.rs

use crate::domain::TeamId;
use crate::engine::RandomSource;

/// Размер отбора по умолчанию.
pub const DEFAULT_SELECTION_SIZE: usize = 5;

/// Отобрать `target` команд из `candidates`.
///
/// Если кандидатов не больше `target`, берём всех в исходном порядке.
/// Иначе — равномерная перетасовка и первые `target`.
/// MMR и полнота команды не учитываются.
pub fn pick_teams<R: RandomSource>(
    mut candidates: Vec<TeamId>,
    target: usize,
    rng: &mut R,
) -> Vec<TeamId> {
    if candidates.len() <= target {
        return candidates;
    }

    rng.shuffle(&mut candidates);
    candidates.truncate(target);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::DeterministicRng;

    fn ids(n: usize) -> Vec<TeamId> {
        (1..=n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn small_field_is_taken_whole_in_order() {
        let mut rng = DeterministicRng::from_seed(1);
        assert_eq!(pick_teams(ids(4), 5, &mut rng), ids(4));
        assert_eq!(pick_teams(ids(5), 5, &mut rng), ids(5));
    }

    #[test]
    fn large_field_is_cut_to_target_without_duplicates() {
        let mut rng = DeterministicRng::from_seed(7);
        let mut picked = pick_teams(ids(12), 5, &mut rng);
        assert_eq!(picked.len(), 5);

        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), 5);
        assert!(picked.iter().all(|id| ids(12).contains(id)));
    }
}
