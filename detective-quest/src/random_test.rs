#[cfg(test)]
mod random_tests {
    use crate::clue_ledger::ClueLedger;
    use crate::controller::Investigation;
    use crate::room_map::{Direction, RoomMap};
    use crate::rules::ClueRules;
    use crate::suspect_tally::SuspectTally;
    use rand::Rng;
    use rand::seq::SliceRandom;
    use std::collections::{BTreeSet, HashMap};

    const SUSPECTS: [&str; 8] = [
        "Mordomo",
        "mordomo",
        "Jardineiro",
        "Bibliotecário",
        "Desconhecido",
        "Cozinheira",
        "Motorista",
        "Governanta",
    ];

    fn random_clue(rng: &mut impl Rng) -> String {
        let len = rng.gen_range(1..=8);
        (0..len)
            .map(|_| match rng.gen_range(0..4) {
                0 => rng.gen_range('A'..='Z'),
                1 => 'ó',
                _ => rng.gen_range('a'..='z'),
            })
            .collect()
    }

    #[test]
    fn test_ledger_order_is_independent_of_insertion_order() {
        let mut rng = rand::thread_rng();

        for run in 0..20 {
            let count = rng.gen_range(0..60);
            let mut clues: Vec<String> = (0..count).map(|_| random_clue(&mut rng)).collect();
            // repeat some clues so duplicates get exercised
            let repeats: Vec<String> = clues.iter().take(10).cloned().collect();
            clues.extend(repeats);

            let distinct: BTreeSet<String> = clues.iter().cloned().collect();
            let expected: Vec<String> = distinct.into_iter().collect();

            let mut first = ClueLedger::new();
            for clue in &clues {
                first.insert(clue);
            }
            clues.shuffle(&mut rng);
            let mut second = ClueLedger::new();
            for clue in &clues {
                second.insert(clue);
            }

            let listed: Vec<&str> = first.iter().collect();
            assert_eq!(listed, expected, "run {run}");
            assert_eq!(second.iter().collect::<Vec<_>>(), listed, "run {run}");
            assert!(listed.windows(2).all(|pair| pair[0] < pair[1]));
            assert_eq!(first.len(), expected.len());
        }
    }

    #[test]
    fn test_reinserting_every_clue_changes_nothing() {
        let mut rng = rand::thread_rng();
        let clues: Vec<String> = (0..40).map(|_| random_clue(&mut rng)).collect();

        let mut ledger = ClueLedger::new();
        for clue in &clues {
            ledger.insert(clue);
        }
        let before: Vec<String> = ledger.iter().map(str::to_string).collect();
        for clue in &clues {
            assert!(!ledger.insert(clue));
        }
        let after: Vec<String> = ledger.iter().map(str::to_string).collect();
        assert_eq!(before, after);
        assert_eq!(ledger.len(), before.len());
    }

    #[test]
    fn test_tally_counts_match_calls() {
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let mut tally = SuspectTally::new();
            let mut expected: HashMap<&str, u32> = HashMap::new();
            for _ in 0..rng.gen_range(0..200) {
                let name = SUSPECTS[rng.gen_range(0..SUSPECTS.len())];
                tally.increment(name);
                *expected.entry(name).or_default() += 1;
            }

            assert_eq!(tally.len(), expected.len());
            assert_eq!(tally.iter().count(), expected.len());
            for (name, count) in &expected {
                assert_eq!(tally.count_of(name), *count, "{name}");
            }

            let best = expected.values().copied().max();
            assert_eq!(tally.most_likely().map(|s| s.clue_count()), best);
        }
    }

    #[test]
    fn test_random_walks_never_collect_a_clue_twice() {
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let mut investigation =
                Investigation::new(RoomMap::mansion().unwrap(), ClueRules::default());
            let mut collected = 0;
            loop {
                if investigation.collect_clue().is_some() {
                    collected += 1;
                }
                assert!(investigation.collect_clue().is_none());

                let direction = if rng.gen_bool(0.5) {
                    Direction::Left
                } else {
                    Direction::Right
                };
                if !investigation.step(direction) && !investigation.step(opposite(direction)) {
                    break;
                }
            }

            let total: u32 = investigation.tally().iter().map(|s| s.clue_count()).sum();
            assert_eq!(total, collected);
            assert_eq!(investigation.ledger().len() as u32, collected);
            assert!(investigation.current_room().is_dead_end());
        }
    }

    fn opposite(direction: Direction) -> Direction {
        match direction {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
