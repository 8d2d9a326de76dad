//! Value updates, exploration schedule and persistence

use tictac_q::{
    Error,
    q_learning::{
        EpsilonConfig, EpsilonSchedule, NUM_ACTIONS, QLearningAgent, QTable,
        serialization::{self, TABLE_BYTES},
    },
    tictactoe::NUM_STATES,
};
use tempfile::tempdir;

#[test]
fn update_shrinks_the_td_error() {
    let mut table = QTable::new();
    table.set(7, 3, 0.4);
    table.set(12, 5, 1.0);

    let (alpha, gamma, reward) = (0.2, 0.9, -0.1);
    let before = table.td_error(3, 4, reward, 7, gamma).abs();
    for _ in 0..10 {
        let error = table.td_error(3, 4, reward, 7, gamma).abs();
        table.q_learning_update(3, 4, reward, 7, alpha, gamma);
        let after = table.td_error(3, 4, reward, 7, gamma).abs();
        assert!(after < error || error == 0.0);
    }
    assert!(table.td_error(3, 4, reward, 7, gamma).abs() < before);
}

#[test]
fn repeated_terminal_updates_converge_to_the_reward() {
    // The terminal row stays at zero, so Q(s,a) converges to r.
    let mut agent = QLearningAgent::greedy(QTable::new());
    for _ in 0..200 {
        agent.update(100, 2, 2.0, 101, 0.2, 0.9);
    }
    assert!((agent.q_table().get(100, 2) - 2.0).abs() < 1e-9);
    assert!(agent.q_table().row(101).iter().all(|&v| v == 0.0));
}

#[test]
fn greedy_ties_break_to_the_lowest_action() {
    let mut agent = QLearningAgent::greedy(QTable::new()).with_seed(1);
    for state in [0, 1, 500, NUM_STATES - 1] {
        assert_eq!(agent.select_action(state, 0.0), 0);
    }

    agent.q_table_mut().set(42, 6, 0.5);
    agent.q_table_mut().set(42, 2, 0.5);
    assert_eq!(agent.select_action(42, 0.0), 2);
}

#[test]
fn full_exploration_reaches_every_action() {
    let mut agent = QLearningAgent::greedy(QTable::new()).with_seed(11);
    let mut seen = [false; NUM_ACTIONS];
    for _ in 0..500 {
        seen[agent.select_action(0, 1.0)] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn epsilon_never_increases_and_stops_at_the_floor() {
    let mut schedule = EpsilonSchedule::new(EpsilonConfig {
        initial: 1.0,
        final_value: 0.1,
        decay_episodes: 1_000,
    });
    let mut previous = schedule.current();
    for _ in 0..2_500 {
        schedule.decay();
        assert!(schedule.current() <= previous);
        assert!(schedule.current() >= 0.1);
        previous = schedule.current();
    }
    assert_eq!(schedule.current(), 0.1);
}

#[test]
fn seeded_agents_explore_identically() {
    let config = EpsilonConfig::default();
    let mut a = QLearningAgent::new(QTable::new(), config).with_seed(99);
    let mut b = QLearningAgent::new(QTable::new(), config).with_seed(99);
    let picks_a: Vec<usize> = (0..50).map(|_| a.select_action(0, 0.5)).collect();
    let picks_b: Vec<usize> = (0..50).map(|_| b.select_action(0, 0.5)).collect();
    assert_eq!(picks_a, picks_b);
}

#[test]
fn save_then_load_is_bit_exact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("q_table.bin");

    let mut table = QTable::new();
    table.set(0, 0, 1.0);
    table.set(1, 8, -0.1);
    table.set(9_841, 4, f64::MIN_POSITIVE);
    table.set(NUM_STATES - 1, 8, 1.0 / 3.0);
    serialization::save(&table, &path).unwrap();

    assert_eq!(std::fs::metadata(&path).unwrap().len(), TABLE_BYTES);
    let loaded = serialization::load(&path).unwrap();
    let bits = |t: &QTable| t.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&loaded), bits(&table));
}

#[test]
fn missing_file_loads_as_zeros() {
    let dir = tempdir().unwrap();
    let table = serialization::load(dir.path().join("nope.bin")).unwrap();
    assert_eq!(table.values().len(), NUM_STATES * NUM_ACTIONS);
    assert!(table.values().iter().all(|&v| v == 0.0));
}

#[test]
fn wrong_sized_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.bin");
    std::fs::write(&path, [0u8; 64]).unwrap();
    match serialization::load(&path) {
        Err(Error::TableSizeMismatch { expected, actual, .. }) => {
            assert_eq!(expected, TABLE_BYTES);
            assert_eq!(actual, 64);
        }
        other => panic!("expected size mismatch, got {other:?}"),
    }
}
