use crozier_lib::runner;

mod common;
use common::PopulationBuilder;

#[test]
fn test_same_seed_reproduces_the_run() {
    let config = PopulationBuilder::new().config().clone();
    let (first, first_rec) = runner::run_in_memory(&config, 12345).unwrap();
    let (second, second_rec) = runner::run_in_memory(&config, 12345).unwrap();

    assert_eq!(first, second, "summaries should match");
    assert_eq!(first_rec.snapshots, second_rec.snapshots);
    assert_eq!(first_rec.events, second_rec.events);
    assert_eq!(first_rec.final_state, second_rec.final_state);
}

#[test]
fn test_different_seeds_diverge() {
    let config = PopulationBuilder::new().config().clone();
    let (_, a) = runner::run_in_memory(&config, 1).unwrap();
    let (_, b) = runner::run_in_memory(&config, 2).unwrap();
    assert_ne!(a.final_state, b.final_state);
}

#[test]
fn test_step_by_step_matches_simulate() {
    use crozier_lib::model::population::StepOutcome;
    use crozier_lib::model::recorder::MemoryRecorder;

    let mut stepped = PopulationBuilder::new().with_seed(77).build();
    let mut recorder = MemoryRecorder::default();
    while let StepOutcome::Continue = stepped.step(&mut recorder).unwrap() {}

    let mut whole = PopulationBuilder::new().with_seed(77).build();
    whole.simulate(&mut MemoryRecorder::default()).unwrap();

    assert_eq!(stepped.time(), whole.time());
    assert_eq!(stepped.counters(), whole.counters());
    assert_eq!(stepped.global_stock(), whole.global_stock());
}
