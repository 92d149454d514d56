use forager::{engine::Engine, params::ParameterSet};

fn quick_params(years: u32) -> ParameterSet {
    let mut params = ParameterSet::default();
    params.years = years;
    params
}

#[test]
fn identical_seeds_replay_identical_runs() {
    let params = quick_params(40);

    let mut engine_a = Engine::standard(params.clone());
    let mut world_a = engine_a.new_world();
    engine_a.run(&mut world_a, 40).unwrap();

    let mut engine_b = Engine::standard(params);
    let mut world_b = engine_b.new_world();
    engine_b.run(&mut world_b, 40).unwrap();

    assert_eq!(world_a.series(), world_b.series());
    assert_eq!(world_a.density_trace(), world_b.density_trace());
    assert_eq!(world_a.proportion_trace(), world_b.proportion_trace());
}

#[test]
fn different_seeds_diverge() {
    let mut params = quick_params(40);
    let mut engine_a = Engine::standard(params.clone());
    let mut world_a = engine_a.new_world();
    engine_a.run(&mut world_a, 40).unwrap();

    params.seed = 12345;
    let mut engine_b = Engine::standard(params);
    let mut world_b = engine_b.new_world();
    engine_b.run(&mut world_b, 40).unwrap();

    assert_ne!(world_a.series(), world_b.series());
}

#[test]
fn hook_fires_once_per_completed_year() {
    let params = quick_params(6);
    let mut engine = Engine::standard(params);
    let mut world = engine.new_world();

    let mut years = Vec::new();
    engine
        .run_with_hook(&mut world, 6, |row| years.push(row.year))
        .unwrap();

    assert_eq!(years, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(world.series().len(), 7); // year 0 plus six simulated years
}

#[test]
fn single_year_run_with_defaults() {
    // 50 people, 200 prey, 100 patches: the calibrated starting point.
    let params = quick_params(1);
    let mut engine = Engine::standard(params);
    let mut world = engine.new_world();
    engine.run(&mut world, 1).unwrap();

    assert_eq!(world.series().len(), 2);
    let row = world.last_record();
    assert_eq!(row.year, 1);
    assert!(row.patches_exploited <= 100);
    assert!(row.prey_eaten >= 0.0);
    assert!(row.human_kcal_deficit >= 0.0);
}

#[test]
fn runs_can_be_extended_year_by_year() {
    let params = quick_params(10);
    let mut whole = Engine::standard(params.clone());
    let mut world_whole = whole.new_world();
    whole.run(&mut world_whole, 10).unwrap();

    let mut stepped = Engine::standard(params);
    let mut world_stepped = stepped.new_world();
    for _ in 0..10 {
        stepped.run(&mut world_stepped, 1).unwrap();
    }

    assert_eq!(world_whole.series(), world_stepped.series());
}

#[test]
fn parameter_file_round_trips_through_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("band.yaml");
    std::fs::write(&path, "people: 30\nyears: 5\nseed: 21\n").unwrap();

    let params = ParameterSet::load(&path).unwrap();
    assert_eq!(params.people, 30);
    assert_eq!(params.years, 5);
    assert_eq!(params.seed, 21);
    assert_eq!(params.max_prey, 500); // untouched fields keep defaults
}

#[test]
fn loader_rejects_out_of_domain_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "human_death_rate: 2.0\n").unwrap();

    let err = ParameterSet::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("human_death_rate"));
}
