use crozier_lib::model::config::{AppConfig, FoodModel, KillMode, RecognitionModel, ReproMode};

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = AppConfig::from_toml(
        r#"
        [colony]
        colony_count = 50

        [recognition]
        model = "uabsentind"
        tolerance = "logistic"

        [demography]
        kill_mode = "sorted"
        repro_mode = "control"

        [food]
        model = "tick"

        [run]
        mean_action_time = 2.0
        seed = 99
        "#,
    )
    .unwrap();

    assert_eq!(config.colony.colony_count, 50);
    assert_eq!(config.colony.worker_count, AppConfig::default().colony.worker_count);
    assert_eq!(
        config.recognition.model,
        RecognitionModel::UndesirableAbsentIndividual
    );
    assert_eq!(config.demography.kill_mode, KillMode::Sorted);
    assert_eq!(config.demography.repro_mode, ReproMode::Disabled);
    assert_eq!(config.food.model, FoodModel::Periodic);
    assert_eq!(config.run.action_rate, 2.0);
    assert_eq!(config.run.seed, Some(99));
}

#[test]
fn test_unknown_enum_value_fails_at_load() {
    let err = AppConfig::from_toml("[recognition]\nmodel = \"telepathy\"\n");
    assert!(err.is_err());
}

#[test]
fn test_invalid_values_fail_validation() {
    assert!(AppConfig::from_toml("[colony]\nworker_count = 1\n").is_err());
    assert!(AppConfig::from_toml("[demography]\nfrac_killed = 1.5\n").is_err());
    assert!(AppConfig::from_toml("[run]\naction_rate = 0.0\n").is_err());
}

#[test]
fn test_default_config_survives_toml_round_trip() {
    let text = toml::to_string(&AppConfig::default()).unwrap();
    let parsed = AppConfig::from_toml(&text).unwrap();
    assert_eq!(parsed, AppConfig::default());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[run]\nhorizon = 42.0\n").unwrap();
    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.run.horizon, 42.0);
    assert!(AppConfig::load(dir.path().join("missing.toml")).is_err());
}
