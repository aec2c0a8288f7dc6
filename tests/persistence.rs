//! Tests for saving and loading trained models

use rand::{SeedableRng, rngs::StdRng};
use tictree::{
    Difficulty, Error, PersistedModel, ReinforcementSchedule,
    adapters::{InMemoryRepository, MsgPackRepository},
    policy::{child_distribution, parse_observed_board},
    ports::ModelRepository,
};
use tempfile::TempDir;

fn trained_model(games: u64, seed: u64) -> PersistedModel {
    let mut model = PersistedModel::new();
    let mut rng = StdRng::seed_from_u64(seed);
    model.train(games, &ReinforcementSchedule::default(), &mut rng);
    model
}

fn assert_same_model(a: &PersistedModel, b: &PersistedModel) {
    assert_eq!(a.iteration_count(), b.iteration_count());
    assert_eq!(a.tree().len(), b.tree().len());
    for ((id, x), (_, y)) in a.tree().iter().zip(b.tree().iter()) {
        assert_eq!(x.weight(), y.weight(), "weight of node {id} changed");
        assert_eq!(x.state(), y.state(), "board of node {id} changed");
        assert_eq!(x.children(), y.children(), "children of node {id} changed");
    }
}

#[test]
fn test_model_save_load_roundtrip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = MsgPackRepository::new(temp_dir.path());
    let model = trained_model(500, 42);

    repo.save(&model, Difficulty::Easy.artifact_name())
        .expect("Failed to save model");
    assert!(
        temp_dir.path().join("easy_game_model.msgpack").exists(),
        "Saved file should exist"
    );

    let loaded = repo
        .load(Difficulty::Easy.artifact_name())
        .expect("Failed to load model");
    assert_same_model(&model, &loaded);
}

#[test]
fn test_loaded_model_selects_identically() {
    let model = trained_model(300, 7);
    let loaded = PersistedModel::from_bytes(&model.to_bytes().unwrap()).unwrap();
    let observed = parse_observed_board("X../.O./...").unwrap();

    let mut rng_a = StdRng::seed_from_u64(5);
    let mut rng_b = StdRng::seed_from_u64(5);
    for _ in 0..50 {
        assert_eq!(
            model.select_move(&observed, 'X', &mut rng_a).unwrap(),
            loaded.select_move(&observed, 'X', &mut rng_b).unwrap()
        );
    }

    let root = model.tree().root();
    assert_eq!(
        child_distribution(model.tree(), root).unwrap(),
        child_distribution(loaded.tree(), root).unwrap()
    );
}

#[test]
fn test_save_overwrites_previous_model() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = MsgPackRepository::new(temp_dir.path());

    repo.save(&PersistedModel::new(), "model").unwrap();
    let newer = trained_model(20, 3);
    repo.save(&newer, "model").unwrap();

    assert_eq!(repo.load("model").unwrap().iteration_count(), 20);
}

#[test]
fn test_truncated_file_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = MsgPackRepository::new(temp_dir.path());
    let bytes = PersistedModel::new().to_bytes().unwrap();

    std::fs::write(repo.path_for("truncated"), &bytes[..bytes.len() / 2]).unwrap();

    let err = repo.load("truncated").unwrap_err();
    assert!(matches!(err, Error::Persistence { .. }), "got {err}");
}

#[test]
fn test_in_memory_repository_roundtrip() {
    let repo = InMemoryRepository::new();
    let model = trained_model(100, 11);

    assert!(!repo.exists("memory"));
    repo.save(&model, "memory").unwrap();
    assert!(repo.exists("memory"));

    let loaded = repo.load("memory").unwrap();
    assert_same_model(&model, &loaded);
}
