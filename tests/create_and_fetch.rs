use std::sync::Arc;

use guess_game_server::*;

fn service() -> GameService {
    GameService::new(Arc::new(MemoryStore::new()), Arc::new(ThreadRngSource))
}

#[test]
fn valid_bounds_create_a_fresh_game() {
    let svc = service();
    for (min, max) in [(0, 10), (0, 100), (5, 15), (1_000, 5_000)] {
        let game = svc.create(min, max).expect("valid bounds");
        assert_eq!(game.min_number, min);
        assert_eq!(game.max_number, max);
        assert_eq!(game.points, 0);
        assert_eq!(game.consecutive_losses, 0);
        assert_eq!(game.level, 1);
        assert!(game.updated_at.is_none());
    }
    assert_eq!(svc.list().len(), 4);
}

#[test]
fn invalid_bounds_are_rejected() {
    let svc = service();
    for (min, max) in [(5, 10), (-1, 20), (20, 20), (30, 0), (0, 9)] {
        let err = svc.create(min, max).unwrap_err();
        assert!(
            matches!(err, GameError::InvalidBounds { .. }),
            "({}, {}) gave {:?}",
            min,
            max,
            err
        );
    }
    assert!(svc.list().is_empty());
}

#[test]
fn create_then_get_round_trips() {
    let svc = service();
    let created = svc.create(0, 100).unwrap();
    let fetched = svc.get(&created.id).unwrap();
    assert_eq!(created, fetched);
}

#[test]
fn ids_are_unique() {
    let svc = service();
    let a = svc.create(0, 100).unwrap();
    let b = svc.create(0, 100).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn delete_removes_and_second_delete_fails() {
    let svc = service();
    let game = svc.create(0, 100).unwrap();

    svc.delete(&game.id).unwrap();
    assert!(matches!(svc.get(&game.id), Err(GameError::NotFound(_))));
    assert!(matches!(svc.delete(&game.id), Err(GameError::NotFound(_))));
}

#[test]
fn unknown_id_is_not_found_everywhere() {
    let svc = service();
    let id = "does-not-exist";
    assert!(matches!(svc.get(id), Err(GameError::NotFound(_))));
    assert!(matches!(svc.delete(id), Err(GameError::NotFound(_))));
    assert!(matches!(svc.edit_bounds(id, 0, 100), Err(GameError::NotFound(_))));
    assert!(matches!(svc.play_exact(id, 1), Err(GameError::NotFound(_))));
    assert!(matches!(svc.play_neighbors(id, 1), Err(GameError::NotFound(_))));
}
