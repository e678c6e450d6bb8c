use std::sync::Arc;

use guess_game_server::*;

// Every draw lands on 7, so a guess of 7 always wins and anything else loses.
fn service() -> GameService {
    GameService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(ScriptedNumbers::new([7])),
    )
}

#[test]
fn three_losses_in_a_row_delete_the_game() {
    let svc = service();
    let game = svc.create(0, 100).unwrap();

    let first = svc.play_exact(&game.id, 50).unwrap();
    assert_eq!(first.result, PlayResult::Lose);
    assert_eq!(svc.get(&game.id).unwrap().consecutive_losses, 1);

    let second = svc.play_exact(&game.id, 50).unwrap();
    assert_eq!(second.result, PlayResult::Lose);
    assert_eq!(svc.get(&game.id).unwrap().consecutive_losses, 2);

    let third = svc.play_exact(&game.id, 50);
    assert!(matches!(third, Err(GameError::Terminated(_))));
    assert!(matches!(svc.get(&game.id), Err(GameError::NotFound(_))));
    assert!(svc.list().is_empty());

    // terminated is absorbing
    assert!(matches!(svc.play_exact(&game.id, 7), Err(GameError::NotFound(_))));
}

#[test]
fn exact_win_adds_five_and_resets_streak() {
    let svc = service();
    let game = svc.create(0, 100).unwrap();

    svc.play_exact(&game.id, 50).unwrap();
    svc.play_exact(&game.id, 50).unwrap();
    let win = svc.play_exact(&game.id, 7).unwrap();
    assert_eq!(win.result, PlayResult::Win);
    assert_eq!(win.total_score, 5);

    let stored = svc.get(&game.id).unwrap();
    assert_eq!(stored.points, 5);
    assert_eq!(stored.consecutive_losses, 0);
    assert!(stored.updated_at.is_some());

    // streak starts over after the win
    svc.play_exact(&game.id, 50).unwrap();
    svc.play_exact(&game.id, 50).unwrap();
    assert_eq!(svc.get(&game.id).unwrap().consecutive_losses, 2);
}

#[test]
fn losses_never_take_points_away() {
    let svc = service();
    let game = svc.create(0, 100).unwrap();

    svc.play_exact(&game.id, 7).unwrap();
    svc.play_exact(&game.id, 7).unwrap();
    let lose = svc.play_exact(&game.id, 8).unwrap();
    assert_eq!(lose.result, PlayResult::Lose);
    assert_eq!(lose.total_score, 10);
}

#[test]
fn mixed_modes_share_one_streak() {
    let svc = service();
    let game = svc.create(0, 100).unwrap();

    svc.play_exact(&game.id, 50).unwrap();
    svc.play_neighbors(&game.id, 50).unwrap();
    assert!(matches!(
        svc.play_exact(&game.id, 50),
        Err(GameError::Terminated(_))
    ));
}
