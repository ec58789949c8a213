use generals_online::alliance::Alliance::{Black, White};
use generals_online::board::{Board, apply_move};
use generals_online::piece::{Piece, Rank};
use generals_online::placement::PlacementError;
use generals_online::test_util::sample_layout;
use generals_online::tile::TileId;
use generals_online::turn::{MoveKind, TurnError, TurnMove};
use pretty_assertions::assert_eq;


fn tile(idx: u32) -> TileId { TileId::new(idx).unwrap() }

fn turn(source: u32, target: u32, kind: MoveKind) -> TurnMove {
    TurnMove { source: tile(source), target: tile(target), kind }
}

// White captain at 10, black private at 19 (right below it), white flag at 40.
fn small_board() -> Board {
    Board::from_pieces([
        Piece::new(Rank::Captain, tile(10), White, White),
        Piece::new(Rank::Private, tile(19), Black, Black),
        Piece::new(Rank::Flag, tile(40), White, White),
    ])
    .unwrap()
}


#[test]
fn normal_move_relocates_piece() {
    let board = small_board();
    let next = apply_move(&board, &turn(10, 11, MoveKind::Normal)).unwrap();
    assert_eq!(next.get(tile(10)), None);
    assert_eq!(next.get(tile(11)), Some(&Piece::new(Rank::Captain, tile(11), White, White)));
    assert_eq!(next.num_pieces(), board.num_pieces());
}

#[test]
fn normal_move_then_back_restores_board() {
    let board = small_board();
    let there = apply_move(&board, &turn(40, 31, MoveKind::Normal)).unwrap();
    let back = apply_move(&there, &turn(31, 40, MoveKind::Normal)).unwrap();
    assert_eq!(back, board);
}

#[test]
fn draw_removes_both_pieces() {
    let board = small_board();
    let next = apply_move(&board, &turn(10, 19, MoveKind::Draw)).unwrap();
    assert!(!next.is_occupied(tile(10)));
    assert!(!next.is_occupied(tile(19)));
    assert_eq!(next.num_pieces(), board.num_pieces() - 2);
}

#[test]
fn aggressive_win_replaces_defender() {
    let board = small_board();
    let next = apply_move(&board, &turn(10, 19, MoveKind::AggressiveWin)).unwrap();
    assert!(!next.is_occupied(tile(10)));
    assert_eq!(next.get(tile(19)), Some(&Piece::new(Rank::Captain, tile(19), White, White)));
    assert_eq!(next.num_pieces(), board.num_pieces() - 1);
}

#[test]
fn aggressive_lose_keeps_defender_intact() {
    let board = small_board();
    let next = apply_move(&board, &turn(10, 19, MoveKind::AggressiveLose)).unwrap();
    assert!(!next.is_occupied(tile(10)));
    assert_eq!(next.get(tile(19)), board.get(tile(19)));
    assert_eq!(next.num_pieces(), board.num_pieces() - 1);
}

#[test]
fn empty_source_is_reported() {
    let board = small_board();
    for kind in [MoveKind::Draw, MoveKind::Normal, MoveKind::AggressiveWin, MoveKind::AggressiveLose] {
        assert_eq!(
            apply_move(&board, &turn(0, 9, kind)),
            Err(TurnError::PieceMissing { tile: tile(0) })
        );
    }
}

#[test]
fn move_onto_own_tile_is_reported() {
    let board = small_board();
    for kind in [MoveKind::Draw, MoveKind::Normal, MoveKind::AggressiveWin, MoveKind::AggressiveLose] {
        assert_eq!(
            apply_move(&board, &turn(10, 10, kind)),
            Err(TurnError::SameTile { tile: tile(10) })
        );
    }
    // Reported even if there is nothing on the tile.
    assert_eq!(
        apply_move(&board, &turn(0, 0, MoveKind::Draw)),
        Err(TurnError::SameTile { tile: tile(0) })
    );
}

#[test]
fn normal_move_onto_occupied_tile_is_reported() {
    let board = small_board();
    assert_eq!(
        apply_move(&board, &turn(10, 19, MoveKind::Normal)),
        Err(TurnError::TileOccupied { tile: tile(19) })
    );
}

#[test]
fn input_board_is_never_modified() {
    let board = small_board();
    let before = board.clone();
    let _ = apply_move(&board, &turn(10, 19, MoveKind::AggressiveWin)).unwrap();
    let _ = apply_move(&board, &turn(0, 9, MoveKind::Normal)).unwrap_err();
    assert_eq!(board, before);
}

#[test]
fn occupancy_over_a_sequence() {
    let mut board = Board::from_pieces(
        sample_layout(White).into_iter().chain(sample_layout(Black)),
    )
    .unwrap();
    assert_eq!(board.count_alliance(White), 21);
    assert_eq!(board.count_alliance(Black), 21);

    // Black flag at 20 steps forward twice, white private at 56 steps forward twice.
    let script = [
        (turn(20, 29, MoveKind::Normal), 0),
        (turn(56, 47, MoveKind::Normal), 0),
        (turn(29, 38, MoveKind::Normal), 0),
        (turn(47, 38, MoveKind::AggressiveWin), -1),
        (turn(18, 27, MoveKind::Normal), 0),
        (turn(38, 29, MoveKind::Normal), 0),
        (turn(27, 28, MoveKind::Normal), 0),
        (turn(29, 28, MoveKind::Draw), -2),
        (turn(17, 26, MoveKind::Normal), 0),
        (turn(55, 46, MoveKind::Normal), 0),
        (turn(26, 35, MoveKind::Normal), 0),
        (turn(46, 37, MoveKind::Normal), 0),
        (turn(35, 36, MoveKind::Normal), 0),
        (turn(37, 36, MoveKind::AggressiveLose), -1),
    ];
    for (turn_move, delta) in script {
        let next = apply_move(&board, &turn_move).unwrap();
        assert_eq!(next.num_pieces() as i64 - board.num_pieces() as i64, delta, "{turn_move:?}");
        board = next;
    }
    assert_eq!(board.num_pieces(), 42 - 4);
}

#[test]
fn layout_conflicts() {
    let mut board = small_board();
    // Same piece again: fine.
    board.merge_layout(&[Piece::new(Rank::Flag, tile(40), White, White)]).unwrap();
    assert_eq!(board.num_pieces(), 3);
    // Different piece on an occupied tile: rejected, nothing merged.
    assert_eq!(
        board.merge_layout(&[
            Piece::new(Rank::Spy, tile(50), White, White),
            Piece::new(Rank::Spy, tile(40), White, White),
        ]),
        Err(PlacementError::TileConflict { tile: tile(40) })
    );
    assert_eq!(board, small_board());
}
