use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng};
use tictree::{
    Error, PersistedModel,
    policy::{child_distribution, normalize, parse_observed_board, select_move},
    tictactoe::{Cell, Coord, GameTree},
};

#[test]
fn untrained_tree_picks_opening_moves_uniformly() {
    let tree = GameTree::build();
    let mut rng = StdRng::seed_from_u64(2024);
    let observed = parse_observed_board(".../.../...").unwrap();

    let draws = 9_000;
    let mut counts: HashMap<Coord, usize> = HashMap::new();
    for _ in 0..draws {
        let coord = select_move(&tree, &observed, 'X', &mut rng).unwrap();
        *counts.entry(coord).or_default() += 1;
    }

    assert_eq!(counts.len(), 9);
    for (coord, count) in counts {
        // Expected 1000 per cell; allow a wide band
        assert!(
            (850..=1150).contains(&count),
            "cell {coord} chosen {count} times"
        );
    }
}

#[test]
fn markers_are_relative_to_the_opening_player() {
    let tree = GameTree::build();
    let observed = parse_observed_board("O../.X./...").unwrap();

    // O opened, so O's cell is player one's
    let state = normalize(&observed, 'O').unwrap();
    assert_eq!(state.cells()[0][0], Cell::PlayerOne);
    assert_eq!(state.cells()[1][1], Cell::PlayerTwo);

    let node = tree.find_subtree(state.key()).unwrap();
    assert_eq!(tree.node(node).depth(), 2);
    assert_eq!(child_distribution(&tree, node).unwrap().len(), 7);

    // Read with X as opener, the same board is a different position
    let swapped = normalize(&observed, 'X').unwrap();
    assert_ne!(swapped.key(), state.key());
    assert!(tree.find_subtree(swapped.key()).is_ok());
}

#[test]
fn selection_never_picks_an_occupied_cell() {
    let model = PersistedModel::new();
    let mut rng = StdRng::seed_from_u64(31);
    let boards = ["X../.../...", "XO./.X./..O"];

    for text in boards {
        let observed = parse_observed_board(text).unwrap();
        for _ in 0..200 {
            let coord = model.select_move(&observed, 'X', &mut rng).unwrap();
            assert_eq!(
                observed[coord.row as usize][coord.col as usize],
                '.',
                "picked occupied cell {coord} on {text}"
            );
        }
    }
}

#[test]
fn invalid_inputs_are_reported() {
    let tree = GameTree::build();
    let mut rng = StdRng::seed_from_u64(0);
    let empty = parse_observed_board(".........").unwrap();

    assert!(matches!(
        select_move(&tree, &empty, '?', &mut rng),
        Err(Error::InvalidPlayerIdentifier { .. })
    ));

    // Player two has more markers than the opener
    let impossible = parse_observed_board("OO./.../...").unwrap();
    assert!(matches!(
        select_move(&tree, &impossible, 'X', &mut rng),
        Err(Error::SubtreeNotFound { .. })
    ));

    let full = parse_observed_board("XOX/XOO/OXX").unwrap();
    assert!(matches!(
        select_move(&tree, &full, 'X', &mut rng),
        Err(Error::TerminalNodeSelection { .. })
    ));
}
