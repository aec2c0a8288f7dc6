use tictree::tictactoe::{Cell, FULL_TREE_NODES, GameResult, GameTree, Player};

#[test]
fn full_tree_has_known_shape() {
    let tree = GameTree::build();

    assert_eq!(tree.len(), FULL_TREE_NODES);
    assert_eq!(tree.terminal_count(), 255_168);
    assert_eq!(tree.distinct_boards(), 5_478);
    assert_eq!(tree.node(tree.root()).children().len(), 9);
}

#[test]
fn every_node_is_consistent_with_its_board() {
    let tree = GameTree::build();

    for (id, node) in tree.iter() {
        let state = node.state();
        assert_eq!(
            node.depth(),
            state.occupied_count(),
            "depth of node {id} does not match its marker count"
        );

        match state.evaluate() {
            GameResult::Ongoing => assert_eq!(
                node.children().len(),
                state.empty_coords().len(),
                "open node {id} must have one child per empty cell"
            ),
            _ => assert!(node.is_terminal(), "finished node {id} has children"),
        }

        let ones = state
            .cells()
            .iter()
            .flatten()
            .filter(|&&c| c == Cell::PlayerOne)
            .count();
        let twos = state
            .cells()
            .iter()
            .flatten()
            .filter(|&&c| c == Cell::PlayerTwo)
            .count();
        assert!(ones == twos || ones == twos + 1, "node {id} breaks turn order");
    }
}

#[test]
fn children_follow_row_major_order_of_empty_cells() {
    let tree = GameTree::build();

    for (id, node) in tree.iter().take(20_000) {
        let empties = node.state().empty_coords();
        let moves: Vec<_> = node
            .children()
            .iter()
            .map(|&child| tree.node(child).state().last_move())
            .collect();

        if node.is_terminal() {
            continue;
        }
        let expected: Vec<_> = empties.into_iter().map(Some).collect();
        assert_eq!(moves, expected, "children of node {id} out of order");

        let mover = Player::for_ply(node.depth());
        for &child in node.children() {
            let coord = tree.node(child).state().last_move().unwrap();
            assert_eq!(tree.node(child).state().cell(coord), mover.to_cell());
        }
    }
}

#[test]
fn every_board_lookup_agrees_with_depth_first_search() {
    let tree = GameTree::build();

    // Sample every 97th node to keep the DFS cost bounded
    for (_, node) in tree.iter().step_by(97) {
        let key = node.state().key();
        let indexed = tree.find_subtree(key).unwrap();
        assert_eq!(Some(indexed), tree.find_subtree_dfs(key));
        assert_eq!(tree.node(indexed).state().key(), key);
    }
}

#[test]
fn winner_is_whoever_moved_last() {
    let tree = GameTree::build();

    for (id, node) in tree.iter() {
        if let GameResult::Win(winner) = node.result() {
            let last_mover = Player::for_ply(node.depth() - 1);
            assert_eq!(winner, last_mover, "node {id} won by the wrong player");
        }
    }
}
