use tilering::puzzle::{Board, Tile};
use tilering::search::{run_parallel_search, ParallelConfig, SearchConfig};
use tilering::SolverError;

const EIGHT_PUZZLE: [Tile; 9] = [8, 1, 3, 4, 0, 2, 7, 6, 5];

#[test]
fn test_every_cluster_size_finds_the_optimum() {
    let board = Board::new(3, 3).unwrap();
    for peers in 1..=5 {
        let config = ParallelConfig::default().with_peers(peers).with_seed(17);
        let result =
            run_parallel_search(board, &EIGHT_PUZZLE, &SearchConfig::default(), &config).unwrap();

        assert!(result.solution.verify(&board, &EIGHT_PUZZLE), "{} peers", peers);
        assert_eq!(result.solution.len(), 14, "{} peers", peers);
        assert!(result.finder.unwrap() < peers);
        assert_eq!(result.peer_statistics.len(), peers);
    }
}

#[test]
fn test_aggressive_sharing_moves_work() {
    let board = Board::new(3, 3).unwrap();
    let search_config = SearchConfig::default().with_share_threshold(1);
    let config = ParallelConfig::default().with_peers(4).with_seed(5);

    let result = run_parallel_search(board, &EIGHT_PUZZLE, &search_config, &config).unwrap();
    assert_eq!(result.solution.len(), 14);

    let stats = &result.total_statistics;
    assert_eq!(stats.states_shared, stats.states_received);
    let ranks: Vec<usize> = result.peer_statistics.iter().map(|(rank, _)| *rank).collect();
    assert_eq!(ranks, vec![0, 1, 2, 3]);
}

#[test]
fn test_rectangular_boards() {
    // 2x4 and 4x2 boards, where the blank's row matters for solvability.
    let cases: &[(usize, usize, &[Tile])] = &[
        (2, 4, &[1, 2, 3, 4, 5, 6, 0, 7]),
        (2, 4, &[5, 1, 2, 3, 0, 6, 7, 4]),
        (4, 2, &[1, 2, 3, 4, 5, 0, 7, 6]),
    ];
    for (rows, cols, grid) in cases {
        let board = Board::new(*rows, *cols).unwrap();
        let config = ParallelConfig::default().with_peers(3).with_seed(2);
        let result = run_parallel_search(board, grid, &SearchConfig::default(), &config).unwrap();
        assert!(result.solution.verify(&board, grid), "{:?}", grid);
    }
}

#[test]
fn test_solved_puzzle_needs_no_moves() {
    let board = Board::new(4, 4).unwrap();
    let config = ParallelConfig::default().with_peers(3);
    let result =
        run_parallel_search(board, &board.goal(), &SearchConfig::default(), &config).unwrap();
    assert_eq!(result.finder, Some(0));
    assert!(result.solution.is_found());
    assert!(result.solution.is_empty());
}

#[test]
fn test_configuration_errors() {
    let board = Board::new(3, 3).unwrap();
    let config = ParallelConfig::default().with_peers(3);
    let search_config = SearchConfig::default();

    let unsolvable = run_parallel_search(board, &[1, 2, 3, 4, 5, 6, 8, 7, 0], &search_config, &config);
    assert_eq!(unsolvable.unwrap_err(), SolverError::Unsolvable);

    let short = run_parallel_search(board, &[1, 2, 0], &search_config, &config);
    assert!(matches!(short, Err(SolverError::LengthMismatch { len: 3, .. })));

    let repeated = run_parallel_search(board, &[1, 1, 3, 4, 5, 6, 7, 8, 0], &search_config, &config);
    assert!(matches!(repeated, Err(SolverError::InvalidTiles { .. })));
}
