//! Reference games for testing the MCTS engine

use std::collections::HashMap;

use crate::GameState;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8],
    [0, 3, 6], [1, 4, 7], [2, 5, 8],
    [0, 4, 8], [2, 4, 6],
];

/// Returns the player owning a full line, given the owner of each of the nine squares
fn line_owner(owner: impl Fn(usize) -> Option<usize>) -> Option<usize> {
    LINES.iter().find_map(|line| {
        let first = owner(line[0])?;
        if line[1..].iter().all(|&index| owner(index) == Some(first)) { Some(first) } else { None }
    })
}

/// Classic 3x3 tic-tac-toe. Moves are cell indices `0..9`, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct TicTacToe {
    cells: [u8; 9],
    player: usize,
}

impl TicTacToe {
    pub fn new() -> Self {
        TicTacToe { cells: [0; 9], player: 0 }
    }

    /// Player whose turn it is
    pub fn get_current_player(&self) -> usize {
        self.player
    }

    /// Player owning a full line, if any
    pub fn winner(&self) -> Option<usize> {
        line_owner(|index| self.cells[index].checked_sub(1).map(usize::from))
    }

    /// Exact game value for the player to move: 1 win, 0 draw, -1 loss
    fn negamax(&self, cache: &mut HashMap<[u8; 9], i32>) -> i32 {
        if let Some(value) = cache.get(&self.cells) {
            return *value;
        }

        let value = if self.winner().is_some() {
            -1
        } else if self.cells.iter().all(|cell| *cell != 0) {
            0
        } else {
            self.get_legal_moves().into_iter().map(|action| {
                let mut next = self.clone();
                next.play(action);
                -next.negamax(cache)
            }).max().unwrap_or(0)
        };

        cache.insert(self.cells, value);
        value
    }

    /// Every move achieving the best game-theoretic outcome, in cell order
    pub fn optimal_moves(&self) -> Vec<usize> {
        let mut cache = HashMap::new();

        let scored: Vec<(usize, i32)> = self.get_legal_moves().into_iter().map(|action| {
            let mut next = self.clone();
            next.play(action);
            (action, -next.negamax(&mut cache))
        }).collect();

        let best = scored.iter().map(|(_, value)| *value).max().unwrap_or(0);
        scored.into_iter().filter(|(_, value)| *value == best).map(|(action, _)| action).collect()
    }
}

impl GameState<2> for TicTacToe {
    type Move = usize;

    fn play(&mut self, action: usize) {
        self.cells[action] = self.player as u8 + 1;
        self.player = 1 - self.player;
    }

    fn get_legal_moves(&self) -> Vec<usize> {
        if self.is_end() {
            return Vec::new();
        }
        (0..9).filter(|index| self.cells[*index] == 0).collect()
    }

    fn is_end(&self) -> bool {
        self.winner().is_some() || self.cells.iter().all(|cell| *cell != 0)
    }

    fn get_score(&self) -> [f64; 2] {
        match self.winner() {
            Some(winner) => {
                let mut score = [-1.0; 2];
                score[winner] = 1.0;
                score
            }
            None => [0.0; 2]
        }
    }

    fn get_previous_player(&self) -> usize {
        1 - self.player
    }
}

/// A move in ultimate tic-tac-toe: a cell of one of the nine small boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UltimateMove {
    pub board: usize,
    pub cell: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum SubBoard {
    Open,
    Won(usize),
    Drawn,
}

/// Nine tic-tac-toe boards arranged in a 3x3 grid; winning a small board claims
/// its square on the large one. Any cell of an undecided small board may be played.
#[derive(Clone, Debug)]
pub struct UltimateTicTacToe {
    cells: [[u8; 9]; 9],
    boards: [SubBoard; 9],
    player: usize,
}

impl UltimateTicTacToe {
    pub fn new() -> Self {
        UltimateTicTacToe { cells: [[0; 9]; 9], boards: [SubBoard::Open; 9], player: 0 }
    }

    /// Player owning a full line of small boards, if any
    pub fn winner(&self) -> Option<usize> {
        line_owner(|index| match self.boards[index] {
            SubBoard::Won(player) => Some(player),
            _ => None,
        })
    }
}

impl GameState<2> for UltimateTicTacToe {
    type Move = UltimateMove;

    fn play(&mut self, action: UltimateMove) {
        let cells = &mut self.cells[action.board];
        cells[action.cell] = self.player as u8 + 1;

        if line_owner(|index| cells[index].checked_sub(1).map(usize::from)).is_some() {
            self.boards[action.board] = SubBoard::Won(self.player);
        } else if cells.iter().all(|cell| *cell != 0) {
            self.boards[action.board] = SubBoard::Drawn;
        }

        self.player = 1 - self.player;
    }

    fn get_legal_moves(&self) -> Vec<UltimateMove> {
        if self.is_end() {
            return Vec::new();
        }

        (0..9)
            .filter(|board| self.boards[*board] == SubBoard::Open)
            .flat_map(|board| {
                (0..9)
                    .filter(move |cell| self.cells[board][*cell] == 0)
                    .map(move |cell| UltimateMove { board, cell })
            })
            .collect()
    }

    fn is_end(&self) -> bool {
        self.winner().is_some() || self.boards.iter().all(|board| *board != SubBoard::Open)
    }

    fn get_score(&self) -> [f64; 2] {
        match self.winner() {
            Some(winner) => {
                let mut score = [-1.0; 2];
                score[winner] = 1.0;
                score
            }
            None => [0.0; 2]
        }
    }

    fn get_previous_player(&self) -> usize {
        1 - self.player
    }
}

/// Three-player take-away game: players remove 1 or 2 tokens in turn and whoever
/// takes the last token wins. Losers score `-0.5`.
#[derive(Clone, Debug)]
pub struct Countdown {
    remaining: u32,
    player: usize,
}

impl Countdown {
    pub fn new(tokens: u32) -> Self {
        Countdown { remaining: tokens, player: 0 }
    }

    pub fn get_remaining(&self) -> u32 {
        self.remaining
    }
}

impl GameState<3> for Countdown {
    type Move = u32;

    fn play(&mut self, action: u32) {
        self.remaining -= action;
        self.player = (self.player + 1) % 3;
    }

    fn get_legal_moves(&self) -> Vec<u32> {
        (1..=2).filter(|take| *take <= self.remaining).collect()
    }

    fn is_end(&self) -> bool {
        self.remaining == 0
    }

    fn get_score(&self) -> [f64; 3] {
        let mut score = [-0.5; 3];
        score[self.get_previous_player()] = 1.0;
        score
    }

    fn get_previous_player(&self) -> usize {
        (self.player + 2) % 3
    }
}

/// A game with exactly one legal move, which wins for player 0.
#[derive(Clone, Debug)]
pub struct SingleMoveGame {
    played: bool,
}

impl SingleMoveGame {
    pub fn new() -> Self {
        SingleMoveGame { played: false }
    }
}

impl GameState<2> for SingleMoveGame {
    type Move = u8;

    fn play(&mut self, _action: u8) {
        self.played = true;
    }

    fn get_legal_moves(&self) -> Vec<u8> {
        if self.played { Vec::new() } else { vec![0] }
    }

    fn is_end(&self) -> bool {
        self.played
    }

    fn get_score(&self) -> [f64; 2] {
        if self.played { [1.0, -1.0] } else { [0.0, 0.0] }
    }

    fn get_previous_player(&self) -> usize {
        if self.played { 0 } else { 1 }
    }
}

/// A malformed game that never ends but has no legal move.
#[derive(Clone, Debug)]
pub struct StuckGame;

impl StuckGame {
    pub fn new() -> Self {
        StuckGame
    }
}

impl GameState<2> for StuckGame {
    type Move = u8;

    fn play(&mut self, _action: u8) {}

    fn get_legal_moves(&self) -> Vec<u8> {
        Vec::new()
    }

    fn is_end(&self) -> bool {
        false
    }

    fn get_score(&self) -> [f64; 2] {
        [0.0; 2]
    }

    fn get_previous_player(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_is_independent() {
        let mut game = TicTacToe::new();
        game.play(4);

        let mut copy = game.clone();
        copy.play(0);
        copy.play(8);

        assert_eq!(game.get_legal_moves(), vec![0, 1, 2, 3, 5, 6, 7, 8]);
        assert!(!game.is_end());
        assert_eq!(game.get_current_player(), 1);
    }

    #[test]
    fn test_tic_tac_toe_draw() {
        let mut game = TicTacToe::new();
        for action in [0, 4, 8, 1, 7, 6, 2, 5, 3] {
            game.play(action);
        }

        assert!(game.is_end());
        assert_eq!(game.winner(), None);
        assert_eq!(game.get_score(), [0.0, 0.0]);
        assert!(game.get_legal_moves().is_empty());
    }

    #[test]
    fn test_optimal_moves() {
        // Every first move draws with perfect play.
        assert_eq!(TicTacToe::new().optimal_moves(), (0..9).collect::<Vec<usize>>());

        // X on 0 and 1, O on 3 and 4: X must complete the top row.
        let mut game = TicTacToe::new();
        for action in [0, 3, 1, 4] {
            game.play(action);
        }
        assert_eq!(game.optimal_moves(), vec![2]);

        // X took a corner: only the center holds the draw for O.
        let mut game = TicTacToe::new();
        game.play(0);
        assert_eq!(game.optimal_moves(), vec![4]);
    }

    #[test]
    fn test_ultimate_small_board_win() {
        let mut game = UltimateTicTacToe::new();
        for (board, cell) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            game.play(UltimateMove { board, cell });
        }

        assert!(!game.is_end());
        assert!(game.get_legal_moves().iter().all(|action| action.board != 0));
        assert_eq!(game.get_legal_moves().len(), 8 * 9 - 2);
    }

    #[test]
    fn test_ultimate_game_win() {
        let crosses = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
        let noughts = [(3, 0), (3, 1), (4, 0), (4, 1), (5, 0), (5, 1), (3, 5), (4, 5)];

        let mut game = UltimateTicTacToe::new();
        for (index, (board, cell)) in crosses.into_iter().enumerate() {
            assert!(!game.is_end());
            game.play(UltimateMove { board, cell });
            if let Some(&(board, cell)) = noughts.get(index) {
                game.play(UltimateMove { board, cell });
            }
        }

        assert!(game.is_end());
        assert_eq!(game.winner(), Some(0));
        assert_eq!(game.get_score(), [1.0, -1.0]);
    }

    #[test]
    fn test_countdown() {
        let mut game = Countdown::new(4);
        game.play(2);
        game.play(1);
        assert_eq!(game.get_legal_moves(), vec![1]);
        game.play(1);

        assert!(game.is_end());
        assert_eq!(game.get_previous_player(), 2);
        assert_eq!(game.get_score(), [-0.5, -0.5, 1.0]);
    }
}
