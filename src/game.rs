//! Module defining the trait every game must implement to be searched by MCTS.

/// Trait defining the interface for a turn-based game state that can be used with MCTS.
///
/// The engine never mutates the state it was given: every simulation runs on a
/// clone, so `Clone` must produce an independent deep copy.
///
/// # Type Parameters
/// - `P`: The number of players. Scores are reported as one value per player.
pub trait GameState<const P: usize>: Clone {
    /// The representation of a move. The engine only needs to copy moves around
    /// and compare them for equality.
    type Move: Clone + PartialEq;

    /// Applies a move for the player whose turn it is and advances the turn.
    ///
    /// The behavior is implementation-defined if `action` is not one of the moves
    /// returned by `get_legal_moves`.
    ///
    /// # Examples
    /// ```rust
    /// use reuse_mcts::GameState;
    /// use reuse_mcts::test_utils::TicTacToe;
    /// let mut game = TicTacToe::new();
    /// game.play(4);
    /// assert!(!game.get_legal_moves().contains(&4));
    /// assert_eq!(game.get_previous_player(), 0);
    /// ```
    fn play(&mut self, action: Self::Move);

    /// Returns every move legal in the current state, in no particular order.
    ///
    /// The returned list should be empty iff the game is over. A non-terminal state
    /// with no legal moves breaks the contract and makes rollouts fail.
    ///
    /// # Examples
    /// ```rust
    /// use reuse_mcts::GameState;
    /// use reuse_mcts::test_utils::TicTacToe;
    /// let game = TicTacToe::new();
    /// assert_eq!(game.get_legal_moves(), (0..9).collect::<Vec<usize>>());
    /// ```
    fn get_legal_moves(&self) -> Vec<Self::Move>;

    /// Determines if no further moves should be played.
    fn is_end(&self) -> bool;

    /// Returns the outcome of the game, one value per player.
    ///
    /// Only meaningful once `is_end` holds. The usual convention is `1.0` for a win,
    /// `-1.0` for a loss and `0.0` for a draw.
    ///
    /// # Examples
    /// ```rust
    /// use reuse_mcts::GameState;
    /// use reuse_mcts::test_utils::TicTacToe;
    /// let mut game = TicTacToe::new();
    /// for action in [0, 3, 1, 4, 2] {
    ///     game.play(action);
    /// }
    /// assert!(game.is_end());
    /// assert_eq!(game.get_score(), [1.0, -1.0]);
    /// ```
    fn get_score(&self) -> [f64; P];

    /// Returns the index (in `0..P`) of the player who made the move that produced
    /// this state.
    ///
    /// Backpropagation credits a node's reward to this player, so a child's
    /// statistics are read from the perspective of the player who chose it.
    fn get_previous_player(&self) -> usize;
}
