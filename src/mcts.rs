//! Implementation of the Monte Carlo Tree Search (MCTS) engine.
//!
//! This module provides the four-phase MCTS iteration (selection, expansion,
//! simulation, backpropagation), the search budget, and the tree-reuse protocol
//! that keeps the subtree of the move actually played between two searches. It
//! is generic over game types, move representations and the number of players.

use std::{collections::VecDeque, time::{Duration, Instant}};

use rand::rngs::StdRng;

use crate::{max_visit_count, random_simulation, ucb1, utils, GameState, NodeId, SelectionFunction, SimulationFunction, Tree};

/// Sentinel for `MctsConfig::max_iterations` meaning "no iteration limit".
pub const INFINITE_ITERATIONS: Option<usize> = None;
/// Sentinel for `MctsConfig::max_search_time` meaning "no time limit".
pub const INFINITE_SEARCH_TIME: Option<Duration> = None;

/// Data stored in each node of the MCTS tree.
///
/// # Type Parameters
/// - `G`: The game type.
/// - `P`: The number of players.
struct MctsNodeData<G: GameState<P>, const P: usize>{
    /// Snapshot of the game at this position.
    state: G,
    /// The move leading from the parent to this node (None for a root).
    action: Option<G::Move>,
    /// Legal moves not yet expanded into children, consumed front to back.
    untried_moves: VecDeque<G::Move>,
    /// Cumulative simulation outcome, one entry per player.
    reward: [f64; P],
    /// The number of simulations that passed through this node.
    n: u32,
    /// The player who made the move producing `state`.
    player: usize,
    /// Whether `state` is terminal.
    finish: bool
}

impl<G: GameState<P>, const P: usize> MctsNodeData<G, P>{
    /// Creates the statistics of a never visited position.
    ///
    /// Legal moves are only enumerated for non-terminal states.
    fn new(state: G, action: Option<G::Move>) -> Self{
        let finish = state.is_end();
        let untried_moves = if finish { VecDeque::new() } else { state.get_legal_moves().into() };
        let player = state.get_previous_player();

        MctsNodeData { state, action, untried_moves, reward: [0.0; P], n: 0, player, finish }
    }

    /// True iff every legal move has been expanded into a child.
    #[inline]
    fn is_fully_expanded(&self) -> bool{
        self.untried_moves.is_empty()
    }

    /// True iff selection has to stop at this node.
    #[inline]
    fn is_leaf_for_selection(&self) -> bool{
        !self.is_fully_expanded() || self.finish
    }

    /// Reward credited to the player who chose the move leading here.
    #[inline]
    fn get_player_reward(&self) -> f64{
        self.reward[self.player]
    }

    #[inline]
    fn add_score(&mut self, score: &[f64; P]){
        for (reward, value) in self.reward.iter_mut().zip(score){
            *reward += value;
        }
        self.n += 1;
    }
}

/// Represents possible errors that can occur during MCTS operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MctsError{
    /// A state that is not over has no legal move: the `GameState`
    /// implementation broke its contract.
    #[error("game is not over but has no legal moves")]
    NoLegalMoves,
    /// A search was requested while the root already represents a finished game.
    #[error("game is over, there is no move to search")]
    SearchAlreadyOver,
    /// Both the iteration and the time budget are disabled, the search would never stop.
    #[error("search budget is unbounded, set an iteration or a time limit")]
    UnboundedSearch,
    /// A budget was configured as zero iterations or a zero duration.
    #[error("search budget must be positive")]
    InvalidBudget,
    /// The move given to `play` is not legal at the root.
    #[error("move is not legal in the current game state")]
    IllegalMove
}

/// Configuration parameters for a Monte Carlo Tree Search (MCTS) instance.
///
/// # Type Parameters
/// - `G`: The game type.
/// - `P`: The number of players.
pub struct MctsConfig<G, const P: usize>{
    /// Maximum number of iterations per search (`None` for no limit).
    pub max_iterations: Option<usize>,
    /// Maximum wall-clock time per search (`None` for no limit).
    ///
    /// The clock is only checked between iterations, so a search may overrun
    /// by the duration of one iteration.
    pub max_search_time: Option<Duration>,
    /// Scores children while descending the tree.
    pub selection_function: SelectionFunction,
    /// Plays a state out to its end.
    pub simulation_function: SimulationFunction<G, P>,
    /// Scores the root's children to pick the move returned by a search.
    pub next_move_function: SelectionFunction,
    /// Seed of the rollout random number generator.
    ///
    /// `Some(value)` makes searches reproducible; `None` seeds from the current time.
    pub seed: Option<u64>
}

impl<G: GameState<P>, const P: usize> MctsConfig<G, P>{
    /// The default MCTS configuration.
    ///
    /// - `max_iterations`: `1 << 15`.
    /// - `max_search_time`: 1000 seconds.
    /// - `selection_function`: `ucb1`.
    /// - `simulation_function`: `random_simulation`.
    /// - `next_move_function`: `max_visit_count`.
    /// - `seed`: `None`.
    pub const DEFAULT: MctsConfig<G, P> = MctsConfig{
        max_iterations: Some(1 << 15),
        max_search_time: Some(Duration::from_secs(1000)),
        selection_function: ucb1,
        simulation_function: random_simulation::<G, P>,
        next_move_function: max_visit_count,
        seed: None
    };

    /// Checks that the search is guaranteed to stop.
    ///
    /// # Returns
    /// `Err(MctsError::UnboundedSearch)` if both limits are disabled,
    /// `Err(MctsError::InvalidBudget)` if a limit is zero.
    pub fn validate(&self) -> Result<(), MctsError>{
        validate_budget(self.max_iterations, self.max_search_time)
    }
}

fn validate_budget(max_iterations: Option<usize>, max_search_time: Option<Duration>) -> Result<(), MctsError>{
    match (max_iterations, max_search_time) {
        (None, None) => Err(MctsError::UnboundedSearch),
        (Some(0), _) => Err(MctsError::InvalidBudget),
        (_, Some(time)) if time.is_zero() => Err(MctsError::InvalidBudget),
        _ => Ok(())
    }
}

impl<G: GameState<P>, const P: usize> Default for MctsConfig<G, P>{
    fn default() -> Self{
        Self::DEFAULT
    }
}

impl<G, const P: usize> Clone for MctsConfig<G, P>{
    fn clone(&self) -> Self{
        MctsConfig { ..*self }
    }
}

/// The Monte Carlo Tree Search engine.
///
/// The engine keeps a tree rooted at the actual current game position. Searches
/// only mutate the tree statistics, never the game the caller owns; `play`
/// advances the root and keeps the subtree of the chosen move.
///
/// # Type Parameters
/// - `G`: The game type that implements the `GameState` trait.
/// - `P`: The number of players.
pub struct Mcts<G: GameState<P>, const P: usize>{
    tree: Tree<MctsNodeData<G, P>>,
    root: NodeId,
    max_iterations: Option<usize>,
    max_search_time: Option<Duration>,
    selection_function: SelectionFunction,
    simulation_function: SimulationFunction<G, P>,
    next_move_function: SelectionFunction,
    rng: StdRng
}

impl<G: GameState<P>, const P: usize> Mcts<G, P>{
    /// Creates a new MCTS instance rooted at `game` with the default configuration.
    #[inline]
    pub fn from_game(game: G) -> Self{
        Self::from_game_with_config(game, &MctsConfig::DEFAULT)
    }

    /// Creates a new MCTS instance rooted at `game` with a custom configuration.
    ///
    /// # Parameters
    /// - `game`: The current game position. The engine keeps its own copy.
    /// - `config`: The `MctsConfig` to use for this instance.
    pub fn from_game_with_config(game: G, config: &MctsConfig<G, P>) -> Self{
        let mut tree = Tree::new();
        let root = tree.allocate(None, MctsNodeData::new(game, None));

        Mcts {
            tree,
            root,
            max_iterations: config.max_iterations,
            max_search_time: config.max_search_time,
            selection_function: config.selection_function,
            simulation_function: config.simulation_function,
            next_move_function: config.next_move_function,
            rng: utils::rng_from_seed(config.seed)
        }
    }

    /// Discards the whole tree and re-roots the engine at a new position.
    pub fn set_game_state(&mut self, game: G){
        self.tree.release(self.root);
        self.root = self.tree.allocate(None, MctsNodeData::new(game, None));
    }

    /// Sets the iteration limit (`None` for no limit).
    pub fn set_max_iterations(&mut self, max_iterations: Option<usize>){
        self.max_iterations = max_iterations;
    }

    /// Sets the time limit (`None` for no limit).
    pub fn set_max_search_time(&mut self, max_search_time: Option<Duration>){
        self.max_search_time = max_search_time;
    }

    pub fn set_selection_function(&mut self, selection_function: SelectionFunction){
        self.selection_function = selection_function;
    }

    pub fn set_simulation_function(&mut self, simulation_function: SimulationFunction<G, P>){
        self.simulation_function = simulation_function;
    }

    pub fn set_next_move_function(&mut self, next_move_function: SelectionFunction){
        self.next_move_function = next_move_function;
    }

    /// Gets the game position at the root of the tree.
    #[inline]
    pub fn get_game(&self) -> &G{
        &self.root_data().state
    }

    /// Returns whether the root is a finished game.
    #[inline]
    pub fn is_finish(&self) -> bool{
        self.root_data().finish
    }

    /// Returns the number of simulations that went through the root.
    #[inline]
    pub fn count_visit(&self) -> u32{
        self.root_data().n
    }

    /// Returns the reward accumulated at the root, one value per player.
    #[inline]
    pub fn get_root_reward(&self) -> [f64; P]{
        self.root_data().reward
    }

    /// Returns the number of nodes currently held by the tree.
    #[inline]
    pub fn tree_size(&self) -> usize{
        self.tree.len()
    }

    /// Statistics of the root's children, in discovery order.
    ///
    /// # Returns
    /// One `(move, visit count, reward vector)` entry per expanded child.
    pub fn get_statistics(&self) -> Vec<(G::Move, u32, [f64; P])>{
        self.tree.get(self.root).get_children().iter().filter_map(|id| {
            let child = self.tree.get(*id).get();
            child.action.clone().map(|action| (action, child.n, child.reward))
        }).collect()
    }

    #[inline]
    fn root_data(&self) -> &MctsNodeData<G, P>{
        self.tree.get(self.root).get()
    }

    /// Returns the child of `id` maximizing `function`.
    ///
    /// Ties go to the earliest discovered child, `NaN` scores rank last.
    /// Unvisited children rank first when `unvisited_first` is set.
    fn best_child(&self, id: NodeId, function: SelectionFunction, unvisited_first: bool) -> Option<NodeId>{
        let node = self.tree.get(id);
        let parent_n = node.get().n;

        let mut best: Option<(NodeId, f64)> = None;

        for &child_id in node.get_children(){
            let child = self.tree.get(child_id).get();

            let score = if unvisited_first && child.n == 0 {
                f64::INFINITY
            }
            else{
                function(child.get_player_reward(), child.n, parent_n)
            };
            let score = if score.is_nan() { f64::NEG_INFINITY } else { score };

            if best.map_or(true, |(_, best_score)| score > best_score){
                best = Some((child_id, score));
            }
        }

        best.map(|(child_id, _)| child_id)
    }

    /// Performs the selection phase of MCTS
    ///
    /// Descends from the root through fully expanded, non-terminal nodes.
    ///
    /// # Returns
    /// The first node that is terminal or still has untried moves, or
    /// `Err(MctsError::NoLegalMoves)` if a non-terminal node has no move at all.
    fn selection(&self) -> Result<NodeId, MctsError>{
        let mut id = self.root;

        while !self.tree.get(id).get().is_leaf_for_selection(){
            id = self.best_child(id, self.selection_function, true).ok_or(MctsError::NoLegalMoves)?;
        }

        Ok(id)
    }

    /// Performs the expansion phase of MCTS
    ///
    /// # Returns
    /// The new child created from one untried move, or `id` itself when the node
    /// is terminal.
    fn expansion(&mut self, id: NodeId) -> NodeId{
        let data = self.tree.get_mut(id).get_mut();

        if data.finish {
            return id;
        }

        match data.untried_moves.pop_front(){
            Some(action) => {
                let mut state = data.state.clone();
                state.play(action.clone());
                self.tree.allocate(Some(id), MctsNodeData::new(state, Some(action)))
            }
            None => id
        }
    }

    /// Performs the simulation phase of MCTS on a copy of the node's state
    fn simulation(&mut self, id: NodeId) -> Result<[f64; P], MctsError>{
        let mut game = self.tree.get(id).get().state.clone();
        (self.simulation_function)(&mut game, &mut self.rng)
    }

    /// Performs the backpropagation phase of MCTS
    ///
    /// Every node from `id` up to the root (inclusive) gets one more visit and
    /// the score vector added to its reward.
    fn backpropagation(&mut self, id: NodeId, score: &[f64; P]){
        let mut current = Some(id);

        while let Some(current_id) = current{
            let node = self.tree.get_mut(current_id);
            node.get_mut().add_score(score);
            current = node.get_parent();
        }
    }

    /// Performs one full iteration of MCTS (selection, expansion, simulation, backpropagation).
    ///
    /// # Returns
    /// `Ok(())` if the iteration completes successfully.
    /// `Err(MctsError::NoLegalMoves)` if the game broke its contract during the iteration.
    pub fn iterate(&mut self) -> Result<(), MctsError>{
        let selected = self.selection()?;
        let expanded = self.expansion(selected);
        let score = self.simulation(expanded)?;
        self.backpropagation(expanded, &score);
        Ok(())
    }

    /// Runs iterations until the configured budget is exhausted.
    ///
    /// Limits are checked between iterations only. At least one iteration runs.
    ///
    /// # Returns
    /// The number of iterations performed.
    fn run_budget(&mut self) -> Result<usize, MctsError>{
        let start = Instant::now();
        let mut iterations: usize = 0;

        loop {
            self.iterate()?;
            iterations += 1;

            if self.max_iterations.is_some_and(|max| iterations >= max) {
                break;
            }
            if self.max_search_time.is_some_and(|max| start.elapsed() >= max) {
                break;
            }
        }

        log::debug!(
            "mcts search: {} iterations in {:?}, {} nodes in tree",
            iterations,
            start.elapsed(),
            self.tree.len()
        );

        Ok(iterations)
    }

    /// Searches the best move from the root position.
    ///
    /// Runs iterations under the configured budget, then applies the next-move
    /// function to the root's children. The tree is kept for later searches.
    ///
    /// # Returns
    /// `Ok(move)` on success.
    /// `Err(MctsError::SearchAlreadyOver)` if the root is a finished game; no search is done.
    /// `Err(MctsError::UnboundedSearch)` or `Err(MctsError::InvalidBudget)` if the budget is invalid.
    /// `Err(MctsError::NoLegalMoves)` if a rollout reached a non-terminal state without moves.
    ///
    /// # Examples
    /// ```rust
    /// use reuse_mcts::{GameState, Mcts, MctsConfig, MctsError};
    /// use reuse_mcts::test_utils::TicTacToe;
    ///
    /// fn main() -> Result<(), MctsError> {
    ///     let config: MctsConfig<TicTacToe, 2> = MctsConfig { max_iterations: Some(500), seed: Some(1), ..MctsConfig::DEFAULT };
    ///     let mut mcts = Mcts::from_game_with_config(TicTacToe::new(), &config);
    ///
    ///     let action = mcts.search_next_move()?;
    ///     assert!(TicTacToe::new().get_legal_moves().contains(&action));
    ///     Ok(())
    /// }
    /// ```
    pub fn search_next_move(&mut self) -> Result<G::Move, MctsError>{
        if self.is_finish() {
            return Err(MctsError::SearchAlreadyOver);
        }

        validate_budget(self.max_iterations, self.max_search_time)?;

        self.run_budget()?;

        let best = self.best_child(self.root, self.next_move_function, false).ok_or(MctsError::NoLegalMoves)?;
        let data = self.tree.get(best).get();

        log::debug!("mcts search: chosen child has {} of {} root visits", data.n, self.count_visit());

        data.action.clone().ok_or(MctsError::NoLegalMoves)
    }

    /// Moves the MCTS root to the position reached by playing `action`.
    ///
    /// If `action` was already explored, its subtree and statistics are kept and
    /// every other branch is released. Otherwise the root is replaced by a fresh
    /// node without statistics.
    ///
    /// # Returns
    /// `Ok(())` if the root was moved.
    /// `Err(MctsError::IllegalMove)` if `action` is not legal at the root; the
    /// engine is left untouched.
    pub fn play(&mut self, action: G::Move) -> Result<(), MctsError>{
        let explored = self.tree.get(self.root).get_children().iter().copied().find(|id| {
            self.tree.get(*id).get().action.as_ref() == Some(&action)
        });

        let old_root = self.root;

        match explored {
            Some(child) => {
                self.tree.detach(child);
                self.root = child;
            }
            None => {
                let state = self.get_game();
                if state.is_end() || !state.get_legal_moves().contains(&action) {
                    return Err(MctsError::IllegalMove);
                }

                let mut state = state.clone();
                state.play(action);
                self.root = self.tree.allocate(None, MctsNodeData::new(state, None));
            }
        }

        let released = self.tree.release(old_root);

        log::trace!(
            "mcts play: {} root with {} visits, {} nodes released",
            if explored.is_some() { "reused" } else { "fresh" },
            self.count_visit(),
            released
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, time::Duration};

    use rand::rngs::StdRng;

    use crate::{max_mean_reward, random_simulation, test_utils::{Countdown, SingleMoveGame, StuckGame, TicTacToe, UltimateMove, UltimateTicTacToe}, GameState, Mcts, MctsConfig, MctsError};

    fn config<G: GameState<P>, const P: usize>(iterations: usize, seed: u64) -> MctsConfig<G, P> {
        MctsConfig { max_iterations: Some(iterations), max_search_time: None, seed: Some(seed), ..MctsConfig::DEFAULT }
    }

    type TicTacToeMcts = Mcts<TicTacToe, 2>;

    thread_local! {
        static SIMULATIONS: Cell<usize> = const { Cell::new(0) };
    }

    fn counting_simulation(game: &mut TicTacToe, rng: &mut StdRng) -> Result<[f64; 2], MctsError> {
        SIMULATIONS.with(|count| count.set(count.get() + 1));
        random_simulation(game, rng)
    }

    fn draw_simulation(_game: &mut TicTacToe, _rng: &mut StdRng) -> Result<[f64; 2], MctsError> {
        Ok([0.0, 0.0])
    }

    fn play_against_solver(mcts_player: usize, pick_last: bool) -> Result<TicTacToe, MctsError> {
        let mut game = TicTacToe::new();
        let mut mcts = TicTacToeMcts::from_game_with_config(game.clone(), &config(10_000, 17));

        while !game.is_end() {
            let action = if game.get_current_player() == mcts_player {
                mcts.search_next_move()?
            } else {
                let moves = game.optimal_moves();
                if pick_last { moves[moves.len() - 1] } else { moves[0] }
            };

            game.play(action);
            mcts.play(action)?;
        }

        Ok(game)
    }

    #[test]
    fn test_backpropagation_single_move() -> Result<(), MctsError> {
        let mut mcts = Mcts::<SingleMoveGame, 2>::from_game_with_config(SingleMoveGame::new(), &config(1, 0));
        mcts.iterate()?;

        assert_eq!(mcts.count_visit(), 1);
        assert_eq!(mcts.get_root_reward(), [1.0, -1.0]);
        assert_eq!(mcts.get_statistics(), vec![(0, 1, [1.0, -1.0])]);
        assert_eq!(mcts.tree_size(), 2);
        Ok(())
    }

    #[test]
    fn test_terminal_node_is_simulated_in_place() -> Result<(), MctsError> {
        let mut mcts = Mcts::<SingleMoveGame, 2>::from_game_with_config(SingleMoveGame::new(), &config(1, 0));

        for _ in 0..5 {
            mcts.iterate()?;
        }

        assert_eq!(mcts.tree_size(), 2);
        assert_eq!(mcts.count_visit(), 5);
        assert_eq!(mcts.get_statistics(), vec![(0, 5, [5.0, -5.0])]);
        Ok(())
    }

    #[test]
    fn test_search_on_terminal_root() {
        let mut game = TicTacToe::new();
        for action in [0, 3, 1, 4, 2] {
            game.play(action);
        }
        let mut mcts = TicTacToeMcts::from_game_with_config(game, &config(100, 0));

        assert_eq!(mcts.search_next_move(), Err(MctsError::SearchAlreadyOver));
        assert_eq!(mcts.count_visit(), 0);
    }

    #[test]
    fn test_stuck_game_fails() {
        let mut mcts = Mcts::<StuckGame, 2>::from_game_with_config(StuckGame::new(), &config(10, 0));
        assert_eq!(mcts.search_next_move(), Err(MctsError::NoLegalMoves));
    }

    #[test]
    fn test_budget_validation() {
        let mut mcts = TicTacToeMcts::from_game(TicTacToe::new());

        mcts.set_max_iterations(crate::INFINITE_ITERATIONS);
        mcts.set_max_search_time(crate::INFINITE_SEARCH_TIME);
        assert_eq!(mcts.search_next_move(), Err(MctsError::UnboundedSearch));

        mcts.set_max_iterations(Some(0));
        assert_eq!(mcts.search_next_move(), Err(MctsError::InvalidBudget));

        mcts.set_max_iterations(None);
        mcts.set_max_search_time(Some(Duration::ZERO));
        assert_eq!(mcts.search_next_move(), Err(MctsError::InvalidBudget));

        assert!(MctsConfig::<TicTacToe, 2>::DEFAULT.validate().is_ok());
    }

    #[test]
    fn test_exact_iteration_budget() -> Result<(), MctsError> {
        SIMULATIONS.with(|count| count.set(0));

        let mut mcts = TicTacToeMcts::from_game_with_config(TicTacToe::new(), &config(250, 3));
        mcts.set_simulation_function(counting_simulation);
        mcts.search_next_move()?;

        assert_eq!(SIMULATIONS.with(|count| count.get()), 250);
        assert_eq!(mcts.count_visit(), 250);
        Ok(())
    }

    #[test]
    fn test_time_budget() -> Result<(), MctsError> {
        let mut mcts = TicTacToeMcts::from_game_with_config(TicTacToe::new(), &MctsConfig {
            max_iterations: None,
            max_search_time: Some(Duration::from_millis(30)),
            seed: Some(5),
            ..MctsConfig::DEFAULT
        });

        let action = mcts.search_next_move()?;

        assert!(action < 9);
        assert!(mcts.count_visit() >= 1);
        Ok(())
    }

    #[test]
    fn test_one_node_per_iteration() -> Result<(), MctsError> {
        let mut mcts = TicTacToeMcts::from_game_with_config(TicTacToe::new(), &config(30, 11));
        mcts.search_next_move()?;

        assert_eq!(mcts.tree_size(), 31);
        assert_eq!(mcts.get_statistics().len(), 9);
        Ok(())
    }

    #[test]
    fn test_ties_go_to_first_discovered() -> Result<(), MctsError> {
        let mut mcts = TicTacToeMcts::from_game_with_config(TicTacToe::new(), &config(9, 0));
        mcts.set_simulation_function(draw_simulation);

        assert_eq!(mcts.search_next_move()?, 0);
        assert!(mcts.get_statistics().iter().all(|(_, n, _)| *n == 1));

        let actions: Vec<usize> = mcts.get_statistics().into_iter().map(|(action, _, _)| action).collect();
        assert_eq!(actions, (0..9).collect::<Vec<usize>>());
        Ok(())
    }

    #[test]
    fn test_search_returns_legal_moves() -> Result<(), MctsError> {
        let mut game = TicTacToe::new();
        let mut mcts = TicTacToeMcts::from_game_with_config(game.clone(), &config(200, 23));

        while !game.is_end() {
            let action = mcts.search_next_move()?;
            assert!(game.get_legal_moves().contains(&action));

            game.play(action);
            mcts.play(action)?;
        }

        assert!(mcts.is_finish());
        assert_eq!(mcts.search_next_move(), Err(MctsError::SearchAlreadyOver));
        Ok(())
    }

    #[test]
    fn test_play_reuses_subtree() -> Result<(), MctsError> {
        let mut mcts = TicTacToeMcts::from_game_with_config(TicTacToe::new(), &config(2000, 29));
        let action = mcts.search_next_move()?;

        let (_, visits, reward) = mcts.get_statistics().into_iter().find(|(child, _, _)| *child == action).ok_or(MctsError::IllegalMove)?;

        let mut expected = mcts.get_game().clone();
        expected.play(action);

        let before = mcts.tree_size();
        mcts.play(action)?;

        assert_eq!(mcts.count_visit(), visits);
        assert_eq!(mcts.get_root_reward(), reward);
        assert_eq!(mcts.get_game(), &expected);
        assert_eq!(mcts.get_game().get_legal_moves(), expected.get_legal_moves());
        assert_eq!(mcts.get_game().is_end(), expected.is_end());
        assert!(mcts.tree_size() < before);

        let subtree: u32 = mcts.get_statistics().iter().map(|(_, n, _)| *n).sum();
        assert!(subtree <= visits);
        Ok(())
    }

    #[test]
    fn test_play_unexplored_move() -> Result<(), MctsError> {
        let mut mcts = TicTacToeMcts::from_game_with_config(TicTacToe::new(), &config(3, 0));
        mcts.search_next_move()?;
        assert_eq!(mcts.get_statistics().len(), 3);

        mcts.play(8)?;

        assert_eq!(mcts.tree_size(), 1);
        assert_eq!(mcts.count_visit(), 0);
        assert_eq!(mcts.get_root_reward(), [0.0, 0.0]);
        assert_eq!(mcts.get_game().get_legal_moves(), (0..8).collect::<Vec<usize>>());
        Ok(())
    }

    #[test]
    fn test_play_illegal_move() -> Result<(), MctsError> {
        let mut game = TicTacToe::new();
        game.play(4);

        let mut mcts = TicTacToeMcts::from_game_with_config(game, &config(20, 0));
        mcts.search_next_move()?;
        let size = mcts.tree_size();

        assert_eq!(mcts.play(4), Err(MctsError::IllegalMove));
        assert_eq!(mcts.tree_size(), size);
        assert_eq!(mcts.count_visit(), 20);
        Ok(())
    }

    #[test]
    fn test_set_game_state_resets_tree() -> Result<(), MctsError> {
        let mut mcts = TicTacToeMcts::from_game_with_config(TicTacToe::new(), &config(100, 0));
        mcts.search_next_move()?;

        let mut game = TicTacToe::new();
        game.play(0);
        mcts.set_game_state(game.clone());

        assert_eq!(mcts.tree_size(), 1);
        assert_eq!(mcts.count_visit(), 0);
        assert_eq!(mcts.get_game(), &game);
        Ok(())
    }

    #[test]
    fn test_visits_grow_with_budget() -> Result<(), MctsError> {
        let mut previous = 0;

        for iterations in [100, 200, 400, 800, 1600] {
            let mut mcts = TicTacToeMcts::from_game_with_config(TicTacToe::new(), &config(iterations, 31));
            mcts.search_next_move()?;

            let best = mcts.get_statistics().iter().map(|(_, n, _)| *n).max().unwrap_or(0);
            assert!(best >= previous);
            previous = best;
        }
        Ok(())
    }

    #[test]
    fn test_pool_does_not_grow_across_searches() -> Result<(), MctsError> {
        let mut mcts = TicTacToeMcts::from_game_with_config(TicTacToe::new(), &config(300, 37));

        // A search from a fresh root never holds more than one node per iteration
        // plus the root, and released slots are handed out again.
        for _ in 0..5 {
            mcts.set_game_state(TicTacToe::new());
            mcts.search_next_move()?;
            assert!(mcts.tree.capacity() <= 301);
        }
        Ok(())
    }

    #[test]
    fn test_opening_is_center_or_corner() -> Result<(), MctsError> {
        let mut mcts = TicTacToeMcts::from_game_with_config(TicTacToe::new(), &config(10_000, 41));
        let action = mcts.search_next_move()?;

        assert!([0, 2, 4, 6, 8].contains(&action));
        Ok(())
    }

    #[test]
    fn test_never_loses_to_optimal_play() -> Result<(), MctsError> {
        for mcts_player in [0, 1] {
            for pick_last in [false, true] {
                let game = play_against_solver(mcts_player, pick_last)?;
                assert_ne!(game.winner(), Some(1 - mcts_player));
            }
        }
        Ok(())
    }

    #[test]
    fn test_finds_immediate_win() -> Result<(), MctsError> {
        let mut game = TicTacToe::new();
        for action in [0, 3, 1, 4] {
            game.play(action);
        }

        let mut mcts = TicTacToeMcts::from_game_with_config(game, &config(2000, 43));
        assert_eq!(mcts.search_next_move()?, 2);
        Ok(())
    }

    #[test]
    fn test_next_move_function_is_swappable() -> Result<(), MctsError> {
        let mut game = TicTacToe::new();
        for action in [0, 3, 1, 4] {
            game.play(action);
        }

        let mut mcts = TicTacToeMcts::from_game_with_config(game, &config(2000, 47));
        mcts.set_next_move_function(max_mean_reward);
        assert_eq!(mcts.search_next_move()?, 2);
        Ok(())
    }

    #[test]
    fn test_three_players() -> Result<(), MctsError> {
        let mut game = Countdown::new(7);
        let mut mcts = Mcts::<Countdown, 3>::from_game_with_config(game.clone(), &config(500, 53));

        while !game.is_end() {
            let action = mcts.search_next_move()?;
            assert!(game.get_legal_moves().contains(&action));

            game.play(action);
            mcts.play(action)?;
            assert_eq!(mcts.get_game().get_remaining(), game.get_remaining());
        }

        let score = game.get_score();
        assert_eq!(score.iter().sum::<f64>(), 0.0);
        Ok(())
    }

    #[test]
    fn test_ultimate_tic_tac_toe_game() -> Result<(), MctsError> {
        let mut game = UltimateTicTacToe::new();
        let mut mcts = Mcts::<UltimateTicTacToe, 2>::from_game_with_config(game.clone(), &config(100, 59));

        while !game.is_end() {
            let action: UltimateMove = mcts.search_next_move()?;
            assert!(game.get_legal_moves().contains(&action));

            game.play(action);
            mcts.play(action)?;
        }

        assert!(mcts.is_finish());
        Ok(())
    }
}
