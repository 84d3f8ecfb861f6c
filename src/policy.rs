//! Default policies plugged into the MCTS engine.
//!
//! The engine's phase structure never depends on which policy is installed:
//! selection and next-move policies only produce scores that the engine ranks,
//! and the simulation policy only turns a state into a terminal score vector.

use rand::{rngs::StdRng, Rng};

use crate::{GameState, MctsError};

/// Type alias for a function pointer scoring a child node.
///
/// Used both for selection during the tree descent and for choosing the move
/// actually played once the search is over. The function takes:
/// - `reward`: The reward accumulated by the child, from the perspective of the
///   player who chose the move leading to it.
/// - `n_visits`: The number of times the child has been visited.
/// - `parent_n_visits`: The number of times the parent has been visited.
///
/// The child with the highest score wins; ties go to the earliest discovered child.
pub type SelectionFunction = fn(reward: f64, n_visits: u32, parent_n_visits: u32) -> f64;

/// Type alias for a function pointer playing a state out to its end.
///
/// The state passed in is a private clone owned by the engine and may be consumed
/// freely. Returns the terminal score vector, one value per player.
pub type SimulationFunction<G, const P: usize> = fn(game: &mut G, rng: &mut StdRng) -> Result<[f64; P], MctsError>;

/// The standard Upper Confidence Bound 1 (UCB1) selection function.
///
/// `w/n + sqrt(2 ln(N) / n)`. An unvisited child (`n == 0`) scores `+inf` so it
/// is always tried before the formula is used.
///
/// # Examples
/// ```rust
/// use reuse_mcts::ucb1;
/// assert_eq!(ucb1(0.0, 0, 10), f64::INFINITY);
/// assert!((ucb1(1.0, 1, 1) - 1.0).abs() < 1e-12);
/// ```
pub fn ucb1(reward: f64, n_visits: u32, parent_n_visits: u32) -> f64{
    if n_visits == 0 {
        return f64::INFINITY;
    }

    let n = n_visits as f64;
    reward / n + (2. * (parent_n_visits as f64).ln() / n).sqrt()
}

/// Next-move function picking the most visited child.
pub fn max_visit_count(_reward: f64, n_visits: u32, _parent_n_visits: u32) -> f64{
    n_visits as f64
}

/// Next-move function picking the child with the best mean reward.
///
/// Unvisited children score `-inf`.
pub fn max_mean_reward(reward: f64, n_visits: u32, _parent_n_visits: u32) -> f64{
    if n_visits == 0 { f64::NEG_INFINITY } else { reward / n_visits as f64 }
}

/// Plays uniformly random legal moves until the game ends.
///
/// # Returns
/// - `Ok(score)`: The terminal score vector of the game.
/// - `Err(MctsError::NoLegalMoves)`: A non-terminal state had no legal move.
pub fn random_simulation<G: GameState<P>, const P: usize>(game: &mut G, rng: &mut StdRng) -> Result<[f64; P], MctsError>{
    while !game.is_end() {
        let mut moves = game.get_legal_moves();

        if moves.is_empty() {
            return Err(MctsError::NoLegalMoves);
        }

        let index = rng.random_range(0..moves.len());
        game.play(moves.swap_remove(index));
    }

    Ok(game.get_score())
}
