//! A Rust library providing a generic, configurable Monte Carlo Tree Search
//! (MCTS) engine for turn-based, finite, multi-player games.
//!
//! The engine is parameterized over the game (and so over its move
//! representation), the number of players, and three pluggable policies:
//! selection, simulation and next-move choice. It keeps its search tree between
//! real moves, so the statistics gathered below the move actually played are
//! reused by the next search.
//!
//! # Modules
//! - `game`: Defines the trait every game must implement.
//! - `tree`: Implements the arena node pool backing the search tree.
//! - `policy`: Provides the default selection, simulation and next-move policies.
//! - `mcts`: Provides the MCTS engine, its configuration and its errors.
//! - `utils`: Contains general utility functions.
//! - `test_utils`: Provides reference games for testing the engine.
//!
//! # Examples
//! ```rust
//! use reuse_mcts::{GameState, Mcts, MctsConfig, MctsError, test_utils::TicTacToe};
//!
//! fn main() -> Result<(), MctsError> {
//!     let config: MctsConfig<TicTacToe, 2> = MctsConfig {
//!         max_iterations: Some(1000),
//!         ..MctsConfig::DEFAULT
//!     };
//!
//!     let mut game = TicTacToe::new();
//!     let mut mcts = Mcts::from_game_with_config(game.clone(), &config);
//!
//!     while !game.is_end() {
//!         let action = mcts.search_next_move()?;
//!
//!         // Keep the engine in step with the real game.
//!         game.play(action);
//!         mcts.play(action)?;
//!     }
//!     Ok(())
//! }
//! ```

mod tree;
mod game;
mod policy;
mod mcts;
pub mod utils;

#[doc(hidden)]
pub mod test_utils;

use tree::*;
pub use game::*;
pub use policy::*;
pub use mcts::*;
