mod create_game;
mod finalize_round;
mod get_question;
mod join_game;
mod list_answers;
mod list_players;
mod next_round;
mod start_game;
mod submit_answer;
mod submit_vote;

pub use create_game::*;
pub use finalize_round::*;
pub use get_question::*;
pub use join_game::*;
pub use list_answers::*;
pub use list_players::*;
pub use next_round::*;
pub use start_game::*;
pub use submit_answer::*;
pub use submit_vote::*;
