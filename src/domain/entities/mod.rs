mod answer;
mod game;
mod player;
mod round;
mod vote;

pub use answer::*;
pub use game::*;
pub use player::*;
pub use round::*;
pub use vote::*;
