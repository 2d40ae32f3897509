mod game_settings;

pub use game_settings::*;
