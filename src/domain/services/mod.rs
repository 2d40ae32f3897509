mod clock;
mod round_service;

pub use clock::*;
pub use round_service::*;
