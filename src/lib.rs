pub mod advice;
pub mod console;
pub mod deck;
pub mod error;
pub mod hand;
pub mod history;
pub mod round;
pub mod trump;

pub use error::TrackerError;
pub use round::{Participant, Phase, RoundTracker};
