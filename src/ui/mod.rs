mod lcd;
mod render;
mod session;
mod state;

pub use lcd::{Surface, TerminalLcd};
pub use session::DisplaySession;
#[cfg(test)]
pub use lcd::Geometry;
#[cfg(test)]
pub use state::LcdState;
