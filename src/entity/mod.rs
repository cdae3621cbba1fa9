//! Animated entities and their per-frame update rules.
//!
//! Every kind is a plain value: `advance` consumes the current state and
//! returns the next one. Randomness is always an explicit argument so a
//! seeded generator replays a scene exactly.

mod drifter;
mod label;
mod node;
mod pulse;
mod seeker;
mod trail;
mod walker;

pub use drifter::{Drifter, EdgePolicy, Jitter};
pub use label::{Label, LABEL_MARGIN};
pub use node::StateNode;
pub use pulse::{Pulse, PULSE_DECAY, PULSE_FLOOR};
pub use seeker::Seeker;
pub use trail::Trail;
pub use walker::Walker;
