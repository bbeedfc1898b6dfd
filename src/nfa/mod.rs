mod matcher;
mod nfa;
mod state;

pub use matcher::Matcher;
pub use nfa::{Nfa, Transition};
pub use state::State;
