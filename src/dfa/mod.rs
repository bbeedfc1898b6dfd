mod dfa;
mod minimize;

pub use dfa::Dfa;
