pub mod achievement;

pub use achievement::*;
