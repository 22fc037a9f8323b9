//! Text statistics over note bodies.

pub mod word_freq;
