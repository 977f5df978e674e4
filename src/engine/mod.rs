pub mod lifeline;
pub mod scoring;
pub mod shuffle;
pub mod timer;
