pub mod balance;
pub mod engine;
pub mod smoothing;
