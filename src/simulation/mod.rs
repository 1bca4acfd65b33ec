pub mod cache;
pub mod config;
pub mod result;
pub mod scenario;
pub mod simulator;
