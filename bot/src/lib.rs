pub mod classifier;
pub mod communicator;
pub mod config;
pub mod janitor;
pub mod macros;
pub mod webhook;
