pub mod agent;
pub mod discovery;
pub mod handler;
pub mod stdio;
pub mod tooling;
