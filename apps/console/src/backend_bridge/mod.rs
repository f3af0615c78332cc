//! Backend bridge: command queue from the shell to the network worker.

pub mod commands;
pub mod runtime;
