//! Command line front end for the slot menu engine.

pub mod commands;
pub mod demo;
pub mod logging;
