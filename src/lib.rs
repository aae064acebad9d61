//! Sui PTB Synthesizer
//!
//! Static analysis over Sui Move package interfaces:
//!
//! - **Argument synthesis**: build call plans for public functions from literals,
//!   system objects and constructor chains
//! - **Rejection taxonomy**: a stable reason code for every function that cannot be called
//! - **Achievability oracle**: ceiling rates and difficulty ranking from execution records
//!
//! See [`benchmark`] for the pipeline and [`args`] for the command line.

pub mod args;
pub mod benchmark;
