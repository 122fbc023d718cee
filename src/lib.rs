//! Coughscan - batch cough detection for audio recordings
//!
//! Walks a directory of audio files, sends each one with a prompting
//! strategy's instruction to a multimodal chat completion service, parses
//! a cough / no-cough verdict out of the free-form answer and appends the
//! result to a human-readable log as it goes.

pub mod cli;
pub mod config;
pub mod codec;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod inference;
pub mod sink;
pub mod strategy;
