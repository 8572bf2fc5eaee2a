//! End-to-end checks of the engine against scripted network elements.

pub mod scripted;

#[cfg(test)]
mod scenarios;
