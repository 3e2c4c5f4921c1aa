//! Editor commands triggered from the keyboard

mod shortcuts;

pub use shortcuts::*;
