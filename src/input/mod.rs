//! Pointer input and the screen-space drag gesture engine.

pub mod draggable;
pub mod pointer;
