//! Retained element tree and render-layer registries.
//!
//! Layers own their visual elements exclusively; handles are cheap clones of
//! a shared single-threaded cell, mirroring how a browser layer holds on to
//! its DOM node.

pub mod element;
pub mod panes;
