pub mod base;
pub mod drag;
pub mod events;
pub mod icon;
pub mod marker;
pub mod object;
