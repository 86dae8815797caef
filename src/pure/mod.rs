//! Side effect free management of internal window manager state
pub mod geometry;
pub mod screen;

#[doc(inline)]
pub use screen::{Client, ClientSet, Screen, StackLayer};
