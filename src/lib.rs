//! Oxbow is a reparenting window manager engine for X11.
//!
//! The crate provides the per-screen bookkeeping at the heart of a desktop
//! window manager: tracking which top level windows are managed, wrapping
//! them in decoration frames, maintaining their front to back stacking
//! order and keeping the root window properties other clients read (client
//! lists, work area, supported protocols) in sync with that state.
//!
//! The X server is only ever touched through the [XConn][crate::x::XConn]
//! trait, with the window management logic itself provided as extension
//! methods on top of it via [XConnExt][crate::x::XConnExt]. A concrete
//! implementation backed by the [x11rb][::x11rb] crate is available under
//! the default `x11rb` feature flag.
//!
//! Window placement, virtual desktop switching and input handling are
//! deliberately out of scope: oxbow decides what is managed, in what order
//! it is stacked, and what is announced to other clients, and leaves policy
//! to the embedding program.
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms
)]

pub mod core;
pub mod frame;
mod handle;
pub mod pure;
pub mod theme;
pub mod x;

#[cfg(feature = "x11rb")]
pub mod x11rb;

pub use crate::core::{Config, State, WindowManager, Xid};

/// A Result where the error type is a crate level [Error]
pub type Result<T> = std::result::Result<T, Error>;

/// The error type returned by fallible operations in this crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A client message was received with an unknown data format
    #[error("invalid client message data: format={format}")]
    InvalidClientMessage {
        /// The format received from the X server
        format: u8,
    },

    /// Property data from the X server could not be interpreted
    #[error("invalid property data: {0}")]
    InvalidPropertyData(String),

    /// String data from the X server was not valid UTF-8
    #[error(transparent)]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// No screen could be claimed from the X server
    #[error("no screens could be managed: is another window manager already running?")]
    NoManagedScreens,

    /// An error while configuring signal handling
    #[error("unable to set signal handler: {0}")]
    Signal(#[from] nix::errno::Errno),

    /// Neither the configured theme nor the fallback could be loaded
    #[error("unable to load a theme from '{path}' or the fallback '{fallback}': {reason}")]
    ThemeLoad {
        /// The path that was asked for
        path: String,
        /// The fallback path that was tried after it
        fallback: String,
        /// Why the final attempt failed
        reason: String,
    },

    /// An operation was requested for a screen that does not exist
    #[error("there is no screen with index {index}")]
    UnknownScreen {
        /// The requested screen index
        index: usize,
    },

    /// Another window manager already holds substructure redirection on a root window
    #[error("another window manager is already running for root window {root}")]
    WmConflict {
        /// The contested root window
        root: Xid,
    },

    /// Unable to establish a connection to the X server
    #[cfg(feature = "x11rb")]
    #[error(transparent)]
    X11rbConnect(#[from] ::x11rb::errors::ConnectError),

    /// The X11 connection broke
    #[cfg(feature = "x11rb")]
    #[error(transparent)]
    X11rbConnection(#[from] ::x11rb::errors::ConnectionError),

    /// Unable to get the reply for an X11 request
    #[cfg(feature = "x11rb")]
    #[error(transparent)]
    X11rbReplyError(#[from] ::x11rb::errors::ReplyError),

    /// Unable to get the reply for an X11 request or allocate a new resource id
    #[cfg(feature = "x11rb")]
    #[error(transparent)]
    X11rbReplyOrIdError(#[from] ::x11rb::errors::ReplyOrIdError),
}
