//! Data types for working with X events
use crate::core::Xid;

/// Wrapper around the low level X event types that correspond to request /
/// response data when communicating with the X server itself.
///
/// The variant names and data have developed with the reference x11rb
/// implementation in mind but should be applicable for all back ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XEvent {
    /// A message has been sent to a particular window
    ClientMessage(ClientMessage),
    /// A window is requesting a change to its size, position or border
    ConfigureRequest(ConfigureEvent),
    /// A window has been destroyed
    Destroy(Xid),
    /// A window is requesting to be mapped
    MapRequest(MapRequestEvent),
    /// A property has changed on a window
    PropertyNotify(PropertyEvent),
    /// A window has been unmapped
    UnmapNotify(Xid),
}

impl std::fmt::Display for XEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use XEvent::*;

        match self {
            ClientMessage(_) => write!(f, "ClientMessage"),
            ConfigureRequest(_) => write!(f, "ConfigureRequest"),
            Destroy(_) => write!(f, "Destroy"),
            MapRequest(_) => write!(f, "MapRequest"),
            PropertyNotify(_) => write!(f, "PropertyNotify"),
            UnmapNotify(_) => write!(f, "UnmapNotify"),
        }
    }
}

/// A request from a window to become visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapRequestEvent {
    /// The window requesting the map
    pub id: Xid,
    /// The parent the request was redirected from: the root of the screen
    /// the window wants to appear on
    pub parent: Xid,
}

/// A property change on a client or root window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEvent {
    /// The window the property changed on
    pub id: Xid,
    /// The name of the property that changed
    pub atom: String,
    /// Whether the window is a root window
    pub is_root: bool,
}

/// A request from a window to alter its geometry or border.
///
/// Only the fields named in the request's value mask are populated: a window
/// asking to move says nothing about its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureEvent {
    /// The window making the request
    pub id: Xid,
    /// The requested x position, if one was given
    pub x: Option<i32>,
    /// The requested y position, if one was given
    pub y: Option<i32>,
    /// The requested width, if one was given
    pub w: Option<u32>,
    /// The requested height, if one was given
    pub h: Option<u32>,
    /// The requested border width, if one was given
    pub border_width: Option<u32>,
}

impl Default for ConfigureEvent {
    fn default() -> Self {
        ConfigureEvent {
            id: Xid(0),
            x: None,
            y: None,
            w: None,
            h: None,
            border_width: None,
        }
    }
}

/// A client message sent to a window.
///
/// Desktop components use these to ask the window manager to act on a window
/// they do not own, a close request from a pager being the canonical case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMessage {
    /// The window the message targets
    pub id: Xid,
    /// The name of the message type atom
    pub dtype: String,
    /// The raw message payload
    pub data: ClientMessageData,
}

/// The raw data contained in a [ClientMessage], tagged with its wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessageData {
    /// Raw bytes
    U8([u8; 20]),
    /// 16 bit words
    U16([u16; 10]),
    /// 32 bit words
    U32([u32; 5]),
}
