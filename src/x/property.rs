//! Data types for working with X window properties
use crate::{core::Xid, Error, Result};
use bitflags::bitflags;

/// Known property types that should be returnable by XConn impls when they
/// check window properties.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Prop {
    /// One or more X Atoms
    Atom(Vec<String>),
    /// Raw bytes for when the prop type is non-standard
    Bytes(Vec<u32>),
    /// One or more cardinal numbers
    Cardinal(Vec<u32>),
    /// UTF-8 encoded string data
    UTF8String(Vec<String>),
    /// One or more X window IDs
    Window(Vec<Xid>),
    /// The WmHints properties for this window
    WmHints(WmHints),
}

bitflags! {
    /// Possible flags that can be set in a WmHints client property
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct WmHintsFlags: u32 {
        /// Input hint is set
        const INPUT_HINT         = 0b0000000001;
        /// State hint is set
        const STATE_HINT         = 0b0000000010;
        /// Icon pixmap hint is set
        const ICON_PIXMAP_HINT   = 0b0000000100;
        /// Icon window hint is set
        const ICON_WINDOW_HINT   = 0b0000001000;
        /// Icon position hint is set
        const ICON_POSITION_HINT = 0b0000010000;
        /// Icon mask hint is set
        const ICON_MASK_HINT     = 0b0000100000;
        /// Window group hint is set
        const WINDOW_GROUP_HINT  = 0b0001000000;
        // unused                  0b0010000000;
        /// Urgency hint is set
        const URGENCY_HINT       = 0b0100000000;
    }
}

/// Possible valid values for setting the `WM_STATE` property on a client.
///
/// See the [ICCCM docs][1] for more information.
///
/// [1]: https://tronche.com/gui/x/icccm/sec-4.html#s-4.1.3.1
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum WindowState {
    /// Window is not visible
    Withdrawn,
    /// Window is visible
    Normal,
    /// Window is iconified
    Iconic,
}

/// The mapping states a window can be in
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum MapState {
    /// The window is unmapped
    Unmapped,
    /// The window is never viewable
    UnViewable,
    /// The window is currently viewable
    Viewable,
}

/// Client requested hints about information other than window geometry.
///
/// See the ICCCM [spec][1] for further details.
///
/// [1]: https://www.x.org/releases/X11R7.6/doc/xorg-docs/specs/ICCCM/icccm.html#wm_hints_property
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct WmHints {
    /// Which of the fields below were actually set by the client
    pub flags: WmHintsFlags,
    /// Whether or not the window expects keyboard input
    pub accepts_input: bool,
    /// The state the window should start in when first mapped
    pub initial_state: WindowState,
    /// A window to use as this window's icon, if the client set one
    pub icon_win: Option<Xid>,
}

impl WmHints {
    /// Try to construct a [WmHints] instance from raw property data.
    ///
    /// This method expects a slice of 9 u32s corresponding to the C struct
    /// layout shown below.
    ///
    /// ```C
    /// typedef struct {
    ///     long flags;          /* marks which fields in this structure are defined */
    ///     Bool input;          /* does this application rely on the window manager to
    ///                             get keyboard input? */
    ///     int initial_state;   /* see below */
    ///     Pixmap icon_pixmap;  /* pixmap to be used as icon */
    ///     Window icon_window;  /* window to be used as icon */
    ///     int icon_x, icon_y;  /* initial position of icon */
    ///     Pixmap icon_mask;    /* pixmap to be used as mask for icon_pixmap */
    ///     XID window_group;    /* id of related window group */
    ///     /* this structure may be extended in the future */
    /// } XWMHints;
    /// ```
    pub fn try_from_bytes(raw: &[u32]) -> Result<Self> {
        if raw.len() != 9 {
            return Err(Error::InvalidPropertyData(format!(
                "raw bytes should be [u32; 9] for WmHints, got [u32; {}]",
                raw.len()
            )));
        }

        let flags = WmHintsFlags::from_bits_truncate(raw[0]);
        let accepts_input = !flags.contains(WmHintsFlags::INPUT_HINT) || raw[1] > 0;
        let initial_state = match (flags.contains(WmHintsFlags::STATE_HINT), raw[2]) {
            (true, 0) => WindowState::Withdrawn,
            (true, 1) | (false, _) => WindowState::Normal,
            (true, 2) => WindowState::Iconic,
            (_, s) => {
                return Err(Error::InvalidPropertyData(format!(
                    "initial state should be 0, 1, 2: got {s}"
                )))
            }
        };

        let icon_win = if flags.contains(WmHintsFlags::ICON_WINDOW_HINT) && raw[4] > 0 {
            Some(Xid::from(raw[4]))
        } else {
            None
        };

        Ok(Self {
            flags,
            accepts_input,
            initial_state,
            icon_win,
        })
    }

    /// Whether this window asked to start its life withdrawn.
    ///
    /// Windows doing this are standalone dock apps waiting to be swallowed
    /// by a dock: not something for the window manager to decorate.
    pub fn requests_withdrawn_start(&self) -> bool {
        self.flags.contains(WmHintsFlags::STATE_HINT)
            && self.initial_state == WindowState::Withdrawn
    }
}

/// The window attributes the engine negotiates with before managing a window.
///
/// The border width actually lives on the window geometry rather than the
/// attributes in the X protocol, but every decision point that needs one
/// needs the other so they are fetched and carried together.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct WindowAttributes {
    /// Whether the window has asked not to be managed
    pub override_redirect: bool,
    /// The current map state of the window
    pub map_state: MapState,
    /// The width of the window's own border in pixels
    pub border_width: u32,
}

impl WindowAttributes {
    /// Create a new instance from component parts
    pub fn new(override_redirect: bool, map_state: MapState, border_width: u32) -> Self {
        Self {
            override_redirect,
            map_state,
            border_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    const NO_FLAGS: u32 = 0;
    const INPUT: u32 = 0b0000000001;
    const STATE: u32 = 0b0000000010;
    const ICON_WIN: u32 = 0b0000001000;

    #[test_case(&[NO_FLAGS, 0, 0, 0, 0, 0, 0, 0, 0], true; "input flag unset")]
    #[test_case(&[INPUT, 1, 0, 0, 0, 0, 0, 0, 0], true; "input flag set and requested")]
    #[test_case(&[INPUT, 0, 0, 0, 0, 0, 0, 0, 0], false; "input flag set and refused")]
    #[test]
    fn accepts_input_requires_an_explicit_refusal(raw: &[u32], expected: bool) {
        let hints = WmHints::try_from_bytes(raw).expect("valid hints");

        assert_eq!(hints.accepts_input, expected);
    }

    #[test_case(&[NO_FLAGS, 0, 0, 0, 0, 0, 0, 0, 0], WindowState::Normal; "state flag unset")]
    #[test_case(&[NO_FLAGS, 0, 2, 0, 0, 0, 0, 0, 0], WindowState::Normal; "state flag unset with stale data")]
    #[test_case(&[STATE, 0, 0, 0, 0, 0, 0, 0, 0], WindowState::Withdrawn; "withdrawn")]
    #[test_case(&[STATE, 0, 1, 0, 0, 0, 0, 0, 0], WindowState::Normal; "normal")]
    #[test_case(&[STATE, 0, 2, 0, 0, 0, 0, 0, 0], WindowState::Iconic; "iconic")]
    #[test]
    fn initial_state_is_only_read_when_flagged(raw: &[u32], expected: WindowState) {
        let hints = WmHints::try_from_bytes(raw).expect("valid hints");

        assert_eq!(hints.initial_state, expected);
    }

    #[test_case(&[0, 0, 0, 0, 0, 0, 0, 0]; "too short")]
    #[test_case(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0]; "too long")]
    #[test_case(&[STATE, 0, 42, 0, 0, 0, 0, 0, 0]; "unknown initial state")]
    #[test]
    fn invalid_hints_are_rejected(raw: &[u32]) {
        assert!(WmHints::try_from_bytes(raw).is_err());
    }

    #[test_case(&[ICON_WIN, 0, 0, 0, 123, 0, 0, 0, 0], Some(Xid(123)); "flagged and set")]
    #[test_case(&[ICON_WIN, 0, 0, 0, 0, 0, 0, 0, 0], None; "flagged but zero")]
    #[test_case(&[NO_FLAGS, 0, 0, 0, 123, 0, 0, 0, 0], None; "unflagged")]
    #[test]
    fn icon_windows_require_the_flag_and_a_real_id(raw: &[u32], expected: Option<Xid>) {
        let hints = WmHints::try_from_bytes(raw).expect("valid hints");

        assert_eq!(hints.icon_win, expected);
    }

    #[test]
    fn unknown_flag_bits_are_ignored() {
        let hints = WmHints::try_from_bytes(&[0b1010000000, 0, 0, 0, 0, 0, 0, 0, 0]);

        assert!(hints.is_ok());
    }

    #[test_case(&[STATE, 0, 0, 0, 0, 0, 0, 0, 0], true; "withdrawn start")]
    #[test_case(&[STATE, 0, 1, 0, 0, 0, 0, 0, 0], false; "normal start")]
    #[test_case(&[NO_FLAGS, 0, 0, 0, 0, 0, 0, 0, 0], false; "no state hint")]
    #[test]
    fn withdrawn_start_needs_the_state_hint(raw: &[u32], expected: bool) {
        let hints = WmHints::try_from_bytes(raw).expect("valid hints");

        assert_eq!(hints.requests_withdrawn_start(), expected);
    }
}
