//! Data types for working with X atoms
use strum::{AsRefStr, EnumIter, EnumString};

/// An internal representation of the X atoms the engine cares about.
///
/// Atom names are shared between all X11 API libraries so this enum allows us
/// to get a little bit of type safety around their use. Implementors of
/// [XConn][1] should accept any variant of [Atom] that they are passed by
/// client code.
///
/// [1]: crate::x::XConn
#[derive(AsRefStr, EnumString, EnumIter, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Atom {
    /// ATOM
    #[strum(serialize = "ATOM")]
    Atom,
    /// CARDINAL
    #[strum(serialize = "CARDINAL")]
    Cardinal,
    /// WINDOW
    #[strum(serialize = "WINDOW")]
    Window,
    /// UTF8_STRING
    #[strum(serialize = "UTF8_STRING")]
    UTF8String,
    /// WM_DELETE_WINDOW
    #[strum(serialize = "WM_DELETE_WINDOW")]
    WmDeleteWindow,
    /// WM_HINTS
    #[strum(serialize = "WM_HINTS")]
    WmHints,
    /// WM_NAME
    #[strum(serialize = "WM_NAME")]
    WmName,
    /// WM_PROTOCOLS
    #[strum(serialize = "WM_PROTOCOLS")]
    WmProtocols,
    /// WM_STATE
    #[strum(serialize = "WM_STATE")]
    WmState,
    /// _NET_ACTIVE_WINDOW
    #[strum(serialize = "_NET_ACTIVE_WINDOW")]
    NetActiveWindow,
    /// _NET_CLIENT_LIST
    #[strum(serialize = "_NET_CLIENT_LIST")]
    NetClientList,
    /// _NET_CLIENT_LIST_STACKING
    #[strum(serialize = "_NET_CLIENT_LIST_STACKING")]
    NetClientListStacking,
    /// _NET_CLOSE_WINDOW
    #[strum(serialize = "_NET_CLOSE_WINDOW")]
    NetCloseWindow,
    /// _NET_DESKTOP_GEOMETRY
    #[strum(serialize = "_NET_DESKTOP_GEOMETRY")]
    NetDesktopGeometry,
    /// _NET_DESKTOP_NAMES
    #[strum(serialize = "_NET_DESKTOP_NAMES")]
    NetDesktopNames,
    /// _NET_DESKTOP_VIEWPORT
    #[strum(serialize = "_NET_DESKTOP_VIEWPORT")]
    NetDesktopViewport,
    /// _NET_SUPPORTED
    #[strum(serialize = "_NET_SUPPORTED")]
    NetSupported,
    /// _NET_SUPPORTING_WM_CHECK
    #[strum(serialize = "_NET_SUPPORTING_WM_CHECK")]
    NetSupportingWmCheck,
    /// _NET_WM_ICON_NAME
    #[strum(serialize = "_NET_WM_ICON_NAME")]
    NetWmIconName,
    /// _NET_WM_NAME
    #[strum(serialize = "_NET_WM_NAME")]
    NetWmName,
    /// _NET_WM_STATE
    #[strum(serialize = "_NET_WM_STATE")]
    NetWmState,
    /// _NET_WM_STRUT
    #[strum(serialize = "_NET_WM_STRUT")]
    NetWmStrut,
    /// _NET_WM_VISIBLE_ICON_NAME
    #[strum(serialize = "_NET_WM_VISIBLE_ICON_NAME")]
    NetWmVisibleIconName,
    /// _NET_WM_VISIBLE_NAME
    #[strum(serialize = "_NET_WM_VISIBLE_NAME")]
    NetWmVisibleName,
    /// _NET_WM_WINDOW_TYPE
    #[strum(serialize = "_NET_WM_WINDOW_TYPE")]
    NetWmWindowType,
    /// _NET_WORKAREA
    #[strum(serialize = "_NET_WORKAREA")]
    NetWorkarea,
    /// _OXBOW_PID
    #[strum(serialize = "_OXBOW_PID")]
    OxbowPid,

    // Window states
    /// _NET_WM_STATE_MODAL
    #[strum(serialize = "_NET_WM_STATE_MODAL")]
    NetWmStateModal,
    /// _NET_WM_STATE_MAXIMIZED_VERT
    #[strum(serialize = "_NET_WM_STATE_MAXIMIZED_VERT")]
    NetWmStateMaximizedVert,
    /// _NET_WM_STATE_MAXIMIZED_HORZ
    #[strum(serialize = "_NET_WM_STATE_MAXIMIZED_HORZ")]
    NetWmStateMaximizedHorz,
    /// _NET_WM_STATE_SHADED
    #[strum(serialize = "_NET_WM_STATE_SHADED")]
    NetWmStateShaded,
    /// _NET_WM_STATE_SKIP_TASKBAR
    #[strum(serialize = "_NET_WM_STATE_SKIP_TASKBAR")]
    NetWmStateSkipTaskbar,
    /// _NET_WM_STATE_SKIP_PAGER
    #[strum(serialize = "_NET_WM_STATE_SKIP_PAGER")]
    NetWmStateSkipPager,
    /// _NET_WM_STATE_HIDDEN
    #[strum(serialize = "_NET_WM_STATE_HIDDEN")]
    NetWmStateHidden,
    /// _NET_WM_STATE_FULLSCREEN
    #[strum(serialize = "_NET_WM_STATE_FULLSCREEN")]
    NetWmStateFullscreen,
    /// _NET_WM_STATE_ABOVE
    #[strum(serialize = "_NET_WM_STATE_ABOVE")]
    NetWmStateAbove,
    /// _NET_WM_STATE_BELOW
    #[strum(serialize = "_NET_WM_STATE_BELOW")]
    NetWmStateBelow,

    // Window types
    /// _NET_WM_WINDOW_TYPE_DESKTOP
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DESKTOP")]
    NetWindowTypeDesktop,
    /// _NET_WM_WINDOW_TYPE_DOCK
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DOCK")]
    NetWindowTypeDock,
    /// _NET_WM_WINDOW_TYPE_TOOLBAR
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_TOOLBAR")]
    NetWindowTypeToolbar,
    /// _NET_WM_WINDOW_TYPE_MENU
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_MENU")]
    NetWindowTypeMenu,
    /// _NET_WM_WINDOW_TYPE_UTILITY
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_UTILITY")]
    NetWindowTypeUtility,
    /// _NET_WM_WINDOW_TYPE_SPLASH
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_SPLASH")]
    NetWindowTypeSplash,
    /// _NET_WM_WINDOW_TYPE_DIALOG
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DIALOG")]
    NetWindowTypeDialog,
    /// _NET_WM_WINDOW_TYPE_NORMAL
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_NORMAL")]
    NetWindowTypeNormal,
}

/// The capabilities advertised in _NET_SUPPORTED.
///
/// This is an explicit allow-list: anything not present here is not claimed
/// as supported, even when the engine publishes or reads the atom for its
/// own purposes (_NET_SUPPORTED and _NET_SUPPORTING_WM_CHECK themselves
/// being the obvious cases).
pub const EWMH_SUPPORTED_ATOMS: &[Atom] = &[
    Atom::NetDesktopGeometry,
    Atom::NetDesktopViewport,
    Atom::NetActiveWindow,
    Atom::NetWorkarea,
    Atom::NetClientList,
    Atom::NetClientListStacking,
    Atom::NetDesktopNames,
    Atom::NetCloseWindow,
    Atom::NetWmName,
    Atom::NetWmVisibleName,
    Atom::NetWmIconName,
    Atom::NetWmVisibleIconName,
    Atom::NetWmStrut,
    Atom::NetWmWindowType,
    Atom::NetWindowTypeDesktop,
    Atom::NetWindowTypeDock,
    Atom::NetWindowTypeToolbar,
    Atom::NetWindowTypeMenu,
    Atom::NetWindowTypeUtility,
    Atom::NetWindowTypeSplash,
    Atom::NetWindowTypeDialog,
    Atom::NetWindowTypeNormal,
    Atom::NetWmState,
    Atom::NetWmStateModal,
    Atom::NetWmStateMaximizedVert,
    Atom::NetWmStateMaximizedHorz,
    Atom::NetWmStateShaded,
    Atom::NetWmStateSkipTaskbar,
    Atom::NetWmStateSkipPager,
    Atom::NetWmStateHidden,
    Atom::NetWmStateFullscreen,
    Atom::NetWmStateAbove,
    Atom::NetWmStateBelow,
];
