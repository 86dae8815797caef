//! Synchronization of root window properties with internal screen state.
//!
//! These properties are the externally observable contract of the window
//! manager: pagers, taskbars and other desktop components read them live, so
//! every mutation of the client set or stacking order must be followed by a
//! call to the matching function here before control returns to the event
//! loop.
use crate::{
    pure::{geometry::Rect, screen::Screen},
    x::{
        atom::{Atom, EWMH_SUPPORTED_ATOMS},
        Prop, XConn,
    },
    Result, Xid,
};

const WM_NAME: &str = "oxbow";

/// Publish our process id so external tools can locate the running instance.
pub fn set_pid<X: XConn>(screen: &Screen, x: &X) -> Result<()> {
    let pid = std::process::id();

    x.set_prop(
        screen.root,
        Atom::OxbowPid.as_ref(),
        Prop::Cardinal(vec![pid]),
    )
}

/// Point `_NET_SUPPORTING_WM_CHECK` on the root at the support window and
/// name ourselves on the support window itself.
pub fn set_support_window<X: XConn>(screen: &Screen, x: &X) -> Result<()> {
    let support = match screen.support_window() {
        Some(id) => id,
        None => return Ok(()),
    };

    let check = Atom::NetSupportingWmCheck.as_ref();
    x.set_prop(screen.root, check, Prop::Window(vec![support]))?;
    x.set_prop(support, check, Prop::Window(vec![support]))?;
    x.set_prop(
        support,
        Atom::NetWmName.as_ref(),
        Prop::UTF8String(vec![WM_NAME.to_string()]),
    )
}

/// Advertise the protocol features we implement.
///
/// Only the atoms in [EWMH_SUPPORTED_ATOMS] are claimed: anything not on
/// that list is explicitly unsupported.
pub fn set_supported<X: XConn>(screen: &Screen, x: &X) -> Result<()> {
    let atoms = EWMH_SUPPORTED_ATOMS
        .iter()
        .map(|a| a.as_ref().to_string())
        .collect();

    x.set_prop(screen.root, Atom::NetSupported.as_ref(), Prop::Atom(atoms))
}

/// Publish the screen dimensions and a fixed (0, 0) viewport.
pub fn set_desktop_geometry<X: XConn>(screen: &Screen, x: &X) -> Result<()> {
    let Rect { w, h, .. } = screen.geometry;

    x.set_prop(
        screen.root,
        Atom::NetDesktopGeometry.as_ref(),
        Prop::Cardinal(vec![w, h]),
    )?;
    x.set_prop(
        screen.root,
        Atom::NetDesktopViewport.as_ref(),
        Prop::Cardinal(vec![0, 0]),
    )
}

/// Publish the configured desktop names.
pub fn set_desktop_names<X: XConn>(names: &[String], screen: &Screen, x: &X) -> Result<()> {
    x.set_prop(
        screen.root,
        Atom::NetDesktopNames.as_ref(),
        Prop::UTF8String(names.to_vec()),
    )
}

/// Publish the managed client list in management order, then the stacking
/// list as well: the two always change together.
///
/// The ids published are the decoration frame ids, as those are the windows
/// other clients can see.
pub fn set_client_lists<X: XConn>(screen: &Screen, x: &X) -> Result<()> {
    x.set_prop(
        screen.root,
        Atom::NetClientList.as_ref(),
        Prop::Window(screen.clients.frame_ids()),
    )?;

    set_stacking_list(screen, x)
}

/// Publish the stacking order, front to back.
pub fn set_stacking_list<X: XConn>(screen: &Screen, x: &X) -> Result<()> {
    x.set_prop(
        screen.root,
        Atom::NetClientListStacking.as_ref(),
        Prop::Window(screen.clients.stacking_frame_ids()),
    )
}

/// Publish the usable work area (screen geometry minus the aggregate strut).
pub fn set_work_area<X: XConn>(screen: &Screen, x: &X) -> Result<()> {
    let r = screen.work_area();

    x.set_prop(
        screen.root,
        Atom::NetWorkarea.as_ref(),
        Prop::Cardinal(vec![r.x as u32, r.y as u32, r.w, r.h]),
    )
}

/// Publish the currently focused client, or zero when no client holds focus.
///
/// The raw client window id is published here rather than the frame id, as
/// this is the window other clients name in their own requests.
pub fn set_active_window<X: XConn>(active: Option<Xid>, screen: &Screen, x: &X) -> Result<()> {
    let id = active.unwrap_or(Xid(0));

    x.set_prop(
        screen.root,
        Atom::NetActiveWindow.as_ref(),
        Prop::Window(vec![id]),
    )
}
