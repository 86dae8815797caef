//! Logic for interacting with the X server
use crate::{
    core::{State, Xid},
    frame::Frame,
    pure::{
        geometry::{Point, Rect, Strut},
        screen::{Client, Screen, StackLayer},
    },
    Error, Result,
};
use std::{collections::HashSet, str::FromStr};
use tracing::{error, info, trace};

pub mod atom;
pub mod event;
pub mod ewmh;
pub mod mock;
pub mod property;

pub use atom::Atom;
pub use event::XEvent;
pub use property::{Prop, WindowAttributes};

use property::{MapState, WmHints};

/// The window types this crate creates for its own purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinType {
    /// A hidden marker window advertising an EWMH compliant window manager
    CheckWin,
    /// An invisible window that can hold the input focus
    InputOnly,
    /// A visible window with the given background color
    InputOutput {
        /// Background color as a 24bit hex value
        background: u32,
    },
}

/// Configuration options for X windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientConfig {
    /// The border width in pixels
    BorderPx(u32),
    /// Absolute size and position on the screen
    Position(Rect),
    /// Stack the window directly below another window
    StackBelow(Xid),
}

/// Attributes for an X window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientAttr {
    /// The event mask used for managed client windows
    ClientEventMask,
    /// Stop all event reporting for the window
    NoEvents,
}

/// A handle on a running X11 connection that we can use for issuing X requests.
///
/// XConn is intended as an abstraction layer to allow for communication with the
/// underlying display system (assumed to be X) using a relatively simple API that
/// provides the minimal set of functionality required by this crate.
pub trait XConn {
    /// The number of screens known to the underlying connection
    fn screen_count(&self) -> usize;

    /// The root window of the given screen
    fn root(&self, screen: usize) -> Result<Xid>;

    /// The pixel dimensions of the given screen
    fn screen_geometry(&self, screen: usize) -> Result<Rect>;

    /// Select the substructure redirection events on the given root window.
    ///
    /// Only one client may hold this selection per root: an [Error::WmConflict]
    /// is returned if another window manager is already running.
    fn become_window_manager(&self, root: Xid) -> Result<()>;

    /// Stop listening for events on the given root window
    fn release_window_manager(&self, root: Xid) -> Result<()>;

    /// Prevent other clients from mutating the server until the matching ungrab
    fn grab_server(&self) -> Result<()>;

    /// Release a previously acquired server grab
    fn ungrab_server(&self) -> Result<()>;

    /// Block until the next event from the X event loop is ready then return it.
    ///
    /// Events with no window management significance are returned as `None`.
    fn next_event(&self) -> Result<Option<XEvent>>;

    /// Flush any pending events to the X server
    fn flush(&self) -> bool;

    /// Look up the id for a given atom name, interning it if it is unknown
    fn intern_atom(&self, atom: &str) -> Result<Xid>;

    /// Look up the name of a given atom id
    fn atom_name(&self, xid: Xid) -> Result<String>;

    /// The current child windows of the given root window, oldest first
    fn existing_clients(&self, root: Xid) -> Result<Vec<Xid>>;

    /// The current size and position of the given window
    fn client_geometry(&self, client: Xid) -> Result<Rect>;

    /// Create a new window under the given parent, optionally mapping it as well
    fn create_window(&self, ty: WinType, parent: Xid, r: Rect, mapped: bool) -> Result<Xid>;

    /// Destroy the given window
    fn destroy_window(&self, client: Xid) -> Result<()>;

    /// Map the given window to the screen
    fn map(&self, client: Xid) -> Result<()>;

    /// Unmap the given window from the screen
    fn unmap(&self, client: Xid) -> Result<()>;

    /// Reparent the given client inside of `new_parent` at the given offset
    fn reparent(&self, client: Xid, new_parent: Xid, p: Point) -> Result<()>;

    /// Add the given client to the save-set so it survives us crashing
    fn add_to_save_set(&self, client: Xid) -> Result<()>;

    /// Remove the given client from the save-set
    fn remove_from_save_set(&self, client: Xid) -> Result<()>;

    /// Assign the keyboard input focus to the given window
    fn focus(&self, client: Xid) -> Result<()>;

    /// Set the default cursor displayed over the given root window
    fn set_root_cursor(&self, root: Xid) -> Result<()>;

    /// Ask the given client to close itself using the WM_DELETE_WINDOW protocol
    fn send_close(&self, client: Xid) -> Result<()>;

    /// Fetch and parse the requested property of the given window
    fn get_prop(&self, client: Xid, prop_name: &str) -> Result<Option<Prop>>;

    /// Replace the requested property of the given window
    fn set_prop(&self, client: Xid, name: &str, val: Prop) -> Result<()>;

    /// Remove the requested property from the given window
    fn delete_prop(&self, client: Xid, name: &str) -> Result<()>;

    /// Fetch the [WindowAttributes] of the given window
    fn get_window_attributes(&self, client: Xid) -> Result<WindowAttributes>;

    /// Apply the requested attributes to the given window
    fn set_client_attributes(&self, client: Xid, attrs: &[ClientAttr]) -> Result<()>;

    /// Apply the requested config options to the given window
    fn set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()>;
}

// A server grab that releases itself when dropped, so early returns in the
// middle of a manage sequence can not leave the server locked.
struct ServerGrab<'a, X: XConn> {
    x: &'a X,
}

impl<'a, X: XConn> ServerGrab<'a, X> {
    fn new(x: &'a X) -> Result<Self> {
        x.grab_server()?;

        Ok(Self { x })
    }
}

impl<'a, X: XConn> Drop for ServerGrab<'a, X> {
    fn drop(&mut self) {
        if let Err(e) = self.x.ungrab_server() {
            error!(%e, "unable to release server grab");
        }
    }
}

/// Extended functionality for any [XConn] implementation: this is where the
/// window management logic itself lives.
///
/// Methods are provided with default implementations in terms of the base
/// [XConn] API so that a backend only needs to supply the raw X requests.
pub trait XConnExt: XConn + Sized {
    /// Take ownership of a single screen and publish its initial protocol state.
    ///
    /// If another window manager already owns the root window the screen is
    /// left with its `managed` flag unset rather than returning an error:
    /// callers are expected to check the flag before driving the screen.
    fn initialize_screen(&self, screen: &mut Screen, desktop_names: &[String]) -> Result<()> {
        if let Err(e) = self.become_window_manager(screen.root) {
            error!(screen = screen.index, %e, "unable to manage screen");
            screen.managed = false;

            return Ok(());
        }
        screen.managed = true;

        info!(screen = screen.index, geometry = %screen.geometry, "managing screen");

        ewmh::set_pid(screen, self)?;
        self.set_root_cursor(screen.root)?;

        let w = self.create_window(WinType::CheckWin, screen.root, Rect::new(0, 0, 1, 1), false)?;
        screen.support_win = Some(w);
        ewmh::set_support_window(screen, self)?;
        ewmh::set_supported(screen, self)?;
        ewmh::set_desktop_geometry(screen, self)?;
        ewmh::set_desktop_names(desktop_names, screen, self)?;

        // Focus is parked here whenever no client holds it, so the input
        // focus can never revert to PointerRoot
        let r = Rect::new(-100, -100, 1, 1);
        let w = self.create_window(WinType::InputOnly, screen.root, r, true)?;
        screen.focus_win = Some(w);

        ewmh::set_client_lists(screen, self)?;
        ewmh::set_work_area(screen, self)?;

        Ok(())
    }

    /// Manage every viable pre-existing child of each managed root window.
    ///
    /// Windows that are override-redirect, currently unmapped, or named as
    /// the icon window of another child (a dock app surrogate) are skipped.
    fn discover_existing(&self, state: &mut State<Self>) -> Result<()> {
        let indices: Vec<usize> = state
            .screens
            .iter()
            .filter(|s| s.managed)
            .map(|s| s.index)
            .collect();

        for screen in indices {
            let root = state.screens[screen].root;
            let children = self.existing_clients(root)?;

            // Dock apps hand an icon window to their dock via WM_HINTS: that
            // surrogate belongs to the dock, not to us
            let mut surrogates = HashSet::new();
            for &id in children.iter() {
                if let Ok(Some(hints)) = self.window_hints(id) {
                    if let Some(icon) = hints.icon_win {
                        if icon != id {
                            surrogates.insert(icon);
                        }
                    }
                }
            }

            for id in children {
                if surrogates.contains(&id) {
                    trace!(%id, "skipping dock app icon window");
                    continue;
                }

                // The window may have closed while we were enumerating
                let attrs = match self.get_window_attributes(id) {
                    Ok(attrs) => attrs,
                    Err(_) => continue,
                };

                if attrs.override_redirect || attrs.map_state == MapState::Unmapped {
                    continue;
                }

                self.manage(id, screen, state)?;
            }
        }

        Ok(())
    }

    /// Release a managed screen: unmanage all remaining clients and destroy
    /// the windows created during [initialize_screen][XConnExt::initialize_screen].
    fn teardown_screen(&self, screen: usize, state: &mut State<Self>) -> Result<()> {
        if !state.screens[screen].managed {
            return Ok(());
        }

        self.release_window_manager(state.screens[screen].root)?;

        // unmanage mutates the client set so always pull the current front
        while let Some(client) = state.screens[screen].clients.front().map(|c| c.id) {
            self.unmanage(client, state)?;
        }

        if let Some(id) = state.screens[screen].support_win.take() {
            self.destroy_window(id)?;
        }
        if let Some(id) = state.screens[screen].focus_win.take() {
            self.destroy_window(id)?;
        }

        Ok(())
    }

    /// Accept a window for management on the given screen.
    ///
    /// The window is wrapped in a newly created [Frame], raised to the front
    /// of its stacking layer and announced through the root window properties.
    /// Windows that request a withdrawn initial state are left alone.
    fn manage(&self, client: Xid, screen: usize, state: &mut State<Self>) -> Result<()> {
        if state.owning_client(client).is_some() {
            return Ok(());
        }

        let (root, managed) = match state.screens.get(screen) {
            Some(s) => (s.root, s.managed),
            None => return Err(Error::UnknownScreen { index: screen }),
        };
        if !managed {
            return Ok(());
        }

        let hints = self.window_hints(client)?;
        if hints.map(|h| h.requests_withdrawn_start()).unwrap_or(false) {
            trace!(%client, "window requested a withdrawn start: leaving it for its dock");
            return Ok(());
        }

        trace!(%client, "managing new window");
        let grab = ServerGrab::new(self)?;

        self.set_client_attributes(client, &[ClientAttr::ClientEventMask])?;
        let attrs = self.get_window_attributes(client)?;
        let r = self.client_geometry(client)?;
        let (layer, normal) = self.window_layer(client)?;
        let strut = self.window_strut(client)?.unwrap_or_default();

        if attrs.map_state == MapState::Viewable {
            // Reparenting a viewable window generates an UnmapNotify that must
            // not be mistaken for the client withdrawing itself
            state
                .pending_unmap
                .entry(client)
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }

        self.set_client_config(client, &[ClientConfig::BorderPx(0)])?;
        self.add_to_save_set(client)?;

        let frame = Frame::new(self, client, r, root, &state.theme)?;
        state.window_map.insert(client, client);
        for id in frame.windows() {
            state.window_map.insert(id, client);
        }

        frame.show(self)?;
        drop(grab);

        let accepts_input = hints.map(|h| h.accepts_input).unwrap_or(true);
        state.screens[screen].clients.insert(Client {
            id: client,
            screen,
            layer,
            normal,
            accepts_input,
            strut,
            border_width: attrs.border_width,
            frame,
        });

        self.apply_restack(&state.screens[screen])?;
        ewmh::set_client_lists(&state.screens[screen], self)?;

        if strut != Strut::default() {
            let before = state.screens[screen].strut;
            state.screens[screen].update_strut();
            if state.screens[screen].strut != before {
                ewmh::set_work_area(&state.screens[screen], self)?;
            }
        }

        set_grabs(true, client, state, self);

        if normal {
            self.focus_client(client, state)?;
        }

        notify_managed(client, state, self);
        info!(%client, "managed new client");

        Ok(())
    }

    /// Return a managed window to its unmanaged state.
    ///
    /// The mirror image of [manage][XConnExt::manage]: focus is handed to the
    /// next focus candidate (or parked on the focus sink), the decoration is
    /// destroyed, the client border restored and the root properties updated.
    fn unmanage(&self, client: Xid, state: &mut State<Self>) -> Result<()> {
        let screen = match state.screen_containing(client) {
            Some(index) => index,
            None => return Ok(()),
        };

        notify_unmanaged(client, state, self);
        set_grabs(false, client, state, self);

        let c = match state.screens[screen].clients.remove(client) {
            Some(c) => c,
            None => return Ok(()),
        };

        if state.focused == Some(client) {
            let next = state.screens[screen]
                .clients
                .first_focus_candidate()
                .map(|c| c.id);

            match next {
                Some(id) => self.focus_client(id, state)?,
                None => self.clear_focus(screen, state)?,
            }
        }

        state.window_map.remove(&client);
        for id in c.frame.windows() {
            state.window_map.remove(&id);
        }

        self.remove_from_save_set(client)?;
        self.set_client_attributes(client, &[ClientAttr::NoEvents])?;
        c.frame.hide(self)?;
        c.frame.destroy(self, state.screens[screen].root)?;
        self.set_client_config(client, &[ClientConfig::BorderPx(c.border_width)])?;

        state.pending_unmap.remove(&client);
        ewmh::set_client_lists(&state.screens[screen], self)?;

        if c.strut != Strut::default() {
            let before = state.screens[screen].strut;
            state.screens[screen].update_strut();
            if state.screens[screen].strut != before {
                ewmh::set_work_area(&state.screens[screen], self)?;
            }
        }

        info!(%client, "unmanaged client");

        Ok(())
    }

    /// Impose the screen's stacking order on the X server and republish it.
    ///
    /// The frame at the front of the order is left where it is and every
    /// subsequent frame is stacked directly below its predecessor.
    fn apply_restack(&self, screen: &Screen) -> Result<()> {
        let ids = screen.clients.stacking_frame_ids();

        if let [anchor, rest @ ..] = ids.as_slice() {
            let mut above = *anchor;
            for &id in rest {
                self.set_client_config(id, &[ClientConfig::StackBelow(above)])?;
                above = id;
            }
        }

        ewmh::set_stacking_list(screen, self)
    }

    /// Record a new strut for the given client and republish the work area
    /// if the screen's aggregate strut changed as a result.
    fn update_client_strut(&self, client: Xid, strut: Strut, state: &mut State<Self>) -> Result<()> {
        let screen = match state.screen_containing(client) {
            Some(index) => index,
            None => return Ok(()),
        };

        if !state.screens[screen].clients.set_strut(client, strut) {
            return Ok(());
        }

        let before = state.screens[screen].strut;
        state.screens[screen].update_strut();
        if state.screens[screen].strut != before {
            ewmh::set_work_area(&state.screens[screen], self)?;
        }

        Ok(())
    }

    /// Assign the input focus to the given client and publish it as the
    /// active window.
    ///
    /// Clients that have declined input through their hints are skipped.
    fn focus_client(&self, client: Xid, state: &mut State<Self>) -> Result<()> {
        let screen = match state.screen_containing(client) {
            Some(index) => index,
            None => {
                trace!(%client, "refusing to focus an unmanaged window");
                return Ok(());
            }
        };

        let accepts_input = state.screens[screen]
            .clients
            .get(client)
            .map(|c| c.accepts_input)
            .unwrap_or(false);

        if !accepts_input {
            return Ok(());
        }

        self.focus(client)?;
        state.focused = Some(client);

        ewmh::set_active_window(Some(client), &state.screens[screen], self)
    }

    /// Park the input focus on the screen's focus sink and announce that no
    /// window is active.
    fn clear_focus(&self, screen: usize, state: &mut State<Self>) -> Result<()> {
        if let Some(sink) = state.screens[screen].focus_sink() {
            self.focus(sink)?;
        }
        state.focused = None;

        ewmh::set_active_window(None, &state.screens[screen], self)
    }

    /// Fetch and parse the WM_HINTS property of the given window
    fn window_hints(&self, client: Xid) -> Result<Option<WmHints>> {
        match self.get_prop(client, Atom::WmHints.as_ref())? {
            Some(Prop::WmHints(hints)) => Ok(Some(hints)),
            _ => Ok(None),
        }
    }

    /// Determine the stacking layer for a window from its declared type along
    /// with whether it is a "normal" window eligible for default focus.
    fn window_layer(&self, client: Xid) -> Result<(StackLayer, bool)> {
        if let Some(Prop::Atom(types)) = self.get_prop(client, Atom::NetWmWindowType.as_ref())? {
            for ty in types.iter() {
                match Atom::from_str(ty) {
                    Ok(Atom::NetWindowTypeDesktop) => return Ok((StackLayer::Desktop, false)),
                    Ok(Atom::NetWindowTypeDock) => return Ok((StackLayer::Dock, false)),
                    Ok(Atom::NetWindowTypeSplash) => return Ok((StackLayer::Normal, false)),
                    _ => (),
                }
            }
        }

        Ok((StackLayer::Normal, true))
    }

    /// Fetch and parse the strut property of the given window
    fn window_strut(&self, client: Xid) -> Result<Option<Strut>> {
        match self.get_prop(client, Atom::NetWmStrut.as_ref())? {
            Some(Prop::Cardinal(vals)) => Ok(Strut::from_cardinals(&vals)),
            _ => Ok(None),
        }
    }
}

// Auto impl XConnExt for all XConn impls
impl<T> XConnExt for T where T: XConn {}

fn notify_managed<X: XConn>(client: Xid, state: &mut State<X>, x: &X) {
    let mut hook = state.config.lifecycle_hook.take();
    if let Some(ref mut h) = hook {
        trace!(%client, "running user lifecycle hook");
        if let Err(e) = h.managed(client, state, x) {
            error!(%e, "error returned from user lifecycle hook");
        }
    }
    state.config.lifecycle_hook = hook;
}

fn notify_unmanaged<X: XConn>(client: Xid, state: &mut State<X>, x: &X) {
    let mut hook = state.config.lifecycle_hook.take();
    if let Some(ref mut h) = hook {
        trace!(%client, "running user lifecycle hook");
        if let Err(e) = h.unmanaged(client, state, x) {
            error!(%e, "error returned from user lifecycle hook");
        }
    }
    state.config.lifecycle_hook = hook;
}

fn set_grabs<X: XConn>(install: bool, client: Xid, state: &mut State<X>, x: &X) {
    let mut hook = state.config.grab_hook.take();
    if let Some(ref mut h) = hook {
        trace!(%client, install, "running user grab hook");
        if let Err(e) = h.call(client, install, state, x) {
            error!(%e, "error returned from user grab hook");
        }
    }
    state.config.grab_hook = hook;
}
