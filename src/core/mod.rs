//! Core data structures and the window manager runtime
use crate::{
    handle,
    pure::screen::Screen,
    theme::{self, Theme},
    x::{XConn, XConnExt, XEvent},
    Error, Result,
};
use nix::sys::signal::{signal, SigHandler, Signal};
use std::{collections::HashMap, fmt, ops::Deref};
use tracing::{error, info, trace};

pub mod hooks;

use hooks::{GrabHook, LifecycleHook};

/// An X11 ID for a given resource
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Xid(pub(crate) u32);

impl fmt::Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<Xid> for u32 {
    fn from(id: Xid) -> Self {
        id.0
    }
}

/// User level configuration for a [WindowManager]
#[derive(Debug)]
pub struct Config<X>
where
    X: XConn,
{
    /// Path to a TOML [Theme][crate::theme::Theme] file used to size the
    /// decoration windows. The hard coded fallback path is tried when this
    /// is unset or fails to load; only a configured theme that can not be
    /// loaded at all is fatal.
    pub theme_path: Option<String>,
    /// The names published for the virtual desktops
    pub desktop_names: Vec<String>,
    /// Hook called when a client joins or leaves the managed set
    pub lifecycle_hook: Option<Box<dyn LifecycleHook<X>>>,
    /// Hook called to install or remove input grabs for a client
    pub grab_hook: Option<Box<dyn GrabHook<X>>>,
}

impl<X: XConn> Default for Config<X> {
    fn default() -> Self {
        Config {
            theme_path: None,
            desktop_names: vec!["1".to_string()],
            lifecycle_hook: None,
            grab_hook: None,
        }
    }
}

/// The mutable state tracked by a running [WindowManager].
///
/// Hooks are handed a mutable reference to this state alongside the active
/// [XConn] so they can inspect and modify the window manager while it runs.
#[derive(Debug)]
pub struct State<X>
where
    X: XConn,
{
    /// The user provided configuration
    pub config: Config<X>,
    /// The per screen client and stacking state
    pub screens: Vec<Screen>,
    pub(crate) window_map: HashMap<Xid, Xid>,
    pub(crate) focused: Option<Xid>,
    pub(crate) pending_unmap: HashMap<Xid, usize>,
    pub(crate) theme: Theme,
    pub(crate) running: bool,
}

impl<X: XConn> State<X> {
    /// The client window owning the given window, if the window is the
    /// client itself or any part of its decoration frame.
    pub fn owning_client(&self, id: Xid) -> Option<Xid> {
        self.window_map.get(&id).copied()
    }

    /// The index of the screen currently managing the given client
    pub fn screen_containing(&self, client: Xid) -> Option<usize> {
        self.screens.iter().position(|s| s.clients.contains(client))
    }

    /// The client window currently holding the input focus, if any
    pub fn current_focus(&self) -> Option<Xid> {
        self.focused
    }

    /// Request a clean shutdown of the window manager.
    ///
    /// The event loop exits and every screen is torn down once the current
    /// event has been processed.
    pub fn shutdown(&mut self) {
        self.running = false;
    }

    pub(crate) fn screen_index_for_root(&self, root: Xid) -> Option<usize> {
        self.screens.iter().position(|s| s.root == root)
    }
}

/// A reparenting window manager engine driven by a given [XConn].
///
/// The manager owns one [Screen] per X screen on the display. Screens where
/// another window manager is already running are skipped rather than treated
/// as fatal: as long as at least one screen can be claimed,
/// [run][WindowManager::run] will drive it.
#[derive(Debug)]
pub struct WindowManager<X>
where
    X: XConn,
{
    x: X,
    /// The state tracked for each managed screen
    pub state: State<X>,
}

impl<X: XConn> WindowManager<X> {
    /// Construct a new [WindowManager] with the given config.
    ///
    /// The theme is loaded eagerly so that a broken theme file fails here
    /// rather than part way through claiming a screen.
    pub fn new(config: Config<X>, x: X) -> Result<Self> {
        let theme = theme::load_with_fallback(config.theme_path.as_deref())?;

        let mut screens = Vec::with_capacity(x.screen_count());
        for index in 0..x.screen_count() {
            let root = x.root(index)?;
            let geometry = x.screen_geometry(index)?;
            screens.push(Screen::new(index, root, geometry));
        }

        let state = State {
            config,
            screens,
            window_map: HashMap::new(),
            focused: None,
            pending_unmap: HashMap::new(),
            theme,
            running: false,
        };

        Ok(Self { x, state })
    }

    /// Claim each screen, manage the windows that already exist and then
    /// run the event loop until [shutdown][State::shutdown] is requested.
    ///
    /// Screens are torn down cleanly on a requested shutdown; an error from
    /// the X connection itself ends the loop immediately instead.
    #[tracing::instrument(level = "info", skip_all)]
    pub fn run(mut self) -> Result<()> {
        info!("starting window manager");

        // Children spawned by hooks are never waited on: ignore SIGCHLD so
        // they do not linger as zombies.
        // SAFETY: replacing the default disposition, no handler is dropped
        unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) }?;

        let desktop_names = self.state.config.desktop_names.clone();
        for screen in self.state.screens.iter_mut() {
            self.x.initialize_screen(screen, &desktop_names)?;
        }

        if !self.state.screens.iter().any(|s| s.managed) {
            return Err(Error::NoManagedScreens);
        }

        self.x.discover_existing(&mut self.state)?;
        self.x.flush();

        self.state.running = true;
        while self.state.running {
            if let Some(event) = self.x.next_event()? {
                trace!(%event, "got event from X server");
                if let Err(e) = self.handle_xevent(event) {
                    error!(%e, "error handling X event");
                }
                self.x.flush();
            }
        }

        self.teardown()
    }

    fn handle_xevent(&mut self, event: XEvent) -> Result<()> {
        use XEvent::*;

        match event {
            ClientMessage(m) => handle::client_message(m, &mut self.state, &self.x),
            ConfigureRequest(e) => handle::configure_request(e, &mut self.state, &self.x),
            Destroy(id) => handle::destroy(id, &mut self.state, &self.x),
            MapRequest(e) => handle::map_request(e, &mut self.state, &self.x),
            PropertyNotify(e) => handle::property_notify(e, &mut self.state, &self.x),
            UnmapNotify(id) => handle::unmap_notify(id, &mut self.state, &self.x),
        }
    }

    fn teardown(&mut self) -> Result<()> {
        info!("tearing down per screen state");
        for screen in 0..self.state.screens.len() {
            self.x.teardown_screen(screen, &mut self.state)?;
        }
        self.x.flush();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pure::geometry::Rect, x::mock::MockXConn};

    #[test]
    fn xids_display_as_their_numeric_value() {
        assert_eq!(Xid(42).to_string(), "42");
        assert_eq!(*Xid(42), 42);
        assert_eq!(Xid::from(7u32), Xid(7));
    }

    #[derive(Debug)]
    struct TwoScreenConn;

    impl MockXConn for TwoScreenConn {
        fn mock_screen_count(&self) -> usize {
            2
        }

        fn mock_root(&self, screen: usize) -> Result<Xid> {
            Ok(Xid(100 * (screen as u32 + 1)))
        }

        fn mock_screen_geometry(&self, screen: usize) -> Result<Rect> {
            Ok(Rect::new(0, 0, 1000 * (screen as u32 + 1), 800))
        }
    }

    fn temp_theme_path(name: &str) -> String {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, "border_width = 1\n").unwrap();

        path.to_string_lossy().into_owned()
    }

    #[test]
    fn a_screen_is_built_for_every_root() {
        let config = Config {
            theme_path: Some(temp_theme_path("oxbow-core-test-theme.toml")),
            ..Config::default()
        };
        let wm = WindowManager::new(config, TwoScreenConn).unwrap();

        assert_eq!(wm.state.screens.len(), 2);
        assert_eq!(wm.state.screens[0].root, Xid(100));
        assert_eq!(wm.state.screens[1].root, Xid(200));
        assert_eq!(wm.state.screens[1].geometry, Rect::new(0, 0, 2000, 800));
        assert_eq!(wm.state.theme.border_width, 1);

        // Nothing is claimed until run is called
        assert!(!wm.state.screens[0].managed);
        assert!(!wm.state.screens[1].managed);
    }
}
