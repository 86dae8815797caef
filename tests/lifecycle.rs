//! Tests driving a full window manager session against a scripted connection
use oxbow::{
    core::hooks::LifecycleHook,
    pure::geometry::Rect,
    x::{
        event::{ClientMessage, ClientMessageData, MapRequestEvent},
        mock::MockXConn,
        property::MapState,
        Prop, WindowAttributes, XConn, XEvent,
    },
    Config, Error, Result, State, WindowManager, Xid,
};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

fn xid(id: u32) -> Xid {
    Xid::from(id)
}

// Window ids created by the connection count up from 1000: the support and
// focus windows are made first, then 11 decoration windows per client with
// the outermost frame window leading. The first two managed clients are
// wrapped by frames 1002 and 1013.

#[derive(Debug, Default)]
struct ScriptedConn {
    conflict: bool,
    events: RefCell<VecDeque<XEvent>>,
    next_id: Cell<u32>,
    props: Rc<RefCell<Vec<(Xid, String, Prop)>>>,
    destroyed: Rc<RefCell<Vec<Xid>>>,
    closed: Rc<RefCell<Vec<Xid>>>,
    released: Rc<RefCell<Vec<Xid>>>,
}

impl ScriptedConn {
    fn new(events: Vec<XEvent>) -> Self {
        Self {
            events: RefCell::new(events.into()),
            next_id: Cell::new(1000),
            ..Default::default()
        }
    }

}

fn props_named(props: &RefCell<Vec<(Xid, String, Prop)>>, name: &str) -> Vec<Prop> {
    props
        .borrow()
        .iter()
        .filter(|(_, n, _)| n == name)
        .map(|(_, _, p)| p.clone())
        .collect()
}

impl MockXConn for ScriptedConn {
    fn mock_screen_geometry(&self, _screen: usize) -> Result<Rect> {
        Ok(Rect::new(0, 0, 800, 600))
    }

    fn mock_become_window_manager(&self, root: Xid) -> Result<()> {
        if self.conflict {
            Err(Error::WmConflict { root })
        } else {
            Ok(())
        }
    }

    fn mock_release_window_manager(&self, root: Xid) -> Result<()> {
        self.released.borrow_mut().push(root);

        Ok(())
    }

    fn mock_grab_server(&self) -> Result<()> {
        Ok(())
    }

    fn mock_ungrab_server(&self) -> Result<()> {
        Ok(())
    }

    fn mock_next_event(&self) -> Result<Option<XEvent>> {
        match self.events.borrow_mut().pop_front() {
            Some(event) => Ok(Some(event)),
            None => panic!("the event script ran dry before the manager shut down"),
        }
    }

    fn mock_intern_atom(&self, _atom: &str) -> Result<Xid> {
        Ok(xid(42))
    }

    fn mock_existing_clients(&self, _root: Xid) -> Result<Vec<Xid>> {
        Ok(vec![])
    }

    fn mock_client_geometry(&self, _client: Xid) -> Result<Rect> {
        Ok(Rect::new(50, 50, 200, 100))
    }

    fn mock_create_window(
        &self,
        _ty: oxbow::x::WinType,
        _parent: Xid,
        _r: Rect,
        _mapped: bool,
    ) -> Result<Xid> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        Ok(xid(id))
    }

    fn mock_destroy_window(&self, client: Xid) -> Result<()> {
        self.destroyed.borrow_mut().push(client);

        Ok(())
    }

    fn mock_map(&self, _client: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_unmap(&self, _client: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_reparent(&self, _client: Xid, _parent: Xid, _p: oxbow::pure::geometry::Point) -> Result<()> {
        Ok(())
    }

    fn mock_add_to_save_set(&self, _client: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_remove_from_save_set(&self, _client: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_focus(&self, _client: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_set_root_cursor(&self, _root: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_send_close(&self, client: Xid) -> Result<()> {
        self.closed.borrow_mut().push(client);

        Ok(())
    }

    fn mock_get_prop(&self, _client: Xid, _name: &str) -> Result<Option<Prop>> {
        Ok(None)
    }

    fn mock_set_prop(&self, client: Xid, name: &str, val: Prop) -> Result<()> {
        self.props.borrow_mut().push((client, name.to_string(), val));

        Ok(())
    }

    fn mock_get_window_attributes(&self, _client: Xid) -> Result<WindowAttributes> {
        Ok(WindowAttributes::new(false, MapState::Unmapped, 2))
    }

    fn mock_set_client_attributes(&self, _client: Xid, _attrs: &[oxbow::x::ClientAttr]) -> Result<()> {
        Ok(())
    }

    fn mock_set_client_config(&self, _client: Xid, _data: &[oxbow::x::ClientConfig]) -> Result<()> {
        Ok(())
    }
}

// Flips the run flag once the scripted unmanage count has been seen, so the
// event loop winds down and tears down cleanly.
struct ShutdownAfter {
    remaining: usize,
}

impl<X: XConn> LifecycleHook<X> for ShutdownAfter {
    fn unmanaged(&mut self, _: Xid, state: &mut State<X>, _: &X) -> Result<()> {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            state.shutdown();
        }

        Ok(())
    }
}

fn temp_theme_path(name: &str) -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("oxbow-lifecycle-{name}-{}.toml", std::process::id()));
    std::fs::write(&p, "border_width = 1\n").unwrap();

    p.to_string_lossy().to_string()
}

fn map_request(id: u32) -> XEvent {
    XEvent::MapRequest(MapRequestEvent {
        id: xid(id),
        parent: xid(0),
    })
}

fn close_message(id: u32) -> XEvent {
    XEvent::ClientMessage(ClientMessage {
        id: xid(id),
        dtype: "_NET_CLOSE_WINDOW".to_string(),
        data: ClientMessageData::U32([0; 5]),
    })
}

#[test]
fn a_session_keeps_the_published_lists_in_step_with_the_clients() {
    let conn = ScriptedConn::new(vec![
        map_request(10),
        map_request(20),
        XEvent::UnmapNotify(xid(10)),
    ]);
    let props = Rc::clone(&conn.props);
    let destroyed = Rc::clone(&conn.destroyed);
    let released = Rc::clone(&conn.released);

    let config = Config {
        theme_path: Some(temp_theme_path("lists")),
        lifecycle_hook: Some(Box::new(ShutdownAfter { remaining: 1 })),
        ..Config::default()
    };

    let wm = WindowManager::new(config, conn).unwrap();
    wm.run().unwrap();

    let (first_frame, second_frame) = (xid(1002), xid(1013));
    let lists = props_named(&props, "_NET_CLIENT_LIST");

    // One publish at startup, one per manage and unmanage, with the frame
    // ids standing in for the clients they wrap
    assert_eq!(
        lists,
        vec![
            Prop::Window(vec![]),
            Prop::Window(vec![first_frame]),
            Prop::Window(vec![first_frame, second_frame]),
            Prop::Window(vec![second_frame]),
            Prop::Window(vec![]),
        ]
    );

    let active = props_named(&props, "_NET_ACTIVE_WINDOW");

    // Focus follows each new client and falls back to no client at teardown
    assert_eq!(
        active,
        vec![
            Prop::Window(vec![xid(10)]),
            Prop::Window(vec![xid(20)]),
            Prop::Window(vec![xid(0)]),
        ]
    );

    // Teardown destroys the helper windows after the remaining frames
    let destroyed = destroyed.borrow();
    let n = destroyed.len();
    assert!(destroyed.contains(&first_frame));
    assert!(destroyed.contains(&second_frame));
    assert_eq!(&destroyed[n - 2..], &[xid(1000), xid(1001)]);

    assert_eq!(*released.borrow(), vec![xid(0)]);
}

#[test]
fn close_requests_and_grabs_follow_the_client_lifecycle() {
    let conn = ScriptedConn::new(vec![
        map_request(10),
        close_message(10),
        XEvent::UnmapNotify(xid(10)),
    ]);
    let closed = Rc::clone(&conn.closed);

    let grabs: Rc<RefCell<Vec<(Xid, bool)>>> = Rc::new(RefCell::new(vec![]));
    let g = Rc::clone(&grabs);
    let grab_hook = move |id: Xid, install: bool, _: &mut State<ScriptedConn>, _: &ScriptedConn| {
        g.borrow_mut().push((id, install));

        Ok(())
    };

    let config = Config {
        theme_path: Some(temp_theme_path("grabs")),
        lifecycle_hook: Some(Box::new(ShutdownAfter { remaining: 1 })),
        grab_hook: Some(Box::new(grab_hook)),
        ..Config::default()
    };

    let wm = WindowManager::new(config, conn).unwrap();
    wm.run().unwrap();

    assert_eq!(*closed.borrow(), vec![xid(10)]);
    assert_eq!(*grabs.borrow(), vec![(xid(10), true), (xid(10), false)]);
}

#[test]
fn a_contested_root_window_stops_the_run() {
    let mut conn = ScriptedConn::new(vec![]);
    conn.conflict = true;

    let config = Config {
        theme_path: Some(temp_theme_path("contested")),
        ..Config::default()
    };

    let wm = WindowManager::new(config, conn).unwrap();

    assert!(matches!(wm.run(), Err(Error::NoManagedScreens)));
}
