//! XEvent handlers for use in the main event loop
use crate::{
    core::{State, Xid},
    pure::geometry::Rect,
    x::{
        event::{ClientMessage, ConfigureEvent, MapRequestEvent, PropertyEvent},
        Atom, ClientConfig, XConnExt,
    },
    Result,
};
use std::str::FromStr;
use tracing::trace;

pub(crate) fn client_message<X>(msg: ClientMessage, state: &mut State<X>, x: &X) -> Result<()>
where
    X: XConnExt,
{
    trace!(id = %msg.id, dtype = %msg.dtype, "got client message");

    match Atom::from_str(&msg.dtype) {
        // Close requests may name the client itself or any of its frame
        // windows (pagers work from the published frame ids)
        Ok(Atom::NetCloseWindow) => match state.owning_client(msg.id) {
            Some(client) => x.send_close(client),
            None => Ok(()),
        },

        // all other client message types are ignored
        _ => Ok(()),
    }
}

pub(crate) fn configure_request<X>(e: ConfigureEvent, state: &mut State<X>, x: &X) -> Result<()>
where
    X: XConnExt,
{
    if state.owning_client(e.id).is_some() {
        // Managed geometry belongs to the decoration frame
        return Ok(());
    }

    // Unmanaged windows are granted exactly what they asked for, with any
    // unrequested fields retaining their current values
    let current = match x.client_geometry(e.id) {
        Ok(r) => r,
        Err(_) => return Ok(()), // the window is already gone
    };

    let r = Rect::new(
        e.x.unwrap_or(current.x),
        e.y.unwrap_or(current.y),
        e.w.unwrap_or(current.w),
        e.h.unwrap_or(current.h),
    );

    let mut data = vec![ClientConfig::Position(r)];
    if let Some(border_width) = e.border_width {
        data.push(ClientConfig::BorderPx(border_width));
    }

    x.set_client_config(e.id, &data)
}

pub(crate) fn destroy<X>(client: Xid, state: &mut State<X>, x: &X) -> Result<()>
where
    X: XConnExt,
{
    match state.owning_client(client) {
        // Only destruction of the client window itself dismantles the
        // client: decoration windows are destroyed by us during unmanage
        Some(owner) if owner == client => x.unmanage(owner, state),
        _ => Ok(()),
    }
}

pub(crate) fn map_request<X>(e: MapRequestEvent, state: &mut State<X>, x: &X) -> Result<()>
where
    X: XConnExt,
{
    let MapRequestEvent { id, parent } = e;

    if let Some(owner) = state.owning_client(id) {
        let screen = match state.screen_containing(owner) {
            Some(index) => index,
            None => return Ok(()),
        };

        // A map request for a window we already manage re-shows its
        // decoration and raises it within its layer
        if let Some(c) = state.screens[screen].clients.get(owner) {
            c.frame.show(x)?;
        }
        state.screens[screen].clients.restack(owner, true);

        return x.apply_restack(&state.screens[screen]);
    }

    match state.screen_index_for_root(parent) {
        Some(screen) => x.manage(id, screen, state),
        None => Ok(()),
    }
}

pub(crate) fn property_notify<X>(e: PropertyEvent, state: &mut State<X>, x: &X) -> Result<()>
where
    X: XConnExt,
{
    if e.is_root {
        return Ok(());
    }

    if matches!(Atom::from_str(&e.atom), Ok(Atom::NetWmStrut)) {
        if let Some(client) = state.owning_client(e.id) {
            // A deleted strut property reads back as no strut at all
            let strut = x.window_strut(client)?.unwrap_or_default();
            x.update_client_strut(client, strut, state)?;
        }
    }

    Ok(())
}

// Expected unmap events are tracked in pending_unmap: reparenting a viewable
// window generates an UnmapNotify that must not be read as the client
// withdrawing itself.
pub(crate) fn unmap_notify<X>(client: Xid, state: &mut State<X>, x: &X) -> Result<()>
where
    X: XConnExt,
{
    let expected = *state.pending_unmap.get(&client).unwrap_or(&0);

    if expected == 0 {
        x.unmanage(client, state)?;
    } else if expected == 1 {
        state.pending_unmap.remove(&client);
    } else {
        state
            .pending_unmap
            .entry(client)
            .and_modify(|count| *count -= 1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::Config,
        frame::{Frame, FrameGeometry},
        pure::{
            geometry::Strut,
            screen::{Client, Screen, StackLayer},
        },
        theme::Theme,
        x::{event::ClientMessageData, mock::MockXConn, Prop, XConn},
    };
    use std::{cell::RefCell, collections::HashMap};

    fn empty_state<X: XConn>() -> State<X> {
        State {
            config: Config::default(),
            screens: vec![],
            window_map: HashMap::new(),
            focused: None,
            pending_unmap: HashMap::new(),
            theme: Theme::default(),
            running: false,
        }
    }

    // Any X call from this conn is a test failure
    #[derive(Debug)]
    struct PanicConn;
    impl MockXConn for PanicConn {}

    #[test]
    fn expected_unmaps_are_absorbed_without_touching_the_server() {
        let x = PanicConn;
        let mut state = empty_state();
        state.pending_unmap.insert(Xid(5), 2);

        unmap_notify(Xid(5), &mut state, &x).unwrap();
        assert_eq!(state.pending_unmap.get(&Xid(5)), Some(&1));

        unmap_notify(Xid(5), &mut state, &x).unwrap();
        assert_eq!(state.pending_unmap.get(&Xid(5)), None);
    }

    #[test]
    fn unmaps_of_unmanaged_windows_are_ignored() {
        let x = PanicConn;
        let mut state = empty_state();

        unmap_notify(Xid(9), &mut state, &x).unwrap();

        assert!(state.pending_unmap.is_empty());
    }

    #[derive(Debug, Default)]
    struct CloseConn {
        sent: RefCell<Vec<Xid>>,
    }

    impl MockXConn for CloseConn {
        fn mock_send_close(&self, client: Xid) -> Result<()> {
            self.sent.borrow_mut().push(client);

            Ok(())
        }
    }

    fn close_message(id: Xid) -> ClientMessage {
        ClientMessage {
            id,
            dtype: "_NET_CLOSE_WINDOW".to_string(),
            data: ClientMessageData::U32([0; 5]),
        }
    }

    #[test]
    fn close_messages_resolve_frame_windows_to_their_client() {
        let x = CloseConn::default();
        let mut state = empty_state();
        state.window_map.insert(Xid(5), Xid(5));
        state.window_map.insert(Xid(1001), Xid(5)); // a decoration window

        client_message(close_message(Xid(1001)), &mut state, &x).unwrap();

        assert_eq!(*x.sent.borrow(), vec![Xid(5)]);
    }

    #[test]
    fn close_messages_for_unknown_windows_are_dropped() {
        let x = CloseConn::default();
        let mut state = empty_state();

        client_message(close_message(Xid(777)), &mut state, &x).unwrap();

        assert!(x.sent.borrow().is_empty());
    }

    #[derive(Debug, Default)]
    struct ConfigConn {
        configs: RefCell<Vec<(Xid, Vec<ClientConfig>)>>,
    }

    impl MockXConn for ConfigConn {
        fn mock_client_geometry(&self, _client: Xid) -> Result<Rect> {
            Ok(Rect::new(10, 20, 300, 200))
        }

        fn mock_set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()> {
            self.configs.borrow_mut().push((client, data.to_vec()));

            Ok(())
        }
    }

    #[test]
    fn configure_requests_for_unmanaged_windows_merge_current_geometry() {
        let x = ConfigConn::default();
        let mut state = empty_state();

        let e = ConfigureEvent {
            id: Xid(7),
            y: Some(5),
            w: Some(640),
            ..ConfigureEvent::default()
        };
        configure_request(e, &mut state, &x).unwrap();

        // Unrequested fields keep their current values
        assert_eq!(
            *x.configs.borrow(),
            vec![(
                Xid(7),
                vec![ClientConfig::Position(Rect::new(10, 5, 640, 200))]
            )]
        );
    }

    #[test]
    fn configure_requests_only_set_the_border_when_one_was_asked_for() {
        let x = ConfigConn::default();
        let mut state = empty_state();

        let e = ConfigureEvent {
            id: Xid(7),
            x: Some(-4),
            border_width: Some(3),
            ..ConfigureEvent::default()
        };
        configure_request(e, &mut state, &x).unwrap();

        assert_eq!(
            *x.configs.borrow(),
            vec![(
                Xid(7),
                vec![
                    ClientConfig::Position(Rect::new(-4, 20, 300, 200)),
                    ClientConfig::BorderPx(3),
                ]
            )]
        );
    }

    #[test]
    fn configure_requests_for_managed_windows_are_ignored() {
        let x = PanicConn;
        let mut state = empty_state();
        state.window_map.insert(Xid(7), Xid(7));

        let e = ConfigureEvent {
            id: Xid(7),
            w: Some(9999),
            ..ConfigureEvent::default()
        };

        // The frame owns managed geometry so nothing reaches the server
        configure_request(e, &mut state, &x).unwrap();
    }

    fn framed_client(id: u32, base: u32) -> Client {
        Client {
            id: Xid(id),
            screen: 0,
            layer: StackLayer::Normal,
            normal: true,
            accepts_input: true,
            strut: Strut::default(),
            border_width: 0,
            frame: Frame {
                client: Xid(id),
                window: Xid(base),
                plate: Xid(base + 1),
                titlebar: Xid(base + 2),
                label: Xid(base + 3),
                button_iconify: Xid(base + 4),
                button_max: Xid(base + 5),
                button_stick: Xid(base + 6),
                button_close: Xid(base + 7),
                handle: Xid(base + 8),
                grip_left: Xid(base + 9),
                grip_right: Xid(base + 10),
                geometry: FrameGeometry::default(),
                client_rect: Rect::default(),
            },
        }
    }

    #[derive(Debug, Default)]
    struct RemapConn {
        mapped: RefCell<Vec<Xid>>,
        configs: RefCell<Vec<(Xid, Vec<ClientConfig>)>>,
        props: RefCell<Vec<(Xid, String, Prop)>>,
    }

    impl MockXConn for RemapConn {
        fn mock_map(&self, client: Xid) -> Result<()> {
            self.mapped.borrow_mut().push(client);

            Ok(())
        }

        fn mock_set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()> {
            self.configs.borrow_mut().push((client, data.to_vec()));

            Ok(())
        }

        fn mock_set_prop(&self, client: Xid, name: &str, val: Prop) -> Result<()> {
            self.props.borrow_mut().push((client, name.to_string(), val));

            Ok(())
        }
    }

    #[test]
    fn a_map_request_for_a_managed_client_reshows_and_raises_it() {
        let x = RemapConn::default();
        let mut state = empty_state();

        let mut screen = Screen::new(0, Xid(0), Rect::new(0, 0, 800, 600));
        screen.managed = true;
        screen.clients.insert(framed_client(5, 100));
        screen.clients.insert(framed_client(6, 200));
        state.screens.push(screen);
        state.window_map.insert(Xid(5), Xid(5));
        state.window_map.insert(Xid(6), Xid(6));

        // 6 was managed last so it currently sits in front of 5
        let e = MapRequestEvent {
            id: Xid(5),
            parent: Xid(0),
        };
        map_request(e, &mut state, &x).unwrap();

        let mapped = x.mapped.borrow();
        assert_eq!(mapped.len(), 12);
        assert_eq!(mapped[10], Xid(5), "the client maps after its sub windows");
        assert_eq!(mapped[11], Xid(100), "the primary window maps last");

        // 5 is back in front of its layer and the server order follows
        assert_eq!(
            *x.configs.borrow(),
            vec![(Xid(200), vec![ClientConfig::StackBelow(Xid(100))])]
        );
        assert_eq!(
            *x.props.borrow(),
            vec![(
                Xid(0),
                "_NET_CLIENT_LIST_STACKING".to_string(),
                Prop::Window(vec![Xid(100), Xid(200)])
            )]
        );
    }
}
