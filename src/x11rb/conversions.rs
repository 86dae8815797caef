//! Conversions from x11rb event types to our own
use crate::{
    core::Xid,
    x::{
        event::{ClientMessage, ClientMessageData, ConfigureEvent, MapRequestEvent, PropertyEvent},
        XConn, XEvent,
    },
    x11rb::Conn,
    Error, Result,
};
use tracing::error;
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{ClientMessageEvent, ConfigWindow, ConfigureRequestEvent},
        Event,
    },
};

pub(crate) fn convert_event<C: Connection>(conn: &Conn<C>, event: Event) -> Result<Option<XEvent>> {
    match event {
        Event::ClientMessage(e) => Ok(Some(to_client_message(conn, e)?)),

        Event::ConfigureRequest(e) => Ok(Some(XEvent::ConfigureRequest(to_configure_event(e)))),

        Event::DestroyNotify(e) => Ok(Some(XEvent::Destroy(Xid(e.window)))),

        Event::MapRequest(e) => Ok(Some(XEvent::MapRequest(MapRequestEvent {
            id: Xid(e.window),
            parent: Xid(e.parent),
        }))),

        Event::PropertyNotify(e) => Ok(Some(XEvent::PropertyNotify(PropertyEvent {
            id: Xid(e.window),
            atom: conn.atom_name(Xid(e.atom))?,
            is_root: conn.is_root(Xid(e.window)),
        }))),

        // An unmap is reported both for the window itself and for the parent
        // we select substructure events on: forward only the window's own
        // copy so that each unmap is seen exactly once
        Event::UnmapNotify(e) if e.event == e.window => {
            Ok(Some(XEvent::UnmapNotify(Xid(e.window))))
        }

        // Error events are raised against whichever request raced a closing
        // window, not against the event loop itself: log and carry on
        Event::Error(e) => {
            error!(error = ?e, "error event from the X server");
            Ok(None)
        }

        // NOTE: Ignoring other event types
        _ => Ok(None),
    }
}

fn to_configure_event(e: ConfigureRequestEvent) -> ConfigureEvent {
    let mask = u32::from(e.value_mask);
    let has = |bit: ConfigWindow| mask & u32::from(bit) != 0;

    ConfigureEvent {
        id: Xid(e.window),
        x: has(ConfigWindow::X).then_some(e.x as i32),
        y: has(ConfigWindow::Y).then_some(e.y as i32),
        w: has(ConfigWindow::WIDTH).then_some(e.width as u32),
        h: has(ConfigWindow::HEIGHT).then_some(e.height as u32),
        border_width: has(ConfigWindow::BORDER_WIDTH).then_some(e.border_width as u32),
    }
}

fn to_client_message<C: Connection>(conn: &Conn<C>, event: ClientMessageEvent) -> Result<XEvent> {
    let name = conn.atom_name(Xid(event.type_))?;
    let data = match event.format {
        8 => ClientMessageData::U8(event.data.as_data8()),
        16 => ClientMessageData::U16(event.data.as_data16()),
        32 => ClientMessageData::U32(event.data.as_data32()),
        format => return Err(Error::InvalidClientMessage { format }),
    };

    Ok(XEvent::ClientMessage(ClientMessage {
        id: Xid(event.window),
        dtype: name,
        data,
    }))
}
