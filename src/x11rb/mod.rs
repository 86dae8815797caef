//! An [XConn] implementation backed by the pure rust [x11rb][::x11rb] crate
use crate::{
    core::Xid,
    pure::geometry::{Point, Rect},
    x::{
        property::{MapState, WmHints},
        Atom, ClientAttr, ClientConfig, Prop, WinType, WindowAttributes, XConn, XEvent,
    },
    Error, Result,
};
use std::{collections::HashMap, fmt, str::FromStr};
use strum::IntoEnumIterator;
use x11rb::{
    connection::Connection,
    errors::ReplyError,
    protocol::{
        xproto::{
            AtomEnum, ChangeWindowAttributesAux, ClientMessageEvent, ConfigureWindowAux,
            ConnectionExt as _, CreateWindowAux, EventMask, InputFocus, MapState as RawMapState,
            PropMode, Screen as RawScreen, SetMode, StackMode, WindowClass,
        },
        ErrorKind,
    },
    rust_connection::RustConnection,
    wrapper::ConnectionExt as _,
    CURRENT_TIME,
};

mod conversions;

use conversions::convert_event;

// XC_left_ptr and its mask glyph in the standard cursor font
const LEFT_PTR: u16 = 68;
const LEFT_PTR_MASK: u16 = 69;

/// Interned ids for the atoms named by the [Atom] enum.
///
/// Every variant is interned up front when the registry is built so lookups
/// of known atoms never need to touch the server again.
#[derive(Debug)]
struct Atoms {
    known: HashMap<Atom, u32>,
}

impl Atoms {
    fn new(conn: &impl Connection) -> Result<Self> {
        // Send all of the intern requests before reading any of the replies
        // so that only a single round trip to the server is needed
        let cookies = Atom::iter()
            .map(|atom| Ok((atom, conn.intern_atom(false, atom.as_ref().as_bytes())?)))
            .collect::<Result<Vec<_>>>()?;
        let known = cookies
            .into_iter()
            .map(|(atom, cookie)| Ok((atom, cookie.reply()?.atom)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self { known })
    }

    // Every Atom variant is interned at construction time
    fn known_id(&self, atom: Atom) -> u32 {
        self.known[&atom]
    }

    fn known_name(&self, id: u32) -> Option<Atom> {
        self.known
            .iter()
            .find(|(_, value)| **value == id)
            .map(|(atom, _)| *atom)
    }
}

/// An [XConn] implementation using [x11rb][::x11rb] to communicate with the
/// X server, generic over the underlying connection.
pub struct Conn<C: Connection> {
    conn: C,
    roots: Vec<Xid>,
    atoms: Atoms,
}

/// A [Conn] using x11rb's pure rust [RustConnection] to talk to the server
pub type RustConn = Conn<RustConnection>;

impl RustConn {
    /// Connect to the X server using the `DISPLAY` environment variable
    pub fn new() -> Result<Self> {
        let (conn, _) = RustConnection::connect(None)?;

        Self::new_for_connection(conn)
    }
}

impl<C: Connection> fmt::Debug for Conn<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conn")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl<C: Connection> Conn<C> {
    /// Wrap an established x11rb connection
    pub fn new_for_connection(conn: C) -> Result<Self> {
        let roots = conn.setup().roots.iter().map(|s| Xid(s.root)).collect();
        let atoms = Atoms::new(&conn)?;

        Ok(Self { conn, roots, atoms })
    }

    pub(crate) fn is_root(&self, id: Xid) -> bool {
        self.roots.contains(&id)
    }

    fn screen(&self, screen: usize) -> Result<&RawScreen> {
        self.conn
            .setup()
            .roots
            .get(screen)
            .ok_or(Error::UnknownScreen { index: screen })
    }

    fn atom_id(&self, name: &str) -> Result<u32> {
        if let Ok(known) = Atom::from_str(name) {
            return Ok(self.atoms.known_id(known));
        }

        Ok(self.conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
    }
}

impl<C: Connection> XConn for Conn<C> {
    fn screen_count(&self) -> usize {
        self.roots.len()
    }

    fn root(&self, screen: usize) -> Result<Xid> {
        self.roots
            .get(screen)
            .copied()
            .ok_or(Error::UnknownScreen { index: screen })
    }

    fn screen_geometry(&self, screen: usize) -> Result<Rect> {
        let s = self.screen(screen)?;

        Ok(Rect::new(
            0,
            0,
            s.width_in_pixels as u32,
            s.height_in_pixels as u32,
        ))
    }

    fn become_window_manager(&self, root: Xid) -> Result<()> {
        let mask = EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::BUTTON_PRESS
            | EventMask::BUTTON_RELEASE
            | EventMask::PROPERTY_CHANGE
            | EventMask::COLOR_MAP_CHANGE
            | EventMask::ENTER_WINDOW
            | EventMask::LEAVE_WINDOW;
        let aux = ChangeWindowAttributesAux::new().event_mask(mask);
        let res = self.conn.change_window_attributes(*root, &aux)?.check();

        match res {
            Err(ReplyError::X11Error(e)) if e.error_kind == ErrorKind::Access => {
                Err(Error::WmConflict { root })
            }
            Err(e) => Err(e.into()),
            Ok(()) => Ok(()),
        }
    }

    fn release_window_manager(&self, root: Xid) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().event_mask(EventMask::NO_EVENT);
        self.conn.change_window_attributes(*root, &aux)?.check()?;

        Ok(())
    }

    fn grab_server(&self) -> Result<()> {
        self.conn.grab_server()?.check()?;

        Ok(())
    }

    fn ungrab_server(&self) -> Result<()> {
        self.conn.ungrab_server()?;
        self.conn.flush()?;

        Ok(())
    }

    fn next_event(&self) -> Result<Option<XEvent>> {
        let event = self.conn.wait_for_event()?;

        convert_event(self, event)
    }

    fn flush(&self) -> bool {
        self.conn.flush().is_ok()
    }

    fn intern_atom(&self, atom: &str) -> Result<Xid> {
        Ok(Xid(self.atom_id(atom)?))
    }

    fn atom_name(&self, xid: Xid) -> Result<String> {
        if let Some(known) = self.atoms.known_name(*xid) {
            return Ok(known.as_ref().to_string());
        }

        let reply = self.conn.get_atom_name(*xid)?.reply()?;

        Ok(String::from_utf8(reply.name)?)
    }

    fn existing_clients(&self, root: Xid) -> Result<Vec<Xid>> {
        let reply = self.conn.query_tree(*root)?.reply()?;

        Ok(reply.children.into_iter().map(Xid).collect())
    }

    fn client_geometry(&self, client: Xid) -> Result<Rect> {
        let g = self.conn.get_geometry(*client)?.reply()?;

        Ok(Rect::new(
            g.x as i32,
            g.y as i32,
            g.width as u32,
            g.height as u32,
        ))
    }

    fn create_window(&self, ty: WinType, parent: Xid, r: Rect, mapped: bool) -> Result<Xid> {
        // Everything we create for ourselves is override redirect: we hold
        // the substructure redirection on the root so mapping our own
        // windows must not be reflected back at us as a MapRequest
        let aux = CreateWindowAux::new().override_redirect(1);
        let (class, aux) = match ty {
            WinType::CheckWin => (WindowClass::INPUT_OUTPUT, aux),
            WinType::InputOnly => (WindowClass::INPUT_ONLY, aux),
            WinType::InputOutput { background } => {
                (WindowClass::INPUT_OUTPUT, aux.background_pixel(background))
            }
        };

        let id = self.conn.generate_id()?;
        self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            id,
            *parent,
            r.x as i16,
            r.y as i16,
            r.w as u16,
            r.h as u16,
            0,
            class,
            x11rb::COPY_FROM_PARENT,
            &aux,
        )?;

        if mapped {
            self.conn.map_window(id)?;
        }

        self.conn.flush()?;

        Ok(Xid(id))
    }

    fn destroy_window(&self, client: Xid) -> Result<()> {
        self.conn.destroy_window(*client)?;

        Ok(())
    }

    fn map(&self, client: Xid) -> Result<()> {
        self.conn.map_window(*client)?;

        Ok(())
    }

    fn unmap(&self, client: Xid) -> Result<()> {
        self.conn.unmap_window(*client)?;

        Ok(())
    }

    fn reparent(&self, client: Xid, new_parent: Xid, p: Point) -> Result<()> {
        self.conn
            .reparent_window(*client, *new_parent, p.x as i16, p.y as i16)?;

        Ok(())
    }

    fn add_to_save_set(&self, client: Xid) -> Result<()> {
        self.conn.change_save_set(SetMode::INSERT, *client)?;

        Ok(())
    }

    fn remove_from_save_set(&self, client: Xid) -> Result<()> {
        self.conn.change_save_set(SetMode::DELETE, *client)?;

        Ok(())
    }

    fn focus(&self, client: Xid) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::PARENT, *client, CURRENT_TIME)?;

        Ok(())
    }

    fn set_root_cursor(&self, root: Xid) -> Result<()> {
        let font = self.conn.generate_id()?;
        self.conn.open_font(font, b"cursor")?;

        let cursor = self.conn.generate_id()?;
        self.conn.create_glyph_cursor(
            cursor,
            font,
            font,
            LEFT_PTR,
            LEFT_PTR_MASK,
            0,
            0,
            0,
            0xffff,
            0xffff,
            0xffff,
        )?;
        self.conn.close_font(font)?;

        let aux = ChangeWindowAttributesAux::new().cursor(cursor);
        self.conn.change_window_attributes(*root, &aux)?;

        Ok(())
    }

    fn send_close(&self, client: Xid) -> Result<()> {
        let protocols = self.atoms.known_id(Atom::WmProtocols);
        let delete = self.atoms.known_id(Atom::WmDeleteWindow);
        let data = [delete, CURRENT_TIME, 0, 0, 0];
        let event = ClientMessageEvent::new(32, *client, protocols, data);

        self.conn
            .send_event(false, *client, EventMask::NO_EVENT, event)?;

        Ok(())
    }

    fn get_prop(&self, client: Xid, prop_name: &str) -> Result<Option<Prop>> {
        let atom_id = self.atom_id(prop_name)?;
        let r = self
            .conn
            .get_property(false, *client, atom_id, AtomEnum::ANY, 0, 1024)?
            .reply()?;

        let prop_type = match r.type_ {
            0 => return Ok(None), // the property is not set for this client
            id => self.atom_name(Xid(id))?,
        };

        let p = match prop_type.as_str() {
            "ATOM" => {
                let ids = r.value32().ok_or_else(|| {
                    Error::InvalidPropertyData(format!("ATOM data for {client} was not 32 bit"))
                })?;

                Prop::Atom(
                    ids.map(|id| self.atom_name(Xid(id)))
                        .collect::<Result<Vec<String>>>()?,
                )
            }

            "CARDINAL" => {
                let vals = r.value32().ok_or_else(|| {
                    Error::InvalidPropertyData(format!("CARDINAL data for {client} was not 32 bit"))
                })?;

                Prop::Cardinal(vals.collect())
            }

            "STRING" | "UTF8_STRING" => Prop::UTF8String(
                String::from_utf8(r.value)?
                    .trim_matches('\0')
                    .split('\0')
                    .map(|s| s.to_string())
                    .collect(),
            ),

            "WINDOW" => {
                let ids = r.value32().ok_or_else(|| {
                    Error::InvalidPropertyData(format!("WINDOW data for {client} was not 32 bit"))
                })?;

                Prop::Window(ids.map(Xid).collect())
            }

            "WM_HINTS" => {
                let raw: Vec<u32> = r
                    .value32()
                    .ok_or_else(|| {
                        Error::InvalidPropertyData(format!(
                            "WM_HINTS data for {client} was not 32 bit"
                        ))
                    })?
                    .collect();

                Prop::WmHints(WmHints::try_from_bytes(&raw)?)
            }

            _ => match r.value32() {
                Some(vals) => Prop::Bytes(vals.collect()),
                None => {
                    return Err(Error::InvalidPropertyData(format!(
                        "prop type {prop_type} for {prop_name} is not supported"
                    )))
                }
            },
        };

        Ok(Some(p))
    }

    fn set_prop(&self, client: Xid, name: &str, val: Prop) -> Result<()> {
        let a = self.atom_id(name)?;

        match val {
            Prop::Atom(atoms) => {
                let ids = atoms
                    .iter()
                    .map(|name| self.atom_id(name))
                    .collect::<Result<Vec<u32>>>()?;
                self.conn
                    .change_property32(PropMode::REPLACE, *client, a, AtomEnum::ATOM, &ids)?;
            }

            Prop::Cardinal(vals) => {
                self.conn.change_property32(
                    PropMode::REPLACE,
                    *client,
                    a,
                    AtomEnum::CARDINAL,
                    &vals,
                )?;
            }

            Prop::UTF8String(strs) => {
                self.conn.change_property8(
                    PropMode::REPLACE,
                    *client,
                    a,
                    self.atoms.known_id(Atom::UTF8String),
                    strs.join("\0").as_bytes(),
                )?;
            }

            Prop::Window(ids) => {
                let ids: Vec<u32> = ids.iter().map(|id| **id).collect();
                self.conn
                    .change_property32(PropMode::REPLACE, *client, a, AtomEnum::WINDOW, &ids)?;
            }

            Prop::Bytes(_) | Prop::WmHints(_) => {
                return Err(Error::InvalidPropertyData(format!(
                    "unable to set '{name}' props of this type"
                )))
            }
        }

        Ok(())
    }

    fn delete_prop(&self, client: Xid, name: &str) -> Result<()> {
        let a = self.atom_id(name)?;
        self.conn.delete_property(*client, a)?;

        Ok(())
    }

    fn get_window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        // The border width lives on the geometry so both requests are needed:
        // pipeline them and then read the two replies
        let attr_cookie = self.conn.get_window_attributes(*client)?;
        let geo_cookie = self.conn.get_geometry(*client)?;
        let attrs = attr_cookie.reply()?;
        let geo = geo_cookie.reply()?;

        let map_state = if attrs.map_state == RawMapState::UNMAPPED {
            MapState::Unmapped
        } else if attrs.map_state == RawMapState::UNVIEWABLE {
            MapState::UnViewable
        } else {
            MapState::Viewable
        };

        Ok(WindowAttributes::new(
            attrs.override_redirect,
            map_state,
            geo.border_width as u32,
        ))
    }

    fn set_client_attributes(&self, client: Xid, attrs: &[ClientAttr]) -> Result<()> {
        let client_event_mask =
            EventMask::PROPERTY_CHANGE | EventMask::STRUCTURE_NOTIFY | EventMask::FOCUS_CHANGE;
        let no_propagate_mask =
            EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::BUTTON_MOTION;

        let mut aux = ChangeWindowAttributesAux::new();
        for attr in attrs {
            aux = match attr {
                ClientAttr::ClientEventMask => aux
                    .event_mask(client_event_mask)
                    .do_not_propogate_mask(no_propagate_mask),
                ClientAttr::NoEvents => aux
                    .event_mask(EventMask::NO_EVENT)
                    .do_not_propogate_mask(EventMask::NO_EVENT),
            };
        }
        self.conn.change_window_attributes(*client, &aux)?;

        Ok(())
    }

    fn set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()> {
        let mut aux = ConfigureWindowAux::new();
        for conf in data {
            aux = match conf {
                ClientConfig::BorderPx(px) => aux.border_width(*px),
                ClientConfig::Position(r) => aux.x(r.x).y(r.y).width(r.w).height(r.h),
                ClientConfig::StackBelow(sibling) => {
                    aux.sibling(**sibling).stack_mode(StackMode::BELOW)
                }
            };
        }
        self.conn.configure_window(*client, &aux)?;

        Ok(())
    }
}
