//! A mock implementation of XConn that is easier to implement for
//! use in tests.
#![allow(missing_docs)]
use crate::{
    pure::geometry::{Point, Rect},
    x::{
        event::XEvent,
        property::{Prop, WindowAttributes},
        ClientAttr, ClientConfig, WinType, XConn,
    },
    Result, Xid,
};

/// All methods on this trait are unimplemented by default unless an
/// implementation is provided, so that a test using an unexpected method
/// fails loudly. The exceptions are `mock_screen_count` (one screen),
/// `mock_root` (always id 0) and `mock_flush` (always succeeds).
///
/// Any implementation of `MockXConn` will automatically implement `XConn` by
/// forwarding on calls to `$method` to `mock_$method`.
#[allow(unused_variables)]
pub trait MockXConn {
    fn mock_screen_count(&self) -> usize {
        1
    }

    fn mock_root(&self, screen: usize) -> Result<Xid> {
        Ok(Xid(0))
    }

    fn mock_screen_geometry(&self, screen: usize) -> Result<Rect> {
        unimplemented!("mock_screen_geometry")
    }

    fn mock_become_window_manager(&self, root: Xid) -> Result<()> {
        unimplemented!("mock_become_window_manager")
    }

    fn mock_release_window_manager(&self, root: Xid) -> Result<()> {
        unimplemented!("mock_release_window_manager")
    }

    fn mock_grab_server(&self) -> Result<()> {
        unimplemented!("mock_grab_server")
    }

    fn mock_ungrab_server(&self) -> Result<()> {
        unimplemented!("mock_ungrab_server")
    }

    fn mock_next_event(&self) -> Result<Option<XEvent>> {
        unimplemented!("mock_next_event")
    }

    fn mock_flush(&self) -> bool {
        true
    }

    fn mock_intern_atom(&self, atom: &str) -> Result<Xid> {
        unimplemented!("mock_intern_atom")
    }

    fn mock_atom_name(&self, xid: Xid) -> Result<String> {
        unimplemented!("mock_atom_name")
    }

    fn mock_existing_clients(&self, root: Xid) -> Result<Vec<Xid>> {
        unimplemented!("mock_existing_clients")
    }

    fn mock_client_geometry(&self, client: Xid) -> Result<Rect> {
        unimplemented!("mock_client_geometry")
    }

    fn mock_create_window(&self, ty: WinType, parent: Xid, r: Rect, mapped: bool) -> Result<Xid> {
        unimplemented!("mock_create_window")
    }

    fn mock_destroy_window(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_destroy_window")
    }

    fn mock_map(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_map")
    }

    fn mock_unmap(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_unmap")
    }

    fn mock_reparent(&self, client: Xid, new_parent: Xid, p: Point) -> Result<()> {
        unimplemented!("mock_reparent")
    }

    fn mock_add_to_save_set(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_add_to_save_set")
    }

    fn mock_remove_from_save_set(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_remove_from_save_set")
    }

    fn mock_focus(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_focus")
    }

    fn mock_set_root_cursor(&self, root: Xid) -> Result<()> {
        unimplemented!("mock_set_root_cursor")
    }

    fn mock_send_close(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_send_close")
    }

    fn mock_get_prop(&self, client: Xid, prop_name: &str) -> Result<Option<Prop>> {
        unimplemented!("mock_get_prop")
    }

    fn mock_set_prop(&self, client: Xid, name: &str, val: Prop) -> Result<()> {
        unimplemented!("mock_set_prop")
    }

    fn mock_delete_prop(&self, client: Xid, name: &str) -> Result<()> {
        unimplemented!("mock_delete_prop")
    }

    fn mock_get_window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        unimplemented!("mock_get_window_attributes")
    }

    fn mock_set_client_attributes(&self, client: Xid, attrs: &[ClientAttr]) -> Result<()> {
        unimplemented!("mock_set_client_attributes")
    }

    fn mock_set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()> {
        unimplemented!("mock_set_client_config")
    }
}

impl<T> XConn for T
where
    T: MockXConn,
{
    fn screen_count(&self) -> usize {
        self.mock_screen_count()
    }

    fn root(&self, screen: usize) -> Result<Xid> {
        self.mock_root(screen)
    }

    fn screen_geometry(&self, screen: usize) -> Result<Rect> {
        self.mock_screen_geometry(screen)
    }

    fn become_window_manager(&self, root: Xid) -> Result<()> {
        self.mock_become_window_manager(root)
    }

    fn release_window_manager(&self, root: Xid) -> Result<()> {
        self.mock_release_window_manager(root)
    }

    fn grab_server(&self) -> Result<()> {
        self.mock_grab_server()
    }

    fn ungrab_server(&self) -> Result<()> {
        self.mock_ungrab_server()
    }

    fn next_event(&self) -> Result<Option<XEvent>> {
        self.mock_next_event()
    }

    fn flush(&self) -> bool {
        self.mock_flush()
    }

    fn intern_atom(&self, atom: &str) -> Result<Xid> {
        self.mock_intern_atom(atom)
    }

    fn atom_name(&self, xid: Xid) -> Result<String> {
        self.mock_atom_name(xid)
    }

    fn existing_clients(&self, root: Xid) -> Result<Vec<Xid>> {
        self.mock_existing_clients(root)
    }

    fn client_geometry(&self, client: Xid) -> Result<Rect> {
        self.mock_client_geometry(client)
    }

    fn create_window(&self, ty: WinType, parent: Xid, r: Rect, mapped: bool) -> Result<Xid> {
        self.mock_create_window(ty, parent, r, mapped)
    }

    fn destroy_window(&self, client: Xid) -> Result<()> {
        self.mock_destroy_window(client)
    }

    fn map(&self, client: Xid) -> Result<()> {
        self.mock_map(client)
    }

    fn unmap(&self, client: Xid) -> Result<()> {
        self.mock_unmap(client)
    }

    fn reparent(&self, client: Xid, new_parent: Xid, p: Point) -> Result<()> {
        self.mock_reparent(client, new_parent, p)
    }

    fn add_to_save_set(&self, client: Xid) -> Result<()> {
        self.mock_add_to_save_set(client)
    }

    fn remove_from_save_set(&self, client: Xid) -> Result<()> {
        self.mock_remove_from_save_set(client)
    }

    fn focus(&self, client: Xid) -> Result<()> {
        self.mock_focus(client)
    }

    fn set_root_cursor(&self, root: Xid) -> Result<()> {
        self.mock_set_root_cursor(root)
    }

    fn send_close(&self, client: Xid) -> Result<()> {
        self.mock_send_close(client)
    }

    fn get_prop(&self, client: Xid, prop_name: &str) -> Result<Option<Prop>> {
        self.mock_get_prop(client, prop_name)
    }

    fn set_prop(&self, client: Xid, name: &str, val: Prop) -> Result<()> {
        self.mock_set_prop(client, name, val)
    }

    fn delete_prop(&self, client: Xid, name: &str) -> Result<()> {
        self.mock_delete_prop(client, name)
    }

    fn get_window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        self.mock_get_window_attributes(client)
    }

    fn set_client_attributes(&self, client: Xid, attrs: &[ClientAttr]) -> Result<()> {
        self.mock_set_client_attributes(client, attrs)
    }

    fn set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()> {
        self.mock_set_client_config(client, data)
    }
}
