//! Pure state for a single managed screen: the client set, the stacking
//! order and the reserved space accumulated from client struts.
use crate::{
    core::Xid,
    frame::Frame,
    pure::geometry::{Rect, Strut},
};

/// The stacking tier a client is placed in, ordered back to front.
///
/// Restacking never moves a client across tiers: within the stacking
/// sequence a client with a higher layer is always in front of one with a
/// lower layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StackLayer {
    /// Desktop windows, behind everything else
    Desktop,
    /// Clients asking to be kept below normal windows
    Below,
    /// The tier ordinary application windows live in
    Normal,
    /// Clients asking to be kept above normal windows
    Above,
    /// Panels and docks
    Dock,
    /// Fullscreen clients, in front of everything else
    Fullscreen,
}

/// A managed top level window and the state tracked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// The client window itself
    pub id: Xid,
    /// The index of the screen this client belongs to
    pub screen: usize,
    /// The stacking tier this client is placed in
    pub layer: StackLayer,
    /// Whether this client is eligible for default focus.
    ///
    /// Desktop windows, docks and splash screens are tracked and stacked
    /// but never focused by default.
    pub normal: bool,
    /// Whether the client has asked for keyboard input (from `WM_HINTS`)
    pub accepts_input: bool,
    /// Screen edge space this client reserves
    pub strut: Strut,
    /// The border width the window had before it was managed
    pub border_width: u32,
    /// The decoration frame wrapping this client
    pub frame: Frame,
}

/// The set of managed clients on one screen together with their front to
/// back stacking order.
///
/// The two sequences always contain exactly the same members: one ordered
/// by the order clients were managed in, the other by visual z-order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientSet {
    clients: Vec<Client>,
    stacking: Vec<Xid>,
}

impl ClientSet {
    /// The number of managed clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether there are any managed clients.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Whether `id` is a managed client window.
    pub fn contains(&self, id: Xid) -> bool {
        self.clients.iter().any(|c| c.id == id)
    }

    /// The [Client] for `id` if it is managed.
    pub fn get(&self, id: Xid) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// The first client in management order.
    ///
    /// This is the order shutdown unmanages clients in: always the current
    /// front until the set is empty.
    pub fn front(&self) -> Option<&Client> {
        self.clients.first()
    }

    /// Iterate over clients in the order they were managed.
    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter()
    }

    /// Iterate over client window ids in front to back stacking order.
    pub fn stacking_order(&self) -> impl Iterator<Item = Xid> + '_ {
        self.stacking.iter().copied()
    }

    /// The decoration frame ids of all clients in management order.
    ///
    /// This is the value published as `_NET_CLIENT_LIST`.
    pub fn frame_ids(&self) -> Vec<Xid> {
        self.clients.iter().map(|c| c.frame.window).collect()
    }

    /// The decoration frame ids of all clients in front to back stacking
    /// order.
    ///
    /// This is the value published as `_NET_CLIENT_LIST_STACKING` and the
    /// order applied to the X server when restacking.
    pub fn stacking_frame_ids(&self) -> Vec<Xid> {
        self.stacking
            .iter()
            .filter_map(|&id| self.get(id))
            .map(|c| c.frame.window)
            .collect()
    }

    /// Add a newly managed client, placing it at the front of its stacking
    /// tier.
    ///
    /// Inserting an id that is already managed is a no-op.
    pub fn insert(&mut self, client: Client) {
        if self.contains(client.id) {
            return;
        }

        let id = client.id;
        self.clients.push(client);
        self.stacking.push(id);
        self.restack(id, true);
    }

    /// Remove and return the client for `id`, dropping it from the
    /// stacking order as well.
    pub fn remove(&mut self, id: Xid) -> Option<Client> {
        self.stacking.retain(|&w| w != id);
        let pos = self.clients.iter().position(|c| c.id == id)?;

        Some(self.clients.remove(pos))
    }

    /// Move a client to a new position in the stacking order while keeping
    /// every client within its stacking tier.
    ///
    /// When `raise` is true the client ends up in front of everything in
    /// its own tier, otherwise behind it. Clients in higher tiers always
    /// stay in front. Restacking an unknown id is a no-op.
    pub fn restack(&mut self, id: Xid, raise: bool) {
        let layer = match self.get(id) {
            Some(c) => c.layer,
            None => return,
        };

        self.stacking.retain(|&w| w != id);
        let idx = self
            .stacking
            .iter()
            .position(|&w| {
                let l = self.layer_of(w);
                l < layer || (raise && l == layer)
            })
            .unwrap_or(self.stacking.len());

        self.stacking.insert(idx, id);
    }

    /// Record a new strut for a managed client, returning false if `id` is
    /// not managed.
    pub fn set_strut(&mut self, id: Xid, strut: Strut) -> bool {
        match self.clients.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.strut = strut;
                true
            }
            None => false,
        }
    }

    /// The component-wise maximum over all client struts.
    pub fn aggregate_strut(&self) -> Strut {
        self.clients
            .iter()
            .fold(Strut::default(), |acc, c| acc.max(c.strut))
    }

    /// The front-most client in stacking order that is eligible for
    /// default focus and accepts input.
    pub fn first_focus_candidate(&self) -> Option<&Client> {
        self.stacking
            .iter()
            .filter_map(|&id| self.get(id))
            .find(|c| c.normal && c.accepts_input)
    }

    fn layer_of(&self, id: Xid) -> StackLayer {
        self.get(id).map(|c| c.layer).unwrap_or(StackLayer::Normal)
    }
}

/// One X screen being managed: its root window, pixel geometry and the
/// clients currently attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// The index of this screen on the display
    pub index: usize,
    /// The root window of this screen
    pub root: Xid,
    /// The full pixel geometry of this screen
    pub geometry: Rect,
    /// Whether this screen is under our control.
    ///
    /// False when another window manager already held the root window
    /// redirect at startup: such screens are skipped by every operation.
    pub managed: bool,
    /// The aggregate strut accumulated from all clients on this screen
    pub strut: Strut,
    /// The clients managed on this screen
    pub clients: ClientSet,
    pub(crate) support_win: Option<Xid>,
    pub(crate) focus_win: Option<Xid>,
}

impl Screen {
    /// Create a new unmanaged [Screen]. Claiming the root window happens
    /// during screen initialisation, not here.
    pub fn new(index: usize, root: Xid, geometry: Rect) -> Screen {
        Screen {
            index,
            root,
            geometry,
            managed: false,
            strut: Strut::default(),
            clients: ClientSet::default(),
            support_win: None,
            focus_win: None,
        }
    }

    /// Recompute the aggregate strut from the current client set.
    ///
    /// Idempotent and independent of the order clients were managed in.
    pub fn update_strut(&mut self) {
        self.strut = self.clients.aggregate_strut();
    }

    /// The usable screen area: the full geometry minus the aggregate strut.
    pub fn work_area(&self) -> Rect {
        self.geometry.subtract_strut(self.strut)
    }

    /// The window advertised via `_NET_SUPPORTING_WM_CHECK` once this
    /// screen is initialised.
    pub fn support_window(&self) -> Option<Xid> {
        self.support_win
    }

    /// The input-only window given focus when no client holds it.
    pub fn focus_sink(&self) -> Option<Xid> {
        self.focus_win
    }
}
