//! Client decoration frames.
//!
//! Every managed client is reparented into a frame: a tree of plain X
//! windows providing the border, titlebar, buttons and resize handle
//! around the client. The engine only creates, shows, hides and destroys
//! these windows; drawing anything on them is left to the embedding
//! program, which can look windows up by id via the dispatch map.
use crate::{
    core::Xid,
    pure::geometry::{Point, Rect},
    theme::Theme,
    x::{WinType, XConn},
    Result,
};

const BUTTON_PAD: u32 = 2;

// X rejects zero sized windows
fn fit(v: u32) -> u32 {
    v.max(1)
}

/// The pixel metrics used to lay out the windows of a [Frame].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    /// Border width around the client area
    pub border_width: u32,
    /// Height of the titlebar
    pub titlebar_height: u32,
    /// Height of the resize handle
    pub handle_height: u32,
    /// Width of the grips at either end of the handle
    pub grip_width: u32,
    /// Size of the square titlebar buttons
    pub button_size: u32,
}

impl FrameGeometry {
    /// Extract the frame metrics from a [Theme].
    pub fn from_theme(t: &Theme) -> FrameGeometry {
        FrameGeometry {
            border_width: t.border_width,
            titlebar_height: t.titlebar_height,
            handle_height: t.handle_height,
            grip_width: t.grip_width,
            button_size: t.button_size,
        }
    }

    /// The outer frame rect in root coordinates for a client with the
    /// given geometry.
    pub fn frame_rect(&self, client: Rect) -> Rect {
        Rect::new(
            client.x,
            client.y,
            fit(client.w + 2 * self.border_width),
            fit(client.h + self.titlebar_height + self.handle_height + 2 * self.border_width),
        )
    }

    /// The titlebar rect, relative to the frame.
    pub fn titlebar_rect(&self, client: Rect) -> Rect {
        let bw = self.border_width as i32;

        Rect::new(bw, bw, fit(client.w), fit(self.titlebar_height))
    }

    /// The rect holding the client window itself, relative to the frame.
    pub fn plate_rect(&self, client: Rect) -> Rect {
        let bw = self.border_width;

        Rect::new(
            bw as i32,
            (bw + self.titlebar_height) as i32,
            fit(client.w),
            fit(client.h),
        )
    }

    /// The title label rect, relative to the titlebar.
    pub fn label_rect(&self, client: Rect) -> Rect {
        let s = self.button_size;
        let w = client.w.saturating_sub(4 * s + 6 * BUTTON_PAD);
        let h = self.titlebar_height.saturating_sub(2 * BUTTON_PAD);

        Rect::new(
            (2 * BUTTON_PAD + s) as i32,
            BUTTON_PAD as i32,
            fit(w),
            fit(h),
        )
    }

    /// The iconify button rect, relative to the titlebar.
    pub fn button_iconify_rect(&self, _client: Rect) -> Rect {
        self.button_at(BUTTON_PAD)
    }

    /// The stick button rect, relative to the titlebar.
    pub fn button_stick_rect(&self, client: Rect) -> Rect {
        self.button_at(client.w.saturating_sub(3 * (self.button_size + BUTTON_PAD)))
    }

    /// The maximize button rect, relative to the titlebar.
    pub fn button_max_rect(&self, client: Rect) -> Rect {
        self.button_at(client.w.saturating_sub(2 * (self.button_size + BUTTON_PAD)))
    }

    /// The close button rect, relative to the titlebar.
    pub fn button_close_rect(&self, client: Rect) -> Rect {
        self.button_at(client.w.saturating_sub(self.button_size + BUTTON_PAD))
    }

    /// The resize handle rect, relative to the frame.
    pub fn handle_rect(&self, client: Rect) -> Rect {
        let bw = self.border_width;

        Rect::new(
            bw as i32,
            (bw + self.titlebar_height + client.h) as i32,
            fit(client.w),
            fit(self.handle_height),
        )
    }

    /// The left grip rect, relative to the handle.
    pub fn grip_left_rect(&self, _client: Rect) -> Rect {
        Rect::new(0, 0, fit(self.grip_width), fit(self.handle_height))
    }

    /// The right grip rect, relative to the handle.
    pub fn grip_right_rect(&self, client: Rect) -> Rect {
        Rect::new(
            client.w.saturating_sub(self.grip_width) as i32,
            0,
            fit(self.grip_width),
            fit(self.handle_height),
        )
    }

    fn button_at(&self, x: u32) -> Rect {
        let y = self.titlebar_height.saturating_sub(self.button_size) / 2;
        let s = fit(self.button_size);

        Rect::new(x as i32, y as i32, s, s)
    }
}

/// The decoration windows wrapping a single client.
///
/// The client window is reparented into the plate; everything else is
/// furniture around it. A frame is created when its client is managed and
/// destroyed when it is unmanaged, handing the client back to the root
/// window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The client this frame belongs to
    pub client: Xid,
    /// The outer frame window: the primary id reported in client lists
    pub window: Xid,
    /// The window the client is reparented into
    pub plate: Xid,
    /// The titlebar strip
    pub titlebar: Xid,
    /// The title label
    pub label: Xid,
    /// The iconify button
    pub button_iconify: Xid,
    /// The maximize button
    pub button_max: Xid,
    /// The stick button
    pub button_stick: Xid,
    /// The close button
    pub button_close: Xid,
    /// The resize handle below the client
    pub handle: Xid,
    /// The left resize grip
    pub grip_left: Xid,
    /// The right resize grip
    pub grip_right: Xid,
    /// The metrics this frame was built with
    pub geometry: FrameGeometry,
    /// The client geometry this frame was built around
    pub client_rect: Rect,
}

impl Frame {
    /// Build the decoration window tree for a client and reparent the
    /// client into it.
    ///
    /// All windows are created unmapped: nothing is visible until
    /// [show][Frame::show] is called.
    pub fn new<X: XConn>(
        x: &X,
        client: Xid,
        client_rect: Rect,
        root: Xid,
        theme: &Theme,
    ) -> Result<Frame> {
        let g = FrameGeometry::from_theme(theme);
        let c = theme.colors;

        let win = |parent, r, color| {
            x.create_window(WinType::InputOutput { background: color }, parent, r, false)
        };

        let window = win(root, g.frame_rect(client_rect), c.frame)?;
        let titlebar = win(window, g.titlebar_rect(client_rect), c.titlebar)?;
        let label = win(titlebar, g.label_rect(client_rect), c.label)?;
        let button_iconify = win(titlebar, g.button_iconify_rect(client_rect), c.buttons)?;
        let button_max = win(titlebar, g.button_max_rect(client_rect), c.buttons)?;
        let button_stick = win(titlebar, g.button_stick_rect(client_rect), c.buttons)?;
        let button_close = win(titlebar, g.button_close_rect(client_rect), c.buttons)?;
        let plate = win(window, g.plate_rect(client_rect), c.frame)?;
        let handle = win(window, g.handle_rect(client_rect), c.handle)?;
        let grip_left = win(handle, g.grip_left_rect(client_rect), c.handle)?;
        let grip_right = win(handle, g.grip_right_rect(client_rect), c.handle)?;

        x.reparent(client, plate, Point::new(0, 0))?;

        Ok(Frame {
            client,
            window,
            plate,
            titlebar,
            label,
            button_iconify,
            button_max,
            button_stick,
            button_close,
            handle,
            grip_left,
            grip_right,
            geometry: g,
            client_rect,
        })
    }

    /// Every window of this frame, primary first.
    ///
    /// These ids are registered in the dispatch map so that events on any
    /// part of the decoration resolve to the owning client.
    pub fn windows(&self) -> [Xid; 11] {
        [
            self.window,
            self.plate,
            self.titlebar,
            self.label,
            self.button_iconify,
            self.button_max,
            self.button_stick,
            self.button_close,
            self.handle,
            self.grip_left,
            self.grip_right,
        ]
    }

    /// Map the frame and everything in it, client included.
    pub fn show<X: XConn>(&self, x: &X) -> Result<()> {
        let [window, rest @ ..] = self.windows();
        for w in rest {
            x.map(w)?;
        }
        x.map(self.client)?;
        x.map(window)
    }

    /// Unmap the frame, hiding the client along with it.
    pub fn hide<X: XConn>(&self, x: &X) -> Result<()> {
        x.unmap(self.window)
    }

    /// Hand the client back to the root window at its original position
    /// and destroy the decoration windows.
    pub fn destroy<X: XConn>(&self, x: &X, root: Xid) -> Result<()> {
        x.reparent(self.client, root, self.client_rect.origin())?;
        x.destroy_window(self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn g() -> FrameGeometry {
        FrameGeometry::from_theme(&Theme::default())
    }

    const CLIENT: Rect = Rect::new(100, 80, 640, 480);

    #[test]
    fn frame_rect_wraps_the_client() {
        assert_eq!(g().frame_rect(CLIENT), Rect::new(100, 80, 642, 508));
    }

    #[test]
    fn plate_sits_below_the_titlebar() {
        assert_eq!(g().plate_rect(CLIENT), Rect::new(1, 21, 640, 480));
    }

    #[test]
    fn titlebar_spans_the_client_width() {
        assert_eq!(g().titlebar_rect(CLIENT), Rect::new(1, 1, 640, 20));
    }

    #[test]
    fn handle_sits_below_the_client() {
        assert_eq!(g().handle_rect(CLIENT), Rect::new(1, 501, 640, 6));
    }

    #[test]
    fn grips_sit_at_either_end_of_the_handle() {
        assert_eq!(g().grip_left_rect(CLIENT), Rect::new(0, 0, 16, 6));
        assert_eq!(g().grip_right_rect(CLIENT), Rect::new(624, 0, 16, 6));
    }

    #[test_case(g().button_iconify_rect(CLIENT), 2; "iconify at the left")]
    #[test_case(g().button_stick_rect(CLIENT), 592; "stick")]
    #[test_case(g().button_max_rect(CLIENT), 608; "maximize")]
    #[test_case(g().button_close_rect(CLIENT), 624; "close at the right")]
    #[test]
    fn buttons_are_vertically_centred(r: Rect, x: i32) {
        assert_eq!(r, Rect::new(x, 3, 14, 14));
    }

    #[test]
    fn label_fills_the_space_between_the_buttons() {
        assert_eq!(g().label_rect(CLIENT), Rect::new(18, 2, 572, 16));
    }

    #[test]
    fn narrow_clients_never_produce_zero_sized_windows() {
        let tiny = Rect::new(0, 0, 10, 10);

        for r in [
            g().frame_rect(tiny),
            g().titlebar_rect(tiny),
            g().plate_rect(tiny),
            g().label_rect(tiny),
            g().button_close_rect(tiny),
            g().handle_rect(tiny),
            g().grip_right_rect(tiny),
        ] {
            assert!(r.w >= 1 && r.h >= 1, "{r} has a zero dimension");
        }
    }
}
