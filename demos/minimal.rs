//! oxbow :: minimal configuration
//!
//! Manage every screen of the current display with the default theme and
//! desktop names. Pair it with a hotkey daemon or run a terminal from another
//! tty to actually interact with the windows it frames.
use oxbow::{x11rb::RustConn, Config, Result, WindowManager};
use tracing_subscriber::{self, prelude::*};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .finish()
        .init();

    let conn = RustConn::new()?;
    let wm = WindowManager::new(Config::default(), conn)?;

    wm.run()
}
