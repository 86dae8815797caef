//! Traits for writing and composing hooks
use crate::{core::State, x::XConn, Result, Xid};
use std::fmt;

/// Action to run when a client joins or leaves the managed set.
///
/// The `managed` call is made at the end of the manage sequence, once the
/// client is decorated, stacked and announced; `unmanaged` is made at the
/// start of the unmanage sequence while the client is still intact. Both
/// default to doing nothing so implementations only need to provide the
/// half they care about.
///
/// Hook errors are logged rather than propagated: a failing hook can not
/// veto the lifecycle transition it is observing.
pub trait LifecycleHook<X>
where
    X: XConn,
{
    /// Called after a new client has been fully managed
    #[allow(unused_variables)]
    fn managed(&mut self, client: Xid, state: &mut State<X>, x: &X) -> Result<()> {
        Ok(())
    }

    /// Called before a client is dismantled
    #[allow(unused_variables)]
    fn unmanaged(&mut self, client: Xid, state: &mut State<X>, x: &X) -> Result<()> {
        Ok(())
    }

    /// Convert to a trait object
    fn boxed(self) -> Box<dyn LifecycleHook<X>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }

    /// Compose this hook with another [LifecycleHook]. Both hooks run for
    /// every call: an error in the first does not skip the second.
    fn then<H>(self, next: H) -> ComposedLifecycleHook<X>
    where
        H: LifecycleHook<X> + 'static,
        Self: Sized + 'static,
    {
        ComposedLifecycleHook {
            first: Box::new(self),
            second: Box::new(next),
        }
    }
}

impl<X: XConn> fmt::Debug for Box<dyn LifecycleHook<X>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHook").finish()
    }
}

/// The result of composing two lifecycle hooks using `then`
#[derive(Debug)]
pub struct ComposedLifecycleHook<X>
where
    X: XConn,
{
    first: Box<dyn LifecycleHook<X>>,
    second: Box<dyn LifecycleHook<X>>,
}

impl<X> LifecycleHook<X> for ComposedLifecycleHook<X>
where
    X: XConn,
{
    fn managed(&mut self, client: Xid, state: &mut State<X>, x: &X) -> Result<()> {
        let first = self.first.managed(client, state, x);
        self.second.managed(client, state, x)?;

        first
    }

    fn unmanaged(&mut self, client: Xid, state: &mut State<X>, x: &X) -> Result<()> {
        let first = self.first.unmanaged(client, state, x);
        self.second.unmanaged(client, state, x)?;

        first
    }
}

/// Action to run when input grabs should be installed or removed for a client.
///
/// Called with `install` set when a client joins the managed set and unset
/// when it leaves, so that the embedding program can maintain button and key
/// grabs on the decoration windows without the engine knowing anything about
/// bindings.
pub trait GrabHook<X>
where
    X: XConn,
{
    /// Run this hook
    fn call(&mut self, client: Xid, install: bool, state: &mut State<X>, x: &X) -> Result<()>;

    /// Convert to a trait object
    fn boxed(self) -> Box<dyn GrabHook<X>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<X: XConn> fmt::Debug for Box<dyn GrabHook<X>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrabHook").finish()
    }
}

impl<F, X> GrabHook<X> for F
where
    F: FnMut(Xid, bool, &mut State<X>, &X) -> Result<()>,
    X: XConn,
{
    fn call(&mut self, client: Xid, install: bool, state: &mut State<X>, x: &X) -> Result<()> {
        (self)(client, install, state, x)
    }
}
