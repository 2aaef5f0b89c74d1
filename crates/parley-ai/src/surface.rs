//! Display surface the session renders into.

use crate::Role;

/// Sink for rendered conversation output.
///
/// The session calls these from whichever task is running a submission,
/// so implementations must be cheap and must not block on user input.
pub trait Surface: Send + Sync {
    /// Show one rendered message.
    fn show(&self, role: Role, markup: &str);

    /// A remote call started; show the "thinking" indicator.
    fn pending_started(&self);

    /// The remote call finished; remove the indicator.
    fn pending_finished(&self);
}
