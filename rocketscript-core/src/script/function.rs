//! The Function lifecycle contract
//!
//! A Function is one discrete autonomous behavior. The runner drives it
//! through `init` → `run`* → `stop`, asking `is_finished` after each
//! `run` once it has been initialized.

/// A discrete autonomous behavior with a four-phase lifecycle
///
/// Parameters are passed at construction; the lifecycle calls take none.
pub trait Function {
    /// One-time setup on activation
    ///
    /// Called exactly once, before the first `run`, and never retried.
    fn init(&mut self);

    /// One control tick of work
    ///
    /// Must return well within the tick period: no blocking, no waiting
    /// on hardware.
    fn run(&mut self);

    /// Deactivation
    ///
    /// Called exactly once, on completion or cancellation. Must leave the
    /// owned subsystem holding a safe output.
    fn stop(&mut self);

    /// Completion query
    ///
    /// Side-effect free and monotone: once true it stays true for the rest
    /// of the active period.
    fn is_finished(&self) -> bool;

    /// Short name for diagnostics
    fn name(&self) -> &str;
}

/// Lifecycle position of a Function
///
/// Functions own one of these to catch sequencing violations. A violation
/// is a logic fault: it trips a debug assertion in test and debug builds,
/// and the offending call is skipped in release builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lifecycle {
    /// Constructed, `init` not yet called
    #[default]
    Pending,
    /// Between `init` and `stop`
    Active,
    /// `stop` has been called
    Stopped,
}

impl Lifecycle {
    /// Enter the active phase
    ///
    /// Returns false (and skips) if the Function was already activated.
    pub fn activate(&mut self) -> bool {
        debug_assert_eq!(*self, Lifecycle::Pending, "init called twice");
        if *self != Lifecycle::Pending {
            return false;
        }
        *self = Lifecycle::Active;
        true
    }

    /// Check that `run` is allowed
    pub fn check_active(&self) -> bool {
        debug_assert_eq!(*self, Lifecycle::Active, "run outside init..stop");
        *self == Lifecycle::Active
    }

    /// Leave the active phase
    ///
    /// Returns false (and skips) if the Function was never activated or is
    /// already stopped.
    pub fn deactivate(&mut self) -> bool {
        debug_assert_eq!(*self, Lifecycle::Active, "stop outside init..stop");
        if *self != Lifecycle::Active {
            return false;
        }
        *self = Lifecycle::Stopped;
        true
    }

    /// Check if the Function is between `init` and `stop`
    pub fn is_active(&self) -> bool {
        *self == Lifecycle::Active
    }
}
