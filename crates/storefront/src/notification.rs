//! "Added to cart" toast lifecycle.
//!
//! A toast moves through `Hidden → Showing → Dismissing → Removed`:
//!
//! - created `Hidden`, becomes `Showing` on the enter tick ([`ENTER_DELAY`])
//! - a manual close or the auto-dismiss timeout ([`AUTO_DISMISS_DELAY`]) moves
//!   it to `Dismissing`
//! - it is `Removed` once the exit animation ([`REMOVE_DELAY`]) has run
//!
//! At most one toast is live. Creating a new one sends the previous one
//! straight to `Removed`; timers still pending for it fire later and are
//! ignored because they carry the old [`ToastId`].
//!
//! Timers are requested from an injected [`Scheduler`], so hosts decide how
//! time passes: [`ManualScheduler`] for explicit pumping, [`TokioScheduler`]
//! for real delays.

use std::time::Duration;

use tokio::sync::mpsc;

use wine_store_core::{LineItem, Money};

/// Delay before the enter animation starts.
pub const ENTER_DELAY: Duration = Duration::from_millis(10);
/// How long a toast stays up without interaction.
pub const AUTO_DISMISS_DELAY: Duration = Duration::from_millis(3500);
/// Length of the exit animation before the toast is removed.
pub const REMOVE_DELAY: Duration = Duration::from_millis(250);

/// Identity of one toast instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Where a toast is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastPhase {
    Hidden,
    Showing,
    Dismissing,
    Removed,
}

impl ToastPhase {
    /// CSS classes carried by the toast element in this phase.
    #[must_use]
    pub const fn css_classes(self) -> &'static str {
        match self {
            Self::Hidden | Self::Removed => "",
            Self::Showing => "show",
            Self::Dismissing => "show hide",
        }
    }
}

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Enter,
    AutoDismiss,
    Remove,
}

/// A timer scheduled for a specific toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastTimer {
    pub toast: ToastId,
    pub kind: TimerKind,
}

/// Schedule-and-forget timer capability.
pub trait Scheduler {
    /// Deliver `timer` back to the widget after `delay`.
    fn schedule(&mut self, delay: Duration, timer: ToastTimer);
}

/// A toast announcing an added product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub product_name: String,
    pub price: Money,
    pub phase: ToastPhase,
}

/// A phase change applied by the [`Toaster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub toast: ToastId,
    pub from: ToastPhase,
    pub to: ToastPhase,
}

/// Owner of the single live toast.
#[derive(Debug, Default)]
pub struct Toaster {
    current: Option<Toast>,
    next_id: u64,
}

impl Toaster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent toast, including a removed one.
    #[must_use]
    pub const fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Whether a toast is on screen (any phase but `Removed`).
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|toast| toast.phase != ToastPhase::Removed)
    }

    /// Create a toast for `item`, replacing any visible one.
    ///
    /// Returns the forced removal of the previous toast, if there was one.
    pub fn show(&mut self, item: &LineItem, scheduler: &mut impl Scheduler) -> Option<Transition> {
        let replaced = self
            .current
            .as_mut()
            .filter(|toast| toast.phase != ToastPhase::Removed)
            .map(|toast| move_to(toast, ToastPhase::Removed));

        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.current = Some(Toast {
            id,
            product_name: item.name.clone(),
            price: item.price,
            phase: ToastPhase::Hidden,
        });

        scheduler.schedule(ENTER_DELAY, ToastTimer { toast: id, kind: TimerKind::Enter });
        scheduler.schedule(
            AUTO_DISMISS_DELAY,
            ToastTimer { toast: id, kind: TimerKind::AutoDismiss },
        );
        tracing::debug!(toast = id.0, replaced = replaced.is_some(), "Toast created");

        replaced
    }

    /// Manual close.
    pub fn dismiss(&mut self, scheduler: &mut impl Scheduler) -> Option<Transition> {
        let toast = self.current.as_mut()?;
        start_dismiss(toast, scheduler)
    }

    /// Apply a fired timer. Timers for replaced toasts, or that no longer
    /// apply to the current phase, are ignored.
    pub fn fire(&mut self, timer: ToastTimer, scheduler: &mut impl Scheduler) -> Option<Transition> {
        let Some(toast) = self.current.as_mut().filter(|toast| toast.id == timer.toast) else {
            tracing::trace!(toast = timer.toast.0, "Ignoring stale toast timer");
            return None;
        };

        match (timer.kind, toast.phase) {
            (TimerKind::Enter, ToastPhase::Hidden) => Some(move_to(toast, ToastPhase::Showing)),
            (TimerKind::AutoDismiss, _) => start_dismiss(toast, scheduler),
            (TimerKind::Remove, ToastPhase::Dismissing) => {
                Some(move_to(toast, ToastPhase::Removed))
            }
            _ => None,
        }
    }
}

fn move_to(toast: &mut Toast, to: ToastPhase) -> Transition {
    let from = toast.phase;
    toast.phase = to;
    Transition { toast: toast.id, from, to }
}

fn start_dismiss(toast: &mut Toast, scheduler: &mut impl Scheduler) -> Option<Transition> {
    match toast.phase {
        ToastPhase::Hidden | ToastPhase::Showing => {
            scheduler.schedule(
                REMOVE_DELAY,
                ToastTimer { toast: toast.id, kind: TimerKind::Remove },
            );
            Some(move_to(toast, ToastPhase::Dismissing))
        }
        ToastPhase::Dismissing | ToastPhase::Removed => None,
    }
}

// =============================================================================
// Schedulers
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Duration,
    seq: u64,
    timer: ToastTimer,
}

/// Virtual-clock scheduler. Nothing fires until the host asks for due timers.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    seq: u64,
    pending: Vec<Pending>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers not yet fired.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Pop the earliest timer due at or before `deadline`, moving the clock
    /// to its due time. Timers due together fire in scheduling order.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<ToastTimer> {
        let (index, next) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= deadline)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, p)| (i, *p))?;

        self.pending.swap_remove(index);
        self.now = self.now.max(next.due);
        Some(next.timer)
    }

    /// Let `by` pass and return every timer that came due, in firing order.
    ///
    /// Timers scheduled while handling the returned ones are not included;
    /// hosts that need those use [`pop_due`](Self::pop_due) in a loop.
    pub fn advance(&mut self, by: Duration) -> Vec<ToastTimer> {
        let deadline = self.now + by;
        let fired = core::iter::from_fn(|| self.pop_due(deadline)).collect();
        self.set_now(deadline);
        fired
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, timer: ToastTimer) {
        self.seq += 1;
        self.pending.push(Pending {
            due: self.now + delay,
            seq: self.seq,
            timer,
        });
    }
}

/// Scheduler backed by tokio timers.
///
/// Fired timers arrive on the receiver returned by [`TokioScheduler::new`];
/// the host feeds them back into the widget.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<ToastTimer>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ToastTimer>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, timer: ToastTimer) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(?timer, "No tokio runtime, toast timer dropped");
            return;
        };

        let tx = self.tx.clone();
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone once the page is torn down.
            let _ = tx.send(timer);
        });
    }
}
