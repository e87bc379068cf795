//! Single-slot, auto-dismissing notification.
//!
//! The scheduler owns at most one toast and its dismiss deadline. Showing a
//! new toast replaces the current one and restarts the deadline; the replaced
//! toast's dismiss action is dropped unrun. The host drives time by calling
//! [`ToastScheduler::tick`]: once the deadline has passed the toast is hidden
//! first and only then handed back with its action, so whoever runs the
//! action already observes the toast as gone. Dropping the scheduler or
//! calling [`ToastScheduler::cancel`] discards a pending action.

use std::time::{Duration, Instant};

/// Visual category of a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToastKind {
    /// Submission blocked by invalid fields.
    Warning,
    /// The ad was stored.
    Success,
    /// The create-ad request failed or was rejected.
    Danger,
}

impl ToastKind {
    /// Text shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::Warning => "Incomplete Fields",
            Self::Success => "Your Ad has been saved!",
            Self::Danger => "Something went wrong while creating the Ad. Please try again",
        }
    }
}

/// Identifies one `show` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(u64);

/// Read-only snapshot of the visible toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastView {
    pub id: ToastId,
    pub kind: ToastKind,
    pub deadline: Instant,
}

/// A toast whose deadline elapsed, with the action to run now that it is hidden.
#[derive(Debug)]
pub struct DismissedToast<A> {
    pub id: ToastId,
    pub kind: ToastKind,
    pub on_dismiss: Option<A>,
}

#[derive(Debug)]
struct ActiveToast<A> {
    id: ToastId,
    kind: ToastKind,
    deadline: Instant,
    on_dismiss: Option<A>,
}

#[derive(Debug)]
pub struct ToastScheduler<A> {
    active: Option<ActiveToast<A>>,
    next_id: u64,
}

impl<A> Default for ToastScheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ToastScheduler<A> {
    pub fn new() -> Self {
        Self {
            active: None,
            next_id: 1,
        }
    }

    /// Show `kind` until `now + duration`, replacing any visible toast.
    pub fn show(
        &mut self,
        kind: ToastKind,
        duration: Duration,
        on_dismiss: Option<A>,
        now: Instant,
    ) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        if let Some(replaced) = self.active.take() {
            tracing::debug!(
                replaced = ?replaced.kind,
                had_action = replaced.on_dismiss.is_some(),
                "Replacing visible toast"
            );
        }
        self.active = Some(ActiveToast {
            id,
            kind,
            deadline: now + duration,
            on_dismiss,
        });
        tracing::debug!(?kind, ?duration, "Toast shown");
        id
    }

    /// Hide the toast if its deadline has passed and return it with its action.
    pub fn tick(&mut self, now: Instant) -> Option<DismissedToast<A>> {
        if self.active.as_ref()?.deadline > now {
            return None;
        }
        let expired = self.active.take()?;
        tracing::debug!(kind = ?expired.kind, "Toast dismissed");
        Some(DismissedToast {
            id: expired.id,
            kind: expired.kind,
            on_dismiss: expired.on_dismiss,
        })
    }

    /// Hide the toast immediately without running its action.
    ///
    /// Returns `true` if a toast was visible.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(cancelled) => {
                tracing::debug!(kind = ?cancelled.kind, "Toast cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.active.is_some()
    }

    pub fn current(&self) -> Option<ToastView> {
        self.active.as_ref().map(|toast| ToastView {
            id: toast.id,
            kind: toast.kind,
            deadline: toast.deadline,
        })
    }

    /// When the visible toast is due to disappear.
    pub fn deadline(&self) -> Option<Instant> {
        self.active.as_ref().map(|toast| toast.deadline)
    }
}
