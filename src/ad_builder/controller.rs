//! Ad submission workflow: edits, validation, the create-ad request and
//! the toast sequence that follows it.
//!
//! The controller is owned by one host thread and mutated only through its
//! `&mut self` methods. Gateway calls run on background threads; their
//! results are applied when the host calls [`AdBuilderController::poll`]
//! (typically once per frame) or [`AdBuilderController::wait_for_jobs`].

use std::sync::Arc;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use super::fields::{FieldKind, FormFields, UnknownFieldError};
use super::jobs::{ControllerJobs, CreateAdResult, InfoFetchResult, JobMessage};
use super::state::{FormState, Phase, SlotError, parse_slot};
use super::toast::{DismissedToast, ToastKind, ToastScheduler, ToastView};
use super::validation::{self, ErrorKey, ErrorMap};
use super::view_model::{self, AdPreview, RunWindow, SlotQuote};
use crate::ad_gateway::{AdGateway, AdInfo, AdSubmission, GatewayError, HttpAdGateway};
use crate::config::AdBuilderSettings;

/// Follow-up work attached to a toast, run once the toast is hidden.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DismissAction {
    /// End the success state of the given submission.
    ClearSubmitted { generation: u64 },
}

/// Why a create-ad request did not store the ad.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Create-ad request failed: {0}")]
    Transport(#[from] GatewayError),
    #[error("Create-ad request rejected: {message:?}")]
    Rejected { message: Option<String> },
}

/// Why `on_submit` did not start a request.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Incomplete fields: {}", describe_errors(.0))]
    ValidationFailed(ErrorMap),
    #[error("A submission is already in flight")]
    InFlight,
    #[error("The ad builder has been disposed")]
    Disposed,
}

fn describe_errors(errors: &ErrorMap) -> String {
    errors
        .active()
        .map(ErrorKey::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Something the host may want to react to, reported by `poll`.
#[derive(Debug)]
pub enum WorkflowEvent {
    PricingLoaded(AdInfo),
    /// Pricing could not be fetched; the form stays usable without it.
    PricingUnavailable(GatewayError),
    SubmissionSucceeded { tokens: u32 },
    SubmissionFailed(SubmissionError),
    ToastDismissed(ToastKind),
}

pub struct AdBuilderController {
    settings: AdBuilderSettings,
    form: FormState,
    phase: Phase,
    toasts: ToastScheduler<DismissAction>,
    jobs: ControllerJobs,
    pricing: Option<AdInfo>,
    /// Tags requests so responses from a previous lifetime are ignored.
    generation: u64,
    /// Slot count of the request in flight.
    pending_tokens: Option<u32>,
    disposed: bool,
}

impl AdBuilderController {
    /// Create the workflow and start loading slot pricing.
    pub fn new(gateway: Arc<dyn AdGateway>, settings: AdBuilderSettings) -> Self {
        let mut jobs = ControllerJobs::new(gateway);
        jobs.begin_info_fetch();
        Self {
            settings: settings.normalized(),
            form: FormState::default(),
            phase: Phase::Editing,
            toasts: ToastScheduler::new(),
            jobs,
            pricing: None,
            generation: 0,
            pending_tokens: None,
            disposed: false,
        }
    }

    /// Create the workflow against the HTTP backend named in `settings`.
    pub fn with_http_gateway(settings: AdBuilderSettings) -> Result<Self, url::ParseError> {
        let settings = settings.normalized();
        let gateway = HttpAdGateway::new(&settings.api_base_url)?;
        Ok(Self::new(Arc::new(gateway), settings))
    }

    /// Store a field edit and re-validate that field.
    pub fn on_edit_field(&mut self, field: FieldKind, raw: Option<&str>) {
        let value = raw.unwrap_or_default().to_string();
        let patch = validation::validate_field(field, &value, self.settings.limits());
        self.form.set_field(field, value, &patch);
        if self.phase == Phase::Failed {
            self.transition(Phase::Editing);
        }
    }

    /// Like [`Self::on_edit_field`], addressed by the input's name.
    pub fn on_edit_named(&mut self, name: &str, raw: Option<&str>) -> Result<(), UnknownFieldError> {
        let field = name.parse::<FieldKind>()?;
        self.on_edit_field(field, raw);
        Ok(())
    }

    /// Select a slot count from its raw input value.
    pub fn on_slot_change(&mut self, raw: &str) -> Result<(), SlotError> {
        let slot = parse_slot(raw)?;
        self.select_slot(slot)
    }

    pub fn select_slot(&mut self, slot: u32) -> Result<(), SlotError> {
        self.form.select_slot(slot, self.settings.num_slots)
    }

    /// Validate everything and, if valid, start the create-ad request.
    ///
    /// Invalid input shows a warning toast and returns
    /// [`SubmitError::ValidationFailed`]. The request outcome is reported
    /// later through [`Self::poll`].
    pub fn on_submit(&mut self, now: Instant) -> Result<(), SubmitError> {
        if self.disposed {
            return Err(SubmitError::Disposed);
        }
        if self.phase.show_spinner() || self.jobs.create_in_progress() {
            tracing::debug!("Ignoring submit while a submission is in flight");
            return Err(SubmitError::InFlight);
        }

        self.transition(Phase::Validating);
        let patch = validation::validate_all(&self.form.fields, self.settings.limits());
        self.form.apply_patch(&patch);
        if self.form.errors.has_errors() {
            self.transition(Phase::Editing);
            self.toasts
                .show(ToastKind::Warning, self.settings.toast_duration(), None, now);
            tracing::debug!(
                errors = %describe_errors(&self.form.errors),
                "Submission blocked by invalid fields"
            );
            return Err(SubmitError::ValidationFailed(self.form.errors.clone()));
        }

        self.generation += 1;
        let generation = self.generation;
        let ad = self.submission();
        let tokens = ad.tokens;
        if !self.jobs.begin_create_ad(generation, ad) {
            self.transition(Phase::Editing);
            return Err(SubmitError::InFlight);
        }
        self.pending_tokens = Some(tokens);
        self.transition(Phase::Submitting { generation });
        tracing::info!(tokens, "Submitting ad");
        Ok(())
    }

    /// Apply settled background jobs and expire the toast if it is due.
    pub fn poll(&mut self, now: Instant) -> Vec<WorkflowEvent> {
        let mut events = Vec::new();
        loop {
            match self.jobs.try_recv_message() {
                Ok(message) => self.handle_job_message(message, now, &mut events),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if let Some(dismissed) = self.toasts.tick(now) {
            self.handle_dismissed(dismissed, &mut events);
        }
        events
    }

    /// Block up to `timeout` for the next background job, then [`Self::poll`].
    pub fn wait_for_jobs(&mut self, timeout: Duration, now: Instant) -> Vec<WorkflowEvent> {
        let mut events = Vec::new();
        match self.jobs.recv_message_timeout(timeout) {
            Ok(message) => self.handle_job_message(message, now, &mut events),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {}
        }
        events.extend(self.poll(now));
        events
    }

    /// Tear the workflow down: the toast is cancelled without running its
    /// action, in-flight responses are ignored, and submits are refused.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.generation += 1;
        self.pending_tokens = None;
        self.toasts.cancel();
        tracing::debug!(phase = %self.phase, "Ad builder disposed");
    }

    fn handle_job_message(
        &mut self,
        message: JobMessage,
        now: Instant,
        events: &mut Vec<WorkflowEvent>,
    ) {
        match message {
            JobMessage::InfoFetched(message) => self.handle_info_fetched(message, events),
            JobMessage::AdCreated(message) => self.handle_ad_created(message, now, events),
        }
    }

    fn handle_info_fetched(&mut self, message: InfoFetchResult, events: &mut Vec<WorkflowEvent>) {
        self.jobs.clear_info_fetch();
        if self.disposed {
            return;
        }
        match message.result {
            Ok(info) => {
                tracing::debug!(cost_per_slot = info.current_cost_per_slot, "Slot pricing loaded");
                self.pricing = Some(info);
                events.push(WorkflowEvent::PricingLoaded(info));
            }
            Err(err) => {
                tracing::warn!("Failed to load slot pricing: {err}");
                events.push(WorkflowEvent::PricingUnavailable(err));
            }
        }
    }

    fn handle_ad_created(
        &mut self,
        message: CreateAdResult,
        now: Instant,
        events: &mut Vec<WorkflowEvent>,
    ) {
        self.jobs.clear_create_ad();
        let CreateAdResult { generation, result } = message;
        if self.disposed || self.phase != (Phase::Submitting { generation }) {
            tracing::debug!(generation, "Dropping stale create-ad response");
            return;
        }
        let tokens = self.pending_tokens.take().unwrap_or_default();
        let outcome = match result {
            Ok(response) if response.is_success() => Ok(()),
            Ok(response) => Err(SubmissionError::Rejected {
                message: response.message,
            }),
            Err(err) => Err(SubmissionError::Transport(err)),
        };
        let duration = self.settings.toast_duration();
        match outcome {
            Ok(()) => {
                self.form = FormState::default();
                self.transition(Phase::Succeeded { generation });
                self.toasts.show(
                    ToastKind::Success,
                    duration,
                    Some(DismissAction::ClearSubmitted { generation }),
                    now,
                );
                tracing::info!(tokens, "Ad submitted");
                events.push(WorkflowEvent::SubmissionSucceeded { tokens });
            }
            Err(err) => {
                self.transition(Phase::Failed);
                self.toasts.show(ToastKind::Danger, duration, None, now);
                tracing::warn!("Ad submission failed: {err}");
                events.push(WorkflowEvent::SubmissionFailed(err));
            }
        }
    }

    fn handle_dismissed(
        &mut self,
        dismissed: DismissedToast<DismissAction>,
        events: &mut Vec<WorkflowEvent>,
    ) {
        events.push(WorkflowEvent::ToastDismissed(dismissed.kind));
        match dismissed.on_dismiss {
            Some(DismissAction::ClearSubmitted { generation })
                if self.phase == (Phase::Succeeded { generation }) =>
            {
                self.transition(Phase::Editing);
            }
            Some(DismissAction::ClearSubmitted { .. }) | None => {}
        }
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            tracing::debug!(from = %self.phase, to = %next, "Ad builder phase change");
        }
        self.phase = next;
    }

    fn submission(&self) -> AdSubmission {
        let fields = &self.form.fields;
        AdSubmission {
            description: fields.description.clone(),
            title: fields.title.clone(),
            email: fields.email.clone(),
            company: fields.project.clone(),
            url: fields.url.clone(),
            tokens: self.form.selected_slot,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn fields(&self) -> &FormFields {
        &self.form.fields
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.form.errors
    }

    pub fn selected_slot(&self) -> u32 {
        self.form.selected_slot
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn show_spinner(&self) -> bool {
        self.phase.show_spinner()
    }

    pub fn was_submitted(&self) -> bool {
        self.phase.was_submitted()
    }

    pub fn fetch_error(&self) -> bool {
        self.phase.fetch_error()
    }

    pub fn toast(&self) -> Option<ToastView> {
        self.toasts.current()
    }

    /// When the host should next call [`Self::poll`] for the toast to expire.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.toasts.deadline()
    }

    pub fn pricing(&self) -> Option<AdInfo> {
        self.pricing
    }

    pub fn settings(&self) -> &AdBuilderSettings {
        &self.settings
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn slot_quotes(&self) -> Vec<SlotQuote> {
        view_model::slot_quotes(self.settings.num_slots, self.pricing)
    }

    pub fn preview(&self) -> AdPreview {
        view_model::preview(&self.form.fields)
    }

    /// Run dates for an ad booked today.
    pub fn run_window(&self) -> RunWindow {
        RunWindow::for_today()
    }

    /// Messages for every flagged error of `field`.
    pub fn field_messages(&self, field: FieldKind) -> Vec<String> {
        let limits = self.settings.limits();
        self.form
            .errors
            .active()
            .filter(|key| key.field() == field)
            .map(|key| view_model::error_message(key, limits))
            .collect()
    }
}

impl Drop for AdBuilderController {
    fn drop(&mut self) {
        self.dispose();
    }
}
