use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::controller::{AdBuilderController, WorkflowEvent};
use super::fields::FieldKind;
use crate::ad_gateway::{AdGateway, AdInfo, AdSubmission, CreateAdResponse, GatewayError};
use crate::config::AdBuilderSettings;

const WAIT_STEP: Duration = Duration::from_millis(50);
const WAIT_ATTEMPTS: usize = 100;

pub(crate) enum Reply {
    Success,
    Message(&'static str),
    Transport,
}

/// Scripted in-memory gateway that records every create-ad call.
#[derive(Default)]
pub(crate) struct FakeGateway {
    cost_per_slot: Option<f64>,
    replies: Mutex<VecDeque<Reply>>,
    submitted: Mutex<Vec<AdSubmission>>,
    gate: Mutex<Option<Receiver<()>>>,
}

impl FakeGateway {
    pub(crate) fn with_cost(cost_per_slot: f64) -> Self {
        Self {
            cost_per_slot: Some(cost_per_slot),
            ..Self::default()
        }
    }

    pub(crate) fn reply(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Make the next create-ad call block until the returned sender fires.
    pub(crate) fn hold(&self) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub(crate) fn submitted(&self) -> Vec<AdSubmission> {
        self.submitted.lock().unwrap().clone()
    }
}

impl AdGateway for FakeGateway {
    fn fetch_info(&self) -> Result<AdInfo, GatewayError> {
        self.cost_per_slot
            .map(|current_cost_per_slot| AdInfo {
                current_cost_per_slot,
            })
            .ok_or_else(|| GatewayError::Transport("connection refused".to_string()))
    }

    fn create_ad(&self, ad: &AdSubmission) -> Result<CreateAdResponse, GatewayError> {
        self.submitted.lock().unwrap().push(ad.clone());
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        match self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Success) {
            Reply::Success => Ok(CreateAdResponse::success()),
            Reply::Message(message) => Ok(CreateAdResponse::with_message(message)),
            Reply::Transport => Err(GatewayError::Transport("connection reset".to_string())),
        }
    }
}

/// Build a controller and wait until its pricing request has settled.
pub(crate) fn controller_with(gateway: Arc<FakeGateway>) -> AdBuilderController {
    let mut controller = AdBuilderController::new(gateway, AdBuilderSettings::default());
    let now = Instant::now();
    for _ in 0..WAIT_ATTEMPTS {
        let events = controller.wait_for_jobs(WAIT_STEP, now);
        if events.iter().any(|event| {
            matches!(
                event,
                WorkflowEvent::PricingLoaded(_) | WorkflowEvent::PricingUnavailable(_)
            )
        }) {
            break;
        }
    }
    controller
}

/// Wait until the in-flight submission settles, applying it at `now`.
pub(crate) fn wait_for_submission(
    controller: &mut AdBuilderController,
    now: Instant,
) -> Vec<WorkflowEvent> {
    let mut events = Vec::new();
    for _ in 0..WAIT_ATTEMPTS {
        events.extend(controller.wait_for_jobs(WAIT_STEP, now));
        if events.iter().any(|event| {
            matches!(
                event,
                WorkflowEvent::SubmissionSucceeded { .. } | WorkflowEvent::SubmissionFailed(_)
            )
        }) {
            break;
        }
    }
    events
}

pub(crate) fn fill_valid(controller: &mut AdBuilderController) {
    for (field, value) in [
        (FieldKind::Title, "Promo"),
        (FieldKind::Description, "Fast nano nodes"),
        (FieldKind::Url, "https://acme.io"),
        (FieldKind::Project, "Acme"),
        (FieldKind::Email, "a@b.com"),
    ] {
        controller.on_edit_field(field, Some(value));
    }
}
