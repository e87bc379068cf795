use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use adbuilder::ad_builder::{AdBuilderController, WorkflowEvent};
use adbuilder::ad_gateway::{AdGateway, AdInfo, AdSubmission, CreateAdResponse, GatewayError};

/// In-memory backend returning queued create-ad responses.
pub struct RecordingGateway {
    cost_per_slot: f64,
    responses: Mutex<VecDeque<Result<CreateAdResponse, GatewayError>>>,
    requests: Mutex<Vec<AdSubmission>>,
}

impl RecordingGateway {
    pub fn new(cost_per_slot: f64) -> Self {
        Self {
            cost_per_slot,
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(self, response: Result<CreateAdResponse, GatewayError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<AdSubmission> {
        self.requests.lock().unwrap().clone()
    }
}

impl AdGateway for RecordingGateway {
    fn fetch_info(&self) -> Result<AdInfo, GatewayError> {
        Ok(AdInfo {
            current_cost_per_slot: self.cost_per_slot,
        })
    }

    fn create_ad(&self, ad: &AdSubmission) -> Result<CreateAdResponse, GatewayError> {
        self.requests.lock().unwrap().push(ad.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CreateAdResponse::success()))
    }
}

/// Pump the controller at `now` until `done` matches an event or time runs out.
pub fn pump_until(
    controller: &mut AdBuilderController,
    now: Instant,
    done: impl Fn(&WorkflowEvent) -> bool,
) -> Vec<WorkflowEvent> {
    let mut events = Vec::new();
    for _ in 0..100 {
        events.extend(controller.wait_for_jobs(Duration::from_millis(50), now));
        if events.iter().any(&done) {
            break;
        }
    }
    events
}

pub fn is_settled(event: &WorkflowEvent) -> bool {
    matches!(
        event,
        WorkflowEvent::SubmissionSucceeded { .. } | WorkflowEvent::SubmissionFailed(_)
    )
}

pub fn is_pricing(event: &WorkflowEvent) -> bool {
    matches!(
        event,
        WorkflowEvent::PricingLoaded(_) | WorkflowEvent::PricingUnavailable(_)
    )
}
