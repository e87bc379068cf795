//! Background gateway calls, reported back to the controller over a channel.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::ad_gateway::{AdGateway, AdInfo, AdSubmission, CreateAdResponse, GatewayError};

pub(crate) enum JobMessage {
    InfoFetched(InfoFetchResult),
    AdCreated(CreateAdResult),
}

#[derive(Debug)]
pub(crate) struct InfoFetchResult {
    pub(crate) result: Result<AdInfo, GatewayError>,
}

#[derive(Debug)]
pub(crate) struct CreateAdResult {
    pub(crate) generation: u64,
    pub(crate) result: Result<CreateAdResponse, GatewayError>,
}

pub(crate) struct ControllerJobs {
    gateway: Arc<dyn AdGateway>,
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    info_in_progress: bool,
    create_in_progress: bool,
}

impl ControllerJobs {
    pub(crate) fn new(gateway: Arc<dyn AdGateway>) -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel();
        Self {
            gateway,
            message_tx,
            message_rx,
            info_in_progress: false,
            create_in_progress: false,
        }
    }

    pub(crate) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(crate) fn recv_message_timeout(
        &self,
        timeout: Duration,
    ) -> Result<JobMessage, RecvTimeoutError> {
        self.message_rx.recv_timeout(timeout)
    }

    pub(crate) fn begin_info_fetch(&mut self) {
        if self.info_in_progress {
            return;
        }
        self.info_in_progress = true;
        let gateway = Arc::clone(&self.gateway);
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = gateway.fetch_info();
            let _ = tx.send(JobMessage::InfoFetched(InfoFetchResult { result }));
        });
    }

    pub(crate) fn clear_info_fetch(&mut self) {
        self.info_in_progress = false;
    }

    /// Start a create-ad request; returns `false` if one is already running.
    pub(crate) fn begin_create_ad(&mut self, generation: u64, ad: AdSubmission) -> bool {
        if self.create_in_progress {
            return false;
        }
        self.create_in_progress = true;
        let gateway = Arc::clone(&self.gateway);
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = gateway.create_ad(&ad);
            let _ = tx.send(JobMessage::AdCreated(CreateAdResult { generation, result }));
        });
        true
    }

    pub(crate) fn clear_create_ad(&mut self) {
        self.create_in_progress = false;
    }

    pub(crate) fn create_in_progress(&self) -> bool {
        self.create_in_progress
    }
}
