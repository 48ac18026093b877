//! Queued delivery behind the workflow's `Notifier` seam.
//!
//! `notify` only enqueues. A single worker task composes and sends in order;
//! failures are logged and the event is dropped.

use std::sync::Arc;

use conduct_core::{models::notification::NotificationEvent, notify::Notifier};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{compose::Composer, mailer::Mailer};

enum Job {
    Deliver(NotificationEvent),
    Flush(oneshot::Sender<()>),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStats {
    pub sent: usize,
    pub failed: usize,
}

pub struct Dispatcher {
    sender: mpsc::UnboundedSender<Job>,
}

impl Dispatcher {
    /// Spawns the worker on the current runtime. The worker exits once every
    /// `Dispatcher` handle is dropped and the queue is drained.
    pub fn spawn(mailer: Arc<dyn Mailer>, composer: Composer) -> (Self, JoinHandle<DeliveryStats>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(receiver, mailer, composer));
        (Self { sender }, worker)
    }

    /// Resolves once every event queued before the call has been handled.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.sender.send(Job::Flush(done)).is_err() {
            warn!("notification worker is gone, nothing to flush");
            return;
        }
        if wait.await.is_err() {
            warn!("notification worker stopped during flush");
        }
    }
}

impl Notifier for Dispatcher {
    fn notify(&self, event: NotificationEvent) {
        let kind = event.kind();
        if self.sender.send(Job::Deliver(event)).is_err() {
            error!(kind, "notification worker is gone, event dropped");
        } else {
            debug!(kind, "notification queued");
        }
    }
}

async fn run(
    mut receiver: mpsc::UnboundedReceiver<Job>,
    mailer: Arc<dyn Mailer>,
    composer: Composer,
) -> DeliveryStats {
    let mut stats = DeliveryStats::default();
    while let Some(job) = receiver.recv().await {
        match job {
            Job::Deliver(event) => {
                if deliver(mailer.as_ref(), &composer, &event).await {
                    stats.sent += 1;
                } else {
                    stats.failed += 1;
                }
            }
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    info!(sent = stats.sent, failed = stats.failed, "notification worker stopped");
    stats
}

async fn deliver(mailer: &dyn Mailer, composer: &Composer, event: &NotificationEvent) -> bool {
    let email = match composer.compose(event) {
        Ok(email) => email,
        Err(err) => {
            error!(kind = event.kind(), error = %err, "could not render notification");
            return false;
        }
    };
    match mailer.send(email).await {
        Ok(()) => {
            info!(kind = event.kind(), "notification sent");
            true
        }
        Err(err) => {
            error!(kind = event.kind(), error = %err, "notification delivery failed");
            false
        }
    }
}
