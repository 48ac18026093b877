//! The daily monitor reminder job.

use conduct_core::{Workflow, errors::ConductResult};
use tracing::info;

use crate::dispatcher::Dispatcher;

/// Queues today's reminders and waits until each has been handed to the
/// mailer. Returns how many were queued.
pub async fn run_monitor_reminders(
    workflow: &Workflow,
    dispatcher: &Dispatcher,
) -> ConductResult<usize> {
    let queued = workflow.send_monitor_reminders().await?;
    dispatcher.flush().await;
    info!(queued, "monitor reminder run finished");
    Ok(queued)
}
