//! # Conduct Notifier
//!
//! Email delivery for workflow events: templates, the Resend client and a
//! queued [`Dispatcher`] that implements the core `Notifier` seam.

pub mod compose;
pub mod config;
pub mod dispatcher;
pub mod mailer;
pub mod reminders;
pub mod templates;

pub use compose::Composer;
pub use config::NotifierConfig;
pub use dispatcher::{DeliveryStats, Dispatcher};
pub use mailer::{Email, Mailer, ResendMailer};
