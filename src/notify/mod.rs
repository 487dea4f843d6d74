//! Notification backends.
//!
//! Every backend implements [`Notifier`]. [`NotifierGroup`] implements it as
//! well by delivering to its members in order, so callers only ever hold a
//! single `Arc<dyn Notifier>`.

mod console;
mod desktop;
mod group;

pub use console::ConsoleNotifier;
pub use desktop::DesktopNotifier;
pub use group::NotifierGroup;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NotifyError;

/// Delivers a titled message to the user.
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        (**self).notify(title, message).await
    }
}
