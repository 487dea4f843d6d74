//! Fan-out over several backends.

use std::sync::Arc;

use async_trait::async_trait;

use super::Notifier;
use crate::error::NotifyError;

/// Delivers to every member in registration order.
///
/// Delivery stops at the first failing member and its error is returned.
/// Members that already succeeded are not rolled back.
#[derive(Debug, Default, Clone)]
pub struct NotifierGroup {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotifierGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a backend.
    pub fn with(mut self, notifier: impl Notifier + 'static) -> Self {
        self.push(notifier);
        self
    }

    pub fn push(&mut self, notifier: impl Notifier + 'static) {
        self.notifiers.push(Arc::new(notifier));
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

#[async_trait]
impl Notifier for NotifierGroup {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        for notifier in &self.notifiers {
            notifier.notify(title, message).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct Recorder {
        delivered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for Recorder {
        async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
            self.delivered.lock().push(format!("{title}|{message}"));
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Failing;

    #[async_trait]
    impl Notifier for Failing {
        async fn notify(&self, _title: &str, _message: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Desktop("no notification daemon".to_string()))
        }
    }

    #[tokio::test]
    async fn test_group_delivers_in_order() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let group = NotifierGroup::new().with(first.clone()).with(second.clone());

        group.notify("a", "b").await.unwrap();

        assert_eq!(group.len(), 2);
        assert_eq!(*first.delivered.lock(), vec!["a|b"]);
        assert_eq!(*second.delivered.lock(), vec!["a|b"]);
    }

    #[tokio::test]
    async fn test_group_fails_fast_without_rollback() {
        let before = Arc::new(Recorder::default());
        let after = Arc::new(Recorder::default());
        let group = NotifierGroup::new()
            .with(before.clone())
            .with(Failing)
            .with(after.clone());

        let err = group.notify("t", "m").await.unwrap_err();

        assert!(matches!(err, NotifyError::Desktop(_)));
        assert_eq!(before.delivered.lock().len(), 1);
        assert!(after.delivered.lock().is_empty());
    }

    #[tokio::test]
    async fn test_empty_group_succeeds() {
        let group = NotifierGroup::new();
        assert!(group.is_empty());
        assert!(group.notify("t", "m").await.is_ok());
    }
}
