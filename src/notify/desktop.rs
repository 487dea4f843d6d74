//! Desktop popup backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use notify_rust::Notification;

use super::Notifier;
use crate::error::NotifyError;

/// Shows an OS notification popup.
///
/// Hosts without a notification service (headless servers, containers)
/// make every call fail with [`NotifyError::Desktop`].
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
    icon_path: PathBuf,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>, icon_path: impl Into<PathBuf>) -> Self {
        Self {
            app_name: app_name.into(),
            icon_path: icon_path.into(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn icon_path(&self) -> &Path {
        &self.icon_path
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let app_name = self.app_name.clone();
        let icon = self.icon_path.to_string_lossy().into_owned();
        let title = title.to_string();
        let message = message.to_string();

        // The platform call blocks (D-Bus round trip on Linux).
        tokio::task::spawn_blocking(move || {
            Notification::new()
                .appname(&app_name)
                .summary(&title)
                .body(&message)
                .icon(&icon)
                .show()
                .map(|_| ())
                .map_err(|e| NotifyError::Desktop(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::Desktop(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_settings() {
        let notifier = DesktopNotifier::new("Arvan Cloud Radar Monitor", "./icon.png");
        assert_eq!(notifier.app_name(), "Arvan Cloud Radar Monitor");
        assert_eq!(notifier.icon_path(), Path::new("./icon.png"));
    }
}
