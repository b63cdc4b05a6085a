//! Device information reported by the platform

/// Source of the platform-reported hardware/model identifier
#[cfg_attr(test, mockall::automock)]
pub trait DeviceInfo: Send + Sync {
    /// Hardware or model identifier, `None` when the platform does not expose one
    fn model_id(&self) -> Option<String>;
}

/// Device information with a fixed model identifier
#[derive(Debug, Clone, Default)]
pub struct StaticDeviceInfo {
    model_id: Option<String>,
}

impl StaticDeviceInfo {
    /// Report the given model identifier
    pub fn new(model_id: impl Into<String>) -> Self {
        Self { model_id: Some(model_id.into()) }
    }

    /// Report no model identifier
    pub fn unknown() -> Self {
        Self { model_id: None }
    }
}

impl DeviceInfo for StaticDeviceInfo {
    fn model_id(&self) -> Option<String> {
        self.model_id.as_deref().and_then(normalize)
    }
}

/// Device information read from the host operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct HostDeviceInfo;

impl DeviceInfo for HostDeviceInfo {
    #[cfg(target_os = "linux")]
    fn model_id(&self) -> Option<String> {
        match std::fs::read_to_string("/etc/machine-id") {
            Ok(contents) => normalize(&contents),
            Err(e) => {
                tracing::debug!("No machine id available: {}", e);
                None
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn model_id(&self) -> Option<String> {
        None
    }
}

/// Blank identifiers count as absent
fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
