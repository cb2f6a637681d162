//! The device capability gate.
//!
//! Three independent grants - camera, media library, foreground location -
//! combined into one aggregate that gates whether the main shell mounts.
//! On platforms without an enforced permission model the gate is bypassed
//! outright and the capability APIs are never queried.

use tracing::{info, warn};

use crate::config::Platform;

/// A device capability the app needs before the main shell mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Camera,
    MediaLibrary,
    Location,
}

impl Capability {
    /// Every capability the gate tracks.
    pub const ALL: [Self; 3] = [Self::Camera, Self::MediaLibrary, Self::Location];

    /// Human-readable name for messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::MediaLibrary => "media library",
            Self::Location => "location",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of one platform query or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantStatus {
    /// Whether the capability is granted.
    pub granted: bool,
    /// Whether the platform would show another prompt if asked again.
    pub can_ask_again: bool,
}

impl GrantStatus {
    /// A granted status.
    pub const GRANTED: Self = Self {
        granted: true,
        can_ask_again: true,
    };
}

/// Platform capability API seam.
///
/// Implementations wrap whatever the host exposes; errors are human-readable
/// messages and never crash the gate.
pub trait DevicePermissions {
    /// Query the current grant without prompting the user.
    fn check(
        &self,
        capability: Capability,
    ) -> impl Future<Output = Result<GrantStatus, String>> + Send;

    /// Prompt the user for the capability.
    fn request(
        &self,
        capability: Capability,
    ) -> impl Future<Output = Result<GrantStatus, String>> + Send;
}

/// The three grants, as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionSet {
    pub camera: bool,
    pub media_library: bool,
    pub location: bool,
}

impl PermissionSet {
    /// All three grants at once.
    #[must_use]
    pub const fn granted() -> Self {
        Self {
            camera: true,
            media_library: true,
            location: true,
        }
    }

    /// The aggregate the shell gates on.
    #[must_use]
    pub const fn all_granted(self) -> bool {
        self.camera && self.media_library && self.location
    }

    const fn set(&mut self, capability: Capability, granted: bool) {
        match capability {
            Capability::Camera => self.camera = granted,
            Capability::MediaLibrary => self.media_library = granted,
            Capability::Location => self.location = granted,
        }
    }
}

/// Outcome of an explicit user-driven request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The capability is granted.
    Granted,
    /// Denied, and the automatic second ask (when permitted) did not help;
    /// the user may try again later.
    Denied,
    /// Permanently denied; the only path forward is system settings.
    OpenSettings,
}

/// Gates app entry on the aggregate of the three capability grants.
#[derive(Debug)]
pub struct PermissionGate<P> {
    platform_api: P,
    platform: Platform,
    permissions: PermissionSet,
    checked: bool,
}

impl<P: DevicePermissions> PermissionGate<P> {
    /// Create a gate over the given platform API.
    #[must_use]
    pub const fn new(platform_api: P, platform: Platform) -> Self {
        Self {
            platform_api,
            platform,
            permissions: PermissionSet {
                camera: false,
                media_library: false,
                location: false,
            },
            checked: false,
        }
    }

    /// Whether the gate is bypassed on this platform.
    #[must_use]
    pub const fn is_bypassed(&self) -> bool {
        matches!(self.platform, Platform::Unenforced)
    }

    /// The grants as last observed.
    #[must_use]
    pub const fn permissions(&self) -> PermissionSet {
        self.permissions
    }

    /// Whether the mount-time check has completed.
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        self.checked
    }

    /// The aggregate the shell mounts on.
    #[must_use]
    pub const fn all_granted(&self) -> bool {
        self.is_bypassed() || self.permissions.all_granted()
    }

    /// Query all three grants without prompting. Runs at mount.
    ///
    /// A platform API failure degrades to all-denied-but-checked; the gate
    /// never crashes on it.
    pub async fn check_all(&mut self) -> PermissionSet {
        if self.is_bypassed() {
            self.permissions = PermissionSet::granted();
            self.checked = true;
            return self.permissions;
        }

        for capability in Capability::ALL {
            match self.platform_api.check(capability).await {
                Ok(status) => self.permissions.set(capability, status.granted),
                Err(e) => {
                    warn!(capability = %capability, error = %e, "permission check failed");
                    self.permissions = PermissionSet::default();
                    break;
                }
            }
        }

        self.checked = true;
        self.permissions
    }

    /// Request one capability on explicit user action.
    ///
    /// A denial that can still be re-asked triggers exactly one automatic
    /// re-request after the explanatory message; a permanent denial yields
    /// the open-settings directive instead of another prompt.
    pub async fn request(&mut self, capability: Capability) -> RequestOutcome {
        if self.is_bypassed() {
            return RequestOutcome::Granted;
        }

        let first = match self.platform_api.request(capability).await {
            Ok(status) => status,
            Err(e) => {
                warn!(capability = %capability, error = %e, "permission request failed");
                self.permissions.set(capability, false);
                return RequestOutcome::Denied;
            }
        };

        if first.granted {
            self.permissions.set(capability, true);
            return RequestOutcome::Granted;
        }

        if !first.can_ask_again {
            self.permissions.set(capability, false);
            return RequestOutcome::OpenSettings;
        }

        info!(capability = %capability, "denied but re-askable; asking once more");
        let second = match self.platform_api.request(capability).await {
            Ok(status) => status,
            Err(e) => {
                warn!(capability = %capability, error = %e, "permission re-request failed");
                self.permissions.set(capability, false);
                return RequestOutcome::Denied;
            }
        };

        self.permissions.set(capability, second.granted);
        if second.granted {
            RequestOutcome::Granted
        } else if second.can_ask_again {
            RequestOutcome::Denied
        } else {
            RequestOutcome::OpenSettings
        }
    }

    /// Request every capability in turn, returning the final set.
    pub async fn request_all(&mut self) -> PermissionSet {
        if self.is_bypassed() {
            self.permissions = PermissionSet::granted();
            self.checked = true;
            return self.permissions;
        }

        for capability in Capability::ALL {
            let _ = self.request(capability).await;
        }

        self.checked = true;
        self.permissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const DENIED_ASKABLE: GrantStatus = GrantStatus {
        granted: false,
        can_ask_again: true,
    };
    const DENIED_FOREVER: GrantStatus = GrantStatus {
        granted: false,
        can_ask_again: false,
    };

    /// Scripted platform API: pops one response per request, counts calls.
    #[derive(Default)]
    struct ScriptedPermissions {
        checks: Mutex<HashMap<Capability, GrantStatus>>,
        requests: Mutex<HashMap<Capability, Vec<GrantStatus>>>,
        request_calls: Mutex<HashMap<Capability, usize>>,
    }

    impl ScriptedPermissions {
        fn with_check(self, capability: Capability, status: GrantStatus) -> Self {
            self.checks
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(capability, status);
            self
        }

        fn with_requests(self, capability: Capability, responses: Vec<GrantStatus>) -> Self {
            self.requests
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(capability, responses);
            self
        }

        fn request_count(&self, capability: Capability) -> usize {
            self.request_calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .get(&capability)
                .copied()
                .unwrap_or(0)
        }
    }

    impl DevicePermissions for &ScriptedPermissions {
        async fn check(&self, capability: Capability) -> Result<GrantStatus, String> {
            self.checks
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .get(&capability)
                .copied()
                .ok_or_else(|| "unscripted check".to_string())
        }

        async fn request(&self, capability: Capability) -> Result<GrantStatus, String> {
            let mut counts = self
                .request_calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            *counts.entry(capability).or_insert(0) += 1;
            drop(counts);

            let mut requests = self
                .requests
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let queue = requests
                .get_mut(&capability)
                .ok_or_else(|| "unscripted request".to_string())?;
            if queue.is_empty() {
                return Err("script exhausted".to_string());
            }
            Ok(queue.remove(0))
        }
    }

    #[tokio::test]
    async fn check_all_reads_without_prompting() {
        let api = ScriptedPermissions::default()
            .with_check(Capability::Camera, GrantStatus::GRANTED)
            .with_check(Capability::MediaLibrary, GrantStatus::GRANTED)
            .with_check(Capability::Location, DENIED_ASKABLE);

        let mut gate = PermissionGate::new(&api, Platform::Device);
        let set = gate.check_all().await;

        assert!(set.camera);
        assert!(set.media_library);
        assert!(!set.location);
        assert!(!gate.all_granted());
        assert!(gate.is_checked());
        // check_all never calls request
        assert_eq!(api.request_count(Capability::Location), 0);
    }

    #[tokio::test]
    async fn denied_but_askable_rerequests_exactly_once() {
        let api = ScriptedPermissions::default()
            .with_requests(Capability::Camera, vec![DENIED_ASKABLE, DENIED_ASKABLE]);

        let mut gate = PermissionGate::new(&api, Platform::Device);
        let outcome = gate.request(Capability::Camera).await;

        assert_eq!(outcome, RequestOutcome::Denied);
        // First ask plus exactly one automatic retry
        assert_eq!(api.request_count(Capability::Camera), 2);
    }

    #[tokio::test]
    async fn retry_can_end_in_a_grant() {
        let api = ScriptedPermissions::default()
            .with_requests(Capability::Camera, vec![DENIED_ASKABLE, GrantStatus::GRANTED]);

        let mut gate = PermissionGate::new(&api, Platform::Device);
        let outcome = gate.request(Capability::Camera).await;

        assert_eq!(outcome, RequestOutcome::Granted);
        assert!(gate.permissions().camera);
        assert_eq!(api.request_count(Capability::Camera), 2);
    }

    #[tokio::test]
    async fn permanent_denial_directs_to_settings_without_reprompting() {
        let api = ScriptedPermissions::default()
            .with_requests(Capability::Location, vec![DENIED_FOREVER]);

        let mut gate = PermissionGate::new(&api, Platform::Device);
        let outcome = gate.request(Capability::Location).await;

        assert_eq!(outcome, RequestOutcome::OpenSettings);
        assert_eq!(api.request_count(Capability::Location), 1);
    }

    #[tokio::test]
    async fn aggregate_flips_when_the_last_grant_lands() {
        let api = ScriptedPermissions::default()
            .with_requests(Capability::Camera, vec![GrantStatus::GRANTED])
            .with_requests(Capability::MediaLibrary, vec![GrantStatus::GRANTED])
            .with_requests(Capability::Location, vec![GrantStatus::GRANTED]);

        let mut gate = PermissionGate::new(&api, Platform::Device);
        assert!(!gate.all_granted());

        gate.request(Capability::Camera).await;
        gate.request(Capability::MediaLibrary).await;
        assert!(!gate.all_granted());

        gate.request(Capability::Location).await;
        assert!(gate.all_granted());
    }

    #[tokio::test]
    async fn unenforced_platform_bypasses_without_querying() {
        // Nothing scripted: any API call would error, and an errored check
        // would leave the set denied.
        let api = ScriptedPermissions::default();

        let mut gate = PermissionGate::new(&api, Platform::Unenforced);
        assert!(gate.all_granted());

        let set = gate.check_all().await;
        assert!(set.all_granted());
        assert_eq!(gate.request(Capability::Camera).await, RequestOutcome::Granted);
        assert_eq!(api.request_count(Capability::Camera), 0);
    }

    #[tokio::test]
    async fn platform_api_failure_degrades_to_denied() {
        // No checks scripted: every check errors
        let api = ScriptedPermissions::default();

        let mut gate = PermissionGate::new(&api, Platform::Device);
        let set = gate.check_all().await;

        assert!(!set.all_granted());
        assert!(gate.is_checked());
    }
}
