//! Host adapters for the merchant library's platform seams.

use storekeeper_merchant::orders::Dialer;
use storekeeper_merchant::permissions::{Capability, DevicePermissions, GrantStatus};

/// Capability adapter for desktop hosts.
///
/// A desktop shell has no runtime grant dialogs; every capability reads as
/// granted. Mobile shells would wrap their platform APIs here instead.
pub struct HostPermissions;

impl DevicePermissions for HostPermissions {
    async fn check(&self, _capability: Capability) -> Result<GrantStatus, String> {
        Ok(GrantStatus::GRANTED)
    }

    async fn request(&self, _capability: Capability) -> Result<GrantStatus, String> {
        Ok(GrantStatus::GRANTED)
    }
}

/// Telephony hand-off through the system URL opener.
pub struct SystemDialer;

impl Dialer for SystemDialer {
    fn dial(&self, phone: &str) -> Result<(), String> {
        let uri = format!("tel:{phone}");

        #[cfg(target_os = "macos")]
        let launcher = "open";
        #[cfg(not(target_os = "macos"))]
        let launcher = "xdg-open";

        std::process::Command::new(launcher)
            .arg(&uri)
            .spawn()
            .map(|_| ())
            .map_err(|e| format!("could not launch {launcher} for {uri}: {e}"))
    }
}
