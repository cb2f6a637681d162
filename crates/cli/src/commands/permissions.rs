//! Permission gate commands.

use storekeeper_merchant::permissions::{Capability, PermissionGate};

use super::Context;
use crate::platform::HostPermissions;

/// Run the startup gate. Returns whether the shell may proceed.
///
/// On hosts without an enforced permission model this passes immediately;
/// otherwise every capability is checked, missing ones are requested, and
/// entry requires the aggregate.
pub async fn ensure_entry(ctx: &Context) -> bool {
    let mut gate = PermissionGate::new(HostPermissions, ctx.config.platform);

    gate.check_all().await;
    if gate.all_granted() {
        return true;
    }

    println!("Storekeeper needs camera, media library, and location access to continue.");
    gate.request_all().await;

    if gate.all_granted() {
        true
    } else {
        println!("Some permissions are still missing; grant them in system settings and retry.");
        false
    }
}

/// Print the current grants and the aggregate.
pub async fn report(ctx: &Context) {
    let mut gate = PermissionGate::new(HostPermissions, ctx.config.platform);

    if gate.is_bypassed() {
        println!("This platform has no enforced permission model; the gate is bypassed.");
        return;
    }

    let set = gate.check_all().await;
    for capability in Capability::ALL {
        let granted = match capability {
            Capability::Camera => set.camera,
            Capability::MediaLibrary => set.media_library,
            Capability::Location => set.location,
        };
        println!(
            "{:13} {}",
            capability.label(),
            if granted { "granted" } else { "denied" }
        );
    }
    println!(
        "aggregate:    {}",
        if set.all_granted() { "granted" } else { "denied" }
    );
}
