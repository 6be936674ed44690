// ── Accessory host contract ──
//
// The platform that owns accessory objects. The core tells it when a room
// appears or disappears; characteristic plumbing and persistence stay on
// the host side.

use crate::model::AccessoryBinding;

/// Receives accessory lifecycle callbacks from the reconciler.
pub trait AccessoryHost: Send + Sync + 'static {
    /// A new room was discovered. Called once per binding.
    fn register_accessory(&self, binding: &AccessoryBinding);

    /// The room is gone from the latest snapshot.
    fn unregister_accessory(&self, binding: &AccessoryBinding);
}
