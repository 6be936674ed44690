// ── Accessory reconciliation ──
//
// Converges the registered accessories to the room set of a snapshot:
// add what is new, then prune what is gone. Existing accessories are never
// replaced; their displayed values come from their own refreshes.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::accessory::{RoomAccessory, SharedAccessory};
use crate::config::RemovalPolicy;
use crate::error::CoreError;
use crate::host::AccessoryHost;
use crate::model::{AccessoryBinding, AccessoryId, RoomId, RoomSnapshot, accessory_identity};
use crate::poll::PollCache;
use crate::remote::RemoteClient;

/// What one reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: Vec<AccessoryBinding>,
    pub removed: Vec<AccessoryBinding>,
    /// Bindings that existed before the pass and are still registered.
    pub kept: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Owns the accessory bindings and keeps the host in step with them.
pub struct DeviceReconciler<R, H> {
    cache: PollCache<R>,
    host: Arc<H>,
    removal: RemovalPolicy,
    accessories: IndexMap<AccessoryId, SharedAccessory<R>>,
}

impl<R: RemoteClient, H: AccessoryHost> DeviceReconciler<R, H> {
    pub fn new(cache: PollCache<R>, host: Arc<H>, removal: RemovalPolicy) -> Self {
        Self {
            cache,
            host,
            removal,
            accessories: IndexMap::new(),
        }
    }

    /// Adopt a binding the host persisted from an earlier run. The host
    /// already knows it, so it is not registered again.
    pub fn restore(&mut self, binding: AccessoryBinding) -> SharedAccessory<R> {
        if let Some(existing) = self.accessories.get(&binding.identity) {
            debug!(identity = %binding.identity, "binding already restored");
            return Arc::clone(existing);
        }
        debug!(
            identity = %binding.identity,
            room_id = %binding.room_id,
            name = %binding.display_name,
            "restored accessory from host cache"
        );
        let accessory = Arc::new(RoomAccessory::new(binding, self.cache.clone()));
        self.accessories
            .insert(accessory.identity(), Arc::clone(&accessory));
        accessory
    }

    /// Reconcile against the outcome of a poll. With no snapshot available
    /// the existing bindings are left alone.
    ///
    /// Callers await the poll before taking any lock around the reconciler.
    pub fn discover(&mut self, polled: Result<Arc<RoomSnapshot>, CoreError>) -> ReconcileReport {
        match polled {
            Ok(snapshot) => self.reconcile(&snapshot),
            Err(err) => {
                warn!(error = %err, "discovery skipped, no room snapshot available");
                ReconcileReport {
                    kept: self.accessories.len(),
                    ..ReconcileReport::default()
                }
            }
        }
    }

    /// Add a binding for every new room, then apply the removal policy to
    /// bindings whose room is absent.
    pub fn reconcile(&mut self, snapshot: &RoomSnapshot) -> ReconcileReport {
        let before = self.accessories.len();
        let mut report = ReconcileReport::default();

        for room in &snapshot.rooms {
            let identity = accessory_identity(room.id);
            if self.accessories.contains_key(&identity) {
                continue;
            }
            let binding = AccessoryBinding::for_room(room);
            self.host.register_accessory(&binding);
            info!(
                room_id = %binding.room_id,
                name = %binding.display_name,
                "added accessory"
            );
            self.accessories.insert(
                identity,
                Arc::new(RoomAccessory::new(binding.clone(), self.cache.clone())),
            );
            report.added.push(binding);
        }

        let present: HashSet<RoomId> = snapshot.room_ids();
        let stale: Vec<AccessoryId> = self
            .accessories
            .iter()
            .filter(|(_, acc)| !present.contains(&acc.room_id()))
            .map(|(id, _)| *id)
            .collect();

        match self.removal {
            RemovalPolicy::Remove => {
                for identity in stale {
                    if let Some(acc) = self.accessories.shift_remove(&identity) {
                        self.host.unregister_accessory(acc.binding());
                        info!(
                            room_id = %acc.room_id(),
                            name = %acc.binding().display_name,
                            "removed accessory"
                        );
                        report.removed.push(acc.binding().clone());
                    }
                }
            }
            RemovalPolicy::Retain => {
                if !stale.is_empty() {
                    debug!(count = stale.len(), "retaining accessories for absent rooms");
                }
            }
        }

        report.kept = before - report.removed.len();
        report
    }

    pub fn get(&self, identity: &AccessoryId) -> Option<SharedAccessory<R>> {
        self.accessories.get(identity).cloned()
    }

    pub fn find_room(&self, room_id: RoomId) -> Option<SharedAccessory<R>> {
        self.accessories
            .values()
            .find(|acc| acc.room_id() == room_id)
            .cloned()
    }

    /// Accessories in registration order.
    pub fn accessories(&self) -> Vec<SharedAccessory<R>> {
        self.accessories.values().cloned().collect()
    }

    pub fn bindings(&self) -> Vec<AccessoryBinding> {
        self.accessories
            .values()
            .map(|acc| acc.binding().clone())
            .collect()
    }

    pub fn removal_policy(&self) -> RemovalPolicy {
        self.removal
    }

    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }
}
