//! Terminal accessory host.
//!
//! Stands in for a smart-home platform: prints lifecycle events and keeps
//! registered accessories in a JSON file so the next run can restore them
//! instead of registering again.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use directories::ProjectDirs;
use indexmap::IndexMap;
use tracing::{debug, warn};

use adax_core::{AccessoryBinding, AccessoryHost, AccessoryId};

use crate::error::CliError;
use crate::output;

/// Default accessory cache location in the platform data dir.
pub fn default_cache_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "adax").map(|dirs| dirs.data_dir().join("accessories.json"))
}

pub struct ConsoleHost {
    cache_path: Option<PathBuf>,
    bindings: Mutex<IndexMap<AccessoryId, AccessoryBinding>>,
    quiet: bool,
    color: bool,
}

impl ConsoleHost {
    /// Host that remembers accessories in `cache_path`.
    pub fn persistent(cache_path: PathBuf, quiet: bool, color: bool) -> Result<Self, CliError> {
        let bindings = load_bindings(&cache_path)?;
        debug!(
            path = %cache_path.display(),
            count = bindings.len(),
            "accessory cache loaded"
        );
        Ok(Self {
            cache_path: Some(cache_path),
            bindings: Mutex::new(bindings),
            quiet,
            color,
        })
    }

    /// Host for one-shot commands: nothing is loaded, saved or printed.
    pub fn ephemeral() -> Self {
        Self {
            cache_path: None,
            bindings: Mutex::new(IndexMap::new()),
            quiet: true,
            color: false,
        }
    }

    /// Host that prints lifecycle events but persists nothing.
    pub fn in_memory(quiet: bool, color: bool) -> Self {
        Self {
            quiet,
            color,
            ..Self::ephemeral()
        }
    }

    /// Accessories registered by a previous run, in registration order.
    pub fn cached_bindings(&self) -> Vec<AccessoryBinding> {
        self.lock().values().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IndexMap<AccessoryId, AccessoryBinding>> {
        self.bindings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, bindings: &IndexMap<AccessoryId, AccessoryBinding>) {
        let Some(ref path) = self.cache_path else {
            return;
        };
        if let Err(err) = save_bindings(path, bindings) {
            warn!(path = %path.display(), error = %err, "failed to save accessory cache");
        }
    }

    fn announce(&self, line: &str) {
        if !self.quiet {
            eprintln!("{line}");
        }
    }
}

impl AccessoryHost for ConsoleHost {
    fn register_accessory(&self, binding: &AccessoryBinding) {
        let mut bindings = self.lock();
        bindings.insert(binding.identity, binding.clone());
        self.persist(&bindings);
        drop(bindings);

        self.announce(&output::added(
            &format!("{} (room {})", binding.display_name, binding.room_id),
            self.color,
        ));
    }

    fn unregister_accessory(&self, binding: &AccessoryBinding) {
        let mut bindings = self.lock();
        bindings.shift_remove(&binding.identity);
        self.persist(&bindings);
        drop(bindings);

        self.announce(&output::removed(
            &format!("{} (room {})", binding.display_name, binding.room_id),
            self.color,
        ));
    }
}

fn load_bindings(path: &Path) -> Result<IndexMap<AccessoryId, AccessoryBinding>, CliError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(IndexMap::new()),
        Err(err) => return Err(err.into()),
    };
    let list: Vec<AccessoryBinding> = serde_json::from_str(&raw)?;
    Ok(list.into_iter().map(|b| (b.identity, b)).collect())
}

fn save_bindings(
    path: &Path,
    bindings: &IndexMap<AccessoryId, AccessoryBinding>,
) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let list: Vec<&AccessoryBinding> = bindings.values().collect();
    std::fs::write(path, serde_json::to_string_pretty(&list)?)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use adax_core::{Room, RoomId};

    use super::*;

    fn binding(id: i64, name: &str) -> AccessoryBinding {
        AccessoryBinding::for_room(&Room {
            id: RoomId::new(id),
            name: name.into(),
            current_temperature: None,
            target_temperature: None,
            energy_watts: None,
            heating_enabled: Some(true),
        })
    }

    #[test]
    fn registrations_survive_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("accessories.json");

        let host = ConsoleHost::persistent(path.clone(), true, false).unwrap();
        host.register_accessory(&binding(1, "Stue"));
        host.register_accessory(&binding(2, "Kjøkken"));
        host.unregister_accessory(&binding(1, "Stue"));

        let reopened = ConsoleHost::persistent(path, true, false).unwrap();
        assert_eq!(reopened.cached_bindings(), vec![binding(2, "Kjøkken")]);
    }

    #[test]
    fn missing_cache_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let host = ConsoleHost::persistent(dir.path().join("none.json"), true, false).unwrap();
        assert!(host.cached_bindings().is_empty());
    }

    #[test]
    fn corrupt_cache_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accessories.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(ConsoleHost::persistent(path, true, false).is_err());
    }

    #[test]
    fn ephemeral_host_writes_nothing() {
        let host = ConsoleHost::ephemeral();
        host.register_accessory(&binding(1, "Stue"));
        assert_eq!(host.cached_bindings().len(), 1);
    }
}
