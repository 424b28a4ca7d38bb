//! Best-effort preference persistence in `localStorage`.
//!
//! Every failure (no window, storage disabled, quota exceeded) is swallowed:
//! preferences are a convenience and must never block the scene.

const PREFS_KEY: &str = "nebula.preferences";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// The stored preferences JSON, if any.
pub fn load() -> Option<String> {
    local_storage()?.get_item(PREFS_KEY).ok()?
}

pub fn save(json: &str) {
    let Some(storage) = local_storage() else {
        return;
    };
    if storage.set_item(PREFS_KEY, json).is_err() {
        log::debug!("preferences not persisted");
    }
}
