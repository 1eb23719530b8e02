use tutor_core::shell::{PreferenceStore, Theme};
use web_sys::Storage;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// `window.localStorage`. Unavailable storage reads as empty and drops writes.
#[derive(Clone, Copy, Default)]
pub struct BrowserStore;

impl PreferenceStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) {
        let Some(storage) = local_storage() else {
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            log::warn!("Failed to persist {key}: {e:?}");
        }
    }
}

/// Mirrors the theme onto `<html class="dark">`.
pub fn apply_theme(theme: Theme) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    if let Err(e) = root.class_list().toggle_with_force("dark", theme == Theme::Dark) {
        log::warn!("Failed to apply theme: {e:?}");
    }
}
