//! Scrollbar suppression
//!
//! Every viewport capture would otherwise carry the page's scrollbars. A small
//! `<style>` element zeroes their width while the capture runs; [`ScrollbarGuard`]
//! removes it again on every exit path.

use crate::driver::Driver;
use crate::Result;
use log::{debug, warn};
use std::ops::{Deref, DerefMut};

/// Default id of the injected style element.
pub const DEFAULT_STYLE_ID: &str = "chrome_screenshot_fix";

const SUPPRESS_TEMPLATE: &str = r#"
(function() {
    if (document.getElementById('{{ID}}')) return;
    const sheet = document.createElement('style');
    sheet.id = '{{ID}}';
    sheet.innerHTML = '::-webkit-scrollbar { width: 0px; height: 0px; }';
    (document.head || document.body || document.documentElement).appendChild(sheet);
})()
"#;

const RESTORE_TEMPLATE: &str = r#"
(function() {
    const sheet = document.getElementById('{{ID}}');
    if (sheet && sheet.parentNode) sheet.parentNode.removeChild(sheet);
})()
"#;

/// Inject the scrollbar override. Injecting twice leaves a single element.
pub fn suppress<D: Driver + ?Sized>(driver: &mut D, style_id: &str) -> Result<()> {
    driver.evaluate_script(&SUPPRESS_TEMPLATE.replace("{{ID}}", &escape_id(style_id)))?;
    Ok(())
}

/// Remove the scrollbar override. A missing element is not an error.
pub fn restore<D: Driver + ?Sized>(driver: &mut D, style_id: &str) -> Result<()> {
    driver.evaluate_script(&RESTORE_TEMPLATE.replace("{{ID}}", &escape_id(style_id)))?;
    Ok(())
}

fn escape_id(id: &str) -> String {
    id.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Scoped scrollbar suppression over a borrowed driver.
///
/// The override is injected by [`ScrollbarGuard::suppress`] and removed either by
/// [`ScrollbarGuard::restore`] or, if the guard is dropped first (an error path),
/// by `Drop`. The driver stays usable through the guard via `Deref`.
pub struct ScrollbarGuard<'a, D: Driver + ?Sized> {
    driver: &'a mut D,
    style_id: &'a str,
    active: bool,
}

impl<'a, D: Driver + ?Sized> ScrollbarGuard<'a, D> {
    pub fn suppress(driver: &'a mut D, style_id: &'a str) -> Result<Self> {
        suppress(&mut *driver, style_id)?;
        debug!("scrollbars suppressed (#{})", style_id);
        Ok(Self { driver, style_id, active: true })
    }

    /// Remove the override now and report whether that worked.
    pub fn restore(mut self) -> Result<()> {
        self.active = false;
        restore(&mut *self.driver, self.style_id)?;
        debug!("scrollbars restored (#{})", self.style_id);
        Ok(())
    }
}

impl<D: Driver + ?Sized> Deref for ScrollbarGuard<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &*self.driver
    }
}

impl<D: Driver + ?Sized> DerefMut for ScrollbarGuard<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut *self.driver
    }
}

impl<D: Driver + ?Sized> Drop for ScrollbarGuard<'_, D> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        // The error that got us here is the one the caller sees.
        if let Err(e) = restore(&mut *self.driver, self.style_id) {
            warn!("Failed to restore scrollbars (#{}): {}", self.style_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::Value;

    #[derive(Default)]
    struct Recorder {
        scripts: Vec<String>,
    }

    impl Driver for Recorder {
        fn evaluate_script(&mut self, script: &str) -> Result<Value> {
            self.scripts.push(script.to_string());
            Ok(Value::Null)
        }

        fn capture_viewport_png(&mut self) -> Result<Vec<u8>> {
            Err(Error::Other("not used".into()))
        }

        fn navigate(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn guard_restores_on_drop() {
        let mut rec = Recorder::default();
        {
            let _guard = ScrollbarGuard::suppress(&mut rec, DEFAULT_STYLE_ID).unwrap();
        }
        assert_eq!(rec.scripts.len(), 2);
        assert!(rec.scripts[0].contains("createElement('style')"));
        assert!(rec.scripts[1].contains("removeChild"));
    }

    #[test]
    fn explicit_restore_runs_once() {
        let mut rec = Recorder::default();
        let guard = ScrollbarGuard::suppress(&mut rec, "shot_fix").unwrap();
        guard.restore().unwrap();
        assert_eq!(rec.scripts.len(), 2);
        assert!(rec.scripts.iter().all(|s| s.contains("'shot_fix'")));
    }

    #[test]
    fn style_id_is_escaped() {
        let mut rec = Recorder::default();
        suppress(&mut rec, "it's").unwrap();
        assert!(rec.scripts[0].contains("it\\'s"));
    }
}
