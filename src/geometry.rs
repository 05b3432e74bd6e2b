//! Document and viewport measurement

use crate::driver::Driver;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Width and height in CSS pixels, as reported by the page's layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either extent is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Multiply both extents by `factor`, failing on overflow.
    pub fn scaled(&self, factor: u32) -> Result<Dimension> {
        let overflow = || Error::InvalidGeometry(format!("{}x{} scaled by {} overflows", self.width, self.height, factor));
        Ok(Dimension {
            width: self.width.checked_mul(factor).ok_or_else(overflow)?,
            height: self.height.checked_mul(factor).ok_or_else(overflow)?,
        })
    }
}

// The greatest of five metrics: any single one can under-report on pages with
// collapsed margins or overflowing children.
const DOCUMENT_SIZE_SCRIPT: &str = r#"
(function() {
    const body = document.body || { scrollWidth: 0, offsetWidth: 0, scrollHeight: 0, offsetHeight: 0 };
    const root = document.documentElement;
    return JSON.stringify({
        width: Math.ceil(Math.max(body.scrollWidth, body.offsetWidth,
                                  root.clientWidth, root.scrollWidth, root.offsetWidth)),
        height: Math.ceil(Math.max(body.scrollHeight, body.offsetHeight,
                                   root.clientHeight, root.scrollHeight, root.offsetHeight))
    });
})()
"#;

const VIEWPORT_SIZE_SCRIPT: &str = r#"
(function() {
    const body = document.body || { clientWidth: 0, clientHeight: 0 };
    return JSON.stringify({
        width: Math.ceil(window.innerWidth || body.clientWidth),
        height: Math.ceil(window.innerHeight || body.clientHeight)
    });
})()
"#;

/// Measure the full scrollable extent of the current document.
pub fn document_size<D: Driver + ?Sized>(driver: &mut D) -> Result<Dimension> {
    let value = driver.evaluate_script(DOCUMENT_SIZE_SCRIPT)?;
    decode_script_value(value)
}

/// Measure the visible viewport, falling back to the body's client extent when
/// the window reports zero.
pub fn viewport_size<D: Driver + ?Sized>(driver: &mut D) -> Result<Dimension> {
    let value = driver.evaluate_script(VIEWPORT_SIZE_SCRIPT)?;
    decode_script_value(value)
}

/// Decode a script result that may arrive either as a JSON value or as a
/// JSON-stringified payload (CDP returns strings for `JSON.stringify`).
pub(crate) fn decode_script_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    let parsed = match value {
        Value::String(s) => serde_json::from_str::<Value>(&s)
            .map_err(|e| Error::ScriptError(format!("not JSON: {} ({})", s, e)))?,
        other => other,
    };
    serde_json::from_value(parsed.clone()).map_err(|e| Error::ScriptError(format!("{} ({})", parsed, e)))
}
