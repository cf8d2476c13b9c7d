//! DOM scripts shared by the script-evaluating backends.
//!
//! Every script is a single JavaScript expression. Selectors and user text are
//! embedded through `serde_json::to_string`, which produces a valid JS string
//! literal for any input, so quotes and backticks cannot break out.

use crate::error::{BrowserError, Result};
use serde_json::Value;

fn literal(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))
}

/// Wraps `body` so it runs against the `index`-th match of `selector`.
///
/// The body sees `el` and must return `{ found: true, value }`; a missing
/// element yields `{ found: false, len }`.
fn on_element(selector: &str, index: usize, body: &str) -> Result<String> {
    Ok(format!(
        "(() => {{ const els = document.querySelectorAll({sel}); const el = els[{index}]; \
         if (!el) return {{ found: false, len: els.length }}; {body} }})()",
        sel = literal(selector)?,
    ))
}

pub fn count(selector: &str) -> Result<String> {
    Ok(format!(
        "document.querySelectorAll({}).length",
        literal(selector)?
    ))
}

pub fn is_visible(selector: &str, index: usize) -> Result<String> {
    Ok(format!(
        "(() => {{ const el = document.querySelectorAll({sel})[{index}]; if (!el) return false; \
         const style = window.getComputedStyle(el); \
         return style.display !== 'none' && style.visibility !== 'hidden' && el.getClientRects().length > 0; }})()",
        sel = literal(selector)?,
    ))
}

pub fn texts(selector: &str) -> Result<String> {
    Ok(format!(
        "Array.from(document.querySelectorAll({})).map(el => (el.innerText || el.textContent || '').trim())",
        literal(selector)?
    ))
}

pub fn value(selector: &str, index: usize) -> Result<String> {
    on_element(
        selector,
        index,
        "return { found: true, value: el.value === undefined ? '' : String(el.value) };",
    )
}

pub fn click(selector: &str, index: usize) -> Result<String> {
    on_element(
        selector,
        index,
        "el.scrollIntoView({ block: 'center' }); el.click(); return { found: true, value: null };",
    )
}

pub fn fill(selector: &str, index: usize, text: &str) -> Result<String> {
    let body = format!(
        "el.focus(); el.value = {text}; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         return {{ found: true, value: null }};",
        text = literal(text)?,
    );
    on_element(selector, index, &body)
}

/// Selects by visible label, falling back to the option value.
pub fn select_option(selector: &str, label: &str) -> Result<String> {
    let body = format!(
        "const wanted = {label}; \
         const opt = Array.from(el.options || []).find(o => o.text.trim() === wanted || o.value === wanted); \
         if (!opt) return {{ found: true, value: false }}; \
         el.value = opt.value; \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         return {{ found: true, value: true }};",
        label = literal(label)?,
    );
    on_element(selector, 0, &body)
}

pub fn set_checked(selector: &str, checked: bool) -> Result<String> {
    let body = format!(
        "if (el.checked !== {checked}) el.click(); return {{ found: true, value: el.checked }};"
    );
    on_element(selector, 0, &body)
}

pub fn scroll_into_view(selector: &str, index: usize) -> Result<String> {
    on_element(
        selector,
        index,
        "el.scrollIntoView({ block: 'center' }); return { found: true, value: null };",
    )
}

pub const READY_STATE: &str = "document.readyState";
pub const LOCATION: &str = "window.location.href";
pub const TITLE: &str = "document.title";

pub fn set_cookie(name: &str, value: &str) -> Result<String> {
    Ok(format!(
        "(() => {{ document.cookie = {name} + '=' + {value} + '; path=/'; return true; }})()",
        name = literal(name)?,
        value = literal(value)?,
    ))
}

/// Installs `console.error` and `window.onerror` hooks that buffer messages
/// in the page, for backends without an event stream.
pub const INSTALL_ERROR_HOOKS: &str = r#"(() => {
    if (window.__storefrontHooked) return true;
    window.__storefrontHooked = true;
    window.__storefrontErrors = [];
    const original = console.error;
    console.error = function (...args) {
        window.__storefrontErrors.push({ kind: 'console', text: args.map(a => String(a)).join(' ') });
        original.apply(console, args);
    };
    window.addEventListener('error', e => {
        window.__storefrontErrors.push({ kind: 'page', text: String(e.message) });
    });
    return true;
})()"#;

/// Returns and empties the buffer filled by [`INSTALL_ERROR_HOOKS`].
pub const DRAIN_ERRORS: &str =
    "(() => { const errors = window.__storefrontErrors || []; window.__storefrontErrors = []; return errors; })()";

/// Unpacks the result of an element script.
pub fn element_result(selector: &str, index: usize, result: Value) -> Result<Value> {
    match result.get("found").and_then(Value::as_bool) {
        Some(true) => Ok(result.get("value").cloned().unwrap_or(Value::Null)),
        Some(false) => Err(BrowserError::ElementIndex {
            selector: selector.to_string(),
            index,
            len: result.get("len").and_then(Value::as_u64).unwrap_or(0) as usize,
        }),
        None => Err(BrowserError::ScriptExecutionFailed(format!(
            "unexpected result for '{selector}': {result}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selectors_are_embedded_as_string_literals() {
        let script = count(r#"input[value="Login"]"#).unwrap();
        assert_eq!(
            script,
            r#"document.querySelectorAll("input[value=\"Login\"]").length"#
        );

        let script = fill("#input-email", 0, "'); alert('x');//").unwrap();
        assert!(script.contains(r#"el.value = "'); alert('x');//";"#));
    }

    #[test]
    fn element_result_distinguishes_missing_elements() {
        let value = element_result("#a", 0, json!({ "found": true, "value": "3" })).unwrap();
        assert_eq!(value, json!("3"));

        let err = element_result(".row", 4, json!({ "found": false, "len": 2 })).unwrap_err();
        assert!(matches!(err, BrowserError::ElementIndex { index: 4, len: 2, .. }));

        assert!(element_result("#a", 0, json!(null)).is_err());
    }
}
