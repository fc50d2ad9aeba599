//! Platform abstraction layer
//!
//! Thin helpers over the browser DOM for:
//! - Location hash and dev-host detection
//! - Screen switching and text updates
//! - Timed toasts and event listeners

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlElement, Window};

use crate::router::normalize_path;
use crate::settings::DevOptions;

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

/// Current location hash, normalized to a route path
pub fn location_path() -> String {
    let hash = window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default();
    normalize_path(&hash)
}

/// Point the location hash at `path` unless it is already there
pub fn set_location_path(path: &str) {
    let Some(window) = window() else { return };
    if location_path() == path {
        return;
    }
    if let Err(err) = window.location().set_hash(path) {
        log::warn!("Failed to update location hash: {:?}", err);
    }
}

/// Served from a development host (localhost or an explicit port)
pub fn is_dev_environment() -> bool {
    let Some(location) = window().map(|w| w.location()) else {
        return false;
    };
    let hostname = location.hostname().unwrap_or_default();
    let port = location.port().unwrap_or_default();
    DevOptions::is_dev_host(&hostname, &port)
}

/// Make `id` the only active `.screen`
pub fn show_screen(id: &str) {
    let Some(document) = document() else { return };
    if let Ok(screens) = document.query_selector_all(".screen") {
        for i in 0..screens.length() {
            if let Some(el) = screens.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let _ = el.class_list().remove_1("active");
            }
        }
    }
    match document.get_element_by_id(id) {
        Some(el) => {
            let _ = el.class_list().add_1("active");
        }
        None => log::warn!("Screen element #{} not found", id),
    }
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = by_id(id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_hidden(el: &Element, hidden: bool) {
    let _ = if hidden {
        el.class_list().add_1("hidden")
    } else {
        el.class_list().remove_1("hidden")
    };
}

pub fn set_hidden_id(id: &str, hidden: bool) {
    if let Some(el) = by_id(id) {
        set_hidden(&el, hidden);
    }
}

/// Create an element with a class and optional text
pub fn element(tag: &str, class: &str, text: Option<&str>) -> Option<Element> {
    let el = document()?.create_element(tag).ok()?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    if let Some(text) = text {
        el.set_text_content(Some(text));
    }
    Some(el)
}

/// Run `f` once after `ms` milliseconds
pub fn after(ms: i32, f: impl FnOnce() + 'static) {
    let Some(window) = window() else { return };
    let closure = Closure::once(f);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        ms,
    );
    closure.forget();
}

/// Transient notice appended to the body and removed after `ms`
pub fn toast(text: &str, class: &str, ms: i32) {
    let Some(body) = document().and_then(|d| d.body()) else {
        return;
    };
    let Some(el) = element("div", class, Some(text)) else {
        return;
    };
    if body.append_child(&el).is_err() {
        return;
    }
    after(ms, move || el.remove());
}

/// Attach a listener for the lifetime of the page
pub fn listen<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static)
where
    E: wasm_bindgen::convert::FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("Failed to listen for {}", event);
    }
    closure.forget();
}

/// Inline style helper for positioned elements
pub fn set_style(el: &Element, style: &str) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        let _ = el.style().set_css_text(style);
    }
}
