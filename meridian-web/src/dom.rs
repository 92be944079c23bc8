//! Thin wrappers over the browser APIs the builder touches.
//!
//! Everything returns `Option`/`Result` so components degrade quietly when
//! rendered outside a browser (server-side rendering, native tests).
use crate::error::WebError;
use meridian_builder::layout::{Rect, Size};
use meridian_builder::{BuilderChange, IsoDate, ShareLocation};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Clipboard, CustomEvent, CustomEventInit, Document, Element, Event, ScrollBehavior,
    ScrollIntoViewOptions, Window,
};

/// Window event carrying every builder change (`detail` = state + `share`).
pub const BUILDER_CHANGE_EVENT: &str = "mp:builderChange";
/// Window event fired when the itinerary tabs pick a duration.
pub const DAYS_CHANGE_EVENT: &str = "mp:daysChange";

/// Retrieve the global `window` object, if running in a browser.
#[must_use]
pub fn window() -> Option<Window> {
    if cfg!(target_arch = "wasm32") {
        web_sys::window()
    } else {
        None
    }
}

/// Retrieve the document object for DOM interactions.
#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    log::warn!("{message}");
    if cfg!(target_arch = "wasm32") {
        web_sys::console::error_1(&JsValue::from(message));
    }
}

/// The page URL split into the parts the shareable link is built from.
#[must_use]
pub fn current_location() -> Option<ShareLocation> {
    let location = window()?.location();
    Some(ShareLocation::new(
        &location.origin().ok()?,
        &location.pathname().ok()?,
        &location.search().ok()?,
        &location.hash().ok()?,
    ))
}

/// Swap the address bar URL without adding a history entry.
///
/// # Errors
/// Returns an error if the window or its history cannot be accessed.
pub fn replace_url(link: &str) -> Result<(), WebError> {
    let history = window().ok_or(WebError::MissingWindow)?.history()?;
    history.replace_state_with_url(&JsValue::NULL, "", Some(link))?;
    Ok(())
}

/// Dispatch `mp:builderChange` on the window.
///
/// # Errors
/// Returns an error if the payload cannot be converted or the event cannot be dispatched.
pub fn dispatch_builder_change(change: &BuilderChange) -> Result<(), WebError> {
    let detail = change.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?;
    dispatch_custom(BUILDER_CHANGE_EVENT, &detail)
}

/// Dispatch `mp:daysChange` with `{ days }` on the window.
///
/// # Errors
/// Returns an error if the event cannot be dispatched.
pub fn dispatch_days_change(days: u32) -> Result<(), WebError> {
    let detail = serde_json::json!({ "days": days })
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())?;
    dispatch_custom(DAYS_CHANGE_EVENT, &detail)
}

fn dispatch_custom(name: &str, detail: &JsValue) -> Result<(), WebError> {
    let window = window().ok_or(WebError::MissingWindow)?;
    let init = CustomEventInit::new();
    init.set_detail(detail);
    let event = CustomEvent::new_with_event_init_dict(name, &init)?;
    window.dispatch_event(&event)?;
    Ok(())
}

/// Read a builder change back out of an `mp:builderChange` event.
#[must_use]
pub fn builder_change_detail(event: &Event) -> Option<BuilderChange> {
    let custom = event.dyn_ref::<CustomEvent>()?;
    serde_wasm_bindgen::from_value(custom.detail()).ok()
}

/// The async clipboard, if this page may use it. Insecure origins and older
/// browsers leave `navigator.clipboard` undefined.
fn clipboard() -> Result<Clipboard, WebError> {
    let navigator = window().ok_or(WebError::MissingWindow)?.navigator();
    let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(WebError::ClipboardUnsupported);
    }
    Ok(clipboard.unchecked_into())
}

/// Write `text` to the system clipboard.
///
/// # Errors
/// Returns an error if the clipboard is unsupported or rejects the write.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn write_clipboard(text: &str) -> Result<(), WebError> {
    let promise = clipboard()?.write_text(text);
    JsFuture::from(promise).await?;
    Ok(())
}

/// Show the manual-copy prompt used when the clipboard is unavailable.
pub fn prompt_copy(text: &str) {
    if let Some(win) = window()
        && let Err(err) = win.prompt_with_message_and_default("Copy this link:", text)
    {
        console_error(&format!(
            "Failed to show copy prompt: {}",
            js_error_message(&err)
        ));
    }
}

/// Today's local date.
#[must_use]
pub fn today() -> Option<IsoDate> {
    if cfg!(target_arch = "wasm32") {
        let now = js_sys::Date::new_0();
        IsoDate::from_ymd(
            i32::try_from(now.get_full_year()).ok()?,
            now.get_month() + 1,
            now.get_date(),
        )
    } else {
        Some(IsoDate::from_naive(chrono::Local::now().date_naive()))
    }
}

/// Milliseconds since the epoch, for scheduling models.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn now_ms() -> u64 {
    if cfg!(target_arch = "wasm32") {
        js_sys::Date::now().max(0.0) as u64
    } else {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Current viewport size.
#[must_use]
pub fn viewport() -> Option<Size> {
    let win = window()?;
    Some(Size {
        width: win.inner_width().ok()?.as_f64()?,
        height: win.inner_height().ok()?.as_f64()?,
    })
}

/// Whether the primary pointer is coarse (touch).
#[must_use]
pub fn is_coarse_pointer() -> bool {
    window()
        .and_then(|win| win.match_media("(pointer: coarse)").ok().flatten())
        .is_some_and(|mq| mq.matches())
}

/// Bounding box of `element` in viewport coordinates.
#[must_use]
pub fn element_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

/// Smoothly scroll the element with `id` into view. A missing element is
/// not an error.
///
/// # Errors
/// Returns an error if there is no document.
pub fn scroll_to(id: &str) -> Result<(), WebError> {
    let doc = document().ok_or(WebError::MissingDocument)?;
    if let Some(el) = doc.get_element_by_id(id) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        el.scroll_into_view_with_scroll_into_view_options(&options);
    }
    Ok(())
}

/// Focus the first element matching `selector`, if any.
///
/// # Errors
/// Returns an error if there is no document, the selector is invalid or the
/// element refuses focus.
pub fn focus(selector: &str) -> Result<(), WebError> {
    let doc = document().ok_or(WebError::MissingDocument)?;
    let target = doc
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
    if let Some(el) = target {
        el.focus()?;
    }
    Ok(())
}

/// A pending `setTimeout`. Dropping it clears the timer, so replacing a
/// stored handle cancels the previous deadline.
pub struct Timeout {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Timeout {
    /// Run `f` after `delay_ms`.
    ///
    /// # Errors
    /// Returns an error if the timer cannot be scheduled.
    pub fn schedule(delay_ms: i32, f: impl FnOnce() + 'static) -> Result<Self, WebError> {
        let window = window().ok_or(WebError::MissingWindow)?;
        let callback: Closure<dyn FnMut()> = Closure::once(f);
        let id = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms,
        )?;
        Ok(Self {
            id,
            _callback: callback,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(win) = window() {
            win.clear_timeout_with_handle(self.id);
        }
    }
}

/// A pending `requestAnimationFrame`, cancelled on drop.
pub struct AnimationFrame {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl AnimationFrame {
    /// Run `f` before the next repaint.
    ///
    /// # Errors
    /// Returns an error if the frame cannot be requested.
    pub fn request(f: impl FnOnce() + 'static) -> Result<Self, WebError> {
        let window = window().ok_or(WebError::MissingWindow)?;
        let callback: Closure<dyn FnMut()> = Closure::once(f);
        let id = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        Ok(Self {
            id,
            _callback: callback,
        })
    }
}

impl Drop for AnimationFrame {
    fn drop(&mut self) {
        if let Some(win) = window() {
            let _ = win.cancel_animation_frame(self.id);
        }
    }
}

/// A window event listener, removed on drop.
pub struct WindowListener {
    event: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
    /// Listen for `event` on the window. With `capture`, events from any
    /// element are seen, including scrolls of nested containers.
    ///
    /// # Errors
    /// Returns an error if the window is unavailable or the listener cannot be attached.
    pub fn new(
        event: &'static str,
        capture: bool,
        f: impl FnMut(Event) + 'static,
    ) -> Result<Self, WebError> {
        let window = window().ok_or(WebError::MissingWindow)?;
        let callback = Closure::<dyn FnMut(Event)>::new(f);
        window.add_event_listener_with_callback_and_bool(
            event,
            callback.as_ref().unchecked_ref(),
            capture,
        )?;
        Ok(Self {
            event,
            capture,
            callback,
        })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Some(win) = window() {
            let _ = win.remove_event_listener_with_callback_and_bool(
                self.event,
                self.callback.as_ref().unchecked_ref(),
                self.capture,
            );
        }
    }
}

fn attach(
    event: &'static str,
    capture: bool,
    f: impl FnMut(Event) + 'static,
) -> Option<WindowListener> {
    if window().is_none() {
        return None;
    }
    WindowListener::new(event, capture, f)
        .map_err(|err| console_error(&format!("Failed to listen for {event}: {err}")))
        .ok()
}

/// Attach a listener, logging instead of failing when the browser refuses.
#[must_use]
pub fn listen(event: &'static str, f: impl FnMut(Event) + 'static) -> Option<WindowListener> {
    attach(event, false, f)
}

/// Like [`listen`], in the capture phase.
#[must_use]
pub fn listen_capture(
    event: &'static str,
    f: impl FnMut(Event) + 'static,
) -> Option<WindowListener> {
    attach(event, true, f)
}
