use crate::components::contact_form::CONTACT_SECTION_ID;
use crate::dom::{self, Timeout};
use meridian_builder::{BuilderChange, BuilderEdit, ChangeSink, ContactHandoff, ExperienceBuilder};
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

pub const COPY_LABEL: &str = "Copy link";
pub const COPIED_LABEL: &str = "Copied!";
pub const COPIED_RESET_MS: i32 = 1300;

/// Publishes every change to the page: the address bar gets the new link
/// and `mp:builderChange` goes out on the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSink;

impl ChangeSink for BrowserSink {
    fn publish(&self, change: &BuilderChange) {
        if dom::window().is_none() {
            return;
        }
        if let Err(err) = dom::replace_url(&change.share) {
            dom::console_error(&format!("Failed to update URL: {err}"));
        }
        if let Err(err) = dom::dispatch_builder_change(change) {
            dom::console_error(&format!("Failed to broadcast builder change: {err}"));
        }
    }
}

pub type EngineHandle = Rc<RefCell<ExperienceBuilder>>;

/// Apply an edit through the engine and store the resulting change.
pub fn edit_handler(
    engine: EngineHandle,
    change: UseStateHandle<BuilderChange>,
) -> Callback<BuilderEdit> {
    Callback::from(move |edit: BuilderEdit| {
        let next = engine.borrow_mut().apply(edit, &BrowserSink);
        for correction in &next.corrections {
            log::debug!("date range corrected: {correction:?}");
        }
        change.set(next);
    })
}

/// Read the value of the input that fired `e`.
pub fn input_text(cb: Callback<String>) -> Callback<InputEvent> {
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
            cb.emit(input.value());
        }
    })
}

/// Copy the absolute share link, flashing the confirmation label.
pub fn copy_handler(
    engine: EngineHandle,
    copied: UseStateHandle<bool>,
    reset: Rc<RefCell<Option<Timeout>>>,
) -> Callback<MouseEvent> {
    Callback::from(move |_| {
        let link = engine.borrow().share_absolute();
        let copied = copied.clone();
        let reset = reset.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match dom::write_clipboard(&link).await {
                Ok(()) => {
                    copied.set(true);
                    let revert = copied.clone();
                    *reset.borrow_mut() =
                        Timeout::schedule(COPIED_RESET_MS, move || revert.set(false)).ok();
                }
                Err(err) => {
                    log::debug!("clipboard write failed: {err}");
                    dom::prompt_copy(&link);
                }
            }
        });
    })
}

/// Prepare the contact hand-off for the current state.
#[must_use]
pub fn prepare_handoff(engine: &ExperienceBuilder) -> Option<ContactHandoff> {
    let catalog = engine.catalog();
    ContactHandoff::prepare(engine.config(), catalog, &catalog.contact_topics)
        .map_err(|err| dom::console_error(&format!("Failed to prepare hand-off: {err}")))
        .ok()
}

/// Hand the state to the contact form and scroll to it.
pub fn send_handler(
    engine: EngineHandle,
    on_send: Callback<ContactHandoff>,
) -> Callback<MouseEvent> {
    Callback::from(move |_| {
        if let Some(handoff) = prepare_handoff(&engine.borrow()) {
            if let Err(err) = dom::scroll_to(CONTACT_SECTION_ID) {
                log::debug!("contact section not scrolled into view: {err}");
            }
            on_send.emit(handoff);
        }
    })
}

/// Visible text for a duration option.
#[must_use]
pub fn days_option_label(option: &str) -> String {
    if !option.is_empty() && option.bytes().all(|b| b.is_ascii_digit()) {
        format!("{option} days")
    } else {
        option.to_string()
    }
}

#[must_use]
pub const fn copy_label(copied: bool) -> &'static str {
    if copied { COPIED_LABEL } else { COPY_LABEL }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_builder::{CatalogLoader, EmbeddedCatalogs, ShareLocation};

    fn engine() -> ExperienceBuilder {
        ExperienceBuilder::new(
            EmbeddedCatalogs.load_builder_catalog().unwrap(),
            ShareLocation::new("https://meridian.example", "/", "?days=3", ""),
        )
    }

    #[test]
    fn duration_labels() {
        assert_eq!(days_option_label("5"), "5 days");
        assert_eq!(days_option_label("Customize"), "Customize");
        assert_eq!(days_option_label(""), "");
    }

    #[test]
    fn copy_label_flips() {
        assert_eq!(copy_label(false), "Copy link");
        assert_eq!(copy_label(true), "Copied!");
    }

    #[test]
    fn handoff_uses_current_state() {
        let mut engine = engine();
        engine.apply(BuilderEdit::ToggleAddon("Spa".into()), &BrowserSink);
        let handoff = prepare_handoff(&engine).unwrap();
        assert!(handoff.message.contains("• Duration: 3 days"));
        assert!(handoff.message.contains("• Add-ons: Spa"));
        assert_eq!(handoff.topic.as_deref(), Some("Training Camp"));
    }

    #[test]
    fn browser_sink_is_quiet_without_window() {
        let engine = engine();
        let change = engine.publish(&BrowserSink);
        assert_eq!(change.share, "/?days=3&city=Madrid&level=Premium&group=4");
    }
}
