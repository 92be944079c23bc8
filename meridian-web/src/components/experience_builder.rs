//! The experience builder form.
//!
//! The engine lives in a `RefCell` for the lifetime of the component; every
//! control emits a [`BuilderEdit`] and the resulting change is stored in
//! state to drive the re-render.
mod handlers;

use crate::components::custom_select::{CustomSelect, SelectOption};
use crate::components::date_picker::DatePicker;
use crate::components::summary_panel::SummaryPanel;
use crate::dom::{self, Timeout};
use handlers::{copy_handler, copy_label, days_option_label, edit_handler, input_text, send_handler};
use meridian_builder::{BuilderCatalog, BuilderEdit, ContactHandoff, ExperienceBuilder, ShareLocation};
use std::rc::Rc;
use yew::prelude::*;

pub use handlers::{BrowserSink, COPIED_LABEL, COPIED_RESET_MS, COPY_LABEL, prepare_handoff};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub catalog: Rc<BuilderCatalog>,
    /// Query string to start from when there is no browser location.
    #[prop_or_default]
    pub search: AttrValue,
    #[prop_or_default]
    pub on_send: Callback<ContactHandoff>,
}

fn initial_location(search: &str) -> ShareLocation {
    dom::current_location().unwrap_or_else(|| ShareLocation::new("", "/", search, ""))
}

fn plain_options(values: &[String]) -> Vec<SelectOption> {
    values.iter().map(|v| SelectOption::plain(v.clone())).collect()
}

#[function_component(ExperienceBuilderPanel)]
pub fn experience_builder_panel(p: &Props) -> Html {
    let engine = {
        let catalog = p.catalog.clone();
        let search = p.search.clone();
        use_mut_ref(move || ExperienceBuilder::new((*catalog).clone(), initial_location(&search)))
    };
    let change = {
        let engine = engine.clone();
        use_state(move || engine.borrow().publish(&()))
    };
    let copied = use_state(|| false);
    let copy_reset = use_mut_ref(|| None::<Timeout>);

    {
        let engine = engine.clone();
        use_effect_with((), move |()| {
            engine.borrow().publish(&BrowserSink);
        });
    }

    let on_edit = edit_handler(engine.clone(), change.clone());
    let on_copy = copy_handler(engine.clone(), copied.clone(), copy_reset);
    let on_send = send_handler(engine.clone(), p.on_send.clone());

    let config = &change.config;
    let bounds = change.bounds;
    let (days_control, custom_visible, summary) = {
        let engine = engine.borrow();
        (
            engine.days_control().clone(),
            engine.custom_days_visible(),
            change.summary.clone().unwrap_or_else(|| engine.summary()),
        )
    };
    let catalog = &p.catalog;
    let days_options: Vec<SelectOption> = catalog
        .days
        .iter()
        .map(|option| SelectOption {
            value: AttrValue::from(option.clone()),
            label: AttrValue::from(days_option_label(option)),
        })
        .collect();

    html! {
        <section class="eb" id="experience-builder" data-eb-root="">
            <div class="eb__controls">
                <div class="formRow">
                    <label for="eb-city">{ "City" }</label>
                    <CustomSelect
                        id="eb-city"
                        name="city"
                        options={plain_options(&catalog.cities)}
                        value={AttrValue::from(config.city.clone())}
                        onchange={on_edit.reform(BuilderEdit::City)}
                    />
                </div>
                <div class="formRow">
                    <label for="eb-days">{ "Duration" }</label>
                    <CustomSelect
                        id="eb-days"
                        name="days"
                        options={days_options}
                        value={AttrValue::from(days_control.option.clone())}
                        onchange={on_edit.reform(BuilderEdit::DaysOption)}
                    />
                </div>
                <div class="formRow ebDaysCustom" data-eb-days-custom="" hidden={!custom_visible}>
                    <label for="eb-days-custom">{ "Exact days" }</label>
                    <input
                        id="eb-days-custom"
                        type="number"
                        min="1"
                        inputmode="numeric"
                        data-eb-days-custom-input=""
                        value={days_control.custom.clone()}
                        oninput={input_text(on_edit.reform(BuilderEdit::CustomDays))}
                    />
                </div>
                <div class="formRow">
                    <label for="eb-level">{ "Package level" }</label>
                    <CustomSelect
                        id="eb-level"
                        name="level"
                        options={plain_options(&catalog.levels)}
                        value={AttrValue::from(config.level.clone())}
                        onchange={on_edit.reform(BuilderEdit::Level)}
                    />
                </div>
                <div class="formRow">
                    <label for="eb-group">{ "Group size" }</label>
                    <input
                        id="eb-group"
                        type="number"
                        name="group"
                        min="1"
                        max="50"
                        value={config.group.to_string()}
                        oninput={input_text(on_edit.reform(BuilderEdit::Group))}
                    />
                </div>
                <div class="formRow ebDates">
                    <label for="eb-date-start">{ "Start date" }</label>
                    <DatePicker
                        id="eb-date-start"
                        name="date_start"
                        value={config.date_start}
                        min={bounds.start_min}
                        max={bounds.start_max}
                        onchange={on_edit.reform(BuilderEdit::DateStart)}
                    />
                    <label for="eb-date-end">{ "End date" }</label>
                    <DatePicker
                        id="eb-date-end"
                        name="date_end"
                        value={config.date_end}
                        min={bounds.end_min}
                        max={bounds.end_max}
                        onchange={on_edit.reform(BuilderEdit::DateEnd)}
                    />
                </div>
                <div class="ebAddOns" role="group" aria-label="Add-ons">
                    { for catalog.addons.iter().map(|addon| {
                        let on = config.addons.contains(&addon.key);
                        let onclick = {
                            let on_edit = on_edit.clone();
                            let key = addon.key.clone();
                            Callback::from(move |_| on_edit.emit(BuilderEdit::ToggleAddon(key.clone())))
                        };
                        html! {
                            <button
                                type="button"
                                class={classes!("ebAddOn", on.then_some("is-on"))}
                                aria-pressed={on.to_string()}
                                data-addon={addon.key.clone()}
                                {onclick}
                            >
                                { addon.label.clone() }
                            </button>
                        }
                    }) }
                </div>
            </div>
            <aside class="eb__summary">
                <SummaryPanel {summary} />
                <div class="eb__actions">
                    <button type="button" class="btn" data-eb-copy="" onclick={on_copy}>
                        { copy_label(*copied) }
                    </button>
                    <button type="button" class="btn btn--primary" data-eb-send="" onclick={on_send}>
                        { "Send to our team" }
                    </button>
                </div>
            </aside>
        </section>
    }
}
