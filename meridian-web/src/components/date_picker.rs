//! Calendar popup bound to a date field.
//!
//! Anchored under its button on desktop, shown as a modal on touch devices
//! and narrow viewports. Placement is measured in an animation frame,
//! follows the anchor while the page scrolls and is recomputed after resizing
//! settles.
use crate::dom::{self, AnimationFrame, Timeout};
use meridian_builder::calendar::{
    CalendarCell, CellContext, DayPick, MonthView, month_grid, pick_day, picker_label,
};
use meridian_builder::date::WEEKDAY_NAMES;
use meridian_builder::layout::{Size, calendar_is_modal, calendar_position};
use meridian_builder::{Debouncer, FrameGate, IsoDate};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PopupProps {
    pub view: MonthView,
    pub context: CellContext,
    #[prop_or_default]
    pub modal: bool,
    #[prop_or_default]
    pub position: Option<(f64, f64)>,
    pub on_navigate: Callback<MonthView>,
    pub on_pick: Callback<IsoDate>,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub popup_ref: NodeRef,
}

fn day_button(cell: &CalendarCell, on_pick: &Callback<IsoDate>) -> Html {
    let onclick = {
        let on_pick = on_pick.clone();
        let pick = pick_day(cell);
        Callback::from(move |_| {
            if let DayPick::Choose(date) = pick {
                on_pick.emit(date);
            }
        })
    };
    html! {
        <button
            type="button"
            class={classes!(cell.classes())}
            disabled={cell.disabled}
            data-date={cell.date.to_string()}
            {onclick}
        >
            { cell.day }
        </button>
    }
}

#[function_component(CalendarPopup)]
pub fn calendar_popup(p: &PopupProps) -> Html {
    let cells = month_grid(p.view, &p.context);
    let nav = |delta: i32| {
        let on_navigate = p.on_navigate.clone();
        let target = p.view.shift(delta);
        Callback::from(move |_| on_navigate.emit(target))
    };
    let close = {
        let on_close = p.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };
    let style = if p.modal {
        None
    } else {
        p.position
            .map(|(left, top)| format!("position:fixed;left:{left}px;top:{top}px;"))
    };

    html! {
        <>
            if p.modal {
                <div class="mpCal__backdrop" onclick={close.clone()}></div>
            }
            <div
                class={classes!("mpCal", p.modal.then_some("is-modal"))}
                role="dialog"
                aria-modal={p.modal.to_string()}
                aria-label="Choose a date"
                {style}
                ref={p.popup_ref.clone()}
            >
                <div class="mpCal__head">
                    <button type="button" class="mpCal__nav" aria-label="Previous month" onclick={nav(-1)}>
                        { "\u{2039}" }
                    </button>
                    <strong class="mpCal__title">{ p.view.title() }</strong>
                    <button type="button" class="mpCal__nav" aria-label="Next month" onclick={nav(1)}>
                        { "\u{203a}" }
                    </button>
                </div>
                <div class="mpCal__weekdays">
                    { for WEEKDAY_NAMES.iter().map(|d| html! { <span>{ *d }</span> }) }
                </div>
                <div class="mpCal__grid">
                    { for cells.iter().map(|cell| day_button(cell, &p.on_pick)) }
                </div>
                <div class="mpCal__foot">
                    <button type="button" class="mpCal__close" onclick={close}>{ "Close" }</button>
                </div>
            </div>
        </>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: AttrValue,
    pub name: AttrValue,
    pub value: Option<IsoDate>,
    #[prop_or_default]
    pub min: Option<IsoDate>,
    #[prop_or_default]
    pub max: Option<IsoDate>,
    pub onchange: Callback<Option<IsoDate>>,
}

fn measure(anchor: &NodeRef, popup: &NodeRef) -> Option<(bool, Option<(f64, f64)>)> {
    let viewport = dom::viewport()?;
    if calendar_is_modal(dom::is_coarse_pointer(), viewport.width) {
        return Some((true, None));
    }
    let anchor = anchor.cast::<web_sys::Element>()?;
    let popup = popup.cast::<web_sys::Element>()?;
    let rect = dom::element_rect(&popup);
    let size = Size {
        width: rect.width,
        height: rect.height,
    };
    Some((
        false,
        Some(calendar_position(dom::element_rect(&anchor), size, viewport)),
    ))
}

#[function_component(DatePicker)]
pub fn date_picker(p: &Props) -> Html {
    // `Some` while the popup is open.
    let view = use_state(|| None::<MonthView>);
    let modal = use_state(|| false);
    let position = use_state(|| None::<(f64, f64)>);
    let wrapper_ref = use_node_ref();
    let anchor_ref = use_node_ref();
    let popup_ref = use_node_ref();
    let gate = use_mut_ref(FrameGate::default);
    let frame = use_mut_ref(|| None::<AnimationFrame>);
    let open = view.is_some();

    let reposition: Rc<dyn Fn()> = {
        let gate = gate.clone();
        let frame = frame.clone();
        let modal = modal.clone();
        let position = position.clone();
        let anchor_ref = anchor_ref.clone();
        let popup_ref = popup_ref.clone();
        Rc::new(move || {
            if !gate.borrow_mut().request() {
                return;
            }
            let done = gate.clone();
            let modal = modal.clone();
            let position = position.clone();
            let anchor_ref = anchor_ref.clone();
            let popup_ref = popup_ref.clone();
            let scheduled = AnimationFrame::request(move || {
                done.borrow_mut().frame_done();
                if let Some((is_modal, pos)) = measure(&anchor_ref, &popup_ref) {
                    modal.set(is_modal);
                    position.set(pos);
                }
            });
            match scheduled {
                Ok(handle) => *frame.borrow_mut() = Some(handle),
                Err(err) => {
                    gate.borrow_mut().frame_done();
                    log::debug!("calendar placement skipped: {err}");
                }
            }
        })
    };

    {
        let reposition = reposition.clone();
        use_effect_with(open, move |open| {
            if *open {
                reposition();
            }
        });
    }

    {
        let view = view.clone();
        let wrapper_ref = wrapper_ref.clone();
        let reposition = reposition.clone();
        use_effect_with(open, move |open| {
            let listeners = if *open {
                let on_scroll = {
                    let reposition = reposition.clone();
                    dom::listen_capture("scroll", move |_| reposition())
                };
                let debouncer = Rc::new(RefCell::new(Debouncer::default()));
                let timer = Rc::new(RefCell::new(None::<Timeout>));
                let on_resize = dom::listen("resize", move |_| {
                    let quiet = {
                        let mut d = debouncer.borrow_mut();
                        d.trigger(dom::now_ms());
                        d.quiet_ms()
                    };
                    let debouncer = debouncer.clone();
                    let reposition = reposition.clone();
                    let next = Timeout::schedule(i32::try_from(quiet).unwrap_or(i32::MAX), move || {
                        if debouncer.borrow_mut().poll(dom::now_ms()) {
                            reposition();
                        }
                    });
                    *timer.borrow_mut() = next.ok();
                });
                let on_click = dom::listen("click", move |event: web_sys::Event| {
                    let target = event
                        .target()
                        .and_then(|t| t.dyn_into::<web_sys::Node>().ok());
                    let inside = wrapper_ref
                        .get()
                        .zip(target)
                        .is_some_and(|(wrapper, target)| wrapper.contains(Some(&target)));
                    if !inside {
                        view.set(None);
                    }
                });
                Some((on_scroll, on_resize, on_click))
            } else {
                None
            };
            move || drop(listeners)
        });
    }

    let on_open = {
        let view = view.clone();
        let value = p.value;
        Callback::from(move |_| {
            if view.is_some() {
                view.set(None);
            } else if let Some(today) = dom::today() {
                view.set(Some(MonthView::initial(value, today)));
            }
        })
    };

    let on_clear = {
        let view = view.clone();
        let onchange = p.onchange.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            view.set(None);
            onchange.emit(None);
        })
    };

    let on_pick = {
        let view = view.clone();
        let onchange = p.onchange.clone();
        Callback::from(move |date: IsoDate| {
            view.set(None);
            onchange.emit(Some(date));
        })
    };

    let on_navigate = {
        let view = view.clone();
        let reposition = reposition.clone();
        Callback::from(move |next: MonthView| {
            view.set(Some(next));
            reposition();
        })
    };

    let on_close = {
        let view = view.clone();
        Callback::from(move |()| view.set(None))
    };

    let on_keydown = {
        let view = view.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                view.set(None);
            }
        })
    };

    let (label, is_placeholder) = picker_label(p.value);
    let context = CellContext {
        selected: p.value,
        today: dom::today(),
        min: p.min,
        max: p.max,
    };

    html! {
        <div class={classes!("mpDate", open.then_some("is-open"))} ref={wrapper_ref} onkeydown={on_keydown}>
            <input
                type="hidden"
                id={p.id.clone()}
                name={p.name.clone()}
                value={p.value.map(|d| d.to_string()).unwrap_or_default()}
                min={p.min.map(|d| AttrValue::from(d.to_string()))}
                max={p.max.map(|d| AttrValue::from(d.to_string()))}
            />
            <button
                type="button"
                class="mpDate__btn"
                aria-haspopup="dialog"
                aria-expanded={open.to_string()}
                ref={anchor_ref}
                onclick={on_open}
            >
                <span class={classes!("mpDate__label", is_placeholder.then_some("is-placeholder"))}>
                    { label }
                </span>
            </button>
            <button
                type="button"
                class="mpDate__clear"
                aria-label="Clear date"
                hidden={p.value.is_none()}
                onclick={on_clear}
            >
                { "\u{00d7}" }
            </button>
            if let Some(month) = *view {
                <CalendarPopup
                    view={month}
                    {context}
                    modal={*modal}
                    position={*position}
                    {on_navigate}
                    {on_pick}
                    {on_close}
                    {popup_ref}
                />
            }
        </div>
    }
}
