//! Styled replacement for native `<select>` elements.
//!
//! A hidden native select keeps the form value; the visible button and menu
//! are driven by a shared [`SelectRegistry`] so only one menu is open.
use crate::dom;
use meridian_builder::SelectRegistry;
use meridian_builder::layout::{MenuPlacement, menu_placement};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectAction {
    Register(AttrValue),
    Unregister(AttrValue),
    Toggle(AttrValue),
    Close(AttrValue),
    CloseAll,
    Placed(AttrValue, bool),
}

impl SelectAction {
    /// What a page-level event does to the open menu. Escape, resizing and
    /// scrolling close it, except scrolling inside a menu's own list.
    #[must_use]
    pub fn for_page_event(kind: &str, key: Option<&str>, inside_menu: bool) -> Option<Self> {
        match (kind, key) {
            ("resize", _) | ("keydown", Some("Escape")) => Some(Self::CloseAll),
            ("scroll", _) if !inside_menu => Some(Self::CloseAll),
            _ => None,
        }
    }
}

fn in_menu(event: &web_sys::Event) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest(".mpSelect__menu").ok().flatten())
        .is_some()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectState {
    registry: SelectRegistry<AttrValue>,
}

impl SelectState {
    #[must_use]
    pub fn is_open(&self, id: &AttrValue) -> bool {
        self.registry.is_open(id)
    }

    #[must_use]
    pub fn opens_up(&self, id: &AttrValue) -> bool {
        self.registry.opens_up(id)
    }

    #[must_use]
    pub fn open_id(&self) -> Option<&AttrValue> {
        self.registry.open_id()
    }
}

impl Reducible for SelectState {
    type Action = SelectAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut registry = self.registry.clone();
        match action {
            SelectAction::Register(id) => registry.register(id),
            SelectAction::Unregister(id) => registry.unregister(&id),
            SelectAction::Toggle(id) => {
                registry.toggle(&id);
            }
            SelectAction::Close(id) => registry.close(&id),
            SelectAction::CloseAll => registry.close_all(None),
            SelectAction::Placed(id, up) => registry.set_opens_up(&id, up),
        }
        if registry == self.registry {
            self
        } else {
            Rc::new(Self { registry })
        }
    }
}

pub type SelectContext = UseReducerHandle<SelectState>;

#[derive(Properties, PartialEq)]
pub struct ProviderProps {
    #[prop_or_default]
    pub children: Children,
}

/// Owns the registry for every select below it and closes menus on outside
/// clicks, Escape, resize and scroll.
#[function_component(SelectProvider)]
pub fn select_provider(p: &ProviderProps) -> Html {
    let state = use_reducer(SelectState::default);
    {
        let state = state.clone();
        use_effect_with((), move |()| {
            let close_on = |kind: &'static str, capture: bool| {
                let state = state.clone();
                let handler = move |event: web_sys::Event| {
                    let key = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key);
                    if let Some(action) =
                        SelectAction::for_page_event(kind, key.as_deref(), in_menu(&event))
                    {
                        state.dispatch(action);
                    }
                };
                if capture {
                    dom::listen_capture(kind, handler)
                } else {
                    dom::listen(kind, handler)
                }
            };
            let on_resize = close_on("resize", false);
            let on_scroll = close_on("scroll", true);
            let on_escape = close_on("keydown", false);
            let on_click = dom::listen("click", move |event: web_sys::Event| {
                let inside = event
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                    .and_then(|el| el.closest(".mpSelect").ok().flatten())
                    .is_some();
                if !inside {
                    state.dispatch(SelectAction::CloseAll);
                }
            });
            move || drop((on_resize, on_scroll, on_escape, on_click))
        });
    }
    html! {
        <ContextProvider<SelectContext> context={state}>
            { p.children.clone() }
        </ContextProvider<SelectContext>>
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: AttrValue,
    pub label: AttrValue,
}

impl SelectOption {
    /// Option whose label is its value.
    pub fn plain(value: impl Into<AttrValue>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: AttrValue,
    pub name: AttrValue,
    pub options: Vec<SelectOption>,
    pub value: AttrValue,
    pub onchange: Callback<String>,
    #[prop_or_default]
    pub placeholder: Option<AttrValue>,
    #[prop_or_default]
    pub required: bool,
    #[prop_or_default]
    pub error: Option<AttrValue>,
}

fn placement_style(placement: Option<&MenuPlacement>) -> Option<String> {
    let p = placement?;
    let vertical = match (p.top, p.bottom) {
        (Some(top), _) => format!("top:{top}px;"),
        (None, Some(bottom)) => format!("bottom:{bottom}px;"),
        (None, None) => String::new(),
    };
    Some(format!(
        "position:fixed;left:{}px;width:{}px;{vertical}max-height:{}px;",
        p.left, p.width, p.max_height
    ))
}

#[function_component(CustomSelect)]
pub fn custom_select(p: &Props) -> Html {
    let local = use_reducer(SelectState::default);
    let registry = use_context::<SelectContext>().unwrap_or(local);
    let button_ref = use_node_ref();
    let menu_ref = use_node_ref();
    let placement = use_state(|| None::<MenuPlacement>);
    let open = registry.is_open(&p.id);

    {
        let registry = registry.clone();
        use_effect_with(p.id.clone(), move |id| {
            registry.dispatch(SelectAction::Register(id.clone()));
            let id = id.clone();
            move || registry.dispatch(SelectAction::Unregister(id))
        });
    }

    {
        let registry = registry.clone();
        let placement = placement.clone();
        let button_ref = button_ref.clone();
        let menu_ref = menu_ref.clone();
        use_effect_with((open, p.id.clone()), move |(open, id)| {
            if !*open {
                placement.set(None);
                return;
            }
            let measured = button_ref
                .cast::<web_sys::Element>()
                .zip(menu_ref.cast::<web_sys::Element>())
                .zip(dom::viewport());
            if let Some(((button, menu), viewport)) = measured {
                let next = menu_placement(
                    dom::element_rect(&button),
                    f64::from(menu.scroll_height()),
                    viewport,
                );
                registry.dispatch(SelectAction::Placed(id.clone(), next.opens_up));
                placement.set(Some(next));
            }
        });
    }

    let on_toggle = {
        let registry = registry.clone();
        let id = p.id.clone();
        Callback::from(move |_| registry.dispatch(SelectAction::Toggle(id.clone())))
    };

    let on_keydown = {
        let registry = registry.clone();
        let id = p.id.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                registry.dispatch(SelectAction::Close(id.clone()));
            }
        })
    };

    let choose = {
        let registry = registry.clone();
        let id = p.id.clone();
        let onchange = p.onchange.clone();
        Callback::from(move |value: AttrValue| {
            onchange.emit(value.to_string());
            registry.dispatch(SelectAction::Close(id.clone()));
        })
    };

    let on_native_change = {
        let onchange = p.onchange.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<web_sys::HtmlSelectElement>() {
                onchange.emit(select.value());
            }
        })
    };

    let selected = p.options.iter().find(|o| o.value == p.value);
    let (button_text, is_placeholder) = match (selected, &p.placeholder) {
        (Some(opt), _) => (opt.label.clone(), false),
        (None, Some(placeholder)) => (placeholder.clone(), true),
        (None, None) => (p.value.clone(), false),
    };

    let wrapper_class = classes!(
        "mpSelect",
        open.then_some("is-open"),
        registry.opens_up(&p.id).then_some("is-up"),
        p.error.is_some().then_some("is-error"),
    );
    let menu_class = classes!("mpSelect__menu", open.then_some("is-open"));
    let error_id = format!("{}__error", p.id);

    html! {
        <div class={wrapper_class} onkeydown={on_keydown}>
            <select
                id={p.id.clone()}
                name={p.name.clone()}
                class="mpSelect__native"
                aria-required={p.required.then(|| AttrValue::from("true"))}
                tabindex="-1"
                onchange={on_native_change}
            >
                if is_placeholder {
                    <option value="" selected=true>{ button_text.clone() }</option>
                }
                { for p.options.iter().map(|opt| html! {
                    <option value={opt.value.clone()} selected={opt.value == p.value}>
                        { opt.label.clone() }
                    </option>
                }) }
            </select>
            <button
                id={format!("{}__btn", p.id)}
                type="button"
                class={classes!("mpSelect__button", is_placeholder.then_some("is-placeholder"))}
                aria-haspopup="listbox"
                aria-expanded={open.to_string()}
                ref={button_ref}
                onclick={on_toggle}
            >
                { button_text }
            </button>
            <ul
                role="listbox"
                class={menu_class}
                aria-hidden={(!open).to_string()}
                style={placement_style(placement.as_ref())}
                ref={menu_ref}
            >
                { for p.options.iter().map(|opt| {
                    let is_selected = opt.value == p.value;
                    let onclick = {
                        let choose = choose.clone();
                        let value = opt.value.clone();
                        Callback::from(move |_| choose.emit(value.clone()))
                    };
                    html! {
                        <li
                            role="option"
                            class={classes!("mpSelect__option", is_selected.then_some("is-selected"))}
                            aria-selected={is_selected.to_string()}
                            data-value={opt.value.clone()}
                            {onclick}
                        >
                            { opt.label.clone() }
                        </li>
                    }
                }) }
            </ul>
            <p id={error_id} class="mpSelect__error" hidden={p.error.is_none()}>
                { p.error.clone().unwrap_or_default() }
            </p>
        </div>
    }
}
