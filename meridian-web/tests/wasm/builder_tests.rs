#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use meridian_builder::{BuilderEdit, ExperienceBuilder};
use meridian_web::catalog::builder_catalog;
use meridian_web::components::experience_builder::BrowserSink;
use meridian_web::dom;
use meridian_web::error::WebError;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use yew::Renderer;

use meridian_web::app::App;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn ensure_app_root() -> web_sys::Element {
    let doc = dom::document().expect("document");
    if let Some(root) = doc.get_element_by_id("app") {
        root.set_inner_html("");
        return root;
    }
    let root = doc.create_element("div").expect("create app root");
    root.set_id("app");
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append app root");
    root
}

fn fresh_engine() -> ExperienceBuilder {
    dom::replace_url("/?utm_source=test").expect("reset url");
    let location = dom::current_location().expect("location");
    ExperienceBuilder::new(builder_catalog(), location)
}

#[wasm_bindgen_test]
fn edits_rewrite_the_address_bar() {
    let mut engine = fresh_engine();
    engine.apply(BuilderEdit::City("Valencia".into()), &BrowserSink);
    let search = dom::window()
        .expect("window")
        .location()
        .search()
        .expect("search");
    assert!(search.contains("utm_source=test"));
    assert!(search.contains("city=Valencia"));
}

#[wasm_bindgen_test]
fn broadcast_round_trips_through_custom_event() {
    let seen = Rc::new(RefCell::new(None));
    let listener = {
        let seen = seen.clone();
        dom::listen(dom::BUILDER_CHANGE_EVENT, move |event| {
            *seen.borrow_mut() = dom::builder_change_detail(&event);
        })
        .expect("listener")
    };
    let mut engine = fresh_engine();
    let change = engine.apply(BuilderEdit::Group("12".into()), &BrowserSink);
    let received = seen.borrow().clone().expect("event received");
    assert_eq!(received.config.group, 12);
    assert_eq!(received.share, change.share);
    drop(listener);
}

#[wasm_bindgen_test]
fn app_mounts_builder_and_contact_sections() {
    Renderer::<App>::with_root(ensure_app_root()).render();
    let doc = dom::document().expect("document");
    assert!(doc.get_element_by_id("experience-builder").is_some());
    assert!(doc.get_element_by_id("contact").is_some());
}

async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        let _ = dom::window()
            .expect("window")
            .request_animation_frame(&resolve);
    });
    let _ = JsFuture::from(promise).await;
}

async fn settle() {
    for _ in 0..3 {
        next_frame().await;
    }
}

fn click(selector: &str) {
    dom::document()
        .expect("document")
        .query_selector(selector)
        .expect("selector")
        .expect("element")
        .dyn_into::<web_sys::HtmlElement>()
        .expect("html element")
        .click();
}

fn attribute(selector: &str, name: &str) -> Option<String> {
    dom::document()
        .expect("document")
        .query_selector(selector)
        .expect("selector")
        .and_then(|el| el.get_attribute(name))
}

fn fire_scroll() {
    let event = web_sys::Event::new("scroll").expect("scroll event");
    dom::window()
        .expect("window")
        .dispatch_event(&event)
        .expect("dispatch scroll");
}

#[wasm_bindgen_test]
async fn missing_clipboard_is_reported_for_the_prompt_fallback() {
    let navigator: JsValue = dom::window().expect("window").navigator().into();
    let descriptor = js_sys::Object::new();
    js_sys::Reflect::set(&descriptor, &"value".into(), &JsValue::UNDEFINED).expect("value");
    js_sys::Reflect::set(&descriptor, &"configurable".into(), &JsValue::TRUE)
        .expect("configurable");
    js_sys::Object::define_property(
        navigator.unchecked_ref(),
        &"clipboard".into(),
        &descriptor,
    );

    let result = dom::write_clipboard("https://meridianpadel.com/?days=5").await;

    js_sys::Reflect::delete_property(navigator.unchecked_ref(), &"clipboard".into())
        .expect("restore clipboard");
    assert!(matches!(result, Err(WebError::ClipboardUnsupported)));
}

#[wasm_bindgen_test]
async fn scrolling_closes_an_open_select() {
    Renderer::<App>::with_root(ensure_app_root()).render();
    settle().await;
    click("#eb-city__btn");
    settle().await;
    assert_eq!(
        attribute("#eb-city__btn", "aria-expanded").as_deref(),
        Some("true")
    );

    fire_scroll();
    settle().await;
    assert_eq!(
        attribute("#eb-city__btn", "aria-expanded").as_deref(),
        Some("false")
    );
}

#[wasm_bindgen_test]
async fn open_calendar_follows_its_anchor_on_scroll() {
    let doc = dom::document().expect("document");
    let spacer = doc.create_element("div").expect("spacer");
    spacer
        .set_attribute("style", "height:3000px")
        .expect("spacer height");
    doc.body()
        .expect("body")
        .append_child(&spacer)
        .expect("append spacer");

    Renderer::<App>::with_root(ensure_app_root()).render();
    settle().await;
    click("#experience-builder .mpDate__btn");
    settle().await;
    assert!(doc.query_selector(".mpCal").expect("selector").is_some());

    dom::window().expect("window").scroll_to_with_x_and_y(0.0, 120.0);
    fire_scroll();
    settle().await;

    let popup = doc
        .query_selector(".mpCal")
        .expect("selector")
        .expect("calendar still open");
    if popup.class_list().contains("is-modal") {
        return;
    }
    let anchor = doc
        .query_selector("#experience-builder .mpDate__btn")
        .expect("selector")
        .expect("anchor");
    let rect = dom::element_rect(&popup);
    let expected = meridian_builder::layout::calendar_position(
        dom::element_rect(&anchor),
        meridian_builder::layout::Size {
            width: rect.width,
            height: rect.height,
        },
        dom::viewport().expect("viewport"),
    );
    let style = popup.get_attribute("style").unwrap_or_default();
    assert!(
        style.contains(&format!("left:{}px;top:{}px;", expected.0, expected.1)),
        "{style}"
    );
    spacer.remove();
}
