use wasm_bindgen::JsValue;

/// Failures from browser APIs.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("window unavailable")]
    MissingWindow,
    #[error("document unavailable")]
    MissingDocument,
    #[error("clipboard unavailable")]
    ClipboardUnsupported,
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(crate::dom::js_error_message(&value))
    }
}

impl From<serde_wasm_bindgen::Error> for WebError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Js(err.to_string())
    }
}
