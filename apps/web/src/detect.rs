use agrod_core::{DetectionRequest, DetectionResult};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

/// Same-origin detection route.
pub const DETECT_ENDPOINT: &str = "/detect";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network response was not ok (HTTP {0})")]
    Status(u16),
    #[error("{0}")]
    Browser(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<JsValue> for FetchError {
    fn from(value: JsValue) -> Self {
        Self::Browser(browser_message(&value))
    }
}

/// The text a browser would show for a rejected promise: an `Error`'s
/// message, a thrown string as is, anything else in debug form.
fn browser_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// POSTs the request as JSON and decodes the reply.
pub async fn detect(request: &DetectionRequest) -> Result<DetectionResult, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Browser("no window".to_string()))?;
    let body = serde_json::to_string(request).map_err(|e| FetchError::Decode(e.to_string()))?;

    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::SameOrigin);
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(DETECT_ENDPOINT, &opts)?;
    let response_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response = response_value
        .dyn_into::<Response>()
        .map_err(|_| FetchError::Browser("fetch did not return a Response".to_string()))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let json = JsFuture::from(response.json()?).await?;
    serde_wasm_bindgen::from_value::<DetectionResult>(json)
        .map_err(|error| FetchError::Decode(error.to_string()))
}
