mod web_dom;

use std::cell::RefCell;

use toast::{
    inject_shared_styles, MessageFormat, Notifier, Severity, StyleInjection, ToastConfig,
    ToastError, ToastHandle, ToastRequest, ToastResult,
};
use wasm_bindgen::prelude::*;

pub use crate::web_dom::WebDom;

thread_local! {
    static NOTIFIER: RefCell<Option<Notifier<WebDom>>> = RefCell::new(None);
}

fn to_js(error: ToastError) -> JsValue {
    JsError::new(&error.to_string()).into()
}

/// Run `action` with the page's notifier, creating it with the default configuration on first use
fn with_notifier<T, F>(action: F) -> ToastResult<T>
where
    F: FnOnce(&Notifier<WebDom>) -> ToastResult<T>,
{
    NOTIFIER.with(|cell| {
        let notifier = match cell.borrow_mut().take() {
            Some(inner) => inner,
            None => Notifier::new(WebDom::from_window()?),
        };
        let result = action(&notifier);
        *cell.borrow_mut() = Some(notifier);
        result
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already installed by the page");
    }
    let dom = match WebDom::from_window() {
        Ok(inner) => inner,
        Err(error) => {
            log::error!("{error}");
            return;
        }
    };
    if let Err(error) = inject_shared_styles(&dom) {
        log::error!("Could not inject shared styles. {error}");
    }
}

/// Toast shown to a page script. Lets the script end the toast early.
#[wasm_bindgen]
pub struct ToastToken {
    handle: ToastHandle<WebDom>,
}

#[wasm_bindgen]
impl ToastToken {
    pub fn dismiss(&self) {
        self.handle.dismiss();
    }

    #[wasm_bindgen(getter = isActive)]
    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }
}

/// Build the request for a message and optional severity name passed by a page script
fn script_request(
    message: String,
    severity: Option<&str>,
    format: MessageFormat,
) -> ToastResult<ToastRequest> {
    let severity = Severity::parse_or_default(severity)?;
    Ok(ToastRequest::new(message)
        .with_severity(severity)
        .with_format(format))
}

/// What a page script sees of a show attempt. A missing container has already been reported
/// through the log and stays a silent no-op.
fn script_outcome<T>(result: ToastResult<T>) -> ToastResult<Option<T>> {
    match result {
        Ok(inner) => Ok(Some(inner)),
        Err(ToastError::ContainerMissing(_)) => Ok(None),
        Err(error) => Err(error),
    }
}

fn show(
    message: String,
    severity: Option<String>,
    format: MessageFormat,
) -> Result<Option<ToastToken>, JsValue> {
    let request = script_request(message, severity.as_deref(), format).map_err(to_js)?;
    let handle = script_outcome(with_notifier(|notifier| notifier.show(request))).map_err(to_js)?;
    Ok(handle.map(|handle| ToastToken { handle }))
}

/// `showToast(message, severity = "info")`. Returns `undefined` when the page has no toast
/// container and throws on an unknown severity.
#[wasm_bindgen(js_name = showToast)]
pub fn show_toast(
    message: String,
    severity: Option<String>,
) -> Result<Option<ToastToken>, JsValue> {
    show(message, severity, MessageFormat::Text)
}

/// Same as `showToast` but the message is parsed as markup
#[wasm_bindgen(js_name = showToastHtml)]
pub fn show_toast_html(
    message: String,
    severity: Option<String>,
) -> Result<Option<ToastToken>, JsValue> {
    show(message, severity, MessageFormat::TrustedHtml)
}

/// Replace the page's notifier with one using the JSON `config`. Toasts already shown keep the
/// timings they were created with.
#[wasm_bindgen(js_name = configureToasts)]
pub fn configure_toasts(config: &str) -> Result<(), JsValue> {
    let config = ToastConfig::from_json(config).map_err(to_js)?;
    let dom = WebDom::from_window().map_err(to_js)?;
    NOTIFIER.with(|cell| *cell.borrow_mut() = Some(Notifier::with_config(dom, config)));
    Ok(())
}

/// Inject the shared styles, returning false if they were already on the page
#[wasm_bindgen(js_name = injectSharedStyles)]
pub fn inject_styles() -> Result<bool, JsValue> {
    let dom = WebDom::from_window().map_err(to_js)?;
    let outcome = inject_shared_styles(&dom).map_err(to_js)?;
    Ok(outcome == StyleInjection::Injected)
}
