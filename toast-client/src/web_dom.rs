use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use toast::{dom::Callback, Dom, ToastError, ToastResult};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Window};

/// [Dom] over the browser's global `window` and its document
#[derive(Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn from_window() -> ToastResult<Self> {
        let window = web_sys::window().ok_or("No global `window` exists")?;
        let document = window.document().ok_or("Window has no document")?;
        Ok(Self { window, document })
    }
}

fn js_error(value: JsValue) -> ToastError {
    ToastError::Dom(format!("{value:?}"))
}

/// Wrap `callback` in a JS function that frees itself after its single call. Only for callbacks
/// the browser always runs, a frame request cannot be cancelled.
fn once_function(callback: Callback) -> js_sys::Function {
    Closure::once_into_js(move || callback()).unchecked_into()
}

impl Dom for WebDom {
    type Node = Element;
    type Timer = Timeout;
    type Listener = EventListener;

    fn element_by_id(&self, id: &str) -> Option<Self::Node> {
        self.document.get_element_by_id(id)
    }

    fn style_root(&self) -> Option<Self::Node> {
        self.document.head().map(Into::into)
    }

    fn query_selector(&self, selector: &str) -> ToastResult<Option<Self::Node>> {
        self.document.query_selector(selector).map_err(js_error)
    }

    fn create_element(&self, tag: &str) -> ToastResult<Self::Node> {
        self.document.create_element(tag).map_err(js_error)
    }

    fn set_class_name(&self, node: &Self::Node, class_name: &str) {
        node.set_class_name(class_name);
    }

    fn add_classes(&self, node: &Self::Node, classes: &[&str]) -> ToastResult<()> {
        let class_list = node.class_list();
        for class in classes {
            class_list.add_1(class).map_err(js_error)?;
        }
        Ok(())
    }

    fn remove_classes(&self, node: &Self::Node, classes: &[&str]) -> ToastResult<()> {
        let class_list = node.class_list();
        for class in classes {
            class_list.remove_1(class).map_err(js_error)?;
        }
        Ok(())
    }

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> ToastResult<()> {
        node.set_attribute(name, value).map_err(js_error)
    }

    fn set_text_content(&self, node: &Self::Node, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_inner_html(&self, node: &Self::Node, html: &str) {
        node.set_inner_html(html);
    }

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> ToastResult<()> {
        parent.append_child(child).map_err(js_error)?;
        Ok(())
    }

    fn remove(&self, node: &Self::Node) {
        node.remove();
    }

    fn request_animation_frame(&self, callback: Callback) -> ToastResult<()> {
        self.window
            .request_animation_frame(&once_function(callback))
            .map_err(js_error)?;
        Ok(())
    }

    fn set_timeout(&self, delay_ms: u32, callback: Callback) -> ToastResult<Self::Timer> {
        // the browser reads the delay as an i32
        let delay_ms = delay_ms.min(i32::MAX.unsigned_abs());
        Ok(Timeout::new(delay_ms, move || callback()))
    }

    fn on_transition_end(
        &self,
        node: &Self::Node,
        callback: Callback,
    ) -> ToastResult<Self::Listener> {
        Ok(EventListener::once(node, "transitionend", move |_| callback()))
    }
}
