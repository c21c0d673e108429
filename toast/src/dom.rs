use crate::error::ToastResult;

/// Deferred work scheduled on the page's event loop
pub type Callback = Box<dyn FnOnce()>;

/// The slice of the host page the toasts and style injection need. Implemented over `web-sys` by
/// the browser client and by [MockDom][crate::mock::MockDom] for tests.
///
/// Implementations are cheap handles to a single document, cloning one must not copy the
/// document. All callbacks run on the page's single thread, never re-entrantly from inside the
/// call that registered them.
///
/// Timers and listeners are owned guards: dropping one cancels it and frees its callback, so
/// whoever holds the guard decides how long the captured state lives.
pub trait Dom: Clone + 'static {
    /// Handle to an element of the document
    type Node: Clone + 'static;
    /// Pending timer, cancelled and freed on drop
    type Timer: 'static;
    /// Registered event listener, removed and freed on drop
    type Listener: 'static;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Root that style elements are appended to, the document `<head>`
    fn style_root(&self) -> Option<Self::Node>;

    /// First element matching a CSS `selector`
    /// # Errors
    /// This function will return an error if the selector cannot be evaluated
    fn query_selector(&self, selector: &str) -> ToastResult<Option<Self::Node>>;

    /// # Errors
    /// This function will return an error if the `tag` is not a valid element name
    fn create_element(&self, tag: &str) -> ToastResult<Self::Node>;

    /// Replace the full class list of `node`
    fn set_class_name(&self, node: &Self::Node, class_name: &str);

    /// # Errors
    /// This function will return an error if a class token is rejected by the document
    fn add_classes(&self, node: &Self::Node, classes: &[&str]) -> ToastResult<()>;

    /// # Errors
    /// This function will return an error if a class token is rejected by the document
    fn remove_classes(&self, node: &Self::Node, classes: &[&str]) -> ToastResult<()>;

    /// # Errors
    /// This function will return an error if the attribute `name` is invalid
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> ToastResult<()>;

    fn set_text_content(&self, node: &Self::Node, text: &str);

    /// Parse `html` as markup and make it the content of `node`
    fn set_inner_html(&self, node: &Self::Node, html: &str);

    /// Append `child` as the last child of `parent`
    /// # Errors
    /// This function will return an error if the document refuses the insertion
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> ToastResult<()>;

    /// Detach `node` from its parent. Detaching an already detached node does nothing.
    fn remove(&self, node: &Self::Node);

    /// Run `callback` before the next repaint
    /// # Errors
    /// This function will return an error if the frame request is refused
    fn request_animation_frame(&self, callback: Callback) -> ToastResult<()>;

    /// Run `callback` once after `delay_ms`, unless the returned timer is dropped first
    /// # Errors
    /// This function will return an error if the timer could not be registered
    fn set_timeout(&self, delay_ms: u32, callback: Callback) -> ToastResult<Self::Timer>;

    /// Run `callback` the first time a CSS transition on `node` ends, for as long as the
    /// returned listener is kept
    /// # Errors
    /// This function will return an error if the listener could not be registered
    fn on_transition_end(
        &self,
        node: &Self::Node,
        callback: Callback,
    ) -> ToastResult<Self::Listener>;
}
