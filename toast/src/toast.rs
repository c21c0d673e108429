use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use serde::{Deserialize, Serialize};

use crate::{config::ToastConfig, dom::Dom, error::ToastResult, severity::Severity};

/// Layout and transition classes shared by every toast
pub const BASE_CLASSES: &str =
    "flex items-center text-white px-6 py-4 rounded-md shadow-lg transform transition-all duration-300";
/// Offset and transparent state a toast is created in, cleared on the next animation frame
pub const ENTER_CLASSES: [&str; 2] = ["translate-y-4", "opacity-0"];
/// Class added to fade a toast out once its display time is over
pub const EXIT_CLASS: &str = "opacity-0";

/// How the message of a toast is placed into the page
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Default, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum MessageFormat {
    /// Message is displayed literally, markup characters included
    #[default]
    Text,
    /// Message is parsed as markup. Only for content that never carries user input.
    TrustedHtml,
}

/// A single request to show a toast
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct ToastRequest {
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub format: MessageFormat,
}

impl ToastRequest {
    /// Create an [Severity::Info] request displaying `message` as plain text
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            severity: Severity::default(),
            format: MessageFormat::default(),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: MessageFormat) -> Self {
        self.format = format;
        self
    }

    /// Class list of the toast element as it is first inserted, before the entry animation
    pub fn class_name(&self) -> String {
        format!(
            "{BASE_CLASSES} {} {}",
            ENTER_CLASSES.join(" "),
            self.severity.background()
        )
    }

    pub fn icon_class_name(&self) -> String {
        format!("fas {} mr-3 text-xl", self.severity.icon())
    }
}

impl From<&str> for ToastRequest {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ToastRequest {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<(&str, Severity)> for ToastRequest {
    fn from((message, severity): (&str, Severity)) -> Self {
        Self::new(message).with_severity(severity)
    }
}

impl From<(String, Severity)> for ToastRequest {
    fn from((message, severity): (String, Severity)) -> Self {
        Self::new(message).with_severity(severity)
    }
}

/// Lifecycle of a toast element. Phases only move forward and [ToastPhase::Removed] is final.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum ToastPhase {
    /// Attached and waiting for the next animation frame to slide in
    Entering,
    /// Fully shown, waiting for the display timer
    Visible,
    /// Fading out, waiting for the end of the exit transition
    Leaving,
    /// Detached from the page
    Removed,
}

struct ToastState<D: Dom> {
    dom: D,
    node: D::Node,
    phase: Cell<ToastPhase>,
    exit_timer: RefCell<Option<D::Timer>>,
    fallback_timer: RefCell<Option<D::Timer>>,
    transition_listener: RefCell<Option<D::Listener>>,
}

impl<D: Dom> ToastState<D> {
    fn enter(&self) {
        if self.phase.get() != ToastPhase::Entering {
            return;
        }
        if let Err(error) = self.dom.remove_classes(&self.node, &ENTER_CLASSES) {
            log::warn!("Could not start toast entry animation. {error}");
        }
        self.phase.set(ToastPhase::Visible);
    }

    fn leave(self: &Rc<Self>, fallback_ms: Option<u32>) {
        if self.phase.get() == ToastPhase::Removed {
            return;
        }
        self.phase.set(ToastPhase::Leaving);
        if let Err(error) = self.start_exit_transition(fallback_ms) {
            log::error!("Could not start toast exit transition, removing now. {error}");
            self.detach();
        }
    }

    fn start_exit_transition(self: &Rc<Self>, fallback_ms: Option<u32>) -> ToastResult<()> {
        self.dom.add_classes(&self.node, &[EXIT_CLASS])?;
        let state = Rc::clone(self);
        let listener = self
            .dom
            .on_transition_end(&self.node, Box::new(move || state.detach()))?;
        *self.transition_listener.borrow_mut() = Some(listener);
        let Some(delay_ms) = fallback_ms else {
            return Ok(());
        };
        let state = Rc::clone(self);
        let timer = self.dom.set_timeout(
            delay_ms,
            Box::new(move || {
                if state.phase.get() != ToastPhase::Removed {
                    log::debug!("Toast exit transition did not end within {delay_ms}ms");
                }
                state.detach();
            }),
        )?;
        *self.fallback_timer.borrow_mut() = Some(timer);
        Ok(())
    }

    /// Remove the node and drop every timer and listener still held. Their callbacks own clones
    /// of this state, dropping them is what lets the state go.
    fn detach(&self) {
        if self.phase.replace(ToastPhase::Removed) == ToastPhase::Removed {
            return;
        }
        self.dom.remove(&self.node);
        let guards = (
            self.exit_timer.take(),
            self.fallback_timer.take(),
            self.transition_listener.take(),
        );
        drop(guards);
    }
}

/// Handle to a toast shown by a [Notifier][crate::Notifier]. Dropping the handle does not affect
/// the toast, it still leaves on its own once its display time is over.
pub struct ToastHandle<D: Dom> {
    state: Rc<ToastState<D>>,
}

impl<D: Dom> Clone for ToastHandle<D> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<D: Dom> ToastHandle<D> {
    /// Render the toast described by `request`, append it to `container` and schedule its entry
    /// and exit. If scheduling fails the element is detached again before returning the error.
    pub(crate) fn mount(
        dom: &D,
        container: &D::Node,
        request: &ToastRequest,
        config: &ToastConfig,
    ) -> ToastResult<Self> {
        let node = render(dom, request)?;
        dom.append_child(container, &node)?;
        let handle = Self {
            state: Rc::new(ToastState {
                dom: dom.clone(),
                node,
                phase: Cell::new(ToastPhase::Entering),
                exit_timer: RefCell::new(None),
                fallback_timer: RefCell::new(None),
                transition_listener: RefCell::new(None),
            }),
        };
        if let Err(error) = handle.schedule(config) {
            handle.dismiss();
            return Err(error);
        }
        Ok(handle)
    }

    fn schedule(&self, config: &ToastConfig) -> ToastResult<()> {
        let state = Rc::clone(&self.state);
        self.state
            .dom
            .request_animation_frame(Box::new(move || state.enter()))?;

        let state = Rc::clone(&self.state);
        let fallback_ms = config.exit_fallback_ms;
        let timer = self
            .state
            .dom
            .set_timeout(config.display_ms, Box::new(move || state.leave(fallback_ms)))?;
        *self.state.exit_timer.borrow_mut() = Some(timer);
        Ok(())
    }

    pub fn phase(&self) -> ToastPhase {
        self.state.phase.get()
    }

    /// True until the toast has been detached from the page
    pub fn is_active(&self) -> bool {
        self.phase() != ToastPhase::Removed
    }

    pub fn node(&self) -> &D::Node {
        &self.state.node
    }

    /// Cancel any pending transition step and detach the toast immediately. Dismissing a toast
    /// that is already gone does nothing.
    pub fn dismiss(&self) {
        self.state.detach();
    }
}

fn render<D: Dom>(dom: &D, request: &ToastRequest) -> ToastResult<D::Node> {
    let toast = dom.create_element("div")?;
    dom.set_class_name(&toast, &request.class_name());

    let icon = dom.create_element("i")?;
    dom.set_class_name(&icon, &request.icon_class_name());

    let body = dom.create_element("span")?;
    match request.format {
        MessageFormat::Text => dom.set_text_content(&body, &request.message),
        MessageFormat::TrustedHtml => dom.set_inner_html(&body, &request.message),
    }

    dom.append_child(&toast, &icon)?;
    dom.append_child(&toast, &body)?;
    Ok(toast)
}
