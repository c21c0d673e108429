//! In-memory [Dom] with a virtual clock. Timers, animation frames and transition ends only run
//! when the test asks for them through [MockDom::advance], [MockDom::run_animation_frame] and
//! [MockDom::fire_transition_end].
//!
//! Timers and listeners are returned as guards holding a weak reference to the document, dropping
//! a guard drops the callback it registered the same way the browser guards free their closures.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{
    dom::{Callback, Dom},
    error::{ToastError, ToastResult},
};

#[derive(PartialEq, Eq, Debug, Hash, Copy, Clone)]
pub struct MockNode(usize);

#[derive(Default)]
struct MockElement {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    text: String,
    inner_html: Option<String>,
    children: Vec<MockNode>,
    parent: Option<MockNode>,
}

impl MockElement {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Default::default()
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

struct PendingTimer {
    id: u32,
    due_ms: u64,
    callback: Callback,
}

struct PendingListener {
    id: u32,
    node: MockNode,
    callback: Callback,
}

/// Registration the next matching call refuses, see [MockDom::fail_next]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum MockFailure {
    AnimationFrame,
    Timer,
    TransitionListener,
}

struct Document {
    elements: Vec<MockElement>,
    root: MockNode,
    head: Option<MockNode>,
    body: MockNode,
    now_ms: u64,
    next_guard_id: u32,
    timers: Vec<PendingTimer>,
    frames: Vec<Callback>,
    transition_listeners: Vec<PendingListener>,
    failures: Vec<MockFailure>,
}

impl Document {
    fn new(with_head: bool) -> Self {
        let mut document = Self {
            elements: vec![MockElement::new("html")],
            root: MockNode(0),
            head: None,
            body: MockNode(0),
            now_ms: 0,
            next_guard_id: 1,
            timers: Vec::new(),
            frames: Vec::new(),
            transition_listeners: Vec::new(),
            failures: Vec::new(),
        };
        if with_head {
            let head = document.create("head");
            document.append(document.root, head);
            document.head = Some(head);
        }
        let body = document.create("body");
        document.append(document.root, body);
        document.body = body;
        document
    }

    fn create(&mut self, tag: &str) -> MockNode {
        self.elements.push(MockElement::new(tag));
        MockNode(self.elements.len() - 1)
    }

    fn element(&self, node: MockNode) -> &MockElement {
        &self.elements[node.0]
    }

    fn element_mut(&mut self, node: MockNode) -> &mut MockElement {
        &mut self.elements[node.0]
    }

    fn detach(&mut self, node: MockNode) {
        if let Some(parent) = self.element_mut(node).parent.take() {
            self.element_mut(parent).children.retain(|child| *child != node);
        }
    }

    fn append(&mut self, parent: MockNode, child: MockNode) {
        self.detach(child);
        self.element_mut(child).parent = Some(parent);
        self.element_mut(parent).children.push(child);
    }

    /// Attached elements in document order
    fn attached(&self) -> Vec<MockNode> {
        let mut nodes = Vec::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(self.element(node).children.iter().rev());
        }
        nodes
    }

    fn next_guard_id(&mut self) -> u32 {
        let id = self.next_guard_id;
        self.next_guard_id += 1;
        id
    }

    /// True if a failure of `kind` was armed, disarming it
    fn take_failure(&mut self, kind: MockFailure) -> bool {
        let Some(index) = self.failures.iter().position(|failure| *failure == kind) else {
            return false;
        };
        self.failures.remove(index);
        true
    }
}

/// Timer registered on a [MockDom], cancelled when dropped
pub struct MockTimer {
    id: u32,
    document: Weak<RefCell<Document>>,
}

impl Drop for MockTimer {
    fn drop(&mut self) {
        let Some(document) = self.document.upgrade() else {
            return;
        };
        // callbacks may own the last clone of their state, drop them after releasing the borrow
        let cancelled: Vec<PendingTimer> = {
            let mut document = document.borrow_mut();
            let (cancelled, kept) = std::mem::take(&mut document.timers)
                .into_iter()
                .partition(|timer| timer.id == self.id);
            document.timers = kept;
            cancelled
        };
        drop(cancelled);
    }
}

/// Transition listener registered on a [MockDom], removed when dropped
pub struct MockListener {
    id: u32,
    document: Weak<RefCell<Document>>,
}

impl Drop for MockListener {
    fn drop(&mut self) {
        let Some(document) = self.document.upgrade() else {
            return;
        };
        let removed: Vec<PendingListener> = {
            let mut document = document.borrow_mut();
            let (removed, kept) = std::mem::take(&mut document.transition_listeners)
                .into_iter()
                .partition(|listener| listener.id == self.id);
            document.transition_listeners = kept;
            removed
        };
        drop(removed);
    }
}

enum Selector {
    Tag(String),
    TagWithAttribute {
        tag: String,
        name: String,
        value: Option<String>,
    },
}

impl Selector {
    /// Supports `tag`, `tag[name]` and `tag[name="value"]`
    fn parse(selector: &str) -> ToastResult<Self> {
        let Some((tag, rest)) = selector.split_once('[') else {
            return Ok(Self::Tag(selector.to_owned()));
        };
        let Some(attribute) = rest.strip_suffix(']') else {
            return Err(format!("Unsupported selector `{selector}`").into());
        };
        let (name, value) = match attribute.split_once('=') {
            Some((name, value)) => (name, Some(value.trim_matches('"').to_owned())),
            None => (attribute, None),
        };
        Ok(Self::TagWithAttribute {
            tag: tag.to_owned(),
            name: name.to_owned(),
            value,
        })
    }

    fn matches(&self, element: &MockElement) -> bool {
        match self {
            Self::Tag(tag) => element.tag == *tag,
            Self::TagWithAttribute { tag, name, value } => {
                element.tag == *tag
                    && match (element.attribute(name), value) {
                        (Some(actual), Some(expected)) => actual == expected,
                        (Some(_), None) => true,
                        (None, _) => false,
                    }
            }
        }
    }
}

/// Cheap handle to a shared in-memory document
#[derive(Clone)]
pub struct MockDom {
    document: Rc<RefCell<Document>>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Document with an empty `<head>` and `<body>`
    pub fn new() -> Self {
        Self {
            document: Rc::new(RefCell::new(Document::new(true))),
        }
    }

    /// Document lacking a style root
    pub fn without_head() -> Self {
        Self {
            document: Rc::new(RefCell::new(Document::new(false))),
        }
    }

    /// Append a `<div id="{id}">` to the body
    pub fn add_container(&self, id: &str) -> MockNode {
        let mut document = self.document.borrow_mut();
        let container = document.create("div");
        document
            .element_mut(container)
            .attributes
            .push(("id".to_owned(), id.to_owned()));
        let body = document.body;
        document.append(body, container);
        container
    }

    pub fn body(&self) -> MockNode {
        self.document.borrow().body
    }

    pub fn head(&self) -> Option<MockNode> {
        self.document.borrow().head
    }

    /// Number of elements ever created, attached or not
    pub fn element_count(&self) -> usize {
        self.document.borrow().elements.len()
    }

    pub fn tag(&self, node: &MockNode) -> String {
        self.document.borrow().element(*node).tag.clone()
    }

    pub fn children(&self, node: &MockNode) -> Vec<MockNode> {
        self.document.borrow().element(*node).children.clone()
    }

    pub fn parent(&self, node: &MockNode) -> Option<MockNode> {
        self.document.borrow().element(*node).parent
    }

    pub fn classes(&self, node: &MockNode) -> Vec<String> {
        self.document.borrow().element(*node).classes.clone()
    }

    pub fn has_class(&self, node: &MockNode, class: &str) -> bool {
        self.document
            .borrow()
            .element(*node)
            .classes
            .iter()
            .any(|c| c == class)
    }

    pub fn attribute(&self, node: &MockNode, name: &str) -> Option<String> {
        self.document
            .borrow()
            .element(*node)
            .attribute(name)
            .map(ToOwned::to_owned)
    }

    /// Text content of `node`. [None] when the content was set as markup.
    pub fn text(&self, node: &MockNode) -> Option<String> {
        let document = self.document.borrow();
        let element = document.element(*node);
        match element.inner_html {
            Some(_) => None,
            None => Some(element.text.clone()),
        }
    }

    pub fn inner_html(&self, node: &MockNode) -> Option<String> {
        self.document.borrow().element(*node).inner_html.clone()
    }

    /// True if `node` is reachable from the document root
    pub fn is_attached(&self, node: &MockNode) -> bool {
        let document = self.document.borrow();
        let mut current = *node;
        while let Some(parent) = document.element(current).parent {
            current = parent;
        }
        current == document.root
    }

    pub fn now_ms(&self) -> u64 {
        self.document.borrow().now_ms
    }

    pub fn pending_timers(&self) -> usize {
        self.document.borrow().timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.document.borrow().frames.len()
    }

    pub fn transition_listeners(&self) -> usize {
        self.document.borrow().transition_listeners.len()
    }

    /// Make the next registration of `kind` fail with a DOM error
    pub fn fail_next(&self, kind: MockFailure) {
        self.document.borrow_mut().failures.push(kind);
    }

    fn refuse(&self, kind: MockFailure) -> ToastResult<()> {
        if self.document.borrow_mut().take_failure(kind) {
            return Err(ToastError::Dom(format!("{kind:?} registration refused")));
        }
        Ok(())
    }

    /// Run the callbacks queued for the next frame, returning how many ran. Callbacks requested
    /// while running wait for the following frame.
    pub fn run_animation_frame(&self) -> usize {
        let frames = std::mem::take(&mut self.document.borrow_mut().frames);
        let count = frames.len();
        for callback in frames {
            callback();
        }
        count
    }

    /// Move the clock forward by `ms`, firing due timers in order of their deadline
    pub fn advance(&self, ms: u64) {
        let target = self.document.borrow().now_ms + ms;
        loop {
            let callback = {
                let mut document = self.document.borrow_mut();
                let next = document
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due_ms <= target)
                    .min_by_key(|(_, timer)| (timer.due_ms, timer.id))
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let timer = document.timers.remove(index);
                        document.now_ms = timer.due_ms;
                        Some(timer.callback)
                    }
                    None => {
                        document.now_ms = target;
                        None
                    }
                }
            };
            match callback {
                Some(callback) => callback(),
                None => break,
            }
        }
    }

    /// Signal the end of a transition on `node`, returning false if nothing was listening
    pub fn fire_transition_end(&self, node: &MockNode) -> bool {
        let listeners: Vec<PendingListener> = {
            let mut document = self.document.borrow_mut();
            let (fired, kept): (Vec<_>, Vec<_>) =
                std::mem::take(&mut document.transition_listeners)
                    .into_iter()
                    .partition(|listener| listener.node == *node);
            document.transition_listeners = kept;
            fired
        };
        let fired = !listeners.is_empty();
        for listener in listeners {
            (listener.callback)();
        }
        fired
    }
}

impl Dom for MockDom {
    type Node = MockNode;
    type Timer = MockTimer;
    type Listener = MockListener;

    fn element_by_id(&self, id: &str) -> Option<Self::Node> {
        let document = self.document.borrow();
        document
            .attached()
            .into_iter()
            .find(|node| document.element(*node).attribute("id") == Some(id))
    }

    fn style_root(&self) -> Option<Self::Node> {
        self.head()
    }

    fn query_selector(&self, selector: &str) -> ToastResult<Option<Self::Node>> {
        let selector = Selector::parse(selector)?;
        let document = self.document.borrow();
        Ok(document
            .attached()
            .into_iter()
            .find(|node| selector.matches(document.element(*node))))
    }

    fn create_element(&self, tag: &str) -> ToastResult<Self::Node> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ToastError::Dom(format!("Invalid tag name `{tag}`")));
        }
        Ok(self.document.borrow_mut().create(tag))
    }

    fn set_class_name(&self, node: &Self::Node, class_name: &str) {
        self.document.borrow_mut().element_mut(*node).classes =
            class_name.split_whitespace().map(ToOwned::to_owned).collect();
    }

    fn add_classes(&self, node: &Self::Node, classes: &[&str]) -> ToastResult<()> {
        let mut document = self.document.borrow_mut();
        let element = document.element_mut(*node);
        for class in classes {
            if class.is_empty() || class.contains(char::is_whitespace) {
                return Err(ToastError::Dom(format!("Invalid class token `{class}`")));
            }
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push((*class).to_owned());
            }
        }
        Ok(())
    }

    fn remove_classes(&self, node: &Self::Node, classes: &[&str]) -> ToastResult<()> {
        let mut document = self.document.borrow_mut();
        document
            .element_mut(*node)
            .classes
            .retain(|c| !classes.contains(&c.as_str()));
        Ok(())
    }

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> ToastResult<()> {
        if name.is_empty() {
            return Err("Attribute name cannot be empty".into());
        }
        let mut document = self.document.borrow_mut();
        let element = document.element_mut(*node);
        match element.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => element
                .attributes
                .push((name.to_owned(), value.to_owned())),
        }
        Ok(())
    }

    fn set_text_content(&self, node: &Self::Node, text: &str) {
        let mut document = self.document.borrow_mut();
        for child in document.element(*node).children.clone() {
            document.detach(child);
        }
        let element = document.element_mut(*node);
        element.text = text.to_owned();
        element.inner_html = None;
    }

    fn set_inner_html(&self, node: &Self::Node, html: &str) {
        let mut document = self.document.borrow_mut();
        for child in document.element(*node).children.clone() {
            document.detach(child);
        }
        let element = document.element_mut(*node);
        element.text.clear();
        element.inner_html = Some(html.to_owned());
    }

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> ToastResult<()> {
        if parent == child {
            return Err("Cannot append a node to itself".into());
        }
        self.document.borrow_mut().append(*parent, *child);
        Ok(())
    }

    fn remove(&self, node: &Self::Node) {
        self.document.borrow_mut().detach(*node);
    }

    fn request_animation_frame(&self, callback: Callback) -> ToastResult<()> {
        self.refuse(MockFailure::AnimationFrame)?;
        self.document.borrow_mut().frames.push(callback);
        Ok(())
    }

    fn set_timeout(&self, delay_ms: u32, callback: Callback) -> ToastResult<Self::Timer> {
        self.refuse(MockFailure::Timer)?;
        let mut document = self.document.borrow_mut();
        let id = document.next_guard_id();
        let due_ms = document.now_ms + u64::from(delay_ms);
        document.timers.push(PendingTimer {
            id,
            due_ms,
            callback,
        });
        Ok(MockTimer {
            id,
            document: Rc::downgrade(&self.document),
        })
    }

    fn on_transition_end(
        &self,
        node: &Self::Node,
        callback: Callback,
    ) -> ToastResult<Self::Listener> {
        self.refuse(MockFailure::TransitionListener)?;
        let mut document = self.document.borrow_mut();
        let id = document.next_guard_id();
        document.transition_listeners.push(PendingListener {
            id,
            node: *node,
            callback,
        });
        Ok(MockListener {
            id,
            document: Rc::downgrade(&self.document),
        })
    }
}
