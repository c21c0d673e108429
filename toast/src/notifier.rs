use crate::{
    config::ToastConfig,
    diagnostics::{DiagnosticSink, LogSink},
    dom::Dom,
    error::{ToastError, ToastResult},
    severity::Severity,
    toast::{MessageFormat, ToastHandle, ToastRequest},
};

/// Shows toasts in a container of the page.
///
/// The container is either injected with [Notifier::with_container] or looked up by
/// [ToastConfig::container_id] each time a toast is shown, so a notifier can be created before
/// the page has rendered its container.
pub struct Notifier<D: Dom, S: DiagnosticSink = LogSink> {
    dom: D,
    container: Option<D::Node>,
    config: ToastConfig,
    sink: S,
}

impl<D: Dom> Notifier<D> {
    pub fn new(dom: D) -> Self {
        Self::with_config(dom, ToastConfig::default())
    }

    pub const fn with_config(dom: D, config: ToastConfig) -> Self {
        Self {
            dom,
            container: None,
            config,
            sink: LogSink,
        }
    }
}

impl<D: Dom, S: DiagnosticSink> Notifier<D, S> {
    /// Stack toasts in `container` instead of looking the container up by id
    #[must_use]
    pub fn with_container(mut self, container: D::Node) -> Self {
        self.container = Some(container);
        self
    }

    /// Replace the channel receiving the notifier's diagnostics
    pub fn with_sink<T: DiagnosticSink>(self, sink: T) -> Notifier<D, T> {
        Notifier {
            dom: self.dom,
            container: self.container,
            config: self.config,
            sink,
        }
    }

    pub const fn config(&self) -> &ToastConfig {
        &self.config
    }

    /// Show a toast at the end of the container. Accepts a full [ToastRequest], a message alone
    /// (shown as [Severity::Info]) or a `(message, severity)` pair.
    ///
    /// The toast slides in on the next animation frame, starts fading out after
    /// [ToastConfig::display_ms] and is detached once the fade ends.
    /// # Errors
    /// This function will return an error if the container cannot be found, in which case a
    /// diagnostic has been reported and nothing was added to the page, or if a DOM operation
    /// fails while building the toast
    pub fn show<R: Into<ToastRequest>>(&self, request: R) -> ToastResult<ToastHandle<D>> {
        let request = request.into();
        let container = self.container()?;
        ToastHandle::mount(&self.dom, &container, &request, &self.config)
    }

    /// Show a toast whose message is parsed as markup. Never pass content that may carry user
    /// input.
    /// # Errors
    /// See [Notifier::show]
    pub fn show_html<M: Into<String>>(
        &self,
        message: M,
        severity: Severity,
    ) -> ToastResult<ToastHandle<D>> {
        self.show(
            ToastRequest::new(message)
                .with_severity(severity)
                .with_format(MessageFormat::TrustedHtml),
        )
    }

    /// # Errors
    /// See [Notifier::show]
    pub fn info<M: Into<String>>(&self, message: M) -> ToastResult<ToastHandle<D>> {
        self.show(ToastRequest::new(message).with_severity(Severity::Info))
    }

    /// # Errors
    /// See [Notifier::show]
    pub fn success<M: Into<String>>(&self, message: M) -> ToastResult<ToastHandle<D>> {
        self.show(ToastRequest::new(message).with_severity(Severity::Success))
    }

    /// # Errors
    /// See [Notifier::show]
    pub fn error<M: Into<String>>(&self, message: M) -> ToastResult<ToastHandle<D>> {
        self.show(ToastRequest::new(message).with_severity(Severity::Error))
    }

    fn container(&self) -> ToastResult<D::Node> {
        if let Some(container) = &self.container {
            return Ok(container.clone());
        }
        let id = &self.config.container_id;
        match self.dom.element_by_id(id) {
            Some(container) => Ok(container),
            None => {
                self.sink.container_missing(id);
                Err(ToastError::ContainerMissing(id.clone()))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use rstest::{fixture, rstest};

    use super::Notifier;
    use crate::{
        config::{ToastConfig, DEFAULT_CONTAINER_ID},
        diagnostics::MockDiagnosticSink,
        error::{ToastError, ToastResult},
        mock::{MockDom, MockFailure, MockNode},
        severity::Severity,
        toast::{ToastPhase, ToastRequest},
    };

    /// Document holding an empty toast container under the default id
    struct Page {
        dom: MockDom,
        container: MockNode,
    }

    impl Page {
        /// Icon and message elements of a toast
        fn parts(&self, toast: &MockNode) -> (MockNode, MockNode) {
            let children = self.dom.children(toast);
            assert_eq!(children.len(), 2, "Toast should hold an icon and a message");
            (children[0], children[1])
        }

        fn message(&self, toast: &MockNode) -> Option<String> {
            let (_, message) = self.parts(toast);
            self.dom.text(&message)
        }
    }

    #[fixture]
    fn page() -> Page {
        let dom = MockDom::new();
        let container = dom.add_container(DEFAULT_CONTAINER_ID);
        Page { dom, container }
    }

    #[rstest]
    #[case::info(Severity::Info, "bg-blue-500", "fa-info-circle")]
    #[case::success(Severity::Success, "bg-green-500", "fa-check-circle")]
    #[case::error(Severity::Error, "bg-red-500", "fa-exclamation-triangle")]
    fn show_should_render_severity_style(
        page: Page,
        #[case] severity: Severity,
        #[case] background: &str,
        #[case] icon: &str,
    ) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());

        let toast = notifier.show(("Saved", severity))?;

        let (icon_node, message_node) = page.parts(toast.node());
        assert_eq!(page.dom.tag(toast.node()), "div");
        assert!(page.dom.has_class(toast.node(), background));
        assert_eq!(page.dom.tag(&icon_node), "i");
        assert_eq!(
            page.dom.classes(&icon_node),
            vec!["fas", icon, "mr-3", "text-xl"]
        );
        assert_eq!(page.dom.tag(&message_node), "span");
        assert_eq!(page.dom.text(&message_node).as_deref(), Some("Saved"));
        Ok(())
    }

    #[rstest]
    fn show_without_severity_should_match_info(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());

        let plain = notifier.show("x")?;
        let info = notifier.show(("x", Severity::Info))?;

        let (plain_icon, _) = page.parts(plain.node());
        let (info_icon, _) = page.parts(info.node());
        assert_eq!(
            page.dom.classes(plain.node()),
            page.dom.classes(info.node())
        );
        assert_eq!(page.dom.classes(&plain_icon), page.dom.classes(&info_icon));
        assert_eq!(page.message(plain.node()), page.message(info.node()));
        Ok(())
    }

    #[test]
    fn show_without_container_should_report_once_and_insert_nothing() {
        let dom = MockDom::new();
        let elements_before = dom.element_count();
        let mut sink = MockDiagnosticSink::new();
        sink.expect_container_missing()
            .withf(|id: &str| id == DEFAULT_CONTAINER_ID)
            .times(1)
            .return_const(());
        let notifier = Notifier::new(dom.clone()).with_sink(sink);

        let result = notifier.show("Lost");

        let Err(ToastError::ContainerMissing(id)) = result else {
            panic!("Expected a missing container error");
        };
        assert_eq!(id, DEFAULT_CONTAINER_ID);
        assert_eq!(dom.element_count(), elements_before);
        assert_eq!(dom.pending_timers(), 0);
        assert_eq!(dom.pending_frames(), 0);
    }

    #[rstest]
    fn toast_should_enter_then_leave_after_display_time(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());

        let toast = notifier.show("Uploaded")?;

        assert_eq!(page.dom.children(&page.container), vec![*toast.node()]);
        assert_eq!(toast.phase(), ToastPhase::Entering);
        assert!(page.dom.has_class(toast.node(), "translate-y-4"));
        assert!(page.dom.has_class(toast.node(), "opacity-0"));

        assert_eq!(page.dom.run_animation_frame(), 1);
        assert_eq!(toast.phase(), ToastPhase::Visible);
        assert!(!page.dom.has_class(toast.node(), "translate-y-4"));
        assert!(!page.dom.has_class(toast.node(), "opacity-0"));

        page.dom.advance(4999);
        assert_eq!(toast.phase(), ToastPhase::Visible);

        page.dom.advance(1);
        assert_eq!(toast.phase(), ToastPhase::Leaving);
        assert!(page.dom.has_class(toast.node(), "opacity-0"));
        assert!(page.dom.is_attached(toast.node()));

        assert!(page.dom.fire_transition_end(toast.node()));
        assert_eq!(toast.phase(), ToastPhase::Removed);
        assert!(!toast.is_active());
        assert!(page.dom.children(&page.container).is_empty());
        assert_eq!(page.dom.pending_timers(), 0);
        Ok(())
    }

    #[rstest]
    fn successive_toasts_should_stack_in_call_order(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());

        let first = notifier.info("first")?;
        let second = notifier.success("second")?;
        let third = notifier.error("third")?;

        let children = page.dom.children(&page.container);
        assert_eq!(children, vec![*first.node(), *second.node(), *third.node()]);
        let messages: Vec<_> = children
            .iter()
            .filter_map(|toast| page.message(toast))
            .collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        Ok(())
    }

    #[rstest]
    fn toasts_should_leave_independently(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());

        let early = notifier.show("early")?;
        page.dom.advance(2000);
        let late = notifier.show("late")?;
        page.dom.run_animation_frame();

        page.dom.advance(3000);
        assert_eq!(early.phase(), ToastPhase::Leaving);
        assert_eq!(late.phase(), ToastPhase::Visible);

        page.dom.fire_transition_end(early.node());
        assert_eq!(page.dom.children(&page.container), vec![*late.node()]);
        Ok(())
    }

    #[rstest]
    #[case("<b>bold</b>")]
    #[case("<img src=x onerror=alert(1)>")]
    fn markup_should_be_shown_as_literal_text(
        page: Page,
        #[case] message: &str,
    ) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());

        let toast = notifier.show(message)?;

        let (_, body) = page.parts(toast.node());
        assert_eq!(page.dom.text(&body).as_deref(), Some(message));
        assert_eq!(page.dom.inner_html(&body), None);
        Ok(())
    }

    #[rstest]
    fn trusted_html_should_be_parsed_as_markup(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());

        let toast = notifier.show_html("<b>bold</b>", Severity::Success)?;

        let (_, body) = page.parts(toast.node());
        assert!(page.dom.has_class(toast.node(), "bg-green-500"));
        assert_eq!(page.dom.inner_html(&body).as_deref(), Some("<b>bold</b>"));
        Ok(())
    }

    #[rstest]
    fn dismiss_should_detach_and_cancel_timers(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());
        let toast = notifier.show("Going away")?;

        toast.dismiss();

        assert_eq!(toast.phase(), ToastPhase::Removed);
        assert!(page.dom.children(&page.container).is_empty());
        assert_eq!(page.dom.pending_timers(), 0);

        page.dom.run_animation_frame();
        page.dom.advance(10_000);
        toast.dismiss();
        assert_eq!(toast.phase(), ToastPhase::Removed);
        assert!(page.dom.has_class(toast.node(), "opacity-0"));
        Ok(())
    }

    #[rstest]
    fn dismiss_while_leaving_should_cancel_fallback(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());
        let toast = notifier.show("Fading")?;
        page.dom.run_animation_frame();
        page.dom.advance(5000);
        assert_eq!(page.dom.pending_timers(), 1);

        toast.clone().dismiss();

        assert!(!toast.is_active());
        assert_eq!(page.dom.pending_timers(), 0);
        Ok(())
    }

    #[rstest]
    fn fallback_should_remove_toast_when_transition_never_ends(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());
        let toast = notifier.show("Stuck")?;
        page.dom.run_animation_frame();

        page.dom.advance(5000);
        page.dom.advance(599);
        assert!(page.dom.is_attached(toast.node()));

        page.dom.advance(1);
        assert_eq!(toast.phase(), ToastPhase::Removed);
        assert!(page.dom.children(&page.container).is_empty());

        page.dom.fire_transition_end(toast.node());
        assert_eq!(toast.phase(), ToastPhase::Removed);
        Ok(())
    }

    #[rstest]
    fn disabled_fallback_should_wait_for_transition(page: Page) -> ToastResult<()> {
        let config = ToastConfig {
            exit_fallback_ms: None,
            ..ToastConfig::default()
        };
        let notifier = Notifier::with_config(page.dom.clone(), config);
        let toast = notifier.show("Stuck")?;
        page.dom.run_animation_frame();

        page.dom.advance(60_000);

        assert_eq!(toast.phase(), ToastPhase::Leaving);
        assert!(page.dom.is_attached(toast.node()));

        toast.dismiss();
        assert!(page.dom.children(&page.container).is_empty());
        Ok(())
    }

    #[rstest]
    fn configured_display_time_should_be_honoured(page: Page) -> ToastResult<()> {
        let config = ToastConfig {
            display_ms: 1500,
            ..ToastConfig::default()
        };
        let notifier = Notifier::with_config(page.dom.clone(), config);
        let toast = notifier.show(ToastRequest::new("Quick"))?;
        page.dom.run_animation_frame();

        page.dom.advance(1500);

        assert_eq!(toast.phase(), ToastPhase::Leaving);
        Ok(())
    }

    #[test]
    fn injected_container_should_skip_lookup() -> ToastResult<()> {
        let dom = MockDom::new();
        let container = dom.add_container("elsewhere");
        let mut sink = MockDiagnosticSink::new();
        sink.expect_container_missing().times(0);
        let notifier = Notifier::new(dom.clone())
            .with_container(container)
            .with_sink(sink);

        let toast = notifier.show("Injected")?;

        assert_eq!(dom.parent(toast.node()), Some(container));
        Ok(())
    }

    #[test]
    fn configured_container_id_should_be_looked_up() -> ToastResult<()> {
        let dom = MockDom::new();
        let container = dom.add_container("alerts");
        let config = ToastConfig {
            container_id: "alerts".to_owned(),
            ..ToastConfig::default()
        };
        let notifier = Notifier::with_config(dom.clone(), config);

        let toast = notifier.show("Found")?;

        assert_eq!(dom.parent(toast.node()), Some(container));
        Ok(())
    }

    #[rstest]
    fn empty_message_should_be_accepted(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());

        let toast = notifier.show("")?;

        assert_eq!(page.message(toast.node()).as_deref(), Some(""));
        Ok(())
    }

    #[rstest]
    #[case::frame(MockFailure::AnimationFrame)]
    #[case::display_timer(MockFailure::Timer)]
    fn refused_scheduling_should_roll_back_the_toast(
        page: Page,
        #[case] failure: MockFailure,
    ) {
        page.dom.fail_next(failure);
        let notifier = Notifier::new(page.dom.clone());

        let result = notifier.show("Never shown");

        assert!(matches!(result, Err(ToastError::Dom(_))));
        assert!(page.dom.children(&page.container).is_empty());
        assert_eq!(page.dom.pending_timers(), 0);

        page.dom.run_animation_frame();
        page.dom.advance(10_000);
        assert!(page.dom.children(&page.container).is_empty());
    }

    #[rstest]
    fn refused_transition_listener_should_remove_at_exit(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());
        let toast = notifier.show("Fading")?;
        page.dom.run_animation_frame();
        page.dom.fail_next(MockFailure::TransitionListener);

        page.dom.advance(5000);

        assert_eq!(toast.phase(), ToastPhase::Removed);
        assert!(page.dom.children(&page.container).is_empty());
        assert_eq!(page.dom.pending_timers(), 0);
        Ok(())
    }

    #[rstest]
    fn refused_fallback_timer_should_remove_at_exit(page: Page) -> ToastResult<()> {
        let notifier = Notifier::new(page.dom.clone());
        let toast = notifier.show("Fading")?;
        page.dom.run_animation_frame();
        page.dom.fail_next(MockFailure::Timer);

        page.dom.advance(5000);

        assert_eq!(toast.phase(), ToastPhase::Removed);
        assert!(page.dom.children(&page.container).is_empty());
        assert_eq!(page.dom.transition_listeners(), 0);
        assert_eq!(page.dom.pending_timers(), 0);
        Ok(())
    }
}
