#![warn(clippy::cloned_instead_of_copied)]
#![warn(clippy::cognitive_complexity)]
#![warn(clippy::empty_structs_with_brackets)]
#![warn(clippy::equatable_if_let)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::expect_used)]
#![warn(clippy::fn_params_excessive_bools)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::manual_let_else)]
#![warn(clippy::manual_string_new)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::needless_collect)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::panic)]
#![warn(clippy::print_stdout)]
#![warn(clippy::str_to_string)]
#![warn(clippy::string_to_string)]
#![warn(clippy::too_many_lines)]
#![warn(clippy::uninlined_format_args)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::use_self)]
#![warn(clippy::wildcard_imports)]

//! Transient page notifications ("toasts") and the shared style block that the page scripts rely
//! on. Everything here talks to the page through the [Dom] trait so the same logic runs against
//! the browser DOM and against the in-memory [mock] document used by the tests.

pub mod config;
pub mod diagnostics;
pub mod dom;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod notifier;
pub mod severity;
pub mod styles;
pub mod toast;

pub use config::ToastConfig;
pub use diagnostics::{DiagnosticSink, LogSink};
pub use dom::Dom;
pub use error::{ToastError, ToastResult};
pub use notifier::Notifier;
pub use severity::{Severity, SeverityStyle};
pub use styles::{
    inject_shared_styles, StyleInjection, StyleSheet, SHARED_STYLES, SHARED_STYLE_SHEET,
};
pub use toast::{MessageFormat, ToastHandle, ToastPhase, ToastRequest};
