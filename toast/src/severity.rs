use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

use crate::error::{ToastError, ToastResult};

/// Visual weight of a toast. The set is closed, callers passing a free-form name must go through
/// [Severity::parse] which rejects anything outside of the three known entries.
#[derive(
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    AsRefStr,
    PartialEq,
    Eq,
    Debug,
    Default,
    Copy,
    Clone,
)]
pub enum Severity {
    #[default]
    #[serde(rename = "info")]
    #[strum(serialize = "info")]
    Info,
    #[serde(rename = "success")]
    #[strum(serialize = "success")]
    Success,
    #[serde(rename = "error")]
    #[strum(serialize = "error")]
    Error,
}

/// Icon glyph and background band attached to a toast of a given [Severity]. Both are class names
/// from the page's icon font and utility CSS frameworks.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct SeverityStyle {
    pub icon: &'static str,
    pub background: &'static str,
}

impl Severity {
    /// Parse a severity name as passed by page scripts
    /// # Errors
    /// This function will return an error if the `name` is not one of `info`, `success` or `error`
    pub fn parse(name: &str) -> ToastResult<Self> {
        Self::from_str(name).map_err(|_| ToastError::UnknownSeverity(name.to_owned()))
    }

    /// Parse an optional severity name, falling back to [Severity::Info] when absent
    /// # Errors
    /// This function will return an error if a name is provided but is not a known severity
    pub fn parse_or_default(name: Option<&str>) -> ToastResult<Self> {
        name.map_or_else(|| Ok(Self::default()), Self::parse)
    }

    pub const fn style(&self) -> SeverityStyle {
        match self {
            Self::Info => SeverityStyle {
                icon: "fa-info-circle",
                background: "bg-blue-500",
            },
            Self::Success => SeverityStyle {
                icon: "fa-check-circle",
                background: "bg-green-500",
            },
            Self::Error => SeverityStyle {
                icon: "fa-exclamation-triangle",
                background: "bg-red-500",
            },
        }
    }

    pub const fn icon(&self) -> &'static str {
        self.style().icon
    }

    pub const fn background(&self) -> &'static str {
        self.style().background
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::Severity;
    use crate::error::ToastError;

    #[rstest]
    #[case::info(Severity::Info, "fa-info-circle", "bg-blue-500")]
    #[case::success(Severity::Success, "fa-check-circle", "bg-green-500")]
    #[case::error(Severity::Error, "fa-exclamation-triangle", "bg-red-500")]
    fn style_should_pair_icon_and_background(
        #[case] severity: Severity,
        #[case] icon: &str,
        #[case] background: &str,
    ) {
        let style = severity.style();

        assert_eq!(style.icon, icon);
        assert_eq!(style.background, background);
        assert_eq!(severity.icon(), icon);
        assert_eq!(severity.background(), background);
    }

    #[rstest]
    #[case("info", Severity::Info)]
    #[case("success", Severity::Success)]
    #[case("error", Severity::Error)]
    fn parse_should_accept_known_names(#[case] name: &str, #[case] expected: Severity) {
        let severity = Severity::parse(name).expect("Known severity failed to parse");

        assert_eq!(severity, expected);
        assert_eq!(severity.as_ref(), name);
    }

    #[rstest]
    #[case("warning")]
    #[case("Info")]
    #[case("")]
    fn parse_should_reject_unknown_names(#[case] name: &str) {
        let Err(ToastError::UnknownSeverity(rejected)) = Severity::parse(name) else {
            panic!("Expected `{name}` to be rejected");
        };

        assert_eq!(rejected, name);
    }

    #[test]
    fn parse_or_default_should_fall_back_to_info() {
        let severity = Severity::parse_or_default(None).expect("Default severity failed");

        assert_eq!(severity, Severity::Info);
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn map_should_hold_exactly_three_distinct_entries() {
        let styles: Vec<_> = Severity::iter().map(|s| s.style()).collect();

        assert_eq!(styles.len(), 3);
        assert!(styles.iter().enumerate().all(|(i, a)| styles
            .iter()
            .skip(i + 1)
            .all(|b| a.icon != b.icon && a.background != b.background)));
    }

    #[test]
    fn serde_should_use_lowercase_names() -> Result<(), serde_json::Error> {
        let severity: Severity = serde_json::from_str("\"success\"")?;

        assert_eq!(severity, Severity::Success);
        assert_eq!(serde_json::to_string(&Severity::Error)?, "\"error\"");
        Ok(())
    }
}
