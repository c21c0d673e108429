use indoc::indoc;

use crate::{
    dom::Dom,
    error::{ToastError, ToastResult},
};

/// Attribute tagging injected style elements with the name of their [StyleSheet]
pub const STYLE_SHEET_ATTRIBUTE: &str = "data-style-sheet";

/// Rules the page's components share: gradient header, card hover lift, loading spinner, status
/// pulse and the tab button/content toggles
pub const SHARED_STYLES: &str = indoc! {"
    .gradient-bg { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }
    .card-hover { transition: all 0.3s ease; }
    .card-hover:hover { transform: translateY(-5px); box-shadow: 0 20px 25px -5px rgba(0, 0, 0, 0.1), 0 10px 10px -5px rgba(0, 0, 0, 0.04); }
    .loading-spinner { animation: spin 1s linear infinite; }
    @keyframes spin { from { transform: rotate(0deg); } to { transform: rotate(360deg); } }
    .status-indicator { animation: pulse 2s infinite; }
    .tab-button { padding: 0.75rem 1.5rem; border-bottom: 3px solid transparent; cursor: pointer; transition: all 0.3s ease; font-weight: 500; color: #6b7280; }
    .tab-button.active { border-bottom-color: #6366f1; color: #6366f1; background-color: #f9fafb; }
    .tab-content { display: none; }
    .tab-content.active { display: block; animation: fadeIn 0.5s; }
    @keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }
"};

/// Style sheet holding [SHARED_STYLES]
pub const SHARED_STYLE_SHEET: StyleSheet = StyleSheet::new("shared", SHARED_STYLES);

/// Outcome of [StyleSheet::inject]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum StyleInjection {
    Injected,
    AlreadyPresent,
}

/// A named block of rules attached to the page's style root at most once
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct StyleSheet {
    name: &'static str,
    rules: &'static str,
}

impl StyleSheet {
    pub const fn new(name: &'static str, rules: &'static str) -> Self {
        Self { name, rules }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn rules(&self) -> &'static str {
        self.rules
    }

    /// Selector matching the style element of this sheet once injected
    pub fn selector(&self) -> String {
        format!("style[{STYLE_SHEET_ATTRIBUTE}=\"{}\"]", self.name)
    }

    /// Append a `<style>` element holding the rules to the page's style root, unless an element
    /// tagged with this sheet's name is already in the document.
    /// # Errors
    /// This function will return an error if the page has no style root or if any DOM operation
    /// creating and appending the style element fails
    pub fn inject<D: Dom>(&self, dom: &D) -> ToastResult<StyleInjection> {
        let root = dom.style_root().ok_or(ToastError::MissingStyleRoot)?;
        if dom.query_selector(&self.selector())?.is_some() {
            log::debug!("Style sheet `{}` already present", self.name);
            return Ok(StyleInjection::AlreadyPresent);
        }
        let style = dom.create_element("style")?;
        dom.set_attribute(&style, STYLE_SHEET_ATTRIBUTE, self.name)?;
        dom.set_text_content(&style, self.rules);
        dom.append_child(&root, &style)?;
        log::debug!("Injected style sheet `{}`", self.name);
        Ok(StyleInjection::Injected)
    }
}

/// Inject [SHARED_STYLES] into the page. Safe to call more than once per page.
/// # Errors
/// This function will return an error if the injection fails, see [StyleSheet::inject]
pub fn inject_shared_styles<D: Dom>(dom: &D) -> ToastResult<StyleInjection> {
    SHARED_STYLE_SHEET.inject(dom)
}
