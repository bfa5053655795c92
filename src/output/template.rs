// Placeholder substitution for the page template
//
// Placeholders are written `<%= name %>`. Only bound names are replaced;
// everything else, including unknown placeholders, passes through untouched.
// There are no expressions, conditionals or loops.

use crate::error::{Error, Result};
use std::path::Path;

const OPEN: &str = "<%=";
const CLOSE: &str = "%>";

const IFRAME_PAGE: &str = include_str!("../../templates/iframe.ejs");

/// Page template loaded once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    /// Read the template asset
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| Error::template_missing(path, e))?;
        Ok(Self { text })
    }

    /// Full-window canvas page bundled with the crate
    pub fn builtin() -> Self {
        Self::from_text(IFRAME_PAGE)
    }

    /// Wrap template text that is already in memory
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render with the given `(name, value)` bindings
    pub fn render(&self, bindings: &[(&str, &str)]) -> String {
        render(&self.text, bindings)
    }
}

/// Replace every bound placeholder in `template` with its value.
///
/// Single left-to-right pass: substituted values are never rescanned.
pub fn render(template: &str, bindings: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];

        if let Some((name, consumed)) = placeholder(after_open) {
            if let Some(&(_, value)) = bindings.iter().find(|(n, _)| *n == name) {
                out.push_str(&rest[..start]);
                out.push_str(value);
                rest = &after_open[consumed..];
                continue;
            }
        }

        out.push_str(&rest[..start + OPEN.len()]);
        rest = after_open;
    }

    out.push_str(rest);
    out
}

/// Parse ` name %>` following an opening marker.
///
/// Returns the name and the number of bytes consumed through the closing marker.
fn placeholder(s: &str) -> Option<(&str, usize)> {
    let body = s.trim_start();
    let leading = s.len() - body.len();

    let close = body.find(CLOSE)?;
    let name = body[..close].trim_end();
    if name.is_empty() || name.contains(char::is_whitespace) || name.contains(OPEN) {
        return None;
    }

    Some((name, leading + close + CLOSE.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const IFRAME: &str = "<html><head><title><%= title %></title></head>\n<body><script type=\"module\" src=\"<%= url %>\"></script></body></html>";

    #[test]
    fn test_render_title_and_url() {
        let html = render(IFRAME, &[("title", "Foo"), ("url", "./a.ts")]);
        assert_eq!(
            html,
            "<html><head><title>Foo</title></head>\n<body><script type=\"module\" src=\"./a.ts\"></script></body></html>"
        );
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let html = render("<%= title %>|<%=title%>|<%=  title\t%>", &[("title", "T")]);
        assert_eq!(html, "T|T|T");
    }

    #[test]
    fn test_unbound_placeholders_untouched() {
        let text = "<%= title %> <%= author %> <% code %> <%= %>";
        let html = render(text, &[("title", "T")]);
        assert_eq!(html, "T <%= author %> <% code %> <%= %>");
    }

    #[test]
    fn test_inner_whitespace_is_not_a_name() {
        let text = "<%= ti tle %>";
        assert_eq!(render(text, &[("title", "T")]), text);
    }

    #[test]
    fn test_unterminated_placeholder() {
        let text = "before <%= title";
        assert_eq!(render(text, &[("title", "T")]), text);
    }

    #[test]
    fn test_nested_opening_marker() {
        let html = render("<%= a <%= title %>", &[("title", "T")]);
        assert_eq!(html, "<%= a T");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let html = render("<%= title %>", &[("title", "<%= url %>"), ("url", "U")]);
        assert_eq!(html, "<%= url %>");
    }

    #[test]
    fn test_render_is_idempotent() {
        let bindings = [("title", "Foo"), ("url", "./a.ts")];
        let once = render(IFRAME, &bindings);
        assert_eq!(render(&once, &bindings), once);
    }

    #[test]
    fn test_non_ascii_text_preserved() {
        let html = render("标题：<%= title %>！", &[("title", "多相机")]);
        assert_eq!(html, "标题：多相机！");
    }

    #[test]
    fn test_builtin_template_has_placeholders() {
        let template = Template::builtin();
        let html = template.render(&[("title", "PBR Base"), ("url", "./pbr-base.ts")]);
        assert!(html.contains("<title>PBR Base</title>"));
        assert!(html.contains("src=\"./pbr-base.ts\""));
        assert!(!html.contains("<%="));
    }

    #[test]
    fn test_load_missing_template() {
        let dir = TempDir::new().unwrap();
        let err = Template::load(&dir.path().join("iframe.ejs")).unwrap_err();
        assert!(matches!(err, Error::TemplateMissing { .. }));
    }

    #[test]
    fn test_load_and_render() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("iframe.ejs");
        std::fs::write(&path, IFRAME).unwrap();

        let template = Template::load(&path).unwrap();
        assert_eq!(template.text(), IFRAME);
        assert!(template.render(&[("title", "Bar")]).contains("<title>Bar</title>"));
    }
}
