//! Minifier strategies.
//!
//! The pipeline treats minification as an opaque `&str -> String` step. Each
//! asset kind gets its own [`Minifier`]; [`Minifiers::standard`] wires the
//! default implementations backed by `lightningcss`, `minify-js` and
//! `minify-html`. Any matching closure is also a [`Minifier`].

use minify_js::{Session, TopLevelMode};

use crate::error::MinifierError;
use crate::resource::Classification;

/// A stateless minification strategy
pub trait Minifier: Send + Sync {
    fn minify(&self, input: &str) -> Result<String, MinifierError>;
}

impl<F> Minifier for F
where
    F: Fn(&str) -> Result<String, MinifierError> + Send + Sync,
{
    fn minify(&self, input: &str) -> Result<String, MinifierError> {
        self(input)
    }
}

/// CSS minifier backed by `lightningcss`
#[derive(Debug, Default, Clone, Copy)]
pub struct CssMinifier;

impl Minifier for CssMinifier {
    fn minify(&self, input: &str) -> Result<String, MinifierError> {
        use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

        let mut style_sheet = StyleSheet::parse(input, ParserOptions::default())
            .map_err(|e| MinifierError::new(e.to_string()))?;

        style_sheet
            .minify(MinifyOptions::default())
            .map_err(|e| MinifierError::new(e.to_string()))?;

        let result = style_sheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| MinifierError::new(e.to_string()))?;

        Ok(result.code)
    }
}

/// JavaScript minifier backed by `minify-js`
#[derive(Debug, Default, Clone, Copy)]
pub struct JsMinifier;

impl Minifier for JsMinifier {
    fn minify(&self, input: &str) -> Result<String, MinifierError> {
        let session = Session::new();
        let mut output = Vec::new();

        minify_js::minify(&session, TopLevelMode::Global, input.as_bytes(), &mut output)
            .map_err(|e| MinifierError::new(e.to_string()))?;

        String::from_utf8(output).map_err(|e| MinifierError::new(e.to_string()))
    }
}

/// HTML minifier backed by `minify-html`.
///
/// Inline `<script>` and `<style>` content is left alone; only markup
/// whitespace and optional syntax are removed.
#[derive(Clone)]
pub struct HtmlMinifier {
    cfg: minify_html::Cfg,
}

impl HtmlMinifier {
    pub fn new() -> Self {
        Self {
            cfg: minify_html::Cfg::spec_compliant(),
        }
    }
}

impl Default for HtmlMinifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HtmlMinifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlMinifier").finish_non_exhaustive()
    }
}

impl Minifier for HtmlMinifier {
    fn minify(&self, input: &str) -> Result<String, MinifierError> {
        let output = minify_html::minify(input.as_bytes(), &self.cfg);
        String::from_utf8(output).map_err(|e| MinifierError::new(e.to_string()))
    }
}

/// One strategy per minifiable asset kind
pub struct Minifiers {
    pub css: Box<dyn Minifier>,
    pub js: Box<dyn Minifier>,
    pub html: Box<dyn Minifier>,
}

impl Minifiers {
    pub fn new(
        css: impl Minifier + 'static,
        js: impl Minifier + 'static,
        html: impl Minifier + 'static,
    ) -> Self {
        Self {
            css: Box::new(css),
            js: Box::new(js),
            html: Box::new(html),
        }
    }

    /// The default strategies
    pub fn standard() -> Self {
        Self::new(CssMinifier, JsMinifier, HtmlMinifier::new())
    }

    /// Strategy for `classification`, `None` for kinds that are not minified
    pub fn for_classification(&self, classification: Classification) -> Option<&dyn Minifier> {
        match classification {
            Classification::Css => Some(self.css.as_ref()),
            Classification::Js => Some(self.js.as_ref()),
            Classification::Html => Some(self.html.as_ref()),
            Classification::Other | Classification::Excluded => None,
        }
    }
}

impl Default for Minifiers {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for Minifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Minifiers").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(input: &str) -> Result<String, MinifierError> {
        Ok(input.to_string())
    }

    fn uppercase(input: &str) -> Result<String, MinifierError> {
        Ok(input.to_uppercase())
    }

    // ==================== closure strategies ====================

    #[test]
    fn test_closure_is_minifier() {
        let minifier = |input: &str| Ok::<_, MinifierError>(input.trim().to_string());
        assert_eq!(minifier.minify("  a  ").unwrap(), "a");
    }

    #[test]
    fn test_for_classification() {
        let minifiers = Minifiers::new(identity, uppercase, identity);

        let js = minifiers.for_classification(Classification::Js).unwrap();
        assert_eq!(js.minify("var a").unwrap(), "VAR A");

        assert!(minifiers.for_classification(Classification::Css).is_some());
        assert!(minifiers.for_classification(Classification::Html).is_some());
        assert!(minifiers.for_classification(Classification::Other).is_none());
        assert!(minifiers.for_classification(Classification::Excluded).is_none());
    }

    #[test]
    fn test_minifier_error_message() {
        let failing = |_: &str| Err::<String, _>(MinifierError::new("boom"));
        let err = failing.minify("x").unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.message(), "boom");
    }

    // ==================== default strategies ====================

    #[test]
    fn test_css_minifier() {
        const INPUT: &str = concat!(
            ".foo {\n",          //
            "  color: black;\n", //
            "}\n"
        );

        let result = CssMinifier.minify(INPUT).unwrap();

        assert!(result.contains(".foo"));
        assert!(result.contains("color:"));
        assert!(!result.contains('\n'));
        assert!(result.len() < INPUT.len());
    }

    #[test]
    fn test_js_minifier() {
        const INPUT: &str = concat!(
            "function foo() {\n",        //
            "  console.log(\"bar\");\n", //
            "}\n"
        );

        let result = JsMinifier.minify(INPUT).unwrap();

        assert!(result.contains("foo"));
        assert!(result.contains("bar"));
        assert!(!result.contains('\n'));
        assert!(result.len() < INPUT.len());
    }

    #[test]
    fn test_js_minifier_syntax_error() {
        assert!(JsMinifier.minify("function (").is_err());
    }

    #[test]
    fn test_html_minifier() {
        const INPUT: &str = concat!(
            "<html>\n",                                  //
            "  <head>\n",                                //
            "    <link rel=\"stylesheet\" href=\"a.css\">\n", //
            "  </head>\n",                               //
            "  <body>\n",                                //
            "    <div>baz</div>\n",                      //
            "  </body>\n",                               //
            "</html>\n"
        );

        let result = HtmlMinifier::new().minify(INPUT).unwrap();

        assert!(result.contains("a.css"));
        assert!(result.contains("<div>baz</div>"));
        assert!(!result.contains(" <div>baz</div>"));
        assert!(result.len() < INPUT.len());
    }

    #[test]
    fn test_html_minifier_debug() {
        assert_eq!(format!("{:?}", HtmlMinifier::default()), "HtmlMinifier { .. }");
        assert_eq!(format!("{:?}", Minifiers::standard()), "Minifiers { .. }");
    }
}
