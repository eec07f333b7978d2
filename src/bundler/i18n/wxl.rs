//! WiX localization document rendering.

use crate::bundler::error::Result;
use handlebars::Handlebars;
use serde::Serialize;

const WXL_TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<WixLocalization xmlns="http://schemas.microsoft.com/wix/2006/localization" Codepage="utf-8"{{#if culture}} Culture="{{culture}}"{{/if}}>
{{#each strings~}}
  <String Id="{{this.id}}"{{#if this.overridable}} Overridable="yes"{{/if}}>{{this.value}}</String>
{{/each~}}
</WixLocalization>
"#;

#[derive(Serialize)]
struct WxlString<'a> {
    id: &'a str,
    value: &'a str,
    overridable: bool,
}

#[derive(Serialize)]
struct WxlDocument<'a> {
    culture: Option<&'a str>,
    strings: Vec<WxlString<'a>>,
}

/// Renders a localization document.
///
/// `culture` is `None` for the setup's default language. Every string is
/// marked overridable when `overridable` is set.
pub fn render(culture: Option<&str>, entries: &[(String, String)], overridable: bool) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(escape_xml);
    handlebars.register_template_string("wxl", WXL_TEMPLATE)?;

    let document = WxlDocument {
        culture,
        strings: entries
            .iter()
            .map(|(id, value)| WxlString {
                id,
                value,
                overridable,
            })
            .collect(),
    };

    Ok(handlebars.render("wxl", &document)?)
}

/// Escapes the five XML special characters.
pub fn escape_xml(data: &str) -> String {
    let mut escaped = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_language_document() {
        let doc = render(None, &entries(&[("a", "1"), ("b", "2")]), true).unwrap();
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("Codepage=\"utf-8\""));
        assert!(!doc.contains("Culture="));
        assert!(doc.contains(r#"<String Id="a" Overridable="yes">1</String>"#));
        assert!(doc.contains(r#"<String Id="b" Overridable="yes">2</String>"#));
        assert!(doc.find("Id=\"a\"").unwrap() < doc.find("Id=\"b\"").unwrap());
    }

    #[test]
    fn test_other_language_document() {
        let doc = render(Some("de-DE"), &entries(&[("greeting", "Hallo")]), false).unwrap();
        assert!(doc.contains(r#"Culture="de-DE""#));
        assert!(doc.contains(r#"<String Id="greeting">Hallo</String>"#));
        assert!(!doc.contains("Overridable"));
    }

    #[test]
    fn test_values_are_escaped() {
        let doc = render(None, &entries(&[("k", "Tom & \"Jerry\" <3")]), false).unwrap();
        assert!(doc.contains("Tom &amp; &quot;Jerry&quot; &lt;3"));
    }

    #[test]
    fn test_empty_table() {
        let doc = render(None, &[], false).unwrap();
        assert_eq!(doc.matches("<String").count(), 0);
        assert!(doc.contains("</WixLocalization>"));
    }
}
