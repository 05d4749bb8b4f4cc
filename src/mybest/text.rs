//! Text normalization for extracted DOM content.

use scraper::ElementRef;

/// Elements whose content never counts as visible text.
const NOISE_TAGS: &[&str] = &["style", "script"];

/// Returns the element's text with `style`/`script` content removed, trimmed.
///
/// The source tree is only read; skipped subtrees are simply not visited.
pub fn clean_text(element: ElementRef<'_>) -> String {
    text_without(element, NOISE_TAGS).trim().to_string()
}

/// Like [`clean_text`], for an element that may be missing.
pub fn clean_text_opt(element: Option<ElementRef<'_>>) -> String {
    element.map(clean_text).unwrap_or_default()
}

/// Concatenates descendant text, skipping any subtree rooted at one of `skip`.
pub fn text_without(element: ElementRef<'_>, skip: &[&str]) -> String {
    let mut out = String::new();
    collect_text(element, skip, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, skip: &[&str], out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !skip.contains(&child_element.value().name()) {
                collect_text(child_element, skip, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Collapses runs of whitespace (including newlines) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-cases the first letter of every word.
///
/// Callers lower-case first, so `"PERALATAN dapur"` ends up `"Peralatan Dapur"`.
/// Any character that is not alphanumeric or `_` starts a new word, hence
/// `"t-shirt"` becomes `"T-Shirt"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = is_word_separator(c);
    }
    out
}

fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        !(c.is_ascii_alphanumeric() || c == '_')
    } else {
        c.is_whitespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(document: &'a Html, selector: &str) -> ElementRef<'a> {
        document.select(&Selector::parse(selector).unwrap()).next().unwrap()
    }

    #[test]
    fn test_clean_text_strips_style_and_script() {
        let document = Html::parse_document(
            r#"<div id="t">  Mudah <style>.a{color:red}</style>dibersihkan<script>var x = 1;</script>  </div>"#,
        );
        assert_eq!(clean_text(first(&document, "#t")), "Mudah dibersihkan");
    }

    #[test]
    fn test_clean_text_leaves_source_untouched() {
        let document = Html::parse_document(r#"<p id="t">A<style>.b{}</style></p>"#);
        let element = first(&document, "#t");
        let _ = clean_text(element);
        assert!(element.inner_html().contains("<style>"));
    }

    #[test]
    fn test_clean_text_nested() {
        let document =
            Html::parse_document(r#"<div id="t"><span><b>No.</b> 3</span><script>x</script></div>"#);
        assert_eq!(clean_text(first(&document, "#t")), "No. 3");
    }

    #[test]
    fn test_clean_text_opt_missing() {
        assert_eq!(clean_text_opt(None), "");
    }

    #[test]
    fn test_text_without_custom_skip() {
        let document =
            Html::parse_document(r#"<div id="t"><i>icon</i>Dapur<svg><text>x</text></svg></div>"#);
        assert_eq!(text_without(first(&document, "#t"), &["i", "svg"]), "Dapur");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Rumah\n   Tangga  "), "Rumah Tangga");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("peralatan dapur"), "Peralatan Dapur");
        assert_eq!(title_case("t-shirt pria"), "T-Shirt Pria");
        assert_eq!(title_case("category 42"), "Category 42");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_after_lowercase() {
        assert_eq!(title_case(&"PERAWATAN TUBUH".to_lowercase()), "Perawatan Tubuh");
    }
}
