use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, unescape_with};

/// Longest entity reference we try to resolve, `&` and `;` included.
/// The longest HTML5 named entity (`&CounterClockwiseContourIntegral;`) is 33 bytes.
const MAX_ENTITY_LEN: usize = 40;

/// Decodes HTML character references in feed-provided text.
///
/// Named HTML5 entities (`&amp;`, `&hellip;`, `&eacute;`) and numeric references
/// (`&#39;`, `&#x2014;`) are replaced by the characters they stand for.
/// Anything that is not a well-formed, known reference (a bare `&`, an unknown
/// name, an unterminated reference) is kept literally, so titles such as
/// `AT&T` survive untouched.
///
/// Returns `Cow::Borrowed` when the input contains no `&`.
///
/// # Examples
///
/// ```
/// use feedhook::util::unescape_html;
///
/// assert_eq!(unescape_html("Tom &amp; Jerry"), "Tom & Jerry");
/// assert_eq!(unescape_html("It&#39;s &ldquo;fine&rdquo;"), "It's \u{201c}fine\u{201d}");
/// assert_eq!(unescape_html("AT&T"), "AT&T");
/// ```
pub fn unescape_html(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];

        let reference = candidate
            .char_indices()
            .take_while(|&(i, _)| i < MAX_ENTITY_LEN)
            .find(|&(_, c)| c == ';')
            .map(|(semi, _)| &candidate[..=semi]);

        match reference.and_then(|r| resolve_reference(r).map(|decoded| (r, decoded))) {
            Some((raw, decoded)) => {
                out.push_str(&decoded);
                rest = &candidate[raw.len()..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Resolves a single `&...;` reference, or `None` if it is not a known one.
fn resolve_reference(reference: &str) -> Option<String> {
    // Reject anything that would make the decoder look at a second reference.
    if reference[1..].contains('&') {
        return None;
    }
    unescape_with(reference, resolve_html5_entity)
        .ok()
        .map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        let result = unescape_html("Plain title");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Plain title");
    }

    #[test]
    fn test_xml_builtins() {
        assert_eq!(
            unescape_html("&lt;b&gt; &quot;x&quot; &apos;y&apos; &amp;"),
            "<b> \"x\" 'y' &"
        );
    }

    #[test]
    fn test_html5_named_entities() {
        assert_eq!(unescape_html("Caf&eacute; &hellip;"), "Café …");
        assert_eq!(unescape_html("a&nbsp;b"), "a\u{a0}b");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(unescape_html("It&#39;s"), "It's");
        assert_eq!(unescape_html("dash &#x2014; here"), "dash \u{2014} here");
    }

    #[test]
    fn test_bare_ampersand_kept() {
        assert_eq!(unescape_html("AT&T"), "AT&T");
        assert_eq!(unescape_html("Q&A; part 2"), "Q&A; part 2");
        assert_eq!(unescape_html("trailing &"), "trailing &");
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(unescape_html("&notanentity; &amp;"), "&notanentity; &");
    }

    #[test]
    fn test_double_escaped_decodes_once() {
        assert_eq!(unescape_html("&amp;amp;"), "&amp;");
    }

    #[test]
    fn test_ampersand_inside_candidate() {
        assert_eq!(unescape_html("&x &amp;"), "&x &");
    }

    #[test]
    fn test_multibyte_text_around_entities() {
        assert_eq!(unescape_html("日本&amp;語"), "日本&語");
    }
}
