//! Text redaction helpers.
//!
//! Password values are replaced by [`PASSWORD_MARKER`] wherever a snapshot could carry them:
//! field digests, `value` attributes of password inputs in serialized markup, and the same
//! inputs nested in `<iframe srcdoc>` documents.

use once_cell::sync::Lazy;
use page_adapter::ElementInfo;
use regex::{Captures, Regex};

pub const PASSWORD_MARKER: &str = "[PASSWORD]";

static INPUT_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<input(?:[\s/](?:[^>"']|"[^"]*(?:"|$)|'[^']*(?:'|$))*)?(?:>|$)"#).unwrap()
});
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"?|'([^']*)'?|([^\s"'>]+)))?"#).unwrap()
});
static SRCDOC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([\s/]srcdoc\s*=\s*)(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|(amp|lt|gt|quot|apos));").unwrap()
});

/// Value as reported in a field digest.
pub fn field_value(info: &ElementInfo) -> Option<String> {
    if info.is_password() {
        return Some(PASSWORD_MARKER.to_string());
    }
    if info.value.is_empty() {
        None
    } else {
        Some(info.value.clone())
    }
}

/// First `max` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Rewrites the `value` attribute of every `<input type="password">` tag, including tags
/// inside entity-encoded `srcdoc` documents.
pub fn scrub_password_values(markup: &str) -> String {
    let framed = SRCDOC_RE.replace_all(markup, |caps: &Captures| scrub_srcdoc(caps));
    INPUT_TAG_RE
        .replace_all(&framed, |caps: &Captures| redact_input_tag(&caps[0]))
        .into_owned()
}

fn scrub_srcdoc(caps: &Captures) -> String {
    let (body, quote) = match (caps.get(2), caps.get(3)) {
        (Some(body), _) => (body.as_str(), '"'),
        (None, Some(body)) => (body.as_str(), '\''),
        (None, None) => return caps[0].to_string(),
    };
    let decoded = decode_entities(body);
    let scrubbed = scrub_password_values(&decoded);
    if scrubbed == decoded {
        return caps[0].to_string();
    }
    format!(
        "{}{quote}{}{quote}",
        &caps[1],
        encode_attribute(&scrubbed, quote)
    )
}

fn redact_input_tag(tag: &str) -> String {
    let body_start = "<input".len().min(tag.len());
    let attrs: Vec<Captures> = ATTRIBUTE_RE.captures_iter(&tag[body_start..]).collect();

    let is_password = attrs.iter().any(|attr| {
        attr[1].eq_ignore_ascii_case("type")
            && attribute_value(attr)
                .map(|value| value.as_str().trim().eq_ignore_ascii_case("password"))
                .unwrap_or(false)
    });
    if !is_password {
        return tag.to_string();
    }

    let mut out = String::with_capacity(tag.len());
    let mut cursor = 0;
    for attr in attrs.iter().filter(|attr| attr[1].eq_ignore_ascii_case("value")) {
        if let Some(value) = attribute_value(attr) {
            let start = body_start + value.start();
            out.push_str(&tag[cursor..start]);
            out.push_str(PASSWORD_MARKER);
            cursor = body_start + value.end();
        }
    }
    out.push_str(&tag[cursor..]);
    out
}

fn attribute_value<'t>(attr: &Captures<'t>) -> Option<regex::Match<'t>> {
    attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4))
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                match caps.get(3).map(|name| name.as_str()) {
                    Some("amp") => Some('&'),
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    Some("quot") => Some('"'),
                    Some("apos") => Some('\''),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Same escaping the page serializer applies to attribute values.
fn encode_attribute(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote == '"' => out.push_str("&quot;"),
            '\'' if quote == '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("short", 50), "short");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn password_values_are_scrubbed() {
        let markup = r#"<form><input type="text" value="ann"><INPUT value='hunter2' TYPE=Password name="pw"></form>"#;
        let scrubbed = scrub_password_values(markup);
        assert!(!scrubbed.contains("hunter2"));
        assert!(scrubbed.contains("value='[PASSWORD]'"));
        assert!(scrubbed.contains(r#"value="ann""#));
    }

    #[test]
    fn quoted_angle_brackets_stay_inside_the_tag() {
        let markup = r#"<input type="password" data-x="a>b" value="s3cret"><p>after</p>"#;
        let scrubbed = scrub_password_values(markup);
        assert_eq!(
            scrubbed,
            r#"<input type="password" data-x="a>b" value="[PASSWORD]"><p>after</p>"#
        );
    }

    #[test]
    fn similar_tag_names_are_ignored() {
        let markup = r#"<inputs type="password" value="keep">"#;
        assert_eq!(scrub_password_values(markup), markup);
    }

    #[test]
    fn attribute_text_mentioning_value_is_left_alone() {
        let markup = r#"<input type="password" title="value=keep" value="s3cret">"#;
        assert_eq!(
            scrub_password_values(markup),
            r#"<input type="password" title="value=keep" value="[PASSWORD]">"#
        );
    }

    #[test]
    fn encoded_frame_documents_are_scrubbed() {
        let markup = "<iframe srcdoc=\"&lt;form&gt;&lt;input type='password' value='hunter2'&gt;&lt;/form&gt;\"></iframe>";
        let scrubbed = scrub_password_values(markup);
        assert!(!scrubbed.contains("hunter2"));
        assert_eq!(
            scrubbed,
            "<iframe srcdoc=\"&lt;form&gt;&lt;input type='password' value='[PASSWORD]'&gt;&lt;/form&gt;\"></iframe>"
        );
    }

    #[test]
    fn nested_frame_documents_are_scrubbed() {
        let inner = r#"<input type="password" value="hunter2">"#;
        let middle = format!(r#"<iframe srcdoc="{}"></iframe>"#, encode_attribute(inner, '"'));
        let outer = format!(r#"<iframe srcdoc="{}"></iframe>"#, encode_attribute(&middle, '"'));

        let scrubbed = scrub_password_values(&outer);

        assert!(!scrubbed.contains("hunter2"));
        assert!(scrubbed.contains("[PASSWORD]"));
    }

    #[test]
    fn frame_documents_without_passwords_keep_their_encoding() {
        let markup = r#"<iframe srcdoc="&#60;p&#62;a &amp; b&#60;/p&#62;"></iframe>"#;
        assert_eq!(scrub_password_values(markup), markup);
    }
}
