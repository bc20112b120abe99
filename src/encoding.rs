//! JSON and HTML encoding for the hydration attributes.
//!
//! Props travel to the client inside a single-quoted `data-react-props`
//! attribute. They are written as compact JSON with `/` as `\/` and every
//! non-ASCII character as a `\uXXXX` escape, then HTML entity encoded with
//! both quote styles converted.

use serde::Serialize;

/// Serializes `value` to the compact, ASCII-only JSON used in markup.
///
/// # Examples
///
/// ```
/// use react_engine::encoding::encode_json;
/// use serde_json::json;
///
/// assert_eq!(encode_json(&json!({"url": "/a"})).unwrap(), r#"{"url":"\/a"}"#);
/// assert_eq!(encode_json(&json!("é")).unwrap(), r#""\u00e9""#);
/// assert_eq!(encode_json(&()).unwrap(), "null");
/// ```
pub fn encode_json<P: Serialize + ?Sized>(value: &P) -> Result<String, serde_json::Error> {
	let compact = serde_json::to_string(value)?;
	Ok(escape_json_text(&compact))
}

/// Rewrites compact JSON text into its ASCII-only, slash-escaped form.
///
/// `/` and non-ASCII characters can only occur inside JSON strings, so a
/// character-level pass keeps the document valid.
fn escape_json_text(json: &str) -> String {
	let mut out = String::with_capacity(json.len());
	let mut units = [0u16; 2];
	for c in json.chars() {
		match c {
			'/' => out.push_str("\\/"),
			c if c.is_ascii() => out.push(c),
			c => {
				for unit in c.encode_utf16(&mut units) {
					out.push_str(&format!("\\u{:04x}", unit));
				}
			}
		}
	}
	out
}

/// Converts `&`, `"`, `'`, `<` and `>` to HTML entities.
///
/// # Examples
///
/// ```
/// use react_engine::encoding::html_entities;
///
/// assert_eq!(
///     html_entities(r#"{"a":"<b>'&'</b>"}"#),
///     "{&quot;a&quot;:&quot;&lt;b&gt;&#039;&amp;&#039;&lt;/b&gt;&quot;}"
/// );
/// ```
pub fn html_entities(input: &str) -> String {
	let mut out = String::with_capacity(input.len() + input.len() / 4);
	for c in input.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#039;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			c => out.push(c),
		}
	}
	out
}

/// Reverses [`html_entities`].
pub fn decode_html_entities(input: &str) -> String {
	input
		.replace("&quot;", "\"")
		.replace("&#039;", "'")
		.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&amp;", "&")
}

/// Encodes props for the `data-react-props` attribute.
pub fn encode_props<P: Serialize + ?Sized>(props: &P) -> Result<String, serde_json::Error> {
	Ok(html_entities(&encode_json(props)?))
}
