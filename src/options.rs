//! Render options and pass-through attributes.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Option key that toggles server-side markup generation.
pub const PRE_RENDER_KEY: &str = "preRender";

/// Alternate spelling accepted for [`PRE_RENDER_KEY`].
pub const PRE_RENDER_ALIAS: &str = "pre_render";

/// Option key that names the wrapper element.
pub const TAG_KEY: &str = "tag";

/// Wrapper element used when no tag is given.
pub const DEFAULT_TAG: &str = "div";

/// A value in a loose option bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
	/// Boolean flag.
	Bool(bool),
	/// Integer value.
	Integer(i64),
	/// Text value.
	Text(String),
}

/// Booleans print as `1` and the empty string.
impl fmt::Display for OptionValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(true) => f.write_str("1"),
			Self::Bool(false) => Ok(()),
			Self::Integer(value) => write!(f, "{value}"),
			Self::Text(value) => f.write_str(value),
		}
	}
}

impl From<bool> for OptionValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for OptionValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<&str> for OptionValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for OptionValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

/// Options for a single render call.
///
/// `pre_render` and `tag` are the behavioral options; everything in
/// `attributes` is written onto the wrapper element in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
	/// Whether the engine renders markup on the server.
	pub pre_render: bool,
	/// Name of the wrapper element.
	pub tag: String,
	/// Extra attributes of the wrapper element.
	pub attributes: IndexMap<String, String>,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			pre_render: true,
			tag: DEFAULT_TAG.to_string(),
			attributes: IndexMap::new(),
		}
	}
}

impl RenderOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the wrapper element.
	pub fn tag(mut self, tag: impl Into<String>) -> Self {
		self.tag = tag.into();
		self
	}

	/// Enables or disables server-side markup.
	pub fn pre_render(mut self, enable: bool) -> Self {
		self.pre_render = enable;
		self
	}

	/// Renders only the wrapper; the client builds the markup.
	pub fn client_only(self) -> Self {
		self.pre_render(false)
	}

	/// Adds a pass-through attribute. Re-adding a key replaces its value in
	/// place. Reserved names go through [`apply`](Self::apply), so
	/// `attr("tag", "span")` sets the tag.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
		self.apply(name.into(), value.into());
		self
	}

	/// Adds several attributes at once, see [`attr`](Self::attr).
	pub fn with_attributes<K, V, I>(mut self, attributes: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<OptionValue>,
	{
		self.extend(attributes);
		self
	}

	/// Classifies one option bag entry.
	///
	/// `preRender` (or `pre_render`) and `tag` are consumed as options; any
	/// other key becomes an attribute. Only a boolean `true` enables
	/// pre-rendering.
	pub fn apply(&mut self, key: String, value: OptionValue) {
		match key.as_str() {
			PRE_RENDER_KEY | PRE_RENDER_ALIAS => {
				if !matches!(value, OptionValue::Bool(_)) {
					tracing::warn!(
						option = %key,
						value = %value,
						"non-boolean preRender option disables server rendering"
					);
				}
				self.pre_render = value == OptionValue::Bool(true);
			}
			TAG_KEY => self.tag = value.to_string(),
			_ => {
				self.attributes.insert(key, value.to_string());
			}
		}
	}

	/// Builds options by merging a loose option bag over the defaults.
	///
	/// # Examples
	///
	/// ```
	/// use react_engine::RenderOptions;
	///
	/// let options = RenderOptions::from_bag([("tag", "span"), ("id", "g1")]);
	/// assert_eq!(options.tag, "span");
	/// assert!(options.pre_render);
	/// assert_eq!(options.attributes.get("id").map(String::as_str), Some("g1"));
	/// ```
	pub fn from_bag<K, V, I>(bag: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<OptionValue>,
	{
		bag.into_iter().collect()
	}
}

impl<K, V> FromIterator<(K, V)> for RenderOptions
where
	K: Into<String>,
	V: Into<OptionValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut options = Self::default();
		for (key, value) in iter {
			options.apply(key.into(), value.into());
		}
		options
	}
}

impl<K, V> Extend<(K, V)> for RenderOptions
where
	K: Into<String>,
	V: Into<OptionValue>,
{
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.apply(key.into(), value.into());
		}
	}
}
