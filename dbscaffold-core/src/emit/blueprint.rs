//! Placeholder substitution for source templates.

/// Template text with `{{name}}` placeholders.
///
/// Substitution is literal: every occurrence of a placeholder is replaced
/// by the value verbatim. Chained [`Blueprint::fill`] calls rescan earlier
/// values; [`Blueprint::fill_all`] substitutes each occurrence exactly once.
///
/// # Example
/// ```rust
/// use dbscaffold_core::emit::Blueprint;
///
/// let text = Blueprint::new("type {{name}} struct{} // {{name}}")
///     .fill("name", "Users")
///     .into_string();
/// assert_eq!(text, "type Users struct{} // Users");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    text: String,
}

impl Blueprint {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Replaces every `{{name}}` with `value`.
    #[must_use]
    pub fn fill(self, name: &str, value: &str) -> Self {
        let placeholder = format!("{{{{{}}}}}", name);
        Self {
            text: self.text.replace(&placeholder, value),
        }
    }

    /// Replaces every placeholder named in `values` in a single pass.
    ///
    /// Substituted text is never scanned again, so a value that contains
    /// `{{name}}` is kept verbatim. Unknown placeholders are left in place.
    #[must_use]
    pub fn fill_all(self, values: &[(&str, &str)]) -> Self {
        let mut text = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some((before, after)) = rest.split_once("{{") {
            text.push_str(before);
            let substitution = after.split_once("}}").and_then(|(name, remainder)| {
                values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|&(_, value)| (value, remainder))
            });
            match substitution {
                Some((value, remainder)) => {
                    text.push_str(value);
                    rest = remainder;
                }
                None => {
                    text.push_str("{{");
                    rest = after;
                }
            }
        }
        text.push_str(rest);

        Self { text }
    }

    /// Names of the placeholders still present, in order of first use.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut rest = self.text.as_str();

        while let Some((_, after)) = rest.split_once("{{") {
            let Some((name, remainder)) = after.split_once("}}") else {
                break;
            };
            if is_placeholder_name(name) && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
            rest = remainder;
        }

        names
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
