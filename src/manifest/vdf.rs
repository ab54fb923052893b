// ABOUTME: Writer for the quoted key/value text format consumed by steamcmd.
// ABOUTME: Emits nested blocks with two-space indentation and no escaping.

use super::GenerationError;

/// Reject values the format cannot carry.
///
/// The build tools read values verbatim between double quotes, so embedded
/// quotes or line breaks would corrupt the file.
pub fn check_value(key: &'static str, value: &str) -> Result<(), GenerationError> {
    if value.contains(['"', '\n', '\r']) {
        return Err(GenerationError::UnrepresentableValue {
            key,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Incremental builder for one document.
#[derive(Debug, Default)]
pub struct VdfWriter {
    out: String,
    depth: usize,
}

impl VdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a named block: `"key"` followed by `{` on its own line.
    pub fn open(&mut self, key: &str) -> &mut Self {
        self.line(&format!("\"{key}\""));
        self.line("{");
        self.depth += 1;
        self
    }

    /// Close the innermost block.
    pub fn close(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
        self
    }

    /// A scalar `"key" "value"` entry.
    pub fn pair(&mut self, key: &str, value: impl std::fmt::Display) -> &mut Self {
        self.line(&format!("\"{key}\" \"{value}\""));
        self
    }

    /// A scalar entry that is only written when a value is present.
    pub fn pair_opt(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.pair(key, value);
        }
        self
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}
