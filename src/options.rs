use serde::Deserialize;

/// Options for writing a GPX document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOptions {
    /// Emit the `<?xml version="1.0" encoding="UTF-8"?>` declaration (default: true)
    #[serde(default = "default_true")]
    pub xml_declaration: bool,

    /// Reproduce the layout of older writers: no `<desc>` on tracks, and
    /// route points written after their `<rte>` instead of inside it.
    /// Such output does not read back into the same routes (default: false)
    #[serde(default)]
    pub legacy_layout: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            legacy_layout: false,
        }
    }
}

fn default_true() -> bool {
    true
}
