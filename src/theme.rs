use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub link_color: String,
    pub background: String,
}

impl Theme {
    /// Classic mscgen look: small sans-serif text on white.
    pub fn mscgen_default() -> Self {
        Self {
            font_family: "Helvetica, sans-serif".to_string(),
            font_size: 12.0,
            link_color: "blue".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            link_color: "#2563EB".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mscgen_default()
    }
}
