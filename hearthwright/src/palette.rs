// Material palettes.
//
// Layer templates name materials by role (`{pillar}`, `{lightMat}`, ...)
// rather than by block id, so one set of templates can be dressed in
// different materials. A `Palette` fills those roles in. Two placeholders,
// `{axis}` and `{facing}`, depend on where a block ends up rather than on the
// theme; `resolve()` leaves them untouched for the placement layer.
//
// Palettes also carry the theme's decoration flags: whether exterior walls
// get buttons as studs, and whether windows get shutters on the ground floor
// and on upper floors.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Placeholders left for orientation resolution at placement time.
pub const ORIENTATION_PLACEHOLDERS: [&str; 2] = ["axis", "facing"];

/// A named material substitution table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub pillar: String,
    pub joint: String,
    pub light_mat: String,
    pub heavy_mat: String,
    pub window: String,
    pub door_mat: String,
    pub has_studs: bool,
    /// Shutter flags for `(ground floor, upper floors)`.
    pub has_shutters: (bool, bool),
}

impl Palette {
    pub fn rustic() -> Self {
        Self {
            pillar: "spruce_log".into(),
            joint: "spruce_wood".into(),
            light_mat: "spruce".into(),
            heavy_mat: "cobblestone".into(),
            window: "glass_pane".into(),
            door_mat: "spruce".into(),
            has_studs: false,
            has_shutters: (false, true),
        }
    }

    pub fn arid() -> Self {
        Self {
            pillar: "sandstone".into(),
            joint: "chiseled_sandstone".into(),
            light_mat: "acacia".into(),
            heavy_mat: "smooth_sandstone".into(),
            window: "air".into(),
            door_mat: "acacia".into(),
            has_studs: true,
            has_shutters: (false, false),
        }
    }

    /// Shutter flag for a floor: level 0 is the ground tier.
    pub fn shutters_on(&self, level: usize) -> bool {
        if level == 0 {
            self.has_shutters.0
        } else {
            self.has_shutters.1
        }
    }

    /// Substitute material placeholders in `template`.
    ///
    /// Fails on a placeholder the palette does not know or on an unclosed
    /// brace. Orientation placeholders are copied through verbatim.
    pub fn resolve(&self, template: &str) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(template.len() + 16);
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| ConfigError::UnterminatedPlaceholder(template.to_string()))?;
            let name = &after[..close];
            match self.lookup(name) {
                Some(value) => out.push_str(value),
                None if ORIENTATION_PLACEHOLDERS.contains(&name) => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
                None => {
                    return Err(ConfigError::UnknownPlaceholder {
                        name: name.to_string(),
                        template: template.to_string(),
                    });
                }
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        let value = match name {
            "pillar" => &self.pillar,
            "joint" => &self.joint,
            "lightMat" => &self.light_mat,
            "heavyMat" => &self.heavy_mat,
            "window" => &self.window,
            "doorMat" => &self.door_mat,
            _ => return None,
        };
        Some(value.as_str())
    }
}
