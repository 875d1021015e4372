// Blueprint library: layer templates, structural classes, blueprint sets
// and themes.
//
// ## Model
//
// - `LayerTemplate`: what to place in one column of a cell, bottom to top,
//   one entry per block of height. An entry is either a block template
//   (`"{heavyMat}_slab[type=top]"`) or `Skip` (`"-"` in the written form),
//   which leaves whatever is already there.
// - `StructuralClass`: eight templates, one per structural role a cell can
//   play. Posts pick among four (outer corner, cojoining, inner corner,
//   surrounded) by how crowded they are, walls among two (wall, corridor),
//   rooms always use `room`, and `window` is what gets punched into walls.
// - `BlueprintSet`: one class per floor-plan `Category` (sky, roof, room).
// - `Theme`: a palette plus a ground-floor set and an upper-floor set.
//
// Classes are values. A derived class is built from another with the
// `with_*` methods, which consume and return a fresh value, so no two
// classes ever share a template.
//
// ## Lookup
//
// `ThemeRegistry` is the explicit catalog handed to a `House`. Registering a
// theme resolves every template of both sets through the theme's palette, so
// a template naming an unknown material fails at registration rather than
// halfway through a build.
//
// See also: `palette.rs` for placeholder resolution, `floor.rs` for how a
// cell's slot is chosen, `house.rs` for placement.

use crate::error::ConfigError;
use crate::palette::Palette;
use crate::types::{Category, LatticeRole};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Layer templates
// ---------------------------------------------------------------------------

/// Written form of `Layer::Skip`.
pub const SKIP: &str = "-";

/// One block of height in a layer template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Layer {
    /// Leave the existing block alone.
    Skip,
    /// Block template, resolved through a palette at placement time.
    Block(String),
}

/// Ordered per-height block templates for one column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LayerTemplate {
    layers: SmallVec<[Layer; 4]>,
}

impl LayerTemplate {
    pub fn new(entries: &[&str]) -> Self {
        entries.iter().copied().collect()
    }

    /// The template that places nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Layers with their height offsets.
    pub fn layers(&self) -> impl Iterator<Item = (i32, &Layer)> {
        self.layers.iter().enumerate().map(|(h, l)| (h as i32, l))
    }

    /// Height offset of the lowest non-skip layer.
    pub fn first_block_height(&self) -> Option<i32> {
        self.layers()
            .find(|(_, l)| matches!(l, Layer::Block(_)))
            .map(|(h, _)| h)
    }
}

impl<'a> FromIterator<&'a str> for LayerTemplate {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let layers = iter
            .into_iter()
            .map(|entry| {
                if entry == SKIP {
                    Layer::Skip
                } else {
                    Layer::Block(entry.to_string())
                }
            })
            .collect();
        Self { layers }
    }
}

impl From<Vec<String>> for LayerTemplate {
    fn from(entries: Vec<String>) -> Self {
        entries.iter().map(String::as_str).collect()
    }
}

impl From<LayerTemplate> for Vec<String> {
    fn from(template: LayerTemplate) -> Self {
        template
            .layers
            .into_iter()
            .map(|l| match l {
                Layer::Skip => SKIP.to_string(),
                Layer::Block(b) => b,
            })
            .collect()
    }
}

/// The stock templates the built-in classes are assembled from.
pub mod templates {
    use super::LayerTemplate;

    pub fn ignored() -> LayerTemplate {
        LayerTemplate::empty()
    }

    pub fn pillar() -> LayerTemplate {
        LayerTemplate::new(&["{pillar}", "{pillar}", "{pillar}", "{joint}"])
    }

    pub fn pillar_lamp() -> LayerTemplate {
        LayerTemplate::new(&["{pillar}", "{pillar}", "redstone_lamp", "redstone_block"])
    }

    pub fn heavy_fencepole() -> LayerTemplate {
        LayerTemplate::new(&[
            "{heavyMat}",
            "{lightMat}_fence",
            "{lightMat}_fence",
            "{lightMat}_fence",
        ])
    }

    pub fn log_lanternpost() -> LayerTemplate {
        LayerTemplate::new(&["{lightMat}_log", "{lightMat}_fence", "lantern"])
    }

    pub fn fullheavy_lantern() -> LayerTemplate {
        LayerTemplate::new(&["{heavyMat}", "air", "air", "lantern[hanging=true]"])
    }

    pub fn fence() -> LayerTemplate {
        LayerTemplate::new(&["-", "{lightMat}_fence"])
    }

    pub fn beam() -> LayerTemplate {
        LayerTemplate::new(&["-", "-", "-", "{pillar}"])
    }

    pub fn lightwall_beam() -> LayerTemplate {
        LayerTemplate::new(&["{lightMat}", "{lightMat}", "{lightMat}", "{pillar}"])
    }

    pub fn lightceil() -> LayerTemplate {
        LayerTemplate::new(&["-", "-", "-", "{lightMat}_slab[type=top]"])
    }

    pub fn light_heavy() -> LayerTemplate {
        LayerTemplate::new(&["{heavyMat}_slab", "air", "air", "{lightMat}_slab[type=top]"])
    }

    pub fn heavyfloor() -> LayerTemplate {
        LayerTemplate::new(&["{heavyMat}_slab", "air"])
    }

    pub fn heavy_beam() -> LayerTemplate {
        LayerTemplate::new(&["{heavyMat}_slab", "air", "air", "{pillar}"])
    }

    pub fn heavyroom() -> LayerTemplate {
        LayerTemplate::new(&["{heavyMat}_slab", "air", "air", "{heavyMat}_slab[type=top]"])
    }

    pub fn fullheavy_trapdoor() -> LayerTemplate {
        LayerTemplate::new(&["{heavyMat}", "air", "air", "{lightMat}_trapdoor[half=top]"])
    }

    pub fn heavywall_beam() -> LayerTemplate {
        LayerTemplate::new(&["{heavyMat}", "{heavyMat}", "{heavyMat}", "{pillar}"])
    }

    pub fn heavyceil() -> LayerTemplate {
        LayerTemplate::new(&["-", "-", "-", "{heavyMat}_slab[type=top]"])
    }

    pub fn cellarwindow() -> LayerTemplate {
        LayerTemplate::new(&["-", "-", "{heavyMat}_slab[type=top]"])
    }

    pub fn low_smallwindow() -> LayerTemplate {
        LayerTemplate::new(&["-", "{window}"])
    }

    pub fn trapdoorwindow() -> LayerTemplate {
        LayerTemplate::new(&[
            "-",
            "-",
            "{doorMat}_trapdoor[half=top, open=true, facing={facing}]",
        ])
    }
}

// ---------------------------------------------------------------------------
// Structural classes
// ---------------------------------------------------------------------------

/// Which of a class's eight templates a cell uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    OuterCorner,
    Cojoining,
    InnerCorner,
    Surrounded,
    Wall,
    Corridor,
    Room,
    Window,
}

impl Slot {
    /// Pick the slot for a cell from its role and crowding (in tenths).
    ///
    /// Thresholds are inclusive lower bounds: posts are surrounded from 0.3,
    /// inner corners from 0.2, cojoining from 0.1; walls are corridors from
    /// 0.1.
    pub fn select(role: LatticeRole, crowding: u8) -> Self {
        match role {
            LatticeRole::Post => match crowding {
                3.. => Slot::Surrounded,
                2 => Slot::InnerCorner,
                1 => Slot::Cojoining,
                0 => Slot::OuterCorner,
            },
            LatticeRole::XWall | LatticeRole::YWall => {
                if crowding >= 1 {
                    Slot::Corridor
                } else {
                    Slot::Wall
                }
            }
            LatticeRole::Room => Slot::Room,
        }
    }
}

/// Eight templates keyed by structural role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralClass {
    pub outercorner: LayerTemplate,
    pub cojoining: LayerTemplate,
    pub innercorner: LayerTemplate,
    pub surrounded: LayerTemplate,
    pub wall: LayerTemplate,
    pub corridor: LayerTemplate,
    pub room: LayerTemplate,
    pub window: LayerTemplate,
}

impl StructuralClass {
    pub fn slot(&self, slot: Slot) -> &LayerTemplate {
        match slot {
            Slot::OuterCorner => &self.outercorner,
            Slot::Cojoining => &self.cojoining,
            Slot::InnerCorner => &self.innercorner,
            Slot::Surrounded => &self.surrounded,
            Slot::Wall => &self.wall,
            Slot::Corridor => &self.corridor,
            Slot::Room => &self.room,
            Slot::Window => &self.window,
        }
    }

    pub fn templates(&self) -> [&LayerTemplate; 8] {
        [
            &self.outercorner,
            &self.cojoining,
            &self.innercorner,
            &self.surrounded,
            &self.wall,
            &self.corridor,
            &self.room,
            &self.window,
        ]
    }

    /// Same posts for all four post slots.
    pub fn with_posts(self, outercorner: LayerTemplate, surrounded: LayerTemplate) -> Self {
        Self {
            cojoining: outercorner.clone(),
            innercorner: outercorner.clone(),
            outercorner,
            surrounded,
            ..self
        }
    }

    pub fn with_innercorner(self, innercorner: LayerTemplate) -> Self {
        Self {
            innercorner,
            ..self
        }
    }

    pub fn with_walls(self, wall: LayerTemplate, corridor: LayerTemplate) -> Self {
        Self {
            wall,
            corridor,
            ..self
        }
    }

    pub fn with_room(self, room: LayerTemplate) -> Self {
        Self { room, ..self }
    }

    pub fn with_window(self, window: LayerTemplate) -> Self {
        Self { window, ..self }
    }
}

/// The stock classes.
pub mod classes {
    use super::StructuralClass;
    use super::templates::{self, *};

    pub fn ignored() -> StructuralClass {
        StructuralClass::default()
    }

    pub fn flatroof() -> StructuralClass {
        StructuralClass::default()
            .with_posts(heavyfloor(), templates::ignored())
            .with_walls(heavyfloor(), templates::ignored())
    }

    pub fn fence_ring() -> StructuralClass {
        StructuralClass::default()
            .with_posts(fence(), templates::ignored())
            .with_walls(fence(), templates::ignored())
    }

    pub fn frame() -> StructuralClass {
        StructuralClass::default()
            .with_posts(pillar(), pillar())
            .with_walls(beam(), beam())
    }

    /// Fenced garden with lantern posts at the corners.
    pub fn yard() -> StructuralClass {
        fence_ring().with_posts(log_lanternpost(), templates::ignored())
    }

    pub fn lightstilt() -> StructuralClass {
        frame().with_room(lightceil())
    }

    pub fn heavystilt() -> StructuralClass {
        frame().with_room(heavyceil())
    }

    pub fn lightframe() -> StructuralClass {
        frame()
            .with_innercorner(pillar_lamp())
            .with_walls(lightwall_beam(), beam())
            .with_room(lightceil())
            .with_window(low_smallwindow())
    }

    pub fn heavyframe() -> StructuralClass {
        frame()
            .with_innercorner(pillar_lamp())
            .with_walls(heavywall_beam(), heavy_beam())
            .with_room(heavyroom())
            .with_window(cellarwindow())
    }

    /// Masonry ground floor under a timber upper floor.
    pub fn transitionframe() -> StructuralClass {
        heavyframe().with_room(light_heavy())
    }

    pub fn arid() -> StructuralClass {
        StructuralClass {
            outercorner: heavywall_beam(),
            cojoining: heavywall_beam(),
            innercorner: fullheavy_lantern(),
            surrounded: heavy_fencepole(),
            wall: heavywall_beam(),
            corridor: fullheavy_trapdoor(),
            room: fullheavy_trapdoor(),
            window: trapdoorwindow(),
        }
    }
}

// ---------------------------------------------------------------------------
// Blueprint sets and themes
// ---------------------------------------------------------------------------

/// One structural class per floor-plan category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintSet {
    pub sky: StructuralClass,
    pub roof: StructuralClass,
    pub room: StructuralClass,
}

impl BlueprintSet {
    pub fn new(roof: StructuralClass, room: StructuralClass) -> Self {
        Self {
            sky: classes::ignored(),
            roof,
            room,
        }
    }

    pub fn class(&self, category: Category) -> &StructuralClass {
        match category {
            Category::Sky => &self.sky,
            Category::Roof => &self.roof,
            Category::Room => &self.room,
        }
    }

    /// The template punched into every wall of a floor built from this set:
    /// the room class's window.
    pub fn window(&self) -> &LayerTemplate {
        &self.room.window
    }

    fn classes(&self) -> [&StructuralClass; Category::COUNT] {
        [&self.sky, &self.roof, &self.room]
    }
}

/// Which set of a theme a floor is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Ground,
    Regular,
}

impl Stage {
    pub fn for_level(level: usize) -> Self {
        if level == 0 { Stage::Ground } else { Stage::Regular }
    }
}

/// A palette paired with its ground and upper-floor blueprint sets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub palette: Palette,
    pub ground: BlueprintSet,
    pub regular: BlueprintSet,
}

impl Theme {
    pub fn rustic() -> Self {
        Self {
            name: "rustic".into(),
            palette: Palette::rustic(),
            ground: BlueprintSet::new(classes::yard(), classes::transitionframe()),
            regular: BlueprintSet::new(classes::flatroof(), classes::lightframe()),
        }
    }

    pub fn arid() -> Self {
        Self {
            name: "arid".into(),
            palette: Palette::arid(),
            ground: BlueprintSet::new(classes::yard(), classes::arid()),
            regular: BlueprintSet::new(classes::flatroof(), classes::arid()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn set(&self, stage: Stage) -> &BlueprintSet {
        match stage {
            Stage::Ground => &self.ground,
            Stage::Regular => &self.regular,
        }
    }

    /// Resolve every template through the palette, failing on the first one
    /// that names an unknown material.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for set in [&self.ground, &self.regular] {
            for class in set.classes() {
                for template in class.templates() {
                    for (_, layer) in template.layers() {
                        if let Layer::Block(block) = layer {
                            self.palette.resolve(block)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// The catalog of themes a house can be built in.
#[derive(Clone, Debug, Default)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Theme>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in `rustic` and `arid` themes.
    pub fn builtin() -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.register(Theme::rustic())?;
        registry.register(Theme::arid())?;
        Ok(registry)
    }

    /// Validate and add a theme, replacing any theme of the same name.
    pub fn register(&mut self, theme: Theme) -> Result<(), ConfigError> {
        theme.validate()?;
        self.themes.insert(theme.name.clone(), theme);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Theme, ConfigError> {
        self.themes
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTheme(name.to_string()))
    }

    /// Registered theme names in sorted order.
    pub fn theme_names(&self) -> Vec<&str> {
        self.themes.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_sentinel_parses() {
        let t = templates::fence();
        let layers: Vec<_> = t.layers().collect();
        assert_eq!(layers[0], (0, &Layer::Skip));
        assert_eq!(layers[1], (1, &Layer::Block("{lightMat}_fence".into())));
        assert_eq!(t.first_block_height(), Some(1));
        assert_eq!(templates::ignored().first_block_height(), None);
    }

    #[test]
    fn post_thresholds_are_inclusive() {
        let post = LatticeRole::Post;
        assert_eq!(Slot::select(post, 0), Slot::OuterCorner);
        assert_eq!(Slot::select(post, 1), Slot::Cojoining);
        assert_eq!(Slot::select(post, 2), Slot::InnerCorner);
        assert_eq!(Slot::select(post, 3), Slot::Surrounded);
        assert_eq!(Slot::select(post, 9), Slot::Surrounded);
    }

    #[test]
    fn wall_and_room_slots() {
        assert_eq!(Slot::select(LatticeRole::XWall, 0), Slot::Wall);
        assert_eq!(Slot::select(LatticeRole::YWall, 1), Slot::Corridor);
        assert_eq!(Slot::select(LatticeRole::YWall, 3), Slot::Corridor);
        assert_eq!(Slot::select(LatticeRole::Room, 0), Slot::Room);
        assert_eq!(Slot::select(LatticeRole::Room, 3), Slot::Room);
    }

    #[test]
    fn derived_classes_do_not_alias() {
        let frame = classes::frame();
        let light = classes::lightstilt();
        let heavy = classes::heavystilt();
        assert_eq!(frame.room, templates::ignored());
        assert_eq!(light.room, templates::lightceil());
        assert_eq!(heavy.room, templates::heavyceil());
        // Everything else still matches the base.
        assert_eq!(light.outercorner, frame.outercorner);
        assert_eq!(heavy.wall, frame.wall);
    }

    #[test]
    fn transitionframe_overrides_only_room() {
        let heavy = classes::heavyframe();
        let transition = classes::transitionframe();
        assert_eq!(transition.room, templates::light_heavy());
        assert_eq!(transition.window, heavy.window);
        assert_eq!(transition.wall, heavy.wall);
        assert_eq!(heavy.room, templates::heavyroom());
    }

    #[test]
    fn yard_keeps_fence_walls() {
        let yard = classes::yard();
        assert_eq!(yard.outercorner, templates::log_lanternpost());
        assert_eq!(yard.innercorner, templates::log_lanternpost());
        assert!(yard.surrounded.is_empty());
        assert_eq!(yard.wall, templates::fence());
        assert!(yard.room.is_empty());
    }

    #[test]
    fn sets_index_by_category() {
        let theme = Theme::rustic();
        let ground = theme.set(Stage::Ground);
        assert_eq!(ground.class(Category::Sky), &classes::ignored());
        assert_eq!(ground.class(Category::Roof), &classes::yard());
        assert_eq!(ground.window(), &templates::cellarwindow());
        assert_eq!(theme.set(Stage::Regular).window(), &templates::low_smallwindow());
    }

    #[test]
    fn builtin_registry_lists_both_themes() {
        let registry = ThemeRegistry::builtin().unwrap();
        assert_eq!(registry.theme_names(), vec!["arid", "rustic"]);
        assert!(registry.get("arid").unwrap().palette.has_studs);
    }

    #[test]
    fn unknown_theme_is_config_error() {
        let registry = ThemeRegistry::builtin().unwrap();
        assert!(matches!(
            registry.get("gothic"),
            Err(ConfigError::UnknownTheme(name)) if name == "gothic"
        ));
    }

    #[test]
    fn register_rejects_bad_template() {
        let mut theme = Theme::rustic();
        theme.name = "broken".into();
        theme.regular.room = theme
            .regular
            .room
            .with_room(LayerTemplate::new(&["{roofMat}_slab"]));
        let mut registry = ThemeRegistry::new();
        assert!(matches!(
            registry.register(theme),
            Err(ConfigError::UnknownPlaceholder { .. })
        ));
        assert!(registry.theme_names().is_empty());
    }

    #[test]
    fn theme_loads_from_json() {
        let json = serde_json::to_string(&Theme::arid()).unwrap();
        let theme = Theme::from_json(&json).unwrap();
        assert_eq!(theme, Theme::arid());
        // Templates are written as plain string lists with "-" for skips.
        let trapdoor = r#"["-","-","{doorMat}_trapdoor[half=top, open=true, facing={facing}]"]"#;
        assert!(json.contains(trapdoor));
    }

    #[test]
    fn stage_for_level() {
        assert_eq!(Stage::for_level(0), Stage::Ground);
        assert_eq!(Stage::for_level(1), Stage::Regular);
    }
}
