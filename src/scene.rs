//! Scene files: a container, its layout settings and a list of named
//! controls with their attachments, loaded from TOML or RON.
//!
//! ```toml
//! container = { width = 300, height = 200 }
//!
//! [layout]
//! margin_width = 5
//! spacing = 4
//!
//! [[control]]
//! name = "cancel"
//! size = { width = 80, height = 25 }
//! right = { numerator = 100, offset = -5 }
//! bottom = { numerator = 100, offset = -5 }
//!
//! [[control]]
//! name = "ok"
//! size = { width = 80, height = 25 }
//! right = { control = "cancel" }
//! top = { control = "cancel", alignment = "top" }
//! ```

use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::common::collections::{HashMap, HashSet};
use crate::common::config::FormLayoutSettings;
use crate::layout_engine::{
    Alignment, Attachment, Composite, ControlId, DEFAULT_DENOMINATOR, FormData, FormLayout,
    Hints, LayoutError, Rect, Side, Size, Widget,
};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct AttachmentSpec {
    #[serde(default)]
    pub numerator: i32,
    #[serde(default = "default_denominator")]
    pub denominator: i32,
    #[serde(default)]
    pub offset: i32,
    /// Name of the sibling this side is pegged to.
    #[serde(default)]
    pub control: Option<String>,
    #[serde(default)]
    pub alignment: Alignment,
}

fn default_denominator() -> i32 { DEFAULT_DENOMINATOR }

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ControlSpec {
    pub name: String,
    /// Natural size reported when the control is measured without hints.
    pub size: Size,
    /// Whether the control wraps like a line of text when it is narrower
    /// than its natural width.
    #[serde(default)]
    pub wrap: bool,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub left: Option<AttachmentSpec>,
    #[serde(default)]
    pub right: Option<AttachmentSpec>,
    #[serde(default)]
    pub top: Option<AttachmentSpec>,
    #[serde(default)]
    pub bottom: Option<AttachmentSpec>,
}

impl ControlSpec {
    fn side(&self, side: Side) -> Option<&AttachmentSpec> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
            Side::Top => self.top.as_ref(),
            Side::Bottom => self.bottom.as_ref(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    /// Client area of the container.
    pub container: Size,
    /// Overrides the configured layout settings when present.
    #[serde(default)]
    pub layout: Option<FormLayoutSettings>,
    #[serde(default, rename = "control")]
    pub controls: Vec<ControlSpec>,
}

impl SceneFile {
    /// Reads a scene, choosing RON for `.ron` files and TOML otherwise.
    pub fn read(path: &Path) -> anyhow::Result<SceneFile> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene {}", path.display()))?;
        let scene = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::parse_ron(&buf),
            _ => Self::parse_toml(&buf),
        };
        scene.with_context(|| format!("parsing scene {}", path.display()))
    }

    pub fn parse_toml(buf: &str) -> anyhow::Result<SceneFile> { Ok(toml::from_str(buf)?) }

    pub fn parse_ron(buf: &str) -> anyhow::Result<SceneFile> { Ok(ron::from_str(buf)?) }

    /// Builds the container. `defaults` apply unless the scene carries its own
    /// `[layout]` section.
    #[instrument(skip_all, fields(controls = self.controls.len()))]
    pub fn build(&self, defaults: FormLayoutSettings) -> anyhow::Result<Scene> {
        let mut settings = self.layout.unwrap_or(defaults);
        for issue in settings.validate() {
            warn!("scene layout: {issue}");
        }
        settings.auto_fix_values();
        let client_area = Rect::from_size(self.container);
        let mut composite = Composite::with_layout(FormLayout::new(settings), client_area);

        let mut ids = HashMap::default();
        let mut names = Vec::with_capacity(self.controls.len());
        for spec in &self.controls {
            let widget = SceneWidget {
                natural: spec.size,
                wrap: spec.wrap,
                bounds: Rect::default(),
            };
            let id = composite.add(widget, FormData::new());
            if ids.insert(spec.name.clone(), id).is_some() {
                bail!("Duplicate control name '{}'", spec.name);
            }
            names.push((id, spec.name.clone()));
        }

        for spec in &self.controls {
            let mut data = FormData { width: spec.width, height: spec.height, ..FormData::default() };
            for side in Side::ALL {
                let Some(attachment) = spec.side(side) else { continue };
                let resolved = to_attachment(attachment, &ids)
                    .with_context(|| format!("{} side of control '{}'", side, spec.name))?;
                data.set_attachment(side, Some(resolved));
            }
            composite.set_layout_data(ids[&spec.name], data)?;
        }
        debug!(?settings, "built scene");
        Ok(Scene { composite, names })
    }
}

fn to_attachment(
    spec: &AttachmentSpec,
    ids: &HashMap<String, ControlId>,
) -> anyhow::Result<Attachment> {
    let Some(name) = &spec.control else {
        return Ok(Attachment::new(spec.numerator, spec.denominator, spec.offset)?);
    };
    if spec.numerator != 0 || spec.denominator != DEFAULT_DENOMINATOR {
        bail!("An attachment to control '{name}' cannot also have a fraction");
    }
    let Some(&id) = ids.get(name) else {
        bail!("Unknown control '{name}'");
    };
    Ok(Attachment::to_control(id, spec.offset, spec.alignment))
}

/// Stand-in widget with a fixed natural size.
#[derive(Debug, Clone)]
pub struct SceneWidget {
    natural: Size,
    wrap: bool,
    bounds: Rect,
}

impl SceneWidget {
    pub fn bounds(&self) -> Rect { self.bounds }
}

impl Widget for SceneWidget {
    fn compute_size(&self, hints: Hints, _flush_cache: bool) -> Size {
        let width = hints.width.unwrap_or(self.natural.width);
        let height = hints.height.unwrap_or_else(|| {
            if self.wrap && width > 0 && width < self.natural.width {
                let lines = self.natural.width.saturating_add(width - 1) / width;
                lines.saturating_mul(self.natural.height)
            } else {
                self.natural.height
            }
        });
        Size::new(width, height)
    }

    fn set_bounds(&mut self, bounds: Rect) { self.bounds = bounds; }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Placement {
    pub name: String,
    pub bounds: Rect,
}

pub struct Scene {
    composite: Composite<SceneWidget>,
    names: Vec<(ControlId, String)>,
}

impl Scene {
    pub fn composite(&self) -> &Composite<SceneWidget> { &self.composite }

    /// Lays the scene out in its container and returns every control's bounds
    /// in declaration order.
    pub fn solve(&mut self) -> Result<Vec<Placement>, LayoutError> {
        self.composite.layout(true)?;
        Ok(self
            .names
            .iter()
            .filter_map(|(id, name)| {
                let bounds = self.composite.widget(*id)?.bounds();
                Some(Placement { name: name.clone(), bounds })
            })
            .collect())
    }

    pub fn preferred_size(
        &mut self,
        width_hint: Option<i32>,
        height_hint: Option<i32>,
    ) -> Result<Size, LayoutError> {
        self.composite.compute_size(width_hint, height_hint, true)
    }

    fn name(&self, id: ControlId) -> &str {
        self.names.iter().find(|(other, _)| *other == id).map_or("?", |(_, name)| name.as_str())
    }

    /// Renders which control or container fraction each side is attached to.
    /// References that lead back to the control itself are marked.
    pub fn draw_tree(&self) -> String {
        let area = self.composite.client_area();
        let controls = self.names.iter().map(|(id, _)| self.control_tree(*id)).collect();
        let tree = ascii_tree::Tree::Node(format!("container {}x{}", area.width, area.height), controls);
        let mut out = String::new();
        ascii_tree::write_tree(&mut out, &tree).unwrap();
        out
    }

    fn control_tree(&self, id: ControlId) -> ascii_tree::Tree {
        let name = self.name(id).to_string();
        let Some(data) = self.composite.layout_data(id) else {
            return ascii_tree::Tree::Leaf(vec![format!("{name} (removed)")]);
        };
        let sides: Vec<String> = Side::ALL
            .into_iter()
            .filter_map(|side| {
                let attachment = data.attachment(side)?;
                let offset = attachment.offset();
                Some(match attachment.anchor() {
                    None => format!(
                        "{side}: {}/{} {offset:+}",
                        attachment.numerator(),
                        attachment.denominator()
                    ),
                    Some(anchor) => {
                        let target = self.name(anchor.control);
                        let cycle = if self.reaches(anchor.control, id) { " (cycle)" } else { "" };
                        format!("{side}: {target} {} {offset:+}{cycle}", anchor.alignment)
                    }
                })
            })
            .collect();
        if sides.is_empty() {
            ascii_tree::Tree::Leaf(vec![name])
        } else {
            ascii_tree::Tree::Node(name, vec![ascii_tree::Tree::Leaf(sides)])
        }
    }

    /// Whether following attachments from `from` arrives at `target`.
    fn reaches(&self, from: ControlId, target: ControlId) -> bool {
        let mut seen = HashSet::default();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            let Some(data) = self.composite.layout_data(id) else { continue };
            stack.extend(
                Side::ALL
                    .into_iter()
                    .filter_map(|side| data.attachment(side)?.anchor())
                    .map(|anchor| anchor.control),
            );
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DIALOG: &str = r#"
        container = { width = 300, height = 200 }

        [layout]
        spacing = 4

        [[control]]
        name = "cancel"
        size = { width = 80, height = 25 }
        right = { numerator = 100, offset = -5 }
        bottom = { numerator = 100, offset = -5 }

        [[control]]
        name = "ok"
        size = { width = 60, height = 25 }
        right = { control = "cancel" }
        top = { control = "cancel", alignment = "top" }

        [[control]]
        name = "message"
        size = { width = 500, height = 20 }
        wrap = true
        left = { numerator = 0, offset = 5 }
        right = { numerator = 100, offset = -5 }
        top = { numerator = 0, offset = 5 }
    "#;

    fn placements(scene: &mut Scene) -> Vec<(String, Rect)> {
        scene.solve().unwrap().into_iter().map(|p| (p.name, p.bounds)).collect()
    }

    #[test]
    fn dialog_scene_solves() {
        let mut scene = SceneFile::parse_toml(DIALOG)
            .unwrap()
            .build(FormLayoutSettings::default())
            .unwrap();
        assert_eq!(
            placements(&mut scene),
            vec![
                ("cancel".to_string(), Rect::new(215, 170, 80, 25)),
                ("ok".to_string(), Rect::new(151, 170, 60, 25)),
                ("message".to_string(), Rect::new(5, 5, 290, 40)),
            ]
        );
    }

    #[test]
    fn preferred_size_of_dialog() {
        let mut scene = SceneFile::parse_toml(DIALOG)
            .unwrap()
            .build(FormLayoutSettings::default())
            .unwrap();
        assert_eq!(scene.preferred_size(None, None), Ok(Size::new(510, 30)));
    }

    #[test]
    fn ron_scenes_parse() {
        let scene = SceneFile::parse_ron(
            r#"(
                container: (width: 100, height: 50),
                control: [
                    (name: "a", size: (width: 10, height: 10), left: Some((numerator: 50))),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(scene.controls.len(), 1);
        assert_eq!(scene.controls[0].left.as_ref().map(|a| a.denominator), Some(100));
        let mut built = scene.build(FormLayoutSettings::default()).unwrap();
        assert_eq!(placements(&mut built), vec![("a".to_string(), Rect::new(50, 0, 10, 10))]);
    }

    #[test]
    fn bad_references_are_reported() {
        let unknown = r#"
            container = { width = 10, height = 10 }
            [[control]]
            name = "a"
            size = { width = 1, height = 1 }
            left = { control = "b" }
        "#;
        let err = SceneFile::parse_toml(unknown)
            .unwrap()
            .build(FormLayoutSettings::default())
            .err()
            .unwrap();
        assert!(format!("{err:#}").contains("Unknown control 'b'"), "{err:#}");

        let zero = unknown.replace(r#"{ control = "b" }"#, "{ numerator = 1, denominator = 0 }");
        let err = SceneFile::parse_toml(&zero)
            .unwrap()
            .build(FormLayoutSettings::default())
            .err()
            .unwrap();
        assert!(format!("{err:#}").contains("denominator cannot be zero"), "{err:#}");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let scene = r#"
            container = { width = 10, height = 10 }
            [[control]]
            name = "a"
            size = { width = 1, height = 1 }
            [[control]]
            name = "a"
            size = { width = 1, height = 1 }
        "#;
        let built = SceneFile::parse_toml(scene).unwrap().build(FormLayoutSettings::default());
        assert!(built.is_err());
    }

    #[test]
    fn tree_marks_cycles() {
        let scene = r#"
            container = { width = 100, height = 100 }
            [[control]]
            name = "a"
            size = { width = 10, height = 10 }
            left = { control = "b" }
            [[control]]
            name = "b"
            size = { width = 10, height = 10 }
            right = { control = "a", offset = -2 }
        "#;
        let scene = SceneFile::parse_toml(scene).unwrap().build(FormLayoutSettings::default()).unwrap();
        let tree = scene.draw_tree();
        assert!(tree.contains("container 100x100"), "{tree}");
        assert!(tree.contains("left: b default +0 (cycle)"), "{tree}");
        assert!(tree.contains("right: a default -2 (cycle)"), "{tree}");
    }

    #[test]
    fn tree_lists_each_reference_once() {
        let mut scene = String::from("container = { width = 100, height = 100 }\n");
        scene.push_str("[[control]]\nname = \"c0\"\nsize = { width = 1, height = 1 }\nleft = { numerator = 50 }\n");
        for i in 1..6 {
            scene.push_str(&format!(
                "[[control]]\nname = \"c{i}\"\nsize = {{ width = 1, height = 1 }}\nleft = {{ control = \"c{}\" }}\n",
                i - 1
            ));
        }
        let scene = SceneFile::parse_toml(&scene).unwrap().build(FormLayoutSettings::default()).unwrap();
        let tree = scene.draw_tree();
        assert_eq!(tree.matches("left: 50/100 +0").count(), 1, "{tree}");
        for i in 0..5 {
            assert_eq!(tree.matches(&format!("left: c{i} default")).count(), 1, "{tree}");
        }
        assert!(!tree.contains("(cycle)"), "{tree}");
    }

    #[test]
    fn wrapping_saturates_instead_of_overflowing() {
        let widget = SceneWidget {
            natural: Size::new(2_000_000_000, 10),
            wrap: true,
            bounds: Rect::default(),
        };
        assert_eq!(
            widget.compute_size(Hints::new(Some(1), None), false),
            Size::new(1, i32::MAX)
        );

        let scene = r#"
            container = { width = 100, height = 100 }
            [[control]]
            name = "text"
            size = { width = 2_000_000_000, height = 10 }
            wrap = true
            left = { offset = 0 }
            right = { offset = 1 }
            top = { offset = 5 }
        "#;
        let mut scene = SceneFile::parse_toml(scene).unwrap().build(FormLayoutSettings::default()).unwrap();
        assert_eq!(scene.solve(), Err(LayoutError::Overflow));
    }

    #[test]
    fn negative_scene_margins_are_reset() {
        let scene = r#"
            container = { width = 100, height = 100 }
            [layout]
            margin_width = -5
            margin_top = -3
            [[control]]
            name = "a"
            size = { width = 10, height = 10 }
            left = { offset = 0 }
            top = { offset = 0 }
        "#;
        let mut scene = SceneFile::parse_toml(scene).unwrap().build(FormLayoutSettings::default()).unwrap();
        assert_eq!(placements(&mut scene), vec![("a".to_string(), Rect::new(0, 0, 10, 10))]);
    }
}
