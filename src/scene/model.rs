use std::collections::BTreeMap;
use std::path::Path;

use crate::{
    animation::curve::Curve,
    foundation::core::{Canvas, Fps, FrameIndex, FrameRange},
    foundation::error::{HoldError, HoldResult},
    foundation::time_scope::TimeCursor,
};

/// A scene: timeline settings plus the animated datablocks it references.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    /// Scene name; also names the per-scene output folder.
    pub name: String,
    /// Playback rate used when stitching.
    #[serde(default)]
    pub fps: Fps,
    /// Render resolution.
    #[serde(default)]
    pub canvas: Canvas,
    /// First frame of the render range.
    pub frame_start: i64,
    /// Last frame of the render range (inclusive).
    pub frame_end: i64,
    /// Playback cursor.
    #[serde(default)]
    pub frame_current: i64,
    /// Straight-alpha RGBA8 clear color.
    #[serde(default = "default_background")]
    pub background: [u8; 4],
    /// Objects in draw order.
    #[serde(default)]
    pub objects: Vec<Object>,
    /// Materials by name, referenced from object slots.
    #[serde(default)]
    pub materials: BTreeMap<String, Material>,
}

fn default_background() -> [u8; 4] {
    [18, 20, 28, 255]
}

/// Scene object with its own animation plus nested modifiers and materials.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Object {
    /// Unique object name.
    pub name: String,
    /// Rest transform, overridden per channel by animation.
    #[serde(default)]
    pub transform: Transform,
    /// Object-level animation.
    #[serde(default)]
    pub animation: Option<Action>,
    /// Modifier stack.
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Material slots; `None` is an empty slot.
    #[serde(default)]
    pub material_slots: Vec<Option<String>>,
}

/// Location / rotation / scale triple.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Translation in scene units.
    pub location: [f64; 3],
    /// Euler rotation in radians.
    pub rotation_euler: [f64; 3],
    /// Per-axis scale.
    pub scale: [f64; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation_euler: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

/// Modifier on an object. Only its animation matters here.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Modifier {
    /// Name, unique within the owning object.
    pub name: String,
    /// Modifier animation.
    #[serde(default)]
    pub animation: Option<Action>,
}

/// Material datablock, possibly shared by several objects.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Material {
    /// Linear RGBA in `[0, 1]`.
    #[serde(default = "default_base_color")]
    pub base_color: [f64; 4],
    /// Node tree animation is only considered when set.
    #[serde(default)]
    pub use_nodes: bool,
    /// Shader node tree.
    #[serde(default)]
    pub node_tree: Option<NodeTree>,
    /// Material-level animation.
    #[serde(default)]
    pub animation: Option<Action>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: default_base_color(),
            use_nodes: false,
            node_tree: None,
            animation: None,
        }
    }
}

fn default_base_color() -> [f64; 4] {
    [0.8, 0.8, 0.8, 1.0]
}

/// Shader node tree attached to a material.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct NodeTree {
    /// Tree name.
    pub name: String,
    /// Node tree animation.
    #[serde(default)]
    pub animation: Option<Action>,
}

/// Set of animation channels bound to one datablock.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Action {
    /// Channels (one curve per animated property component).
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl Action {
    /// Sample the channel `data_path[array_index]`, if animated.
    pub fn sample(&self, data_path: &str, array_index: u32, time: f64) -> Option<f64> {
        self.channels
            .iter()
            .find(|c| c.data_path == data_path && c.array_index == array_index)
            .map(|c| c.curve.evaluate(time))
    }
}

/// A single animated property component.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Channel {
    /// RNA-style property path, e.g. `location` or `nodes["Mix"].inputs[0].default_value`.
    pub data_path: String,
    /// Component index for vector properties.
    #[serde(default)]
    pub array_index: u32,
    /// The curve.
    pub curve: Curve,
}

impl Channel {
    /// Build a channel.
    pub fn new(data_path: impl Into<String>, array_index: u32, curve: Curve) -> Self {
        Self {
            data_path: data_path.into(),
            array_index,
            curve,
        }
    }

    /// `data_path[array_index]`, the channel's identity within its owner.
    pub fn path(&self) -> String {
        format!("{}[{}]", self.data_path, self.array_index)
    }
}

/// Sampled drawing state of an object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectPose {
    /// Location x/y in scene units.
    pub location: [f64; 2],
    /// Rotation around z in radians.
    pub rotation: f64,
    /// Scale x/y.
    pub scale: [f64; 2],
    /// Linear RGBA from the first material, white when none.
    pub color: [f64; 4],
}

impl Scene {
    /// Empty scene over `range` with default fps, canvas and background.
    pub fn new(name: impl Into<String>, range: FrameRange) -> Self {
        Self {
            name: name.into(),
            fps: Fps::default(),
            canvas: Canvas::default(),
            frame_start: range.start.0,
            frame_end: range.end.0,
            frame_current: range.start.0,
            background: default_background(),
            objects: Vec::new(),
            materials: BTreeMap::new(),
        }
    }

    /// Parse and validate a scene from JSON text.
    pub fn from_json_str(text: &str) -> HoldResult<Self> {
        let scene: Self = serde_json::from_str(text).map_err(|e| HoldError::serde(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Read, parse and validate a scene JSON file.
    pub fn load(path: &Path) -> HoldResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HoldError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// The scene's own render range.
    pub fn range(&self) -> FrameRange {
        FrameRange::from_bounds(self.frame_start, self.frame_end)
    }

    /// Validate names, material references and every curve.
    pub fn validate(&self) -> HoldResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(HoldError::validation("scene canvas must be non-empty"));
        }
        self.fps.validate()?;
        let mut names = std::collections::BTreeSet::new();
        for obj in &self.objects {
            if !names.insert(obj.name.as_str()) {
                return Err(HoldError::validation(format!(
                    "duplicate object name '{}'",
                    obj.name
                )));
            }
            let mut modifier_names = std::collections::BTreeSet::new();
            for m in &obj.modifiers {
                if !modifier_names.insert(m.name.as_str()) {
                    return Err(HoldError::validation(format!(
                        "object '{}' has duplicate modifier '{}'",
                        obj.name, m.name
                    )));
                }
                validate_action(m.animation.as_ref())?;
            }
            for slot in obj.material_slots.iter().flatten() {
                if !self.materials.contains_key(slot) {
                    return Err(HoldError::validation(format!(
                        "object '{}' references unknown material '{slot}'",
                        obj.name
                    )));
                }
            }
            validate_action(obj.animation.as_ref())?;
        }
        for mat in self.materials.values() {
            validate_action(mat.animation.as_ref())?;
            if let Some(tree) = &mat.node_tree {
                validate_action(tree.animation.as_ref())?;
            }
        }
        Ok(())
    }

    /// Drawing state of `obj` at `time`.
    pub fn pose(&self, obj: &Object, time: f64) -> ObjectPose {
        let rest = obj.transform;
        let sample = |path: &str, i: u32, fallback: f64| {
            obj.animation
                .as_ref()
                .and_then(|a| a.sample(path, i, time))
                .unwrap_or(fallback)
        };

        let material = obj
            .material_slots
            .iter()
            .flatten()
            .find_map(|name| self.materials.get(name));
        let color = match material {
            Some(m) => std::array::from_fn(|i| {
                m.animation
                    .as_ref()
                    .and_then(|a| a.sample("diffuse_color", i as u32, time))
                    .unwrap_or(m.base_color[i])
            }),
            None => [1.0; 4],
        };

        ObjectPose {
            location: [
                sample("location", 0, rest.location[0]),
                sample("location", 1, rest.location[1]),
            ],
            rotation: sample("rotation_euler", 2, rest.rotation_euler[2]),
            scale: [
                sample("scale", 0, rest.scale[0]),
                sample("scale", 1, rest.scale[1]),
            ],
            color,
        }
    }
}

impl TimeCursor for Scene {
    fn current_frame(&self) -> FrameIndex {
        FrameIndex(self.frame_current)
    }

    fn set_current_frame(&mut self, frame: FrameIndex) {
        self.frame_current = frame.0;
    }
}

fn validate_action(action: Option<&Action>) -> HoldResult<()> {
    let Some(action) = action else {
        return Ok(());
    };
    for ch in &action.channels {
        ch.curve
            .validate()
            .map_err(|e| HoldError::validation(format!("channel '{}': {e}", ch.path())))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
