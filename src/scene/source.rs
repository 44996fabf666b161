use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::{
    foundation::error::HoldResult,
    scene::model::{Action, Channel, Scene},
};

/// What kind of datablock an [`AnimatedEntity`] is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    /// Scene object.
    Object,
    /// Modifier on an object.
    Modifier,
    /// Material.
    Material,
    /// Shader node tree of a material.
    NodeTree,
}

/// Borrowed view of one datablock that carries animation channels.
#[derive(Clone, Debug)]
pub struct AnimatedEntity<'a> {
    /// Datablock kind.
    pub kind: EntityKind,
    /// Stable key, unique across the whole source.
    pub key: Cow<'a, str>,
    /// Channels bound to the datablock.
    pub channels: &'a [Channel],
}

/// Read-only access to every animated datablock of a host.
pub trait AnimationSource {
    /// Every entity that carries animation, nested entities flattened.
    fn animated_entities(&self) -> Vec<AnimatedEntity<'_>>;

    /// Value of `channel` on `entity` at `time`.
    fn evaluate(
        &self,
        entity: &AnimatedEntity<'_>,
        channel: &Channel,
        time: f64,
    ) -> HoldResult<f64> {
        let _ = entity;
        Ok(channel.curve.evaluate(time))
    }
}

impl<T: AnimationSource + ?Sized> AnimationSource for &T {
    fn animated_entities(&self) -> Vec<AnimatedEntity<'_>> {
        (**self).animated_entities()
    }

    fn evaluate(
        &self,
        entity: &AnimatedEntity<'_>,
        channel: &Channel,
        time: f64,
    ) -> HoldResult<f64> {
        (**self).evaluate(entity, channel, time)
    }
}

fn push_entity<'a>(
    out: &mut Vec<AnimatedEntity<'a>>,
    kind: EntityKind,
    key: Cow<'a, str>,
    action: Option<&'a Action>,
) {
    if let Some(action) = action {
        out.push(AnimatedEntity {
            kind,
            key,
            channels: &action.channels,
        });
    }
}

impl AnimationSource for Scene {
    /// Objects, their modifiers, the materials in their slots, and node trees of materials that
    /// use nodes. Shared materials are listed once; empty slots are skipped.
    fn animated_entities(&self) -> Vec<AnimatedEntity<'_>> {
        let mut out = Vec::new();
        let mut seen_materials = BTreeSet::new();

        for obj in &self.objects {
            push_entity(
                &mut out,
                EntityKind::Object,
                Cow::Borrowed(obj.name.as_str()),
                obj.animation.as_ref(),
            );

            for m in &obj.modifiers {
                push_entity(
                    &mut out,
                    EntityKind::Modifier,
                    Cow::Owned(format!("{}/{}", obj.name, m.name)),
                    m.animation.as_ref(),
                );
            }

            for name in obj.material_slots.iter().flatten() {
                let Some(material) = self.materials.get(name) else {
                    continue;
                };
                if !seen_materials.insert(name.as_str()) {
                    continue;
                }
                push_entity(
                    &mut out,
                    EntityKind::Material,
                    Cow::Borrowed(name.as_str()),
                    material.animation.as_ref(),
                );
                if material.use_nodes
                    && let Some(tree) = &material.node_tree
                {
                    push_entity(
                        &mut out,
                        EntityKind::NodeTree,
                        Cow::Owned(format!("{name}/{}", tree.name)),
                        tree.animation.as_ref(),
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/source.rs"]
mod tests;
