//! Translation from raw object names to what the rest of the engine knows about them.

use std::collections::HashMap;

use gl::types::*;

use crate::bindings::TextureTarget;

/// The backend registry the context consults when a command names an object but the
/// cache needs more than its name.
pub trait ResourceRegistry {
    /// The target `texture` was created for.
    fn texture_target(&self, texture: GLuint) -> Option<TextureTarget>;

    /// Called whenever `texture` is bound to `target`.
    fn on_texture_bound(&mut self, _texture: GLuint, _target: TextureTarget) {}

    fn on_textures_deleted(&mut self, _ids: &[GLuint]) {}
}

/// A registry learning the target of each texture from its first binding, which is
/// what fixes the target of a texture in the driver as well.
#[derive(Debug, Default, Clone)]
pub struct TextureTargets {
    targets: HashMap<GLuint, TextureTarget>,
}

impl TextureTargets {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl ResourceRegistry for TextureTargets {
    fn texture_target(&self, texture: GLuint) -> Option<TextureTarget> {
        self.targets.get(&texture).cloned()
    }

    fn on_texture_bound(&mut self, texture: GLuint, target: TextureTarget) {
        if texture != 0 {
            self.targets.entry(texture).or_insert(target);
        }
    }

    fn on_textures_deleted(&mut self, ids: &[GLuint]) {
        for id in ids {
            self.targets.remove(id);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn learns_targets() {
        let mut registry = TextureTargets::new();
        registry.on_texture_bound(0, TextureTarget::Texture2D);
        assert!(registry.is_empty());

        registry.on_texture_bound(3, TextureTarget::CubeMap);
        registry.on_texture_bound(3, TextureTarget::Texture2D);
        assert_eq!(registry.texture_target(3), Some(TextureTarget::CubeMap));
        assert_eq!(registry.texture_target(4), None);

        registry.on_textures_deleted(&[3]);
        assert_eq!(registry.len(), 0);
    }
}
