//! Commands which only change state. None of them reaches the driver.

use gl::types::*;

use super::invalid_enum;
use crate::bindings::{BufferRange, BufferTarget, TextureTarget};
use crate::context::Context;
use crate::driver::Driver;
use crate::errors::*;
use crate::state::{Property, PropertyValue, RenderingMode};

impl<D: Driver> Context<D> {
    pub fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        let v = PropertyValue::Float4([red, green, blue, alpha]);
        self.state.store(Property::BlendColor, 0, v);
    }

    pub fn blend_equation(&mut self, mode: GLenum) {
        self.blend_equation_separate(mode, mode);
    }

    pub fn blend_equation_separate(&mut self, mode_rgb: GLenum, mode_alpha: GLenum) {
        let state = &mut self.state;
        state.store(Property::BlendEquationRgb, 0, PropertyValue::Enum(mode_rgb));
        state.store(Property::BlendEquationAlpha, 0, PropertyValue::Enum(mode_alpha));
    }

    pub fn blend_func(&mut self, sfactor: GLenum, dfactor: GLenum) {
        self.blend_func_separate(sfactor, dfactor, sfactor, dfactor);
    }

    pub fn blend_func_separate(
        &mut self,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    ) {
        let state = &mut self.state;
        state.store(Property::BlendFuncSrcRgb, 0, PropertyValue::Enum(src_rgb));
        state.store(Property::BlendFuncDstRgb, 0, PropertyValue::Enum(dst_rgb));
        state.store(Property::BlendFuncSrcAlpha, 0, PropertyValue::Enum(src_alpha));
        state.store(Property::BlendFuncDstAlpha, 0, PropertyValue::Enum(dst_alpha));
    }

    pub fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        let v = PropertyValue::Float4([red, green, blue, alpha]);
        self.state.store(Property::ClearColor, 0, v);
    }

    pub fn clear_depth(&mut self, depth: f64) {
        self.state
            .store(Property::ClearDepth, 0, PropertyValue::Double(depth));
    }

    pub fn clear_stencil(&mut self, s: GLint) {
        self.state.store(Property::ClearStencil, 0, PropertyValue::Int(s));
    }

    pub fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        let v = PropertyValue::Bool4([red, green, blue, alpha]);
        self.state.store(Property::ColorMask, 0, v);
    }

    pub fn depth_mask(&mut self, flag: bool) {
        self.state.store(Property::DepthMask, 0, PropertyValue::Bool(flag));
    }

    pub fn cull_face(&mut self, mode: GLenum) {
        self.state.store(Property::CullFace, 0, PropertyValue::Enum(mode));
    }

    pub fn depth_func(&mut self, func: GLenum) {
        self.state.store(Property::DepthFunc, 0, PropertyValue::Enum(func));
    }

    pub fn front_face(&mut self, mode: GLenum) {
        self.state.store(Property::FrontFace, 0, PropertyValue::Enum(mode));
    }

    pub fn line_width(&mut self, width: f32) {
        self.state.store(Property::LineWidth, 0, PropertyValue::Float(width));
    }

    pub fn min_sample_shading(&mut self, value: f32) {
        self.state
            .store(Property::MinSampleShading, 0, PropertyValue::Float(value));
    }

    pub fn polygon_offset(&mut self, factor: f32, units: f32) {
        let state = &mut self.state;
        state.store(Property::PolygonOffsetFactor, 0, PropertyValue::Float(factor));
        state.store(Property::PolygonOffsetUnits, 0, PropertyValue::Float(units));
    }

    /// Only `GL_PATCH_VERTICES` is accepted.
    pub fn patch_parameter_i(&mut self, pname: GLenum, value: GLint) -> Result<()> {
        if pname != gl::PATCH_VERTICES {
            return Err(invalid_enum("patch parameter", pname));
        }

        self.state
            .store(Property::NPatchVertices, 0, PropertyValue::Int(value));
        Ok(())
    }

    pub fn stencil_func(&mut self, func: GLenum, reference: GLint, mask: GLuint) {
        let state = &mut self.state;
        state.store(Property::StencilFunc, 0, PropertyValue::Enum(func));
        state.store(Property::StencilRef, 0, PropertyValue::Int(reference));
        state.store(Property::StencilValueMask, 0, PropertyValue::UInt(mask));
    }

    pub fn stencil_op(&mut self, sfail: GLenum, dpfail: GLenum, dppass: GLenum) {
        let state = &mut self.state;
        state.store(Property::StencilFail, 0, PropertyValue::Enum(sfail));
        state.store(Property::StencilPassDepthFail, 0, PropertyValue::Enum(dpfail));
        state.store(Property::StencilPassDepthPass, 0, PropertyValue::Enum(dppass));
    }

    pub fn stencil_mask(&mut self, mask: GLuint) {
        self.state
            .store(Property::StencilWriteMask, 0, PropertyValue::UInt(mask));
    }

    pub fn scissor(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        let v = PropertyValue::Int4([x, y, width, height]);
        self.state.store(Property::ScissorBox, 0, v);
    }

    pub fn scissor_indexed(
        &mut self,
        index: GLuint,
        left: GLint,
        bottom: GLint,
        width: GLsizei,
        height: GLsizei,
    ) -> Result<()> {
        let v = PropertyValue::Int4([left, bottom, width, height]);
        self.state.set_indexed_property(Property::ScissorBox, index, v)
    }

    pub fn viewport(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        let v = PropertyValue::Int4([x, y, width, height]);
        self.state.store(Property::Viewport, 0, v);
    }

    /// Viewports are kept in whole pixels, the fractional part is dropped.
    pub fn viewport_indexed(&mut self, index: GLuint, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        let v = PropertyValue::Int4([x as GLint, y as GLint, w as GLint, h as GLint]);
        self.state.set_indexed_property(Property::Viewport, index, v)
    }

    pub fn use_program(&mut self, program: GLuint) {
        self.state
            .store(Property::ProgramObject, 0, PropertyValue::UInt(program));
    }

    pub fn bind_vertex_array(&mut self, array: GLuint) -> Result<()> {
        if !self.vaos.contains(array) {
            warn!("Rejected unknown vertex array object {}.", array);
            return Err(Error::UnknownVertexArray(array));
        }

        self.state
            .store(Property::VertexArrayObject, 0, PropertyValue::UInt(array));
        Ok(())
    }

    /// Selects the texture unit, `texture` is `GL_TEXTURE0 + unit`.
    pub fn active_texture(&mut self, texture: GLenum) -> Result<()> {
        let unit = texture.wrapping_sub(gl::TEXTURE0);
        if texture < gl::TEXTURE0 || unit >= self.textures.units() {
            return Err(invalid_enum("texture unit", texture));
        }

        self.state
            .store(Property::TextureUnit, 0, PropertyValue::UInt(unit));
        Ok(())
    }

    pub fn bind_framebuffer(&mut self, target: GLenum, framebuffer: GLuint) -> Result<()> {
        let v = PropertyValue::UInt(framebuffer);
        match target {
            gl::DRAW_FRAMEBUFFER => self.state.store(Property::DrawFramebuffer, 0, v),
            gl::READ_FRAMEBUFFER => self.state.store(Property::ReadFramebuffer, 0, v),
            gl::FRAMEBUFFER => {
                self.state.store(Property::DrawFramebuffer, 0, v);
                self.state.store(Property::ReadFramebuffer, 0, v);
            }
            _ => return Err(invalid_enum("framebuffer target", target)),
        }

        Ok(())
    }

    pub fn bind_renderbuffer(&mut self, target: GLenum, renderbuffer: GLuint) -> Result<()> {
        if target != gl::RENDERBUFFER {
            return Err(invalid_enum("renderbuffer target", target));
        }

        self.state
            .store(Property::Renderbuffer, 0, PropertyValue::UInt(renderbuffer));
        Ok(())
    }

    /// Binds a buffer. Element array buffers are bound to the vertex array in use.
    pub fn bind_buffer(&mut self, target: GLenum, buffer: GLuint) -> Result<()> {
        if target == gl::ELEMENT_ARRAY_BUFFER {
            let vao = self.state.vertex_array();
            return self.vaos.set_element_buffer(vao, buffer);
        }

        let target = BufferTarget::from_gl(target)
            .ok_or_else(|| invalid_enum("buffer target", target))?;
        self.buffers.set_binding(target, buffer);
        Ok(())
    }

    pub fn bind_buffer_base(&mut self, target: GLenum, index: GLuint, buffer: GLuint) -> Result<()> {
        let target = BufferTarget::from_gl(target)
            .ok_or_else(|| invalid_enum("buffer target", target))?;
        self.buffers
            .set_indexed_binding(target, index, BufferRange::whole(buffer))
    }

    pub fn bind_buffer_range(
        &mut self,
        target: GLenum,
        index: GLuint,
        buffer: GLuint,
        offset: GLintptr,
        size: GLsizeiptr,
    ) -> Result<()> {
        let target = BufferTarget::from_gl(target)
            .ok_or_else(|| invalid_enum("buffer target", target))?;
        let range = BufferRange {
            buffer,
            offset,
            size,
        };

        self.buffers.set_indexed_binding(target, index, range)
    }

    /// Binds `texture` to `target` of the active texture unit.
    pub fn bind_texture(&mut self, target: GLenum, texture: GLuint) -> Result<()> {
        let target = TextureTarget::from_gl(target)
            .filter(|v| v.gl() == target)
            .ok_or_else(|| invalid_enum("texture target", target))?;

        let unit = self.active_unit();
        self.textures.set_binding(unit, target, texture)?;
        self.registry.on_texture_bound(texture, target);
        Ok(())
    }

    /// Binds `textures` to consecutive units starting at `first`, each to the target it
    /// was created for. A 0 unbinds every target of its unit.
    pub fn bind_textures(&mut self, first: GLuint, textures: &[GLuint]) -> Result<()> {
        let end = first as usize + textures.len();
        if end > self.textures.units() as usize {
            warn!("Rejected binding {} textures from unit {}.", textures.len(), first);
            return Err(Error::IndexOutOfRange {
                what: "texture unit",
                index: end as u32 - 1,
                limit: self.textures.units(),
            });
        }

        let mut targets = Vec::with_capacity(textures.len());
        for &texture in textures {
            if texture == 0 {
                targets.push(None);
                continue;
            }

            match self.registry.texture_target(texture) {
                Some(target) => targets.push(Some(target)),
                None => {
                    warn!("Rejected texture {} of unknown target.", texture);
                    return Err(Error::UnknownTexture(texture));
                }
            }
        }

        for (unit, (&texture, target)) in (first..).zip(textures.iter().zip(targets)) {
            match target {
                Some(target) => self.textures.set_binding(unit, target, texture)?,
                None => self.textures.clear_unit(unit)?,
            }
        }

        Ok(())
    }

    pub fn bind_sampler(&mut self, unit: GLuint, sampler: GLuint) -> Result<()> {
        self.samplers.set_binding(unit, sampler)
    }

    pub fn enable(&mut self, cap: GLenum) -> Result<()> {
        self.set_capability(cap, true)
    }

    pub fn disable(&mut self, cap: GLenum) -> Result<()> {
        self.set_capability(cap, false)
    }

    /// Only index 0 of the indexed capabilities is supported.
    pub fn enablei(&mut self, cap: GLenum, index: GLuint) -> Result<()> {
        check_capability_index(index)?;
        self.set_capability(cap, true)
    }

    /// Only index 0 of the indexed capabilities is supported.
    pub fn disablei(&mut self, cap: GLenum, index: GLuint) -> Result<()> {
        check_capability_index(index)?;
        self.set_capability(cap, false)
    }

    fn set_capability(&mut self, cap: GLenum, enabled: bool) -> Result<()> {
        let mode = RenderingMode::from_capability(cap)
            .ok_or_else(|| invalid_enum("capability", cap))?;
        self.state.set_rendering_mode(mode, enabled);
        Ok(())
    }
}

fn check_capability_index(index: GLuint) -> Result<()> {
    if index != 0 {
        warn!("Rejected capability index {}.", index);
        return Err(Error::UnsupportedIndex {
            what: "capability",
            index,
        });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::context::{Context, SyncRequest};
    use crate::driver::{Call, HeadlessDriver};
    use crate::settings::ContextSettings;
    use crate::state::{Property, PropertyValue, RenderingMode, SyncBits};

    fn setup() -> Context<HeadlessDriver> {
        let mut ctx = Context::new(HeadlessDriver::new(), ContextSettings::default()).unwrap();
        ctx.driver_mut().clear_calls();
        ctx
    }

    #[test]
    fn setters_stay_in_cache() {
        let mut ctx = setup();
        ctx.blend_func(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        ctx.blend_equation(gl::FUNC_SUBTRACT);
        ctx.cull_face(gl::FRONT);
        ctx.depth_mask(false);
        ctx.viewport(0, 0, 320, 240);
        ctx.use_program(3);
        ctx.stencil_func(gl::EQUAL, 1, 0xFF);
        ctx.enable(gl::BLEND).unwrap();
        ctx.bind_framebuffer(gl::FRAMEBUFFER, 2).unwrap();
        ctx.bind_buffer(gl::ARRAY_BUFFER, 4).unwrap();
        ctx.bind_texture(gl::TEXTURE_2D, 5).unwrap();
        ctx.patch_parameter_i(gl::PATCH_VERTICES, 4).unwrap();

        assert!(ctx.driver().calls().is_empty());
        assert_eq!(
            ctx.state().get_property(Property::ReadFramebuffer),
            PropertyValue::UInt(2)
        );
        assert!(ctx.state().rendering_mode(RenderingMode::Blend));
    }

    #[test]
    fn blend_equation_separate_keeps_channels() {
        let mut ctx = setup();
        ctx.blend_equation_separate(gl::FUNC_ADD, gl::MAX);
        assert_eq!(
            ctx.state().get_property(Property::BlendEquationAlpha),
            PropertyValue::Enum(gl::MAX)
        );

        ctx.sync(SyncRequest::state(SyncBits::BLENDING));
        assert_eq!(
            ctx.driver().calls(),
            &[Call::BlendEquationSeparate(gl::FUNC_ADD, gl::MAX)]
        );
    }

    #[test]
    fn rejects_unknown_enums() {
        let mut ctx = setup();
        assert!(ctx.enable(gl::TEXTURE_2D).is_err());
        assert!(ctx.enablei(gl::BLEND, 1).is_err());
        assert!(!ctx.state().rendering_mode(RenderingMode::Blend));
        assert!(ctx.enablei(gl::BLEND, 0).is_ok());

        assert!(ctx.bind_framebuffer(gl::RENDERBUFFER, 1).is_err());
        assert!(ctx.bind_buffer(gl::TEXTURE_2D, 1).is_err());
        assert!(ctx.bind_texture(gl::TEXTURE_CUBE_MAP_POSITIVE_X, 1).is_err());
        assert!(ctx.active_texture(gl::TEXTURE0 + 80).is_err());
        assert!(ctx.active_texture(0).is_err());
        assert!(ctx.bind_vertex_array(12).is_err());
        assert!(ctx.patch_parameter_i(gl::PATCH_DEFAULT_INNER_LEVEL, 1).is_err());
        assert!(ctx.state().dirty_bits() == SyncBits::RENDERING_MODES);
    }

    #[test]
    fn bind_textures_uses_registry() {
        let mut ctx = setup();
        ctx.bind_texture(gl::TEXTURE_3D, 6).unwrap();
        ctx.bind_texture(gl::TEXTURE_CUBE_MAP, 7).unwrap();

        ctx.bind_textures(2, &[7, 0, 6]).unwrap();
        let textures = ctx.textures();
        assert_eq!(textures.get_binding(2, crate::bindings::TextureTarget::CubeMap).unwrap(), 7);
        assert_eq!(textures.get_binding(4, crate::bindings::TextureTarget::Texture3D).unwrap(), 6);

        assert!(ctx.bind_textures(0, &[9]).is_err());
        assert!(ctx.bind_textures(79, &[6, 6]).is_err());
    }
}
