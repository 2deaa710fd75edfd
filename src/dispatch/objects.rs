//! Object lifetime and framebuffer attachments.
//!
//! Names are created and deleted by the driver first, then the caches follow: new
//! vertex arrays get a record, and every binding of a deleted object falls back to 0
//! the way the driver unbinds it.

use gl::types::*;

use super::{framebuffer_bits, invalid_enum};
use crate::bindings::ObjectKind;
use crate::context::{Context, SyncRequest};
use crate::driver::Driver;
use crate::errors::*;
use crate::state::SyncBits;

impl<D: Driver> Context<D> {
    pub fn gen_buffers(&mut self, ids: &mut [GLuint]) {
        self.driver.gen_buffers(ids);
        self.buffers.on_objects_created(ids);
    }

    pub fn delete_buffers(&mut self, ids: &[GLuint]) {
        self.driver.delete_buffers(ids);
        self.buffers.on_objects_deleted(ids);
        let bound = self.state.committed_vertex_array();
        self.vaos.on_buffers_deleted(ids, bound);
    }

    pub fn gen_textures(&mut self, ids: &mut [GLuint]) {
        self.driver.gen_textures(ids);
        self.textures.on_objects_created(ids);
    }

    pub fn delete_textures(&mut self, ids: &[GLuint]) {
        self.driver.delete_textures(ids);
        self.textures.on_objects_deleted(ids);
        self.registry.on_textures_deleted(ids);
    }

    pub fn gen_samplers(&mut self, ids: &mut [GLuint]) {
        self.driver.gen_samplers(ids);
        self.samplers.on_objects_created(ids);
    }

    pub fn delete_samplers(&mut self, ids: &[GLuint]) {
        self.driver.delete_samplers(ids);
        self.samplers.on_objects_deleted(ids);
    }

    pub fn gen_framebuffers(&mut self, ids: &mut [GLuint]) {
        self.driver.gen_framebuffers(ids);
    }

    pub fn delete_framebuffers(&mut self, ids: &[GLuint]) {
        self.driver.delete_framebuffers(ids);
        self.state.on_objects_deleted(ObjectKind::Framebuffer, ids);
    }

    pub fn gen_renderbuffers(&mut self, ids: &mut [GLuint]) {
        self.driver.gen_renderbuffers(ids);
    }

    pub fn delete_renderbuffers(&mut self, ids: &[GLuint]) {
        self.driver.delete_renderbuffers(ids);
        self.state.on_objects_deleted(ObjectKind::Renderbuffer, ids);
    }

    pub fn gen_vertex_arrays(&mut self, ids: &mut [GLuint]) {
        self.driver.gen_vertex_arrays(ids);
        self.vaos.on_objects_created(ids);
    }

    pub fn delete_vertex_arrays(&mut self, ids: &[GLuint]) {
        self.driver.delete_vertex_arrays(ids);
        self.state.on_objects_deleted(ObjectKind::VertexArray, ids);
        self.vaos.on_objects_deleted(ids);
    }

    pub fn delete_program(&mut self, program: GLuint) {
        self.driver.delete_program(program);
        self.state.on_objects_deleted(ObjectKind::Program, &[program]);
    }

    pub fn framebuffer_texture_2d(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        textarget: GLenum,
        texture: GLuint,
        level: GLint,
    ) -> Result<()> {
        self.sync(SyncRequest::state(framebuffer_bits(target)?));
        self.driver
            .framebuffer_texture_2d(target, attachment, textarget, texture, level);
        Ok(())
    }

    pub fn framebuffer_renderbuffer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    ) -> Result<()> {
        self.sync(SyncRequest::state(framebuffer_bits(target)?));
        self.driver.framebuffer_renderbuffer(
            target,
            attachment,
            renderbuffer_target,
            renderbuffer,
        );
        Ok(())
    }

    pub fn check_framebuffer_status(&mut self, target: GLenum) -> Result<GLenum> {
        self.sync(SyncRequest::state(framebuffer_bits(target)?));
        Ok(self.driver.check_framebuffer_status(target))
    }

    /// Selects the color buffers of the draw framebuffer drawn into.
    pub fn draw_buffers(&mut self, buffers: &[GLenum]) {
        self.sync(SyncRequest::state(SyncBits::DRAW_FRAMEBUFFER));
        self.driver.draw_buffers(buffers);
    }

    /// Selects the color buffer of the read framebuffer read from.
    pub fn read_buffer(&mut self, mode: GLenum) {
        self.sync(SyncRequest::state(SyncBits::READ_FRAMEBUFFER));
        self.driver.read_buffer(mode);
    }

    pub fn renderbuffer_storage(
        &mut self,
        target: GLenum,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) -> Result<()> {
        if target != gl::RENDERBUFFER {
            return Err(invalid_enum("renderbuffer target", target));
        }

        self.sync(SyncRequest::state(SyncBits::RENDERBUFFER));
        self.driver
            .renderbuffer_storage(target, internal_format, width, height);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bindings::TextureTarget;
    use crate::driver::{Call, HeadlessDriver};
    use crate::settings::ContextSettings;
    use crate::state::{Property, PropertyValue};

    fn setup() -> Context<HeadlessDriver> {
        let mut ctx = Context::new(HeadlessDriver::new(), ContextSettings::default()).unwrap();
        ctx.driver_mut().clear_calls();
        ctx
    }

    #[test]
    fn deleting_the_bound_vertex_array() {
        let mut ctx = setup();
        let mut ids = [0; 2];
        ctx.gen_vertex_arrays(&mut ids);
        ctx.bind_vertex_array(ids[1]).unwrap();
        ctx.draw_arrays(gl::TRIANGLES, 0, 3);
        assert_eq!(ctx.driver().bindings().vertex_array, ids[1]);

        ctx.delete_vertex_arrays(&ids[1..]);
        assert_eq!(ctx.state().vertex_array(), 0);
        assert!(!ctx.vertex_arrays().contains(ids[1]));
        assert!(ctx.bind_vertex_array(ids[1]).is_err());

        ctx.driver_mut().clear_calls();
        ctx.draw_arrays(gl::TRIANGLES, 0, 3);
        assert_eq!(ctx.driver().calls(), &[Call::DrawArrays(gl::TRIANGLES, 0, 3)]);
    }

    #[test]
    fn deleting_a_pending_binding() {
        let mut ctx = setup();
        let mut ids = [0; 1];
        ctx.gen_textures(&mut ids);
        ctx.bind_texture(gl::TEXTURE_2D, ids[0]).unwrap();
        ctx.delete_textures(&ids);

        assert_eq!(
            ctx.textures().get_binding(0, TextureTarget::Texture2D).unwrap(),
            0
        );

        ctx.driver_mut().clear_calls();
        ctx.draw_arrays(gl::POINTS, 0, 1);
        assert_eq!(ctx.driver().count(|v| match *v {
            Call::BindTexture(..) => true,
            _ => false,
        }), 0);
    }

    #[test]
    fn deleting_buffers() {
        let mut ctx = setup();
        let mut ids = [0; 2];
        ctx.gen_buffers(&mut ids);
        ctx.bind_buffer(gl::ARRAY_BUFFER, ids[0]).unwrap();
        ctx.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, ids[1]).unwrap();
        ctx.draw_elements(gl::TRIANGLES, 3, gl::UNSIGNED_SHORT, 0);

        ctx.delete_buffers(&ids);
        assert_eq!(ctx.vertex_arrays().record(0).unwrap().element_buffer(), 0);
        assert_eq!(
            ctx.buffers().get_binding(crate::bindings::BufferTarget::Array),
            0
        );
    }

    #[test]
    fn framebuffer_commands_commit_their_binding() {
        let mut ctx = setup();
        let mut ids = [0; 1];
        ctx.gen_framebuffers(&mut ids);
        ctx.bind_framebuffer(gl::DRAW_FRAMEBUFFER, ids[0]).unwrap();
        ctx.bind_framebuffer(gl::READ_FRAMEBUFFER, ids[0]).unwrap();

        ctx.driver_mut().clear_calls();
        ctx.framebuffer_texture_2d(gl::DRAW_FRAMEBUFFER, gl::COLOR_ATTACHMENT0, gl::TEXTURE_2D, 3, 0)
            .unwrap();
        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindFramebuffer(gl::DRAW_FRAMEBUFFER, ids[0]),
                Call::FramebufferTexture2D(gl::DRAW_FRAMEBUFFER, gl::COLOR_ATTACHMENT0, gl::TEXTURE_2D, 3, 0),
            ]
        );

        assert!(ctx.state().is_dirty(SyncBits::READ_FRAMEBUFFER));
        assert_eq!(ctx.check_framebuffer_status(gl::FRAMEBUFFER).unwrap(), gl::FRAMEBUFFER_COMPLETE);
        assert!(!ctx.state().is_dirty(SyncBits::READ_FRAMEBUFFER));

        ctx.delete_framebuffers(&ids);
        assert_eq!(
            ctx.state().get_property(Property::DrawFramebuffer),
            PropertyValue::UInt(0)
        );
        assert!(ctx.framebuffer_renderbuffer(gl::TEXTURE_2D, 0, 0, 0).is_err());
    }

    #[test]
    fn renderbuffers() {
        let mut ctx = setup();
        let mut ids = [0; 1];
        ctx.gen_renderbuffers(&mut ids);
        ctx.bind_renderbuffer(gl::RENDERBUFFER, ids[0]).unwrap();

        ctx.driver_mut().clear_calls();
        ctx.renderbuffer_storage(gl::RENDERBUFFER, gl::DEPTH24_STENCIL8, 64, 64)
            .unwrap();
        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindRenderbuffer(gl::RENDERBUFFER, ids[0]),
                Call::RenderbufferStorage(gl::RENDERBUFFER, gl::DEPTH24_STENCIL8, 64, 64),
            ]
        );

        ctx.delete_renderbuffers(&ids);
        assert_eq!(
            ctx.state().get_property(Property::Renderbuffer),
            PropertyValue::UInt(0)
        );
        assert!(!ctx.state().is_dirty(SyncBits::RENDERBUFFER));
    }
}
