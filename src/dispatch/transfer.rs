//! Buffer and texture data transfers, texture parameters and uniform uploads.

use std::os::raw::c_void;

use gl::types::*;

use super::{buffer_request, texture_request, upload_request};
use crate::context::{Context, SyncRequest};
use crate::driver::{Driver, Pixels};
use crate::errors::*;
use crate::state::SyncBits;

impl<D: Driver> Context<D> {
    pub fn buffer_data(
        &mut self,
        target: GLenum,
        size: GLsizeiptr,
        data: Option<&[u8]>,
        usage: GLenum,
    ) -> Result<()> {
        self.sync(buffer_request(target)?);
        self.driver.buffer_data(target, size, data, usage);
        Ok(())
    }

    pub fn buffer_sub_data(&mut self, target: GLenum, offset: GLintptr, data: &[u8]) -> Result<()> {
        self.sync(buffer_request(target)?);
        self.driver.buffer_sub_data(target, offset, data);
        Ok(())
    }

    pub fn get_buffer_sub_data(&mut self, target: GLenum, offset: GLintptr, data: &mut [u8]) -> Result<()> {
        self.sync(buffer_request(target)?);
        self.driver.get_buffer_sub_data(target, offset, data);
        Ok(())
    }

    pub fn map_buffer_range(
        &mut self,
        target: GLenum,
        offset: GLintptr,
        length: GLsizeiptr,
        access: GLbitfield,
    ) -> Result<*mut c_void> {
        self.sync(buffer_request(target)?);
        Ok(self.driver.map_buffer_range(target, offset, length, access))
    }

    pub fn unmap_buffer(&mut self, target: GLenum) -> Result<bool> {
        self.sync(buffer_request(target)?);
        Ok(self.driver.unmap_buffer(target))
    }

    pub fn copy_buffer_sub_data(
        &mut self,
        read_target: GLenum,
        write_target: GLenum,
        read_offset: GLintptr,
        write_offset: GLintptr,
        size: GLsizeiptr,
    ) -> Result<()> {
        let read = buffer_request(read_target)?;
        let write = buffer_request(write_target)?;

        let mut request = read.with_buffers(write.buffers);
        request.element_buffer |= write.element_buffer;

        self.sync(request);
        self.driver.copy_buffer_sub_data(
            read_target,
            write_target,
            read_offset,
            write_offset,
            size,
        );
        Ok(())
    }

    pub fn tex_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: Pixels,
    ) -> Result<()> {
        self.sync(upload_request(target)?);
        self.driver.tex_image_2d(
            target,
            level,
            internal_format,
            width,
            height,
            format,
            ty,
            pixels,
        );
        Ok(())
    }

    pub fn tex_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: Pixels,
    ) -> Result<()> {
        self.sync(upload_request(target)?);
        self.driver.tex_image_3d(
            target,
            level,
            internal_format,
            width,
            height,
            depth,
            format,
            ty,
            pixels,
        );
        Ok(())
    }

    pub fn tex_sub_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: Pixels,
    ) -> Result<()> {
        self.sync(upload_request(target)?);
        self.driver.tex_sub_image_2d(
            target,
            level,
            xoffset,
            yoffset,
            width,
            height,
            format,
            ty,
            pixels,
        );
        Ok(())
    }

    pub fn tex_sub_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        offset: [GLint; 3],
        size: [GLsizei; 3],
        format: GLenum,
        ty: GLenum,
        pixels: Pixels,
    ) -> Result<()> {
        self.sync(upload_request(target)?);
        self.driver
            .tex_sub_image_3d(target, level, offset, size, format, ty, pixels);
        Ok(())
    }

    pub fn tex_storage_2d(
        &mut self,
        target: GLenum,
        levels: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) -> Result<()> {
        self.sync(texture_request(target)?);
        self.driver
            .tex_storage_2d(target, levels, internal_format, width, height);
        Ok(())
    }

    pub fn tex_storage_3d(
        &mut self,
        target: GLenum,
        levels: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
    ) -> Result<()> {
        self.sync(texture_request(target)?);
        self.driver
            .tex_storage_3d(target, levels, internal_format, width, height, depth);
        Ok(())
    }

    /// Copies from the read framebuffer into the texture bound to `target`.
    pub fn copy_tex_sub_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
    ) -> Result<()> {
        self.sync(texture_request(target)?.with_state(SyncBits::READ_FRAMEBUFFER));
        self.driver
            .copy_tex_sub_image_2d(target, level, xoffset, yoffset, x, y, width, height);
        Ok(())
    }

    pub fn tex_parameter_i(&mut self, target: GLenum, pname: GLenum, value: GLint) -> Result<()> {
        self.sync(texture_request(target)?);
        self.driver.tex_parameter_i(target, pname, value);
        Ok(())
    }

    pub fn tex_parameter_f(&mut self, target: GLenum, pname: GLenum, value: f32) -> Result<()> {
        self.sync(texture_request(target)?);
        self.driver.tex_parameter_f(target, pname, value);
        Ok(())
    }

    pub fn generate_mipmap(&mut self, target: GLenum) -> Result<()> {
        self.sync(texture_request(target)?);
        self.driver.generate_mipmap(target);
        Ok(())
    }

    /// Sampler objects are named directly, nothing has to be committed.
    pub fn sampler_parameter_i(&mut self, sampler: GLuint, pname: GLenum, value: GLint) {
        self.driver.sampler_parameter_i(sampler, pname, value);
    }

    pub fn uniform_1i(&mut self, location: GLint, value: GLint) {
        self.sync(SyncRequest::state(SyncBits::PROGRAM_OBJECT));
        self.driver.uniform_1i(location, value);
    }

    pub fn uniform_1f(&mut self, location: GLint, value: f32) {
        self.sync(SyncRequest::state(SyncBits::PROGRAM_OBJECT));
        self.driver.uniform_1f(location, value);
    }

    pub fn uniform_4fv(&mut self, location: GLint, value: &[f32]) {
        self.sync(SyncRequest::state(SyncBits::PROGRAM_OBJECT));
        self.driver.uniform_4fv(location, value);
    }

    pub fn uniform_matrix_4fv(&mut self, location: GLint, transpose: bool, value: &[f32]) {
        self.sync(SyncRequest::state(SyncBits::PROGRAM_OBJECT));
        self.driver
            .uniform_matrix_4fv(location, transpose, value);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::driver::{Call, HeadlessDriver};
    use crate::settings::ContextSettings;

    fn setup() -> Context<HeadlessDriver> {
        let mut ctx = Context::new(HeadlessDriver::new(), ContextSettings::default()).unwrap();
        ctx.driver_mut().clear_calls();
        ctx
    }

    #[test]
    fn buffer_transfers_commit_their_target() {
        let mut ctx = setup();
        ctx.bind_buffer(gl::ARRAY_BUFFER, 1).unwrap();
        ctx.bind_buffer(gl::UNIFORM_BUFFER, 2).unwrap();

        ctx.buffer_data(gl::ARRAY_BUFFER, 64, None, gl::STATIC_DRAW)
            .unwrap();
        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindBuffer(gl::ARRAY_BUFFER, 1),
                Call::BufferData(gl::ARRAY_BUFFER, 64, gl::STATIC_DRAW),
            ]
        );

        ctx.driver_mut().clear_calls();
        ctx.bind_buffer(gl::COPY_READ_BUFFER, 1).unwrap();
        ctx.copy_buffer_sub_data(gl::COPY_READ_BUFFER, gl::UNIFORM_BUFFER, 0, 0, 16)
            .unwrap();
        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindBuffer(gl::COPY_READ_BUFFER, 1),
                Call::BindBuffer(gl::UNIFORM_BUFFER, 2),
                Call::CopyBufferSubData(gl::COPY_READ_BUFFER, gl::UNIFORM_BUFFER, 0, 0, 16),
            ]
        );

        assert!(ctx.buffer_data(gl::TEXTURE_2D, 4, None, gl::STATIC_DRAW).is_err());
    }

    #[test]
    fn element_buffer_transfers_go_through_the_vertex_array() {
        let mut ctx = setup();
        let mut vao = [0];
        ctx.gen_vertex_arrays(&mut vao);
        ctx.bind_vertex_array(vao[0]).unwrap();
        ctx.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, 7).unwrap();

        ctx.driver_mut().clear_calls();
        ctx.buffer_sub_data(gl::ELEMENT_ARRAY_BUFFER, 0, &[0; 6])
            .unwrap();
        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindVertexArray(vao[0]),
                Call::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 7),
                Call::BufferSubData(gl::ELEMENT_ARRAY_BUFFER, 0, 6),
            ]
        );
    }

    #[test]
    fn uploads_go_to_the_active_unit() {
        let mut ctx = setup();
        ctx.active_texture(gl::TEXTURE1).unwrap();
        ctx.bind_texture(gl::TEXTURE_2D, 4).unwrap();
        ctx.bind_buffer(gl::PIXEL_UNPACK_BUFFER, 3).unwrap();

        ctx.tex_sub_image_2d(
            gl::TEXTURE_2D,
            0,
            0,
            0,
            2,
            2,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            Pixels::Offset(0),
        ).unwrap();

        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindBuffer(gl::PIXEL_UNPACK_BUFFER, 3),
                Call::ActiveTexture(gl::TEXTURE1),
                Call::BindTexture(gl::TEXTURE_2D, 4),
                Call::TexSubImage2D(gl::TEXTURE_2D, 0, [0, 0], [2, 2], gl::RGBA, gl::UNSIGNED_BYTE),
            ]
        );

        ctx.driver_mut().clear_calls();
        ctx.generate_mipmap(gl::TEXTURE_2D).unwrap();
        assert_eq!(ctx.driver().calls(), &[Call::GenerateMipmap(gl::TEXTURE_2D)]);
        assert!(ctx.generate_mipmap(gl::ARRAY_BUFFER).is_err());
    }

    #[test]
    fn uniforms_commit_the_program() {
        let mut ctx = setup();
        ctx.use_program(5);
        ctx.uniform_1i(0, 2);
        ctx.uniform_4fv(1, &[0.0, 1.0, 2.0, 3.0]);

        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::UseProgram(5),
                Call::Uniform1i(0, 2),
                Call::Uniform4fv(1, vec![0.0, 1.0, 2.0, 3.0]),
            ]
        );
    }
}
