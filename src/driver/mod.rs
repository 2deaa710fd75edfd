//! The driver entry-point table.
//!
//! Everything above this module talks to the GPU exclusively through a `Driver`. The
//! state cache and the binding collaborators use it to commit deferred state, and the
//! dispatch layer uses it to forward the state-consuming calls once the required state
//! has been committed.

pub mod native;
pub mod headless;

use std::os::raw::c_void;

use gl::types::*;

pub use self::native::GlDriver;
pub use self::headless::{Call, HeadlessDriver};

/// Pixel data consumed by an upload, either client memory or an offset into the buffer
/// currently bound to `GL_PIXEL_UNPACK_BUFFER`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pixels<'a> {
    Null,
    Slice(&'a [u8]),
    Offset(usize),
}

/// The destination of a readback, either client memory or an offset into the buffer
/// currently bound to `GL_PIXEL_PACK_BUFFER`.
#[derive(Debug, PartialEq)]
pub enum PixelsMut<'a> {
    Slice(&'a mut [u8]),
    Offset(usize),
}

/// One method per wrapped OpenGL entry point.
///
/// Implementations are expected to forward the arguments verbatim. Methods are safe
/// to call, but the implementation behind them usually requires a current context on
/// the calling thread, see `GlDriver::load_with`.
pub trait Driver {
    // Fixed function state.
    fn enable(&mut self, cap: GLenum);
    fn disable(&mut self, cap: GLenum);
    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn blend_equation_separate(&mut self, mode_rgb: GLenum, mode_alpha: GLenum);
    fn blend_func_separate(
        &mut self,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    );
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_depth(&mut self, depth: f64);
    fn clear_stencil(&mut self, s: GLint);
    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool);
    fn depth_mask(&mut self, flag: bool);
    fn cull_face(&mut self, mode: GLenum);
    fn depth_func(&mut self, func: GLenum);
    fn front_face(&mut self, mode: GLenum);
    fn line_width(&mut self, width: f32);
    fn min_sample_shading(&mut self, value: f32);
    fn patch_parameter_i(&mut self, pname: GLenum, value: GLint);
    fn polygon_offset(&mut self, factor: f32, units: f32);
    fn stencil_func(&mut self, func: GLenum, reference: GLint, mask: GLuint);
    fn stencil_op(&mut self, sfail: GLenum, dpfail: GLenum, dppass: GLenum);
    fn stencil_mask(&mut self, mask: GLuint);
    fn scissor(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn scissor_indexed(&mut self, index: GLuint, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn viewport(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn viewport_indexed(&mut self, index: GLuint, x: f32, y: f32, width: f32, height: f32);

    // Bindings.
    fn use_program(&mut self, program: GLuint);
    fn bind_vertex_array(&mut self, array: GLuint);
    fn active_texture(&mut self, texture: GLenum);
    fn bind_framebuffer(&mut self, target: GLenum, framebuffer: GLuint);
    fn bind_renderbuffer(&mut self, target: GLenum, renderbuffer: GLuint);
    fn bind_buffer(&mut self, target: GLenum, buffer: GLuint);
    fn bind_buffer_base(&mut self, target: GLenum, index: GLuint, buffer: GLuint);
    fn bind_buffer_range(
        &mut self,
        target: GLenum,
        index: GLuint,
        buffer: GLuint,
        offset: GLintptr,
        size: GLsizeiptr,
    );
    fn bind_texture(&mut self, target: GLenum, texture: GLuint);
    fn bind_sampler(&mut self, unit: GLuint, sampler: GLuint);

    // Object lifetime.
    fn gen_buffers(&mut self, ids: &mut [GLuint]);
    fn delete_buffers(&mut self, ids: &[GLuint]);
    fn gen_textures(&mut self, ids: &mut [GLuint]);
    fn delete_textures(&mut self, ids: &[GLuint]);
    fn gen_samplers(&mut self, ids: &mut [GLuint]);
    fn delete_samplers(&mut self, ids: &[GLuint]);
    fn gen_framebuffers(&mut self, ids: &mut [GLuint]);
    fn delete_framebuffers(&mut self, ids: &[GLuint]);
    fn gen_renderbuffers(&mut self, ids: &mut [GLuint]);
    fn delete_renderbuffers(&mut self, ids: &[GLuint]);
    fn gen_vertex_arrays(&mut self, ids: &mut [GLuint]);
    fn delete_vertex_arrays(&mut self, ids: &[GLuint]);
    fn delete_program(&mut self, program: GLuint);

    // Vertex specification.
    fn enable_vertex_attrib_array(&mut self, index: GLuint);
    fn disable_vertex_attrib_array(&mut self, index: GLuint);
    fn vertex_attrib_format(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        relative_offset: GLuint,
    );
    fn vertex_attrib_i_format(&mut self, index: GLuint, size: GLint, ty: GLenum, relative_offset: GLuint);
    fn vertex_attrib_binding(&mut self, index: GLuint, binding: GLuint);
    fn vertex_binding_divisor(&mut self, binding: GLuint, divisor: GLuint);
    fn bind_vertex_buffer(&mut self, binding: GLuint, buffer: GLuint, offset: GLintptr, stride: GLsizei);
    fn vertex_attrib_pointer(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    );
    fn vertex_attrib_i_pointer(&mut self, index: GLuint, size: GLint, ty: GLenum, stride: GLsizei, offset: usize);
    fn vertex_attrib_divisor(&mut self, index: GLuint, divisor: GLuint);

    // Draws and dispatches.
    fn draw_arrays(&mut self, mode: GLenum, first: GLint, count: GLsizei);
    fn draw_arrays_instanced(&mut self, mode: GLenum, first: GLint, count: GLsizei, instances: GLsizei);
    fn draw_arrays_instanced_base_instance(
        &mut self,
        mode: GLenum,
        first: GLint,
        count: GLsizei,
        instances: GLsizei,
        base_instance: GLuint,
    );
    fn draw_arrays_indirect(&mut self, mode: GLenum, offset: usize);
    fn multi_draw_arrays_indirect(&mut self, mode: GLenum, offset: usize, draw_count: GLsizei, stride: GLsizei);
    fn draw_elements(&mut self, mode: GLenum, count: GLsizei, ty: GLenum, offset: usize);
    fn draw_elements_instanced(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        instances: GLsizei,
    );
    fn draw_elements_base_vertex(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        base_vertex: GLint,
    );
    fn draw_elements_instanced_base_vertex(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        instances: GLsizei,
        base_vertex: GLint,
    );
    fn draw_range_elements(
        &mut self,
        mode: GLenum,
        start: GLuint,
        end: GLuint,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
    );
    fn draw_elements_indirect(&mut self, mode: GLenum, ty: GLenum, offset: usize);
    fn multi_draw_elements_indirect(
        &mut self,
        mode: GLenum,
        ty: GLenum,
        offset: usize,
        draw_count: GLsizei,
        stride: GLsizei,
    );
    fn dispatch_compute(&mut self, x: GLuint, y: GLuint, z: GLuint);
    fn dispatch_compute_indirect(&mut self, offset: GLintptr);
    fn begin_transform_feedback(&mut self, primitive_mode: GLenum);
    fn end_transform_feedback(&mut self);
    fn pause_transform_feedback(&mut self);
    fn resume_transform_feedback(&mut self);

    // Framebuffer operations.
    fn clear(&mut self, mask: GLbitfield);
    fn clear_buffer_fv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[f32]);
    fn clear_buffer_iv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[i32]);
    fn clear_buffer_uiv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[u32]);
    fn clear_buffer_fi(&mut self, buffer: GLenum, draw_buffer: GLint, depth: f32, stencil: GLint);
    fn blit_framebuffer(&mut self, src: [GLint; 4], dst: [GLint; 4], mask: GLbitfield, filter: GLenum);
    fn read_pixels(
        &mut self,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelsMut,
    );
    fn framebuffer_texture_2d(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        textarget: GLenum,
        texture: GLuint,
        level: GLint,
    );
    fn framebuffer_renderbuffer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    );
    fn renderbuffer_storage(&mut self, target: GLenum, internal_format: GLenum, width: GLsizei, height: GLsizei);
    fn draw_buffers(&mut self, buffers: &[GLenum]);
    fn read_buffer(&mut self, mode: GLenum);
    fn check_framebuffer_status(&mut self, target: GLenum) -> GLenum;

    // Buffer data.
    fn buffer_data(&mut self, target: GLenum, size: GLsizeiptr, data: Option<&[u8]>, usage: GLenum);
    fn buffer_sub_data(&mut self, target: GLenum, offset: GLintptr, data: &[u8]);
    fn get_buffer_sub_data(&mut self, target: GLenum, offset: GLintptr, data: &mut [u8]);
    fn map_buffer_range(
        &mut self,
        target: GLenum,
        offset: GLintptr,
        length: GLsizeiptr,
        access: GLbitfield,
    ) -> *mut c_void;
    fn unmap_buffer(&mut self, target: GLenum) -> bool;
    fn copy_buffer_sub_data(
        &mut self,
        read_target: GLenum,
        write_target: GLenum,
        read_offset: GLintptr,
        write_offset: GLintptr,
        size: GLsizeiptr,
    );

    // Texture data.
    fn tex_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: Pixels,
    );
    fn tex_image_3d(
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
    );
    fn tex_sub_image_2d(
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
    );
    fn tex_sub_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        offset: [GLint; 3],
        size: [GLsizei; 3],
        format: GLenum,
        ty: GLenum,
        pixels: Pixels,
    );
    fn tex_storage_2d(&mut self, target: GLenum, levels: GLsizei, internal_format: GLenum, width: GLsizei, height: GLsizei);
    fn tex_storage_3d(
        &mut self,
        target: GLenum,
        levels: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
    );
    fn copy_tex_sub_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
    );
    fn tex_parameter_i(&mut self, target: GLenum, pname: GLenum, value: GLint);
    fn tex_parameter_f(&mut self, target: GLenum, pname: GLenum, value: f32);
    fn generate_mipmap(&mut self, target: GLenum);
    fn sampler_parameter_i(&mut self, sampler: GLuint, pname: GLenum, value: GLint);

    // Uniforms of the program in use.
    fn uniform_1i(&mut self, location: GLint, value: GLint);
    fn uniform_1f(&mut self, location: GLint, value: f32);
    fn uniform_4fv(&mut self, location: GLint, value: &[f32]);
    fn uniform_matrix_4fv(&mut self, location: GLint, transpose: bool, value: &[f32]);

    // Synchronization and introspection.
    fn flush(&mut self);
    fn finish(&mut self);
    fn get_error(&mut self) -> GLenum;
    fn get_integerv(&mut self, pname: GLenum, data: &mut [GLint]);
    fn get_integeri_v(&mut self, pname: GLenum, index: GLuint, data: &mut [GLint]);
    fn get_floatv(&mut self, pname: GLenum, data: &mut [f32]);
    fn get_doublev(&mut self, pname: GLenum, data: &mut [f64]);
    fn get_booleanv(&mut self, pname: GLenum, data: &mut [bool]);
    fn is_enabled(&mut self, cap: GLenum) -> bool;
    fn get_string(&mut self, name: GLenum) -> Option<String>;
}
