//! `Driver` implementation forwarding to the function pointers loaded by the `gl` crate.

use std::ffi;
use std::marker::PhantomData;
use std::os::raw::c_void;
use std::ptr;

use gl::types::*;

use super::{Driver, Pixels, PixelsMut};

// Upper bound of values any `glGet*` query writes, so introspection never writes past a
// caller supplied slice.
const MAX_QUERY_VALUES: usize = 16;

fn boolean(v: bool) -> GLboolean {
    if v {
        gl::TRUE
    } else {
        gl::FALSE
    }
}

fn pixels_ptr(pixels: Pixels) -> *const c_void {
    match pixels {
        Pixels::Null => ptr::null(),
        Pixels::Slice(v) if v.is_empty() => ptr::null(),
        Pixels::Slice(v) => v.as_ptr() as *const c_void,
        Pixels::Offset(offset) => offset as *const c_void,
    }
}

/// Forwards every entry point to the loaded OpenGL functions.
///
/// The driver is `!Send` and `!Sync`, it must stay on the thread whose context the
/// functions were loaded for.
pub struct GlDriver {
    _unsend: PhantomData<*const ()>,
}

impl GlDriver {
    /// Loads the OpenGL function pointers with `loader` and returns a driver for them.
    ///
    /// # Unsafe
    ///
    /// The context the loader resolves symbols for must be current on this thread for as
    /// long as the driver is used, otherwise every call is undefined behavior.
    pub unsafe fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        gl::load_with(loader);
        Self::new()
    }

    /// Creates a driver for function pointers which have already been loaded.
    ///
    /// # Unsafe
    ///
    /// See `load_with`.
    pub unsafe fn new() -> Self {
        GlDriver {
            _unsend: PhantomData,
        }
    }
}

impl Driver for GlDriver {
    fn enable(&mut self, cap: GLenum) {
        unsafe { gl::Enable(cap) }
    }

    fn disable(&mut self, cap: GLenum) {
        unsafe { gl::Disable(cap) }
    }

    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { gl::BlendColor(red, green, blue, alpha) }
    }

    fn blend_equation_separate(&mut self, mode_rgb: GLenum, mode_alpha: GLenum) {
        unsafe { gl::BlendEquationSeparate(mode_rgb, mode_alpha) }
    }

    fn blend_func_separate(
        &mut self,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    ) {
        unsafe { gl::BlendFuncSeparate(src_rgb, dst_rgb, src_alpha, dst_alpha) }
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { gl::ClearColor(red, green, blue, alpha) }
    }

    fn clear_depth(&mut self, depth: f64) {
        unsafe { gl::ClearDepth(depth) }
    }

    fn clear_stencil(&mut self, s: GLint) {
        unsafe { gl::ClearStencil(s) }
    }

    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        unsafe { gl::ColorMask(boolean(red), boolean(green), boolean(blue), boolean(alpha)) }
    }

    fn depth_mask(&mut self, flag: bool) {
        unsafe { gl::DepthMask(boolean(flag)) }
    }

    fn cull_face(&mut self, mode: GLenum) {
        unsafe { gl::CullFace(mode) }
    }

    fn depth_func(&mut self, func: GLenum) {
        unsafe { gl::DepthFunc(func) }
    }

    fn front_face(&mut self, mode: GLenum) {
        unsafe { gl::FrontFace(mode) }
    }

    fn line_width(&mut self, width: f32) {
        unsafe { gl::LineWidth(width) }
    }

    fn min_sample_shading(&mut self, value: f32) {
        unsafe { gl::MinSampleShading(value) }
    }

    fn patch_parameter_i(&mut self, pname: GLenum, value: GLint) {
        unsafe { gl::PatchParameteri(pname, value) }
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        unsafe { gl::PolygonOffset(factor, units) }
    }

    fn stencil_func(&mut self, func: GLenum, reference: GLint, mask: GLuint) {
        unsafe { gl::StencilFunc(func, reference, mask) }
    }

    fn stencil_op(&mut self, sfail: GLenum, dpfail: GLenum, dppass: GLenum) {
        unsafe { gl::StencilOp(sfail, dpfail, dppass) }
    }

    fn stencil_mask(&mut self, mask: GLuint) {
        unsafe { gl::StencilMask(mask) }
    }

    fn scissor(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::Scissor(x, y, width, height) }
    }

    fn scissor_indexed(&mut self, index: GLuint, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::ScissorIndexed(index, x, y, width, height) }
    }

    fn viewport(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn viewport_indexed(&mut self, index: GLuint, x: f32, y: f32, width: f32, height: f32) {
        unsafe { gl::ViewportIndexedf(index, x, y, width, height) }
    }

    fn use_program(&mut self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn bind_vertex_array(&mut self, array: GLuint) {
        unsafe { gl::BindVertexArray(array) }
    }

    fn active_texture(&mut self, texture: GLenum) {
        unsafe { gl::ActiveTexture(texture) }
    }

    fn bind_framebuffer(&mut self, target: GLenum, framebuffer: GLuint) {
        unsafe { gl::BindFramebuffer(target, framebuffer) }
    }

    fn bind_renderbuffer(&mut self, target: GLenum, renderbuffer: GLuint) {
        unsafe { gl::BindRenderbuffer(target, renderbuffer) }
    }

    fn bind_buffer(&mut self, target: GLenum, buffer: GLuint) {
        unsafe { gl::BindBuffer(target, buffer) }
    }

    fn bind_buffer_base(&mut self, target: GLenum, index: GLuint, buffer: GLuint) {
        unsafe { gl::BindBufferBase(target, index, buffer) }
    }

    fn bind_buffer_range(
        &mut self,
        target: GLenum,
        index: GLuint,
        buffer: GLuint,
        offset: GLintptr,
        size: GLsizeiptr,
    ) {
        unsafe { gl::BindBufferRange(target, index, buffer, offset, size) }
    }

    fn bind_texture(&mut self, target: GLenum, texture: GLuint) {
        unsafe { gl::BindTexture(target, texture) }
    }

    fn bind_sampler(&mut self, unit: GLuint, sampler: GLuint) {
        unsafe { gl::BindSampler(unit, sampler) }
    }

    fn gen_buffers(&mut self, ids: &mut [GLuint]) {
        unsafe { gl::GenBuffers(ids.len() as GLsizei, ids.as_mut_ptr()) }
    }

    fn delete_buffers(&mut self, ids: &[GLuint]) {
        unsafe { gl::DeleteBuffers(ids.len() as GLsizei, ids.as_ptr()) }
    }

    fn gen_textures(&mut self, ids: &mut [GLuint]) {
        unsafe { gl::GenTextures(ids.len() as GLsizei, ids.as_mut_ptr()) }
    }

    fn delete_textures(&mut self, ids: &[GLuint]) {
        unsafe { gl::DeleteTextures(ids.len() as GLsizei, ids.as_ptr()) }
    }

    fn gen_samplers(&mut self, ids: &mut [GLuint]) {
        unsafe { gl::GenSamplers(ids.len() as GLsizei, ids.as_mut_ptr()) }
    }

    fn delete_samplers(&mut self, ids: &[GLuint]) {
        unsafe { gl::DeleteSamplers(ids.len() as GLsizei, ids.as_ptr()) }
    }

    fn gen_framebuffers(&mut self, ids: &mut [GLuint]) {
        unsafe { gl::GenFramebuffers(ids.len() as GLsizei, ids.as_mut_ptr()) }
    }

    fn delete_framebuffers(&mut self, ids: &[GLuint]) {
        unsafe { gl::DeleteFramebuffers(ids.len() as GLsizei, ids.as_ptr()) }
    }

    fn gen_renderbuffers(&mut self, ids: &mut [GLuint]) {
        unsafe { gl::GenRenderbuffers(ids.len() as GLsizei, ids.as_mut_ptr()) }
    }

    fn delete_renderbuffers(&mut self, ids: &[GLuint]) {
        unsafe { gl::DeleteRenderbuffers(ids.len() as GLsizei, ids.as_ptr()) }
    }

    fn gen_vertex_arrays(&mut self, ids: &mut [GLuint]) {
        unsafe { gl::GenVertexArrays(ids.len() as GLsizei, ids.as_mut_ptr()) }
    }

    fn delete_vertex_arrays(&mut self, ids: &[GLuint]) {
        unsafe { gl::DeleteVertexArrays(ids.len() as GLsizei, ids.as_ptr()) }
    }

    fn delete_program(&mut self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn enable_vertex_attrib_array(&mut self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn disable_vertex_attrib_array(&mut self, index: GLuint) {
        unsafe { gl::DisableVertexAttribArray(index) }
    }

    fn vertex_attrib_format(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        relative_offset: GLuint,
    ) {
        unsafe { gl::VertexAttribFormat(index, size, ty, boolean(normalized), relative_offset) }
    }

    fn vertex_attrib_i_format(&mut self, index: GLuint, size: GLint, ty: GLenum, relative_offset: GLuint) {
        unsafe { gl::VertexAttribIFormat(index, size, ty, relative_offset) }
    }

    fn vertex_attrib_binding(&mut self, index: GLuint, binding: GLuint) {
        unsafe { gl::VertexAttribBinding(index, binding) }
    }

    fn vertex_binding_divisor(&mut self, binding: GLuint, divisor: GLuint) {
        unsafe { gl::VertexBindingDivisor(binding, divisor) }
    }

    fn bind_vertex_buffer(&mut self, binding: GLuint, buffer: GLuint, offset: GLintptr, stride: GLsizei) {
        unsafe { gl::BindVertexBuffer(binding, buffer, offset, stride) }
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) {
        unsafe {
            gl::VertexAttribPointer(
                index,
                size,
                ty,
                boolean(normalized),
                stride,
                offset as *const c_void,
            )
        }
    }

    fn vertex_attrib_i_pointer(&mut self, index: GLuint, size: GLint, ty: GLenum, stride: GLsizei, offset: usize) {
        unsafe { gl::VertexAttribIPointer(index, size, ty, stride, offset as *const c_void) }
    }

    fn vertex_attrib_divisor(&mut self, index: GLuint, divisor: GLuint) {
        unsafe { gl::VertexAttribDivisor(index, divisor) }
    }

    fn draw_arrays(&mut self, mode: GLenum, first: GLint, count: GLsizei) {
        unsafe { gl::DrawArrays(mode, first, count) }
    }

    fn draw_arrays_instanced(&mut self, mode: GLenum, first: GLint, count: GLsizei, instances: GLsizei) {
        unsafe { gl::DrawArraysInstanced(mode, first, count, instances) }
    }

    fn draw_arrays_instanced_base_instance(
        &mut self,
        mode: GLenum,
        first: GLint,
        count: GLsizei,
        instances: GLsizei,
        base_instance: GLuint,
    ) {
        unsafe { gl::DrawArraysInstancedBaseInstance(mode, first, count, instances, base_instance) }
    }

    fn draw_arrays_indirect(&mut self, mode: GLenum, offset: usize) {
        unsafe { gl::DrawArraysIndirect(mode, offset as *const c_void) }
    }

    fn multi_draw_arrays_indirect(&mut self, mode: GLenum, offset: usize, draw_count: GLsizei, stride: GLsizei) {
        unsafe { gl::MultiDrawArraysIndirect(mode, offset as *const c_void, draw_count, stride) }
    }

    fn draw_elements(&mut self, mode: GLenum, count: GLsizei, ty: GLenum, offset: usize) {
        unsafe { gl::DrawElements(mode, count, ty, offset as *const c_void) }
    }

    fn draw_elements_instanced(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        instances: GLsizei,
    ) {
        unsafe { gl::DrawElementsInstanced(mode, count, ty, offset as *const c_void, instances) }
    }

    fn draw_elements_base_vertex(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        base_vertex: GLint,
    ) {
        unsafe { gl::DrawElementsBaseVertex(mode, count, ty, offset as *const c_void, base_vertex) }
    }

    fn draw_elements_instanced_base_vertex(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        instances: GLsizei,
        base_vertex: GLint,
    ) {
        unsafe {
            gl::DrawElementsInstancedBaseVertex(
                mode,
                count,
                ty,
                offset as *const c_void,
                instances,
                base_vertex,
            )
        }
    }

    fn draw_range_elements(
        &mut self,
        mode: GLenum,
        start: GLuint,
        end: GLuint,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
    ) {
        unsafe { gl::DrawRangeElements(mode, start, end, count, ty, offset as *const c_void) }
    }

    fn draw_elements_indirect(&mut self, mode: GLenum, ty: GLenum, offset: usize) {
        unsafe { gl::DrawElementsIndirect(mode, ty, offset as *const c_void) }
    }

    fn multi_draw_elements_indirect(
        &mut self,
        mode: GLenum,
        ty: GLenum,
        offset: usize,
        draw_count: GLsizei,
        stride: GLsizei,
    ) {
        unsafe { gl::MultiDrawElementsIndirect(mode, ty, offset as *const c_void, draw_count, stride) }
    }

    fn dispatch_compute(&mut self, x: GLuint, y: GLuint, z: GLuint) {
        unsafe { gl::DispatchCompute(x, y, z) }
    }

    fn dispatch_compute_indirect(&mut self, offset: GLintptr) {
        unsafe { gl::DispatchComputeIndirect(offset) }
    }

    fn begin_transform_feedback(&mut self, primitive_mode: GLenum) {
        unsafe { gl::BeginTransformFeedback(primitive_mode) }
    }

    fn end_transform_feedback(&mut self) {
        unsafe { gl::EndTransformFeedback() }
    }

    fn pause_transform_feedback(&mut self) {
        unsafe { gl::PauseTransformFeedback() }
    }

    fn resume_transform_feedback(&mut self) {
        unsafe { gl::ResumeTransformFeedback() }
    }

    fn clear(&mut self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) }
    }

    fn clear_buffer_fv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[f32]) {
        unsafe { gl::ClearBufferfv(buffer, draw_buffer, value.as_ptr()) }
    }

    fn clear_buffer_iv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[i32]) {
        unsafe { gl::ClearBufferiv(buffer, draw_buffer, value.as_ptr()) }
    }

    fn clear_buffer_uiv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[u32]) {
        unsafe { gl::ClearBufferuiv(buffer, draw_buffer, value.as_ptr()) }
    }

    fn clear_buffer_fi(&mut self, buffer: GLenum, draw_buffer: GLint, depth: f32, stencil: GLint) {
        unsafe { gl::ClearBufferfi(buffer, draw_buffer, depth, stencil) }
    }

    fn blit_framebuffer(&mut self, src: [GLint; 4], dst: [GLint; 4], mask: GLbitfield, filter: GLenum) {
        unsafe {
            gl::BlitFramebuffer(
                src[0], src[1], src[2], src[3], dst[0], dst[1], dst[2], dst[3], mask, filter,
            )
        }
    }

    fn read_pixels(
        &mut self,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelsMut,
    ) {
        let ptr = match pixels {
            PixelsMut::Slice(v) => v.as_mut_ptr() as *mut c_void,
            PixelsMut::Offset(offset) => offset as *mut c_void,
        };

        unsafe { gl::ReadPixels(x, y, width, height, format, ty, ptr) }
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        textarget: GLenum,
        texture: GLuint,
        level: GLint,
    ) {
        unsafe { gl::FramebufferTexture2D(target, attachment, textarget, texture, level) }
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    ) {
        unsafe { gl::FramebufferRenderbuffer(target, attachment, renderbuffer_target, renderbuffer) }
    }

    fn renderbuffer_storage(&mut self, target: GLenum, internal_format: GLenum, width: GLsizei, height: GLsizei) {
        unsafe { gl::RenderbufferStorage(target, internal_format, width, height) }
    }

    fn draw_buffers(&mut self, buffers: &[GLenum]) {
        unsafe { gl::DrawBuffers(buffers.len() as GLsizei, buffers.as_ptr()) }
    }

    fn read_buffer(&mut self, mode: GLenum) {
        unsafe { gl::ReadBuffer(mode) }
    }

    fn check_framebuffer_status(&mut self, target: GLenum) -> GLenum {
        unsafe { gl::CheckFramebufferStatus(target) }
    }

    fn buffer_data(&mut self, target: GLenum, size: GLsizeiptr, data: Option<&[u8]>, usage: GLenum) {
        let ptr = match data {
            Some(v) if !v.is_empty() => v.as_ptr() as *const c_void,
            _ => ptr::null(),
        };

        unsafe { gl::BufferData(target, size, ptr, usage) }
    }

    fn buffer_sub_data(&mut self, target: GLenum, offset: GLintptr, data: &[u8]) {
        unsafe {
            gl::BufferSubData(
                target,
                offset,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
            )
        }
    }

    fn get_buffer_sub_data(&mut self, target: GLenum, offset: GLintptr, data: &mut [u8]) {
        unsafe {
            gl::GetBufferSubData(
                target,
                offset,
                data.len() as GLsizeiptr,
                data.as_mut_ptr() as *mut c_void,
            )
        }
    }

    fn map_buffer_range(
        &mut self,
        target: GLenum,
        offset: GLintptr,
        length: GLsizeiptr,
        access: GLbitfield,
    ) -> *mut c_void {
        unsafe { gl::MapBufferRange(target, offset, length, access) }
    }

    fn unmap_buffer(&mut self, target: GLenum) -> bool {
        unsafe { gl::UnmapBuffer(target) == gl::TRUE }
    }

    fn copy_buffer_sub_data(
        &mut self,
        read_target: GLenum,
        write_target: GLenum,
        read_offset: GLintptr,
        write_offset: GLintptr,
        size: GLsizeiptr,
    ) {
        unsafe { gl::CopyBufferSubData(read_target, write_target, read_offset, write_offset, size) }
    }

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
    ) {
        unsafe {
            gl::TexImage2D(
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                ty,
                pixels_ptr(pixels),
            )
        }
    }

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
    ) {
        unsafe {
            gl::TexImage3D(
                target,
                level,
                internal_format,
                width,
                height,
                depth,
                0,
                format,
                ty,
                pixels_ptr(pixels),
            )
        }
    }

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
    ) {
        unsafe {
            gl::TexSubImage2D(
                target,
                level,
                xoffset,
                yoffset,
                width,
                height,
                format,
                ty,
                pixels_ptr(pixels),
            )
        }
    }

    fn tex_sub_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        offset: [GLint; 3],
        size: [GLsizei; 3],
        format: GLenum,
        ty: GLenum,
        pixels: Pixels,
    ) {
        unsafe {
            gl::TexSubImage3D(
                target,
                level,
                offset[0],
                offset[1],
                offset[2],
                size[0],
                size[1],
                size[2],
                format,
                ty,
                pixels_ptr(pixels),
            )
        }
    }

    fn tex_storage_2d(&mut self, target: GLenum, levels: GLsizei, internal_format: GLenum, width: GLsizei, height: GLsizei) {
        unsafe { gl::TexStorage2D(target, levels, internal_format, width, height) }
    }

    fn tex_storage_3d(
        &mut self,
        target: GLenum,
        levels: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
    ) {
        unsafe { gl::TexStorage3D(target, levels, internal_format, width, height, depth) }
    }

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
    ) {
        unsafe { gl::CopyTexSubImage2D(target, level, xoffset, yoffset, x, y, width, height) }
    }

    fn tex_parameter_i(&mut self, target: GLenum, pname: GLenum, value: GLint) {
        unsafe { gl::TexParameteri(target, pname, value) }
    }

    fn tex_parameter_f(&mut self, target: GLenum, pname: GLenum, value: f32) {
        unsafe { gl::TexParameterf(target, pname, value) }
    }

    fn generate_mipmap(&mut self, target: GLenum) {
        unsafe { gl::GenerateMipmap(target) }
    }

    fn sampler_parameter_i(&mut self, sampler: GLuint, pname: GLenum, value: GLint) {
        unsafe { gl::SamplerParameteri(sampler, pname, value) }
    }

    fn uniform_1i(&mut self, location: GLint, value: GLint) {
        unsafe { gl::Uniform1i(location, value) }
    }

    fn uniform_1f(&mut self, location: GLint, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }

    fn uniform_4fv(&mut self, location: GLint, value: &[f32]) {
        unsafe { gl::Uniform4fv(location, (value.len() / 4) as GLsizei, value.as_ptr()) }
    }

    fn uniform_matrix_4fv(&mut self, location: GLint, transpose: bool, value: &[f32]) {
        unsafe {
            gl::UniformMatrix4fv(
                location,
                (value.len() / 16) as GLsizei,
                boolean(transpose),
                value.as_ptr(),
            )
        }
    }

    fn flush(&mut self) {
        unsafe { gl::Flush() }
    }

    fn finish(&mut self) {
        unsafe { gl::Finish() }
    }

    fn get_error(&mut self) -> GLenum {
        unsafe { gl::GetError() }
    }

    fn get_integerv(&mut self, pname: GLenum, data: &mut [GLint]) {
        let mut values = [0; MAX_QUERY_VALUES];
        unsafe { gl::GetIntegerv(pname, values.as_mut_ptr()) };

        for (dst, src) in data.iter_mut().zip(values.iter()) {
            *dst = *src;
        }
    }

    fn get_integeri_v(&mut self, pname: GLenum, index: GLuint, data: &mut [GLint]) {
        let mut values = [0; MAX_QUERY_VALUES];
        unsafe { gl::GetIntegeri_v(pname, index, values.as_mut_ptr()) };

        for (dst, src) in data.iter_mut().zip(values.iter()) {
            *dst = *src;
        }
    }

    fn get_floatv(&mut self, pname: GLenum, data: &mut [f32]) {
        let mut values = [0.0; MAX_QUERY_VALUES];
        unsafe { gl::GetFloatv(pname, values.as_mut_ptr()) };

        for (dst, src) in data.iter_mut().zip(values.iter()) {
            *dst = *src;
        }
    }

    fn get_doublev(&mut self, pname: GLenum, data: &mut [f64]) {
        let mut values = [0.0; MAX_QUERY_VALUES];
        unsafe { gl::GetDoublev(pname, values.as_mut_ptr()) };

        for (dst, src) in data.iter_mut().zip(values.iter()) {
            *dst = *src;
        }
    }

    fn get_booleanv(&mut self, pname: GLenum, data: &mut [bool]) {
        let mut values = [gl::FALSE; MAX_QUERY_VALUES];
        unsafe { gl::GetBooleanv(pname, values.as_mut_ptr()) };

        for (dst, src) in data.iter_mut().zip(values.iter()) {
            *dst = *src == gl::TRUE;
        }
    }

    fn is_enabled(&mut self, cap: GLenum) -> bool {
        unsafe { gl::IsEnabled(cap) == gl::TRUE }
    }

    fn get_string(&mut self, name: GLenum) -> Option<String> {
        unsafe {
            let desc = gl::GetString(name);
            if desc.is_null() {
                return None;
            }

            String::from_utf8(ffi::CStr::from_ptr(desc as *const _).to_bytes().to_vec()).ok()
        }
    }
}
