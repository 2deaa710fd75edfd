//! A driver without a GPU behind it.
//!
//! `HeadlessDriver` records every entry point it receives as a `Call` and keeps a small
//! model of the bindings a real driver would hold. It backs headless runs and makes
//! it possible to assert on exactly which commands reached the driver.

use std::collections::{HashMap, HashSet};
use std::os::raw::c_void;
use std::ptr;

use gl::types::*;

use super::{Driver, Pixels, PixelsMut};

/// A recorded driver command.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Enable(GLenum),
    Disable(GLenum),
    BlendColor([f32; 4]),
    BlendEquationSeparate(GLenum, GLenum),
    BlendFuncSeparate(GLenum, GLenum, GLenum, GLenum),
    ClearColor([f32; 4]),
    ClearDepth(f64),
    ClearStencil(GLint),
    ColorMask([bool; 4]),
    DepthMask(bool),
    CullFace(GLenum),
    DepthFunc(GLenum),
    FrontFace(GLenum),
    LineWidth(f32),
    MinSampleShading(f32),
    PatchParameter(GLenum, GLint),
    PolygonOffset(f32, f32),
    StencilFunc(GLenum, GLint, GLuint),
    StencilOp(GLenum, GLenum, GLenum),
    StencilMask(GLuint),
    Scissor([GLint; 4]),
    ScissorIndexed(GLuint, [GLint; 4]),
    Viewport([GLint; 4]),
    ViewportIndexed(GLuint, [f32; 4]),

    UseProgram(GLuint),
    BindVertexArray(GLuint),
    ActiveTexture(GLenum),
    BindFramebuffer(GLenum, GLuint),
    BindRenderbuffer(GLenum, GLuint),
    BindBuffer(GLenum, GLuint),
    BindBufferBase(GLenum, GLuint, GLuint),
    BindBufferRange(GLenum, GLuint, GLuint, GLintptr, GLsizeiptr),
    BindTexture(GLenum, GLuint),
    BindSampler(GLuint, GLuint),

    GenBuffers(Vec<GLuint>),
    DeleteBuffers(Vec<GLuint>),
    GenTextures(Vec<GLuint>),
    DeleteTextures(Vec<GLuint>),
    GenSamplers(Vec<GLuint>),
    DeleteSamplers(Vec<GLuint>),
    GenFramebuffers(Vec<GLuint>),
    DeleteFramebuffers(Vec<GLuint>),
    GenRenderbuffers(Vec<GLuint>),
    DeleteRenderbuffers(Vec<GLuint>),
    GenVertexArrays(Vec<GLuint>),
    DeleteVertexArrays(Vec<GLuint>),
    DeleteProgram(GLuint),

    EnableVertexAttribArray(GLuint),
    DisableVertexAttribArray(GLuint),
    VertexAttribFormat(GLuint, GLint, GLenum, bool, GLuint),
    VertexAttribIFormat(GLuint, GLint, GLenum, GLuint),
    VertexAttribBinding(GLuint, GLuint),
    VertexBindingDivisor(GLuint, GLuint),
    BindVertexBuffer(GLuint, GLuint, GLintptr, GLsizei),
    VertexAttribPointer(GLuint, GLint, GLenum, bool, GLsizei, usize),
    VertexAttribIPointer(GLuint, GLint, GLenum, GLsizei, usize),
    VertexAttribDivisor(GLuint, GLuint),

    DrawArrays(GLenum, GLint, GLsizei),
    DrawArraysInstanced(GLenum, GLint, GLsizei, GLsizei),
    DrawArraysInstancedBaseInstance(GLenum, GLint, GLsizei, GLsizei, GLuint),
    DrawArraysIndirect(GLenum, usize),
    MultiDrawArraysIndirect(GLenum, usize, GLsizei, GLsizei),
    DrawElements(GLenum, GLsizei, GLenum, usize),
    DrawElementsInstanced(GLenum, GLsizei, GLenum, usize, GLsizei),
    DrawElementsBaseVertex(GLenum, GLsizei, GLenum, usize, GLint),
    DrawElementsInstancedBaseVertex(GLenum, GLsizei, GLenum, usize, GLsizei, GLint),
    DrawRangeElements(GLenum, GLuint, GLuint, GLsizei, GLenum, usize),
    DrawElementsIndirect(GLenum, GLenum, usize),
    MultiDrawElementsIndirect(GLenum, GLenum, usize, GLsizei, GLsizei),
    DispatchCompute(GLuint, GLuint, GLuint),
    DispatchComputeIndirect(GLintptr),
    BeginTransformFeedback(GLenum),
    EndTransformFeedback,
    PauseTransformFeedback,
    ResumeTransformFeedback,

    Clear(GLbitfield),
    ClearBufferfv(GLenum, GLint, Vec<f32>),
    ClearBufferiv(GLenum, GLint, Vec<i32>),
    ClearBufferuiv(GLenum, GLint, Vec<u32>),
    ClearBufferfi(GLenum, GLint, f32, GLint),
    BlitFramebuffer([GLint; 4], [GLint; 4], GLbitfield, GLenum),
    ReadPixels([GLint; 4], GLenum, GLenum),
    FramebufferTexture2D(GLenum, GLenum, GLenum, GLuint, GLint),
    FramebufferRenderbuffer(GLenum, GLenum, GLenum, GLuint),
    RenderbufferStorage(GLenum, GLenum, GLsizei, GLsizei),
    DrawBuffers(Vec<GLenum>),
    ReadBuffer(GLenum),
    CheckFramebufferStatus(GLenum),

    BufferData(GLenum, GLsizeiptr, GLenum),
    BufferSubData(GLenum, GLintptr, usize),
    GetBufferSubData(GLenum, GLintptr, usize),
    MapBufferRange(GLenum, GLintptr, GLsizeiptr, GLbitfield),
    UnmapBuffer(GLenum),
    CopyBufferSubData(GLenum, GLenum, GLintptr, GLintptr, GLsizeiptr),

    TexImage2D(GLenum, GLint, GLint, GLsizei, GLsizei, GLenum, GLenum),
    TexImage3D(GLenum, GLint, GLint, [GLsizei; 3], GLenum, GLenum),
    TexSubImage2D(GLenum, GLint, [GLint; 2], [GLsizei; 2], GLenum, GLenum),
    TexSubImage3D(GLenum, GLint, [GLint; 3], [GLsizei; 3], GLenum, GLenum),
    TexStorage2D(GLenum, GLsizei, GLenum, GLsizei, GLsizei),
    TexStorage3D(GLenum, GLsizei, GLenum, [GLsizei; 3]),
    CopyTexSubImage2D(GLenum, GLint, [GLint; 2], [GLint; 4]),
    TexParameteri(GLenum, GLenum, GLint),
    TexParameterf(GLenum, GLenum, f32),
    GenerateMipmap(GLenum),
    SamplerParameteri(GLuint, GLenum, GLint),

    Uniform1i(GLint, GLint),
    Uniform1f(GLint, f32),
    Uniform4fv(GLint, Vec<f32>),
    UniformMatrix4fv(GLint, bool, Vec<f32>),

    Flush,
    Finish,
    GetIntegerv(GLenum),
    GetIntegeriv(GLenum, GLuint),
    GetFloatv(GLenum),
    GetDoublev(GLenum),
    GetBooleanv(GLenum),
    IsEnabled(GLenum),
    GetString(GLenum),
}

impl Call {
    /// Returns true if this command changes driver state or consumes it. Introspection
    /// commands are the only ones that do neither.
    pub fn is_introspection(&self) -> bool {
        match *self {
            Call::GetIntegerv(_)
            | Call::GetIntegeriv(_, _)
            | Call::GetFloatv(_)
            | Call::GetDoublev(_)
            | Call::GetBooleanv(_)
            | Call::IsEnabled(_)
            | Call::GetString(_)
            | Call::CheckFramebufferStatus(_) => true,
            _ => false,
        }
    }
}

/// The subset of the driver's binding table the headless driver keeps track of.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    pub program: GLuint,
    pub vertex_array: GLuint,
    pub draw_framebuffer: GLuint,
    pub read_framebuffer: GLuint,
    pub renderbuffer: GLuint,
    pub active_texture: GLuint,
    pub buffers: HashMap<GLenum, GLuint>,
    pub indexed_buffers: HashMap<(GLenum, GLuint), GLuint>,
    pub textures: HashMap<(GLuint, GLenum), GLuint>,
    pub samplers: HashMap<GLuint, GLuint>,
    pub element_buffers: HashMap<GLuint, GLuint>,
}

/// A recording, GPU-less `Driver`.
#[derive(Debug)]
pub struct HeadlessDriver {
    calls: Vec<Call>,
    next_id: GLuint,
    enabled: HashSet<GLenum>,
    bindings: Bindings,
    queries: HashMap<GLenum, Vec<f64>>,
    indexed_queries: HashMap<(GLenum, GLuint), Vec<f64>>,
    version: String,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        HeadlessDriver::new()
    }
}

impl HeadlessDriver {
    /// Creates a headless driver reporting an OpenGL 4.5 context with the smallest
    /// limits a 4.5 implementation may have.
    pub fn new() -> Self {
        let mut driver = HeadlessDriver {
            calls: Vec::new(),
            next_id: 1,
            enabled: HashSet::new(),
            bindings: Bindings::default(),
            queries: HashMap::new(),
            indexed_queries: HashMap::new(),
            version: "4.5.0 Headless".to_owned(),
        };

        // Capabilities enabled in a fresh context.
        driver.enabled.insert(gl::DITHER);
        driver.enabled.insert(gl::MULTISAMPLE);

        driver.set_query(gl::MAX_VIEWPORTS, &[16.0]);
        driver.set_query(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, &[80.0]);
        driver.set_query(gl::MAX_VERTEX_ATTRIBS, &[16.0]);
        driver.set_query(gl::MAX_VERTEX_ATTRIB_BINDINGS, &[16.0]);
        driver.set_query(gl::MAX_ATOMIC_COUNTER_BUFFER_BINDINGS, &[1.0]);
        driver.set_query(gl::MAX_SHADER_STORAGE_BUFFER_BINDINGS, &[8.0]);
        driver.set_query(gl::MAX_TRANSFORM_FEEDBACK_BUFFERS, &[4.0]);
        driver.set_query(gl::MAX_UNIFORM_BUFFER_BINDINGS, &[72.0]);
        driver
    }

    /// Overrides the version string reported for `GL_VERSION`.
    pub fn with_version<T: Into<String>>(mut self, version: T) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the values answered for a `glGet*` query of `pname`.
    pub fn set_query(&mut self, pname: GLenum, values: &[f64]) {
        self.queries.insert(pname, values.to_vec());
    }

    /// Sets the values answered for an indexed `glGet*i_v` query of `pname`.
    pub fn set_indexed_query(&mut self, pname: GLenum, index: GLuint, values: &[f64]) {
        self.indexed_queries.insert((pname, index), values.to_vec());
    }

    /// Every command received so far, in order.
    #[inline]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Drains the recorded commands.
    pub fn take_calls(&mut self) -> Vec<Call> {
        ::std::mem::replace(&mut self.calls, Vec::new())
    }

    #[inline]
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Counts the recorded commands matching `predicate`.
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Call) -> bool,
    {
        self.calls.iter().filter(|v| predicate(v)).count()
    }

    /// The binding table the commands received so far produced.
    #[inline]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Returns true if `cap` is enabled according to the commands received so far.
    #[inline]
    pub fn capability(&self, cap: GLenum) -> bool {
        self.enabled.contains(&cap)
    }

    fn gen(&mut self, ids: &mut [GLuint]) -> Vec<GLuint> {
        for v in ids.iter_mut() {
            *v = self.next_id;
            self.next_id += 1;
        }

        ids.to_vec()
    }

    fn query(&self, pname: GLenum) -> &[f64] {
        self.queries.get(&pname).map(|v| &v[..]).unwrap_or(&[])
    }

    fn unbind(&mut self, ids: &[GLuint], kind: Unbind) {
        let contains = |id: &GLuint| *id != 0 && ids.contains(id);
        let b = &mut self.bindings;

        match kind {
            Unbind::Buffers => {
                b.buffers.retain(|_, v| !contains(v));
                b.indexed_buffers.retain(|_, v| !contains(v));
                let vao = b.vertex_array;
                if b.element_buffers.get(&vao).map(|v| contains(v)).unwrap_or(false) {
                    b.element_buffers.remove(&vao);
                }
            }
            Unbind::Textures => b.textures.retain(|_, v| !contains(v)),
            Unbind::Samplers => b.samplers.retain(|_, v| !contains(v)),
            Unbind::Framebuffers => {
                if contains(&b.draw_framebuffer) {
                    b.draw_framebuffer = 0;
                }

                if contains(&b.read_framebuffer) {
                    b.read_framebuffer = 0;
                }
            }
            Unbind::Renderbuffers => {
                if contains(&b.renderbuffer) {
                    b.renderbuffer = 0;
                }
            }
            Unbind::VertexArrays => {
                if contains(&b.vertex_array) {
                    b.vertex_array = 0;
                }

                b.element_buffers.retain(|k, _| !contains(k));
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Unbind {
    Buffers,
    Textures,
    Samplers,
    Framebuffers,
    Renderbuffers,
    VertexArrays,
}

impl Driver for HeadlessDriver {
    fn enable(&mut self, cap: GLenum) {
        self.enabled.insert(cap);
        self.calls.push(Call::Enable(cap));
    }

    fn disable(&mut self, cap: GLenum) {
        self.enabled.remove(&cap);
        self.calls.push(Call::Disable(cap));
    }

    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.calls.push(Call::BlendColor([red, green, blue, alpha]));
    }

    fn blend_equation_separate(&mut self, mode_rgb: GLenum, mode_alpha: GLenum) {
        self.calls.push(Call::BlendEquationSeparate(mode_rgb, mode_alpha));
    }

    fn blend_func_separate(
        &mut self,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    ) {
        self.calls
            .push(Call::BlendFuncSeparate(src_rgb, dst_rgb, src_alpha, dst_alpha));
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.calls.push(Call::ClearColor([red, green, blue, alpha]));
    }

    fn clear_depth(&mut self, depth: f64) {
        self.calls.push(Call::ClearDepth(depth));
    }

    fn clear_stencil(&mut self, s: GLint) {
        self.calls.push(Call::ClearStencil(s));
    }

    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        self.calls.push(Call::ColorMask([red, green, blue, alpha]));
    }

    fn depth_mask(&mut self, flag: bool) {
        self.calls.push(Call::DepthMask(flag));
    }

    fn cull_face(&mut self, mode: GLenum) {
        self.calls.push(Call::CullFace(mode));
    }

    fn depth_func(&mut self, func: GLenum) {
        self.calls.push(Call::DepthFunc(func));
    }

    fn front_face(&mut self, mode: GLenum) {
        self.calls.push(Call::FrontFace(mode));
    }

    fn line_width(&mut self, width: f32) {
        self.calls.push(Call::LineWidth(width));
    }

    fn min_sample_shading(&mut self, value: f32) {
        self.calls.push(Call::MinSampleShading(value));
    }

    fn patch_parameter_i(&mut self, pname: GLenum, value: GLint) {
        self.calls.push(Call::PatchParameter(pname, value));
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.calls.push(Call::PolygonOffset(factor, units));
    }

    fn stencil_func(&mut self, func: GLenum, reference: GLint, mask: GLuint) {
        self.calls.push(Call::StencilFunc(func, reference, mask));
    }

    fn stencil_op(&mut self, sfail: GLenum, dpfail: GLenum, dppass: GLenum) {
        self.calls.push(Call::StencilOp(sfail, dpfail, dppass));
    }

    fn stencil_mask(&mut self, mask: GLuint) {
        self.calls.push(Call::StencilMask(mask));
    }

    fn scissor(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.calls.push(Call::Scissor([x, y, width, height]));
    }

    fn scissor_indexed(&mut self, index: GLuint, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.calls
            .push(Call::ScissorIndexed(index, [x, y, width, height]));
    }

    fn viewport(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.calls.push(Call::Viewport([x, y, width, height]));
    }

    fn viewport_indexed(&mut self, index: GLuint, x: f32, y: f32, width: f32, height: f32) {
        self.calls
            .push(Call::ViewportIndexed(index, [x, y, width, height]));
    }

    fn use_program(&mut self, program: GLuint) {
        self.bindings.program = program;
        self.calls.push(Call::UseProgram(program));
    }

    fn bind_vertex_array(&mut self, array: GLuint) {
        self.bindings.vertex_array = array;
        self.calls.push(Call::BindVertexArray(array));
    }

    fn active_texture(&mut self, texture: GLenum) {
        self.bindings.active_texture = texture - gl::TEXTURE0;
        self.calls.push(Call::ActiveTexture(texture));
    }

    fn bind_framebuffer(&mut self, target: GLenum, framebuffer: GLuint) {
        match target {
            gl::DRAW_FRAMEBUFFER => self.bindings.draw_framebuffer = framebuffer,
            gl::READ_FRAMEBUFFER => self.bindings.read_framebuffer = framebuffer,
            _ => {
                self.bindings.draw_framebuffer = framebuffer;
                self.bindings.read_framebuffer = framebuffer;
            }
        }

        self.calls.push(Call::BindFramebuffer(target, framebuffer));
    }

    fn bind_renderbuffer(&mut self, target: GLenum, renderbuffer: GLuint) {
        self.bindings.renderbuffer = renderbuffer;
        self.calls.push(Call::BindRenderbuffer(target, renderbuffer));
    }

    fn bind_buffer(&mut self, target: GLenum, buffer: GLuint) {
        if target == gl::ELEMENT_ARRAY_BUFFER {
            let vao = self.bindings.vertex_array;
            self.bindings.element_buffers.insert(vao, buffer);
        } else {
            self.bindings.buffers.insert(target, buffer);
        }

        self.calls.push(Call::BindBuffer(target, buffer));
    }

    fn bind_buffer_base(&mut self, target: GLenum, index: GLuint, buffer: GLuint) {
        self.bindings.buffers.insert(target, buffer);
        self.bindings.indexed_buffers.insert((target, index), buffer);
        self.calls.push(Call::BindBufferBase(target, index, buffer));
    }

    fn bind_buffer_range(
        &mut self,
        target: GLenum,
        index: GLuint,
        buffer: GLuint,
        offset: GLintptr,
        size: GLsizeiptr,
    ) {
        self.bindings.buffers.insert(target, buffer);
        self.bindings.indexed_buffers.insert((target, index), buffer);
        self.calls
            .push(Call::BindBufferRange(target, index, buffer, offset, size));
    }

    fn bind_texture(&mut self, target: GLenum, texture: GLuint) {
        let unit = self.bindings.active_texture;
        self.bindings.textures.insert((unit, target), texture);
        self.calls.push(Call::BindTexture(target, texture));
    }

    fn bind_sampler(&mut self, unit: GLuint, sampler: GLuint) {
        self.bindings.samplers.insert(unit, sampler);
        self.calls.push(Call::BindSampler(unit, sampler));
    }

    fn gen_buffers(&mut self, ids: &mut [GLuint]) {
        let ids = self.gen(ids);
        self.calls.push(Call::GenBuffers(ids));
    }

    fn delete_buffers(&mut self, ids: &[GLuint]) {
        self.unbind(ids, Unbind::Buffers);
        self.calls.push(Call::DeleteBuffers(ids.to_vec()));
    }

    fn gen_textures(&mut self, ids: &mut [GLuint]) {
        let ids = self.gen(ids);
        self.calls.push(Call::GenTextures(ids));
    }

    fn delete_textures(&mut self, ids: &[GLuint]) {
        self.unbind(ids, Unbind::Textures);
        self.calls.push(Call::DeleteTextures(ids.to_vec()));
    }

    fn gen_samplers(&mut self, ids: &mut [GLuint]) {
        let ids = self.gen(ids);
        self.calls.push(Call::GenSamplers(ids));
    }

    fn delete_samplers(&mut self, ids: &[GLuint]) {
        self.unbind(ids, Unbind::Samplers);
        self.calls.push(Call::DeleteSamplers(ids.to_vec()));
    }

    fn gen_framebuffers(&mut self, ids: &mut [GLuint]) {
        let ids = self.gen(ids);
        self.calls.push(Call::GenFramebuffers(ids));
    }

    fn delete_framebuffers(&mut self, ids: &[GLuint]) {
        self.unbind(ids, Unbind::Framebuffers);
        self.calls.push(Call::DeleteFramebuffers(ids.to_vec()));
    }

    fn gen_renderbuffers(&mut self, ids: &mut [GLuint]) {
        let ids = self.gen(ids);
        self.calls.push(Call::GenRenderbuffers(ids));
    }

    fn delete_renderbuffers(&mut self, ids: &[GLuint]) {
        self.unbind(ids, Unbind::Renderbuffers);
        self.calls.push(Call::DeleteRenderbuffers(ids.to_vec()));
    }

    fn gen_vertex_arrays(&mut self, ids: &mut [GLuint]) {
        let ids = self.gen(ids);
        self.calls.push(Call::GenVertexArrays(ids));
    }

    fn delete_vertex_arrays(&mut self, ids: &[GLuint]) {
        self.unbind(ids, Unbind::VertexArrays);
        self.calls.push(Call::DeleteVertexArrays(ids.to_vec()));
    }

    fn delete_program(&mut self, program: GLuint) {
        self.calls.push(Call::DeleteProgram(program));
    }

    fn enable_vertex_attrib_array(&mut self, index: GLuint) {
        self.calls.push(Call::EnableVertexAttribArray(index));
    }

    fn disable_vertex_attrib_array(&mut self, index: GLuint) {
        self.calls.push(Call::DisableVertexAttribArray(index));
    }

    fn vertex_attrib_format(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        relative_offset: GLuint,
    ) {
        self.calls.push(Call::VertexAttribFormat(
            index,
            size,
            ty,
            normalized,
            relative_offset,
        ));
    }

    fn vertex_attrib_i_format(&mut self, index: GLuint, size: GLint, ty: GLenum, relative_offset: GLuint) {
        self.calls
            .push(Call::VertexAttribIFormat(index, size, ty, relative_offset));
    }

    fn vertex_attrib_binding(&mut self, index: GLuint, binding: GLuint) {
        self.calls.push(Call::VertexAttribBinding(index, binding));
    }

    fn vertex_binding_divisor(&mut self, binding: GLuint, divisor: GLuint) {
        self.calls.push(Call::VertexBindingDivisor(binding, divisor));
    }

    fn bind_vertex_buffer(&mut self, binding: GLuint, buffer: GLuint, offset: GLintptr, stride: GLsizei) {
        self.calls
            .push(Call::BindVertexBuffer(binding, buffer, offset, stride));
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
        self.calls.push(Call::VertexAttribPointer(
            index, size, ty, normalized, stride, offset,
        ));
    }

    fn vertex_attrib_i_pointer(&mut self, index: GLuint, size: GLint, ty: GLenum, stride: GLsizei, offset: usize) {
        self.calls
            .push(Call::VertexAttribIPointer(index, size, ty, stride, offset));
    }

    fn vertex_attrib_divisor(&mut self, index: GLuint, divisor: GLuint) {
        self.calls.push(Call::VertexAttribDivisor(index, divisor));
    }

    fn draw_arrays(&mut self, mode: GLenum, first: GLint, count: GLsizei) {
        self.calls.push(Call::DrawArrays(mode, first, count));
    }

    fn draw_arrays_instanced(&mut self, mode: GLenum, first: GLint, count: GLsizei, instances: GLsizei) {
        self.calls
            .push(Call::DrawArraysInstanced(mode, first, count, instances));
    }

    fn draw_arrays_instanced_base_instance(
        &mut self,
        mode: GLenum,
        first: GLint,
        count: GLsizei,
        instances: GLsizei,
        base_instance: GLuint,
    ) {
        self.calls.push(Call::DrawArraysInstancedBaseInstance(
            mode,
            first,
            count,
            instances,
            base_instance,
        ));
    }

    fn draw_arrays_indirect(&mut self, mode: GLenum, offset: usize) {
        self.calls.push(Call::DrawArraysIndirect(mode, offset));
    }

    fn multi_draw_arrays_indirect(&mut self, mode: GLenum, offset: usize, draw_count: GLsizei, stride: GLsizei) {
        self.calls
            .push(Call::MultiDrawArraysIndirect(mode, offset, draw_count, stride));
    }

    fn draw_elements(&mut self, mode: GLenum, count: GLsizei, ty: GLenum, offset: usize) {
        self.calls.push(Call::DrawElements(mode, count, ty, offset));
    }

    fn draw_elements_instanced(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        instances: GLsizei,
    ) {
        self.calls
            .push(Call::DrawElementsInstanced(mode, count, ty, offset, instances));
    }

    fn draw_elements_base_vertex(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        base_vertex: GLint,
    ) {
        self.calls
            .push(Call::DrawElementsBaseVertex(mode, count, ty, offset, base_vertex));
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
        self.calls.push(Call::DrawElementsInstancedBaseVertex(
            mode,
            count,
            ty,
            offset,
            instances,
            base_vertex,
        ));
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
        self.calls
            .push(Call::DrawRangeElements(mode, start, end, count, ty, offset));
    }

    fn draw_elements_indirect(&mut self, mode: GLenum, ty: GLenum, offset: usize) {
        self.calls.push(Call::DrawElementsIndirect(mode, ty, offset));
    }

    fn multi_draw_elements_indirect(
        &mut self,
        mode: GLenum,
        ty: GLenum,
        offset: usize,
        draw_count: GLsizei,
        stride: GLsizei,
    ) {
        self.calls.push(Call::MultiDrawElementsIndirect(
            mode, ty, offset, draw_count, stride,
        ));
    }

    fn dispatch_compute(&mut self, x: GLuint, y: GLuint, z: GLuint) {
        self.calls.push(Call::DispatchCompute(x, y, z));
    }

    fn dispatch_compute_indirect(&mut self, offset: GLintptr) {
        self.calls.push(Call::DispatchComputeIndirect(offset));
    }

    fn begin_transform_feedback(&mut self, primitive_mode: GLenum) {
        self.calls.push(Call::BeginTransformFeedback(primitive_mode));
    }

    fn end_transform_feedback(&mut self) {
        self.calls.push(Call::EndTransformFeedback);
    }

    fn pause_transform_feedback(&mut self) {
        self.calls.push(Call::PauseTransformFeedback);
    }

    fn resume_transform_feedback(&mut self) {
        self.calls.push(Call::ResumeTransformFeedback);
    }

    fn clear(&mut self, mask: GLbitfield) {
        self.calls.push(Call::Clear(mask));
    }

    fn clear_buffer_fv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[f32]) {
        self.calls
            .push(Call::ClearBufferfv(buffer, draw_buffer, value.to_vec()));
    }

    fn clear_buffer_iv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[i32]) {
        self.calls
            .push(Call::ClearBufferiv(buffer, draw_buffer, value.to_vec()));
    }

    fn clear_buffer_uiv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[u32]) {
        self.calls
            .push(Call::ClearBufferuiv(buffer, draw_buffer, value.to_vec()));
    }

    fn clear_buffer_fi(&mut self, buffer: GLenum, draw_buffer: GLint, depth: f32, stencil: GLint) {
        self.calls
            .push(Call::ClearBufferfi(buffer, draw_buffer, depth, stencil));
    }

    fn blit_framebuffer(&mut self, src: [GLint; 4], dst: [GLint; 4], mask: GLbitfield, filter: GLenum) {
        self.calls.push(Call::BlitFramebuffer(src, dst, mask, filter));
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
        if let PixelsMut::Slice(v) = pixels {
            for byte in v.iter_mut() {
                *byte = 0;
            }
        }

        self.calls
            .push(Call::ReadPixels([x, y, width, height], format, ty));
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        textarget: GLenum,
        texture: GLuint,
        level: GLint,
    ) {
        self.calls.push(Call::FramebufferTexture2D(
            target, attachment, textarget, texture, level,
        ));
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    ) {
        self.calls.push(Call::FramebufferRenderbuffer(
            target,
            attachment,
            renderbuffer_target,
            renderbuffer,
        ));
    }

    fn renderbuffer_storage(&mut self, target: GLenum, internal_format: GLenum, width: GLsizei, height: GLsizei) {
        self.calls.push(Call::RenderbufferStorage(
            target,
            internal_format,
            width,
            height,
        ));
    }

    fn draw_buffers(&mut self, buffers: &[GLenum]) {
        self.calls.push(Call::DrawBuffers(buffers.to_vec()));
    }

    fn read_buffer(&mut self, mode: GLenum) {
        self.calls.push(Call::ReadBuffer(mode));
    }

    fn check_framebuffer_status(&mut self, target: GLenum) -> GLenum {
        self.calls.push(Call::CheckFramebufferStatus(target));
        gl::FRAMEBUFFER_COMPLETE
    }

    fn buffer_data(&mut self, target: GLenum, size: GLsizeiptr, _: Option<&[u8]>, usage: GLenum) {
        self.calls.push(Call::BufferData(target, size, usage));
    }

    fn buffer_sub_data(&mut self, target: GLenum, offset: GLintptr, data: &[u8]) {
        self.calls
            .push(Call::BufferSubData(target, offset, data.len()));
    }

    fn get_buffer_sub_data(&mut self, target: GLenum, offset: GLintptr, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte = 0;
        }

        self.calls
            .push(Call::GetBufferSubData(target, offset, data.len()));
    }

    fn map_buffer_range(
        &mut self,
        target: GLenum,
        offset: GLintptr,
        length: GLsizeiptr,
        access: GLbitfield,
    ) -> *mut c_void {
        self.calls
            .push(Call::MapBufferRange(target, offset, length, access));
        ptr::null_mut()
    }

    fn unmap_buffer(&mut self, target: GLenum) -> bool {
        self.calls.push(Call::UnmapBuffer(target));
        true
    }

    fn copy_buffer_sub_data(
        &mut self,
        read_target: GLenum,
        write_target: GLenum,
        read_offset: GLintptr,
        write_offset: GLintptr,
        size: GLsizeiptr,
    ) {
        self.calls.push(Call::CopyBufferSubData(
            read_target,
            write_target,
            read_offset,
            write_offset,
            size,
        ));
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
        _: Pixels,
    ) {
        self.calls.push(Call::TexImage2D(
            target,
            level,
            internal_format,
            width,
            height,
            format,
            ty,
        ));
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
        _: Pixels,
    ) {
        self.calls.push(Call::TexImage3D(
            target,
            level,
            internal_format,
            [width, height, depth],
            format,
            ty,
        ));
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
        _: Pixels,
    ) {
        self.calls.push(Call::TexSubImage2D(
            target,
            level,
            [xoffset, yoffset],
            [width, height],
            format,
            ty,
        ));
    }

    fn tex_sub_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        offset: [GLint; 3],
        size: [GLsizei; 3],
        format: GLenum,
        ty: GLenum,
        _: Pixels,
    ) {
        self.calls
            .push(Call::TexSubImage3D(target, level, offset, size, format, ty));
    }

    fn tex_storage_2d(&mut self, target: GLenum, levels: GLsizei, internal_format: GLenum, width: GLsizei, height: GLsizei) {
        self.calls.push(Call::TexStorage2D(
            target,
            levels,
            internal_format,
            width,
            height,
        ));
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
        self.calls.push(Call::TexStorage3D(
            target,
            levels,
            internal_format,
            [width, height, depth],
        ));
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
        self.calls.push(Call::CopyTexSubImage2D(
            target,
            level,
            [xoffset, yoffset],
            [x, y, width, height],
        ));
    }

    fn tex_parameter_i(&mut self, target: GLenum, pname: GLenum, value: GLint) {
        self.calls.push(Call::TexParameteri(target, pname, value));
    }

    fn tex_parameter_f(&mut self, target: GLenum, pname: GLenum, value: f32) {
        self.calls.push(Call::TexParameterf(target, pname, value));
    }

    fn generate_mipmap(&mut self, target: GLenum) {
        self.calls.push(Call::GenerateMipmap(target));
    }

    fn sampler_parameter_i(&mut self, sampler: GLuint, pname: GLenum, value: GLint) {
        self.calls
            .push(Call::SamplerParameteri(sampler, pname, value));
    }

    fn uniform_1i(&mut self, location: GLint, value: GLint) {
        self.calls.push(Call::Uniform1i(location, value));
    }

    fn uniform_1f(&mut self, location: GLint, value: f32) {
        self.calls.push(Call::Uniform1f(location, value));
    }

    fn uniform_4fv(&mut self, location: GLint, value: &[f32]) {
        self.calls.push(Call::Uniform4fv(location, value.to_vec()));
    }

    fn uniform_matrix_4fv(&mut self, location: GLint, transpose: bool, value: &[f32]) {
        self.calls
            .push(Call::UniformMatrix4fv(location, transpose, value.to_vec()));
    }

    fn flush(&mut self) {
        self.calls.push(Call::Flush);
    }

    fn finish(&mut self) {
        self.calls.push(Call::Finish);
    }

    fn get_error(&mut self) -> GLenum {
        gl::NO_ERROR
    }

    fn get_integerv(&mut self, pname: GLenum, data: &mut [GLint]) {
        let values = self.query(pname).to_vec();
        for (dst, src) in data.iter_mut().zip(values.iter().chain(::std::iter::repeat(&0.0))) {
            *dst = *src as GLint;
        }

        self.calls.push(Call::GetIntegerv(pname));
    }

    fn get_integeri_v(&mut self, pname: GLenum, index: GLuint, data: &mut [GLint]) {
        let values = self
            .indexed_queries
            .get(&(pname, index))
            .cloned()
            .unwrap_or_default();

        for (dst, src) in data.iter_mut().zip(values.iter().chain(::std::iter::repeat(&0.0))) {
            *dst = *src as GLint;
        }

        self.calls.push(Call::GetIntegeriv(pname, index));
    }

    fn get_floatv(&mut self, pname: GLenum, data: &mut [f32]) {
        let values = self.query(pname).to_vec();
        for (dst, src) in data.iter_mut().zip(values.iter().chain(::std::iter::repeat(&0.0))) {
            *dst = *src as f32;
        }

        self.calls.push(Call::GetFloatv(pname));
    }

    fn get_doublev(&mut self, pname: GLenum, data: &mut [f64]) {
        let values = self.query(pname).to_vec();
        for (dst, src) in data.iter_mut().zip(values.iter().chain(::std::iter::repeat(&0.0))) {
            *dst = *src;
        }

        self.calls.push(Call::GetDoublev(pname));
    }

    fn get_booleanv(&mut self, pname: GLenum, data: &mut [bool]) {
        let values = self.query(pname).to_vec();
        for (dst, src) in data.iter_mut().zip(values.iter().chain(::std::iter::repeat(&0.0))) {
            *dst = *src != 0.0;
        }

        self.calls.push(Call::GetBooleanv(pname));
    }

    fn is_enabled(&mut self, cap: GLenum) -> bool {
        self.calls.push(Call::IsEnabled(cap));
        self.enabled.contains(&cap)
    }

    fn get_string(&mut self, name: GLenum) -> Option<String> {
        self.calls.push(Call::GetString(name));
        match name {
            gl::VERSION => Some(self.version.clone()),
            gl::VENDOR => Some("ral-gl".to_owned()),
            gl::RENDERER => Some("Headless".to_owned()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn records_and_tracks_bindings() {
        let mut driver = HeadlessDriver::new();
        let mut ids = [0; 2];
        driver.gen_textures(&mut ids);
        assert_eq!(ids, [1, 2]);

        driver.active_texture(gl::TEXTURE0 + 3);
        driver.bind_texture(gl::TEXTURE_2D, ids[1]);
        assert_eq!(driver.bindings().textures[&(3, gl::TEXTURE_2D)], 2);

        driver.delete_textures(&ids);
        assert!(driver.bindings().textures.is_empty());
        assert_eq!(driver.calls().len(), 4);
        assert_eq!(driver.count(|v| *v == Call::BindTexture(gl::TEXTURE_2D, 2)), 1);
    }

    #[test]
    fn answers_presets() {
        let mut driver = HeadlessDriver::new();
        let mut v = [0; 1];
        driver.get_integerv(gl::MAX_VIEWPORTS, &mut v);
        assert_eq!(v[0], 16);

        driver.set_query(gl::DEPTH_FUNC, &[f64::from(gl::GREATER)]);
        driver.get_integerv(gl::DEPTH_FUNC, &mut v);
        assert_eq!(v[0] as GLenum, gl::GREATER);

        assert!(driver.is_enabled(gl::DITHER));
        assert!(!driver.is_enabled(gl::BLEND));
        assert_eq!(driver.get_string(gl::VERSION).unwrap(), "4.5.0 Headless");
    }
}
