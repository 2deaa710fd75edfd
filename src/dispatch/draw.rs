//! Draws, compute dispatches, clears, blits and readbacks.

use gl::types::*;

use crate::bindings::BufferSyncBits;
use crate::context::{Context, SyncRequest};
use crate::driver::{Driver, PixelsMut};
use crate::state::SyncBits;

/// What a draw consumes, besides the element buffer and the indirect buffer.
fn draw_request(buffers: BufferSyncBits) -> SyncRequest {
    SyncRequest::state(SyncBits::DRAW)
        .with_buffers(BufferSyncBits::SHADER | buffers)
        .with_textures()
}

fn elements_request(buffers: BufferSyncBits) -> SyncRequest {
    draw_request(buffers).with_element_buffer()
}

fn compute_request(buffers: BufferSyncBits) -> SyncRequest {
    SyncRequest::state(SyncBits::PROGRAM_OBJECT)
        .with_buffers(BufferSyncBits::SHADER | buffers)
        .with_textures()
}

fn clear_request(mask: GLbitfield) -> SyncRequest {
    let mut bits = SyncBits::CLEAR;

    if mask & gl::COLOR_BUFFER_BIT != 0 {
        bits |= SyncBits::CLEAR_COLOR;
    }

    if mask & gl::DEPTH_BUFFER_BIT != 0 {
        bits |= SyncBits::CLEAR_DEPTH;
    }

    if mask & gl::STENCIL_BUFFER_BIT != 0 {
        bits |= SyncBits::CLEAR_STENCIL;
    }

    SyncRequest::state(bits)
}

impl<D: Driver> Context<D> {
    pub fn draw_arrays(&mut self, mode: GLenum, first: GLint, count: GLsizei) {
        self.sync(draw_request(BufferSyncBits::empty()));
        self.driver.draw_arrays(mode, first, count);
    }

    pub fn draw_arrays_instanced(&mut self, mode: GLenum, first: GLint, count: GLsizei, instances: GLsizei) {
        self.sync(draw_request(BufferSyncBits::empty()));
        self.driver
            .draw_arrays_instanced(mode, first, count, instances);
    }

    pub fn draw_arrays_instanced_base_instance(
        &mut self,
        mode: GLenum,
        first: GLint,
        count: GLsizei,
        instances: GLsizei,
        base_instance: GLuint,
    ) {
        self.sync(draw_request(BufferSyncBits::empty()));
        self.driver
            .draw_arrays_instanced_base_instance(mode, first, count, instances, base_instance);
    }

    /// `offset` is a byte offset into the draw indirect buffer.
    pub fn draw_arrays_indirect(&mut self, mode: GLenum, offset: usize) {
        self.sync(draw_request(BufferSyncBits::DRAW_INDIRECT));
        self.driver.draw_arrays_indirect(mode, offset);
    }

    pub fn multi_draw_arrays_indirect(
        &mut self,
        mode: GLenum,
        offset: usize,
        draw_count: GLsizei,
        stride: GLsizei,
    ) {
        self.sync(draw_request(BufferSyncBits::DRAW_INDIRECT));
        self.driver
            .multi_draw_arrays_indirect(mode, offset, draw_count, stride);
    }

    /// `offset` is a byte offset into the element buffer of the vertex array in use.
    pub fn draw_elements(&mut self, mode: GLenum, count: GLsizei, ty: GLenum, offset: usize) {
        self.sync(elements_request(BufferSyncBits::empty()));
        self.driver.draw_elements(mode, count, ty, offset);
    }

    pub fn draw_elements_instanced(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        instances: GLsizei,
    ) {
        self.sync(elements_request(BufferSyncBits::empty()));
        self.driver
            .draw_elements_instanced(mode, count, ty, offset, instances);
    }

    pub fn draw_elements_base_vertex(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        base_vertex: GLint,
    ) {
        self.sync(elements_request(BufferSyncBits::empty()));
        self.driver
            .draw_elements_base_vertex(mode, count, ty, offset, base_vertex);
    }

    pub fn draw_elements_instanced_base_vertex(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
        instances: GLsizei,
        base_vertex: GLint,
    ) {
        self.sync(elements_request(BufferSyncBits::empty()));
        self.driver.draw_elements_instanced_base_vertex(
            mode,
            count,
            ty,
            offset,
            instances,
            base_vertex,
        );
    }

    pub fn draw_range_elements(
        &mut self,
        mode: GLenum,
        start: GLuint,
        end: GLuint,
        count: GLsizei,
        ty: GLenum,
        offset: usize,
    ) {
        self.sync(elements_request(BufferSyncBits::empty()));
        self.driver
            .draw_range_elements(mode, start, end, count, ty, offset);
    }

    pub fn draw_elements_indirect(&mut self, mode: GLenum, ty: GLenum, offset: usize) {
        self.sync(elements_request(BufferSyncBits::DRAW_INDIRECT));
        self.driver.draw_elements_indirect(mode, ty, offset);
    }

    pub fn multi_draw_elements_indirect(
        &mut self,
        mode: GLenum,
        ty: GLenum,
        offset: usize,
        draw_count: GLsizei,
        stride: GLsizei,
    ) {
        self.sync(elements_request(BufferSyncBits::DRAW_INDIRECT));
        self.driver
            .multi_draw_elements_indirect(mode, ty, offset, draw_count, stride);
    }

    pub fn dispatch_compute(&mut self, x: GLuint, y: GLuint, z: GLuint) {
        self.sync(compute_request(BufferSyncBits::empty()));
        self.driver.dispatch_compute(x, y, z);
    }

    pub fn dispatch_compute_indirect(&mut self, offset: GLintptr) {
        self.sync(compute_request(BufferSyncBits::DISPATCH_INDIRECT));
        self.driver.dispatch_compute_indirect(offset);
    }

    pub fn begin_transform_feedback(&mut self, primitive_mode: GLenum) {
        self.sync(transform_feedback_request());
        self.driver.begin_transform_feedback(primitive_mode);
    }

    pub fn end_transform_feedback(&mut self) {
        self.driver.end_transform_feedback();
    }

    pub fn pause_transform_feedback(&mut self) {
        self.driver.pause_transform_feedback();
    }

    pub fn resume_transform_feedback(&mut self) {
        self.sync(transform_feedback_request());
        self.driver.resume_transform_feedback();
    }

    /// Clears the buffers in `mask`. Clear values are only committed for the buffers
    /// actually cleared.
    pub fn clear(&mut self, mask: GLbitfield) {
        self.sync(clear_request(mask));
        self.driver.clear(mask);
    }

    pub fn clear_buffer_fv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[f32]) {
        self.sync(SyncRequest::state(SyncBits::CLEAR));
        self.driver.clear_buffer_fv(buffer, draw_buffer, value);
    }

    pub fn clear_buffer_iv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[i32]) {
        self.sync(SyncRequest::state(SyncBits::CLEAR));
        self.driver.clear_buffer_iv(buffer, draw_buffer, value);
    }

    pub fn clear_buffer_uiv(&mut self, buffer: GLenum, draw_buffer: GLint, value: &[u32]) {
        self.sync(SyncRequest::state(SyncBits::CLEAR));
        self.driver.clear_buffer_uiv(buffer, draw_buffer, value);
    }

    pub fn clear_buffer_fi(&mut self, buffer: GLenum, draw_buffer: GLint, depth: f32, stencil: GLint) {
        self.sync(SyncRequest::state(SyncBits::CLEAR));
        self.driver
            .clear_buffer_fi(buffer, draw_buffer, depth, stencil);
    }

    pub fn blit_framebuffer(
        &mut self,
        src: [GLint; 4],
        dst: [GLint; 4],
        mask: GLbitfield,
        filter: GLenum,
    ) {
        let bits = SyncBits::DRAW_FRAMEBUFFER
            | SyncBits::READ_FRAMEBUFFER
            | SyncBits::RENDERING_MODES
            | SyncBits::SCISSOR_BOX;

        self.sync(SyncRequest::state(bits));
        self.driver.blit_framebuffer(src, dst, mask, filter);
    }

    pub fn read_pixels(
        &mut self,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelsMut,
    ) {
        let request = SyncRequest::state(SyncBits::READ_FRAMEBUFFER)
            .with_buffers(BufferSyncBits::PIXEL_PACK);

        self.sync(request);
        self.driver
            .read_pixels(x, y, width, height, format, ty, pixels);
    }
}

fn transform_feedback_request() -> SyncRequest {
    SyncRequest::state(SyncBits::PROGRAM_OBJECT).with_buffers(BufferSyncBits::TRANSFORM_FEEDBACK)
}
