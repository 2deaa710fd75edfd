//! Vertex specification.
//!
//! The driver applies these commands to the vertex array it has bound, so the vertex
//! array binding is committed first. The record of that vertex array mirrors what was
//! issued, which lets a command repeating the current format be dropped entirely.

use gl::types::*;

use crate::bindings::{BufferSyncBits, BufferTarget, VaoRecord, VertexAttribute, VertexBufferBinding};
use crate::context::{Context, SyncRequest};
use crate::driver::Driver;
use crate::errors::*;
use crate::state::SyncBits;

/// The stride of tightly packed attributes of `size` components of type `ty`.
fn packed_stride(size: GLint, ty: GLenum) -> GLsizei {
    let bytes = match ty {
        gl::BYTE | gl::UNSIGNED_BYTE => 1,
        gl::SHORT | gl::UNSIGNED_SHORT | gl::HALF_FLOAT => 2,
        gl::DOUBLE => 8,
        gl::INT_2_10_10_10_REV | gl::UNSIGNED_INT_2_10_10_10_REV => return 4,
        _ => 4,
    };

    size * bytes
}

impl<D: Driver> Context<D> {
    pub fn enable_vertex_attrib_array(&mut self, index: GLuint) -> Result<()> {
        let attribute = VertexAttribute {
            enabled: true,
            ..*self.current_vertex_array()?.attribute(index)?
        };

        self.update_vertex_array(Some((index, attribute)), None, BufferSyncBits::empty(), |d| {
            d.enable_vertex_attrib_array(index)
        })
    }

    pub fn disable_vertex_attrib_array(&mut self, index: GLuint) -> Result<()> {
        let attribute = VertexAttribute {
            enabled: false,
            ..*self.current_vertex_array()?.attribute(index)?
        };

        self.update_vertex_array(Some((index, attribute)), None, BufferSyncBits::empty(), |d| {
            d.disable_vertex_attrib_array(index)
        })
    }

    pub fn vertex_attrib_format(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        relative_offset: GLuint,
    ) -> Result<()> {
        let attribute = VertexAttribute {
            size,
            ty,
            normalized,
            integer: false,
            relative_offset,
            ..*self.current_vertex_array()?.attribute(index)?
        };

        self.update_vertex_array(Some((index, attribute)), None, BufferSyncBits::empty(), |d| {
            d.vertex_attrib_format(index, size, ty, normalized, relative_offset)
        })
    }

    pub fn vertex_attrib_i_format(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        relative_offset: GLuint,
    ) -> Result<()> {
        let attribute = VertexAttribute {
            size,
            ty,
            normalized: false,
            integer: true,
            relative_offset,
            ..*self.current_vertex_array()?.attribute(index)?
        };

        self.update_vertex_array(Some((index, attribute)), None, BufferSyncBits::empty(), |d| {
            d.vertex_attrib_i_format(index, size, ty, relative_offset)
        })
    }

    pub fn vertex_attrib_binding(&mut self, index: GLuint, binding: GLuint) -> Result<()> {
        let record = self.current_vertex_array()?;
        record.binding(binding)?;

        let attribute = VertexAttribute {
            binding,
            ..*record.attribute(index)?
        };

        self.update_vertex_array(Some((index, attribute)), None, BufferSyncBits::empty(), |d| {
            d.vertex_attrib_binding(index, binding)
        })
    }

    pub fn vertex_binding_divisor(&mut self, binding: GLuint, divisor: GLuint) -> Result<()> {
        let v = VertexBufferBinding {
            divisor,
            ..*self.current_vertex_array()?.binding(binding)?
        };

        self.update_vertex_array(None, Some((binding, v)), BufferSyncBits::empty(), |d| {
            d.vertex_binding_divisor(binding, divisor)
        })
    }

    pub fn bind_vertex_buffer(
        &mut self,
        binding: GLuint,
        buffer: GLuint,
        offset: GLintptr,
        stride: GLsizei,
    ) -> Result<()> {
        let v = VertexBufferBinding {
            buffer,
            offset,
            stride,
            ..*self.current_vertex_array()?.binding(binding)?
        };

        self.update_vertex_array(None, Some((binding, v)), BufferSyncBits::empty(), |d| {
            d.bind_vertex_buffer(binding, buffer, offset, stride)
        })
    }

    /// Sources attribute `index` from the buffer bound to `ARRAY_BUFFER`, through the
    /// vertex buffer binding of the same index.
    pub fn vertex_attrib_pointer(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) -> Result<()> {
        let (attribute, binding) = self.pointer(index, size, ty, normalized, false, stride, offset)?;
        self.update_vertex_array(
            Some((index, attribute)),
            Some((index, binding)),
            BufferSyncBits::ARRAY,
            |d| d.vertex_attrib_pointer(index, size, ty, normalized, stride, offset),
        )
    }

    pub fn vertex_attrib_i_pointer(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        stride: GLsizei,
        offset: usize,
    ) -> Result<()> {
        let (attribute, binding) = self.pointer(index, size, ty, false, true, stride, offset)?;
        self.update_vertex_array(
            Some((index, attribute)),
            Some((index, binding)),
            BufferSyncBits::ARRAY,
            |d| d.vertex_attrib_i_pointer(index, size, ty, stride, offset),
        )
    }

    /// Sets the divisor of the vertex buffer binding `index`, and sources attribute
    /// `index` from it.
    pub fn vertex_attrib_divisor(&mut self, index: GLuint, divisor: GLuint) -> Result<()> {
        let record = self.current_vertex_array()?;
        let attribute = VertexAttribute {
            binding: index,
            ..*record.attribute(index)?
        };

        let binding = VertexBufferBinding {
            divisor,
            ..*record.binding(index)?
        };

        self.update_vertex_array(
            Some((index, attribute)),
            Some((index, binding)),
            BufferSyncBits::empty(),
            |d| d.vertex_attrib_divisor(index, divisor),
        )
    }

    fn current_vertex_array(&self) -> Result<&VaoRecord> {
        self.vaos.record(self.state.vertex_array())
    }

    fn pointer(
        &self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        integer: bool,
        stride: GLsizei,
        offset: usize,
    ) -> Result<(VertexAttribute, VertexBufferBinding)> {
        let record = self.current_vertex_array()?;
        let attribute = VertexAttribute {
            size,
            ty,
            normalized,
            integer,
            relative_offset: 0,
            binding: index,
            ..*record.attribute(index)?
        };

        let binding = VertexBufferBinding {
            buffer: self.buffers.get_binding(BufferTarget::Array),
            offset: offset as GLintptr,
            stride: if stride == 0 {
                packed_stride(size, ty)
            } else {
                stride
            },
            ..*record.binding(index)?
        };

        Ok((attribute, binding))
    }

    /// Issues a command changing the vertex array in use, unless the new attribute and
    /// binding state equal the recorded one.
    fn update_vertex_array<F>(
        &mut self,
        attribute: Option<(GLuint, VertexAttribute)>,
        binding: Option<(GLuint, VertexBufferBinding)>,
        buffers: BufferSyncBits,
        issue: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut D),
    {
        let vao = self.state.vertex_array();

        {
            let record = self.vaos.record(vao)?;
            let mut unchanged = true;

            if let Some((index, ref v)) = attribute {
                unchanged &= record.attribute(index)? == v && record.is_attribute_known(index);
            }

            if let Some((index, ref v)) = binding {
                unchanged &= record.binding(index)? == v && record.is_binding_known(index);
            }

            if unchanged {
                trace!("Skips redundant format change of vertex array {}.", vao);
                return Ok(());
            }
        }

        self.sync(SyncRequest::state(SyncBits::VERTEX_ARRAY_OBJECT).with_buffers(buffers));
        issue(&mut self.driver);

        let record = self.vaos.record_mut(vao)?;
        if let Some((index, v)) = attribute {
            record.attributes[index as usize] = v;
        }

        if let Some((index, v)) = binding {
            record.bindings[index as usize] = v;
        }

        Ok(())
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
    fn repeated_formats_are_dropped() {
        let mut ctx = setup();
        let mut vao = [0];
        ctx.gen_vertex_arrays(&mut vao);
        ctx.bind_vertex_array(vao[0]).unwrap();

        ctx.driver_mut().clear_calls();
        ctx.vertex_attrib_format(0, 3, gl::FLOAT, false, 12).unwrap();
        ctx.vertex_attrib_format(0, 3, gl::FLOAT, false, 12).unwrap();
        ctx.enable_vertex_attrib_array(0).unwrap();
        ctx.enable_vertex_attrib_array(0).unwrap();

        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindVertexArray(vao[0]),
                Call::VertexAttribFormat(0, 3, gl::FLOAT, false, 12),
                Call::EnableVertexAttribArray(0),
            ]
        );

        let attribute = *ctx.vertex_arrays().record(vao[0]).unwrap().attribute(0).unwrap();
        assert!(attribute.enabled);
        assert_eq!(attribute.relative_offset, 12);

        // The default vertex array is untouched.
        assert!(!ctx.vertex_arrays().record(0).unwrap().attribute(0).unwrap().enabled);
    }

    #[test]
    fn default_formats_never_reach_the_driver() {
        let mut ctx = setup();
        ctx.vertex_attrib_format(2, 4, gl::FLOAT, false, 0).unwrap();
        ctx.vertex_attrib_binding(2, 2).unwrap();
        ctx.vertex_binding_divisor(2, 0).unwrap();
        ctx.disable_vertex_attrib_array(2).unwrap();
        assert!(ctx.driver().calls().is_empty());
    }

    #[test]
    fn pointers_use_the_array_buffer() {
        let mut ctx = setup();
        ctx.bind_buffer(gl::ARRAY_BUFFER, 3).unwrap();
        ctx.vertex_attrib_pointer(1, 2, gl::FLOAT, false, 0, 8).unwrap();

        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindBuffer(gl::ARRAY_BUFFER, 3),
                Call::VertexAttribPointer(1, 2, gl::FLOAT, false, 0, 8),
            ]
        );

        let record = ctx.vertex_arrays().record(0).unwrap();
        assert_eq!(record.binding(1).unwrap().buffer, 3);
        assert_eq!(record.binding(1).unwrap().stride, 8);
        assert_eq!(record.binding(1).unwrap().offset, 8);

        ctx.driver_mut().clear_calls();
        ctx.vertex_attrib_pointer(1, 2, gl::FLOAT, false, 8, 8).unwrap();
        assert!(ctx.driver().calls().is_empty());

        ctx.vertex_attrib_i_pointer(1, 2, gl::INT, 8, 8).unwrap();
        assert_eq!(ctx.driver().calls(), &[Call::VertexAttribIPointer(1, 2, gl::INT, 8, 8)]);
    }

    #[test]
    fn divisors_and_buffers() {
        let mut ctx = setup();
        ctx.bind_vertex_buffer(0, 5, 16, 32).unwrap();
        ctx.vertex_attrib_divisor(3, 1).unwrap();
        ctx.vertex_attrib_divisor(3, 1).unwrap();

        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindVertexBuffer(0, 5, 16, 32),
                Call::VertexAttribDivisor(3, 1),
            ]
        );

        let record = ctx.vertex_arrays().record(0).unwrap();
        assert_eq!(record.binding(3).unwrap().divisor, 1);
        assert_eq!(record.attribute(3).unwrap().binding, 3);

        ctx.delete_buffers(&[5]);
        let record = ctx.vertex_arrays().record(0).unwrap();
        assert_eq!(record.binding(0).unwrap().buffer, 0);
        assert!(record.is_binding_known(0));
    }

    #[test]
    fn buffers_deleted_while_another_vertex_array_is_bound() {
        let mut ctx = setup();
        let mut vaos = [0; 2];
        let mut buffer = [0];
        ctx.gen_vertex_arrays(&mut vaos);
        ctx.gen_buffers(&mut buffer);

        ctx.bind_vertex_array(vaos[0]).unwrap();
        ctx.bind_vertex_buffer(0, buffer[0], 0, 16).unwrap();
        ctx.bind_vertex_array(vaos[1]).unwrap();
        ctx.draw_arrays(gl::POINTS, 0, 1);
        ctx.delete_buffers(&buffer);

        // The first vertex array still references the deleted buffer in the driver.
        let record = ctx.vertex_arrays().record(vaos[0]).unwrap();
        assert_eq!(record.binding(0).unwrap().buffer, 0);
        assert!(!record.is_binding_known(0));

        ctx.bind_vertex_array(vaos[0]).unwrap();
        ctx.driver_mut().clear_calls();
        ctx.bind_vertex_buffer(0, 0, 0, 16).unwrap();
        ctx.bind_vertex_buffer(0, 0, 0, 16).unwrap();
        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindVertexArray(vaos[0]),
                Call::BindVertexBuffer(0, 0, 0, 16),
                Call::BindVertexBuffer(0, 0, 0, 16),
            ]
        );
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let mut ctx = setup();
        assert!(ctx.enable_vertex_attrib_array(16).is_err());
        assert!(ctx.vertex_attrib_binding(0, 16).is_err());
        assert!(ctx.bind_vertex_buffer(16, 1, 0, 16).is_err());
        assert!(ctx.driver().calls().is_empty());
        assert!(!ctx.vertex_arrays().record(0).unwrap().attribute(0).unwrap().enabled);
    }
}
