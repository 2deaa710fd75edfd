use std::collections::HashMap;

use bitflags::bitflags;
use gl::types::*;

use crate::capabilities::Limits;
use crate::driver::Driver;
use crate::errors::*;
use crate::state::Slot;

/// Buffer binding points, except `GL_ELEMENT_ARRAY_BUFFER` which belongs to the vertex
/// array object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    AtomicCounter,
    CopyRead,
    CopyWrite,
    DispatchIndirect,
    DrawIndirect,
    PixelPack,
    PixelUnpack,
    Query,
    ShaderStorage,
    Texture,
    TransformFeedback,
    Uniform,
}

static TARGETS: [(BufferTarget, GLenum); 13] = [
    (BufferTarget::Array, gl::ARRAY_BUFFER),
    (BufferTarget::AtomicCounter, gl::ATOMIC_COUNTER_BUFFER),
    (BufferTarget::CopyRead, gl::COPY_READ_BUFFER),
    (BufferTarget::CopyWrite, gl::COPY_WRITE_BUFFER),
    (BufferTarget::DispatchIndirect, gl::DISPATCH_INDIRECT_BUFFER),
    (BufferTarget::DrawIndirect, gl::DRAW_INDIRECT_BUFFER),
    (BufferTarget::PixelPack, gl::PIXEL_PACK_BUFFER),
    (BufferTarget::PixelUnpack, gl::PIXEL_UNPACK_BUFFER),
    (BufferTarget::Query, gl::QUERY_BUFFER),
    (BufferTarget::ShaderStorage, gl::SHADER_STORAGE_BUFFER),
    (BufferTarget::Texture, gl::TEXTURE_BUFFER),
    (BufferTarget::TransformFeedback, gl::TRANSFORM_FEEDBACK_BUFFER),
    (BufferTarget::Uniform, gl::UNIFORM_BUFFER),
];

lazy_static! {
    static ref TARGETS_BY_ENUM: HashMap<GLenum, BufferTarget> =
        TARGETS.iter().map(|&(target, v)| (v, target)).collect();
    static ref TARGETS_BY_BINDING: HashMap<GLenum, BufferTarget> = TARGETS
        .iter()
        .map(|&(target, _)| (target.binding_query(), target))
        .collect();
}

impl BufferTarget {
    pub fn from_gl(target: GLenum) -> Option<BufferTarget> {
        TARGETS_BY_ENUM.get(&target).cloned()
    }

    /// Finds the target whose binding `glGet*` name is `pname`.
    pub fn from_binding_query(pname: GLenum) -> Option<BufferTarget> {
        TARGETS_BY_BINDING.get(&pname).cloned()
    }

    #[inline]
    pub fn gl(self) -> GLenum {
        TARGETS[self as usize].1
    }

    #[inline]
    pub fn bit(self) -> BufferSyncBits {
        BufferSyncBits::from_bits_retain(1 << (self as u32))
    }

    /// Returns true if the target has indexed binding points.
    pub fn is_indexed(self) -> bool {
        match self {
            BufferTarget::AtomicCounter
            | BufferTarget::ShaderStorage
            | BufferTarget::TransformFeedback
            | BufferTarget::Uniform => true,
            _ => false,
        }
    }

    pub fn binding_query(self) -> GLenum {
        match self {
            BufferTarget::Array => gl::ARRAY_BUFFER_BINDING,
            BufferTarget::AtomicCounter => gl::ATOMIC_COUNTER_BUFFER_BINDING,
            BufferTarget::CopyRead => gl::COPY_READ_BUFFER_BINDING,
            BufferTarget::CopyWrite => gl::COPY_WRITE_BUFFER_BINDING,
            BufferTarget::DispatchIndirect => gl::DISPATCH_INDIRECT_BUFFER_BINDING,
            BufferTarget::DrawIndirect => gl::DRAW_INDIRECT_BUFFER_BINDING,
            BufferTarget::PixelPack => gl::PIXEL_PACK_BUFFER_BINDING,
            BufferTarget::PixelUnpack => gl::PIXEL_UNPACK_BUFFER_BINDING,
            BufferTarget::Query => gl::QUERY_BUFFER_BINDING,
            BufferTarget::ShaderStorage => gl::SHADER_STORAGE_BUFFER_BINDING,
            BufferTarget::Texture => gl::TEXTURE_BUFFER_BINDING,
            BufferTarget::TransformFeedback => gl::TRANSFORM_FEEDBACK_BUFFER_BINDING,
            BufferTarget::Uniform => gl::UNIFORM_BUFFER_BINDING,
        }
    }

    /// The indexed queries reporting the start and size of a bound range.
    fn range_queries(self) -> Option<(GLenum, GLenum)> {
        match self {
            BufferTarget::AtomicCounter => Some((
                gl::ATOMIC_COUNTER_BUFFER_START,
                gl::ATOMIC_COUNTER_BUFFER_SIZE,
            )),
            BufferTarget::ShaderStorage => Some((
                gl::SHADER_STORAGE_BUFFER_START,
                gl::SHADER_STORAGE_BUFFER_SIZE,
            )),
            BufferTarget::TransformFeedback => Some((
                gl::TRANSFORM_FEEDBACK_BUFFER_START,
                gl::TRANSFORM_FEEDBACK_BUFFER_SIZE,
            )),
            BufferTarget::Uniform => Some((gl::UNIFORM_BUFFER_START, gl::UNIFORM_BUFFER_SIZE)),
            _ => None,
        }
    }

    fn count(self, limits: &Limits) -> u32 {
        match self {
            BufferTarget::AtomicCounter => limits.max_atomic_counter_buffer_bindings,
            BufferTarget::ShaderStorage => limits.max_shader_storage_buffer_bindings,
            BufferTarget::TransformFeedback => limits.max_transform_feedback_buffers,
            BufferTarget::Uniform => limits.max_uniform_buffer_bindings,
            _ => 0,
        }
    }
}

bitflags! {
    /// One bit per buffer target.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferSyncBits: u32 {
        const ARRAY = 1 << 0;
        const ATOMIC_COUNTER = 1 << 1;
        const COPY_READ = 1 << 2;
        const COPY_WRITE = 1 << 3;
        const DISPATCH_INDIRECT = 1 << 4;
        const DRAW_INDIRECT = 1 << 5;
        const PIXEL_PACK = 1 << 6;
        const PIXEL_UNPACK = 1 << 7;
        const QUERY = 1 << 8;
        const SHADER_STORAGE = 1 << 9;
        const TEXTURE = 1 << 10;
        const TRANSFORM_FEEDBACK = 1 << 11;
        const UNIFORM = 1 << 12;

        const ALL = (1 << 13) - 1;
    }
}

impl BufferSyncBits {
    /// The targets shaders read and write through indexed bindings.
    pub const SHADER: BufferSyncBits = BufferSyncBits::ATOMIC_COUNTER
        .union(BufferSyncBits::SHADER_STORAGE)
        .union(BufferSyncBits::TRANSFORM_FEEDBACK)
        .union(BufferSyncBits::UNIFORM);
}

/// A range bound to an indexed binding point. A zero `size` binds the whole buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferRange {
    pub buffer: GLuint,
    pub offset: GLintptr,
    pub size: GLsizeiptr,
}

impl BufferRange {
    /// The whole of `buffer`, as `glBindBufferBase` binds it.
    pub fn whole(buffer: GLuint) -> Self {
        BufferRange {
            buffer,
            offset: 0,
            size: 0,
        }
    }
}

/// Buffer bindings of every target, and the indexed ones of the targets that have them.
#[derive(Debug, Clone)]
pub struct BufferBindings {
    general: Vec<Slot<GLuint>>,
    indexed: Vec<Vec<Slot<BufferRange>>>,
    dirty: BufferSyncBits,
}

impl BufferBindings {
    pub fn new(limits: &Limits) -> Self {
        BufferBindings {
            general: TARGETS.iter().map(|_| Slot::new(0)).collect(),
            indexed: TARGETS
                .iter()
                .map(|v| vec![Slot::new(BufferRange::default()); v.0.count(limits) as usize])
                .collect(),
            dirty: BufferSyncBits::empty(),
        }
    }

    /// Reads every binding back from the driver. Nothing is pending afterwards.
    pub fn query(driver: &mut dyn Driver, limits: &Limits) -> Self {
        let mut bindings = BufferBindings::new(limits);

        for &(target, _) in TARGETS.iter() {
            let mut v = [0];
            driver.get_integerv(target.binding_query(), &mut v);
            bindings.general[target as usize] = Slot::new(v[0] as GLuint);

            if let Some((start, size)) = target.range_queries() {
                let slots = &mut bindings.indexed[target as usize];
                for (index, slot) in slots.iter_mut().enumerate() {
                    let index = index as GLuint;
                    let mut v = [0; 3];
                    driver.get_integeri_v(target.binding_query(), index, &mut v[..1]);
                    driver.get_integeri_v(start, index, &mut v[1..2]);
                    driver.get_integeri_v(size, index, &mut v[2..]);

                    *slot = Slot::new(BufferRange {
                        buffer: v[0] as GLuint,
                        offset: v[1] as GLintptr,
                        size: v[2] as GLsizeiptr,
                    });
                }
            }
        }

        debug!("Queried buffer bindings.");
        bindings
    }

    /// Forgets what the driver holds. Every binding is re-sent by the next sync.
    pub fn invalidate(&mut self) {
        for slot in &mut self.general {
            slot.invalidate();
        }

        for slot in self.indexed.iter_mut().flat_map(|v| v.iter_mut()) {
            slot.invalidate();
        }

        self.dirty = BufferSyncBits::ALL;
    }

    #[inline]
    pub fn get_binding(&self, target: BufferTarget) -> GLuint {
        self.general[target as usize].desired
    }

    pub fn set_binding(&mut self, target: BufferTarget, buffer: GLuint) {
        self.general[target as usize].desired = buffer;
        self.dirty.insert(target.bit());
    }

    pub fn get_indexed_binding(&self, target: BufferTarget, index: GLuint) -> Result<BufferRange> {
        self.check_index(target, index)?;
        Ok(self.indexed[target as usize][index as usize].desired)
    }

    /// Binds a range to an indexed binding point. Like the driver does, this also moves
    /// the general binding of the target.
    pub fn set_indexed_binding(
        &mut self,
        target: BufferTarget,
        index: GLuint,
        range: BufferRange,
    ) -> Result<()> {
        self.check_index(target, index)?;
        self.indexed[target as usize][index as usize].desired = range;
        self.general[target as usize].desired = range.buffer;
        self.dirty.insert(target.bit());
        Ok(())
    }

    #[inline]
    pub fn dirty_bits(&self) -> BufferSyncBits {
        self.dirty
    }

    #[inline]
    pub fn is_dirty(&self, bits: BufferSyncBits) -> bool {
        self.dirty.intersects(bits)
    }

    /// Commits the dirty targets among `bits`.
    pub fn sync(&mut self, driver: &mut dyn Driver, bits: BufferSyncBits) {
        let pending = self.dirty & bits;
        if pending.is_empty() {
            return;
        }

        for &(target, v) in TARGETS.iter() {
            if !pending.contains(target.bit()) {
                continue;
            }

            trace!("Commits buffer bindings of {:?}.", target);

            // Indexed binds move the general binding as well, so they go first.
            let general = &mut self.general[target as usize];
            for (index, slot) in self.indexed[target as usize].iter_mut().enumerate() {
                if let Some(range) = slot.commit() {
                    if range.size == 0 {
                        driver.bind_buffer_base(v, index as GLuint, range.buffer);
                    } else {
                        driver.bind_buffer_range(
                            v,
                            index as GLuint,
                            range.buffer,
                            range.offset,
                            range.size,
                        );
                    }

                    general.committed = Some(range.buffer);
                }
            }

            if let Some(buffer) = general.commit() {
                driver.bind_buffer(v, buffer);
            }
        }

        self.dirty.remove(pending);
    }

    /// Bindings are keyed by target, so new names need no slot of their own.
    pub fn on_objects_created(&mut self, ids: &[GLuint]) {
        trace!("Created buffers {:?}.", ids);
    }

    /// Resets every binding of a deleted buffer to 0.
    pub fn on_objects_deleted(&mut self, ids: &[GLuint]) {
        let dead = |id: GLuint| id != 0 && ids.contains(&id);

        for &(target, _) in TARGETS.iter() {
            let mut pending = self.general[target as usize].forget(ids);

            for slot in &mut self.indexed[target as usize] {
                if dead(slot.desired.buffer) {
                    slot.desired = BufferRange::default();
                }

                if slot.committed.map(|v| dead(v.buffer)).unwrap_or(false) {
                    slot.committed = Some(BufferRange::default());
                }

                pending |= slot.is_pending();
            }

            if pending {
                self.dirty.insert(target.bit());
            }
        }

        debug!("Forgot deleted buffers {:?}.", ids);
    }

    fn check_index(&self, target: BufferTarget, index: GLuint) -> Result<()> {
        if !target.is_indexed() {
            warn!("Rejected indexed binding of {:?}.", target);
            return Err(Error::InvalidEnum {
                what: "indexed buffer target",
                value: target.gl(),
            });
        }

        let limit = self.indexed[target as usize].len() as u32;
        if index >= limit {
            warn!("Rejected {:?} binding index {}.", target, index);
            return Err(Error::IndexOutOfRange {
                what: "buffer binding",
                index,
                limit,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::driver::{Call, HeadlessDriver};

    #[test]
    fn targets() {
        for (i, &(target, v)) in TARGETS.iter().enumerate() {
            assert_eq!(target as usize, i);
            assert_eq!(BufferTarget::from_gl(v), Some(target));
        }

        assert_eq!(BufferTarget::from_gl(gl::ELEMENT_ARRAY_BUFFER), None);
        assert_eq!(
            BufferTarget::from_binding_query(gl::UNIFORM_BUFFER_BINDING),
            Some(BufferTarget::Uniform)
        );
        assert_eq!(BufferTarget::Uniform.bit(), BufferSyncBits::UNIFORM);
        assert_eq!(BufferTarget::Array.bit(), BufferSyncBits::ARRAY);
    }

    #[test]
    fn general_bindings() {
        let mut buffers = BufferBindings::new(&Limits::default());
        let mut driver = HeadlessDriver::new();

        buffers.set_binding(BufferTarget::Array, 1);
        buffers.set_binding(BufferTarget::Array, 2);
        buffers.set_binding(BufferTarget::PixelPack, 3);
        assert!(driver.calls().is_empty());

        buffers.sync(&mut driver, BufferSyncBits::ARRAY);
        assert_eq!(driver.calls(), &[Call::BindBuffer(gl::ARRAY_BUFFER, 2)]);
        assert!(buffers.is_dirty(BufferSyncBits::PIXEL_PACK));

        driver.clear_calls();
        buffers.set_binding(BufferTarget::Array, 2);
        buffers.sync(&mut driver, BufferSyncBits::ALL);
        assert_eq!(driver.calls(), &[Call::BindBuffer(gl::PIXEL_PACK_BUFFER, 3)]);
    }

    #[test]
    fn indexed_bindings() {
        let mut buffers = BufferBindings::new(&Limits::default());
        let mut driver = HeadlessDriver::new();

        let range = BufferRange {
            buffer: 4,
            offset: 256,
            size: 64,
        };

        buffers.set_indexed_binding(BufferTarget::Uniform, 1, range).unwrap();
        buffers
            .set_indexed_binding(BufferTarget::Uniform, 0, BufferRange::whole(5))
            .unwrap();
        assert_eq!(buffers.get_binding(BufferTarget::Uniform), 5);

        buffers.sync(&mut driver, BufferSyncBits::SHADER);
        assert_eq!(
            driver.calls(),
            &[
                Call::BindBufferBase(gl::UNIFORM_BUFFER, 0, 5),
                Call::BindBufferRange(gl::UNIFORM_BUFFER, 1, 4, 256, 64),
                Call::BindBuffer(gl::UNIFORM_BUFFER, 5),
            ]
        );

        assert!(buffers
            .set_indexed_binding(BufferTarget::Array, 0, range)
            .is_err());
        assert!(buffers
            .set_indexed_binding(BufferTarget::AtomicCounter, 1, range)
            .is_err());
        assert_eq!(
            buffers.get_indexed_binding(BufferTarget::Uniform, 1).unwrap(),
            range
        );
    }

    #[test]
    fn query() {
        let mut driver = HeadlessDriver::new();
        driver.set_query(gl::ARRAY_BUFFER_BINDING, &[4.0]);
        driver.set_indexed_query(gl::UNIFORM_BUFFER_BINDING, 2, &[8.0]);
        driver.set_indexed_query(gl::UNIFORM_BUFFER_START, 2, &[256.0]);
        driver.set_indexed_query(gl::UNIFORM_BUFFER_SIZE, 2, &[64.0]);

        let mut bindings = BufferBindings::query(&mut driver, &Limits::default());
        assert_eq!(bindings.get_binding(BufferTarget::Array), 4);
        assert_eq!(bindings.get_binding(BufferTarget::Uniform), 0);
        assert_eq!(
            bindings.get_indexed_binding(BufferTarget::Uniform, 2).unwrap(),
            BufferRange {
                buffer: 8,
                offset: 256,
                size: 64,
            }
        );
        assert!(bindings.dirty_bits().is_empty());

        driver.clear_calls();
        bindings.set_binding(BufferTarget::Array, 0);
        bindings.set_indexed_binding(BufferTarget::Uniform, 2, BufferRange::whole(0)).unwrap();
        bindings.sync(&mut driver, BufferSyncBits::ALL);
        assert!(driver.calls().contains(&Call::BindBuffer(gl::ARRAY_BUFFER, 0)));
        assert!(driver.calls().contains(&Call::BindBufferBase(gl::UNIFORM_BUFFER, 2, 0)));
    }

    #[test]
    fn deleted_buffers() {
        let mut buffers = BufferBindings::new(&Limits::default());
        let mut driver = HeadlessDriver::new();

        buffers.set_binding(BufferTarget::Array, 7);
        buffers
            .set_indexed_binding(BufferTarget::ShaderStorage, 2, BufferRange::whole(7))
            .unwrap();
        buffers.sync(&mut driver, BufferSyncBits::ALL);

        buffers.on_objects_deleted(&[7]);
        assert_eq!(buffers.get_binding(BufferTarget::Array), 0);
        assert_eq!(
            buffers
                .get_indexed_binding(BufferTarget::ShaderStorage, 2)
                .unwrap(),
            BufferRange::default()
        );

        driver.clear_calls();
        buffers.sync(&mut driver, BufferSyncBits::ALL);
        assert!(driver.calls().is_empty());
    }
}
