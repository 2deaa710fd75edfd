use std::collections::HashMap;

use gl::types::*;

use crate::capabilities::Limits;
use crate::driver::Driver;
use crate::errors::*;
use crate::state::Slot;

/// The format of a generic vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub enabled: bool,
    pub size: GLint,
    pub ty: GLenum,
    pub normalized: bool,
    /// Fetched as integers, set through the `I` variants of the format commands.
    pub integer: bool,
    pub relative_offset: GLuint,
    /// The vertex buffer binding the attribute is sourced from.
    pub binding: GLuint,
}

impl VertexAttribute {
    /// The initial state of attribute `index`.
    pub fn new(index: GLuint) -> Self {
        VertexAttribute {
            enabled: false,
            size: 4,
            ty: gl::FLOAT,
            normalized: false,
            integer: false,
            relative_offset: 0,
            binding: index,
        }
    }
}

/// A vertex buffer binding point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferBinding {
    pub buffer: GLuint,
    pub offset: GLintptr,
    pub stride: GLsizei,
    pub divisor: GLuint,
}

impl Default for VertexBufferBinding {
    fn default() -> Self {
        VertexBufferBinding {
            buffer: 0,
            offset: 0,
            stride: 16,
            divisor: 0,
        }
    }
}

/// The state held by one vertex array object.
///
/// Attribute and binding state mirrors what the driver holds, since the commands that
/// change it are issued immediately. The element buffer binding is deferred like the
/// rest of the binding state.
///
/// An entry the driver may hold differently (after `invalidate`, or when the context
/// started from queried state) is stale. Commands on a stale entry are always issued,
/// and it stays stale until the vertex array is deleted.
#[derive(Debug, Clone)]
pub struct VaoRecord {
    pub attributes: Vec<VertexAttribute>,
    pub bindings: Vec<VertexBufferBinding>,
    stale_attributes: Vec<bool>,
    stale_bindings: Vec<bool>,
    element_buffer: Slot<GLuint>,
}

impl VaoRecord {
    fn new(limits: &Limits) -> Self {
        let attributes = (0..limits.max_vertex_attribs.max(1))
            .map(VertexAttribute::new)
            .collect();

        let bindings = limits.max_vertex_attrib_bindings.max(1) as usize;

        VaoRecord {
            stale_attributes: vec![false; limits.max_vertex_attribs.max(1) as usize],
            stale_bindings: vec![false; bindings],
            attributes,
            bindings: vec![Default::default(); bindings],
            element_buffer: Slot::new(0),
        }
    }

    fn forget(&mut self) {
        for v in self.stale_attributes.iter_mut().chain(self.stale_bindings.iter_mut()) {
            *v = true;
        }

        self.element_buffer.invalidate();
    }

    /// Returns true if the driver is known to hold the recorded attribute `index`.
    #[inline]
    pub fn is_attribute_known(&self, index: GLuint) -> bool {
        self.stale_attributes.get(index as usize) == Some(&false)
    }

    /// Returns true if the driver is known to hold the recorded binding `index`.
    #[inline]
    pub fn is_binding_known(&self, index: GLuint) -> bool {
        self.stale_bindings.get(index as usize) == Some(&false)
    }

    #[inline]
    pub fn element_buffer(&self) -> GLuint {
        self.element_buffer.desired
    }

    pub fn attribute(&self, index: GLuint) -> Result<&VertexAttribute> {
        let limit = self.attributes.len() as u32;
        self.attributes.get(index as usize).ok_or_else(|| {
            warn!("Rejected vertex attribute {}.", index);
            Error::IndexOutOfRange {
                what: "vertex attribute",
                index,
                limit,
            }
        })
    }

    pub fn binding(&self, index: GLuint) -> Result<&VertexBufferBinding> {
        let limit = self.bindings.len() as u32;
        self.bindings.get(index as usize).ok_or_else(|| {
            warn!("Rejected vertex buffer binding {}.", index);
            Error::IndexOutOfRange {
                what: "vertex buffer binding",
                index,
                limit,
            }
        })
    }
}

/// Vertex array objects by name. The default vertex array 0 always exists.
#[derive(Debug, Clone)]
pub struct VaoRegistry {
    records: HashMap<GLuint, VaoRecord>,
    limits: Limits,
}

impl VaoRegistry {
    pub fn new(limits: &Limits) -> Self {
        let mut records = HashMap::new();
        records.insert(0, VaoRecord::new(limits));

        VaoRegistry {
            records,
            limits: *limits,
        }
    }

    /// Registers the vertex array `vao` the driver has bound, with the element buffer
    /// the driver reports. Everything else the driver holds is unknown.
    pub fn query(driver: &mut dyn Driver, limits: &Limits, vao: GLuint) -> Self {
        let mut vaos = VaoRegistry::new(limits);
        vaos.records
            .entry(vao)
            .or_insert_with(|| VaoRecord::new(limits));
        vaos.invalidate();

        let mut v = [0];
        driver.get_integerv(gl::ELEMENT_ARRAY_BUFFER_BINDING, &mut v);
        if let Some(record) = vaos.records.get_mut(&vao) {
            record.element_buffer = Slot::new(v[0] as GLuint);
        }

        debug!("Queried vertex array {}.", vao);
        vaos
    }

    pub fn record(&self, vao: GLuint) -> Result<&VaoRecord> {
        self.records.get(&vao).ok_or_else(|| {
            warn!("Rejected unknown vertex array object {}.", vao);
            Error::UnknownVertexArray(vao)
        })
    }

    pub fn record_mut(&mut self, vao: GLuint) -> Result<&mut VaoRecord> {
        self.records.get_mut(&vao).ok_or_else(|| {
            warn!("Rejected unknown vertex array object {}.", vao);
            Error::UnknownVertexArray(vao)
        })
    }

    #[inline]
    pub fn contains(&self, vao: GLuint) -> bool {
        self.records.contains_key(&vao)
    }

    pub fn set_element_buffer(&mut self, vao: GLuint, buffer: GLuint) -> Result<()> {
        self.record_mut(vao)?.element_buffer.desired = buffer;
        Ok(())
    }

    /// Returns true if the element buffer of `vao` waits for a sync.
    pub fn is_dirty(&self, vao: GLuint) -> bool {
        self.records
            .get(&vao)
            .map(|v| v.element_buffer.is_pending())
            .unwrap_or(false)
    }

    /// Commits the element buffer of `vao`, which must be the vertex array the driver
    /// has bound.
    pub fn sync(&mut self, driver: &mut dyn Driver, vao: GLuint) {
        if let Some(record) = self.records.get_mut(&vao) {
            if let Some(buffer) = record.element_buffer.commit() {
                trace!("Commits element buffer {} of vertex array {}.", buffer, vao);
                driver.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, buffer);
            }
        }
    }

    pub fn invalidate(&mut self) {
        for record in self.records.values_mut() {
            record.forget();
        }
    }

    /// Registers a record in its initial state for each new vertex array.
    pub fn on_objects_created(&mut self, ids: &[GLuint]) {
        for &id in ids {
            self.records.insert(id, VaoRecord::new(&self.limits));
        }

        debug!("Created vertex arrays {:?}.", ids);
    }

    /// Drops the records of deleted vertex arrays. The default one stays.
    pub fn on_objects_deleted(&mut self, ids: &[GLuint]) {
        for id in ids.iter().filter(|v| **v != 0) {
            self.records.remove(id);
        }

        debug!("Deleted vertex arrays {:?}.", ids);
    }

    /// Detaches deleted buffers from every record.
    ///
    /// The driver only detaches deleted buffers from `bound`, the vertex array it has
    /// bound. The other vertex arrays keep referencing them, so their element buffers
    /// become unknown and their vertex buffer bindings stale.
    pub fn on_buffers_deleted(&mut self, ids: &[GLuint], bound: Option<GLuint>) {
        let dead = |id: GLuint| id != 0 && ids.contains(&id);

        for (&vao, record) in self.records.iter_mut() {
            let detached = bound == Some(vao);
            let slot = &mut record.element_buffer;

            if detached {
                slot.forget(ids);
            } else {
                if dead(slot.desired) {
                    slot.desired = 0;
                }

                if slot.committed.map(dead).unwrap_or(false) {
                    slot.committed = None;
                }
            }

            let bindings = record.bindings.iter_mut().zip(record.stale_bindings.iter_mut());
            for (binding, stale) in bindings.filter(|v| dead(v.0.buffer)) {
                binding.buffer = 0;
                *stale |= !detached;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::driver::{Call, HeadlessDriver};

    #[test]
    fn records() {
        let mut vaos = VaoRegistry::new(&Limits::default());
        assert!(vaos.contains(0));
        assert!(vaos.record(1).is_err());

        vaos.on_objects_created(&[1, 2]);
        let attribute = vaos.record(2).unwrap().attribute(3).unwrap();
        assert_eq!(*attribute, VertexAttribute::new(3));
        assert_eq!(attribute.binding, 3);
        assert!(vaos.record(2).unwrap().attribute(16).is_err());

        vaos.on_objects_deleted(&[0, 2]);
        assert!(vaos.contains(0));
        assert!(vaos.contains(1));
        assert!(!vaos.contains(2));
    }

    #[test]
    fn element_buffers() {
        let mut vaos = VaoRegistry::new(&Limits::default());
        let mut driver = HeadlessDriver::new();
        vaos.on_objects_created(&[1]);

        vaos.set_element_buffer(1, 6).unwrap();
        vaos.set_element_buffer(1, 7).unwrap();
        assert!(vaos.is_dirty(1));
        assert!(!vaos.is_dirty(0));

        vaos.sync(&mut driver, 1);
        vaos.sync(&mut driver, 1);
        assert_eq!(driver.calls(), &[Call::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 7)]);

        // Vertex array 1 is not the one bound, so the driver keeps its reference.
        vaos.on_buffers_deleted(&[7], Some(0));
        assert_eq!(vaos.record(1).unwrap().element_buffer(), 0);
        assert!(vaos.is_dirty(1));
        assert!(vaos.set_element_buffer(9, 1).is_err());

        vaos.sync(&mut driver, 1);
        vaos.set_element_buffer(1, 8).unwrap();
        vaos.sync(&mut driver, 1);
        vaos.on_buffers_deleted(&[8], Some(1));
        assert_eq!(vaos.record(1).unwrap().element_buffer(), 0);
        assert!(!vaos.is_dirty(1));
    }

    #[test]
    fn stale_entries() {
        let mut vaos = VaoRegistry::new(&Limits::default());
        vaos.on_objects_created(&[1, 2]);
        vaos.record_mut(1).unwrap().bindings[0].buffer = 5;
        vaos.record_mut(2).unwrap().bindings[0].buffer = 5;

        vaos.on_buffers_deleted(&[5], Some(2));
        let record = vaos.record(1).unwrap();
        assert_eq!(record.binding(0).unwrap().buffer, 0);
        assert!(!record.is_binding_known(0));
        assert!(record.is_binding_known(1));
        assert!(vaos.record(2).unwrap().is_binding_known(0));

        vaos.invalidate();
        assert!(!vaos.record(2).unwrap().is_attribute_known(0));
        assert!(vaos.is_dirty(0));
    }

    #[test]
    fn query() {
        let mut driver = HeadlessDriver::new();
        driver.set_query(gl::ELEMENT_ARRAY_BUFFER_BINDING, &[3.0]);

        let vaos = VaoRegistry::query(&mut driver, &Limits::default(), 7);
        let record = vaos.record(7).unwrap();
        assert_eq!(record.element_buffer(), 3);
        assert!(!vaos.is_dirty(7));
        assert!(!record.is_attribute_known(0));
        assert!(!record.is_binding_known(0));

        assert!(vaos.contains(0));
        assert!(vaos.is_dirty(0));
    }
}
