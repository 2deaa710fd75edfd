//! The context state cache.
//!
//! Every tracked property keeps the value the application asked for next to the value
//! the driver was last told. Setters only touch the cache and raise the sync bit of the
//! property, `sync` sends the difference for the bits a command consumes.

pub mod bits;
pub mod property;

pub use self::bits::SyncBits;
pub use self::property::{Descriptor, Property, PropertyValue, RenderingMode, ValueKind};

use gl::types::*;
use smallvec::SmallVec;

use self::property::RENDERING_MODES;
use crate::bindings::ObjectKind;
use crate::capabilities::Limits;
use crate::driver::Driver;
use crate::errors::*;

/// A cached value. `committed` is `None` while the value the driver holds is unknown,
/// in which case the desired value is always sent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Slot<T> {
    pub desired: T,
    pub committed: Option<T>,
}

impl<T: Copy + PartialEq> Slot<T> {
    /// A slot the driver already agrees with.
    #[inline]
    pub fn new(v: T) -> Self {
        Slot {
            desired: v,
            committed: Some(v),
        }
    }

    #[inline]
    pub fn unknown(v: T) -> Self {
        Slot {
            desired: v,
            committed: None,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.committed != Some(self.desired)
    }

    /// Marks the desired value as committed, returning it if the driver has to be told.
    #[inline]
    pub fn commit(&mut self) -> Option<T> {
        if self.is_pending() {
            self.committed = Some(self.desired);
            Some(self.desired)
        } else {
            None
        }
    }

    #[inline]
    pub fn invalidate(&mut self) {
        self.committed = None;
    }
}

impl Slot<GLuint> {
    /// Drops references to deleted objects. The driver unbinds a deleted object
    /// implicitly, so both sides fall back to 0. Returns true if a bind is still pending.
    pub fn forget(&mut self, ids: &[GLuint]) -> bool {
        let dead = |id: GLuint| id != 0 && ids.contains(&id);

        if dead(self.desired) {
            self.desired = 0;
        }

        if self.committed.map(dead).unwrap_or(false) {
            self.committed = Some(0);
        }

        self.is_pending()
    }
}

type Commit = fn(&mut StateCache, &mut dyn Driver);

/// The commit routine of every sync bit, in the order they are applied.
static COMMITS: [(SyncBits, Commit); 22] = [
    (SyncBits::BLENDING, StateCache::commit_blending),
    (SyncBits::CLEAR_COLOR, StateCache::commit_clear_color),
    (SyncBits::CLEAR_DEPTH, StateCache::commit_clear_depth),
    (SyncBits::CLEAR_STENCIL, StateCache::commit_clear_stencil),
    (SyncBits::COLOR_DEPTH_MASK, StateCache::commit_color_depth_mask),
    (SyncBits::CULL_FACE, StateCache::commit_cull_face),
    (SyncBits::DEPTH_FUNC, StateCache::commit_depth_func),
    (SyncBits::DRAW_FRAMEBUFFER, StateCache::commit_draw_framebuffer),
    (SyncBits::READ_FRAMEBUFFER, StateCache::commit_read_framebuffer),
    (SyncBits::FRONT_FACE, StateCache::commit_front_face),
    (SyncBits::LINE_WIDTH, StateCache::commit_line_width),
    (SyncBits::MIN_SAMPLE_SHADING, StateCache::commit_min_sample_shading),
    (SyncBits::N_PATCH_VERTICES, StateCache::commit_patch_vertices),
    (SyncBits::POLYGON_OFFSET, StateCache::commit_polygon_offset),
    (SyncBits::PROGRAM_OBJECT, StateCache::commit_program),
    (SyncBits::RENDERBUFFER, StateCache::commit_renderbuffer),
    (SyncBits::RENDERING_MODES, StateCache::commit_rendering_modes),
    (SyncBits::SCISSOR_BOX, StateCache::commit_scissor_box),
    (SyncBits::STENCIL, StateCache::commit_stencil),
    (SyncBits::TEXTURE_UNIT, StateCache::commit_texture_unit),
    (SyncBits::VERTEX_ARRAY_OBJECT, StateCache::commit_vertex_array),
    (SyncBits::VIEWPORT, StateCache::commit_viewport),
];

/// The deferred mirror of the driver's state table.
#[derive(Debug, Clone)]
pub struct StateCache {
    // One entry per property, one slot per index. A `None` slot has never been set nor
    // queried, so there is nothing to send and nothing to answer.
    slots: Vec<Vec<Option<Slot<PropertyValue>>>>,
    modes: Slot<u32>,
    dirty: SyncBits,
}

impl StateCache {
    /// Creates a cache holding the default state of a fresh context, which it assumes the
    /// driver holds as well. Scissor boxes and viewports depend on the drawable and start
    /// out unknown.
    pub fn new(limits: &Limits) -> Self {
        let viewports = limits.max_viewports.max(1) as usize;
        let slots = Property::all()
            .map(|property| {
                let descriptor = property.descriptor();
                if descriptor.indexed {
                    vec![None; viewports]
                } else {
                    vec![Some(Slot::new(descriptor.default))]
                }
            })
            .collect();

        StateCache {
            slots,
            modes: Slot::new(RenderingMode::defaults()),
            dirty: SyncBits::empty(),
        }
    }

    /// Creates a cache from the state `driver` currently holds.
    pub fn query(driver: &mut dyn Driver, limits: &Limits) -> Self {
        let mut cache = StateCache::new(limits);

        for property in Property::all() {
            for (index, slot) in cache.slots[property as usize].iter_mut().enumerate() {
                *slot = Some(Slot::new(query_value(driver, property, index as GLuint)));
            }
        }

        let modes = RENDERING_MODES
            .iter()
            .filter(|v| driver.is_enabled(v.1))
            .fold(0, |acc, v| acc | v.0.mask());

        cache.modes = Slot::new(modes);
        debug!("Queried the initial state of the context.");
        cache
    }

    /// Forgets what the driver holds and raises every bit, so the next sync of a bit
    /// re-sends every value of its group. Used when foreign code touched the context.
    pub fn invalidate(&mut self) {
        for slot in self.slots.iter_mut().flat_map(|v| v.iter_mut()) {
            if let Some(ref mut slot) = *slot {
                slot.invalidate();
            }
        }

        self.modes.invalidate();
        self.dirty = SyncBits::ALL;
        debug!("Invalidated the state cache.");
    }

    /// Gets the desired value of `property`, slot 0 for indexed properties.
    #[inline]
    pub fn get_property(&self, property: Property) -> PropertyValue {
        self.value(property, 0)
    }

    /// Gets the desired value of slot `index` of `property`.
    pub fn get_indexed_property(&self, property: Property, index: GLuint) -> Result<PropertyValue> {
        self.check_index(property, index)?;
        Ok(self.value(property, index as usize))
    }

    /// Sets the desired value of `property`, slot 0 for indexed properties.
    #[inline]
    pub fn set_property(&mut self, property: Property, value: PropertyValue) -> Result<()> {
        self.set_indexed_property(property, 0, value)
    }

    /// Sets the desired value of slot `index` of `property` and raises its sync bit.
    /// Nothing is stored if the value has the wrong kind or the index is out of range.
    pub fn set_indexed_property(
        &mut self,
        property: Property,
        index: GLuint,
        value: PropertyValue,
    ) -> Result<()> {
        if value.kind() != property.kind() {
            warn!("Rejected {:?} for {:?}.", value, property);
            return Err(Error::PropertyKind {
                property,
                expected: property.kind(),
                found: value.kind(),
            });
        }

        self.check_index(property, index)?;
        self.store(property, index as usize, value);
        Ok(())
    }

    /// Returns true if `mode` is enabled in the desired state.
    #[inline]
    pub fn rendering_mode(&self, mode: RenderingMode) -> bool {
        self.modes.desired & mode.mask() != 0
    }

    pub fn set_rendering_mode(&mut self, mode: RenderingMode, enabled: bool) {
        if enabled {
            self.modes.desired |= mode.mask();
        } else {
            self.modes.desired &= !mode.mask();
        }

        self.dirty.insert(SyncBits::RENDERING_MODES);
    }

    /// Commits the dirty groups among `bits` to the driver.
    pub fn sync(&mut self, driver: &mut dyn Driver, bits: SyncBits) {
        let pending = self.dirty & bits;
        if pending.is_empty() {
            return;
        }

        for &(bit, commit) in COMMITS.iter() {
            if pending.contains(bit) {
                trace!("Commits {:?}.", bit);
                commit(self, driver);
            }
        }

        self.dirty.remove(pending);
    }

    #[inline]
    pub fn dirty_bits(&self) -> SyncBits {
        self.dirty
    }

    /// Returns true if any of `bits` is waiting for a sync.
    #[inline]
    pub fn is_dirty(&self, bits: SyncBits) -> bool {
        self.dirty.intersects(bits)
    }

    /// Returns true if the cache can answer what the driver holds (or will hold after
    /// the next sync) for slot `index` of `property`.
    pub fn is_known(&self, property: Property, index: GLuint) -> bool {
        self.slots[property as usize]
            .get(index as usize)
            .map(|v| v.is_some())
            .unwrap_or(false)
    }

    /// Resets the handle properties naming one of `ids` after the objects were deleted.
    pub fn on_objects_deleted(&mut self, kind: ObjectKind, ids: &[GLuint]) {
        let properties: &[Property] = match kind {
            ObjectKind::Framebuffer => &[Property::DrawFramebuffer, Property::ReadFramebuffer],
            ObjectKind::Renderbuffer => &[Property::Renderbuffer],
            ObjectKind::VertexArray => &[Property::VertexArrayObject],
            // A deleted program stays in use until another one is installed.
            _ => return,
        };

        for &property in properties {
            if let Some(ref mut slot) = self.slots[property as usize][0] {
                let mut handle = Slot {
                    desired: slot.desired.as_uint(),
                    committed: slot.committed.map(|v| v.as_uint()),
                };

                if handle.forget(ids) {
                    self.dirty.insert(property.sync_bit());
                }

                slot.desired = PropertyValue::UInt(handle.desired);
                slot.committed = handle.committed.map(PropertyValue::UInt);
            }
        }

        debug!("Forgot deleted {:?} objects {:?}.", kind, ids);
    }

    /// The texture bindings report the unit they left active while committing.
    pub fn note_active_texture(&mut self, unit: GLuint) {
        if let Some(ref mut slot) = self.slots[Property::TextureUnit as usize][0] {
            slot.committed = Some(PropertyValue::UInt(unit));
            self.dirty.set(SyncBits::TEXTURE_UNIT, slot.is_pending());
        }
    }

    /// The active texture unit the driver holds, if known.
    pub fn committed_texture_unit(&self) -> Option<GLuint> {
        self.slots[Property::TextureUnit as usize][0]
            .and_then(|v| v.committed)
            .map(|v| v.as_uint())
    }

    /// The vertex array object the driver has bound, if known.
    pub fn committed_vertex_array(&self) -> Option<GLuint> {
        self.slots[Property::VertexArrayObject as usize][0]
            .and_then(|v| v.committed)
            .map(|v| v.as_uint())
    }

    /// The desired active texture unit.
    #[inline]
    pub fn texture_unit(&self) -> GLuint {
        self.get_property(Property::TextureUnit).as_uint()
    }

    /// The desired vertex array object.
    #[inline]
    pub fn vertex_array(&self) -> GLuint {
        self.get_property(Property::VertexArrayObject).as_uint()
    }

    /// The desired program object.
    #[inline]
    pub fn program(&self) -> GLuint {
        self.get_property(Property::ProgramObject).as_uint()
    }

    /// The number of slots of indexed properties.
    #[inline]
    pub fn viewports(&self) -> u32 {
        self.slots[Property::Viewport as usize].len() as u32
    }

    /// Stores a value already checked against the descriptor of `property`.
    pub(crate) fn store(&mut self, property: Property, index: usize, value: PropertyValue) {
        debug_assert_eq!(value.kind(), property.kind());

        match self.slots[property as usize][index] {
            Some(ref mut slot) => slot.desired = value,
            ref mut slot => *slot = Some(Slot::unknown(value)),
        }

        self.dirty.insert(property.sync_bit());
    }

    fn value(&self, property: Property, index: usize) -> PropertyValue {
        self.slots[property as usize][index]
            .map(|v| v.desired)
            .unwrap_or(property.descriptor().default)
    }

    fn check_index(&self, property: Property, index: GLuint) -> Result<()> {
        let limit = self.slots[property as usize].len() as u32;
        if index >= limit {
            warn!("Rejected index {} of {:?}.", index, property);
            return Err(Error::IndexOutOfRange {
                what: "property",
                index,
                limit,
            });
        }

        Ok(())
    }

    /// Commits a group of non-indexed properties sent with one command. Returns the
    /// desired values if any of them changed.
    fn take(&mut self, properties: &[Property]) -> Option<SmallVec<[PropertyValue; 4]>> {
        let pending = properties.iter().any(|&p| {
            self.slots[p as usize][0]
                .map(|v| v.is_pending())
                .unwrap_or(false)
        });

        if !pending {
            return None;
        }

        let mut values = SmallVec::new();
        for &property in properties {
            if let Some(ref mut slot) = self.slots[property as usize][0] {
                slot.committed = Some(slot.desired);
                values.push(slot.desired);
            }
        }

        if values.len() == properties.len() {
            Some(values)
        } else {
            None
        }
    }

    fn commit_blending(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::BlendColor]) {
            let c = v[0].as_float4();
            driver.blend_color(c[0], c[1], c[2], c[3]);
        }

        if let Some(v) = self.take(&[Property::BlendEquationRgb, Property::BlendEquationAlpha]) {
            driver.blend_equation_separate(v[0].as_enum(), v[1].as_enum());
        }

        let funcs = [
            Property::BlendFuncSrcRgb,
            Property::BlendFuncDstRgb,
            Property::BlendFuncSrcAlpha,
            Property::BlendFuncDstAlpha,
        ];

        if let Some(v) = self.take(&funcs) {
            driver.blend_func_separate(
                v[0].as_enum(),
                v[1].as_enum(),
                v[2].as_enum(),
                v[3].as_enum(),
            );
        }
    }

    fn commit_clear_color(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::ClearColor]) {
            let c = v[0].as_float4();
            driver.clear_color(c[0], c[1], c[2], c[3]);
        }
    }

    fn commit_clear_depth(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::ClearDepth]) {
            driver.clear_depth(v[0].as_double());
        }
    }

    fn commit_clear_stencil(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::ClearStencil]) {
            driver.clear_stencil(v[0].as_int());
        }
    }

    fn commit_color_depth_mask(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::ColorMask]) {
            let m = v[0].as_bool4();
            driver.color_mask(m[0], m[1], m[2], m[3]);
        }

        if let Some(v) = self.take(&[Property::DepthMask]) {
            driver.depth_mask(v[0].as_bool());
        }
    }

    fn commit_cull_face(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::CullFace]) {
            driver.cull_face(v[0].as_enum());
        }
    }

    fn commit_depth_func(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::DepthFunc]) {
            driver.depth_func(v[0].as_enum());
        }
    }

    fn commit_draw_framebuffer(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::DrawFramebuffer]) {
            driver.bind_framebuffer(gl::DRAW_FRAMEBUFFER, v[0].as_uint());
        }
    }

    fn commit_read_framebuffer(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::ReadFramebuffer]) {
            driver.bind_framebuffer(gl::READ_FRAMEBUFFER, v[0].as_uint());
        }
    }

    fn commit_front_face(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::FrontFace]) {
            driver.front_face(v[0].as_enum());
        }
    }

    fn commit_line_width(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::LineWidth]) {
            driver.line_width(v[0].as_float());
        }
    }

    fn commit_min_sample_shading(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::MinSampleShading]) {
            driver.min_sample_shading(v[0].as_float());
        }
    }

    fn commit_patch_vertices(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::NPatchVertices]) {
            driver.patch_parameter_i(gl::PATCH_VERTICES, v[0].as_int());
        }
    }

    fn commit_polygon_offset(&mut self, driver: &mut dyn Driver) {
        let properties = [Property::PolygonOffsetFactor, Property::PolygonOffsetUnits];
        if let Some(v) = self.take(&properties) {
            driver.polygon_offset(v[0].as_float(), v[1].as_float());
        }
    }

    fn commit_program(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::ProgramObject]) {
            driver.use_program(v[0].as_uint());
        }
    }

    fn commit_renderbuffer(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::Renderbuffer]) {
            driver.bind_renderbuffer(gl::RENDERBUFFER, v[0].as_uint());
        }
    }

    fn commit_rendering_modes(&mut self, driver: &mut dyn Driver) {
        let desired = self.modes.desired;
        let changed = match self.modes.committed {
            Some(committed) => committed ^ desired,
            None => !0,
        };

        for &(mode, cap, _) in RENDERING_MODES.iter() {
            if changed & mode.mask() == 0 {
                continue;
            }

            if desired & mode.mask() != 0 {
                driver.enable(cap);
            } else {
                driver.disable(cap);
            }
        }

        self.modes.committed = Some(desired);
    }

    fn commit_scissor_box(&mut self, driver: &mut dyn Driver) {
        let slots = self.slots[Property::ScissorBox as usize].iter_mut();
        for (index, slot) in slots.enumerate() {
            if let Some(v) = slot.as_mut().and_then(|v| v.commit()) {
                let v = v.as_int4();
                if index == 0 {
                    driver.scissor(v[0], v[1], v[2], v[3]);
                } else {
                    driver.scissor_indexed(index as GLuint, v[0], v[1], v[2], v[3]);
                }
            }
        }
    }

    fn commit_stencil(&mut self, driver: &mut dyn Driver) {
        let func = [
            Property::StencilFunc,
            Property::StencilRef,
            Property::StencilValueMask,
        ];

        if let Some(v) = self.take(&func) {
            driver.stencil_func(v[0].as_enum(), v[1].as_int(), v[2].as_uint());
        }

        let op = [
            Property::StencilFail,
            Property::StencilPassDepthFail,
            Property::StencilPassDepthPass,
        ];

        if let Some(v) = self.take(&op) {
            driver.stencil_op(v[0].as_enum(), v[1].as_enum(), v[2].as_enum());
        }

        if let Some(v) = self.take(&[Property::StencilWriteMask]) {
            driver.stencil_mask(v[0].as_uint());
        }
    }

    fn commit_texture_unit(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::TextureUnit]) {
            driver.active_texture(gl::TEXTURE0 + v[0].as_uint());
        }
    }

    fn commit_vertex_array(&mut self, driver: &mut dyn Driver) {
        if let Some(v) = self.take(&[Property::VertexArrayObject]) {
            driver.bind_vertex_array(v[0].as_uint());
        }
    }

    fn commit_viewport(&mut self, driver: &mut dyn Driver) {
        let slots = self.slots[Property::Viewport as usize].iter_mut();
        for (index, slot) in slots.enumerate() {
            if let Some(v) = slot.as_mut().and_then(|v| v.commit()) {
                let v = v.as_int4();
                if index == 0 {
                    driver.viewport(v[0], v[1], v[2], v[3]);
                } else {
                    driver.viewport_indexed(
                        index as GLuint,
                        v[0] as f32,
                        v[1] as f32,
                        v[2] as f32,
                        v[3] as f32,
                    );
                }
            }
        }
    }
}

fn query_value(driver: &mut dyn Driver, property: Property, index: GLuint) -> PropertyValue {
    let pname = property.descriptor().query;
    let mut ints = [0; 4];
    let mut floats = [0.0; 4];
    let mut flags = [false; 4];

    match property.kind() {
        ValueKind::Enum => {
            driver.get_integerv(pname, &mut ints[..1]);
            PropertyValue::Enum(ints[0] as GLenum)
        }
        ValueKind::Int => {
            driver.get_integerv(pname, &mut ints[..1]);
            PropertyValue::Int(ints[0])
        }
        ValueKind::UInt => {
            driver.get_integerv(pname, &mut ints[..1]);
            let v = ints[0] as GLuint;
            if property == Property::TextureUnit {
                PropertyValue::UInt(v.saturating_sub(gl::TEXTURE0))
            } else {
                PropertyValue::UInt(v)
            }
        }
        ValueKind::Bool => {
            driver.get_booleanv(pname, &mut flags[..1]);
            PropertyValue::Bool(flags[0])
        }
        ValueKind::Float => {
            driver.get_floatv(pname, &mut floats[..1]);
            PropertyValue::Float(floats[0])
        }
        ValueKind::Double => {
            let mut v = [0.0];
            driver.get_doublev(pname, &mut v);
            PropertyValue::Double(v[0])
        }
        ValueKind::Float4 => {
            driver.get_floatv(pname, &mut floats);
            PropertyValue::Float4(floats)
        }
        ValueKind::Int4 => {
            if index == 0 {
                driver.get_integerv(pname, &mut ints);
            } else {
                driver.get_integeri_v(pname, index, &mut ints);
            }

            PropertyValue::Int4(ints)
        }
        ValueKind::Bool4 => {
            driver.get_booleanv(pname, &mut flags);
            PropertyValue::Bool4(flags)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::driver::{Call, HeadlessDriver};

    fn setup() -> (StateCache, HeadlessDriver) {
        (StateCache::new(&Limits::default()), HeadlessDriver::new())
    }

    #[test]
    fn setters_defer() {
        let (mut state, mut driver) = setup();
        assert!(state.dirty_bits().is_empty());

        for &func in &[gl::GREATER, gl::EQUAL, gl::LEQUAL] {
            state
                .set_property(Property::DepthFunc, PropertyValue::Enum(func))
                .unwrap();
        }

        assert!(state.is_dirty(SyncBits::DEPTH_FUNC));
        assert!(driver.calls().is_empty());

        state.sync(&mut driver, SyncBits::ALL);
        assert_eq!(driver.calls(), &[Call::DepthFunc(gl::LEQUAL)]);
        assert!(state.dirty_bits().is_empty());
    }

    #[test]
    fn redundant_sets() {
        let (mut state, mut driver) = setup();

        // Equal to the committed default.
        state
            .set_property(Property::CullFace, PropertyValue::Enum(gl::BACK))
            .unwrap();
        state.sync(&mut driver, SyncBits::ALL);
        assert!(driver.calls().is_empty());

        for _ in 0..2 {
            state
                .set_property(Property::CullFace, PropertyValue::Enum(gl::FRONT))
                .unwrap();
            state.sync(&mut driver, SyncBits::CULL_FACE);
        }

        assert_eq!(driver.calls(), &[Call::CullFace(gl::FRONT)]);
    }

    #[test]
    fn blend_coalescing() {
        let (mut state, mut driver) = setup();
        let funcs = [
            (Property::BlendFuncSrcRgb, gl::SRC_ALPHA),
            (Property::BlendFuncDstRgb, gl::ONE_MINUS_SRC_ALPHA),
            (Property::BlendFuncSrcAlpha, gl::ONE),
            (Property::BlendFuncDstAlpha, gl::ZERO),
        ];

        for &(property, v) in &funcs {
            state.set_property(property, PropertyValue::Enum(v)).unwrap();
        }

        state.sync(&mut driver, SyncBits::BLENDING);
        assert_eq!(
            driver.calls(),
            &[Call::BlendFuncSeparate(
                gl::SRC_ALPHA,
                gl::ONE_MINUS_SRC_ALPHA,
                gl::ONE,
                gl::ZERO
            )]
        );
    }

    #[test]
    fn bit_independence() {
        let (mut state, mut driver) = setup();
        state
            .set_property(Property::LineWidth, PropertyValue::Float(2.0))
            .unwrap();
        state
            .set_property(Property::FrontFace, PropertyValue::Enum(gl::CW))
            .unwrap();

        state.sync(&mut driver, SyncBits::FRONT_FACE);
        assert_eq!(driver.calls(), &[Call::FrontFace(gl::CW)]);
        assert!(state.is_dirty(SyncBits::LINE_WIDTH));
        assert_eq!(
            state.get_property(Property::LineWidth),
            PropertyValue::Float(2.0)
        );
    }

    #[test]
    fn rendering_modes() {
        let (mut state, mut driver) = setup();
        assert!(state.rendering_mode(RenderingMode::Dither));

        state.set_rendering_mode(RenderingMode::DepthTest, true);
        state.set_rendering_mode(RenderingMode::Blend, true);
        state.set_rendering_mode(RenderingMode::Blend, false);
        state.set_rendering_mode(RenderingMode::Dither, false);
        state.sync(&mut driver, SyncBits::RENDERING_MODES);

        assert_eq!(
            driver.calls(),
            &[Call::Enable(gl::DEPTH_TEST), Call::Disable(gl::DITHER)]
        );
    }

    #[test]
    fn indexed_properties() {
        let (mut state, mut driver) = setup();
        assert!(!state.is_known(Property::Viewport, 0));

        state
            .set_indexed_property(Property::Viewport, 2, PropertyValue::Int4([0, 0, 64, 32]))
            .unwrap();
        state
            .set_property(Property::Viewport, PropertyValue::Int4([0, 0, 640, 480]))
            .unwrap();

        assert!(state.is_known(Property::Viewport, 2));
        assert!(!state.is_known(Property::Viewport, 1));

        state.sync(&mut driver, SyncBits::VIEWPORT);
        assert_eq!(
            driver.calls(),
            &[
                Call::Viewport([0, 0, 640, 480]),
                Call::ViewportIndexed(2, [0.0, 0.0, 64.0, 32.0]),
            ]
        );

        let v = PropertyValue::Int4([0; 4]);
        assert!(state.set_indexed_property(Property::Viewport, 16, v).is_err());
        assert!(state.set_indexed_property(Property::CullFace, 1, PropertyValue::Enum(gl::BACK)).is_err());
    }

    #[test]
    fn rejects_wrong_kind() {
        let (mut state, _) = setup();
        let err = state.set_property(Property::DepthFunc, PropertyValue::Float(1.0));
        assert!(err.is_err());
        assert_eq!(
            state.get_property(Property::DepthFunc),
            PropertyValue::Enum(gl::LESS)
        );
        assert!(state.dirty_bits().is_empty());
    }

    #[test]
    fn invalidate() {
        let (mut state, mut driver) = setup();
        state.invalidate();
        assert_eq!(state.dirty_bits(), SyncBits::ALL);

        state.sync(&mut driver, SyncBits::CULL_FACE | SyncBits::RENDERING_MODES);
        assert_eq!(driver.count(|v| *v == Call::CullFace(gl::BACK)), 1);
        assert_eq!(driver.count(|v| *v == Call::Enable(gl::DITHER)), 1);
        assert_eq!(driver.count(|v| *v == Call::Disable(gl::BLEND)), 1);

        // Viewports were never specified, so there is nothing to restore.
        state.sync(&mut driver, SyncBits::VIEWPORT);
        assert_eq!(driver.count(|v| match *v {
            Call::Viewport(_) => true,
            _ => false,
        }), 0);
    }

    #[test]
    fn query() {
        let mut driver = HeadlessDriver::new();
        driver.set_query(gl::DEPTH_FUNC, &[f64::from(gl::GEQUAL)]);
        driver.set_query(gl::ACTIVE_TEXTURE, &[f64::from(gl::TEXTURE0 + 2)]);
        driver.set_query(gl::VIEWPORT, &[0.0, 0.0, 800.0, 600.0]);
        driver.set_query(gl::STENCIL_WRITEMASK, &[-1.0]);
        driver.set_query(gl::DEPTH_CLEAR_VALUE, &[0.1]);

        let state = StateCache::query(&mut driver, &Limits::default());
        assert_eq!(
            state.get_property(Property::DepthFunc),
            PropertyValue::Enum(gl::GEQUAL)
        );
        assert_eq!(state.texture_unit(), 2);
        assert_eq!(state.committed_texture_unit(), Some(2));
        assert_eq!(
            state.get_property(Property::StencilWriteMask),
            PropertyValue::UInt(!0)
        );
        assert_eq!(
            state.get_property(Property::Viewport),
            PropertyValue::Int4([0, 0, 800, 600])
        );
        assert!(state.is_known(Property::Viewport, 15));
        assert_eq!(
            state.get_property(Property::ClearDepth),
            PropertyValue::Double(0.1)
        );
        assert!(driver.calls().contains(&Call::GetDoublev(gl::DEPTH_CLEAR_VALUE)));
        assert!(state.rendering_mode(RenderingMode::Multisample));
        assert!(!state.rendering_mode(RenderingMode::Blend));
        assert!(state.dirty_bits().is_empty());
    }

    #[test]
    fn deleted_objects() {
        let (mut state, mut driver) = setup();
        state
            .set_property(Property::VertexArrayObject, PropertyValue::UInt(3))
            .unwrap();
        state.sync(&mut driver, SyncBits::ALL);

        state
            .set_property(Property::DrawFramebuffer, PropertyValue::UInt(5))
            .unwrap();
        state.on_objects_deleted(ObjectKind::VertexArray, &[3]);
        state.on_objects_deleted(ObjectKind::Framebuffer, &[5]);

        assert_eq!(state.vertex_array(), 0);
        assert!(!state.is_dirty(SyncBits::VERTEX_ARRAY_OBJECT));
        assert_eq!(
            state.get_property(Property::DrawFramebuffer),
            PropertyValue::UInt(0)
        );

        driver.clear_calls();
        state.sync(&mut driver, SyncBits::ALL);
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn active_texture_reports() {
        let (mut state, mut driver) = setup();
        state
            .set_property(Property::TextureUnit, PropertyValue::UInt(3))
            .unwrap();

        // The texture bindings moved the unit to 3 on their own.
        state.note_active_texture(3);
        state.sync(&mut driver, SyncBits::TEXTURE_UNIT);
        assert!(driver.calls().is_empty());

        state.note_active_texture(1);
        assert!(state.is_dirty(SyncBits::TEXTURE_UNIT));
        state.sync(&mut driver, SyncBits::TEXTURE_UNIT);
        assert_eq!(driver.calls(), &[Call::ActiveTexture(gl::TEXTURE3)]);
    }
}
