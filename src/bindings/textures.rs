use std::collections::{BTreeSet, HashMap};

use gl::types::*;

use crate::capabilities::Limits;
use crate::driver::Driver;
use crate::errors::*;
use crate::state::{Slot, StateCache};

/// Texture binding points of a texture unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture1D,
    Texture1DArray,
    Texture2D,
    Texture2DArray,
    Texture2DMultisample,
    Texture2DMultisampleArray,
    Texture3D,
    Buffer,
    CubeMap,
    CubeMapArray,
    Rectangle,
}

const TARGET_COUNT: usize = 11;

static TARGETS: [(TextureTarget, GLenum, GLenum); TARGET_COUNT] = [
    (TextureTarget::Texture1D, gl::TEXTURE_1D, gl::TEXTURE_BINDING_1D),
    (TextureTarget::Texture1DArray, gl::TEXTURE_1D_ARRAY, gl::TEXTURE_BINDING_1D_ARRAY),
    (TextureTarget::Texture2D, gl::TEXTURE_2D, gl::TEXTURE_BINDING_2D),
    (TextureTarget::Texture2DArray, gl::TEXTURE_2D_ARRAY, gl::TEXTURE_BINDING_2D_ARRAY),
    (
        TextureTarget::Texture2DMultisample,
        gl::TEXTURE_2D_MULTISAMPLE,
        gl::TEXTURE_BINDING_2D_MULTISAMPLE,
    ),
    (
        TextureTarget::Texture2DMultisampleArray,
        gl::TEXTURE_2D_MULTISAMPLE_ARRAY,
        gl::TEXTURE_BINDING_2D_MULTISAMPLE_ARRAY,
    ),
    (TextureTarget::Texture3D, gl::TEXTURE_3D, gl::TEXTURE_BINDING_3D),
    (TextureTarget::Buffer, gl::TEXTURE_BUFFER, gl::TEXTURE_BINDING_BUFFER),
    (TextureTarget::CubeMap, gl::TEXTURE_CUBE_MAP, gl::TEXTURE_BINDING_CUBE_MAP),
    (
        TextureTarget::CubeMapArray,
        gl::TEXTURE_CUBE_MAP_ARRAY,
        gl::TEXTURE_BINDING_CUBE_MAP_ARRAY,
    ),
    (TextureTarget::Rectangle, gl::TEXTURE_RECTANGLE, gl::TEXTURE_BINDING_RECTANGLE),
];

lazy_static! {
    static ref TARGETS_BY_ENUM: HashMap<GLenum, TextureTarget> =
        TARGETS.iter().map(|&(target, v, _)| (v, target)).collect();
    static ref TARGETS_BY_BINDING: HashMap<GLenum, TextureTarget> =
        TARGETS.iter().map(|&(target, _, v)| (v, target)).collect();
}

impl TextureTarget {
    /// Finds the target named by `target`. The faces of a cube map resolve to the cube
    /// map itself, which is what image commands on a face are bound through.
    pub fn from_gl(target: GLenum) -> Option<TextureTarget> {
        match target {
            gl::TEXTURE_CUBE_MAP_POSITIVE_X..=gl::TEXTURE_CUBE_MAP_NEGATIVE_Z => {
                Some(TextureTarget::CubeMap)
            }
            _ => TARGETS_BY_ENUM.get(&target).cloned(),
        }
    }

    /// Finds the target whose binding `glGet*` name is `pname`.
    pub fn from_binding_query(pname: GLenum) -> Option<TextureTarget> {
        TARGETS_BY_BINDING.get(&pname).cloned()
    }

    #[inline]
    pub fn gl(self) -> GLenum {
        TARGETS[self as usize].1
    }
}

/// The textures bound to each target of each texture unit.
#[derive(Debug, Clone)]
pub struct TextureBindings {
    units: Vec<[Slot<GLuint>; TARGET_COUNT]>,
    dirty: BTreeSet<GLuint>,
}

impl TextureBindings {
    pub fn new(limits: &Limits) -> Self {
        TextureBindings {
            units: vec![[Slot::new(0); TARGET_COUNT]; limits.max_texture_units.max(1) as usize],
            dirty: BTreeSet::new(),
        }
    }

    /// Reads the bindings of every unit back from the driver. The unit the driver had
    /// active is restored afterwards.
    pub fn query(driver: &mut dyn Driver, limits: &Limits) -> Self {
        let mut bindings = TextureBindings::new(limits);
        let units = &mut bindings.units;

        for_each_unit(driver, units.len() as u32, |driver, unit| {
            for (slot, &(_, _, pname)) in units[unit as usize].iter_mut().zip(TARGETS.iter()) {
                let mut v = [0];
                driver.get_integerv(pname, &mut v);
                *slot = Slot::new(v[0] as GLuint);
            }
        });

        debug!("Queried texture bindings.");
        bindings
    }

    #[inline]
    pub fn units(&self) -> u32 {
        self.units.len() as u32
    }

    pub fn invalidate(&mut self) {
        for slot in self.units.iter_mut().flat_map(|v| v.iter_mut()) {
            slot.invalidate();
        }

        self.dirty = (0..self.units()).collect();
    }

    pub fn get_binding(&self, unit: GLuint, target: TextureTarget) -> Result<GLuint> {
        self.check_unit(unit)?;
        Ok(self.units[unit as usize][target as usize].desired)
    }

    pub fn set_binding(&mut self, unit: GLuint, target: TextureTarget, texture: GLuint) -> Result<()> {
        self.check_unit(unit)?;
        self.units[unit as usize][target as usize].desired = texture;
        self.dirty.insert(unit);
        Ok(())
    }

    /// Unbinds every target of `unit`.
    pub fn clear_unit(&mut self, unit: GLuint) -> Result<()> {
        self.check_unit(unit)?;
        for slot in self.units[unit as usize].iter_mut() {
            slot.desired = 0;
        }

        self.dirty.insert(unit);
        Ok(())
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Commits the dirty units. Binding goes through the active texture unit, so the
    /// unit left active is reported back to `state`.
    pub fn sync(&mut self, driver: &mut dyn Driver, state: &mut StateCache) {
        if self.dirty.is_empty() {
            return;
        }

        let mut active = state.committed_texture_unit();
        let mut moved = false;

        for unit in ::std::mem::replace(&mut self.dirty, BTreeSet::new()) {
            for (slot, &(_, target, _)) in self.units[unit as usize].iter_mut().zip(TARGETS.iter()) {
                if let Some(texture) = slot.commit() {
                    if active != Some(unit) {
                        driver.active_texture(gl::TEXTURE0 + unit);
                        active = Some(unit);
                        moved = true;
                    }

                    driver.bind_texture(target, texture);
                }
            }
        }

        if let (true, Some(unit)) = (moved, active) {
            trace!("Texture bindings left unit {} active.", unit);
            state.note_active_texture(unit);
        }
    }

    /// Bindings are keyed by unit and target, so new names need no slot of their own.
    pub fn on_objects_created(&mut self, ids: &[GLuint]) {
        trace!("Created textures {:?}.", ids);
    }

    /// Resets every binding of a deleted texture to 0.
    pub fn on_objects_deleted(&mut self, ids: &[GLuint]) {
        for (unit, slots) in self.units.iter_mut().enumerate() {
            let mut pending = false;
            for slot in slots.iter_mut() {
                pending |= slot.forget(ids);
            }

            if pending {
                self.dirty.insert(unit as GLuint);
            }
        }

        debug!("Forgot deleted textures {:?}.", ids);
    }

    fn check_unit(&self, unit: GLuint) -> Result<()> {
        check_unit(unit, self.units())
    }
}

/// The sampler objects bound to each texture unit.
#[derive(Debug, Clone)]
pub struct SamplerBindings {
    units: Vec<Slot<GLuint>>,
    dirty: BTreeSet<GLuint>,
}

impl SamplerBindings {
    pub fn new(limits: &Limits) -> Self {
        SamplerBindings {
            units: vec![Slot::new(0); limits.max_texture_units.max(1) as usize],
            dirty: BTreeSet::new(),
        }
    }

    /// Reads the sampler bound to every unit back from the driver.
    pub fn query(driver: &mut dyn Driver, limits: &Limits) -> Self {
        let mut bindings = SamplerBindings::new(limits);
        let units = &mut bindings.units;

        for_each_unit(driver, units.len() as u32, |driver, unit| {
            let mut v = [0];
            driver.get_integerv(gl::SAMPLER_BINDING, &mut v);
            units[unit as usize] = Slot::new(v[0] as GLuint);
        });

        debug!("Queried sampler bindings.");
        bindings
    }

    pub fn invalidate(&mut self) {
        for slot in &mut self.units {
            slot.invalidate();
        }

        self.dirty = (0..self.units.len() as GLuint).collect();
    }

    pub fn get_binding(&self, unit: GLuint) -> Result<GLuint> {
        check_unit(unit, self.units.len() as u32)?;
        Ok(self.units[unit as usize].desired)
    }

    pub fn set_binding(&mut self, unit: GLuint, sampler: GLuint) -> Result<()> {
        check_unit(unit, self.units.len() as u32)?;
        self.units[unit as usize].desired = sampler;
        self.dirty.insert(unit);
        Ok(())
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn sync(&mut self, driver: &mut dyn Driver) {
        for unit in ::std::mem::replace(&mut self.dirty, BTreeSet::new()) {
            if let Some(sampler) = self.units[unit as usize].commit() {
                driver.bind_sampler(unit, sampler);
            }
        }
    }

    /// Bindings are keyed by unit, so new names need no slot of their own.
    pub fn on_objects_created(&mut self, ids: &[GLuint]) {
        trace!("Created samplers {:?}.", ids);
    }

    pub fn on_objects_deleted(&mut self, ids: &[GLuint]) {
        for (unit, slot) in self.units.iter_mut().enumerate() {
            if slot.forget(ids) {
                self.dirty.insert(unit as GLuint);
            }
        }

        debug!("Forgot deleted samplers {:?}.", ids);
    }
}

/// Runs `f` with each of the first `units` texture units active in turn, then makes
/// the unit the driver had active current again.
fn for_each_unit<F>(driver: &mut dyn Driver, units: u32, mut f: F)
where
    F: FnMut(&mut dyn Driver, GLuint),
{
    let mut active = [0];
    driver.get_integerv(gl::ACTIVE_TEXTURE, &mut active);

    for unit in 0..units {
        driver.active_texture(gl::TEXTURE0 + unit);
        f(&mut *driver, unit);
    }

    driver.active_texture(::std::cmp::max(active[0] as GLenum, gl::TEXTURE0));
}

fn check_unit(unit: GLuint, limit: u32) -> Result<()> {
    if unit >= limit {
        warn!("Rejected texture unit {}.", unit);
        return Err(Error::IndexOutOfRange {
            what: "texture unit",
            index: unit,
            limit,
        });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::driver::{Call, HeadlessDriver};
    use crate::state::{Property, PropertyValue, SyncBits};

    fn setup() -> (TextureBindings, StateCache, HeadlessDriver) {
        let limits = Limits::default();
        (
            TextureBindings::new(&limits),
            StateCache::new(&limits),
            HeadlessDriver::new(),
        )
    }

    #[test]
    fn targets() {
        for (i, &(target, v, _)) in TARGETS.iter().enumerate() {
            assert_eq!(target as usize, i);
            assert_eq!(TextureTarget::from_gl(v), Some(target));
        }

        assert_eq!(
            TextureTarget::from_gl(gl::TEXTURE_CUBE_MAP_NEGATIVE_Y),
            Some(TextureTarget::CubeMap)
        );
        assert_eq!(TextureTarget::from_gl(gl::ARRAY_BUFFER), None);
        assert_eq!(
            TextureTarget::from_binding_query(gl::TEXTURE_BINDING_3D),
            Some(TextureTarget::Texture3D)
        );
    }

    #[test]
    fn binds_through_units() {
        let (mut textures, mut state, mut driver) = setup();
        textures.set_binding(2, TextureTarget::Texture2D, 9).unwrap();
        textures.set_binding(0, TextureTarget::CubeMap, 4).unwrap();
        textures.sync(&mut driver, &mut state);

        assert_eq!(
            driver.calls(),
            &[
                Call::BindTexture(gl::TEXTURE_CUBE_MAP, 4),
                Call::ActiveTexture(gl::TEXTURE2),
                Call::BindTexture(gl::TEXTURE_2D, 9),
            ]
        );

        // The desired unit is still 0, so the state cache has to move it back.
        assert!(state.is_dirty(SyncBits::TEXTURE_UNIT));
        driver.clear_calls();
        state.sync(&mut driver, SyncBits::TEXTURE_UNIT);
        assert_eq!(driver.calls(), &[Call::ActiveTexture(gl::TEXTURE0)]);
    }

    #[test]
    fn no_redundant_binds() {
        let (mut textures, mut state, mut driver) = setup();
        textures.set_binding(1, TextureTarget::Texture2D, 3).unwrap();
        textures.sync(&mut driver, &mut state);

        driver.clear_calls();
        textures.set_binding(1, TextureTarget::Texture2D, 3).unwrap();
        textures.sync(&mut driver, &mut state);
        assert!(driver.calls().is_empty());

        state
            .set_property(Property::TextureUnit, PropertyValue::UInt(1))
            .unwrap();
        state.sync(&mut driver, SyncBits::TEXTURE_UNIT);
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn deleted_textures() {
        let (mut textures, mut state, mut driver) = setup();
        textures.set_binding(5, TextureTarget::Texture3D, 8).unwrap();
        textures.sync(&mut driver, &mut state);

        textures.on_objects_deleted(&[8]);
        assert_eq!(textures.get_binding(5, TextureTarget::Texture3D).unwrap(), 0);
        assert!(!textures.is_dirty());
        assert!(textures.set_binding(80, TextureTarget::Texture3D, 1).is_err());
    }

    #[test]
    fn query() {
        let (_, mut state, mut driver) = setup();
        let limits = Limits {
            max_texture_units: 4,
            ..Limits::default()
        };

        driver.set_query(gl::ACTIVE_TEXTURE, &[f64::from(gl::TEXTURE2)]);
        driver.set_query(gl::TEXTURE_BINDING_2D, &[5.0]);
        driver.set_query(gl::SAMPLER_BINDING, &[6.0]);

        let mut textures = TextureBindings::query(&mut driver, &limits);
        let mut samplers = SamplerBindings::query(&mut driver, &limits);
        assert_eq!(textures.get_binding(3, TextureTarget::Texture2D).unwrap(), 5);
        assert_eq!(textures.get_binding(3, TextureTarget::Texture3D).unwrap(), 0);
        assert_eq!(samplers.get_binding(1).unwrap(), 6);
        assert_eq!(driver.bindings().active_texture, 2);
        assert!(!textures.is_dirty());
        assert!(!samplers.is_dirty());

        driver.clear_calls();
        textures.set_binding(0, TextureTarget::Texture2D, 0).unwrap();
        samplers.set_binding(0, 0).unwrap();
        textures.sync(&mut driver, &mut state);
        samplers.sync(&mut driver);
        assert_eq!(
            driver.calls(),
            &[Call::BindTexture(gl::TEXTURE_2D, 0), Call::BindSampler(0, 0)]
        );
    }

    #[test]
    fn samplers() {
        let mut samplers = SamplerBindings::new(&Limits::default());
        let mut driver = HeadlessDriver::new();

        samplers.set_binding(3, 2).unwrap();
        samplers.set_binding(4, 0).unwrap();
        samplers.sync(&mut driver);
        assert_eq!(driver.calls(), &[Call::BindSampler(3, 2)]);

        samplers.on_objects_deleted(&[2]);
        assert_eq!(samplers.get_binding(3).unwrap(), 0);
        assert!(!samplers.is_dirty());
    }
}
