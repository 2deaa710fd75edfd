//! Introspection.
//!
//! A query the caches can answer never reaches the driver. Anything else may depend on
//! any state, so everything is committed before the query is forwarded.

use gl::types::*;

use crate::bindings::{BufferTarget, TextureTarget};
use crate::context::{Context, SyncRequest};
use crate::driver::Driver;
use crate::state::{Property, PropertyValue, RenderingMode};

/// The properties answered from the cache when their value is known.
const CACHED_PROPERTIES: [Property; 7] = [
    Property::ProgramObject,
    Property::Viewport,
    Property::ScissorBox,
    Property::VertexArrayObject,
    Property::DrawFramebuffer,
    Property::ReadFramebuffer,
    Property::Renderbuffer,
];

fn copy<T: Copy>(dst: &mut [T], src: &[T]) {
    for (dst, src) in dst.iter_mut().zip(src) {
        *dst = *src;
    }
}

impl<D: Driver> Context<D> {
    /// The value of `pname` as cached, or `None` if only the driver can answer it.
    pub fn cached_value(&self, pname: GLenum, index: Option<GLuint>) -> Option<PropertyValue> {
        let unit = self.active_unit();

        match (pname, index) {
            (gl::ACTIVE_TEXTURE, None) => return Some(PropertyValue::Enum(gl::TEXTURE0 + unit)),
            (gl::ELEMENT_ARRAY_BUFFER_BINDING, None) => {
                let vao = self.state.vertex_array();
                return self
                    .vaos
                    .record(vao)
                    .ok()
                    .map(|v| PropertyValue::UInt(v.element_buffer()));
            }
            (gl::SAMPLER_BINDING, None) => {
                return self.samplers.get_binding(unit).ok().map(PropertyValue::UInt);
            }
            _ => {}
        }

        if let Some(target) = BufferTarget::from_binding_query(pname) {
            return match index {
                None => Some(PropertyValue::UInt(self.buffers.get_binding(target))),
                Some(i) if target.is_indexed() => self
                    .buffers
                    .get_indexed_binding(target, i)
                    .ok()
                    .map(|v| PropertyValue::UInt(v.buffer)),
                Some(_) => None,
            };
        }

        if let (Some(target), None) = (TextureTarget::from_binding_query(pname), index) {
            return self
                .textures
                .get_binding(unit, target)
                .ok()
                .map(PropertyValue::UInt);
        }

        let property = Property::from_query(pname).filter(|v| CACHED_PROPERTIES.contains(v))?;
        let index = index.unwrap_or(0);
        if index > 0 && !property.is_indexed() {
            return None;
        }

        if self.state.is_known(property, index) {
            self.state.get_indexed_property(property, index).ok()
        } else {
            None
        }
    }

    pub fn get_integerv(&mut self, pname: GLenum, data: &mut [GLint]) {
        if let Some(v) = self.cached_value(pname, None) {
            copy(data, &v.to_integers()[..]);
            return;
        }

        self.sync(SyncRequest::ALL);
        self.driver.get_integerv(pname, data);
    }

    pub fn get_integeri_v(&mut self, pname: GLenum, index: GLuint, data: &mut [GLint]) {
        if let Some(v) = self.cached_value(pname, Some(index)) {
            copy(data, &v.to_integers()[..]);
            return;
        }

        self.sync(SyncRequest::ALL);
        self.driver.get_integeri_v(pname, index, data);
    }

    pub fn get_floatv(&mut self, pname: GLenum, data: &mut [f32]) {
        if let Some(v) = self.cached_value(pname, None) {
            copy(data, &v.to_floats()[..]);
            return;
        }

        self.sync(SyncRequest::ALL);
        self.driver.get_floatv(pname, data);
    }

    pub fn get_doublev(&mut self, pname: GLenum, data: &mut [f64]) {
        if let Some(v) = self.cached_value(pname, None) {
            copy(data, &v.components()[..]);
            return;
        }

        self.sync(SyncRequest::ALL);
        self.driver.get_doublev(pname, data);
    }

    pub fn get_booleanv(&mut self, pname: GLenum, data: &mut [bool]) {
        if let Some(v) = self.cached_value(pname, None) {
            copy(data, &v.to_booleans()[..]);
            return;
        }

        self.sync(SyncRequest::ALL);
        self.driver.get_booleanv(pname, data);
    }

    /// Rendering modes are answered from the cache.
    pub fn is_enabled(&mut self, cap: GLenum) -> bool {
        if let Some(mode) = RenderingMode::from_capability(cap) {
            return self.state.rendering_mode(mode);
        }

        self.sync(SyncRequest::ALL);
        self.driver.is_enabled(cap)
    }

    /// Errors raised by deferred commands are only generated once they are committed.
    pub fn get_error(&mut self) -> GLenum {
        self.sync(SyncRequest::ALL);
        self.driver.get_error()
    }

    #[inline]
    pub fn get_string(&mut self, name: GLenum) -> Option<String> {
        self.driver.get_string(name)
    }

    pub fn flush(&mut self) {
        self.sync(SyncRequest::ALL);
        self.driver.flush();
    }

    pub fn finish(&mut self) {
        self.sync(SyncRequest::ALL);
        self.driver.finish();
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
    fn cached_queries_skip_the_driver() {
        let mut ctx = setup();
        ctx.use_program(9);
        ctx.viewport(0, 0, 640, 480);
        ctx.active_texture(gl::TEXTURE2).unwrap();
        ctx.bind_texture(gl::TEXTURE_CUBE_MAP, 4).unwrap();
        ctx.bind_buffer_base(gl::UNIFORM_BUFFER, 3, 6).unwrap();

        let mut v = [0; 4];
        ctx.get_integerv(gl::CURRENT_PROGRAM, &mut v[..1]);
        assert_eq!(v[0], 9);

        ctx.get_integerv(gl::VIEWPORT, &mut v);
        assert_eq!(v, [0, 0, 640, 480]);

        ctx.get_integerv(gl::ACTIVE_TEXTURE, &mut v[..1]);
        assert_eq!(v[0], gl::TEXTURE2 as GLint);

        ctx.get_integerv(gl::TEXTURE_BINDING_CUBE_MAP, &mut v[..1]);
        assert_eq!(v[0], 4);

        ctx.get_integeri_v(gl::UNIFORM_BUFFER_BINDING, 3, &mut v[..1]);
        assert_eq!(v[0], 6);
        ctx.get_integerv(gl::UNIFORM_BUFFER_BINDING, &mut v[..1]);
        assert_eq!(v[0], 6);

        let mut f = [0.0; 4];
        ctx.get_floatv(gl::VIEWPORT, &mut f);
        assert_eq!(f, [0.0, 0.0, 640.0, 480.0]);

        assert!(ctx.driver().calls().is_empty());
        assert!(ctx.state().is_dirty(crate::state::SyncBits::PROGRAM_OBJECT));
    }

    #[test]
    fn other_queries_commit_everything() {
        let mut ctx = setup();
        ctx.depth_func(gl::LEQUAL);
        ctx.bind_buffer(gl::ARRAY_BUFFER, 2).unwrap();

        let mut v = [0; 1];
        ctx.get_integerv(gl::DEPTH_FUNC, &mut v);
        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::DepthFunc(gl::LEQUAL),
                Call::BindBuffer(gl::ARRAY_BUFFER, 2),
                Call::GetIntegerv(gl::DEPTH_FUNC),
            ]
        );

        assert!(ctx.state().dirty_bits().is_empty());
    }

    #[test]
    fn unknown_viewports_go_to_the_driver() {
        let mut ctx = setup();
        ctx.driver_mut().set_indexed_query(gl::VIEWPORT, 1, &[1.0, 2.0, 3.0, 4.0]);

        let mut v = [0; 4];
        ctx.get_integeri_v(gl::VIEWPORT, 1, &mut v);
        assert_eq!(v, [1, 2, 3, 4]);
        assert_eq!(ctx.driver().calls(), &[Call::GetIntegeriv(gl::VIEWPORT, 1)]);
    }

    #[test]
    fn rendering_modes() {
        let mut ctx = setup();
        ctx.enable(gl::BLEND).unwrap();
        assert!(ctx.is_enabled(gl::BLEND));
        assert!(ctx.is_enabled(gl::DITHER));
        assert!(!ctx.is_enabled(gl::CULL_FACE));
        assert!(ctx.driver().calls().is_empty());
    }

    #[test]
    fn flush_commits_pending_state() {
        let mut ctx = setup();
        ctx.clear_color(1.0, 0.0, 0.0, 1.0);
        ctx.flush();
        ctx.finish();
        assert_eq!(
            ctx.driver().calls(),
            &[Call::ClearColor([1.0, 0.0, 0.0, 1.0]), Call::Flush, Call::Finish]
        );
        assert_eq!(ctx.get_error(), gl::NO_ERROR);
    }
}
