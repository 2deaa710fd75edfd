//! The context: a driver together with the caches mirroring its state.

use std::marker::PhantomData;

use gl::types::*;

use crate::bindings::{BufferBindings, BufferSyncBits, SamplerBindings, TextureBindings, VaoRegistry};
use crate::capabilities::{Capabilities, Limits};
use crate::driver::Driver;
use crate::errors::*;
use crate::registry::{ResourceRegistry, TextureTargets};
use crate::settings::{ContextSettings, InitialState};
use crate::state::{StateCache, SyncBits};

/// The groups of cached state a command needs committed before it reaches the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncRequest {
    pub state: SyncBits,
    pub buffers: BufferSyncBits,
    /// The element buffer of the vertex array in use.
    pub element_buffer: bool,
    pub textures: bool,
    pub samplers: bool,
}

impl SyncRequest {
    /// Everything the caches hold.
    pub const ALL: SyncRequest = SyncRequest {
        state: SyncBits::ALL,
        buffers: BufferSyncBits::ALL,
        element_buffer: true,
        textures: true,
        samplers: true,
    };

    pub fn state(bits: SyncBits) -> Self {
        SyncRequest {
            state: bits,
            ..Default::default()
        }
    }

    pub fn buffers(bits: BufferSyncBits) -> Self {
        SyncRequest {
            buffers: bits,
            ..Default::default()
        }
    }

    pub fn with_state(mut self, bits: SyncBits) -> Self {
        self.state |= bits;
        self
    }

    pub fn with_buffers(mut self, bits: BufferSyncBits) -> Self {
        self.buffers |= bits;
        self
    }

    pub fn with_element_buffer(mut self) -> Self {
        self.element_buffer = true;
        self
    }

    /// Adds the texture and sampler bindings of every unit.
    pub fn with_textures(mut self) -> Self {
        self.textures = true;
        self.samplers = true;
        self
    }
}

/// A rendering context.
///
/// Commands are issued through the wrappers implemented on this type. Commands that
/// only change state are absorbed by the caches, commands that consume state commit
/// what they need first. The context is bound to the thread it was created on.
pub struct Context<D: Driver> {
    pub(crate) driver: D,
    pub(crate) capabilities: Capabilities,
    pub(crate) limits: Limits,
    pub(crate) state: StateCache,
    pub(crate) buffers: BufferBindings,
    pub(crate) textures: TextureBindings,
    pub(crate) samplers: SamplerBindings,
    pub(crate) vaos: VaoRegistry,
    pub(crate) registry: Box<dyn ResourceRegistry>,
    _unsend: PhantomData<*const ()>,
}

impl<D: Driver> Context<D> {
    /// Wraps `driver`, whose context must be current on this thread.
    pub fn new(mut driver: D, settings: ContextSettings) -> Result<Self> {
        let capabilities = Capabilities::parse(&mut driver)?;
        capabilities.check()?;

        let limits = settings.limits.unwrap_or(capabilities.limits);
        let state = match settings.initial_state {
            InitialState::Defaults => StateCache::new(&limits),
            InitialState::Query => StateCache::query(&mut driver, &limits),
            InitialState::Unknown => {
                let mut state = StateCache::new(&limits);
                state.invalidate();
                state
            }
        };

        info!(
            "Creates context on {:?} ({} {}) with {:?}.",
            capabilities.version, capabilities.vendor, capabilities.renderer, limits
        );

        let mut ctx = Context {
            driver,
            capabilities,
            limits,
            state,
            buffers: BufferBindings::new(&limits),
            textures: TextureBindings::new(&limits),
            samplers: SamplerBindings::new(&limits),
            vaos: VaoRegistry::new(&limits),
            registry: Box::new(TextureTargets::new()),
            _unsend: PhantomData,
        };

        match settings.initial_state {
            InitialState::Defaults => {}
            InitialState::Query => ctx.query_bindings(),
            InitialState::Unknown => ctx.invalidate_bindings(),
        }

        Ok(ctx)
    }

    /// Replaces the registry used to look up the targets of textures.
    pub fn with_registry(mut self, registry: Box<dyn ResourceRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Commits the requested groups, in the order the driver needs them: the state
    /// cache, the element buffer of the vertex array it bound, the buffer, texture and
    /// sampler bindings, and finally the active texture unit the texture bindings may
    /// have moved.
    pub fn sync(&mut self, request: SyncRequest) {
        let mut state = request.state - SyncBits::TEXTURE_UNIT;
        if request.element_buffer {
            state |= SyncBits::VERTEX_ARRAY_OBJECT;
        }

        self.state.sync(&mut self.driver, state);

        if request.element_buffer {
            let vao = self.state.vertex_array();
            self.vaos.sync(&mut self.driver, vao);
        }

        self.buffers.sync(&mut self.driver, request.buffers);

        if request.textures {
            self.textures.sync(&mut self.driver, &mut self.state);
        }

        if request.samplers {
            self.samplers.sync(&mut self.driver);
        }

        self.state
            .sync(&mut self.driver, request.state & SyncBits::TEXTURE_UNIT);
    }

    /// Forgets everything the driver was told. Use it after foreign code issued
    /// commands on this context.
    pub fn invalidate(&mut self) {
        self.state.invalidate();
        self.invalidate_bindings();
    }

    /// Reads the binding tables back from the driver, and registers the vertex array it
    /// has bound.
    fn query_bindings(&mut self) {
        let vao = self.state.vertex_array();

        self.buffers = BufferBindings::query(&mut self.driver, &self.limits);
        self.textures = TextureBindings::query(&mut self.driver, &self.limits);
        self.samplers = SamplerBindings::query(&mut self.driver, &self.limits);
        self.vaos = VaoRegistry::query(&mut self.driver, &self.limits, vao);
    }

    fn invalidate_bindings(&mut self) {
        self.buffers.invalidate();
        self.textures.invalidate();
        self.samplers.invalidate();
        self.vaos.invalidate();
    }

    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The driver itself. Commands issued directly are not seen by the caches, so
    /// call `invalidate` afterwards if they change state.
    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[inline]
    pub fn into_driver(self) -> D {
        self.driver
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[inline]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    #[inline]
    pub fn state(&self) -> &StateCache {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut StateCache {
        &mut self.state
    }

    #[inline]
    pub fn buffers(&self) -> &BufferBindings {
        &self.buffers
    }

    #[inline]
    pub fn textures(&self) -> &TextureBindings {
        &self.textures
    }

    #[inline]
    pub fn samplers(&self) -> &SamplerBindings {
        &self.samplers
    }

    #[inline]
    pub fn vertex_arrays(&self) -> &VaoRegistry {
        &self.vaos
    }

    /// The texture unit commands on textures go through.
    #[inline]
    pub(crate) fn active_unit(&self) -> GLuint {
        self.state.texture_unit()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bindings::{BufferTarget, TextureTarget};
    use crate::driver::{Call, HeadlessDriver};
    use crate::state::{Property, PropertyValue};

    #[test]
    fn initial_state_policies() {
        let ctx = Context::new(HeadlessDriver::new(), ContextSettings::default()).unwrap();
        assert!(ctx.state().dirty_bits().is_empty());
        assert_eq!(ctx.limits().max_viewports, 16);

        let settings = ContextSettings {
            initial_state: InitialState::Unknown,
            ..Default::default()
        };

        let mut ctx = Context::new(HeadlessDriver::new(), settings).unwrap();
        assert_eq!(ctx.state().dirty_bits(), SyncBits::ALL);

        ctx.driver_mut().clear_calls();
        ctx.sync(SyncRequest::state(SyncBits::PROGRAM_OBJECT));
        assert_eq!(ctx.driver().calls(), &[Call::UseProgram(0)]);

        let mut driver = HeadlessDriver::new();
        driver.set_query(gl::CURRENT_PROGRAM, &[7.0]);
        let settings = ContextSettings {
            initial_state: InitialState::Query,
            limits: Some(Limits {
                max_viewports: 2,
                ..Default::default()
            }),
        };

        let ctx = Context::new(driver, settings).unwrap();
        assert_eq!(ctx.state().program(), 7);
        assert_eq!(ctx.state().viewports(), 2);
    }

    fn queried_context(driver: HeadlessDriver) -> Context<HeadlessDriver> {
        let settings = ContextSettings {
            initial_state: InitialState::Query,
            ..Default::default()
        };

        let mut ctx = Context::new(driver, settings).unwrap();
        ctx.driver_mut().clear_calls();
        ctx
    }

    #[test]
    fn queried_bindings() {
        let mut driver = HeadlessDriver::new();
        driver.set_query(gl::ARRAY_BUFFER_BINDING, &[4.0]);
        driver.set_query(gl::TEXTURE_BINDING_2D, &[5.0]);
        driver.set_query(gl::SAMPLER_BINDING, &[6.0]);
        driver.set_indexed_query(gl::UNIFORM_BUFFER_BINDING, 1, &[8.0]);

        let mut ctx = queried_context(driver);
        assert_eq!(ctx.buffers().get_binding(BufferTarget::Array), 4);
        assert_eq!(
            ctx.buffers().get_indexed_binding(BufferTarget::Uniform, 1).unwrap().buffer,
            8
        );
        assert_eq!(ctx.textures().get_binding(0, TextureTarget::Texture2D).unwrap(), 5);
        assert_eq!(ctx.samplers().get_binding(0).unwrap(), 6);
        assert_eq!(ctx.driver().bindings().active_texture, 0);

        let mut v = [0];
        ctx.get_integerv(gl::ARRAY_BUFFER_BINDING, &mut v);
        assert_eq!(v[0], 4);
        assert!(ctx.driver().calls().is_empty());

        // Unbinding what the driver reported must reach it.
        ctx.bind_buffer(gl::ARRAY_BUFFER, 0).unwrap();
        ctx.bind_texture(gl::TEXTURE_2D, 0).unwrap();
        ctx.bind_sampler(0, 0).unwrap();
        ctx.flush();
        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::BindBuffer(gl::ARRAY_BUFFER, 0),
                Call::BindTexture(gl::TEXTURE_2D, 0),
                Call::BindSampler(0, 0),
                Call::Flush,
            ]
        );
    }

    #[test]
    fn queried_vertex_array() {
        let mut driver = HeadlessDriver::new();
        driver.set_query(gl::VERTEX_ARRAY_BINDING, &[7.0]);
        driver.set_query(gl::ELEMENT_ARRAY_BUFFER_BINDING, &[3.0]);

        let mut ctx = queried_context(driver);
        assert_eq!(ctx.state().vertex_array(), 7);
        assert_eq!(ctx.vertex_arrays().record(7).unwrap().element_buffer(), 3);

        // Nothing is known about the attributes, so none of these is dropped.
        ctx.enable_vertex_attrib_array(0).unwrap();
        ctx.disable_vertex_attrib_array(1).unwrap();
        ctx.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, 1).unwrap();
        ctx.draw_elements(gl::TRIANGLES, 3, gl::UNSIGNED_SHORT, 0);
        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::EnableVertexAttribArray(0),
                Call::DisableVertexAttribArray(1),
                Call::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 1),
                Call::DrawElements(gl::TRIANGLES, 3, gl::UNSIGNED_SHORT, 0),
            ]
        );
    }

    #[test]
    fn rejects_old_contexts() {
        let driver = HeadlessDriver::new().with_version("2.1 Mesa");
        assert!(Context::new(driver, ContextSettings::default()).is_err());
    }

    #[test]
    fn texture_unit_goes_last() {
        let mut ctx = Context::new(HeadlessDriver::new(), ContextSettings::default()).unwrap();
        ctx.state
            .set_property(Property::TextureUnit, PropertyValue::UInt(1))
            .unwrap();
        ctx.textures
            .set_binding(4, crate::bindings::TextureTarget::Texture2D, 2)
            .unwrap();

        ctx.driver_mut().clear_calls();
        ctx.sync(SyncRequest::ALL);
        assert_eq!(
            ctx.driver().calls(),
            &[
                Call::ActiveTexture(gl::TEXTURE4),
                Call::BindTexture(gl::TEXTURE_2D, 2),
                Call::ActiveTexture(gl::TEXTURE1),
            ]
        );
    }
}
