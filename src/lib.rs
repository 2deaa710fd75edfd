//! A deferred, differential state cache in front of an OpenGL context.
//!
//! Every state-changing command issued through a [`Context`](context/struct.Context.html)
//! is absorbed by a software mirror of the driver's state table. The driver only sees a
//! change when a command that consumes the state is issued (a draw, a dispatch, a
//! readback, a query), and then only the groups of state that command depends on and
//! that actually changed.
//!
//! ```ignore
//! let driver = unsafe { GlDriver::load_with(|s| window.get_proc_address(s)) };
//! let mut ctx = Context::new(driver, ContextSettings::default())?;
//!
//! ctx.use_program(program);
//! ctx.enable(gl::DEPTH_TEST)?;
//! ctx.bind_vertex_array(vao)?;
//!
//! // Commits the program, the depth test and the vertex array, then draws.
//! ctx.draw_arrays(gl::TRIANGLES, 0, 3);
//! ```

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate smallvec;

pub mod bindings;
pub mod capabilities;
pub mod context;
pub mod driver;
pub mod errors;
pub mod registry;
pub mod settings;
pub mod state;

mod dispatch;

pub mod prelude {
    pub use crate::bindings::{BufferRange, BufferTarget, ObjectKind, TextureTarget};
    pub use crate::capabilities::{Capabilities, Limits, Version};
    pub use crate::context::{Context, SyncRequest};
    pub use crate::driver::{Driver, GlDriver, HeadlessDriver, Pixels, PixelsMut};
    pub use crate::errors::{Error, Result};
    pub use crate::registry::ResourceRegistry;
    pub use crate::settings::{ContextSettings, InitialState};
    pub use crate::state::{Property, PropertyValue, RenderingMode, StateCache, SyncBits};
}
