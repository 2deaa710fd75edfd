//! Binding collaborators: caches of which object is bound where, committed to the driver
//! after the state cache.

pub mod buffers;
pub mod textures;
pub mod vertex_array;

pub use self::buffers::{BufferBindings, BufferRange, BufferSyncBits, BufferTarget};
pub use self::textures::{SamplerBindings, TextureBindings, TextureTarget};
pub use self::vertex_array::{VaoRecord, VaoRegistry, VertexAttribute, VertexBufferBinding};

/// The kinds of driver objects whose lifetime the caches follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Buffer,
    Texture,
    Sampler,
    Framebuffer,
    Renderbuffer,
    VertexArray,
    Program,
}
