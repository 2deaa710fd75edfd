//! The wrappers of the driver entry points.
//!
//! Each wrapper matches one OpenGL entry point. Commands that only change state write
//! to the caches and never reach the driver. Commands that consume state first commit
//! the groups they depend on, then forward to the driver.
//!
//! Wrappers that take enums or indices the caches have to interpret return an `Err`
//! without touching any cached state when given values they don't recognize.

mod draw;
mod objects;
mod query;
mod state;
mod transfer;
mod vertex;

use gl::types::*;

use crate::bindings::{BufferSyncBits, BufferTarget, TextureTarget};
use crate::context::SyncRequest;
use crate::errors::*;
use crate::state::SyncBits;

fn invalid_enum(what: &'static str, value: GLenum) -> Error {
    warn!("Rejected 0x{:04X} as {}.", value, what);
    Error::InvalidEnum { what, value }
}

/// The buffer binding a buffer command named by `target` operates on.
fn buffer_request(target: GLenum) -> Result<SyncRequest> {
    if target == gl::ELEMENT_ARRAY_BUFFER {
        return Ok(SyncRequest::default().with_element_buffer());
    }

    BufferTarget::from_gl(target)
        .map(|v| SyncRequest::buffers(v.bit()))
        .ok_or_else(|| invalid_enum("buffer target", target))
}

/// The texture binding a texture command named by `target` operates on, which is the
/// one of the active unit.
fn texture_request(target: GLenum) -> Result<SyncRequest> {
    TextureTarget::from_gl(target)
        .map(|_| SyncRequest {
            textures: true,
            ..SyncRequest::state(SyncBits::TEXTURE_UNIT)
        })
        .ok_or_else(|| invalid_enum("texture target", target))
}

/// Uploads read from the pixel unpack buffer.
fn upload_request(target: GLenum) -> Result<SyncRequest> {
    Ok(texture_request(target)?.with_buffers(BufferSyncBits::PIXEL_UNPACK))
}

/// The framebuffer bindings a command named by `target` operates on.
fn framebuffer_bits(target: GLenum) -> Result<SyncBits> {
    match target {
        gl::DRAW_FRAMEBUFFER => Ok(SyncBits::DRAW_FRAMEBUFFER),
        gl::READ_FRAMEBUFFER => Ok(SyncBits::READ_FRAMEBUFFER),
        gl::FRAMEBUFFER => Ok(SyncBits::DRAW_FRAMEBUFFER | SyncBits::READ_FRAMEBUFFER),
        _ => Err(invalid_enum("framebuffer target", target)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn requests() {
        let request = buffer_request(gl::ELEMENT_ARRAY_BUFFER).unwrap();
        assert!(request.element_buffer);
        assert!(request.buffers.is_empty());

        let request = buffer_request(gl::COPY_READ_BUFFER).unwrap();
        assert_eq!(request.buffers, BufferSyncBits::COPY_READ);
        assert!(buffer_request(gl::TEXTURE_2D).is_err());

        let request = upload_request(gl::TEXTURE_CUBE_MAP_POSITIVE_Z).unwrap();
        assert_eq!(request.state, SyncBits::TEXTURE_UNIT);
        assert_eq!(request.buffers, BufferSyncBits::PIXEL_UNPACK);
        assert!(request.textures);
        assert!(!request.samplers);

        assert_eq!(
            framebuffer_bits(gl::FRAMEBUFFER).unwrap(),
            SyncBits::DRAW_FRAMEBUFFER | SyncBits::READ_FRAMEBUFFER
        );
        assert!(framebuffer_bits(gl::RENDERBUFFER).is_err());
    }
}
