use failure::Fail;
use gl::types::*;

use crate::state::{Property, ValueKind};

/// Contract violations and context requirements.
///
/// None of these describe a transient condition. They are reported instead of asserted so
/// a caller can decide how loudly to fail, but the cached state is never modified by a
/// call that returns one.
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "0x{:04X} is not a valid {}.", value, what)]
    InvalidEnum { what: &'static str, value: GLenum },
    #[fail(display = "{} index {} is out of range (limit {}).", what, index, limit)]
    IndexOutOfRange {
        what: &'static str,
        index: u32,
        limit: u32,
    },
    #[fail(display = "Only index 0 of {} is supported, got {}.", what, index)]
    UnsupportedIndex { what: &'static str, index: u32 },
    #[fail(display = "{:?} holds {:?} values, got {:?}.", property, expected, found)]
    PropertyKind {
        property: Property,
        expected: ValueKind,
        found: ValueKind,
    },
    #[fail(display = "Vertex array object {} does not exist.", _0)]
    UnknownVertexArray(GLuint),
    #[fail(display = "Texture {} has never been bound to a target.", _0)]
    UnknownTexture(GLuint),
    #[fail(display = "OpenGL implementation doesn't support {}.", _0)]
    Requirement(String),
    #[fail(display = "Settings: {}", _0)]
    Settings(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Settings(format!("{}", err))
    }
}
