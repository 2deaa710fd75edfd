//! Context capabilities: the version of the implementation and the limits the caches
//! are sized from.

use std::cmp;

use gl::types::*;
use serde::{Deserialize, Serialize};

use crate::driver::Driver;
use crate::errors::*;

/// The API and version of a context.
///
/// Versions of different APIs are unordered, so `GL(3, 0) >= ES(3, 0)` and
/// `ES(3, 0) >= GL(3, 0)` are both false.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    GL(u8, u8),
    ES(u8, u8),
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        let (lhs_es, lhs_major, lhs_minor) = self.split();
        let (rhs_es, rhs_major, rhs_minor) = other.split();

        if lhs_es == rhs_es {
            Some((lhs_major, lhs_minor).cmp(&(rhs_major, rhs_minor)))
        } else {
            None
        }
    }
}

impl Version {
    fn split(self) -> (bool, u8, u8) {
        match self {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        }
    }

    /// Parses the string returned by `glGetString(GL_VERSION)`.
    pub fn parse(desc: &str) -> Result<Version> {
        let (es, desc) = if desc.starts_with("OpenGL ES-") {
            // "OpenGL ES-CM 1.1" and friends carry a profile before the version.
            (true, desc[10..].splitn(2, ' ').nth(1).unwrap_or(""))
        } else if desc.starts_with("OpenGL ES ") {
            (true, &desc[10..])
        } else {
            (false, desc)
        };

        let malformed = || Error::Requirement(format!("malformed version string {:?}", desc));
        let desc = desc.split(' ').next().ok_or_else(malformed)?;

        let mut iter = desc.split('.');
        let major = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;
        let minor = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;

        Ok(if es {
            Version::ES(major, minor)
        } else {
            Version::GL(major, minor)
        })
    }
}

/// Implementation limits the state cache and the binding collaborators are sized from.
///
/// Contrary to the state, these values never change during the lifetime of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Number of indexed viewports and scissor boxes.
    pub max_viewports: u32,
    /// Number of texture image units across all shader stages.
    pub max_texture_units: u32,
    pub max_vertex_attribs: u32,
    pub max_vertex_attrib_bindings: u32,
    pub max_atomic_counter_buffer_bindings: u32,
    pub max_shader_storage_buffer_bindings: u32,
    pub max_transform_feedback_buffers: u32,
    pub max_uniform_buffer_bindings: u32,
}

impl Default for Limits {
    /// The minimum maximums an OpenGL 4.5 implementation must support.
    fn default() -> Self {
        Limits {
            max_viewports: 16,
            max_texture_units: 80,
            max_vertex_attribs: 16,
            max_vertex_attrib_bindings: 16,
            max_atomic_counter_buffer_bindings: 1,
            max_shader_storage_buffer_bindings: 8,
            max_transform_feedback_buffers: 4,
            max_uniform_buffer_bindings: 72,
        }
    }
}

impl Limits {
    /// Queries the limits of the context `driver` forwards to.
    ///
    /// Limits the implementation does not report (e.g. no viewport arrays) fall back to a
    /// single slot, so every cache still has room for the non-indexed state.
    pub fn query(driver: &mut dyn Driver) -> Limits {
        let mut get = |pname: GLenum, min: u32| {
            let mut v = [0];
            driver.get_integerv(pname, &mut v);
            cmp::max(cmp::max(v[0], 0) as u32, min)
        };

        Limits {
            max_viewports: get(gl::MAX_VIEWPORTS, 1),
            max_texture_units: get(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, 1),
            max_vertex_attribs: get(gl::MAX_VERTEX_ATTRIBS, 1),
            max_vertex_attrib_bindings: get(gl::MAX_VERTEX_ATTRIB_BINDINGS, 1),
            max_atomic_counter_buffer_bindings: get(gl::MAX_ATOMIC_COUNTER_BUFFER_BINDINGS, 0),
            max_shader_storage_buffer_bindings: get(gl::MAX_SHADER_STORAGE_BUFFER_BINDINGS, 0),
            max_transform_feedback_buffers: get(gl::MAX_TRANSFORM_FEEDBACK_BUFFERS, 0),
            max_uniform_buffer_bindings: get(gl::MAX_UNIFORM_BUFFER_BINDINGS, 0),
        }
    }
}

/// What the implementation behind a driver reports about itself.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub version: Version,
    /// `GL_VENDOR`, empty if unavailable.
    pub vendor: String,
    /// `GL_RENDERER`, empty if unavailable.
    pub renderer: String,
    pub limits: Limits,
}

impl Capabilities {
    pub fn parse(driver: &mut dyn Driver) -> Result<Capabilities> {
        let version = driver
            .get_string(gl::VERSION)
            .ok_or_else(|| Error::Requirement("GL_VERSION is not available".to_owned()))?;

        Ok(Capabilities {
            version: Version::parse(&version)?,
            vendor: driver.get_string(gl::VENDOR).unwrap_or_default(),
            renderer: driver.get_string(gl::RENDERER).unwrap_or_default(),
            limits: Limits::query(driver),
        })
    }

    /// Checks that the implementation offers what the caches rely on: vertex array
    /// objects and separate blend state.
    pub fn check(&self) -> Result<()> {
        let supported = match self.version {
            Version::GL(..) => self.version >= Version::GL(3, 0),
            Version::ES(..) => self.version >= Version::ES(3, 0),
        };

        if !supported {
            return Err(Error::Requirement(format!(
                "vertex array objects ({:?} is too old)",
                self.version
            )));
        }

        Ok(())
    }
}
