//! The fixed set of cached properties, their value kinds and the static tables mapping
//! them to sync bits, GL query names and defaults.

use std::collections::HashMap;

use gl::types::*;
use smallvec::SmallVec;

use super::bits::SyncBits;

/// The kind of value a property holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Enum,
    Int,
    UInt,
    Bool,
    Float,
    Double,
    Float4,
    Int4,
    Bool4,
}

/// A cached property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Enum(GLenum),
    Int(GLint),
    UInt(GLuint),
    Bool(bool),
    Float(f32),
    Double(f64),
    Float4([f32; 4]),
    Int4([GLint; 4]),
    Bool4([bool; 4]),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match *self {
            PropertyValue::Enum(_) => ValueKind::Enum,
            PropertyValue::Int(_) => ValueKind::Int,
            PropertyValue::UInt(_) => ValueKind::UInt,
            PropertyValue::Bool(_) => ValueKind::Bool,
            PropertyValue::Float(_) => ValueKind::Float,
            PropertyValue::Double(_) => ValueKind::Double,
            PropertyValue::Float4(_) => ValueKind::Float4,
            PropertyValue::Int4(_) => ValueKind::Int4,
            PropertyValue::Bool4(_) => ValueKind::Bool4,
        }
    }

    /// The value as a list of numbers, the way `glGet*` reports it.
    pub fn components(&self) -> SmallVec<[f64; 4]> {
        let flag = |v: bool| if v { 1.0 } else { 0.0 };

        match *self {
            PropertyValue::Enum(v) | PropertyValue::UInt(v) => smallvec![f64::from(v)],
            PropertyValue::Int(v) => smallvec![f64::from(v)],
            PropertyValue::Bool(v) => smallvec![flag(v)],
            PropertyValue::Float(v) => smallvec![f64::from(v)],
            PropertyValue::Double(v) => smallvec![v],
            PropertyValue::Float4(v) => v.iter().map(|v| f64::from(*v)).collect(),
            PropertyValue::Int4(v) => v.iter().map(|v| f64::from(*v)).collect(),
            PropertyValue::Bool4(v) => v.iter().map(|v| flag(*v)).collect(),
        }
    }

    /// The value as `glGetIntegerv` reports it. Handles keep their bit pattern.
    pub fn to_integers(&self) -> SmallVec<[GLint; 4]> {
        match *self {
            PropertyValue::Enum(v) | PropertyValue::UInt(v) => smallvec![v as GLint],
            PropertyValue::Int(v) => smallvec![v],
            PropertyValue::Int4(v) => v.iter().cloned().collect(),
            _ => self
                .components()
                .iter()
                .map(|v| v.round() as GLint)
                .collect(),
        }
    }

    /// The value as `glGetFloatv` reports it.
    pub fn to_floats(&self) -> SmallVec<[f32; 4]> {
        self.components().iter().map(|v| *v as f32).collect()
    }

    /// The value as `glGetBooleanv` reports it.
    pub fn to_booleans(&self) -> SmallVec<[bool; 4]> {
        self.components().iter().map(|v| *v != 0.0).collect()
    }

    // The accessors below are only used on values whose kind the store has already
    // checked against the property descriptor.

    pub(crate) fn as_enum(&self) -> GLenum {
        match *self {
            PropertyValue::Enum(v) => v,
            _ => unreachable!(),
        }
    }

    pub(crate) fn as_int(&self) -> GLint {
        match *self {
            PropertyValue::Int(v) => v,
            _ => unreachable!(),
        }
    }

    pub(crate) fn as_uint(&self) -> GLuint {
        match *self {
            PropertyValue::UInt(v) => v,
            _ => unreachable!(),
        }
    }

    pub(crate) fn as_bool(&self) -> bool {
        match *self {
            PropertyValue::Bool(v) => v,
            _ => unreachable!(),
        }
    }

    pub(crate) fn as_float(&self) -> f32 {
        match *self {
            PropertyValue::Float(v) => v,
            _ => unreachable!(),
        }
    }

    pub(crate) fn as_double(&self) -> f64 {
        match *self {
            PropertyValue::Double(v) => v,
            _ => unreachable!(),
        }
    }

    pub(crate) fn as_float4(&self) -> [f32; 4] {
        match *self {
            PropertyValue::Float4(v) => v,
            _ => unreachable!(),
        }
    }

    pub(crate) fn as_int4(&self) -> [GLint; 4] {
        match *self {
            PropertyValue::Int4(v) => v,
            _ => unreachable!(),
        }
    }

    pub(crate) fn as_bool4(&self) -> [bool; 4] {
        match *self {
            PropertyValue::Bool4(v) => v,
            _ => unreachable!(),
        }
    }
}

/// Names of the cached properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    BlendColor,
    BlendEquationRgb,
    BlendEquationAlpha,
    BlendFuncSrcRgb,
    BlendFuncDstRgb,
    BlendFuncSrcAlpha,
    BlendFuncDstAlpha,
    ClearColor,
    ClearDepth,
    ClearStencil,
    ColorMask,
    DepthMask,
    CullFace,
    DepthFunc,
    FrontFace,
    LineWidth,
    MinSampleShading,
    NPatchVertices,
    PolygonOffsetFactor,
    PolygonOffsetUnits,
    StencilFunc,
    StencilRef,
    StencilValueMask,
    StencilFail,
    StencilPassDepthFail,
    StencilPassDepthPass,
    StencilWriteMask,
    DrawFramebuffer,
    ReadFramebuffer,
    ProgramObject,
    Renderbuffer,
    /// The active texture unit, zero based.
    TextureUnit,
    VertexArrayObject,
    /// Indexed by viewport.
    ScissorBox,
    /// Indexed by viewport.
    Viewport,
}

impl Property {
    pub const COUNT: usize = 35;

    /// Every property, in declaration order.
    pub fn all() -> impl Iterator<Item = Property> {
        DESCRIPTORS.iter().map(|v| v.property)
    }

    #[inline]
    pub fn descriptor(self) -> &'static Descriptor {
        &DESCRIPTORS[self as usize]
    }

    #[inline]
    pub fn kind(self) -> ValueKind {
        self.descriptor().default.kind()
    }

    #[inline]
    pub fn sync_bit(self) -> SyncBits {
        self.descriptor().bit
    }

    #[inline]
    pub fn is_indexed(self) -> bool {
        self.descriptor().indexed
    }

    /// Finds the property a `glGet*` name reports.
    pub fn from_query(pname: GLenum) -> Option<Property> {
        PROPERTIES_BY_QUERY.get(&pname).cloned()
    }
}

/// Static description of a property.
#[derive(Debug)]
pub struct Descriptor {
    pub property: Property,
    pub bit: SyncBits,
    /// The initial value of a fresh context. The kind of this value is the kind of the
    /// property.
    pub default: PropertyValue,
    /// The `glGet*` name reporting the property.
    pub query: GLenum,
    pub indexed: bool,
}

macro_rules! descriptors {
    ($($property:ident => $bit:ident, $default:expr, $query:ident $(, $indexed:ident)*;)+) => {
        static DESCRIPTORS: [Descriptor; Property::COUNT] = [
            $(
                Descriptor {
                    property: Property::$property,
                    bit: SyncBits::$bit,
                    default: $default,
                    query: gl::$query,
                    indexed: false $(|| $indexed)*,
                },
            )+
        ];
    };
}

const INDEXED: bool = true;

descriptors! {
    BlendColor => BLENDING, PropertyValue::Float4([0.0; 4]), BLEND_COLOR;
    BlendEquationRgb => BLENDING, PropertyValue::Enum(gl::FUNC_ADD), BLEND_EQUATION_RGB;
    BlendEquationAlpha => BLENDING, PropertyValue::Enum(gl::FUNC_ADD), BLEND_EQUATION_ALPHA;
    BlendFuncSrcRgb => BLENDING, PropertyValue::Enum(gl::ONE), BLEND_SRC_RGB;
    BlendFuncDstRgb => BLENDING, PropertyValue::Enum(gl::ZERO), BLEND_DST_RGB;
    BlendFuncSrcAlpha => BLENDING, PropertyValue::Enum(gl::ONE), BLEND_SRC_ALPHA;
    BlendFuncDstAlpha => BLENDING, PropertyValue::Enum(gl::ZERO), BLEND_DST_ALPHA;
    ClearColor => CLEAR_COLOR, PropertyValue::Float4([0.0; 4]), COLOR_CLEAR_VALUE;
    ClearDepth => CLEAR_DEPTH, PropertyValue::Double(1.0), DEPTH_CLEAR_VALUE;
    ClearStencil => CLEAR_STENCIL, PropertyValue::Int(0), STENCIL_CLEAR_VALUE;
    ColorMask => COLOR_DEPTH_MASK, PropertyValue::Bool4([true; 4]), COLOR_WRITEMASK;
    DepthMask => COLOR_DEPTH_MASK, PropertyValue::Bool(true), DEPTH_WRITEMASK;
    CullFace => CULL_FACE, PropertyValue::Enum(gl::BACK), CULL_FACE_MODE;
    DepthFunc => DEPTH_FUNC, PropertyValue::Enum(gl::LESS), DEPTH_FUNC;
    FrontFace => FRONT_FACE, PropertyValue::Enum(gl::CCW), FRONT_FACE;
    LineWidth => LINE_WIDTH, PropertyValue::Float(1.0), LINE_WIDTH;
    MinSampleShading => MIN_SAMPLE_SHADING, PropertyValue::Float(0.0), MIN_SAMPLE_SHADING_VALUE;
    NPatchVertices => N_PATCH_VERTICES, PropertyValue::Int(3), PATCH_VERTICES;
    PolygonOffsetFactor => POLYGON_OFFSET, PropertyValue::Float(0.0), POLYGON_OFFSET_FACTOR;
    PolygonOffsetUnits => POLYGON_OFFSET, PropertyValue::Float(0.0), POLYGON_OFFSET_UNITS;
    StencilFunc => STENCIL, PropertyValue::Enum(gl::ALWAYS), STENCIL_FUNC;
    StencilRef => STENCIL, PropertyValue::Int(0), STENCIL_REF;
    StencilValueMask => STENCIL, PropertyValue::UInt(!0), STENCIL_VALUE_MASK;
    StencilFail => STENCIL, PropertyValue::Enum(gl::KEEP), STENCIL_FAIL;
    StencilPassDepthFail => STENCIL, PropertyValue::Enum(gl::KEEP), STENCIL_PASS_DEPTH_FAIL;
    StencilPassDepthPass => STENCIL, PropertyValue::Enum(gl::KEEP), STENCIL_PASS_DEPTH_PASS;
    StencilWriteMask => STENCIL, PropertyValue::UInt(!0), STENCIL_WRITEMASK;
    DrawFramebuffer => DRAW_FRAMEBUFFER, PropertyValue::UInt(0), DRAW_FRAMEBUFFER_BINDING;
    ReadFramebuffer => READ_FRAMEBUFFER, PropertyValue::UInt(0), READ_FRAMEBUFFER_BINDING;
    ProgramObject => PROGRAM_OBJECT, PropertyValue::UInt(0), CURRENT_PROGRAM;
    Renderbuffer => RENDERBUFFER, PropertyValue::UInt(0), RENDERBUFFER_BINDING;
    TextureUnit => TEXTURE_UNIT, PropertyValue::UInt(0), ACTIVE_TEXTURE;
    VertexArrayObject => VERTEX_ARRAY_OBJECT, PropertyValue::UInt(0), VERTEX_ARRAY_BINDING;
    ScissorBox => SCISSOR_BOX, PropertyValue::Int4([0; 4]), SCISSOR_BOX, INDEXED;
    Viewport => VIEWPORT, PropertyValue::Int4([0; 4]), VIEWPORT, INDEXED;
}

/// Capabilities toggled with `glEnable`/`glDisable`. All of them share the
/// `RENDERING_MODES` sync bit but keep their own value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderingMode {
    Blend,
    ColorLogicOp,
    CullFace,
    DepthClamp,
    DepthTest,
    Dither,
    FramebufferSrgb,
    LineSmooth,
    Multisample,
    PolygonOffsetFill,
    PolygonOffsetLine,
    PolygonOffsetPoint,
    PolygonSmooth,
    PrimitiveRestart,
    PrimitiveRestartFixedIndex,
    ProgramPointSize,
    RasterizerDiscard,
    SampleAlphaToCoverage,
    SampleAlphaToOne,
    SampleCoverage,
    SampleShading,
    SampleMask,
    ScissorTest,
    StencilTest,
    TextureCubeMapSeamless,
}

/// Modes, their capability enum and whether a fresh context enables them.
pub(crate) static RENDERING_MODES: [(RenderingMode, GLenum, bool); 25] = [
    (RenderingMode::Blend, gl::BLEND, false),
    (RenderingMode::ColorLogicOp, gl::COLOR_LOGIC_OP, false),
    (RenderingMode::CullFace, gl::CULL_FACE, false),
    (RenderingMode::DepthClamp, gl::DEPTH_CLAMP, false),
    (RenderingMode::DepthTest, gl::DEPTH_TEST, false),
    (RenderingMode::Dither, gl::DITHER, true),
    (RenderingMode::FramebufferSrgb, gl::FRAMEBUFFER_SRGB, false),
    (RenderingMode::LineSmooth, gl::LINE_SMOOTH, false),
    (RenderingMode::Multisample, gl::MULTISAMPLE, true),
    (RenderingMode::PolygonOffsetFill, gl::POLYGON_OFFSET_FILL, false),
    (RenderingMode::PolygonOffsetLine, gl::POLYGON_OFFSET_LINE, false),
    (RenderingMode::PolygonOffsetPoint, gl::POLYGON_OFFSET_POINT, false),
    (RenderingMode::PolygonSmooth, gl::POLYGON_SMOOTH, false),
    (RenderingMode::PrimitiveRestart, gl::PRIMITIVE_RESTART, false),
    (RenderingMode::PrimitiveRestartFixedIndex, gl::PRIMITIVE_RESTART_FIXED_INDEX, false),
    (RenderingMode::ProgramPointSize, gl::PROGRAM_POINT_SIZE, false),
    (RenderingMode::RasterizerDiscard, gl::RASTERIZER_DISCARD, false),
    (RenderingMode::SampleAlphaToCoverage, gl::SAMPLE_ALPHA_TO_COVERAGE, false),
    (RenderingMode::SampleAlphaToOne, gl::SAMPLE_ALPHA_TO_ONE, false),
    (RenderingMode::SampleCoverage, gl::SAMPLE_COVERAGE, false),
    (RenderingMode::SampleShading, gl::SAMPLE_SHADING, false),
    (RenderingMode::SampleMask, gl::SAMPLE_MASK, false),
    (RenderingMode::ScissorTest, gl::SCISSOR_TEST, false),
    (RenderingMode::StencilTest, gl::STENCIL_TEST, false),
    (RenderingMode::TextureCubeMapSeamless, gl::TEXTURE_CUBE_MAP_SEAMLESS, false),
];

lazy_static! {
    static ref MODES_BY_CAPABILITY: HashMap<GLenum, RenderingMode> = RENDERING_MODES
        .iter()
        .map(|&(mode, cap, _)| (cap, mode))
        .collect();

    static ref PROPERTIES_BY_QUERY: HashMap<GLenum, Property> = DESCRIPTORS
        .iter()
        .map(|v| (v.query, v.property))
        .collect();
}

impl RenderingMode {
    /// Finds the mode toggled by the `glEnable` capability `cap`.
    pub fn from_capability(cap: GLenum) -> Option<RenderingMode> {
        MODES_BY_CAPABILITY.get(&cap).cloned()
    }

    #[inline]
    pub fn capability(self) -> GLenum {
        RENDERING_MODES[self as usize].1
    }

    #[inline]
    pub(crate) fn mask(self) -> u32 {
        1 << (self as u32)
    }

    /// The set of modes a fresh context enables.
    pub(crate) fn defaults() -> u32 {
        RENDERING_MODES
            .iter()
            .filter(|v| v.2)
            .fold(0, |acc, v| acc | v.0.mask())
    }
}
