use bitflags::bitflags;

bitflags! {
    /// The dirty-bit ledger of the state cache. One bit per group of properties which
    /// is committed together.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SyncBits: u32 {
        const BLENDING = 1 << 0;
        const CLEAR_COLOR = 1 << 1;
        const CLEAR_DEPTH = 1 << 2;
        const CLEAR_STENCIL = 1 << 3;
        const COLOR_DEPTH_MASK = 1 << 4;
        const CULL_FACE = 1 << 5;
        const DEPTH_FUNC = 1 << 6;
        const DRAW_FRAMEBUFFER = 1 << 7;
        const READ_FRAMEBUFFER = 1 << 8;
        const FRONT_FACE = 1 << 9;
        const LINE_WIDTH = 1 << 10;
        const MIN_SAMPLE_SHADING = 1 << 11;
        const N_PATCH_VERTICES = 1 << 12;
        const POLYGON_OFFSET = 1 << 13;
        const PROGRAM_OBJECT = 1 << 14;
        const RENDERBUFFER = 1 << 15;
        const RENDERING_MODES = 1 << 16;
        const SCISSOR_BOX = 1 << 17;
        const STENCIL = 1 << 18;
        const TEXTURE_UNIT = 1 << 19;
        const VERTEX_ARRAY_OBJECT = 1 << 20;
        const VIEWPORT = 1 << 21;

        const ALL = (1 << 22) - 1;
    }
}

impl SyncBits {
    /// Every group a draw call consumes.
    pub const DRAW: SyncBits = SyncBits::BLENDING
        .union(SyncBits::COLOR_DEPTH_MASK)
        .union(SyncBits::CULL_FACE)
        .union(SyncBits::DEPTH_FUNC)
        .union(SyncBits::DRAW_FRAMEBUFFER)
        .union(SyncBits::FRONT_FACE)
        .union(SyncBits::LINE_WIDTH)
        .union(SyncBits::MIN_SAMPLE_SHADING)
        .union(SyncBits::N_PATCH_VERTICES)
        .union(SyncBits::POLYGON_OFFSET)
        .union(SyncBits::PROGRAM_OBJECT)
        .union(SyncBits::RENDERING_MODES)
        .union(SyncBits::SCISSOR_BOX)
        .union(SyncBits::STENCIL)
        .union(SyncBits::VERTEX_ARRAY_OBJECT)
        .union(SyncBits::VIEWPORT);

    /// Every group a clear of the draw framebuffer consumes, apart from the clear
    /// values themselves.
    pub const CLEAR: SyncBits = SyncBits::COLOR_DEPTH_MASK
        .union(SyncBits::DRAW_FRAMEBUFFER)
        .union(SyncBits::RENDERING_MODES)
        .union(SyncBits::SCISSOR_BOX)
        .union(SyncBits::STENCIL)
        .union(SyncBits::VIEWPORT);
}
