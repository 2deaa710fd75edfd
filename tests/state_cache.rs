extern crate env_logger;
extern crate gl;
extern crate ral_gl;
extern crate rand;

use rand::Rng;

use ral_gl::capabilities::Limits;
use ral_gl::driver::{Call, HeadlessDriver};
use ral_gl::state::*;

fn setup() -> (StateCache, HeadlessDriver) {
    let _ = env_logger::try_init();
    (StateCache::new(&Limits::default()), HeadlessDriver::new())
}

#[test]
fn redundant_sets() {
    let (mut state, mut driver) = setup();

    // Equal to the initial value.
    state
        .set_property(Property::DepthFunc, PropertyValue::Enum(gl::LESS))
        .unwrap();
    state.sync(&mut driver, SyncBits::ALL);
    assert!(driver.calls().is_empty());

    state
        .set_property(Property::DepthFunc, PropertyValue::Enum(gl::GEQUAL))
        .unwrap();
    state
        .set_property(Property::DepthFunc, PropertyValue::Enum(gl::GEQUAL))
        .unwrap();
    state.sync(&mut driver, SyncBits::DEPTH_FUNC);
    state.sync(&mut driver, SyncBits::DEPTH_FUNC);
    assert_eq!(driver.calls(), &[Call::DepthFunc(gl::GEQUAL)]);
}

#[test]
fn no_calls_before_sync() {
    let (mut state, mut driver) = setup();

    for i in 1..10 {
        state
            .set_property(Property::LineWidth, PropertyValue::Float(i as f32))
            .unwrap();
        state
            .set_property(Property::ProgramObject, PropertyValue::UInt(i))
            .unwrap();
    }

    assert!(driver.calls().is_empty());
    state.sync(&mut driver, SyncBits::LINE_WIDTH | SyncBits::PROGRAM_OBJECT);

    let mut calls = driver.take_calls();
    calls.sort_by_key(|v| format!("{:?}", v));
    assert_eq!(calls, vec![Call::LineWidth(9.0), Call::UseProgram(9)]);
}

#[test]
fn dirty_bits_are_sound() {
    let (mut state, mut driver) = setup();

    for property in Property::all() {
        let value = match property.kind() {
            ValueKind::Enum => PropertyValue::Enum(gl::ONE_MINUS_SRC_COLOR),
            ValueKind::Int => PropertyValue::Int(5),
            ValueKind::UInt => PropertyValue::UInt(5),
            ValueKind::Bool => PropertyValue::Bool(false),
            ValueKind::Float => PropertyValue::Float(0.5),
            ValueKind::Double => PropertyValue::Double(0.5),
            ValueKind::Float4 => PropertyValue::Float4([0.5; 4]),
            ValueKind::Int4 => PropertyValue::Int4([1, 2, 3, 4]),
            ValueKind::Bool4 => PropertyValue::Bool4([false, true, false, true]),
        };

        state.set_property(property, value).unwrap();
        assert!(state.is_dirty(property.sync_bit()), "{:?}", property);

        state.sync(&mut driver, property.sync_bit());
        assert!(!state.is_dirty(property.sync_bit()), "{:?}", property);
        assert_eq!(state.get_property(property), value);
    }

    assert!(state.dirty_bits().is_empty());
}

#[test]
fn syncing_one_bit_leaves_the_others() {
    let (mut state, mut driver) = setup();
    state
        .set_property(Property::CullFace, PropertyValue::Enum(gl::FRONT))
        .unwrap();
    state
        .set_property(Property::FrontFace, PropertyValue::Enum(gl::CW))
        .unwrap();

    state.sync(&mut driver, SyncBits::CULL_FACE);
    assert_eq!(driver.calls(), &[Call::CullFace(gl::FRONT)]);
    assert!(state.is_dirty(SyncBits::FRONT_FACE));
    assert_eq!(
        state.get_property(Property::FrontFace),
        PropertyValue::Enum(gl::CW)
    );

    state.sync(&mut driver, SyncBits::FRONT_FACE);
    assert_eq!(
        driver.calls(),
        &[Call::CullFace(gl::FRONT), Call::FrontFace(gl::CW)]
    );
}

#[test]
fn blend_functions_coalesce() {
    let (mut state, mut driver) = setup();
    let writes = [
        (Property::BlendFuncSrcRgb, gl::SRC_ALPHA),
        (Property::BlendFuncDstRgb, gl::ONE_MINUS_SRC_ALPHA),
        (Property::BlendFuncSrcAlpha, gl::ONE),
        (Property::BlendFuncDstAlpha, gl::ZERO),
    ];

    for &(property, v) in &writes {
        state.set_property(property, PropertyValue::Enum(v)).unwrap();
    }

    state.sync(&mut driver, SyncBits::BLENDING);
    assert_eq!(
        driver.calls(),
        &[Call::BlendFuncSeparate(
            gl::SRC_ALPHA,
            gl::ONE_MINUS_SRC_ALPHA,
            gl::ONE,
            gl::ZERO
        )]
    );
}

#[test]
fn rendering_modes_keep_their_own_values() {
    let (mut state, mut driver) = setup();
    state.set_rendering_mode(RenderingMode::Blend, true);
    state.set_rendering_mode(RenderingMode::CullFace, true);
    state.set_rendering_mode(RenderingMode::CullFace, false);
    state.set_rendering_mode(RenderingMode::ScissorTest, true);

    state.sync(&mut driver, SyncBits::RENDERING_MODES);
    assert_eq!(driver.count(|v| v == &Call::Enable(gl::BLEND)), 1);
    assert_eq!(driver.count(|v| v == &Call::Enable(gl::SCISSOR_TEST)), 1);
    assert_eq!(driver.calls().len(), 2);
    assert!(driver.capability(gl::BLEND));
    assert!(!driver.capability(gl::CULL_FACE));
}

#[test]
fn random_writes_commit_the_last_value() {
    let (mut state, mut driver) = setup();
    let mut rng = rand::thread_rng();
    let funcs = [gl::NEVER, gl::LESS, gl::EQUAL, gl::LEQUAL, gl::GREATER, gl::ALWAYS];

    for _ in 0..64 {
        let mut last = None;
        let mut program = None;

        for _ in 0..rng.gen_range(1, 16) {
            if rng.gen() {
                let v = funcs[rng.gen_range(0, funcs.len())];
                state
                    .set_property(Property::DepthFunc, PropertyValue::Enum(v))
                    .unwrap();
                last = Some(v);
            } else {
                let v = rng.gen_range(0, 4);
                state
                    .set_property(Property::ProgramObject, PropertyValue::UInt(v))
                    .unwrap();
                program = Some(v);
            }
        }

        driver.clear_calls();
        state.sync(&mut driver, SyncBits::ALL);
        assert!(state.dirty_bits().is_empty());

        for call in driver.calls() {
            match *call {
                Call::DepthFunc(v) => assert_eq!(Some(v), last),
                Call::UseProgram(v) => assert_eq!(Some(v), program),
                ref other => panic!("unexpected {:?}", other),
            }
        }

        assert!(driver.count(|v| match *v {
            Call::DepthFunc(_) => true,
            _ => false,
        }) <= 1);

        assert!(driver.count(|v| match *v {
            Call::UseProgram(_) => true,
            _ => false,
        }) <= 1);
    }
}

#[test]
fn indexed_viewports() {
    let (mut state, mut driver) = setup();
    assert!(!state.is_known(Property::Viewport, 2));

    state
        .set_indexed_property(Property::Viewport, 2, PropertyValue::Int4([0, 0, 32, 32]))
        .unwrap();
    assert!(state.is_known(Property::Viewport, 2));
    assert!(state
        .set_indexed_property(Property::Viewport, 16, PropertyValue::Int4([0; 4]))
        .is_err());
    assert!(state
        .set_property(Property::DepthMask, PropertyValue::Enum(gl::ONE))
        .is_err());

    state.sync(&mut driver, SyncBits::VIEWPORT);
    assert_eq!(
        driver.calls(),
        &[Call::ViewportIndexed(2, [0.0, 0.0, 32.0, 32.0])]
    );
}
