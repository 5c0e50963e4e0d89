// Integration tests for the checksum engine
// Tests cover: registry lifecycle, compute/resume semantics, sources, properties

use std::io::{self, Cursor, Read};
use std::sync::Arc;

use bytes::Bytes;
use csum::{
    Algorithm, ComputeConfig, ComputeState, CrcAlgorithm, CsumError, Flags, Linear, Pipe,
    Registry,
};
use proptest::prelude::*;

const CHECK_INPUT: &[u8] = b"123456789";

fn prepare(name: &str, args: Option<&str>) -> csum::Context {
    Registry::with_builtins()
        .prepare(name, args, Flags::empty())
        .unwrap()
}

fn linear_digest(name: &str, data: &[u8]) -> String {
    let mut ctx = prepare(name, None);
    let mut state = ComputeState::<Linear>::default();
    Linear::begin(&mut ctx, &mut state, Bytes::copy_from_slice(data)).unwrap()
}

// ============================================================================
// End-to-End
// ============================================================================

#[test]
fn test_crc32_well_known_digest() {
    assert_eq!(linear_digest("crc32", CHECK_INPUT), "0xcbf43926");
}

#[test]
fn test_unknown_algorithm_never_yields_context() {
    let result = Registry::with_builtins().prepare("does-not-exist", None, Flags::empty());
    assert!(matches!(result, Err(CsumError::UnknownAlgorithm { .. })));
}

#[test]
fn test_every_builtin_output_width() {
    let registry = Registry::with_builtins();
    for algo in registry.algorithms() {
        let digest = linear_digest(algo.name(), CHECK_INPUT);
        assert!(digest.starts_with("0x"), "{}", algo.name());

        let hex = &digest[2..];
        assert!(
            hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
            "{}: {digest}",
            algo.name()
        );
        assert!(
            [2, 4, 8, 16, 64].contains(&hex.len()),
            "{}: {digest}",
            algo.name()
        );
    }
}

#[test]
fn test_checksum_convenience() {
    assert_eq!(csum::checksum("crc32", CHECK_INPUT).unwrap(), "0xcbf43926");
    assert_eq!(csum::checksum("crc16", CHECK_INPUT).unwrap(), "0xbb3d");
}

// ============================================================================
// Seeding
// ============================================================================

#[test]
fn test_seed_over_empty_input_is_unchanged() {
    let mut ctx = prepare("crc32", Some("0x10"));
    let mut state = ComputeState::<Linear>::default();
    let digest = Linear::begin(&mut ctx, &mut state, Bytes::new()).unwrap();
    assert_eq!(digest, "0x00000010");
    assert_eq!(state.offset(), 0);
}

#[test]
fn test_seed_bases() {
    for (args, expected) in [("16", "0x0010"), ("0x10", "0x0010"), ("020", "0x0010")] {
        let mut ctx = prepare("crc16", Some(args));
        let mut state = ComputeState::new(Linear::default());
        assert_eq!(ctx.compute(&mut state).unwrap(), expected, "{args}");
    }
}

#[test]
fn test_seed_continues_previous_digest() {
    // A digest of the head used as the seed for the tail equals the whole
    let head = linear_digest("crc64", &CHECK_INPUT[..3]);
    let mut ctx = prepare("crc64", Some(&head));
    let mut state = ComputeState::new(Linear::new(&CHECK_INPUT[3..]));
    assert_eq!(
        ctx.compute(&mut state).unwrap(),
        linear_digest("crc64", CHECK_INPUT)
    );
}

#[test]
fn test_malformed_parameter_policy() {
    let registry = Registry::with_builtins();

    // Lenient: degrades to zero
    let mut ctx = registry.prepare("crc32", Some("bogus"), Flags::empty()).unwrap();
    let mut state = ComputeState::new(Linear::new(CHECK_INPUT));
    assert_eq!(ctx.compute(&mut state).unwrap(), "0xcbf43926");

    // Strict: rejected
    let result = registry.prepare("crc32", Some("bogus"), Flags::STRICT);
    assert!(matches!(result, Err(CsumError::MalformedParameter { .. })));
}

// ============================================================================
// Registry Lifecycle
// ============================================================================

#[test]
fn test_duplicate_registration_keeps_first() {
    let registry = Registry::with_builtins();
    let before = registry.lookup("crc32").unwrap();
    let impostor = Arc::new(CrcAlgorithm::new("crc32", "impostor", 8, |_, prev| prev));

    let result = registry.register(impostor);
    assert!(matches!(result, Err(CsumError::AlreadyRegistered { .. })));
    assert!(Arc::ptr_eq(&registry.lookup("crc32").unwrap(), &before));
    assert_eq!(linear_digest("crc32", CHECK_INPUT), "0xcbf43926");
}

#[test]
fn test_unregister_never_registered() {
    let registry = Registry::with_builtins();
    let len = registry.len();
    let stranger: Arc<dyn Algorithm> =
        Arc::new(CrcAlgorithm::new("stranger", "never registered", 8, |_, prev| prev));

    let result = registry.unregister(&stranger);
    assert!(matches!(result, Err(CsumError::NotFound { .. })));
    assert_eq!(registry.len(), len);
}

#[test]
fn test_plugin_algorithm_roundtrip() {
    // Sums bytes modulo 256, enough to observe the plumbing
    fn fold_sum(block: &[u8], prev: u64) -> u64 {
        block
            .iter()
            .fold(prev, |acc, &b| (acc + u64::from(b)) & 0xff)
    }

    let registry = Registry::new();
    let plugin: Arc<dyn Algorithm> = Arc::new(CrcAlgorithm::new("sum8", "byte sum", 8, fold_sum));
    registry.register(plugin.clone()).unwrap();

    let mut ctx = registry.prepare("sum8", None, Flags::empty()).unwrap();
    let mut state = ComputeState::new(Linear::new(vec![1u8, 2, 3]));
    assert_eq!(ctx.compute(&mut state).unwrap(), "0x06");
    ctx.destroy();

    registry.unregister(&plugin).unwrap();
    assert!(registry.prepare("sum8", None, Flags::empty()).is_err());
}

#[test]
fn test_enumeration_for_help() {
    let names: Vec<_> = Registry::with_builtins()
        .algorithms()
        .iter()
        .map(|a| a.name().to_owned())
        .collect();
    assert_eq!(&names[..3], ["crc4", "crc7", "crc8"]);
    assert!(names.contains(&"crc-rocksoft".to_owned()));
}

// ============================================================================
// Sources
// ============================================================================

#[test]
fn test_linear_resume_after_exhaustion() {
    let mut ctx = prepare("crc32", None);
    let mut state = ComputeState::<Linear>::default();
    let first = Linear::begin(&mut ctx, &mut state, CHECK_INPUT).unwrap();
    for _ in 0..3 {
        assert_eq!(Linear::resume(&mut ctx, &mut state).unwrap(), first);
        assert_eq!(state.offset(), 9);
    }
}

#[test]
fn test_pipe_intermediate_digests() {
    let mut ctx = prepare("crc32", None);
    let config = ComputeConfig::default().with_pipe_buffer_size(2);

    let pipe = Pipe::new(Cursor::new(&CHECK_INPUT[..4]), &config).unwrap();
    let mut state = ComputeState::new(pipe);
    let head = ctx.compute(&mut state).unwrap();
    assert_eq!(state.offset(), 4);
    assert_eq!(head, linear_digest("crc32", &CHECK_INPUT[..4]));

    let (whole, total) =
        Pipe::resume(&mut ctx, &mut state, Cursor::new(&CHECK_INPUT[4..])).unwrap();
    assert_eq!(total, 9);
    assert_eq!(whole, "0xcbf43926");
}

#[test]
fn test_pipe_failure_is_observable() {
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    let mut ctx = prepare("crc32", None);
    let mut state = ComputeState::new(Pipe::new(Broken, &ComputeConfig::default()).unwrap());
    let err = ctx.compute(&mut state).unwrap_err();
    assert!(matches!(err, CsumError::SourceRead(_)));
    assert_eq!(state.offset(), 0);
}

#[test]
fn test_mixed_sources_one_context() {
    let mut ctx = prepare("crc-t10dif", None);
    let config = ComputeConfig::default().with_pipe_buffer_size(3);

    let mut linear = ComputeState::new(Linear::new(&CHECK_INPUT[..5]));
    ctx.compute(&mut linear).unwrap();

    // The pipe continues from the linear offset
    let pipe = Pipe::new(Cursor::new(&CHECK_INPUT[5..]), &config).unwrap();
    let mut piped = linear.carry(pipe);
    let digest = ctx.resume(&mut piped).unwrap();

    assert_eq!(digest, linear_digest("crc-t10dif", CHECK_INPUT));
    assert_eq!(piped.offset(), 9);
}

// ============================================================================
// Properties
// ============================================================================

fn algorithm_name() -> impl Strategy<Value = String> {
    let names: Vec<String> = Registry::with_builtins()
        .algorithms()
        .iter()
        .map(|a| a.name().to_owned())
        .collect();
    proptest::sample::select(names)
}

proptest! {
    #[test]
    fn prop_compute_is_deterministic(
        name in algorithm_name(),
        data in proptest::collection::vec(any::<u8>(), 0..2048),
    ) {
        prop_assert_eq!(linear_digest(&name, &data), linear_digest(&name, &data));
    }

    #[test]
    fn prop_streaming_equivalence(
        name in algorithm_name(),
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        cuts in proptest::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let expected = linear_digest(&name, &data);

        let mut points: Vec<usize> = cuts.iter().map(|i| i.index(data.len() + 1)).collect();
        points.push(0);
        points.push(data.len());
        points.sort_unstable();

        let mut ctx = prepare(&name, None);
        let mut state = ComputeState::<Linear>::default();
        let mut digest = ctx.compute(&mut state).unwrap();
        for window in points.windows(2) {
            let piece = Bytes::copy_from_slice(&data[window[0]..window[1]]);
            digest = Linear::feed(&mut ctx, &mut state, piece).unwrap();
        }

        prop_assert_eq!(digest, expected);
        prop_assert_eq!(state.offset(), data.len() as u64);
    }

    #[test]
    fn prop_pipe_matches_linear(
        name in algorithm_name(),
        data in proptest::collection::vec(any::<u8>(), 0..4096),
        buffer_size in 1usize..512,
    ) {
        let config = ComputeConfig::default().with_pipe_buffer_size(buffer_size);
        let mut ctx = prepare(&name, None);
        let (digest, size) = Pipe::compute(&mut ctx, Cursor::new(data.clone()), &config).unwrap();

        prop_assert_eq!(size, data.len() as u64);
        prop_assert_eq!(digest, linear_digest(&name, &data));
    }
}
