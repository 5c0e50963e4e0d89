#![no_main]

use std::io::Cursor;

use bytes::Bytes;
use csum::{ComputeConfig, ComputeState, Flags, Linear, Pipe, Registry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    let registry = Registry::with_builtins();

    // Cut point and transfer size derived from the input itself
    let split = data.first().map_or(0, |&b| b as usize).min(data.len());
    let buffer_size = data.get(1).map_or(1, |&b| b as usize + 1);
    let config = ComputeConfig::new(buffer_size).unwrap();

    for algo in registry.algorithms() {
        let mut ctx = registry.prepare(algo.name(), None, Flags::empty()).unwrap();

        let mut state = ComputeState::new(Linear::new(data.clone()));
        let whole = ctx.compute(&mut state).unwrap();
        assert_eq!(state.offset(), data.len() as u64);

        // Two linear pieces
        let mut state = ComputeState::<Linear>::default();
        Linear::begin(&mut ctx, &mut state, Bytes::copy_from_slice(&data[..split])).unwrap();
        let fed = Linear::feed(&mut ctx, &mut state, Bytes::copy_from_slice(&data[split..])).unwrap();
        assert_eq!(fed, whole);
        assert_eq!(state.offset(), data.len() as u64);

        // Bounded reads
        let (piped, size) = Pipe::compute(&mut ctx, Cursor::new(&data), &config).unwrap();
        assert_eq!(piped, whole);
        assert_eq!(size, data.len() as u64);

        ctx.destroy();
    }
});
