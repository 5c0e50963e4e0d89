#![no_main]

use csum::{ComputeState, CsumError, Flags, Linear, Registry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|args: &str| {
    let registry = Registry::with_builtins();

    for algo in registry.algorithms() {
        // Lenient preparation never fails on a parameter
        let mut ctx = registry.prepare(algo.name(), Some(args), Flags::empty()).unwrap();
        let mut state = ComputeState::new(Linear::default());
        let digest = ctx.compute(&mut state).unwrap();
        assert!(digest.starts_with("0x"));

        // Strict preparation either accepts or reports the parameter
        match registry.prepare(algo.name(), Some(args), Flags::STRICT) {
            Ok(mut strict) => {
                let mut state = ComputeState::new(Linear::default());
                assert_eq!(strict.compute(&mut state).unwrap(), digest);
            }
            Err(CsumError::MalformedParameter { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
});
