#[cfg(feature = "arbitrary")]
mod fuzz {
    use std::collections::HashSet;
    use std::sync::Arc;

    use arbitrary::{Arbitrary, Unstructured};
    use cg_script::{
        lint_script, run_headless, CompilerConfig, LabelId, ResourceLimiter, ScriptRaw,
    };

    fn fill_deterministic(buf: &mut [u8], seed: u64) {
        let mut state = seed;
        for byte in buf.iter_mut() {
            // xorshift64*
            state ^= state >> 12;
            state ^= state << 25;
            state ^= state >> 27;
            state = state.wrapping_mul(0x2545_F491_4F6C_DD1D);
            *byte = (state & 0xFF) as u8;
        }
    }

    fn unique_ids(script: &ScriptRaw) -> usize {
        script
            .scenes
            .iter()
            .filter_map(|scene| scene.id.as_deref().filter(|id| !id.is_empty()))
            .collect::<HashSet<_>>()
            .len()
    }

    #[test]
    fn fuzz_compiled_graphs_hold_their_guarantees() {
        let mut raw_data = [0u8; 1024 * 16];
        let config = CompilerConfig::default();

        for i in 0..128u64 {
            fill_deterministic(&mut raw_data, 0xC0FF_EE11u64 ^ i);
            let mut u = Unstructured::new(&raw_data);
            let Ok(script) = ScriptRaw::arbitrary(&mut u) else {
                continue;
            };

            let graph = script.compile(&config);

            assert!(graph.dangling_targets().is_empty(), "seed {i}");
            assert_eq!(graph.labels.first().map(|node| &node.id), Some(&LabelId::Cover));
            assert_eq!(graph.ending().is_some(), script.ending.is_some(), "seed {i}");
            let expected = 1 + unique_ids(&script) + usize::from(script.ending.is_some());
            assert_eq!(graph.labels.len(), expected, "seed {i}");
            assert_eq!(script.compile(&config), graph, "seed {i}");

            let _ = lint_script(&script, &config);
            let trace = run_headless(Arc::new(graph), 64);
            assert!(!trace.is_empty());
        }
    }

    #[test]
    fn fuzz_json_roundtrip_stability() {
        let mut raw_data = [0u8; 1024 * 16];

        for i in 0..64u64 {
            fill_deterministic(&mut raw_data, 0x5EED_1234u64 ^ (i << 1));
            let mut u = Unstructured::new(&raw_data);
            let Ok(script) = ScriptRaw::arbitrary(&mut u) else {
                continue;
            };
            let json = script.to_json().expect("serialize arbitrary script");
            let reparsed = ScriptRaw::from_json_with_limits(&json, ResourceLimiter::unbounded())
                .expect("reparse")
                .expect("object script");
            assert_eq!(reparsed, script, "seed {i}");
        }
    }
}
