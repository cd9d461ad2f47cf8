//! Property-based tests for normalization and dispatch

use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use swatchkeys_shortcut::*;

/// Strategy for a single base key
fn base_key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        r"[a-z0-9]",
        Just("enter".to_string()),
        Just("escape".to_string()),
        Just("arrowup".to_string()),
        Just("f5".to_string()),
        Just("tab".to_string()),
    ]
}

/// Strategy for modifier spellings: (canonical prefix, alias used in the spec)
fn modifier_alias_strategy() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop_oneof![
        Just(("c", "c")),
        Just(("c", "ctrl")),
        Just(("c", "Control")),
        Just(("s", "s")),
        Just(("s", "SHIFT")),
        Just(("a", "a")),
        Just(("a", "alt")),
        Just(("m", "m")),
        Just(("m", "Meta")),
    ]
}

/// Strategy for a list of modifiers in arbitrary order
fn modifiers_strategy() -> impl Strategy<Value = Vec<(&'static str, &'static str)>> {
    prop::collection::vec(modifier_alias_strategy(), 0..5).prop_shuffle()
}

/// Strategy for a short sequence of plain keys, e.g. `a b c`
fn sequence_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(r"[a-z]", 1..5).prop_map(|keys| keys.join(" "))
}

fn normalizer() -> KeyNormalizer {
    KeyNormalizer::new(Platform::Other)
}

fn engine() -> ShortcutEngine {
    ShortcutEngine::with_config(DispatchConfig {
        sequence_timeout_ms: 500,
        platform: Platform::Other,
    })
}

proptest! {
    /// Any ordering and spelling of the same modifiers yields the same token
    #[test]
    fn prop_modifier_order_independent(
        modifiers in modifiers_strategy(),
        base in base_key_strategy(),
    ) {
        let spec: Vec<&str> = modifiers.iter().map(|(_, alias)| *alias).collect();
        let mut reversed = spec.clone();
        reversed.reverse();

        let forward = normalizer()
            .key(&format!("{}-{}", spec.join("-"), base).trim_start_matches('-'), false)
            .expect("valid spec");
        let backward = normalizer()
            .key(&format!("{}-{}", reversed.join("-"), base).trim_start_matches('-'), false)
            .expect("valid spec");
        prop_assert_eq!(&forward, &backward);

        // Prefixes always appear in m, c, s, a order
        let prefixes: Vec<&str> = forward.as_str().split('-').collect();
        let mods = &prefixes[..prefixes.len() - 1];
        let order = ["m", "c", "s", "a"];
        let positions: Vec<usize> = mods
            .iter()
            .map(|m| order.iter().position(|o| o == m).expect("known prefix"))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let mut expected: Vec<&str> = modifiers.iter().map(|(canonical, _)| *canonical).collect();
        expected.sort_by_key(|m| order.iter().position(|o| o == m));
        expected.dedup();
        prop_assert_eq!(mods.to_vec(), expected);
    }

    /// Normalizing an already normalized token changes nothing
    #[test]
    fn prop_normalization_idempotent(
        modifiers in modifiers_strategy(),
        base in base_key_strategy(),
    ) {
        let spec: Vec<&str> = modifiers.iter().map(|(_, alias)| *alias).collect();
        let spec = format!("{}-{}", spec.join("-"), base);
        let once = normalizer().key(spec.trim_start_matches('-'), false).expect("valid spec");
        let twice = normalizer().key(once.as_str(), false).expect("canonical spec");
        prop_assert_eq!(once, twice);
    }

    /// Registering and then unregistering any set of shortcuts, in any order,
    /// leaves only the root behind
    #[test]
    fn prop_register_unregister_round_trip(
        sequences in prop::collection::vec(sequence_strategy(), 1..12),
        seed in any::<u64>(),
    ) {
        let mut engine = engine();
        let mut handles = Vec::new();
        for sequence in &sequences {
            handles.push(
                engine
                    .register(sequence, ShortcutOptions::new(), || Ok(()))
                    .expect("valid sequence"),
            );
        }
        prop_assert!(engine.trie(false).node_count() > 1);

        // Deterministic shuffle driven by the seed
        let len = handles.len();
        handles.rotate_left((seed as usize) % len);
        if seed % 2 == 0 {
            handles.reverse();
        }
        for handle in handles {
            prop_assert!(engine.unregister(handle));
        }

        prop_assert_eq!(engine.trie(false).node_count(), 1);
        prop_assert_eq!(engine.handler_count(), 0);
    }

    /// A single-key shortcut fires exactly once and leaves the engine idle
    #[test]
    fn prop_single_key_fires_once(key in r"[a-z0-9]") {
        let mut engine = engine();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        engine
            .register(&key, ShortcutOptions::new(), move || {
                counter.set(counter.get() + 1);
                Ok(())
            })
            .expect("valid key");

        let outcome = engine.handle_key(&KeyEvent::new(key.clone()));
        prop_assert!(outcome.is_handled());
        prop_assert_eq!(count.get(), 1);
        prop_assert!(!engine.is_pending());
    }

    /// Among shortcuts on the same sequence, the last registered fires
    #[test]
    fn prop_last_registered_wins(sequence in sequence_strategy(), n in 1usize..6) {
        let mut engine = engine();
        let fired = Rc::new(Cell::new(usize::MAX));
        for i in 0..n {
            let fired = Rc::clone(&fired);
            engine
                .register(&sequence, ShortcutOptions::new(), move || {
                    fired.set(i);
                    Ok(())
                })
                .expect("valid sequence");
        }

        let start = Instant::now();
        let keys: Vec<&str> = sequence.split(' ').collect();
        let mut last = KeyOutcome::Unmatched;
        for (i, key) in keys.iter().enumerate() {
            last = engine.handle_key_at(&KeyEvent::new(*key), start + Duration::from_millis(i as u64 * 10));
        }
        prop_assert!(last.is_handled());
        prop_assert_eq!(fired.get(), n - 1);
    }

    /// Typing a registered sequence key by key within the timeout fires it;
    /// every proper prefix reports Pending
    #[test]
    fn prop_sequence_prefixes_pending(sequence in sequence_strategy()) {
        let mut engine = engine();
        engine
            .register(&sequence, ShortcutOptions::new(), || Ok(()))
            .expect("valid sequence");

        let start = Instant::now();
        let keys: Vec<&str> = sequence.split(' ').collect();
        for (i, key) in keys.iter().enumerate() {
            let outcome = engine.handle_key_at(&KeyEvent::new(*key), start + Duration::from_millis(i as u64 * 100));
            if i + 1 < keys.len() {
                prop_assert_eq!(outcome, KeyOutcome::Pending);
            } else {
                prop_assert!(outcome.is_handled());
            }
        }
    }
}
