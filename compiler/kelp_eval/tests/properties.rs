#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Property tests driven through the public [`Runtime`] API.

use kelp_eval::{silent_handler, EvalErrorKind, HostValue, Runtime, RuntimeConfig};
use proptest::prelude::*;

fn runtime() -> Runtime {
    Runtime::with_config(RuntimeConfig::default().with_print_handler(silent_handler())).unwrap()
}

fn eval(rt: &mut Runtime, source: &str) -> HostValue {
    let slot = rt
        .run_source(source)
        .unwrap_or_else(|err| panic!("`{source}` failed: {}", err.render(source)));
    rt.value(slot).unwrap()
}

/// Host values whose source form reads back to the same value.
///
/// Char arrays are generated as `Str` only, since that is how the stack
/// hands them back; reals stay finite so they survive the text round trip.
fn literal() -> impl Strategy<Value = HostValue> {
    let leaf = prop_oneof![
        Just(HostValue::Unit),
        any::<bool>().prop_map(HostValue::Bool),
        any::<char>().prop_map(HostValue::Char),
        any::<i64>().prop_map(HostValue::Int),
        any::<f64>()
            .prop_filter("finite", |r| r.is_finite())
            .prop_map(HostValue::Real),
        "\\PC{1,12}".prop_map(HostValue::Str),
        prop::collection::vec(any::<i64>().prop_map(HostValue::Int), 0..6)
            .prop_map(HostValue::Array),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(HostValue::Tuple)
    })
}

proptest! {
    #[test]
    fn source_form_reads_back(value in literal()) {
        let mut rt = runtime();
        let text = value.to_string();
        prop_assert_eq!(eval(&mut rt, &text), value.clone());

        let parsed = eval(&mut rt, &format!("(parse (to_string {text}))"));
        prop_assert_eq!(parsed, HostValue::Tuple(vec![HostValue::Bool(true), value]));
    }

    #[test]
    fn any_split_of_a_call_gives_the_same_result(
        args in prop::collection::vec(-1000_i64..1000, 4),
        split in 0_usize..=4,
    ) {
        let mut rt = runtime();
        rt.run_source("(bind f (func (a b c d) (+ a (* 2 (+ b (* 3 (+ c (* 5 d))))))))")
            .unwrap();

        let render = |xs: &[i64]| xs.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
        let whole = eval(&mut rt, &format!("(f {})", render(&args)));
        let (first, rest) = args.split_at(split);
        let curried = eval(&mut rt, &format!("((f {}) {})", render(first), render(rest)));
        prop_assert_eq!(curried, whole);
    }

    #[test]
    fn heterogeneous_arrays_are_rejected_without_leaking(
        ints in prop::collection::vec(any::<i64>(), 0..8),
        at in any::<prop::sample::Index>(),
    ) {
        let mut rt = runtime();
        let mut items: Vec<String> = ints.iter().map(ToString::to_string).collect();
        let at = at.index(items.len() + 1);
        items.insert(at, "true".to_owned());
        let source = format!("[{}]", items.join(" "));

        let top = rt.stack_top();
        let result = rt.run_source(&source);
        if ints.is_empty() {
            prop_assert!(result.is_ok());
        } else {
            match result {
                Err(kelp_eval::RunError::Eval(err)) => {
                    let is_heterogeneous = matches!(err.kind, EvalErrorKind::Heterogeneous { .. });
                    prop_assert!(is_heterogeneous);
                    prop_assert_eq!(rt.stack_top(), top);
                }
                other => prop_assert!(false, "unexpected result {:?}", other),
            }
        }
    }
}
