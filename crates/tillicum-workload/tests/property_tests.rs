//! Property tests for result-record formatting.

use proptest::prelude::*;
use tillicum_workload::{format_scientific, WorkloadResult};

proptest! {
    #[test]
    fn scientific_output_parses_back_close_to_input(value in -1.0e300f64..1.0e300) {
        let rendered = format_scientific(value, 3);
        let parsed: f64 = rendered.parse().unwrap();
        let tolerance = value.abs() * 1e-3;
        prop_assert!((parsed - value).abs() <= tolerance, "{value} -> {rendered}");
    }
}

proptest! {
    #[test]
    fn scientific_exponent_is_signed_and_padded(value in prop::num::f64::NORMAL) {
        let rendered = format_scientific(value, 3);
        let (_, exponent) = rendered.split_once('e').unwrap();
        prop_assert!(exponent.starts_with('+') || exponent.starts_with('-'));
        prop_assert!(exponent.len() >= 3);
    }
}

proptest! {
    #[test]
    fn text_record_always_has_four_lines(
        index in any::<u32>(),
        parameter in 1e-6f64..1.0,
        elapsed in 0.0f64..1e5,
        checksum in 0.0f64..1e15,
    ) {
        let text = WorkloadResult::new(index, parameter, elapsed, checksum).render_text();
        let lines: Vec<&str> = text.lines().collect();
        prop_assert_eq!(lines.len(), 4);
        prop_assert_eq!(lines[0], format!("Task {index}"));
        prop_assert!(lines[2].starts_with("Time: "));
        prop_assert!(lines[3].starts_with("Checksum: "));
    }
}
