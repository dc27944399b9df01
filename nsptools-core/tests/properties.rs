//! Property tests for the naming bijection and split/combine round trips.

use proptest::prelude::*;

mod naming_properties {
    use super::*;
    use nsptools_core::naming::{format_part_name, parse_index};

    proptest! {
        /// Every name the splitter writes for a .nsp/.xci source parses back to its index
        #[test]
        fn format_then_parse_recovers_index(
            base in "[A-Za-z0-9 ._\\-\\[\\]]{0,40}",
            ext in prop::sample::select(vec![".nsp", ".xci", ".NSP", ".Xci"]),
            index in any::<u64>(),
        ) {
            let name = format_part_name(&base, ext, index);
            prop_assert_eq!(parse_index(&name).unwrap(), index);
        }

        /// Bare two-digit names parse to their numeric value
        #[test]
        fn bare_names_parse(index in 0u64..100) {
            let name = format!("{index:02}");
            prop_assert_eq!(parse_index(&name).unwrap(), index);
        }
    }
}

mod round_trip_properties {
    use super::*;
    use nsptools_core::{CombineOptions, Combiner, SplitOptions, Splitter};
    use std::fs;
    use tempfile::TempDir;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// combine(split(F)) == F, with every part but the last exactly part_size long
        #[test]
        fn combine_inverts_split(
            part_size in 1u64..512,
            extra in 1u64..2048,
            buffer_size in 1usize..700,
            seed in any::<u8>(),
        ) {
            let len = part_size + extra;
            let data: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(seed | 1)).collect();
            let tmp = TempDir::new().unwrap();
            let src = tmp.path().join("title.nsp");
            fs::write(&src, &data).unwrap();

            let opts = SplitOptions {
                part_size,
                min_source_size: part_size,
                buffer_size,
                ..Default::default()
            };
            let report = Splitter::new(&src, opts).unwrap().split().unwrap();

            let expected_parts = len.div_ceil(part_size);
            prop_assert_eq!(report.parts.len() as u64, expected_parts);
            let (last, full) = report.parts.split_last().unwrap();
            prop_assert!(full.iter().all(|p| p.len == part_size));
            prop_assert!(last.len >= 1 && last.len <= part_size);

            let out = Combiner::new(&report.output_dir, CombineOptions { buffer_size, ..Default::default() })
                .unwrap()
                .combine()
                .unwrap();
            prop_assert_eq!(fs::read(out.output).unwrap(), data);
        }
    }
}
