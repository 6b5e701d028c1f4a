//! Property-based tests for push framing, failure classification and
//! dispatch order.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use siteprep_cli::application::services::provision::provision;
use siteprep_cli::domain::classify::IGNORED_FAILURE_MARKER;
use siteprep_cli::domain::transfer::{PUSH_FILE_MODE, decode_push, encode_push};
use siteprep_cli::domain::{FailureClass, Plan, Step, StepOutcome, classify_failure};
use siteprep_cli::infra::fs::LocalFs;

use crate::helpers::credentials;
use crate::mocks::{MockConnector, MockRunner, RecordingReporter, StaticAssets};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(future)
}

proptest! {
    /// Any content, including empty and NUL-laden, survives encode/decode.
    #[test]
    fn prop_push_record_round_trips(
        content in proptest::collection::vec(any::<u8>(), 0..4096),
        name in "[A-Za-z0-9._-]{1,32}",
    ) {
        let encoded = encode_push(&content, &name, PUSH_FILE_MODE).expect("encode");
        prop_assert_eq!(encoded.last(), Some(&0u8));
        let header_len = format!("C0644 {} {name}\n", content.len()).len();
        prop_assert_eq!(encoded.len(), header_len + content.len() + 1);

        let record = decode_push(&encoded).expect("decode");
        prop_assert_eq!(record.mode, PUSH_FILE_MODE);
        prop_assert_eq!(record.file_name, name);
        prop_assert_eq!(record.content, content);
    }

    /// A diagnostic is ignorable exactly when it carries the marker.
    #[test]
    fn prop_classifier_iff_marker(
        prefix in ".{0,40}",
        suffix in ".{0,40}",
        with_marker in any::<bool>(),
    ) {
        let diagnostic = if with_marker {
            format!("{prefix}{IGNORED_FAILURE_MARKER}{suffix}")
        } else {
            format!("{prefix}{suffix}")
        };
        let expected = if diagnostic.contains(IGNORED_FAILURE_MARKER) {
            FailureClass::Ignorable
        } else {
            FailureClass::Fatal
        };
        prop_assert_eq!(classify_failure(&diagnostic), expected);
    }

    /// Remote steps are dispatched strictly in plan order, one sub-session each.
    #[test]
    fn prop_dispatch_order_matches_plan(commands in proptest::collection::vec("[a-z]{1,8}( [a-z0-9]{1,8}){0,2}", 0..12)) {
        let plan: Plan = commands.iter().cloned().map(Step::RemoteCommand).collect();
        let connector = MockConnector::new();

        let report = block_on(provision(
            &connector,
            &LocalFs,
            &MockRunner::succeeding(),
            &StaticAssets,
            &RecordingReporter::default(),
            &credentials(),
            &plan,
        ));

        prop_assert!(report.is_completed());
        let indices: Vec<usize> = report.records.iter().map(|r| r.index).collect();
        prop_assert_eq!(indices, (0..commands.len()).collect::<Vec<_>>());
        prop_assert!(report.outcomes().all(|o| *o == StepOutcome::Success));
        prop_assert_eq!(connector.transcript().opened(), commands);
    }
}
