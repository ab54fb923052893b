// ABOUTME: Integration tests for manifest generation and writing.
// ABOUTME: Includes property tests over depot slot to depot ID mapping.

use depotpush::diagnostics::{Diagnostics, WarningKind};
use depotpush::manifest::{
    GenerationError, MANIFEST_FILENAME, ManifestRequest, default_exclusions, generate,
    write_manifest,
};
use depotpush::types::{AppId, DepotSlot, DepotSlots, MAX_DEPOT_SLOTS};
use proptest::prelude::*;
use std::path::Path;

fn slots_from(paths: &[(u32, &str)]) -> DepotSlots {
    paths.iter().fold(DepotSlots::new(), |slots, (n, path)| {
        slots.with(DepotSlot::new(*n).unwrap(), *path)
    })
}

fn request<'a>(app_id: u32, slots: &'a DepotSlots, exclusions: &'a [String]) -> ManifestRequest<'a> {
    ManifestRequest {
        app_id: AppId::new(app_id),
        content_root: ".",
        description: None,
        release_branch: None,
        slots,
        exclusions,
    }
}

mod mapping {
    use super::*;

    proptest! {
        /// Test: depot IDs are app ID plus slot, in ascending slot order.
        #[test]
        fn depot_ids_follow_slots(
            app_id in 1u32..4_000_000_000,
            chosen in prop::collection::btree_set(1u32..=MAX_DEPOT_SLOTS as u32, 1..=MAX_DEPOT_SLOTS as usize),
        ) {
            let mut slots = DepotSlots::new();
            for n in &chosen {
                slots.set(DepotSlot::new(*n).unwrap(), format!("content/{n}"));
            }
            let exclusions = default_exclusions();

            let manifest = generate(&request(app_id, &slots, &exclusions), None, &mut Diagnostics::default()).unwrap();

            let ids: Vec<u32> = manifest.depot_ids().iter().map(|id| id.get()).collect();
            let expected: Vec<u32> = chosen.iter().map(|n| app_id + n).collect();
            prop_assert_eq!(ids, expected);
        }

        /// Test: rendering is a pure function of the request.
        #[test]
        fn rendering_is_deterministic(
            app_id in 1u32..1_000_000,
            desc in "[a-zA-Z0-9 ._-]{0,24}",
        ) {
            let slots = slots_from(&[(1, "linux"), (3, "mac")]);
            let exclusions = default_exclusions();
            let mut req = request(app_id, &slots, &exclusions);
            req.description = Some(desc.as_str());

            let first = generate(&req, None, &mut Diagnostics::default()).unwrap();
            let second = generate(&req, None, &mut Diagnostics::default()).unwrap();
            prop_assert_eq!(first.render(), second.render());
            for (a, b) in first.depots.iter().zip(second.depots.iter()) {
                prop_assert_eq!(a.render(), b.render());
            }
        }
    }

    /// Test: an app ID near the top of the range overflows instead of wrapping.
    #[test]
    fn overflowing_depot_id_is_an_error() {
        let slots = slots_from(&[(2, "linux")]);
        let exclusions = default_exclusions();
        let err = generate(
            &request(u32::MAX - 1, &slots, &exclusions),
            None,
            &mut Diagnostics::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::DepotIdOverflow { slot: 2, .. }));
    }
}

mod existence {
    use super::*;

    /// Test: missing content directories are skipped with a warning each.
    #[test]
    fn missing_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("linux")).unwrap();
        let slots = slots_from(&[(1, "linux"), (2, "windows")]);
        let exclusions = default_exclusions();
        let mut diag = Diagnostics::default();

        let exists = |p: &Path| dir.path().join(p).exists();
        let manifest = generate(&request(480, &slots, &exclusions), Some(&exists), &mut diag).unwrap();

        assert_eq!(manifest.depot_ids().len(), 1);
        assert_eq!(manifest.depot_ids()[0].get(), 481);
        let skipped: Vec<_> = diag.of_kind(WarningKind::DepotSkipped).collect();
        assert_eq!(skipped.len(), 1);
        assert!(skipped[0].message.contains("482"));
    }

    /// Test: when every path is missing there is nothing to upload.
    #[test]
    fn all_missing_is_no_depots() {
        let slots = slots_from(&[(1, "nowhere")]);
        let exclusions = default_exclusions();
        let never = |_: &Path| false;

        let err = generate(
            &request(480, &slots, &exclusions),
            Some(&never),
            &mut Diagnostics::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::NoDepots));
    }
}

mod writing {
    use super::*;

    /// Test: written files match the rendered text and reference each other.
    #[tokio::test]
    async fn manifest_references_written_depot_files() {
        let dir = tempfile::tempdir().unwrap();
        let slots = slots_from(&[(1, "linux"), (9, "extras")]);
        let exclusions = default_exclusions();
        let mut req = request(480, &slots, &exclusions);
        req.release_branch = Some("beta");

        let manifest = generate(&req, None, &mut Diagnostics::default()).unwrap();
        let artifact = write_manifest(&manifest, dir.path()).await.unwrap();

        assert_eq!(artifact.manifest_path, dir.path().join(MANIFEST_FILENAME));
        assert_eq!(
            artifact.depot_paths,
            vec![dir.path().join("depot481.vdf"), dir.path().join("depot489.vdf")]
        );

        let text = std::fs::read_to_string(&artifact.manifest_path).unwrap();
        assert_eq!(text, manifest.render());
        assert!(text.contains("\"481\" \"depot481.vdf\""));
        assert!(text.contains("\"489\" \"depot489.vdf\""));
        assert!(text.contains("\"setlive\" \"beta\""));

        let depot = std::fs::read_to_string(&artifact.depot_paths[1]).unwrap();
        assert!(depot.contains("\"LocalPath\" \"./extras/*\""));
        assert!(depot.contains("\"FileExclusion\" \"*.pdb\""));
        assert_eq!(depot.matches("\"FileMapping\"").count(), 1);
        assert_eq!(depot.matches("\"FileExclusion\"").count(), 3);
    }
}
