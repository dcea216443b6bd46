//! Bulk cache behaviour against a recording fetcher double: resume,
//! failure omission, fail-fast and forced refetch.

use std::cell::RefCell;
use std::path::Path;

use fafbseg_core::SegmentId;
use fafbseg_fetch::{
    fetch_all, ArtifactFetcher, CacheError, CacheOptions, FetchError, MeshFormat, SetupError,
};

const A: SegmentId = SegmentId::new(720575940621039145);
const B: SegmentId = SegmentId::new(720575940626877799);
const C: SegmentId = SegmentId::new(720575940613583001);

/// Fetcher double writing `<id>` into the file and recording every call.
/// Ids in `failing` fail without touching disk.
struct RecordingFetcher {
    calls: RefCell<Vec<SegmentId>>,
    failing: Vec<SegmentId>,
}

impl RecordingFetcher {
    fn new(failing: &[SegmentId]) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            failing: failing.to_vec(),
        }
    }

    fn calls(&self) -> Vec<SegmentId> {
        self.calls.borrow().clone()
    }
}

impl ArtifactFetcher for RecordingFetcher {
    fn fetch(
        &self,
        segment: SegmentId,
        _format: MeshFormat,
        dest: &Path,
    ) -> Result<(), FetchError> {
        self.calls.borrow_mut().push(segment);
        if self.failing.contains(&segment) {
            return Err(FetchError::Status {
                segment,
                url: format!("http://mesh.test/meshes/{segment}.ply"),
                status: 404,
                body: "not found".into(),
            });
        }
        std::fs::write(dest, segment.to_string()).map_err(|source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        })
    }
}

#[test]
fn second_run_fetches_nothing_and_returns_same_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let opts = CacheOptions::in_dir(dir.path());
    let ids = [A, B, C];

    let first_fetcher = RecordingFetcher::new(&[]);
    let first = fetch_all(&ids, &opts, &first_fetcher).unwrap();
    assert_eq!(first_fetcher.calls(), vec![A, B, C]);

    let second_fetcher = RecordingFetcher::new(&[]);
    let second = fetch_all(&ids, &opts, &second_fetcher).unwrap();
    assert!(second_fetcher.calls().is_empty());
    assert_eq!(first, second);
}

#[test]
fn manifest_preserves_input_order_and_naming() {
    let dir = tempfile::tempdir().unwrap();
    let opts = CacheOptions {
        format: MeshFormat::Obj,
        ..CacheOptions::in_dir(dir.path())
    };
    let fetcher = RecordingFetcher::new(&[]);
    let manifest = fetch_all(&[C, A], &opts, &fetcher).unwrap();

    let ids: Vec<SegmentId> = manifest.entries().iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![C, A]);
    assert_eq!(
        manifest.get(C).unwrap(),
        dir.path().join("720575940613583001.obj")
    );
    assert_eq!(
        std::fs::read_to_string(manifest.get(A).unwrap()).unwrap(),
        A.to_string()
    );
}

#[test]
fn failed_fetch_is_omitted_and_loop_continues() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = RecordingFetcher::new(&[B]);
    let manifest = fetch_all(&[A, B, C], &CacheOptions::in_dir(dir.path()), &fetcher).unwrap();

    assert_eq!(fetcher.calls(), vec![A, B, C]);
    let ids: Vec<SegmentId> = manifest.entries().iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![A, C]);
    assert!(manifest.get(B).is_none());
    assert_eq!(manifest.failed(), &[B]);
    assert!(!dir.path().join(format!("{B}.ply")).exists());
}

#[test]
fn fail_fast_stops_at_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = RecordingFetcher::new(&[B]);
    let opts = CacheOptions {
        omit_failures: false,
        ..CacheOptions::in_dir(dir.path())
    };

    let err = fetch_all(&[A, B, C], &opts, &fetcher).unwrap_err();
    assert!(matches!(
        err,
        CacheError::Fetch {
            segment,
            source: FetchError::Status { status: 404, .. },
        } if segment == B
    ));
    assert_eq!(fetcher.calls(), vec![A, B]);
    // Already fetched artifacts stay on disk.
    assert!(dir.path().join(format!("{A}.ply")).exists());
}

#[test]
fn retry_after_fail_fast_only_fetches_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let strict = CacheOptions {
        omit_failures: false,
        ..CacheOptions::in_dir(dir.path())
    };
    let flaky = RecordingFetcher::new(&[B]);
    assert!(fetch_all(&[A, B, C], &strict, &flaky).is_err());

    let healthy = RecordingFetcher::new(&[]);
    let manifest = fetch_all(&[A, B, C], &strict, &healthy).unwrap();
    assert_eq!(healthy.calls(), vec![B, C]);
    assert_eq!(manifest.len(), 3);
}

#[test]
fn force_refetches_existing_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{A}.ply"));
    std::fs::write(&path, "stale").unwrap();

    let fetcher = RecordingFetcher::new(&[]);
    let opts = CacheOptions {
        force: true,
        ..CacheOptions::in_dir(dir.path())
    };
    fetch_all(&[A], &opts, &fetcher).unwrap();

    assert_eq!(fetcher.calls(), vec![A]);
    assert_eq!(std::fs::read_to_string(path).unwrap(), A.to_string());
}

#[test]
fn existing_file_counts_as_cached_even_if_truncated() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(format!("{A}.ply")), "").unwrap();

    let fetcher = RecordingFetcher::new(&[]);
    let manifest = fetch_all(&[A], &CacheOptions::in_dir(dir.path()), &fetcher).unwrap();
    assert!(fetcher.calls().is_empty());
    assert_eq!(manifest.len(), 1);
}

#[test]
fn missing_target_dir_is_created_recursively() {
    let tmp = tempfile::tempdir().unwrap();
    let target = tmp.path().join("cache").join("meshes");
    let fetcher = RecordingFetcher::new(&[]);
    let manifest = fetch_all(&[A], &CacheOptions::in_dir(&target), &fetcher).unwrap();
    assert!(target.is_dir());
    assert_eq!(manifest.dir(), target);
}

#[test]
fn unset_target_dir_creates_a_fresh_directory() {
    let fetcher = RecordingFetcher::new(&[]);
    let manifest = fetch_all(&[A], &CacheOptions::default(), &fetcher).unwrap();
    let dir = manifest.dir().to_path_buf();
    assert!(dir.is_dir());
    assert!(dir.join(format!("{A}.ply")).is_file());
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn uncreatable_directory_is_fatal_even_when_omitting_failures() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    let fetcher = RecordingFetcher::new(&[]);
    let err = fetch_all(&[A], &CacheOptions::in_dir(blocker.join("sub")), &fetcher).unwrap_err();
    assert!(matches!(err, CacheError::Setup(SetupError::CreateDir { .. })));
    assert!(fetcher.calls().is_empty());
}

#[test]
fn closure_fetcher_works_with_fetch_all() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = |segment: SegmentId, format: MeshFormat, dest: &Path| {
        std::fs::write(dest, format!("{segment}.{format}")).map_err(|source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        })
    };
    let opts = CacheOptions {
        format: MeshFormat::Swc,
        ..CacheOptions::in_dir(dir.path())
    };
    let manifest = fetch_all(&[A], &opts, &fetcher).unwrap();
    assert_eq!(
        std::fs::read_to_string(manifest.get(A).unwrap()).unwrap(),
        format!("{A}.swc")
    );
}
