#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::exclude::{ExclusionGate, ExclusionPolicy, GlobExclusionPolicy, NoExclusions};
    use crate::types::ScanOptions;

    struct CountingPolicy {
        calls: Arc<AtomicUsize>,
        answer: bool,
    }

    #[async_trait]
    impl ExclusionPolicy for CountingPolicy {
        async fn is_excluded(&self, _path: &Path, _skip_queue_check: bool) -> anyhow::Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }
    }

    struct FailingPolicy;

    #[async_trait]
    impl ExclusionPolicy for FailingPolicy {
        async fn is_excluded(&self, _path: &Path, _skip_queue_check: bool) -> anyhow::Result<bool> {
            Err(anyhow::anyhow!("lookup failed"))
        }
    }

    struct StallingPolicy;

    #[async_trait]
    impl ExclusionPolicy for StallingPolicy {
        async fn is_excluded(&self, _path: &Path, _skip_queue_check: bool) -> anyhow::Result<bool> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_glob_policy_matches_patterns() {
        let policy = GlobExclusionPolicy::new(&[
            "**/Sample".to_string(),
            "**/Sample/**".to_string(),
            "**/*.m3u".to_string(),
        ])
        .unwrap();

        assert!(policy.is_excluded(Path::new("/share/Release/Sample"), false).await.unwrap());
        assert!(policy
            .is_excluded(Path::new("/share/Release/Sample/clip.mkv"), false)
            .await
            .unwrap());
        assert!(policy.is_excluded(Path::new("/share/Release/playlist.m3u"), false).await.unwrap());
        assert!(!policy.is_excluded(Path::new("/share/Release/track.flac"), false).await.unwrap());
    }

    #[tokio::test]
    async fn test_glob_policy_without_patterns_excludes_nothing() {
        let policy = GlobExclusionPolicy::new(&[]).unwrap();
        assert!(!policy.is_excluded(Path::new("/anything"), false).await.unwrap());
    }

    #[tokio::test]
    async fn test_glob_policy_skips_blank_patterns() {
        let policy =
            GlobExclusionPolicy::new(&["   ".to_string(), "**/*.m3u".to_string()]).unwrap();
        assert!(policy.is_excluded(Path::new("/a/list.m3u"), false).await.unwrap());
    }

    #[tokio::test]
    async fn test_glob_policy_rejects_invalid_patterns() {
        assert!(GlobExclusionPolicy::new(&["a[".to_string()]).is_err());
    }

    #[tokio::test]
    async fn test_disabled_gate_answers_without_policy_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let options = ScanOptions { check_excluded: false, ..ScanOptions::default() };
        let gate = ExclusionGate::new(
            Arc::new(CountingPolicy { calls: calls.clone(), answer: true }),
            &options,
        );

        assert!(!gate.check(Path::new("/anything")).await);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_enabled_gate_forwards_the_policy_answer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = ExclusionGate::new(
            Arc::new(CountingPolicy { calls: calls.clone(), answer: true }),
            &ScanOptions::default(),
        );

        assert!(gate.check(Path::new("/excluded")).await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_policy_failure_resolves_to_excluded() {
        let gate = ExclusionGate::new(Arc::new(FailingPolicy), &ScanOptions::default());
        assert!(gate.check(Path::new("/whatever")).await);
    }

    #[tokio::test]
    async fn test_policy_timeout_resolves_to_excluded() {
        let options = ScanOptions { policy_timeout_ms: 20, ..ScanOptions::default() };
        let gate = ExclusionGate::new(Arc::new(StallingPolicy), &options);
        assert!(gate.check(Path::new("/slow")).await);
    }

    #[tokio::test]
    async fn test_default_disabled_gate_excludes_nothing() {
        let gate = ExclusionGate::disabled();
        assert!(!gate.check(Path::new("/anything")).await);
    }

    #[tokio::test]
    async fn test_no_exclusions_policy_always_allows() {
        assert!(!NoExclusions.is_excluded(Path::new("/p"), true).await.unwrap());
    }
}
