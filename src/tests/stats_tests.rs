#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::stats::{ScanStats, StatRecorder};

    #[test]
    fn test_finalize_captures_counter_values() {
        let recorder = StatRecorder::new(4);
        recorder.record_scanned_directory();
        recorder.record_scanned_directory();
        recorder.record_scanned_file();
        recorder.record_ignored_directory();
        recorder.record_ignored_file();

        let stats = recorder.finalize();
        assert_eq!(stats.scanned_directories, 2);
        assert_eq!(stats.scanned_files, 1);
        assert_eq!(stats.ignored_directories, 1);
        assert_eq!(stats.ignored_files, 1);
        assert_eq!(stats.max_concurrency, 4);
    }

    #[test]
    fn test_concurrent_increments_are_exact() {
        let recorder = Arc::new(StatRecorder::new(8));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let recorder = recorder.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    recorder.record_scanned_file();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(recorder.finalize().scanned_files, 8000);
    }

    #[test]
    fn test_summary_mentions_ignored_entries_only_when_present() {
        let stats = ScanStats {
            scanned_directories: 4,
            scanned_files: 10,
            ignored_directories: 0,
            ignored_files: 0,
            duration_ms: 20,
            max_concurrency: 4,
        };
        let text = stats.summary();
        assert!(text.contains("scanned 4 directories and 10 files"));
        assert!(text.contains("took 20 ms"));
        assert!(text.contains("ms per directory"));
        assert!(!text.contains("ignored"));

        let with_ignored = ScanStats { ignored_directories: 1, ignored_files: 2, ..stats };
        assert!(with_ignored.summary().contains("ignored 1 directories and 2 files"));
    }

    #[test]
    fn test_summary_handles_empty_scan() {
        let stats = ScanStats::default();
        let text = stats.summary();
        assert!(text.contains("scanned 0 directories and 0 files"));
        // No per-entry rates when nothing was visited.
        assert!(!text.contains("per directory"));
    }
}
