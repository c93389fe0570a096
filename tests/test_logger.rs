//! Tests for the running-average logger
//!
//! This file tests the logger module including:
//! - Mean computation and 6-decimal formatting
//! - Series ordering by first registration
//! - Clearing state on flush
//! - Custom delimiters
//! - Free-form lines and file truncation

use approx::assert_relative_eq;
use std::fs;
use tempfile::tempdir;
use train_utils::logger::{mean, RunningLogger};

// ============================================================================
// Flush Tests
// ============================================================================

mod flush_tests {
    use super::*;

    #[test]
    fn test_mean_of_series() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.log");
        let mut logger = RunningLogger::create(&path).unwrap();

        for v in [1.0, 2.0, 3.0] {
            logger.append("loss", v);
        }
        let msg = logger.flush().unwrap();

        assert_eq!(msg, "loss 2.000000");
        assert_eq!(fs::read_to_string(&path).unwrap(), "loss 2.000000\n");
    }

    #[test]
    fn test_flush_clears_series() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.log");
        let mut logger = RunningLogger::create(&path).unwrap();

        logger.append("loss", 1.0);
        logger.flush().unwrap();
        assert!(logger.is_empty());

        let msg = logger.flush().unwrap();
        assert_eq!(msg, "");
        assert_eq!(fs::read_to_string(&path).unwrap(), "loss 1.000000\n\n");
    }

    #[test]
    fn test_flush_with_no_series_writes_empty_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.log");
        let mut logger = RunningLogger::create(&path).unwrap();

        logger.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "\n");
    }

    #[test]
    fn test_means_are_per_window() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.log");
        let mut logger = RunningLogger::create(&path).unwrap();

        logger.append("loss", 4.0);
        logger.append("loss", 2.0);
        logger.flush().unwrap();
        logger.append("loss", 0.5);
        logger.flush().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "loss 3.000000\nloss 0.500000\n"
        );
    }

    #[test]
    fn test_six_decimal_rounding() {
        let dir = tempdir().unwrap();
        let mut logger = RunningLogger::create(dir.path().join("train.log")).unwrap();

        logger.append("acc", 1.0);
        logger.append("acc", 0.0);
        logger.append("acc", 0.0);

        assert_eq!(logger.flush().unwrap(), "acc 0.333333");
    }

    #[test]
    fn test_diverged_series_written_as_nan() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.log");
        let mut logger = RunningLogger::create(&path).unwrap();

        logger.append("loss", 1.0);
        logger.append("loss", f64::NAN);
        logger.append("acc", f64::INFINITY);
        let msg = logger.flush().unwrap();

        assert_eq!(msg, "loss nan\nacc inf");
        assert_eq!(fs::read_to_string(&path).unwrap(), "loss nan\nacc inf\n");
    }

    #[test]
    fn test_custom_delimiter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.log");
        let mut logger = RunningLogger::create(&path).unwrap();

        logger.append("loss", 0.5);
        logger.append("acc", 0.75);
        let msg = logger.flush_with(", ").unwrap();

        assert_eq!(msg, "loss 0.500000, acc 0.750000");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "loss 0.500000, acc 0.750000\n"
        );
    }
}

// ============================================================================
// Ordering Tests
// ============================================================================

mod ordering_tests {
    use super::*;

    #[test]
    fn test_first_seen_order_preserved() {
        let dir = tempdir().unwrap();
        let mut logger = RunningLogger::create(dir.path().join("train.log")).unwrap();

        logger.append("b", 1.0);
        logger.append("a", 2.0);
        logger.append("b", 3.0);

        assert_eq!(logger.series_names(), vec!["b", "a"]);
        assert_eq!(logger.flush().unwrap(), "b 2.000000\na 2.000000");
    }

    #[test]
    fn test_registered_order_wins_over_append_order() {
        let dir = tempdir().unwrap();
        let mut logger = RunningLogger::create(dir.path().join("train.log")).unwrap();

        logger.register_series("loss");
        logger.register_series("acc");
        logger.append("acc", 0.9);
        logger.append("loss", 0.1);

        assert_eq!(logger.flush().unwrap(), "loss 0.100000\nacc 0.900000");
    }

    #[test]
    fn test_order_resets_after_flush() {
        let dir = tempdir().unwrap();
        let mut logger = RunningLogger::create(dir.path().join("train.log")).unwrap();

        logger.append("a", 1.0);
        logger.append("b", 1.0);
        logger.flush().unwrap();

        logger.append("b", 2.0);
        logger.append("a", 2.0);
        assert_eq!(logger.flush().unwrap(), "b 2.000000\na 2.000000");
    }
}

// ============================================================================
// File Handling Tests
// ============================================================================

mod file_tests {
    use super::*;

    #[test]
    fn test_write_line_bypasses_aggregation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.log");
        let mut logger = RunningLogger::create(&path).unwrap();

        logger.append("loss", 1.5);
        logger.write_line("epoch 1").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "epoch 1\n");
        assert_eq!(logger.pending("loss"), Some(&[1.5][..]));

        logger.flush().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "epoch 1\nloss 1.500000\n"
        );
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.log");
        fs::write(&path, "stale contents from a previous run\n").unwrap();

        let logger = RunningLogger::create(&path).unwrap();

        assert_eq!(logger.path(), path.as_path());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_create_at_directory_fails() {
        let dir = tempdir().unwrap();
        assert!(RunningLogger::create(dir.path()).is_err());
    }
}

// ============================================================================
// Mean Helper Tests
// ============================================================================

mod mean_tests {
    use super::*;

    #[test]
    fn test_mean_values() {
        assert_relative_eq!(mean(&[0.1, 0.2, 0.3]), 0.2, epsilon = 1e-12);
        assert_relative_eq!(mean(&[-1.0, 1.0]), 0.0);
        assert_relative_eq!(mean(&[42.0]), 42.0);
    }

    #[test]
    fn test_mean_empty_is_nan() {
        assert!(mean(&[]).is_nan());
    }
}
