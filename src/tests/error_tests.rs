#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::error::{validation, ScanError};
    use crate::types::ScanTarget;

    #[test]
    fn test_empty_path_is_invalid() {
        let result = validation::validate_path(Path::new(""));
        assert!(matches!(result, Err(ScanError::InvalidInput(ref msg)) if msg.contains("empty")));
    }

    #[test]
    fn test_nul_byte_path_is_invalid() {
        let result = validation::validate_path(Path::new("abc\0def"));
        assert!(result.is_err());
    }

    #[test]
    fn test_normal_paths_pass_validation() {
        assert!(validation::validate_path(Path::new("/share/release")).is_ok());
        assert!(validation::validate_path(Path::new("relative/path")).is_ok());
    }

    #[test]
    fn test_target_list_fails_on_first_bad_entry() {
        let targets = vec![ScanTarget::new("/ok"), ScanTarget::new("")];
        assert!(validation::validate_targets(&targets).is_err());

        let targets = vec![ScanTarget::new("/ok"), ScanTarget::shallow("/also/ok")];
        assert!(validation::validate_targets(&targets).is_ok());
    }

    #[test]
    fn test_error_display_is_descriptive() {
        let err = ScanError::InvalidInput("path cannot be empty".to_string());
        assert_eq!(err.to_string(), "invalid input: path cannot be empty");
    }
}
