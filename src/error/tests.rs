//! Tests for error types.

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let err = Error::config("interval must be positive");
        assert_eq!(
            err.to_string(),
            "configuration error: interval must be positive"
        );
    }

    #[test]
    fn test_directory_unavailable_display() {
        let err = WatchError::directory_unavailable(
            "/var/log/app",
            io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        );
        assert_eq!(
            err.to_string(),
            "directory '/var/log/app' is unavailable: no such directory"
        );
    }

    #[test]
    fn test_file_unavailable_display() {
        let err = WatchError::file_unavailable(
            "/var/log/app/a.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(
            err.to_string(),
            "file '/var/log/app/a.txt' is unavailable: permission denied"
        );
    }

    #[test]
    fn test_file_unavailable_keeps_source() {
        use std::error::Error as _;

        let err = WatchError::file_unavailable(
            "a.txt",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.source().unwrap().to_string(), "gone");
    }

    #[test]
    fn test_not_tracked_display() {
        let err = WatchError::NotTracked("b.txt".to_string());
        assert_eq!(err.to_string(), "file 'b.txt' is not tracked");
    }

    #[test]
    fn test_offset_regression_display() {
        let err = WatchError::OffsetRegression {
            name: "a.txt".to_string(),
            current: 10,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "offset for 'a.txt' cannot move from 10 back to 3"
        );
    }

    #[test]
    fn test_watch_error_conversion() {
        let watch_err = WatchError::NotTracked("a.txt".to_string());
        let err: Error = watch_err.into();
        assert!(matches!(err, Error::Watch(_)));
        assert_eq!(err.to_string(), "watcher error: file 'a.txt' is not tracked");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<u64> {
            Err(WatchError::NotTracked("inner.txt".to_string()).into())
        }

        fn outer() -> Result<u64> {
            let offset = inner()?;
            Ok(offset + 1)
        }

        let result = outer();
        assert!(matches!(
            result,
            Err(Error::Watch(WatchError::NotTracked(ref name))) if name == "inner.txt"
        ));
    }
}
