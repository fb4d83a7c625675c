use std::path::Path;

use crate::error::SweepError;

/// Reads a line-oriented text file.
///
/// Trailing whitespace (including the `\r` of CRLF files) is stripped from every line
/// and blank lines are dropped, so a final newline never produces an empty entry.
pub fn read_lines(path: &Path) -> Result<Vec<String>, SweepError> {
    Ok(split_lines(&read_text(path)?))
}

/// Whole file as UTF-8; any I/O failure becomes [`SweepError::InvalidInput`] naming `path`.
pub fn read_text(path: &Path) -> Result<String, SweepError> {
    std::fs::read_to_string(path).map_err(|e| SweepError::InvalidInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn split_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim_start().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn trailing_newline_does_not_add_a_line() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn crlf_is_normalized() {
        assert_eq!(split_lines("www\r\nmail\r\n"), split_lines("www\nmail\n"));
    }

    #[test]
    fn missing_file_is_invalid_input() {
        let err = read_lines(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, SweepError::InvalidInput { .. }));
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "www  \r\nmail\r\n\r\n").unwrap();
        assert_eq!(read_lines(file.path()).unwrap(), vec!["www", "mail"]);
    }

    #[test]
    fn raw_text_keeps_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a\n\nb\n").unwrap();
        assert_eq!(read_text(file.path()).unwrap(), "a\n\nb\n");
        assert!(matches!(
            read_text(Path::new("/definitely/not/here.txt")),
            Err(SweepError::InvalidInput { .. })
        ));
    }
}
