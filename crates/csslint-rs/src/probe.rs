//! File-system backed resource probe.

use camino::{Utf8Path, Utf8PathBuf};
use css_rules::FileProbe;

/// Resolves resource paths the way a static file server would: relative to
/// the stylesheet, or to the workspace root for paths starting with `/`.
#[derive(Debug, Clone)]
pub struct FsProbe {
    stylesheet_dir: Utf8PathBuf,
    root: Utf8PathBuf,
}

impl FsProbe {
    /// Creates a probe for the stylesheet at `stylesheet`.
    pub fn for_stylesheet(stylesheet: &Utf8Path, root: &Utf8Path) -> Self {
        let stylesheet_dir = stylesheet
            .parent()
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        Self {
            stylesheet_dir,
            root: root.to_path_buf(),
        }
    }

    /// The path a reference resolves to. Any number of leading slashes
    /// anchors the path at the root.
    pub fn resolve(&self, path: &str) -> Utf8PathBuf {
        if path.starts_with('/') {
            self.root.join(path.trim_start_matches('/'))
        } else {
            self.stylesheet_dir.join(path)
        }
    }
}

impl FileProbe for FsProbe {
    fn is_file(&self, path: &str) -> bool {
        let resolved = self.resolve(path);
        match std::fs::metadata(&resolved) {
            Ok(metadata) => metadata.is_file(),
            Err(error) => {
                tracing::trace!(path = %resolved, %error, "resource not found");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolution() {
        let probe = FsProbe::for_stylesheet(
            Utf8Path::new("/site/css/main.css"),
            Utf8Path::new("/site"),
        );
        assert_eq!(probe.resolve("img/a.png"), "/site/css/img/a.png");
        assert_eq!(probe.resolve("../img/a.png"), "/site/css/../img/a.png");
        assert_eq!(probe.resolve("/img/a.png"), "/site/img/a.png");
        assert_eq!(probe.resolve("//cdn.x.com/a.png"), "/site/cdn.x.com/a.png");
    }

    #[test]
    fn test_is_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        fs::create_dir_all(root.join("css/img")).unwrap();
        fs::create_dir_all(root.join("fonts")).unwrap();
        fs::write(root.join("css/img/a.png"), b"png").unwrap();
        fs::write(root.join("fonts/a.woff"), b"woff").unwrap();

        let probe = FsProbe::for_stylesheet(&root.join("css/main.css"), root);
        assert!(probe.is_file("img/a.png"));
        assert!(probe.is_file("../fonts/a.woff"));
        assert!(probe.is_file("/fonts/a.woff"));
        assert!(!probe.is_file("img/b.png"));
        // directories are not files
        assert!(!probe.is_file("img"));
    }
}
