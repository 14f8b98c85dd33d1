//! Directory listing under the file root.
//!
//! ## Summary
//! Only immediate subdirectories of the root ("top-level directories") may be
//! listed. The set of top-level directories is read from disk on every call,
//! so directories added or removed while the server runs are picked up without
//! a restart.

use std::collections::BTreeSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use coursegate_core::config::FilesConfig;

use crate::error::{ServiceError, ServiceResult};

/// A downloadable file and the URL the frontend fetches it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub url: String,
}

/// Parsed `/api/file` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub dir: String,
    /// Descend into the course subfolder of `dir`.
    pub course: bool,
}

#[derive(Debug, Clone)]
pub struct FileLibrary {
    root: PathBuf,
    url_prefix: String,
    course_dir: String,
    course_in_url: bool,
}

impl FileLibrary {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
            course_dir: "course".to_string(),
            course_in_url: false,
        }
    }

    #[must_use]
    pub fn from_config(config: &FilesConfig) -> Self {
        Self::new(config.root.clone(), config.url_prefix.clone())
            .with_course_dir(config.course_dir.clone())
            .with_course_in_url(config.course_in_url)
    }

    #[must_use]
    pub fn with_course_dir(mut self, course_dir: impl Into<String>) -> Self {
        self.course_dir = course_dir.into();
        self
    }

    /// Include the course segment in returned URLs. Off by default: listings
    /// made in course mode still point at `<prefix>/<dir>/<name>`.
    #[must_use]
    pub fn with_course_in_url(mut self, course_in_url: bool) -> Self {
        self.course_in_url = course_in_url;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// ## Summary
    /// Names of the immediate subdirectories of the root.
    ///
    /// ## Errors
    /// Returns the I/O error if the root cannot be read.
    pub async fn top_level_dirs(&self) -> io::Result<BTreeSet<String>> {
        let mut dirs = BTreeSet::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                dirs.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(dirs)
    }

    /// ## Summary
    /// Lists the files (not subdirectories) of a top-level directory, or of
    /// its course subfolder, sorted by name.
    ///
    /// ## Errors
    /// - `RootUnavailable` if the root itself cannot be read.
    /// - `InvalidParams` if the requested path cannot be listed.
    /// - `AccessDenied` if `dir` is not a current top-level directory, even
    ///   when the path exists.
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn list(&self, query: &ListingQuery) -> ServiceResult<Vec<FileEntry>> {
        let top_level = self
            .top_level_dirs()
            .await
            .map_err(ServiceError::RootUnavailable)?;

        let mut target = join_under_root(&self.root, &query.dir);
        if query.course {
            target.push(&self.course_dir);
        }

        let names = match file_names(&target).await {
            Ok(names) => names,
            Err(e) => {
                tracing::debug!(error = %e, target = %target.display(), "Listing target unreadable");
                return Err(ServiceError::InvalidParams);
            }
        };

        if !top_level.contains(&query.dir) {
            tracing::warn!(dir = %query.dir, "Listing outside top-level directories rejected");
            return Err(ServiceError::AccessDenied(query.dir.clone()));
        }

        Ok(names
            .into_iter()
            .map(|name| FileEntry {
                url: self.download_url(&query.dir, query.course, &name),
                name,
            })
            .collect())
    }

    fn download_url(&self, dir: &str, course: bool, name: &str) -> String {
        let course_segment = if course && self.course_in_url {
            self.course_dir.as_str()
        } else {
            ""
        };

        [
            self.url_prefix.trim_matches('/'),
            dir,
            course_segment,
            name,
        ]
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
    }
}

/// Sorted names of the non-directory entries of `dir`.
async fn file_names(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// ## Summary
/// Joins `relative` onto `root` lexically without ever leaving `root`.
///
/// `..` only removes segments pushed by `relative` itself; root and prefix
/// components are dropped, so `/etc` resolves to `<root>/etc`.
#[must_use]
pub fn join_under_root(root: &Path, relative: &str) -> PathBuf {
    let mut segments: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(segment) => segments.push(segment),
            Component::ParentDir => {
                segments.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    path
}
