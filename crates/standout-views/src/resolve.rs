//! Script path resolution.
//!
//! A script is the logical name of a view, such as `"index"`,
//! `"users/show"` or `"report.txt"`. Resolution turns it into a file path:
//!
//! 1. A script that already names an existing file is returned unchanged.
//!    This lets callers pass full paths.
//! 2. Otherwise each view directory is probed in order and the first
//!    existing candidate wins. Earlier directories shadow later ones.
//! 3. A script with an extension is used as the file name as is. A script
//!    without one gets the default extension appended, with the leading dot
//!    added if it is missing.
//!
//! ```text
//! script "users/show", dirs [app/views, shared/views], ext "html"
//!   → app/views/users/show.html     (probed first)
//!   → shared/views/users/show.html  (probed only if the first is missing)
//! ```
//!
//! Candidate generation is pure ([`candidates`]); only [`resolve`] touches
//! the [`Filesystem`].

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::ViewError;
use crate::fs::Filesystem;

/// Returns the script's own extension, without the dot.
///
/// Dotfiles such as `.hidden` have no extension.
pub fn script_extension(script: &str) -> Option<&str> {
    Path::new(script).extension().and_then(|ext| ext.to_str())
}

/// Normalizes an extension to carry exactly one leading dot.
///
/// Returns `None` for an empty extension.
pub fn normalize_ext(ext: &str) -> Option<String> {
    let bare = ext.trim_start_matches('.');
    if bare.is_empty() {
        None
    } else {
        Some(format!(".{}", bare))
    }
}

/// Builds the candidate paths for `script`, one per directory, in order.
pub fn candidates<P: AsRef<Path>>(script: &str, dirs: &[P], default_ext: &str) -> Vec<PathBuf> {
    let file_name: Cow<'_, str> = match (script_extension(script), normalize_ext(default_ext)) {
        (Some(_), _) | (None, None) => Cow::Borrowed(script),
        (None, Some(ext)) => Cow::Owned(format!("{}{}", script, ext)),
    };

    dirs.iter()
        .map(|dir| dir.as_ref().join(file_name.as_ref()))
        .collect()
}

/// Resolves `script` to the path of an existing file.
///
/// # Errors
///
/// Returns [`ViewError::Unresolved`] when the script is not a file itself
/// and no candidate exists, which includes an empty `dirs`.
pub async fn resolve<P>(
    fs: &dyn Filesystem,
    script: &str,
    dirs: &[P],
    default_ext: &str,
) -> Result<PathBuf, ViewError>
where
    P: AsRef<Path> + Sync,
{
    let direct = Path::new(script);
    if fs.is_file(direct).await {
        debug!(script, "script is an existing path, skipping directory search");
        return Ok(direct.to_path_buf());
    }

    let searched = candidates(script, dirs, default_ext);
    for candidate in &searched {
        trace!(script, path = %candidate.display(), "probing view candidate");
        if fs.is_file(candidate).await {
            debug!(script, path = %candidate.display(), "resolved view");
            return Ok(candidate.clone());
        }
    }

    debug!(script, candidates = searched.len(), "view not found");
    Err(ViewError::Unresolved {
        script: script.to_string(),
        searched,
    })
}
