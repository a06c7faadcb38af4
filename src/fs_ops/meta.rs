//! Metadata preservation.
//! Copies timestamps (atime, mtime) and permissions from the source metadata onto a
//! freshly written destination. Best-effort: failures are logged, never returned.

use filetime::{set_file_times, FileTime};
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

/// Apply `src_meta`'s times and permissions to `dest`.
pub(super) fn preserve_metadata(dest: &Path, src_meta: &fs::Metadata) {
    let at = FileTime::from_last_access_time(src_meta);
    let mt = FileTime::from_last_modification_time(src_meta);
    match set_file_times(dest, at, mt) {
        Ok(()) => trace!(path = %dest.display(), "set atime/mtime on destination"),
        Err(e) => {
            warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination")
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = src_meta.permissions().mode() & 0o777;
        if let Err(e) = fs::set_permissions(dest, fs::Permissions::from_mode(mode)) {
            warn!(path = %dest.display(), mode = format!("{mode:o}"), error = %e, "failed to set permissions on destination");
        }
    }

    #[cfg(not(unix))]
    {
        if let Ok(meta) = fs::metadata(dest) {
            let mut perms = meta.permissions();
            perms.set_readonly(src_meta.permissions().readonly());
            if let Err(e) = fs::set_permissions(dest, perms) {
                warn!(path = %dest.display(), error = %e, "failed to set readonly attribute on destination");
            }
        }
    }
}
