//! Filesystem operations used by the relocation engine.

mod atomic;
mod backup;
mod copy;
mod helpers;
mod io_copy;
mod meta;
mod search;
mod space;
mod transfer;
mod util;

pub use atomic::{try_atomic_move, write_atomic};
pub use backup::snapshot;
pub use copy::{safe_copy_and_rename, safe_copy_with_metadata};
pub use helpers::io_error_with_help;
pub use search::{is_vcs_dir, SourceIndex, VCS_DIRS};
pub use space::{ensure_space_for_copy, format_bytes};
pub use transfer::{copy_file, move_file, TransferKind};
pub use util::TEMP_PREFIX;
