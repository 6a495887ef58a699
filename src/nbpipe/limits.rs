//! Per-process resource limits needed before a long conversion batch.
//!
//! Each notebook kernel holds a handful of descriptors, and macOS ships with a soft
//! open-file limit of 256, which a large batch exhausts. Other platforms start high enough,
//! so there the call does nothing.

use crate::error::Result;

/// Soft open-file limit requested before converting.
pub const OPEN_FILE_TARGET: u64 = 1024;

/// Raises the soft open-file limit to `target`, capped at the hard limit. Never lowers it.
#[cfg(target_os = "macos")]
pub fn raise_open_file_limit(target: u64) -> Result<()> {
    use std::mem::MaybeUninit;
    use tracing::debug;

    let mut current = MaybeUninit::<libc::rlimit>::uninit();
    // Safety: getrlimit only writes into the struct we hand it.
    let ret = unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, current.as_mut_ptr()) };
    if ret != 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    let current = unsafe { current.assume_init() };

    let wanted = (target as libc::rlim_t).min(current.rlim_max);
    if wanted <= current.rlim_cur {
        return Ok(());
    }

    let raised = libc::rlimit {
        rlim_cur: wanted,
        rlim_max: current.rlim_max,
    };
    // Safety: the struct is fully initialised and outlives the call.
    let ret = unsafe { libc::setrlimit(libc::RLIMIT_NOFILE, &raised) };
    if ret != 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    debug!(
        "raised open file limit from {} to {}",
        current.rlim_cur, wanted
    );
    Ok(())
}

#[cfg(not(target_os = "macos"))]
pub fn raise_open_file_limit(_target: u64) -> Result<()> {
    Ok(())
}
