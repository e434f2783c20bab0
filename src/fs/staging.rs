//! Staging primitives: no-clobber copies, placeholders, and script output.
//!
//! Mutations on the staging trees go through a directory handle opened with
//! `O_DIRECTORY | O_NOFOLLOW`, and new files are created with `O_EXCL` on
//! the final component. A staging destination that already exists fails the
//! operation; staged payloads are never overwritten.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use rustix::fd::OwnedFd;
use rustix::fs::{fchmod, openat, Mode, OFlags, CWD};
use rustix::io::Errno;

use crate::constants::SCRIPT_MODE;

fn errno_to_io(e: Errno) -> std::io::Error {
    std::io::Error::from_raw_os_error(e.raw_os_error())
}

/// Open a directory with `O_DIRECTORY | O_NOFOLLOW` for *at operations.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be opened.
pub fn open_dir_nofollow(dir: &Path) -> std::io::Result<OwnedFd> {
    use std::os::unix::ffi::OsStrExt;
    let c = std::ffi::CString::new(dir.as_os_str().as_bytes())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid path"))?;
    openat(
        CWD,
        c.as_c_str(),
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC | OFlags::NOFOLLOW,
        Mode::empty(),
    )
    .map_err(errno_to_io)
}

fn open_excl(dest: &Path, mode: u32) -> std::io::Result<fs::File> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    let fname = dest
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing file name"))?;
    let dirfd = open_dir_nofollow(parent)?;
    let name_c = std::ffi::CString::new(fname)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid cstring"))?;
    let fd = openat(
        &dirfd,
        name_c.as_c_str(),
        OFlags::WRONLY | OFlags::CREATE | OFlags::EXCL | OFlags::CLOEXEC,
        Mode::from_bits_truncate(mode),
    )
    .map_err(errno_to_io)?;
    Ok(fs::File::from(fd))
}

/// Copy `source` to `dest`, refusing to overwrite.
///
/// The destination is created with `O_EXCL` and ends up with the exact
/// permission bits of the source (the process umask does not leak into the
/// staged copy).
///
/// # Errors
///
/// `ErrorKind::AlreadyExists` when `dest` is occupied; other IO errors pass
/// through.
pub fn copy_no_clobber(source: &Path, dest: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(source)?.permissions().mode() & 0o7777;
    let mut sfile = fs::File::open(source)?;
    let mut dfile = open_excl(dest, mode)?;
    std::io::copy(&mut sfile, &mut dfile)?;
    fchmod(&dfile, Mode::from_bits_truncate(mode)).map_err(errno_to_io)?;
    dfile.sync_all()?;
    Ok(())
}

/// Create an empty placeholder at `dest` with the given permission bits,
/// refusing to overwrite.
///
/// # Errors
///
/// Same contract as [`copy_no_clobber`].
pub fn create_placeholder(dest: &Path, mode: u32) -> std::io::Result<()> {
    let dfile = open_excl(dest, mode)?;
    fchmod(&dfile, Mode::from_bits_truncate(mode)).map_err(errno_to_io)?;
    dfile.sync_all()?;
    Ok(())
}

/// Write a generated script and mark it executable.
///
/// Scripts are regenerated on every run, so this overwrites; the no-clobber
/// rule applies to staged payloads only.
///
/// # Errors
///
/// Returns an IO error if the script cannot be written.
pub fn write_script(dest: &Path, body: &str) -> std::io::Result<()> {
    let mut f = fs::File::create(dest)?;
    f.write_all(body.as_bytes())?;
    fchmod(&f, Mode::from_bits_truncate(SCRIPT_MODE)).map_err(errno_to_io)?;
    f.sync_all()?;
    Ok(())
}
