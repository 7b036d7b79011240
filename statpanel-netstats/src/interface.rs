//! Interface name to index resolution
//!
//! Reads `/sys/class/net/<name>/ifindex`. The index is resolved once when
//! the reader is built; a renamed or re-created interface needs a new
//! reader.

use std::fmt;
use std::io;
use std::path::Path;

/// Default sysfs network class directory
pub const SYSFS_NET: &str = "/sys/class/net";

/// Longest accepted interface name (IFNAMSIZ without the NUL)
pub const MAX_IFNAME_LEN: usize = 15;

/// Interface lookup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceError {
    /// No interface with that name
    NotFound,
    /// Name is empty, too long or not a plain file name
    InvalidName,
    /// The index entry exists but could not be read
    Unreadable(io::ErrorKind),
    /// The index entry is not a positive integer
    Malformed,
}

impl fmt::Display for InterfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceError::NotFound => f.write_str("no such interface"),
            InterfaceError::InvalidName => f.write_str("invalid interface name"),
            InterfaceError::Unreadable(kind) => write!(f, "ifindex unreadable: {kind}"),
            InterfaceError::Malformed => f.write_str("malformed ifindex"),
        }
    }
}

impl std::error::Error for InterfaceError {}

/// Resolve an interface name to its kernel index
pub fn resolve_index(name: &str) -> Result<u32, InterfaceError> {
    resolve_index_in(Path::new(SYSFS_NET), name)
}

/// Resolve an interface name against a sysfs-style directory
pub fn resolve_index_in(root: &Path, name: &str) -> Result<u32, InterfaceError> {
    validate_name(name)?;

    let path = root.join(name).join("ifindex");
    let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => InterfaceError::NotFound,
        kind => InterfaceError::Unreadable(kind),
    })?;

    match contents.trim().parse::<u32>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(InterfaceError::Malformed),
    }
}

fn validate_name(name: &str) -> Result<(), InterfaceError> {
    let plain = !name.is_empty()
        && name.len() <= MAX_IFNAME_LEN
        && name != "."
        && name != ".."
        && !name.contains(|c: char| c == '/' || c == '\0' || c.is_whitespace());

    if plain {
        Ok(())
    } else {
        Err(InterfaceError::InvalidName)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    /// Scratch sysfs tree, removed on drop
    struct FakeSysfs(PathBuf);

    impl FakeSysfs {
        fn new(tag: &str) -> Self {
            let root = std::env::temp_dir()
                .join(format!("statpanel-sysfs-{}-{tag}", std::process::id()));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).unwrap();
            Self(root)
        }

        fn add(&self, name: &str, ifindex: &str) {
            let dir = self.0.join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("ifindex"), ifindex).unwrap();
        }
    }

    impl Drop for FakeSysfs {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_resolves_index() {
        let sysfs = FakeSysfs::new("resolve");
        sysfs.add("eth0", "2\n");
        assert_eq!(resolve_index_in(&sysfs.0, "eth0"), Ok(2));
    }

    #[test]
    fn test_missing_interface() {
        let sysfs = FakeSysfs::new("missing");
        assert_eq!(
            resolve_index_in(&sysfs.0, "wlan9"),
            Err(InterfaceError::NotFound)
        );
    }

    #[test]
    fn test_malformed_index() {
        let sysfs = FakeSysfs::new("malformed");
        sysfs.add("eth0", "zero");
        sysfs.add("eth1", "0");
        assert_eq!(
            resolve_index_in(&sysfs.0, "eth0"),
            Err(InterfaceError::Malformed)
        );
        assert_eq!(
            resolve_index_in(&sysfs.0, "eth1"),
            Err(InterfaceError::Malformed)
        );
    }

    #[test]
    fn test_rejects_path_like_names() {
        for name in ["", ".", "..", "../eth0", "eth 0", "averyveryverylongname"] {
            assert_eq!(
                resolve_index_in(Path::new(SYSFS_NET), name),
                Err(InterfaceError::InvalidName),
                "{name:?}"
            );
        }
    }
}
