//! hidraw discovery for the dial interface
//!
//! Scans `/sys/class/hidraw/hidrawN/device/uevent` for the Zotac vendor and
//! product IDs. The uevent carries them as `HID_ID=0003:00001EE9:00001590`.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sysfs class directory listing hidraw nodes
pub const SYSFS_HIDRAW: &str = "/sys/class/hidraw";

/// Zotac vendor ID (hex, as it appears in uevent)
pub const VENDOR_ID: &str = "1EE9";
/// Zone controller product ID (hex, as it appears in uevent)
pub const PRODUCT_ID: &str = "1590";

/// Find the dial hidraw node, returning its `/dev` path
pub fn find_dial_device() -> Option<PathBuf> {
    find_hidraw_in(Path::new(SYSFS_HIDRAW), VENDOR_ID, PRODUCT_ID)
}

/// Find the first hidraw node under `class_dir` whose uevent mentions both IDs
pub fn find_hidraw_in(class_dir: &Path, vid: &str, pid: &str) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(class_dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy().starts_with("hidraw"))
                .unwrap_or(false)
        })
        .collect();
    entries.sort();

    let vid = vid.to_uppercase();
    let pid = pid.to_uppercase();

    for entry in entries {
        let uevent = match fs::read_to_string(entry.join("device").join("uevent")) {
            Ok(content) => content.to_uppercase(),
            Err(_) => continue,
        };

        if uevent.contains(&vid) && uevent.contains(&pid) {
            let name = entry.file_name()?;
            debug!("Matched {} for {}:{}", entry.display(), vid, pid);
            return Some(PathBuf::from("/dev").join(name));
        }
    }

    None
}
