//! Parser field limits, derived from the OS page size at startup.

use std::sync::OnceLock;

fn page_size() -> usize {
    static PAGE: OnceLock<usize> = OnceLock::new();

    *PAGE.get_or_init(|| {
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size > 0 { size as usize } else { 4096 }
    })
}

/// Max request method length.
pub(crate) fn method_max() -> usize {
    page_size()
}

/// Max request target length.
pub(crate) fn target_max() -> usize {
    page_size()
}

/// Max header name length.
pub(crate) fn header_name_max() -> usize {
    page_size()
}

/// Max header value length.
pub(crate) fn header_value_max() -> usize {
    page_size() * 4
}

/// `"HTTP/x.x"`
pub(crate) const VERSION_LEN: usize = 8;
