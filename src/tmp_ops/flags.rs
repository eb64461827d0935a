//! Mode flags shared by every allocation operation.

use bitflags::bitflags;

bitflags! {
    /// Caller-supplied bitset selecting how a temporary object is named and created.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModeFlags: u32 {
        /// Honor the configured override directory (normally `$TMPDIR`).
        const USE_OVERRIDE_DIR    = 1 << 0;
        /// Treat the name hint as a full path template instead of a bare root.
        const USE_CALLER_TEMPLATE = 1 << 1;
        /// Draw suffix material from the OS random source instead of a counter.
        const USE_STRONG_RANDOM   = 1 << 2;
        /// Remove the directory entry right after exclusive creation.
        const UNLINK_AFTER_CREATE = 1 << 3;
        /// Open for reading and writing instead of write-only.
        const READ_WRITE          = 1 << 4;
    }
}
