//! Candidate name generation.
//!
//! The generator owns the per-process state used to derive suffixes: a rotating
//! accumulator, a call counter, and a lazily-seeded PRNG used when the OS random
//! source is unavailable. Each call mixes
//!
//!   acc = (acc << 1) ^ unix_time ^ pid ^ source
//!
//! and formats `dir/root-acc`. The mixing makes the sequence awkward to guess
//! from outside the process, but it is NOT cryptographically secure: with the
//! counter source an observer who knows the pid and the clock can predict it.
//! Uniqueness always comes from the exclusive create that follows.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use tracing::trace;

use super::flags::ModeFlags;

/// Characters used when filling `XXXXXX` placeholders.
const PLACEHOLDER_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Minimum number of trailing `X` a template must carry to be substituted.
pub const MIN_PLACEHOLDERS: usize = 6;

/// Where the "current time" term of the mixing step comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(u64),
}

impl Clock {
    fn now_secs(self) -> u64 {
        match self {
            Clock::System => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            Clock::Fixed(t) => t,
        }
    }
}

/// A formatted candidate plus the pieces it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateName {
    pub directory: PathBuf,
    pub root: String,
    pub suffix: u64,
    pub path: PathBuf,
}

/// Shared per-process naming state. Callers hold it behind a lock.
#[derive(Debug)]
pub struct NameGenerator {
    acc: u64,
    counter: u64,
    pid: u64,
    clock: Clock,
    prng: Option<StdRng>,
    strong_available: bool,
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NameGenerator {
    pub fn new() -> Self {
        Self {
            acc: 1,
            counter: 0,
            pid: u64::from(std::process::id()),
            clock: Clock::System,
            prng: None,
            strong_available: true,
        }
    }

    /// Generator with a pinned pid and clock; two of these built with the same
    /// arguments yield identical counter-sourced sequences.
    pub fn deterministic(pid: u32, now: u64) -> Self {
        Self {
            pid: u64::from(pid),
            clock: Clock::Fixed(now),
            ..Self::new()
        }
    }

    /// Pretend the OS random source is missing so the seeded PRNG is used.
    pub fn without_strong_source(mut self) -> Self {
        self.strong_available = false;
        self
    }

    fn seeded_prng(&mut self) -> &mut StdRng {
        let pid = self.pid;
        self.prng.get_or_insert_with(|| {
            let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
            let marker = 0u8;
            let stack = std::ptr::addr_of!(marker) as usize as u64;
            let seed = now.as_secs() ^ u64::from(now.subsec_micros()) ^ (pid << 16) ^ stack;
            trace!(seed, "seeded fallback name PRNG");
            StdRng::seed_from_u64(seed)
        })
    }

    /// One 32-bit word from the OS source, or the seeded PRNG if that fails.
    pub fn random_word(&mut self) -> u64 {
        if self.strong_available {
            let mut buf = [0u8; 4];
            match OsRng.try_fill_bytes(&mut buf) {
                Ok(()) => return u64::from(u32::from_ne_bytes(buf)),
                Err(e) => {
                    trace!(error = %e, "OS random source failed; using seeded PRNG");
                    self.strong_available = false;
                }
            }
        }
        u64::from(self.seeded_prng().next_u32())
    }

    fn source_value(&mut self, flags: ModeFlags) -> u64 {
        if flags.contains(ModeFlags::USE_STRONG_RANDOM) {
            self.random_word()
        } else {
            let x = self.counter;
            self.counter = self.counter.wrapping_add(1);
            x
        }
    }

    /// Advance the accumulator once and return its new value.
    pub fn next_suffix(&mut self, flags: ModeFlags) -> u64 {
        let x = self.source_value(flags);
        self.acc = (self.acc << 1) ^ self.clock.now_secs() ^ self.pid ^ x;
        self.acc
    }

    /// Produce the next `directory/root-N` candidate.
    ///
    /// With a known `name_max` the basename is cut to fit. Two different
    /// suffixes can then format identically; that only costs an extra retry.
    /// If the bound leaves no room for a single suffix digit the call fails
    /// instead of producing the same name forever.
    pub fn next(
        &mut self,
        directory: &Path,
        root: &str,
        flags: ModeFlags,
        name_max: Option<usize>,
    ) -> io::Result<CandidateName> {
        let suffix = self.next_suffix(flags);
        let mut base = format!("{root}-{suffix}");
        if let Some(max) = name_max
            && base.len() > max
        {
            if root.len() + 1 >= max {
                return Err(name_too_long(root, max));
            }
            base.truncate(max);
        }
        Ok(CandidateName {
            directory: directory.to_path_buf(),
            root: root.to_string(),
            suffix,
            path: directory.join(base),
        })
    }

    /// Replace the trailing run of `X` in `template` with random alphanumerics.
    pub fn fill_placeholders(&mut self, template: &str) -> io::Result<String> {
        let run = template.bytes().rev().take_while(|b| *b == b'X').count();
        if run < MIN_PLACEHOLDERS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("template '{template}' must end in at least {MIN_PLACEHOLDERS} 'X' characters"),
            ));
        }
        let mut out = String::with_capacity(template.len());
        out.push_str(&template[..template.len() - run]);
        for _ in 0..run {
            let idx = (self.random_word() % PLACEHOLDER_ALPHABET.len() as u64) as usize;
            out.push(char::from(PLACEHOLDER_ALPHABET[idx]));
        }
        Ok(out)
    }
}

#[cfg(unix)]
fn name_too_long(_root: &str, _max: usize) -> io::Error {
    io::Error::from_raw_os_error(libc::ENAMETOOLONG)
}

#[cfg(not(unix))]
fn name_too_long(root: &str, max: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("name root '{root}' leaves no room for a suffix within {max} bytes"),
    )
}
