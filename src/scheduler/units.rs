//! Unit parsing shared by the scheduler strategies

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

/// Bytes per megabyte, the native unit of HTCondor ads and `SLURM_MEM_PER_CPU`
pub const BYTES_PER_MB: u64 = MIB;

/// Parse a strict `HH:MM:SS` duration into seconds.
///
/// Hours are unbounded. Anything else, `UNLIMITED` included, is rejected.
pub fn parse_duration(s: &str) -> Option<u64> {
    let mut parts = s.trim().split(':');
    let hours = parse_digits(parts.next()?)?;
    let minutes = parse_digits(parts.next()?)?;
    let seconds = parse_digits(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Parse a memory quantity such as `4G`, `512 M` or `4gb` into bytes.
///
/// The unit is one of T, G or M (any case, binary multipliers) and may be
/// followed by a single `B`.
pub fn parse_memory(s: &str) -> Option<u64> {
    let s = s.trim();
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let value = parse_digits(&s[..digits_end])?;

    let mut rest = s[digits_end..].trim_start().chars();
    let multiplier = match rest.next()?.to_ascii_uppercase() {
        'T' => TIB,
        'G' => GIB,
        'M' => MIB,
        _ => return None,
    };

    match rest.as_str() {
        "" | "b" | "B" => value.checked_mul(multiplier),
        _ => None,
    }
}

/// Convert a whole number of megabytes to bytes
pub fn megabytes_to_bytes(mb: u64) -> Option<u64> {
    mb.checked_mul(BYTES_PER_MB)
}

/// Split a `Key = Value` pair on its first `=`, trimming both sides
pub fn split_key_value(s: &str) -> Option<(&str, &str)> {
    s.split_once('=').map(|(k, v)| (k.trim(), v.trim()))
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
