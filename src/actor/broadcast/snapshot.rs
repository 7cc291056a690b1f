use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Snapshot version: modification time of the source in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version(i64);

impl Version {
    pub const ZERO: Self = Self(0);

    pub const fn new(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Nanoseconds since the Unix epoch, negative before it.
    pub fn from_mtime(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::new(i64::try_from(after.as_nanos()).unwrap_or(i64::MAX)),
            Err(before) => Self::new(
                i64::try_from(before.duration().as_nanos()).map_or(i64::MIN, |nanos| -nanos),
            ),
        }
    }

    /// Parse a client-supplied version. Anything unparsable counts as zero.
    pub fn parse(value: &str) -> Self {
        Self::new(value.trim().parse().unwrap_or(0))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable rendering of one version of the watched file.
///
/// The wire payload `"<version>\n<html>"` is built once and shared by every
/// client released with this snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    version: Version,
    body: Arc<[u8]>,
    html_offset: usize,
}

impl Snapshot {
    pub fn new(version: Version, html: &str) -> Self {
        let header = format!("{version}\n");
        let mut body = Vec::with_capacity(header.len() + html.len());
        body.extend_from_slice(header.as_bytes());
        body.extend_from_slice(html.as_bytes());

        Self {
            version,
            body: body.into(),
            html_offset: header.len(),
        }
    }

    /// Placeholder before the first render: version zero, no content.
    pub fn empty() -> Self {
        Self::new(Version::ZERO, "")
    }

    pub const fn version(&self) -> Version {
        self.version
    }

    /// Full wire payload.
    pub fn body(&self) -> &Arc<[u8]> {
        &self.body
    }

    pub fn html(&self) -> &[u8] {
        &self.body[self.html_offset..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_version_parse() {
        assert_eq!(Version::parse("100"), Version::new(100));
        assert_eq!(Version::parse(" 42 "), Version::new(42));
        assert_eq!(Version::parse(""), Version::ZERO);
        assert_eq!(Version::parse("abc"), Version::ZERO);
        assert_eq!(Version::parse("-7"), Version::new(-7));
    }

    #[test]
    fn test_version_from_mtime() {
        let time = UNIX_EPOCH + Duration::new(1, 500);
        assert_eq!(Version::from_mtime(time), Version::new(1_000_000_500));

        let before = UNIX_EPOCH - Duration::from_nanos(10);
        assert_eq!(Version::from_mtime(before), Version::new(-10));
    }

    #[test]
    fn test_snapshot_body() {
        let snapshot = Snapshot::new(Version::new(150), "<p>D</p>");
        assert_eq!(&snapshot.body()[..], b"150\n<p>D</p>");
        assert_eq!(snapshot.html(), b"<p>D</p>");
        assert_eq!(snapshot.version(), Version::new(150));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::empty();
        assert_eq!(snapshot.version(), Version::ZERO);
        assert_eq!(&snapshot.body()[..], b"0\n");
        assert!(snapshot.html().is_empty());
    }
}
