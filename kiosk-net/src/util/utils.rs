//! Utility functions for SSID conversion, access point ids and bus deadlines.

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::ConnectionError;
use crate::types::constants::paths;

/// Decodes SSID bytes as UTF-8.
///
/// Malformed sequences are replaced with U+FFFD rather than dropping the
/// network, so a single odd beacon never hides the rest of a scan.
pub(crate) fn decode_ssid(bytes: &[u8]) -> String {
    let ssid = String::from_utf8_lossy(bytes);
    if let std::borrow::Cow::Owned(_) = ssid {
        warn!("Invalid UTF-8 in SSID {bytes:02x?}, decoded as '{ssid}'");
    }
    ssid.into_owned()
}

/// Encodes an SSID for the `802-11-wireless.ssid` setting.
///
/// ASCII SSIDs map to one byte per character. Non-ASCII SSIDs are sent as
/// their UTF-8 bytes, not truncated to one byte per code point, so they
/// match what a scan decodes.
pub(crate) fn encode_ssid(ssid: &str) -> Vec<u8> {
    ssid.as_bytes().to_vec()
}

/// Turns an access point object path into the short id handed to callers.
///
/// Paths without the expected prefix are returned unmodified.
pub(crate) fn access_point_id(path: &str) -> String {
    match path.strip_prefix(paths::ACCESS_POINT_PREFIX) {
        Some(id) => id.to_string(),
        None => {
            debug!("Access point path '{path}' lacks the expected prefix, using it as id");
            path.to_string()
        }
    }
}

/// Rebuilds the full access point object path from a short id.
pub(crate) fn access_point_path(id: &str) -> Result<OwnedObjectPath> {
    let path = format!("{}{}", paths::ACCESS_POINT_PREFIX, id);
    OwnedObjectPath::try_from(path).map_err(|_| ConnectionError::InvalidAccessPointId(id.into()))
}

/// Runs a bus call with a deadline.
///
/// A call that outlives `limit` fails with [`ConnectionError::Timeout`]
/// naming the D-Bus method or property it was waiting for.
pub(crate) async fn with_timeout<T, F>(method: &'static str, limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!("D-Bus call {method} exceeded its {limit:?} deadline");
            Err(ConnectionError::Timeout {
                method,
                timeout: limit,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ssid_valid() {
        assert_eq!(decode_ssid(b"MyNetwork"), "MyNetwork");
        assert_eq!(decode_ssid(b""), "");
        assert_eq!(decode_ssid("café".as_bytes()), "café");
    }

    #[test]
    fn test_decode_ssid_invalid_utf8() {
        let decoded = decode_ssid(&[b'N', b'e', b't', 0xff, 0xfe]);
        assert!(decoded.starts_with("Net"));
        assert!(decoded.contains('\u{FFFD}'));
    }

    #[test]
    fn test_encode_ssid_ascii() {
        assert_eq!(
            encode_ssid("HomeNet"),
            vec![72, 111, 109, 101, 78, 101, 116]
        );
    }

    #[test]
    fn test_encode_ssid_non_ascii_is_utf8() {
        assert_eq!(encode_ssid("café"), vec![b'c', b'a', b'f', 0xc3, 0xa9]);
        assert_eq!(encode_ssid("café").len(), 5);
    }

    #[test]
    fn test_ssid_round_trip() {
        for ssid in ["HomeNet", "Test_SSID-123", "café ☕"] {
            assert_eq!(decode_ssid(&encode_ssid(ssid)), ssid);
        }
    }

    #[test]
    fn test_access_point_id_strips_prefix() {
        assert_eq!(
            access_point_id("/org/freedesktop/NetworkManager/AccessPoint/42"),
            "42"
        );
    }

    #[test]
    fn test_access_point_id_without_prefix() {
        assert_eq!(
            access_point_id("/org/example/Other/7"),
            "/org/example/Other/7"
        );
    }

    #[test]
    fn test_access_point_path_round_trip() {
        let original = "/org/freedesktop/NetworkManager/AccessPoint/1337";
        let rebuilt = access_point_path(&access_point_id(original)).unwrap();
        assert_eq!(rebuilt.as_str(), original);
    }

    #[test]
    fn test_access_point_path_rejects_bad_id() {
        assert!(matches!(
            access_point_path("not a/valid//id"),
            Err(ConnectionError::InvalidAccessPointId(_))
        ));
        assert!(matches!(
            access_point_path(""),
            Err(ConnectionError::InvalidAccessPointId(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let result: Result<()> = with_timeout(
            "GetDevices",
            Duration::from_secs(1),
            futures::future::pending(),
        )
        .await;
        match result {
            Err(ConnectionError::Timeout { method, timeout }) => {
                assert_eq!(method, "GetDevices");
                assert_eq!(timeout, Duration::from_secs(1));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let value = with_timeout("Strength", Duration::from_secs(1), async { Ok(42u8) })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }
}
