//! Access point security capability flags.
//!
//! Mirrors `NM80211ApSecurityFlags`. The daemon reports one such bitmask for
//! WPA and one for RSN (WPA2/WPA3) on every access point.

use bitflags::bitflags;

bitflags! {
    /// Authentication and encryption capabilities advertised by an access point.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ApSecurityFlags: u32 {
        const PAIR_WEP40 = 0x0000_0001;
        const PAIR_WEP104 = 0x0000_0002;
        const PAIR_TKIP = 0x0000_0004;
        const PAIR_CCMP = 0x0000_0008;
        const GROUP_WEP40 = 0x0000_0010;
        const GROUP_WEP104 = 0x0000_0020;
        const GROUP_TKIP = 0x0000_0040;
        const GROUP_CCMP = 0x0000_0080;
        const KEY_MGMT_PSK = 0x0000_0100;
        const KEY_MGMT_802_1X = 0x0000_0200;
        const KEY_MGMT_SAE = 0x0000_0400;
        const KEY_MGMT_OWE = 0x0000_0800;
        const KEY_MGMT_OWE_TM = 0x0000_1000;
        const KEY_MGMT_EAP_SUITE_B_192 = 0x0000_2000;
    }
}

impl ApSecurityFlags {
    /// Decodes a raw bitmask, keeping bits this type has no name for.
    pub fn from_raw(raw: u32) -> Self {
        Self::from_bits_retain(raw)
    }
}

/// Returns whether an access point requires credentials.
///
/// Any bit set in either mask counts as protected. Cipher suites are not
/// distinguished.
pub(crate) fn is_secure(wpa: ApSecurityFlags, rsn: ApSecurityFlags) -> bool {
    !wpa.is_empty() || !rsn.is_empty()
}
