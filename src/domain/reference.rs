//! Generated identifiers: booking references, ticket URLs, gateway ids.

use rand::Rng;

const REFERENCE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REFERENCE_LEN: usize = 6;

/// Generates a short human booking code of the form `EVT-XXXXXX` with
/// `X ∈ [A-Z0-9]`. Uniqueness is enforced by the database constraint, not
/// here.
#[must_use]
pub fn booking_reference() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..REFERENCE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..REFERENCE_CHARSET.len());
            REFERENCE_CHARSET[idx] as char
        })
        .collect();
    format!("EVT-{suffix}")
}

/// QR ticket URL for a confirmed booking.
#[must_use]
pub fn ticket_url(booking_reference: &str) -> String {
    format!("https://tickets.stagepass.dev/qr/{booking_reference}")
}

/// Mock gateway transaction id: `txn_` + current nanos in base 36.
#[must_use]
pub fn gateway_txn_id() -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default()
        .unsigned_abs();
    format!("txn_{}", to_base36(nanos))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_expected_shape() {
        let reference = booking_reference();
        assert_eq!(reference.len(), 10);
        assert!(reference.starts_with("EVT-"));
        assert!(
            reference[4..]
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        );
    }

    #[test]
    fn ticket_url_embeds_reference() {
        assert_eq!(
            ticket_url("EVT-AB12CD"),
            "https://tickets.stagepass.dev/qr/EVT-AB12CD"
        );
    }

    #[test]
    fn txn_id_is_prefixed() {
        assert!(gateway_txn_id().starts_with("txn_"));
    }

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
