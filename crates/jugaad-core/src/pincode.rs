/// Validates an Indian postal code: exactly six ASCII digits, first digit
/// nonzero.
#[must_use]
pub fn is_valid_pincode(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    bytes.len() == 6
        && bytes[0].is_ascii_digit()
        && bytes[0] != b'0'
        && bytes.iter().all(u8::is_ascii_digit)
}
