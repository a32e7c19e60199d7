//! Homematic IP device key encoding
//!
//! Device keys (`dlk`) arrive as hexadecimal integers and are displayed in a
//! base-32 alphabet without the easily confused `I`, `O` and `V`, grouped
//! with `-` separators.

/// The 32-symbol key alphabet
pub const KEY_ALPHABET: &[u8; 32] = b"0123456789ABCEFGHJKLMNPQRSTUWXYZ";

/// Output lengths at which a `-` separator is prepended
const GROUP_BREAKS: [usize; 4] = [6, 12, 18, 24];

/// Encode an integer as a Homematic IP key
///
/// Symbols are emitted from the least significant 5 bits upwards. Whenever
/// the accumulated text (separators included) reaches 6, 12, 18 or 24
/// characters a `-` is prepended. Zero encodes to the empty string.
///
/// # Examples
/// ```
/// use easycontrol_settings::key::homematic_key;
///
/// assert_eq!(homematic_key(0), "");
/// assert_eq!(homematic_key(31), "Z");
/// assert_eq!(homematic_key((1 << 30) - 1), "-ZZZZZZ");
/// ```
#[must_use]
pub fn homematic_key(number: u128) -> String {
    homematic_key_from_bytes(&number.to_be_bytes())
}

/// Encode a big-endian unsigned integer of any width as a Homematic IP key
#[must_use]
pub fn homematic_key_from_bytes(bytes: &[u8]) -> String {
    let significant_bits = bit_length(bytes);

    // Built back to front, reversed at the end.
    let mut reversed: Vec<u8> = Vec::new();
    let mut offset = 0;
    while offset < significant_bits {
        reversed.push(KEY_ALPHABET[usize::from(five_bits_at(bytes, offset))]);
        if GROUP_BREAKS.contains(&reversed.len()) {
            reversed.push(b'-');
        }
        offset += 5;
    }

    reversed.reverse();
    reversed.into_iter().map(char::from).collect()
}

/// Parse a hexadecimal integer and encode it as a Homematic IP key
///
/// Surrounding whitespace, a leading `+` and a `0x`/`0X` prefix are
/// accepted. Odd-length digits are read as if left-padded with `0`.
///
/// # Errors
/// - [`hex::FromHexError::InvalidStringLength`] if no digits remain
/// - [`hex::FromHexError::InvalidHexCharacter`] for any non-hexadecimal
///   character, including a `-` sign
pub fn homematic_key_from_hex(hex_key: &str) -> Result<String, hex::FromHexError> {
    let digits = hex_key.trim();
    let digits = digits.strip_prefix('+').unwrap_or(digits);
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty() {
        return Err(hex::FromHexError::InvalidStringLength);
    }

    let bytes = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))?
    } else {
        hex::decode(digits)?
    };
    Ok(homematic_key_from_bytes(&bytes))
}

/// Number of bits up to and including the most significant set bit
fn bit_length(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|&b| b != 0)
        .map_or(0, |i| (bytes.len() - i - 1) * 8 + (8 - bytes[i].leading_zeros() as usize))
}

/// Five bits starting at bit `offset` counted from the least significant end
fn five_bits_at(bytes: &[u8], offset: usize) -> u8 {
    let mut symbol = 0u8;
    for bit in 0..5 {
        let position = offset + bit;
        let byte_index = position / 8;
        if byte_index >= bytes.len() {
            break;
        }
        let byte = bytes[bytes.len() - 1 - byte_index];
        if (byte >> (position % 8)) & 1 == 1 {
            symbol |= 1 << bit;
        }
    }
    symbol
}
