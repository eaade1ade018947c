const SEPARATOR: char = ':';

/// Encodes a high score as `<score>:<crc32 of the score digits, 8 hex digits>`.
pub fn encode(score: u32) -> String {
    let digits = score.to_string();
    let crc = crc32fast::hash(digits.as_bytes());
    format!("{digits}{SEPARATOR}{crc:08x}")
}

/// Decodes a stored high score.
/// Accepts the checksummed form written by `encode` and a bare decimal integer.
pub fn decode(record: &str) -> Result<u32, String> {
    let record = record.trim();
    if record.is_empty() {
        return Err("high score record is empty".to_string());
    }

    let (digits, checksum) = match record.split_once(SEPARATOR) {
        Some((digits, checksum)) => (digits, Some(checksum)),
        None => (record, None),
    };

    let score = digits
        .parse::<u32>()
        .map_err(|err| format!("invalid high score {digits:?}: {err}"))?;

    if let Some(checksum) = checksum {
        let expected = u32::from_str_radix(checksum, 16)
            .map_err(|err| format!("invalid high score checksum {checksum:?}: {err}"))?;
        let actual = crc32fast::hash(digits.as_bytes());
        if actual != expected {
            return Err(format!(
                "CRC32 mismatch: expected {expected:#010x}, got {actual:#010x}"
            ));
        }
    }

    Ok(score)
}
