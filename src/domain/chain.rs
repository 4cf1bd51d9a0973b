//! Chain id parsing

use serde_json::Value;

/// Parse a chain id as reported by a provider
///
/// Providers report `0x`-prefixed hex (`"0x1"`), but some hand back decimal
/// strings or bare JSON numbers. Surrounding whitespace is ignored.
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        if hex.is_empty() || hex.starts_with('+') {
            return None;
        }
        return u64::from_str_radix(hex, 16).ok();
    }
    if trimmed.starts_with('+') {
        return None;
    }
    trimmed.parse::<u64>().ok()
}

/// Parse a chain id from a JSON-RPC result (`eth_chainId` / `net_version`)
pub fn chain_id_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => parse_chain_id(s),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_and_decimal() {
        assert_eq!(parse_chain_id("0x1"), Some(1));
        assert_eq!(parse_chain_id("0xaa36a7"), Some(11_155_111));
        assert_eq!(parse_chain_id("0X89"), Some(137));
        assert_eq!(parse_chain_id("137"), Some(137));
        assert_eq!(parse_chain_id(" 0x2105 "), Some(8453));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_chain_id(""), None);
        assert_eq!(parse_chain_id("0x"), None);
        assert_eq!(parse_chain_id("mainnet"), None);
        assert_eq!(parse_chain_id("-1"), None);
        assert_eq!(parse_chain_id("0x+1"), None);
        assert_eq!(parse_chain_id("+5"), None);
    }

    #[test]
    fn test_chain_id_from_value() {
        assert_eq!(chain_id_from_value(&Value::from("0x5")), Some(5));
        assert_eq!(chain_id_from_value(&Value::from(31337u64)), Some(31337));
        assert_eq!(chain_id_from_value(&Value::Null), None);
    }
}
