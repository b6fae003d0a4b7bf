/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at shop scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Generate a human-readable order number: `ORD` + UTC timestamp + 4 random
/// digits. Uniqueness is enforced by the `order_no` UNIQUE column; the random
/// suffix keeps same-second checkouts from colliding in practice.
pub fn order_no() -> String {
    use rand::Rng;
    let ts = chrono::Utc::now().format("%Y%m%d%H%M%S");
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("ORD{ts}{suffix:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_ids_are_positive_and_js_safe() {
        for _ in 0..100 {
            let id = snowflake_id();
            assert!(id > 0);
            assert!(id <= 0x1F_FFFF_FFFF_FFFF); // 2^53 - 1
        }
    }

    #[test]
    fn order_no_has_fixed_shape() {
        let no = order_no();
        assert!(no.starts_with("ORD"));
        assert_eq!(no.len(), 3 + 14 + 4);
        assert!(no[3..].chars().all(|c| c.is_ascii_digit()));
    }
}
