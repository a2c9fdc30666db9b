//! 加权 mod-10 校验算法（Luhn 变体）
//!
//! 设计要点：
//! - 全程基于 ASCII 数字字节逐位计算，不转整数：输入可达 25 位，超出 u64 范围。
//! - 自右向左交替权重 2/1（最右一位权重 2），权重积按十进制位求和
//!   （如 9*2=18 → 1+8=9）。

/// 计算加权 mod-10 数字和
/// - `digits` 必须全部为 ASCII 数字字节（调用方保证）
pub(crate) fn weighted_sum(digits: &[u8]) -> u32 {
    let mut sum = 0u32;
    let mut double = true; // 最右一位权重为 2
    for &b in digits.iter().rev() {
        let d = u32::from(b - b'0');
        let p = if double { d * 2 } else { d };
        // 权重积最大 18，两位分别计入
        sum += p / 10 + p % 10;
        double = !double;
    }
    sum
}

/// 校验位 = (10 - sum mod 10) mod 10，返回数值 0..=9
pub(crate) fn check_digit(digits: &[u8]) -> u8 {
    ((10 - weighted_sum(digits) % 10) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_sum_doubles_from_rightmost() {
        // "123"：3*2=6, 2*1=2, 1*2=2 → 10
        assert_eq!(weighted_sum(b"123"), 10);
        // 两位的权重积按位拆开：9*2=18 → 1+8
        assert_eq!(weighted_sum(b"9"), 9);
        assert_eq!(weighted_sum(b"0"), 0);
        assert_eq!(weighted_sum(b"1234567890"), 47);
    }

    #[test]
    fn check_digit_complements_mod10() {
        assert_eq!(check_digit(b"123"), 0);
        assert_eq!(check_digit(b"456"), 4);
        assert_eq!(check_digit(b"1234567890"), 3);
        assert_eq!(check_digit(b"12345678902"), 3);
        assert_eq!(check_digit(b"0"), 0);
    }
}
