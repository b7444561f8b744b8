//! 兑换码生成与归一化
//!
//! 兑换码由顾客口述、店员手工输入，因此要求简短、全大写、
//! 不含易混淆字符（I/L/O/U）。取 40 位随机数的 base32 编码，
//! 共 8 个字符；全局唯一性由存储层唯一约束兜底，冲突时重新生成。

use rand::Rng;

/// Crockford base32 字母表，排除 I L O U
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// 兑换码长度
pub const CODE_LEN: usize = 8;

/// 生成一个兑换码
///
/// 40 位随机数 → 8 个 base32 字符。约 1.1 万亿种组合，
/// 在唯一约束 + 重试的保护下碰撞概率可忽略。
pub fn generate_code() -> String {
    let mut value: u64 = rand::rng().random::<u64>() & ((1u64 << 40) - 1);
    let mut out = [0u8; CODE_LEN];
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1f) as usize];
        value >>= 5;
    }
    // ALPHABET 只含 ASCII，from_utf8 不会失败
    String::from_utf8(out.to_vec()).unwrap_or_default()
}

/// 归一化用户输入的兑换码
///
/// 生成侧只输出大写，核销侧统一转大写后查找，输入不区分大小写。
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_format() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LEN);
        assert!(
            code.bytes().all(|b| ALPHABET.contains(&b)),
            "非法字符: {}",
            code
        );
        assert_eq!(code, code.to_ascii_uppercase());
    }

    #[test]
    fn test_codes_vary() {
        // 随机性验证：100 个兑换码不应全部相同
        let first = generate_code();
        let any_different = (0..100).any(|_| generate_code() != first);
        assert!(any_different);
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("ab12cd34"), "AB12CD34");
        assert_eq!(normalize_code("  AB12CD34  "), "AB12CD34");
        assert_eq!(normalize_code(""), "");
    }

    #[test]
    fn test_no_confusable_characters() {
        for _ in 0..50 {
            let code = generate_code();
            for c in ['I', 'L', 'O', 'U'] {
                assert!(!code.contains(c), "兑换码含易混淆字符 {}: {}", c, code);
            }
        }
    }
}
