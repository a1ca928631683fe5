/// 限流计数键前缀
const RATE_LIMIT_PREFIX: &str = "ratelimit:";

/// 生成单个客户端的限流窗口键
pub fn rate_limit_key(client_id: &str) -> String {
    format!("{}{}", RATE_LIMIT_PREFIX, client_id)
}
