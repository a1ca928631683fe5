/// 商品缓存命名空间前缀，失效时整个前缀一起清除
pub const PRODUCT_NAMESPACE: &str = "product:";

/// 生成"所有在售商品"查询结果的缓存键
pub fn product_list_key() -> String {
    format!("{}all-products", PRODUCT_NAMESPACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_key_lives_inside_product_namespace() {
        assert!(product_list_key().starts_with(PRODUCT_NAMESPACE));
    }
}
