use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::cache::counter::CounterStore;
use crate::cache::keys::rate_limit_key;
use crate::config::Config;

/// 健康检查等运维端点不参与限流
const EXEMPT_PREFIX: &str = "/health";

/// 固定窗口限流器
///
/// 每个客户端在一个窗口内有固定预算，窗口到期后预算整体重置，
/// 不做平滑补充。读取与扣减不是一次原子操作，同一客户端的并发
/// 突发可能让单窗口放行数略微超出预算；若键恰好在 get 与 decr
/// 之间过期，DECR 会以 -1 且无 TTL 重建该键，此后该客户端一直
/// 被拒。
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    config: Arc<Config>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// 判断该客户端的请求是否放行
    pub async fn try_admit(&self, client_id: &str) -> bool {
        let key = rate_limit_key(client_id);

        match self.admit_inner(&key).await {
            Ok(admitted) => admitted,
            // 计数器存储不可用时放行，否则存储故障等于整站不可用
            Err(e) => {
                tracing::warn!("Counter store unreachable, admitting request: {}", e);
                true
            }
        }
    }

    async fn admit_inner(&self, key: &str) -> Result<bool, crate::cache::StoreError> {
        if !self.store.exists(key).await? {
            // 窗口首个请求：播种余量并设置窗口 TTL
            let seed = self.config.rate_limit_max_tokens as i64 - 1;
            self.store
                .set_ex(key, seed, self.config.rate_limit_window())
                .await?;
            return Ok(true);
        }

        let tokens = match self.store.get(key).await? {
            Some(tokens) => tokens,
            // 键存在但值不可读：按拒绝处理
            None => return Ok(false),
        };

        if tokens > 0 {
            self.store.decr(key).await?;
            Ok(true)
        } else {
            tracing::warn!("Rate limit exceeded for client: {}", key);
            Ok(false)
        }
    }
}

/// 从请求中推导客户端标识
///
/// 优先取 x-forwarded-for 的第一个非空值，否则用对端地址。
/// 头部内容不做真实性校验，可被伪造。
fn client_id(req: &Request<Body>) -> String {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    req.headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        .map(|s| s.trim().to_string())
        .or(remote_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

fn rejection_response() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "error": "Rate limit exceeded. Try again later." })),
    )
        .into_response()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.uri().path().starts_with(EXEMPT_PREFIX) {
        return next.run(req).await;
    }

    let client_id = client_id(&req);
    tracing::debug!("Admission check for client: {}", client_id);

    if limiter.try_admit(&client_id).await {
        next.run(req).await
    } else {
        rejection_response()
    }
}
