use serde::{Deserialize, Serialize};

/// 内容源（Reddit 公共 JSON 接口）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub listing_limit: u32,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_string(),
            user_agent: concat!("redditminer/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_seconds: 30,
            listing_limit: 100,
        }
    }
}

impl RedditConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("base_url必须以http://或https://开头"));
        }

        if self.user_agent.trim().is_empty() {
            return Err(anyhow::anyhow!("User-Agent不能为空"));
        }

        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("请求超时时间必须大于0"));
        }

        // 接口单页最多返回100条
        if self.listing_limit == 0 || self.listing_limit > 100 {
            return Err(anyhow::anyhow!(
                "listing_limit必须在1到100之间: {}",
                self.listing_limit
            ));
        }

        Ok(())
    }
}
