//! Weather condition icons, fetched once per (code, size) and kept in a
//! bounded in-memory cache.

use crate::config::AppConfig;
use crate::error::IconError;
use iced::widget::image::Handle;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use moka::future::Cache;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconKey {
    pub code: String,
    pub size: u32,
}

/// A decoded icon, resized to `size x size`.
#[derive(Debug)]
pub struct Icon {
    width: u32,
    height: u32,
    handle: Handle,
}

impl Icon {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        let (width, height) = pixels.dimensions();
        Self {
            width,
            height,
            handle: Handle::from_pixels(width, height, pixels.into_raw()),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }
}

/// Cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct IconCache {
    entries: Cache<IconKey, Arc<Icon>>,
    http: reqwest::Client,
    url_template: String,
}

impl std::fmt::Debug for IconCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconCache")
            .field("entries", &self.entries.entry_count())
            .field("url_template", &self.url_template)
            .finish()
    }
}

impl IconCache {
    pub fn new(config: &AppConfig) -> Result<Self, IconError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            entries: Cache::builder()
                .max_capacity(config.icon_cache_capacity)
                .build(),
            http,
            url_template: config.icon_url_template.clone(),
        })
    }

    pub fn url_for(&self, code: &str) -> String {
        self.url_template.replace("{code}", code)
    }

    /// Returns the icon for `code` at `size`, fetching it on a miss.
    /// Concurrent misses for the same key share one download; failures are
    /// logged and not cached.
    pub async fn get(&self, code: &str, size: u32) -> Option<Arc<Icon>> {
        let key = IconKey {
            code: code.to_string(),
            size,
        };

        if let Some(icon) = self.entries.get(&key).await {
            debug!(code, size, "Icon cache hit");
            return Some(icon);
        }

        match self
            .entries
            .try_get_with(key.clone(), self.fetch(key))
            .await
        {
            Ok(icon) => Some(icon),
            Err(err) => {
                warn!(code, size, error = %err, "Error loading weather icon");
                None
            }
        }
    }

    async fn fetch(&self, key: IconKey) -> Result<Arc<Icon>, IconError> {
        let url = self.url_for(&key.code);
        debug!(%url, size = key.size, "Fetching icon");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IconError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;

        let decoded = image::load_from_memory(&bytes)?.to_rgba8();
        let resized = imageops::resize(&decoded, key.size, key.size, FilterType::Lanczos3);

        Ok(Arc::new(Icon::from_rgba(resized)))
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_substitutes_icon_code() {
        let cache = IconCache::new(&AppConfig::default()).unwrap();
        assert_eq!(
            cache.url_for("10d"),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
    }

    #[tokio::test]
    async fn unreachable_server_yields_no_icon() {
        let config = AppConfig {
            icon_url_template: "http://127.0.0.1:9/img/{code}.png".to_string(),
            request_timeout_secs: 2,
            ..AppConfig::default()
        };
        let cache = IconCache::new(&config).unwrap();

        assert!(cache.get("01d", 45).await.is_none());
        assert!(cache.get("01d", 45).await.is_none());
    }
}
