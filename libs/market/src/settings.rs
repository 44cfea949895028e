//! Social channel links kept in the generic `site_settings` table

use serde::{Deserialize, Serialize};

use crate::models::SiteSetting;

pub const WHATSAPP_CHANNEL_URL: &str = "whatsapp_channel_url";
pub const TIKTOK_URL: &str = "tiktok_url";
pub const FACEBOOK_URL: &str = "facebook_url";

/// The only keys this module reads or writes
pub const SOCIAL_KEYS: [&str; 3] = [WHATSAPP_CHANNEL_URL, TIKTOK_URL, FACEBOOK_URL];

/// Named view over the social link settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub whatsapp_channel_url: String,
    #[serde(default)]
    pub tiktok_url: String,
    #[serde(default)]
    pub facebook_url: String,
}

impl SocialLinks {
    /// Pick the known keys out of arbitrary setting rows
    pub fn from_settings(rows: &[SiteSetting]) -> Self {
        let mut links = SocialLinks::default();

        for row in rows {
            let value = row.value.clone().unwrap_or_default();
            match row.key.as_str() {
                WHATSAPP_CHANNEL_URL => links.whatsapp_channel_url = value,
                TIKTOK_URL => links.tiktok_url = value,
                FACEBOOK_URL => links.facebook_url = value,
                _ => {}
            }
        }

        links
    }

    /// Rows for the batch upsert: always exactly the three known keys
    pub fn to_settings(&self) -> Vec<SiteSetting> {
        [
            (WHATSAPP_CHANNEL_URL, &self.whatsapp_channel_url),
            (TIKTOK_URL, &self.tiktok_url),
            (FACEBOOK_URL, &self.facebook_url),
        ]
        .into_iter()
        .map(|(key, value)| SiteSetting {
            key: key.to_string(),
            value: Some(value.trim().to_string()),
        })
        .collect()
    }

    /// Storefront view: blank links are left out
    pub fn published(&self) -> PublishedLinks {
        let keep = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        PublishedLinks {
            whatsapp: keep(&self.whatsapp_channel_url),
            tiktok: keep(&self.tiktok_url),
            facebook: keep(&self.facebook_url),
        }
    }
}

/// Social links shown in the storefront footer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishedLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, value: Option<&str>) -> SiteSetting {
        SiteSetting {
            key: key.to_string(),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let rows = vec![
            row(TIKTOK_URL, Some("https://www.tiktok.com/@agribuyx")),
            row("maintenance_mode", Some("on")),
            row(FACEBOOK_URL, None),
        ];

        let links = SocialLinks::from_settings(&rows);
        assert_eq!(links.tiktok_url, "https://www.tiktok.com/@agribuyx");
        assert_eq!(links.facebook_url, "");
        assert_eq!(links.whatsapp_channel_url, "");
    }

    #[test]
    fn save_writes_exactly_the_known_keys() {
        let links = SocialLinks {
            whatsapp_channel_url: " https://whatsapp.com/channel/x ".to_string(),
            ..Default::default()
        };

        let rows = links.to_settings();
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, SOCIAL_KEYS);
        assert_eq!(rows[0].value.as_deref(), Some("https://whatsapp.com/channel/x"));
        assert_eq!(rows[1].value.as_deref(), Some(""));
    }

    #[test]
    fn published_links_skip_blanks() {
        let links = SocialLinks {
            facebook_url: "https://facebook.com/agribuyx".to_string(),
            tiktok_url: "  ".to_string(),
            ..Default::default()
        };

        let published = links.published();
        assert_eq!(published.facebook.as_deref(), Some("https://facebook.com/agribuyx"));
        assert_eq!(published.tiktok, None);

        let json = serde_json::to_value(&published).unwrap();
        assert!(json.get("tiktok").is_none());
    }
}
