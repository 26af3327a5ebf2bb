//! Application config beyond the base: general chat behavior, Reddit, image limits and wa.

use anyhow::Result;
use image_pipeline::ImageLimits;

use super::env::{bool_or, list, parse_opt, parse_or, string_or};

/// Welcome and group settings.
#[derive(Debug, Clone)]
pub struct GeneralConfig {
    /// KEYBOT_DO_WELCOME
    pub do_welcome: bool,
    /// KEYBOT_WELCOME: welcome template, `${user}` is the new member's mention
    pub welcome: String,
    /// KEYBOT_USERNAME: bot username without `@`; empty means ask getMe at startup
    pub username: String,
    /// KEYBOT_GROUP_ID: the group that receives the daily post and counts wa-s
    pub group_id: Option<i64>,
    /// KEYBOT_ADMINS: usernames or numeric ids allowed to run commands; empty allows anyone
    pub admins: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            do_welcome: true,
            welcome: String::new(),
            username: String::new(),
            group_id: None,
            admins: Vec::new(),
        }
    }
}

impl GeneralConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            do_welcome: bool_or("KEYBOT_DO_WELCOME", true)?,
            welcome: string_or("KEYBOT_WELCOME", ""),
            username: string_or("KEYBOT_USERNAME", "")
                .trim()
                .trim_start_matches('@')
                .to_string(),
            group_id: parse_opt("KEYBOT_GROUP_ID")?,
            admins: list("KEYBOT_ADMINS"),
        })
    }
}

/// Reddit app credentials and the daily post settings.
#[derive(Debug, Clone)]
pub struct RedditConfig {
    /// REDDIT_CLIENT_ID
    pub client_id: String,
    /// REDDIT_CLIENT_SECRET
    pub client_secret: String,
    /// REDDIT_DAILY_PIC_CAPTION: caption template, `${url}` is the post's short URL
    pub daily_pic_caption: String,
    /// REDDIT_SUBREDDIT
    pub subreddit: String,
    /// REDDIT_USER_AGENT
    pub user_agent: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            daily_pic_caption: "${url}".to_string(),
            subreddit: "MechanicalKeyboards".to_string(),
            user_agent: "desktop:org.keybot:0.1.0".to_string(),
        }
    }
}

impl RedditConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            client_id: string_or("REDDIT_CLIENT_ID", ""),
            client_secret: string_or("REDDIT_CLIENT_SECRET", ""),
            daily_pic_caption: string_or("REDDIT_DAILY_PIC_CAPTION", &defaults.daily_pic_caption),
            subreddit: string_or("REDDIT_SUBREDDIT", &defaults.subreddit),
            user_agent: string_or("REDDIT_USER_AGENT", &defaults.user_agent),
        })
    }

    /// Client id and secret; only the Reddit commands need them.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            anyhow::bail!("REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET must be set");
        }
        Ok((&self.client_id, &self.client_secret))
    }
}

/// Image limits plus the external tool binaries.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub limits: ImageLimits,
    /// MAGICK_BIN
    pub magick_bin: String,
    /// DOWNLOADER_BIN
    pub downloader_bin: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            limits: ImageLimits::default(),
            magick_bin: "magick".to_string(),
            downloader_bin: "curl".to_string(),
        }
    }
}

impl ImageConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = ImageLimits::default();
        Ok(Self {
            limits: ImageLimits {
                max_dimension: parse_or("IMAGE_MAX_DIMENSION", defaults.max_dimension)?,
                max_file_size: parse_or("IMAGE_MAX_FILE_SIZE", defaults.max_file_size)?,
                resize_target: parse_or("IMAGE_RESIZE_TARGET", defaults.resize_target)?,
                resize_quality: parse_or("IMAGE_RESIZE_QUALITY", defaults.resize_quality)?,
                memory_limit: string_or("IMAGE_MEMORY_LIMIT", &defaults.memory_limit),
            },
            magick_bin: string_or("MAGICK_BIN", "magick"),
            downloader_bin: string_or("DOWNLOADER_BIN", "curl"),
        })
    }

    pub fn validate(&self) -> Result<()> {
        let l = &self.limits;
        if l.max_dimension == 0 || l.max_file_size == 0 || l.resize_target == 0 {
            anyhow::bail!(
                "IMAGE_MAX_DIMENSION, IMAGE_MAX_FILE_SIZE and IMAGE_RESIZE_TARGET must be greater than 0"
            );
        }
        if l.resize_quality == 0 || l.resize_quality > 100 {
            anyhow::bail!("IMAGE_RESIZE_QUALITY must be in 1..=100");
        }
        Ok(())
    }
}

/// Wa counting: a text reply starting with the trigger counts as a wa for the replied message.
#[derive(Debug, Clone)]
pub struct WaConfig {
    /// WA_TRIGGER
    pub trigger: String,
    /// WA_THRESHOLD: the bot joins in exactly when a message reaches this many wa-s
    pub threshold: u32,
    /// WA_REPLY
    pub reply: String,
    /// WA_DELAY_MIN_SECS
    pub delay_min_secs: u64,
    /// WA_DELAY_MAX_SECS
    pub delay_max_secs: u64,
}

/// Upper bound for `WA_DELAY_MAX_SECS`: one day.
const MAX_WA_DELAY_SECS: u64 = 24 * 60 * 60;

impl Default for WaConfig {
    fn default() -> Self {
        Self {
            trigger: "哇".to_string(),
            threshold: 3,
            reply: "哇！".to_string(),
            delay_min_secs: 10,
            delay_max_secs: 600,
        }
    }
}

impl WaConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            trigger: string_or("WA_TRIGGER", &defaults.trigger),
            threshold: parse_or("WA_THRESHOLD", defaults.threshold)?,
            reply: string_or("WA_REPLY", &defaults.reply),
            delay_min_secs: parse_or("WA_DELAY_MIN_SECS", defaults.delay_min_secs)?,
            delay_max_secs: parse_or("WA_DELAY_MAX_SECS", defaults.delay_max_secs)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.trigger.is_empty() {
            anyhow::bail!("WA_TRIGGER must not be empty");
        }
        if self.threshold == 0 {
            anyhow::bail!("WA_THRESHOLD must be greater than 0");
        }
        if self.delay_max_secs > MAX_WA_DELAY_SECS {
            anyhow::bail!(
                "WA_DELAY_MAX_SECS ({}) must not exceed {}",
                self.delay_max_secs,
                MAX_WA_DELAY_SECS
            );
        }
        if self.delay_min_secs > self.delay_max_secs {
            anyhow::bail!(
                "WA_DELAY_MIN_SECS ({}) must not exceed WA_DELAY_MAX_SECS ({})",
                self.delay_min_secs,
                self.delay_max_secs
            );
        }
        Ok(())
    }
}

/// Application extensions loaded next to [`super::BaseConfig`].
#[derive(Debug, Clone, Default)]
pub struct KeybotExtensions {
    pub general: GeneralConfig,
    pub reddit: RedditConfig,
    pub image: ImageConfig,
    pub wa: WaConfig,
}

impl KeybotExtensions {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            general: GeneralConfig::from_env()?,
            reddit: RedditConfig::from_env()?,
            image: ImageConfig::from_env()?,
            wa: WaConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.image.validate()?;
        self.wa.validate()
    }
}
