//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use reelbot::BotConfig;

pub const TEST_TOKEN: &str = "123456:TEST-token";

/// Bot configuration with downloads going to `downloads_dir` plus any
/// extra variables.
pub fn test_config(downloads_dir: &Path, extra: &[(&str, &str)]) -> BotConfig {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("BOT_TOKEN".to_string(), TEST_TOKEN.to_string());
    vars.insert("DOWNLOAD_FOLDER".to_string(), downloads_dir.display().to_string());
    vars.insert("YTDL_COOKIES_FILE".to_string(), "/nonexistent/cookies.txt".to_string());
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }

    BotConfig::from_vars(|key| vars.get(key).cloned()).expect("test config should be valid")
}
