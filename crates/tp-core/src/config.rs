//! Configuration management for threadprep

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discussion settings (comment paging and ordering)
    pub discussion: DiscussionSettings,
    /// Database driver settings
    pub database: DatabaseConfig,
    /// Comment list markup settings
    pub render: RenderConfig,
}

/// Site-wide discussion settings read by the comment query builder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionSettings {
    /// Break comments into pages
    pub page_comments: bool,
    /// Top-level comments per page
    pub comments_per_page: u32,
    /// Order in which comments are listed
    pub comment_order: SortOrder,
    /// Page shown when no page is requested
    pub default_comments_page: DefaultPage,
    /// Render replies nested under their parent
    pub thread_comments: bool,
}

impl Default for DiscussionSettings {
    fn default() -> Self {
        Self {
            page_comments: false,
            comments_per_page: 50,
            comment_order: SortOrder::Asc,
            default_comments_page: DefaultPage::Newest,
            thread_comments: true,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Oldest first
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    /// Newest first
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// Which comment page is displayed by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultPage {
    /// First page
    Oldest,
    /// Last page
    Newest,
}

/// Database driver settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Seed for the placeholder escape marker (random per process when unset)
    pub placeholder_seed: Option<String>,
}

/// Comment list markup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Class of the outer ordered list
    pub list_class: String,
    /// `target` attribute of author links
    pub link_target: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            list_class: "wp-block-comment-template".to_string(),
            link_target: "_self".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.discussion.page_comments);
        assert_eq!(config.discussion.comments_per_page, 50);
        assert_eq!(config.discussion.comment_order, SortOrder::Asc);
        assert_eq!(config.discussion.default_comments_page, DefaultPage::Newest);
        assert!(config.database.placeholder_seed.is_none());
        assert_eq!(config.render.list_class, "wp-block-comment-template");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[discussion]"));
        assert!(toml.contains("[render]"));
        assert!(toml.contains("comment_order = \"ASC\""));

        let config2: Config = toml::from_str(&toml).unwrap();
        assert_eq!(
            config.discussion.comments_per_page,
            config2.discussion.comments_per_page
        );
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [discussion]
            page_comments = true
            comments_per_page = 5
            comment_order = "desc"
            default_comments_page = "oldest"
            "#,
        )
        .unwrap();

        assert!(config.discussion.page_comments);
        assert_eq!(config.discussion.comments_per_page, 5);
        assert_eq!(config.discussion.comment_order, SortOrder::Desc);
        assert_eq!(config.discussion.default_comments_page, DefaultPage::Oldest);
        assert!(config.discussion.thread_comments);
        assert_eq!(config.render.link_target, "_self");
    }
}
