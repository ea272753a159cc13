use serde::Deserialize;

/// Main configuration structure for Council-Feed
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub markup: MarkupConfig,
    /// The roster of council-member blogs, in scrape order
    #[serde(default, rename = "source")]
    pub sources: Vec<Source>,
}

/// Scraper pacing and limits
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Delay before every page fetch after the first within a source (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Delay before moving on to the next source (milliseconds)
    #[serde(rename = "source-delay-ms", default = "default_source_delay_ms")]
    pub source_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on pages walked for a single source
    #[serde(rename = "max-pages-per-source", default = "default_max_pages")]
    pub max_pages_per_source: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: default_page_delay_ms(),
            source_delay_ms: default_source_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            max_pages_per_source: default_max_pages(),
        }
    }
}

fn default_page_delay_ms() -> u64 {
    1000
}

fn default_source_delay_ms() -> u64 {
    1500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_pages() -> u32 {
    100
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the persisted JSON dataset
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,

    /// Optional path for a markdown run summary
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

/// Site-wide settings shared by every source
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root used to resolve relative permalinks. Defaults to each blog's origin.
    #[serde(rename = "root-url", default)]
    pub root_url: Option<String>,

    /// Path prefix stripped from permalinks when generating post ids
    #[serde(rename = "post-id-prefix", default = "default_post_id_prefix")]
    pub post_id_prefix: String,

    /// Path segments dropped from generated post ids
    #[serde(rename = "post-id-skip-segments", default = "default_post_id_skip_segments")]
    pub post_id_skip_segments: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: None,
            post_id_prefix: default_post_id_prefix(),
            post_id_skip_segments: default_post_id_skip_segments(),
        }
    }
}

fn default_post_id_prefix() -> String {
    "/council/".to_string()
}

fn default_post_id_skip_segments() -> Vec<String> {
    vec!["blog".to_string()]
}

/// CSS selectors describing the blog listing markup
#[derive(Debug, Clone, Deserialize)]
pub struct MarkupConfig {
    /// One element per post card
    #[serde(default = "default_card_selector")]
    pub card: String,

    /// Anchor carrying the title text and the relative permalink
    #[serde(rename = "title-link", default = "default_title_link_selector")]
    pub title_link: String,

    /// Element carrying the machine-readable `datetime` attribute
    #[serde(default = "default_timestamp_selector")]
    pub timestamp: String,

    /// Body preview block
    #[serde(rename = "body-preview", default = "default_body_preview_selector")]
    pub body_preview: String,

    /// Category label anchors
    #[serde(default = "default_category_selector")]
    pub category: String,

    /// "Last page" pagination link
    #[serde(rename = "last-page-link", default = "default_last_page_selector")]
    pub last_page_link: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            card: default_card_selector(),
            title_link: default_title_link_selector(),
            timestamp: default_timestamp_selector(),
            body_preview: default_body_preview_selector(),
            category: default_category_selector(),
            last_page_link: default_last_page_selector(),
        }
    }
}

fn default_card_selector() -> String {
    "#block-city-front-content .content-blog-summary .cards li".to_string()
}

fn default_title_link_selector() -> String {
    ".article-title a".to_string()
}

fn default_timestamp_selector() -> String {
    "time[datetime], time .datetime[datetime]".to_string()
}

fn default_body_preview_selector() -> String {
    ".article-content".to_string()
}

fn default_category_selector() -> String {
    ".card-content > p a".to_string()
}

fn default_last_page_selector() -> String {
    "#block-city-front-content nav.pager .pager__item--last a".to_string()
}

/// One council member's blog
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Source {
    /// Stable numeric identifier (district number)
    pub id: u32,

    /// Display name of the council member
    pub name: String,

    /// Root URL of the paginated blog listing
    #[serde(rename = "blog-url")]
    pub blog_url: String,

    /// Optional portrait URL for the presentation layer
    #[serde(rename = "avatar-url", default)]
    pub avatar_url: Option<String>,
}
