use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::error::Error;
use std::path::{Path, PathBuf};

/// 数值统计表文件名
const NUM_INV_FILE: &str = "num_inv.csv";
const NUM_ITEMS_FILE: &str = "num_items.csv";
/// 子目录
const COUNTRIES_DIR: &str = "countries";
const BEST_SELLING_DIR: &str = "best_selling";

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    summary_database_url: String,
    log_file: String,
    /// 报表配置
    report: RawReportConfig,
    /// 输出配置
    output: RawOutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawReportConfig {
    /// 畅销曲目统计的流派
    genre: String,
}

impl Default for RawReportConfig {
    fn default() -> Self {
        Self {
            genre: "Rock".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawOutputConfig {
    /// 输出根目录
    dir: String,
}

impl Default for RawOutputConfig {
    fn default() -> Self {
        Self {
            dir: "output".to_string(),
        }
    }
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            summary_database_url: "sqlite://output/summary.db?mode=rwc".to_string(),
            log_file: "app.log".to_string(),
            report: RawReportConfig::default(),
            output: RawOutputConfig::default(),
        }
    }
}

/// 输出文件布局
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    pub root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn invoice_count_file(&self) -> PathBuf {
        self.root.join(NUM_INV_FILE)
    }

    pub fn item_count_file(&self) -> PathBuf {
        self.root.join(NUM_ITEMS_FILE)
    }

    /// `countries/{country}_albums.json`
    pub fn album_file(&self, country: &str) -> PathBuf {
        self.root
            .join(COUNTRIES_DIR)
            .join(format!("{}_albums.json", file_component(country)))
    }

    /// `best_selling/{country}_best_selling_{year}_and_up.xml`
    pub fn best_selling_file(&self, country: &str, year: i32) -> PathBuf {
        self.root.join(BEST_SELLING_DIR).join(format!(
            "{}_best_selling_{}_and_up.xml",
            file_component(country),
            year
        ))
    }

    /// 启动时创建输出目录
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.root.join(COUNTRIES_DIR))?;
        std::fs::create_dir_all(self.root.join(BEST_SELLING_DIR))?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

// Country names end up in file names; keep them to one path component.
fn file_component(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub summary_database_url: String,
    pub log_file: String,
    pub genre: String,
    pub output: OutputLayout,
}

impl AppConfig {
    fn new(data: RawConfig) -> Self {
        AppConfig {
            summary_database_url: data.summary_database_url,
            log_file: data.log_file,
            genre: data.report.genre,
            output: OutputLayout::new(data.output.dir),
        }
    }

    pub fn load() -> Result<AppConfig, Box<dyn Error>> {
        dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let raw: RawConfig = config.try_deserialize()?; // serde 自动填充默认值
        Ok(AppConfig::new(raw))
    }
}
