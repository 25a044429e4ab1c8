//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `SOC__*` 覆盖（双下划线表示嵌套，如 `SOC__LLM__PROVIDER=mock`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub agent: AgentSection,
    #[serde(default)]
    pub training: TrainingSection,
}

/// [app] 段：应用名、演练报告输出目录
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    pub name: Option<String>,
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            report_dir: default_report_dir(),
        }
    }
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

/// [llm] 段：叙事后端选择、采样温度、超时与重试
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 后端：openrouter / openai / mock
    #[serde(default = "default_provider")]
    pub provider: String,
    /// 模型名；未设置时读取 OPENROUTER_MODEL / OPENAI_MODEL
    pub model: Option<String>,
    pub base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub timeouts: LlmTimeoutsSection,
    #[serde(default)]
    pub retry: LlmRetrySection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
            temperature: default_temperature(),
            timeouts: LlmTimeoutsSection::default(),
            retry: LlmRetrySection::default(),
        }
    }
}

fn default_provider() -> String {
    "openrouter".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmTimeoutsSection {
    /// 单次叙事请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self {
            request: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmRetrySection {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for LlmRetrySection {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    500
}

/// [agent] 段：Q-learning 超参数
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSection {
    /// 学习率
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// 折扣因子
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    /// 探索概率
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// 固定随机种子（探索与场景抽样可复现）
    pub seed: Option<u64>,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            gamma: default_gamma(),
            epsilon: default_epsilon(),
            seed: None,
        }
    }
}

fn default_alpha() -> f64 {
    0.15
}

fn default_gamma() -> f64 {
    0.95
}

fn default_epsilon() -> f64 {
    0.3
}

/// [training] 段：回合数、单回合步数上限、进度日志间隔、连续失败上限
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingSection {
    #[serde(default = "default_episodes")]
    pub episodes: usize,
    #[serde(default = "default_max_steps_per_episode")]
    pub max_steps_per_episode: usize,
    #[serde(default = "default_report_every")]
    pub report_every: usize,
    /// 连续多少个回合因叙事服务失败而中止后放弃训练
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: usize,
    /// 训练摘要 JSON 输出路径（可选）
    pub summary_path: Option<PathBuf>,
}

impl Default for TrainingSection {
    fn default() -> Self {
        Self {
            episodes: default_episodes(),
            max_steps_per_episode: default_max_steps_per_episode(),
            report_every: default_report_every(),
            max_consecutive_failures: default_max_consecutive_failures(),
            summary_path: None,
        }
    }
}

fn default_episodes() -> usize {
    30
}

fn default_max_steps_per_episode() -> usize {
    12
}

fn default_report_every() -> usize {
    5
}

fn default_max_consecutive_failures() -> usize {
    3
}

/// 从 config 目录加载配置，环境变量 SOC__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 SOC__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SOC")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
