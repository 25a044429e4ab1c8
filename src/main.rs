//! SOC Trainer - 训练入口
//!
//! 初始化日志、加载配置、创建叙事客户端（凭据问题在此即失败），训练 Q-learning Agent 并输出贪心评估结果。
//! 用法：`soc-trainer [config.toml]`

use std::path::PathBuf;

use anyhow::Context;
use soc_trainer::config::load_config;
use soc_trainer::llm::create_llm_from_config;
use soc_trainer::rl::{AgentParams, QLearningAgent, Trainer};
use soc_trainer::{observability, IncidentEnv};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path).context("Failed to load config")?;

    let llm = create_llm_from_config(&cfg).context("Failed to initialize narrative client")?;

    let mut env = IncidentEnv::new(llm);
    let mut agent = QLearningAgent::new(AgentParams::from(&cfg.agent));
    if let Some(seed) = cfg.agent.seed {
        env = env.with_seed(seed);
        agent = agent.with_seed(seed.wrapping_add(1));
    }

    let mut trainer = Trainer::new(env, agent, cfg.training.clone());
    let summary = trainer.train().await.context("Training failed")?;

    println!("\nGreedy policy evaluation ({}):", summary.evaluation.scenario);
    for (i, (action, reward)) in summary
        .evaluation
        .actions
        .iter()
        .zip(&summary.evaluation.rewards)
        .enumerate()
    {
        println!("Step {} | action: {} | reward: {:.2}", i + 1, action, reward);
    }
    println!(
        "Eval total reward: {:.2}, success={}",
        summary.evaluation.total_reward, summary.evaluation.success
    );
    println!(
        "Training success rate: {:.0}% ({} aborted, {} states learned, {} narrator tokens)",
        summary.success_rate() * 100.0,
        summary.aborted_episodes,
        summary.states_learned,
        summary.total_tokens
    );

    if let Some(path) = &cfg.training.summary_path {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        tracing::info!("Training summary written to {}", path.display());
    }

    Ok(())
}
