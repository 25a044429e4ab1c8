//! soc-drill：命令行人工演练
//!
//! 从 stdin 逐行读取动作标识，打印分析员视图；事件结束后输出评分并把 Markdown 报告写入 [app].report_dir。
//! 特殊命令：`reset` 重新开始，`quit` 退出。

use std::io::Write;

use anyhow::Context;
use soc_trainer::config::load_config;
use soc_trainer::core::SimError;
use soc_trainer::llm::create_llm_from_config;
use soc_trainer::report::MarkdownReportRenderer;
use soc_trainer::scenario::available_actions;
use soc_trainer::session::DrillSession;
use soc_trainer::{observability, IncidentEnv};
use tokio::io::{AsyncBufReadExt, BufReader};

fn print_prompt() {
    let names: Vec<&str> = available_actions().iter().map(|a| a.as_str()).collect();
    print!("\nActions: {}\n> ", names.join(", "));
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).context("Failed to load config")?;
    let llm = create_llm_from_config(&cfg).context("Failed to initialize narrative client")?;

    let mut env = IncidentEnv::new(llm);
    if let Some(seed) = cfg.agent.seed {
        env = env.with_seed(seed);
    }
    let mut session = DrillSession::new(env);

    println!("Analyst view:\n{}", session.start().await?);
    print_prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {}
            "quit" => break,
            "reset" => println!("Analyst view:\n{}", session.start().await?),
            action => match session.act(action).await {
                Ok(outcome) => {
                    println!("\n{}", outcome.observation);
                    if outcome.done {
                        let score = session.score();
                        println!(
                            "\nIncident ended. Final Score: {}/100 - {}",
                            score.score, score.tier
                        );
                        for item in &score.feedback {
                            println!("  - {item}");
                        }
                        let path = session
                            .write_report(&MarkdownReportRenderer, &cfg.app.report_dir)
                            .context("Failed to write report")?;
                        println!("Report: {}", path.display());
                        println!("Type `reset` for a new incident or `quit` to exit.");
                    }
                }
                Err(e @ (SimError::InvalidArgument(_) | SimError::IllegalState(_))) => {
                    println!("{e}");
                }
                Err(e @ SimError::CollaboratorUnavailable(_)) => {
                    println!("{e}");
                    println!("Incident aborted. Type `reset` for a new incident or `quit` to exit.");
                }
                Err(e) => return Err(e).context("Drill step failed"),
            },
        }
        print_prompt();
    }

    Ok(())
}
