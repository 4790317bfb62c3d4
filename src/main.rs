use anyhow::Result;
use repo_rubric_check::utils::logging;
use repo_rubric_check::{App, Config, EnvSecretStore};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config, EnvSecretStore).await?;
    if let Err(e) = app.run().await {
        tracing::error!("❌ 运行中止: {:#}", e);
        return Err(e);
    }

    Ok(())
}
