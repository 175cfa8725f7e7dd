use order_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment()?;

    // 打印横幅
    print_banner();

    tracing::info!("Order server starting...");

    // 2. 加载配置
    let config = Config::from_env();
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        http_port = config.http_port,
        backend = ?config.backend.kind,
        default_payment_method = %config.default_payment_method,
        "Configuration loaded"
    );

    // 3. 初始化服务器状态 (schema 不兼容时直接退出)
    let state = match ServerState::initialize(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            return Err(e.into());
        }
    };

    // 4. 启动 HTTP 服务器 (Server::run 会自动启动后台任务)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
