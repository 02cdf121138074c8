//! CRUD API 服务器
//!
//! 启动顺序：加载配置 → 初始化日志 → 打开存储 → 绑定监听端口。
//! 收到终止信号后停止接收请求，关闭数据库连接再退出。

use crud_api::{
    app::AppState,
    build_router,
    config::{Config, StorageBackend},
    infrastructure::{
        database::{MongoConnector, StoreError},
        logger::Logger,
    },
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("配置加载失败: {}", err);
            return ExitCode::FAILURE;
        }
    };

    Logger::init(&config.logging);
    info!("🚀 CRUD API 服务器启动中...");

    let (state, connector) = match open_storage(&config).await {
        Ok(opened) => opened,
        Err(err) => {
            error!("无法打开存储: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let exit = serve(&config, state).await;

    if let Some(connector) = connector {
        connector.close().await;
    }
    info!("服务器已停止");
    exit
}

async fn open_storage(
    config: &Config,
) -> Result<(AppState, Option<Arc<MongoConnector>>), StoreError> {
    match config.storage {
        StorageBackend::Memory => {
            info!("使用内存存储，数据不会持久化");
            Ok((AppState::in_memory(), None))
        }
        StorageBackend::MongoDb => {
            let connector = Arc::new(MongoConnector::new(config.database.clone()));
            connector.connect().await?;
            if let Err(err) = connector.ensure_indexes().await {
                // 已有重复邮箱时索引无法建立，此时只靠写前检查
                error!("创建唯一索引失败: {}", err);
            }
            let state = AppState::mongo(connector.clone()).await?;
            Ok((state, Some(connector)))
        }
    }
}

async fn serve(config: &Config, state: AppState) -> ExitCode {
    let address = config.bind_address();
    let listener = match TcpListener::bind(address.as_str()).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("无法绑定到 {}: {}", address, err);
            return ExitCode::FAILURE;
        }
    };

    let app = build_router(state, Some(config.server.static_dir.as_path()));

    info!("🚀 服务器运行在 http://{}", address);
    info!("📖 API 端点:");
    info!("   GET    /                          - API 信息");
    info!("   GET    /salud                     - 健康检查");
    info!("   *      /usuarios[/:id]            - 用户 CRUD");
    info!("   *      /productos[/:id]           - 产品 CRUD (支持 categoria, precio_min, precio_max)");
    info!("   GET    /productos/categoria/:cat  - 按类别获取产品");
    info!("   PUT    /productos/:id/stock       - 更新库存");
    info!("   GET    /app/                      - 浏览器客户端");

    match axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("服务器运行失败: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("无法监听 Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("无法监听 SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("收到终止信号，开始关闭...");
}
