//! 数据库初始数据填充
//!
//! 单独运行，不依赖服务器进程。无论成功与否都会关闭数据库连接。

use crud_api::{
    app::{
        products::mongo::MongoProductRepository, seed::seed, users::mongo::MongoUserRepository,
    },
    config::Config,
    infrastructure::{
        database::{MongoConnector, StoreError},
        logger::Logger,
    },
};
use std::process::ExitCode;
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

    info!("🌱 开始填充数据库...");
    let connector = MongoConnector::new(config.database.clone());

    let result = run(&connector).await;
    connector.close().await;

    match result {
        Ok(()) => {
            info!("🎉 数据库填充完成");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("❌ 填充数据库失败: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(connector: &MongoConnector) -> Result<(), StoreError> {
    let database = connector.connect().await?;
    let users = MongoUserRepository::new(&database);
    let products = MongoProductRepository::new(&database);

    let report = seed(&users, &products).await?;
    info!(
        "插入用户 {} 个，产品 {} 个",
        report.users_inserted, report.products_inserted
    );
    Ok(())
}
