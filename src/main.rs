use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use infra::config::{AppConfigImpl, LogConfig};
use infra::repository::postgres::schema::create_artist_table;
use log::info;
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::io;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {m}{n}";

fn to_io_error<E: std::fmt::Display>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

/// 配置日志同时输出到控制台和文件，RUST_LOG 优先于配置文件中的级别
fn init_logger(log_cfg: &LogConfig) -> io::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| log_cfg.level.clone());

    let mut builder = Config::builder().appender(Appender::builder().build(
        "stdout",
        Box::new(
            ConsoleAppender::builder()
                .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
                .build(),
        ),
    ));
    let mut root = Root::builder().appender("stdout");

    if let Some(path) = &log_cfg.file {
        let file_appender = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(path)?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file_appender)));
        root = root.appender("file");
    }

    let config = builder
        .build(root.build(log_level.parse().unwrap_or(log::LevelFilter::Info)))
        .map_err(to_io_error)?;

    log4rs::init_config(config).map_err(to_io_error)?;
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cfg = AppConfigImpl::load().map_err(to_io_error)?;
    init_logger(&cfg.log())?;

    let server_cfg = cfg.server();
    let db_cfg = cfg.database();
    let db = server::AppState::init_db(&db_cfg)
        .await
        .map_err(to_io_error)?;
    if db_cfg.create_schema {
        create_artist_table(&db).await.map_err(to_io_error)?;
    }

    let app_state = web::Data::new(server::AppState::new(db, cfg));
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .configure(server::native_api::configure_service)
            .default_service(web::route().to(server::error::page_not_found))
            .wrap(server::middleware::other::cors())
    })
    .bind((server_cfg.host.as_str(), server_cfg.port))?;

    info!(
        "Server up and running on {}:{}",
        server_cfg.host, server_cfg.port
    );
    server.run().await
}
