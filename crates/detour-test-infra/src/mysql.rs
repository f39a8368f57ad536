use crate::{Result, TestInfraError};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MYSQL_IMAGE: &str = "mysql";
const MYSQL_TAG: &str = "8.4";
const MYSQL_PORT: u16 = 3306;
const CONNECT_ATTEMPTS: u32 = 20;
const CONNECT_BACKOFF: Duration = Duration::from_millis(500);

/// Credentials and pool size for a [`MySqlServer`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MysqlConfig {
    #[builder(default = 5)]
    max_connections: u32,
    #[builder(default = "detour".to_string())]
    database: String,
    #[builder(default = "detour".to_string())]
    username: String,
    #[builder(default = "detour".to_string())]
    password: String,
}

/// Test fixture for a disposable MySQL server.
///
/// The container is stopped when the fixture is dropped.
pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
    config: MysqlConfig,
}

impl MySqlServer {
    /// Starts a MySQL container and waits for its startup log line.
    pub async fn new(config: MysqlConfig) -> Result<Self> {
        let container = GenericImage::new(MYSQL_IMAGE, MYSQL_TAG)
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"))
            .with_env_var("MYSQL_DATABASE", config.database.as_str())
            .with_env_var("MYSQL_USER", config.username.as_str())
            .with_env_var("MYSQL_PASSWORD", config.password.as_str())
            .with_env_var("MYSQL_ROOT_PASSWORD", "root")
            .start()
            .await?;

        Ok(Self { container, config })
    }

    pub async fn database_url(&self) -> Result<String> {
        let host = self.container.get_host().await?;
        let port = self.container.get_host_port_ipv4(MYSQL_PORT).await?;
        Ok(format!(
            "mysql://{}:{}@{}:{}/{}",
            self.config.username, self.config.password, host, port, self.config.database
        ))
    }

    /// Opens a connection pool, retrying while the server finishes booting.
    ///
    /// The "ready for connections" log line is printed once by the temporary
    /// init server as well, so the first attempts may still be refused.
    pub async fn connect(&self) -> Result<MySqlPool> {
        let url = self.database_url().await?;
        let mut attempt = 1;

        loop {
            let result = MySqlPoolOptions::new()
                .max_connections(self.config.max_connections)
                .connect(&url)
                .await;

            match result {
                Ok(pool) => return Ok(pool),
                Err(source) if attempt >= CONNECT_ATTEMPTS => {
                    return Err(TestInfraError::NotReady {
                        attempts: attempt,
                        source,
                    });
                }
                Err(_) => {
                    attempt += 1;
                    tokio::time::sleep(CONNECT_BACKOFF).await;
                }
            }
        }
    }
}
