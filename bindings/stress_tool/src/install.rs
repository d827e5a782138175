//! Fetches the Apache Cassandra binary distribution that ships the reference `cassandra-stress`.

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use crosscheck_runner::prelude::HarnessResult;

/// The reimplementation follows the 3.x generation logic, which changed in Cassandra 4.0.0.
pub const DEFAULT_CASSANDRA_VERSION: &str = "3.11.16";
pub const DEFAULT_DOWNLOAD_DIR: &str = "cassandra-download";
pub const CASSANDRA_MIRROR: &str = "https://dlcdn.apache.org/cassandra";

/// Environment variable to use an existing `cassandra-stress` executable instead of downloading one.
pub const CASSANDRA_STRESS_PATH_ENV: &str = "CROSSCHECK_CASSANDRA_STRESS_PATH";

/// Makes a given Cassandra version available under `download_dir`.
///
/// Nothing is cached in memory: [CassandraInstaller::install] looks at the filesystem each time and
/// is meant to be called once at startup.
#[derive(Debug, Clone)]
pub struct CassandraInstaller {
    version: String,
    download_dir: PathBuf,
    mirror: String,
}

impl Default for CassandraInstaller {
    fn default() -> Self {
        Self::new(DEFAULT_CASSANDRA_VERSION, DEFAULT_DOWNLOAD_DIR)
    }
}

impl CassandraInstaller {
    pub fn new(version: impl Into<String>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            version: version.into(),
            download_dir: download_dir.into(),
            mirror: CASSANDRA_MIRROR.to_string(),
        }
    }

    /// Download from another Apache mirror. The layout below the base URL must match.
    pub fn with_mirror(mut self, mirror: impl Into<String>) -> Self {
        self.mirror = mirror.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn install_dir(&self) -> PathBuf {
        self.download_dir
            .join(format!("apache-cassandra-{}", self.version))
    }

    pub fn archive_path(&self) -> PathBuf {
        self.download_dir
            .join(format!("apache-cassandra-{}-bin.tar.gz", self.version))
    }

    /// The archive is written here while downloading and renamed once complete.
    pub fn partial_download_path(&self) -> PathBuf {
        let mut path = self.archive_path().into_os_string();
        path.push(".part");
        PathBuf::from(path)
    }

    pub fn download_url(&self) -> String {
        format!(
            "{mirror}/{version}/apache-cassandra-{version}-bin.tar.gz",
            mirror = self.mirror.trim_end_matches('/'),
            version = self.version
        )
    }

    pub fn executable_path(&self) -> PathBuf {
        self.install_dir()
            .join("tools")
            .join("bin")
            .join("cassandra-stress")
    }

    /// Resolve the `cassandra-stress` executable, downloading and unpacking Cassandra if needed.
    ///
    /// An existing install directory is trusted as is. Otherwise the archive is downloaded unless
    /// it is already present, then always extracted.
    pub fn install(&self) -> HarnessResult<PathBuf> {
        if let Some(path) = executable_override()? {
            log::info!("Using cassandra-stress from {CASSANDRA_STRESS_PATH_ENV}: {}", path.display());
            return Ok(path);
        }

        let install_dir = self.install_dir();
        if install_dir.exists() {
            log::info!(
                "Cassandra {} already installed. Skipping the download phase.",
                self.version
            );
            return Ok(self.executable_path());
        }

        std::fs::create_dir_all(&self.download_dir).with_context(|| {
            format!(
                "Failed to create download directory '{}'",
                self.download_dir.display()
            )
        })?;

        let archive = self.archive_path();
        if archive.exists() {
            log::info!("Found {}, not downloading it again", archive.display());
        } else {
            self.download(&archive)?;
        }

        self.extract(&archive, &install_dir)?;

        Ok(self.executable_path())
    }

    fn download(&self, archive: &Path) -> HarnessResult<()> {
        let url = self.download_url();
        let partial = self.partial_download_path();
        if partial.exists() {
            log::info!("Discarding incomplete download {}", partial.display());
            std::fs::remove_file(&partial)
                .with_context(|| format!("Failed to remove '{}'", partial.display()))?;
        }
        log::info!(
            "Fetching cassandra {} to {}",
            self.version,
            self.download_dir.display()
        );

        let agent = ureq::config::Config::builder()
            .timeout_global(Some(Duration::from_secs(600)))
            .build()
            .new_agent();
        let response = agent
            .get(&url)
            .call()
            .with_context(|| format!("Failed to download {url}"))?;

        let mut body = response.into_body();

        let written = File::create(&partial)
            .with_context(|| format!("Failed to create '{}'", partial.display()))
            .and_then(|mut writer| {
                std::io::copy(&mut body.as_reader(), &mut writer).context("Failed to write archive")
            })
            .and_then(|_| {
                std::fs::rename(&partial, archive)
                    .with_context(|| format!("Failed to move '{}' into place", partial.display()))
            });
        if let Err(err) = written {
            std::fs::remove_file(&partial).ok();
            return Err(err);
        }

        Ok(())
    }

    fn extract(&self, archive: &Path, install_dir: &Path) -> HarnessResult<()> {
        log::info!("Extracting cassandra {}", self.version);

        let file = File::open(archive)
            .with_context(|| format!("Failed to open '{}'", archive.display()))?;
        let mut tarball = tar::Archive::new(flate2::read::GzDecoder::new(file));
        if let Err(err) = tarball
            .unpack(&self.download_dir)
            .with_context(|| format!("Failed to extract '{}'", archive.display()))
        {
            // A half-extracted directory would be mistaken for a complete install next time.
            std::fs::remove_dir_all(install_dir).ok();
            return Err(err);
        }

        if !install_dir.exists() {
            bail!(
                "'{}' did not contain '{}'",
                archive.display(),
                install_dir.display()
            );
        }

        log::info!("Extracted cassandra to {}", install_dir.display());
        Ok(())
    }
}

fn executable_override() -> HarnessResult<Option<PathBuf>> {
    match env::var(CASSANDRA_STRESS_PATH_ENV) {
        Ok(value) if value.is_empty() => {
            bail!("'{CASSANDRA_STRESS_PATH_ENV}' set to empty string");
        }
        Ok(value) => {
            let path = PathBuf::from(value);
            if !path.exists() {
                bail!(
                    "Path to cassandra-stress overwritten with '{CASSANDRA_STRESS_PATH_ENV}={}' but that path doesn't exist",
                    path.display()
                );
            }
            Ok(Some(path))
        }
        Err(_) => Ok(None),
    }
}
