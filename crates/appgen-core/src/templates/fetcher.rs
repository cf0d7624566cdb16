//! Template retrieval: branch archive first, SSH clone as the fallback
//!
//! The primary path downloads the branch as a zip over HTTPS and extracts only
//! the requested template folder, so no git metadata or local state is
//! involved. When that fails for any reason, the whole repository is
//! shallow-cloned over SSH into a temporary directory and the template folder
//! is copied out of it. There is no further retry.

use super::copier;
use super::source::TemplateRepo;
use crate::error::{describe_exit, Result, ScaffoldError};
use crate::product::ProductConfig;
use crate::runtime::{CommandRunner, ShellCommand};
use std::fmt;
use std::fs;
use std::path::Path;
use url::Url;

/// Downloads the branch archive used by the primary path
#[allow(async_fn_in_trait)]
pub trait ArchiveClient {
    async fn download(&self, url: &Url) -> anyhow::Result<Vec<u8>>;
}

/// Archive client backed by `reqwest`
pub struct HttpArchiveClient {
    client: reqwest::Client,
}

impl HttpArchiveClient {
    /// Create a new client with a custom user agent
    pub fn new(user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl ArchiveClient for HttpArchiveClient {
    async fn download(&self, url: &Url) -> anyhow::Result<Vec<u8>> {
        tracing::debug!(%url, "downloading template archive");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to download {}: {}", url, e))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to download {}: HTTP {}", url, response.status());
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Which path produced the template files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMethod {
    Archive,
    GitClone,
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMethod::Archive => write!(f, "archive download"),
            FetchMethod::GitClone => write!(f, "git clone"),
        }
    }
}

/// Result of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub method: FetchMethod,
    /// Written paths, relative to the destination
    pub files: Vec<String>,
}

/// Template fetcher - retrieves one template folder into a destination
pub struct TemplateFetcher<A = HttpArchiveClient> {
    repo: TemplateRepo,
    archive_url: Url,
    client: A,
}

impl TemplateFetcher<HttpArchiveClient> {
    /// Create a fetcher from a product config, honouring its env overrides
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let repo = config.template_repo()?;
        let archive_url = match config.archive_url_override()? {
            Some(url) => url,
            None => repo.archive_url()?,
        };
        Ok(Self::new(
            repo,
            archive_url,
            HttpArchiveClient::new(config.user_agent()),
        ))
    }
}

impl<A: ArchiveClient> TemplateFetcher<A> {
    pub fn new(repo: TemplateRepo, archive_url: Url, client: A) -> Self {
        Self {
            repo,
            archive_url,
            client,
        }
    }

    pub fn repo(&self) -> &TemplateRepo {
        &self.repo
    }

    /// Retrieve `template_id` into `destination`, creating it if needed
    pub async fn fetch<R: CommandRunner>(
        &self,
        runner: &R,
        template_id: &str,
        destination: &Path,
    ) -> Result<FetchOutcome> {
        fs::create_dir_all(destination).map_err(|e| ScaffoldError::io(destination, e))?;

        let primary_error = match self.fetch_archive(template_id, destination).await {
            Ok(files) => {
                return Ok(FetchOutcome {
                    method: FetchMethod::Archive,
                    files,
                })
            }
            Err(e) => e,
        };

        tracing::warn!(
            template = template_id,
            error = %primary_error,
            "archive download failed, falling back to git clone"
        );

        let files = self
            .fetch_with_git(runner, template_id, destination, &primary_error)
            .await?;
        Ok(FetchOutcome {
            method: FetchMethod::GitClone,
            files,
        })
    }

    async fn fetch_archive(&self, template_id: &str, destination: &Path) -> anyhow::Result<Vec<String>> {
        let bytes = self.client.download(&self.archive_url).await?;
        copier::extract_template(&bytes, &self.repo.template_path(template_id), destination)
    }

    async fn fetch_with_git<R: CommandRunner>(
        &self,
        runner: &R,
        template_id: &str,
        destination: &Path,
        primary_error: &anyhow::Error,
    ) -> Result<Vec<String>> {
        let fetch_error = |fallback: String| ScaffoldError::Fetch {
            template: template_id.to_string(),
            primary: format!("{:#}", primary_error),
            fallback,
        };

        let temp = tempfile::Builder::new()
            .prefix("generate-app-tpl-")
            .tempdir()
            .map_err(|e| fetch_error(format!("could not create a temporary directory: {}", e)))?;
        let clone_dir = temp.path().join(&self.repo.repo);

        let clone = ShellCommand::new("git")
            .args(["clone", "--depth=1", "-b"])
            .arg(self.repo.branch.as_str())
            .arg(self.repo.ssh_url())
            .arg(clone_dir.as_os_str());
        let clone_result = runner.run(&clone, None).await;

        let source_dir = clone_dir.join(&self.repo.subdir).join(template_id);
        if !source_dir.is_dir() {
            let clone_error = match &clone_result {
                Ok(status) if status.success() => None,
                Ok(status) => Some(format!(
                    "`{}` failed ({})",
                    clone,
                    describe_exit(&status.code)
                )),
                Err(e) => Some(e.to_string()),
            };
            if let Some(cause) = &clone_error {
                tracing::warn!(template = template_id, %cause, "git clone failed");
            }
            return Err(ScaffoldError::TemplateNotFound {
                template: self.repo.template_path(template_id),
                branch: self.repo.branch.clone(),
                clone_error,
            });
        }

        match clone_result {
            Ok(status) if status.success() => {}
            Ok(status) => {
                return Err(fetch_error(format!(
                    "`{}` failed ({})",
                    clone,
                    describe_exit(&status.code)
                )))
            }
            Err(e) => return Err(fetch_error(e.to_string())),
        }

        let files = copier::copy_dir(&source_dir, destination)
            .map_err(|e| fetch_error(format!("{:#}", e)))?;

        if let Err(e) = temp.close() {
            tracing::warn!(error = %e, "failed to remove temporary clone");
        }

        Ok(files)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted archive client for fault injection

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued responses; once the queue is empty every call fails
    pub struct ScriptedArchive {
        responses: Mutex<VecDeque<anyhow::Result<Vec<u8>>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedArchive {
        pub fn new(responses: Vec<anyhow::Result<Vec<u8>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(0),
            }
        }

        pub fn serving(bytes: Vec<u8>) -> Self {
            Self::new(vec![Ok(bytes)])
        }

        pub fn failing_once() -> Self {
            Self::new(vec![Err(anyhow::anyhow!("HTTP 404 Not Found"))])
        }

        pub fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl ArchiveClient for ScriptedArchive {
        async fn download(&self, _url: &Url) -> anyhow::Result<Vec<u8>> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted response left")))
        }
    }

    pub fn fetcher(client: ScriptedArchive) -> TemplateFetcher<ScriptedArchive> {
        let repo = TemplateRepo::new("acme", "starters", "main");
        let url = repo.archive_url().unwrap();
        TemplateFetcher::new(repo, url, client)
    }

    /// The directory a recorded `git clone` was asked to write into
    pub fn clone_target(command: &ShellCommand) -> std::path::PathBuf {
        command
            .get_args()
            .last()
            .map(std::path::PathBuf::from)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{clone_target, fetcher, ScriptedArchive};
    use super::*;
    use crate::runtime::command::testing::RecordingRunner;
    use crate::templates::copier::testing::archive;

    /// Simulates a clone that lays down the given files under the target
    fn cloning(files: &'static [&'static str], exit_code: i32) -> RecordingRunner {
        RecordingRunner::with_hook(move |command, _| {
            let target = clone_target(command);
            for file in files {
                let path = target.join(file);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, "cloned").unwrap();
            }
            Some(exit_code)
        })
    }

    #[tokio::test]
    async fn test_primary_success_never_clones() {
        let zip = archive(&[("starters-main/project-templates/nextjs/package.json", "{}")]);
        let fetcher = fetcher(ScriptedArchive::serving(zip));
        let runner = RecordingRunner::succeeding();
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("demo");

        let outcome = fetcher.fetch(&runner, "nextjs", &dest).await.unwrap();

        assert_eq!(outcome.method, FetchMethod::Archive);
        assert_eq!(outcome.files, vec!["package.json"]);
        assert!(runner.commands().is_empty());
        assert!(dest.join("package.json").exists());
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_to_clone() {
        let client = ScriptedArchive::failing_once();
        let fetcher = fetcher(client);
        let runner = cloning(
            &[
                "project-templates/react/package.json",
                "project-templates/react/src/App.jsx",
                ".git/HEAD",
            ],
            0,
        );
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("demo");

        let outcome = fetcher.fetch(&runner, "react", &dest).await.unwrap();

        assert_eq!(outcome.method, FetchMethod::GitClone);
        assert_eq!(fetcher.client.calls(), 1);

        let commands = runner.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("git clone --depth=1 -b main git@github.com:acme/starters.git "));

        assert!(dest.join("package.json").exists());
        assert!(dest.join("src/App.jsx").exists());
        assert!(!dest.join(".git").exists());

        // Temporary clone is gone afterwards
        let clone_dir = commands[0].rsplit(' ').next().unwrap();
        assert!(!Path::new(clone_dir).exists());
    }

    #[tokio::test]
    async fn test_archive_without_template_falls_back() {
        let zip = archive(&[("starters-main/project-templates/react/package.json", "{}")]);
        let fetcher = fetcher(ScriptedArchive::serving(zip));
        let runner = cloning(&["project-templates/nextjs-tailwind/package.json"], 0);
        let temp = tempfile::TempDir::new().unwrap();

        let outcome = fetcher
            .fetch(&runner, "nextjs-tailwind", &temp.path().join("app"))
            .await
            .unwrap();

        assert_eq!(outcome.method, FetchMethod::GitClone);
        assert_eq!(runner.commands().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_subdirectory_after_clone_is_template_not_found() {
        let fetcher = fetcher(ScriptedArchive::failing_once());
        let runner = cloning(&["project-templates/react/package.json"], 0);
        let temp = tempfile::TempDir::new().unwrap();

        let err = fetcher
            .fetch(&runner, "nextjs", &temp.path().join("demo"))
            .await
            .unwrap_err();

        match err {
            ScaffoldError::TemplateNotFound {
                template,
                branch,
                clone_error,
            } => {
                assert_eq!(template, "project-templates/nextjs");
                assert_eq!(branch, "main");
                assert!(clone_error.is_none());
            }
            other => panic!("expected TemplateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_clone_without_subdirectory_is_template_not_found() {
        let fetcher = fetcher(ScriptedArchive::failing_once());
        let runner = cloning(&[], 128);
        let temp = tempfile::TempDir::new().unwrap();

        let err = fetcher
            .fetch(&runner, "react", &temp.path().join("demo"))
            .await
            .unwrap_err();

        match &err {
            ScaffoldError::TemplateNotFound { clone_error, .. } => {
                let cause = clone_error.as_deref().unwrap_or_default();
                assert!(cause.starts_with("`git clone --depth=1"));
                assert!(cause.ends_with("failed (exit code 128)"));
            }
            other => panic!("expected TemplateNotFound, got {other:?}"),
        }
        assert!(err.to_string().contains("git clone failed"));
    }

    #[tokio::test]
    async fn test_failed_clone_with_subdirectory_is_fetch_error() {
        let fetcher = fetcher(ScriptedArchive::failing_once());
        let runner = cloning(&["project-templates/react/package.json"], 128);
        let temp = tempfile::TempDir::new().unwrap();

        let err = fetcher
            .fetch(&runner, "react", &temp.path().join("demo"))
            .await
            .unwrap_err();

        match err {
            ScaffoldError::Fetch {
                template, primary, ..
            } => {
                assert_eq!(template, "react");
                assert!(primary.contains("404"));
            }
            other => panic!("expected Fetch, got {other:?}"),
        }
    }

    /// Serves one canned HTTP response on a local port
    async fn serve_once(response: &'static str) -> Url {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        Url::parse(&format!("http://{}/starters.zip", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_http_client_returns_body_on_success() {
        let url = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 3\r\nConnection: close\r\n\r\nzip").await;

        let body = HttpArchiveClient::new("generate-app-test")
            .download(&url)
            .await
            .unwrap();

        assert_eq!(body, b"zip");
    }

    #[tokio::test]
    async fn test_http_client_rejects_error_status() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;

        let err = HttpArchiveClient::new("generate-app-test")
            .download(&url)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_http_client_reports_transport_error() {
        // Bind then drop, so nothing is listening on the port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = Url::parse(&format!("http://{}/starters.zip", addr)).unwrap();

        let err = HttpArchiveClient::new("generate-app-test")
            .download(&url)
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Failed to download"));
    }

    #[tokio::test]
    async fn test_destination_created_even_when_everything_fails() {
        let fetcher = fetcher(ScriptedArchive::failing_once());
        let runner = cloning(&[], 128);
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("a/b/demo");

        let _ = fetcher.fetch(&runner, "react", &dest).await;

        assert!(dest.is_dir());
    }
}
