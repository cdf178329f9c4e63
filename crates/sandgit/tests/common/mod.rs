//! Scripted engine and transport shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sandgit::fs::{Encoding, FileData, MkdirOptions, ReadOptions, WriteOptions};
use sandgit::{
    AuthOutcome, Author, BridgeConfig, CloneRequest, CollectingNotifier, Credential,
    CredentialPrompter, EngineIo, Error, GitContext, GitEngine, GitFs, HttpRequest, HttpResponse,
    HttpTransport, InMemorySandbox, MemoryStore, PullRequest, PushRequest, Result, async_trait,
    basic_auth_value, host_of,
};

pub const WORKDIR: &str = "/home/project";
pub const REMOTE: &str = "https://example.com/org/repo.git";

/// Transport that answers 401 until it sees the expected credential.
pub struct FakeTransport {
    accept: Option<Credential>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    /// Every request succeeds.
    pub fn public() -> Self {
        Self {
            accept: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Only requests carrying `username:password` succeed.
    pub fn private(username: &str, password: &str) -> Self {
        Self {
            accept: Some(Credential::new(username, password)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse> {
        let authorized = match &self.accept {
            None => true,
            Some(expected) => {
                request.header_value("authorization") == Some(basic_auth_value(expected).as_str())
            }
        };
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        Ok(HttpResponse {
            url,
            status: if authorized { 200 } else { 401 },
            headers: vec![],
            body: b"001e# service=git-upload-pack\n0000".to_vec(),
        })
    }
}

/// Engine that performs the smart-HTTP auth dance against the transport and
/// writes a small fixed tree.
#[derive(Default)]
pub struct FakeEngine {
    calls: Mutex<Vec<String>>,
    last_pull: Mutex<Option<PullRequest>>,
    last_clone: Mutex<Option<CloneRequest>>,
}

impl FakeEngine {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_pull(&self) -> Option<PullRequest> {
        self.last_pull.lock().unwrap().clone()
    }

    pub fn last_pull_author(&self) -> Option<Author> {
        self.last_pull().map(|r| r.author)
    }

    pub fn last_clone(&self) -> Option<CloneRequest> {
        self.last_clone.lock().unwrap().clone()
    }

    async fn discover(
        &self,
        io: EngineIo<'_>,
        url: &str,
        service: &str,
        headers: &[(String, String)],
    ) -> Result<()> {
        let mut request = HttpRequest::get(format!("{}/info/refs?service={}", url, service));
        request.headers = headers.to_vec();

        let response = io.http.request(request.clone()).await?;
        if response.is_success() {
            return Ok(());
        }

        let mut credential = match io.auth.on_auth(url).await {
            AuthOutcome::Credentials(c) => c,
            AuthOutcome::Cancelled => return Err(Error::Cancelled),
        };
        loop {
            let mut retry = request.clone();
            retry
                .headers
                .retain(|(k, _)| !k.eq_ignore_ascii_case("authorization"));
            retry
                .headers
                .push(("Authorization".to_string(), basic_auth_value(&credential)));

            if io.http.request(retry).await?.is_success() {
                io.auth.on_auth_success(url, &credential).await;
                return Ok(());
            }
            match io.auth.on_auth_failure(url, &credential).await {
                AuthOutcome::Credentials(c) => credential = c,
                AuthOutcome::Cancelled => {
                    return Err(Error::AuthFailed {
                        host: host_of(url).unwrap_or("remote").to_string(),
                    });
                }
            }
        }
    }
}

fn git_config(url: &str) -> String {
    format!(
        "[core]\n\trepositoryformatversion = 0\n[remote \"origin\"]\n\turl = {}\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n",
        url
    )
}

#[async_trait]
impl GitEngine for FakeEngine {
    async fn clone(&self, io: EngineIo<'_>, request: CloneRequest) -> Result<()> {
        self.calls.lock().unwrap().push("clone".to_string());
        *self.last_clone.lock().unwrap() = Some(request.clone());
        self.discover(io, &request.url, "git-upload-pack", &request.headers)
            .await?;

        let dir = &request.dir;
        let text = WriteOptions::encoding(Encoding::Utf8);
        io.fs
            .mkdir(&format!("{}/.git/refs/heads", dir), MkdirOptions::default())
            .await?;
        io.fs.mkdir(&format!("{}/src", dir), MkdirOptions::default()).await?;
        io.fs
            .write_file(
                &format!("{}/.git/config", dir),
                FileData::from(git_config(&request.url)),
                text,
            )
            .await?;
        io.fs
            .write_file(
                &format!("{}/.git/HEAD", dir),
                FileData::from("ref: refs/heads/main\n"),
                text,
            )
            .await?;
        io.fs
            .write_file(&format!("{}/README.md", dir), FileData::from("draft\n"), text)
            .await?;
        // Checkout overwrites the placeholder
        io.fs
            .write_file(&format!("{}/README.md", dir), FileData::from("# repo\n"), text)
            .await?;
        io.fs
            .write_file(
                &format!("{}/src/logo.bin", dir),
                FileData::from(vec![0u8, 159, 146, 150]),
                WriteOptions::default(),
            )
            .await?;
        Ok(())
    }

    async fn push(&self, io: EngineIo<'_>, request: PushRequest) -> Result<()> {
        self.calls.lock().unwrap().push("push".to_string());
        let key = format!("remote.{}.url", request.remote);
        let url = self
            .get_config(io.fs, &request.dir, &key)
            .await?
            .ok_or(Error::NoRemote)?;
        self.discover(io, &url, "git-receive-pack", &request.headers)
            .await
    }

    async fn pull(&self, io: EngineIo<'_>, request: PullRequest) -> Result<()> {
        self.calls.lock().unwrap().push("pull".to_string());
        *self.last_pull.lock().unwrap() = Some(request.clone());
        self.discover(io, &request.url, "git-upload-pack", &request.headers)
            .await?;
        io.fs
            .write_file(
                &format!("{}/CHANGELOG.md", request.dir),
                FileData::from("v2\n"),
                WriteOptions::encoding(Encoding::Utf8),
            )
            .await
    }

    async fn get_config(&self, fs: &dyn GitFs, dir: &str, path: &str) -> Result<Option<String>> {
        let Some(remote) = path
            .strip_prefix("remote.")
            .and_then(|p| p.strip_suffix(".url"))
        else {
            return Ok(None);
        };

        let config = match fs
            .read_file(
                &format!("{}/.git/config", dir),
                ReadOptions::encoding(Encoding::Utf8),
            )
            .await
        {
            Ok(FileData::Text(text)) => text,
            Ok(FileData::Bytes(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.fs_code() == Some("ENOENT") => return Ok(None),
            Err(e) => return Err(e),
        };

        let header = format!("[remote \"{}\"]", remote);
        let mut in_section = false;
        for line in config.lines() {
            let line = line.trim();
            if line.starts_with('[') {
                in_section = line == header;
            } else if in_section {
                if let Some(url) = line.strip_prefix("url = ") {
                    return Ok(Some(url.to_string()));
                }
            }
        }
        Ok(None)
    }
}

/// Prompter returning a fixed answer and counting calls.
pub struct ScriptedPrompter {
    answer: AuthOutcome,
    calls: AtomicUsize,
    hosts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn answering(username: &str, password: &str) -> Self {
        Self::new(AuthOutcome::Credentials(Credential::new(username, password)))
    }

    pub fn declining() -> Self {
        Self::new(AuthOutcome::Cancelled)
    }

    fn new(answer: AuthOutcome) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            hosts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn hosts(&self) -> Vec<String> {
        self.hosts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialPrompter for ScriptedPrompter {
    async fn prompt(&self, host: &str) -> AuthOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hosts.lock().unwrap().push(host.to_string());
        self.answer.clone()
    }
}

/// Everything a test needs to inspect after an operation.
pub struct Harness {
    pub sandbox: Arc<InMemorySandbox>,
    pub engine: Arc<FakeEngine>,
    pub transport: Arc<FakeTransport>,
    pub prompter: Arc<ScriptedPrompter>,
    pub notifier: Arc<CollectingNotifier>,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub fn new(
        sandbox: InMemorySandbox,
        transport: FakeTransport,
        prompter: ScriptedPrompter,
    ) -> Self {
        Self {
            sandbox: Arc::new(sandbox),
            engine: Arc::new(FakeEngine::default()),
            transport: Arc::new(transport),
            prompter: Arc::new(prompter),
            notifier: Arc::new(CollectingNotifier::new()),
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn context(&self, config: BridgeConfig) -> GitContext {
        GitContext::builder(
            self.sandbox.clone(),
            self.engine.clone(),
            self.transport.clone(),
        )
        .credential_store(self.store.clone())
        .prompter(self.prompter.clone())
        .notifier(self.notifier.clone())
        .config(config)
        .build()
    }
}

/// Sandbox that already holds a clone of [`REMOTE`].
pub fn cloned_sandbox() -> InMemorySandbox {
    InMemorySandbox::new(WORKDIR)
        .with_file(".git/config", git_config(REMOTE))
        .with_file(".git/HEAD", "ref: refs/heads/main\n")
        .with_file("README.md", "# repo\n")
}
