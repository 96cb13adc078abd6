//! Configuration types for publishing a docs folder to a wiki.
//!
//! All publish behaviour is controlled through [`PublishConfig`], built via
//! its [`PublishConfigBuilder`]. Defaults reproduce the GitHub Action the
//! tool grew out of: clone `<repo>.wiki.git` into `wiki-repo`, copy pages
//! and images, commit as "GitHub Action" and push.

use crate::error::WikiPublishError;
use crate::pipeline::git::WikiRemote;
use crate::pipeline::rewrite::LinkMode;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Image extensions copied alongside the Markdown pages.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg"];

/// Configuration for a publish run.
///
/// Built via [`PublishConfig::builder()`] or using
/// [`PublishConfig::default()`].
///
/// # Example
/// ```rust
/// use wiki_publish::{LinkMode, PublishConfig};
///
/// let config = PublishConfig::builder()
///     .docs_folder("docs")
///     .repository("octo/project")
///     .token("ghp_example")
///     .link_mode(LinkMode::Join)
///     .build()
///     .unwrap();
/// assert_eq!(config.wiki_dir.to_str(), Some("wiki-repo"));
/// ```
#[derive(Clone)]
pub struct PublishConfig {
    /// Folder whose Markdown and images are published. Default: `docs`.
    pub docs_folder: PathBuf,

    /// Where the wiki is checked out. Default: `wiki-repo`.
    ///
    /// An existing checkout is reused instead of cloned again, so repeated
    /// local runs do not need a fresh clone.
    pub wiki_dir: PathBuf,

    /// `owner/repo` of the source repository; the wiki remote is derived
    /// from it. Required for cloning unless [`Self::wiki_url`] is set.
    pub repository: Option<String>,

    /// Base URL of the git host. Default: `https://github.com`.
    pub server_url: String,

    /// Explicit wiki remote (URL or local path). Overrides the derived one.
    pub wiki_url: Option<String>,

    /// Access token embedded in HTTP(S) clone URLs as `x-access-token`.
    pub token: Option<String>,

    /// Direction in which image links are rewritten. Default: [`LinkMode::Join`].
    pub link_mode: LinkMode,

    /// Image extensions to copy, without the dot.
    pub image_extensions: Vec<String>,

    /// Commit message. Default: `Update wiki content`.
    pub commit_message: String,

    /// Committer name. Default: `GitHub Action`.
    pub author_name: String,

    /// Committer email. Default: `action@github.com`.
    pub author_email: String,

    /// Number of files copied or rewritten at once. Default: 8.
    pub concurrency: usize,

    /// Clone the wiki when `wiki_dir` is not already a checkout. Default: true.
    pub clone: bool,

    /// Stage and commit the result. Default: true.
    pub commit: bool,

    /// Push the commit. Default: true.
    pub push: bool,

    /// Optional per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            docs_folder: PathBuf::from("docs"),
            wiki_dir: PathBuf::from("wiki-repo"),
            repository: None,
            server_url: "https://github.com".to_string(),
            wiki_url: None,
            token: None,
            link_mode: LinkMode::default(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            commit_message: "Update wiki content".to_string(),
            author_name: "GitHub Action".to_string(),
            author_email: "action@github.com".to_string(),
            concurrency: 8,
            clone: true,
            commit: true,
            push: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishConfig")
            .field("docs_folder", &self.docs_folder)
            .field("wiki_dir", &self.wiki_dir)
            .field("repository", &self.repository)
            .field("server_url", &self.server_url)
            .field("wiki_url", &self.wiki_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("link_mode", &self.link_mode)
            .field("image_extensions", &self.image_extensions)
            .field("commit_message", &self.commit_message)
            .field("concurrency", &self.concurrency)
            .field("clone", &self.clone)
            .field("commit", &self.commit)
            .field("push", &self.push)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn PublishProgressCallback>"),
            )
            .finish()
    }
}

impl PublishConfig {
    /// Create a new builder for `PublishConfig`.
    pub fn builder() -> PublishConfigBuilder {
        PublishConfigBuilder {
            config: Self::default(),
        }
    }

    /// The wiki remote, if one can be determined.
    pub fn remote(&self) -> Option<WikiRemote> {
        let token = self.token.as_deref();
        if let Some(ref url) = self.wiki_url {
            return Some(WikiRemote::explicit(url.clone(), token));
        }
        self.repository
            .as_deref()
            .map(|repo| WikiRemote::github(&self.server_url, repo, token))
    }
}

/// Builder for [`PublishConfig`].
#[derive(Debug)]
pub struct PublishConfigBuilder {
    config: PublishConfig,
}

impl PublishConfigBuilder {
    pub fn docs_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.docs_folder = path.into();
        self
    }

    pub fn wiki_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.wiki_dir = path.into();
        self
    }

    pub fn repository(mut self, repo: impl Into<String>) -> Self {
        self.config.repository = Some(repo.into());
        self
    }

    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = url.into();
        self
    }

    pub fn wiki_url(mut self, url: impl Into<String>) -> Self {
        self.config.wiki_url = Some(url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    pub fn link_mode(mut self, mode: LinkMode) -> Self {
        self.config.link_mode = mode;
        self
    }

    pub fn image_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.image_extensions = exts
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn commit_message(mut self, msg: impl Into<String>) -> Self {
        self.config.commit_message = msg.into();
        self
    }

    pub fn author(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.config.author_name = name.into();
        self.config.author_email = email.into();
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn clone_wiki(mut self, v: bool) -> Self {
        self.config.clone = v;
        self
    }

    pub fn commit(mut self, v: bool) -> Self {
        self.config.commit = v;
        self
    }

    pub fn push(mut self, v: bool) -> Self {
        self.config.push = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PublishConfig, WikiPublishError> {
        let c = &self.config;
        if c.docs_folder.as_os_str().is_empty() {
            return Err(WikiPublishError::InvalidConfig(
                "docs folder must not be empty".into(),
            ));
        }
        if c.wiki_dir.as_os_str().is_empty() {
            return Err(WikiPublishError::InvalidConfig(
                "wiki directory must not be empty".into(),
            ));
        }
        if let Some(ref repo) = c.repository {
            let parts: Vec<&str> = repo.trim_matches('/').split('/').collect();
            if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
                return Err(WikiPublishError::InvalidConfig(format!(
                    "repository must look like 'owner/repo', got '{repo}'"
                )));
            }
        }
        if c.clone && c.wiki_url.is_none() && c.repository.is_none() && !c.wiki_dir.join(".git").exists() {
            return Err(WikiPublishError::InvalidConfig(
                "a repository (owner/repo) or wiki URL is required to clone the wiki".into(),
            ));
        }
        if c.commit && !c.clone && !c.wiki_dir.join(".git").exists() {
            return Err(WikiPublishError::InvalidConfig(format!(
                "commit requires a wiki checkout or clone; '{}' is not a git checkout",
                c.wiki_dir.display()
            )));
        }
        if c.push && !c.commit {
            return Err(WikiPublishError::InvalidConfig(
                "push requires commit to be enabled".into(),
            ));
        }
        if c.commit && c.commit_message.trim().is_empty() {
            return Err(WikiPublishError::InvalidConfig(
                "commit message must not be empty".into(),
            ));
        }
        if c.concurrency == 0 {
            return Err(WikiPublishError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_action() {
        let c = PublishConfig::default();
        assert_eq!(c.wiki_dir, PathBuf::from("wiki-repo"));
        assert_eq!(c.commit_message, "Update wiki content");
        assert_eq!(c.author_name, "GitHub Action");
        assert_eq!(c.author_email, "action@github.com");
        assert_eq!(c.image_extensions, vec!["png", "jpg", "jpeg", "gif", "svg"]);
        assert_eq!(c.link_mode, LinkMode::Join);
        assert!(c.clone && c.commit && c.push);
    }

    #[test]
    fn builder_requires_remote_for_clone() {
        let err = PublishConfig::builder()
            .wiki_dir("/nonexistent/wiki-checkout")
            .build()
            .unwrap_err();
        assert!(matches!(err, WikiPublishError::InvalidConfig(_)));
    }

    #[test]
    fn builder_local_only() {
        let c = PublishConfig::builder()
            .docs_folder("documentation")
            .clone_wiki(false)
            .commit(false)
            .push(false)
            .build()
            .unwrap();
        assert_eq!(c.docs_folder, PathBuf::from("documentation"));
        assert!(c.remote().is_none());
    }

    #[test]
    fn builder_rejects_bad_repository() {
        for bad in ["project", "a/b/c", "/b", "a/"] {
            let err = PublishConfig::builder().repository(bad).build();
            assert!(err.is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn builder_rejects_push_without_commit() {
        let err = PublishConfig::builder()
            .repository("a/b")
            .commit(false)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("push requires commit"));
    }

    #[test]
    fn builder_rejects_commit_without_checkout() {
        let tmp = tempfile::TempDir::new().unwrap();
        let wiki = tmp.path().join("wiki-out");
        let err = PublishConfig::builder()
            .wiki_dir(&wiki)
            .clone_wiki(false)
            .push(false)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("requires a wiki checkout"), "got: {err}");

        std::fs::create_dir_all(wiki.join(".git")).unwrap();
        let c = PublishConfig::builder()
            .wiki_dir(&wiki)
            .clone_wiki(false)
            .build()
            .unwrap();
        assert!(c.commit && c.push);
    }

    #[test]
    fn builder_rejects_zero_concurrency() {
        let err = PublishConfig::builder()
            .clone_wiki(false)
            .commit(false)
            .push(false)
            .concurrency(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("concurrency must be at least 1"));
    }

    #[test]
    fn remote_derivation() {
        let c = PublishConfig::builder()
            .repository("octo/project")
            .server_url("https://ghe.example.org/")
            .token("tok")
            .build()
            .unwrap();
        let remote = c.remote().unwrap();
        assert_eq!(remote.display_url(), "https://ghe.example.org/octo/project.wiki.git");

        let c = PublishConfig::builder()
            .repository("octo/project")
            .wiki_url("/srv/wiki.git")
            .build()
            .unwrap();
        assert_eq!(c.remote().unwrap().display_url(), "/srv/wiki.git");
    }

    #[test]
    fn image_extensions_normalised() {
        let c = PublishConfig::builder()
            .image_extensions([".PNG", "webp"])
            .clone_wiki(false)
            .commit(false)
            .push(false)
            .build()
            .unwrap();
        assert_eq!(c.image_extensions, vec!["png", "webp"]);
    }

    #[test]
    fn debug_redacts_token() {
        let c = PublishConfig::builder()
            .repository("a/b")
            .token("ghp_supersecret")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("ghp_supersecret"));
        assert!(dbg.contains("***"));
    }
}
