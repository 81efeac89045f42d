//! GitHub HTTP client wrapper (REST v3).
//!
//! Endpoints used:
//!   * GET  /repos/{owner}/{repo}
//!   * GET  /repos/{owner}/{repo}/git/ref/heads/{branch}
//!   * POST /repos/{owner}/{repo}/git/refs
//!   * GET  /repos/{owner}/{repo}/contents/{path}?ref={branch}
//!   * PUT  /repos/{owner}/{repo}/contents/{path}
//!   * POST /repos/{owner}/{repo}/pulls

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{GitPublishError, GitPublishResult};

/// Per-request timeout, separate from retry/backoff timing.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String,
    token: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Constructs a client for `repository` in `owner/repo` form.
    pub fn new(token: impl Into<String>, repository: &str) -> GitPublishResult<Self> {
        let (owner, repo) = split_owner_repo(repository)?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("issue-pilot")
            .build()?;
        Ok(Self {
            http,
            base_api: "https://api.github.com".to_string(),
            token: token.into(),
            owner,
            repo,
        })
    }

    /// Overrides the API base, e.g. for GitHub Enterprise.
    pub fn with_base_api(mut self, base_api: impl Into<String>) -> Self {
        self.base_api = base_api.into();
        self
    }

    fn repo_url(&self, tail: &str) -> String {
        format!("{}/repos/{}/{}{}", self.base_api, self.owner, self.repo, tail)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
    }

    /// Resolves the default branch name and its head commit SHA.
    pub async fn default_branch(&self) -> GitPublishResult<(String, String)> {
        let url = self.repo_url("");
        debug!("GET {}", url);
        let repo: RepoInfo = decode(self.authed(self.http.get(&url)).send().await?, &url).await?;

        let ref_url = self.repo_url(&format!("/git/ref/heads/{}", repo.default_branch));
        debug!("GET {}", ref_url);
        let git_ref: GitRef =
            decode(self.authed(self.http.get(&ref_url)).send().await?, &ref_url).await?;

        Ok((repo.default_branch, git_ref.object.sha))
    }

    /// Creates a new branch ref pointing at `sha`.
    ///
    /// An already-existing ref (HTTP 422) is a distinct fatal error; the
    /// publisher never reuses branches.
    pub async fn create_branch(&self, branch: &str, sha: &str) -> GitPublishResult<()> {
        let url = self.repo_url("/git/refs");
        debug!("POST {} (refs/heads/{})", url, branch);

        let body = CreateRefRequest {
            r#ref: format!("refs/heads/{branch}"),
            sha,
        };
        let resp = self
            .authed(self.http.post(&url))
            .json(&body)
            .send()
            .await?;

        if resp.status() == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(GitPublishError::BranchExists(branch.to_string()));
        }
        expect_success(resp, &url).await?;
        Ok(())
    }

    /// Reads the blob SHA of `path` at `git_ref`.
    ///
    /// Returns `Ok(None)` when the file does not exist yet (404); any other
    /// failure surfaces as an error.
    pub async fn file_sha(&self, path: &str, git_ref: &str) -> GitPublishResult<Option<String>> {
        let url = self.repo_url(&format!("/contents/{path}"));
        debug!("GET {} (ref={})", url, git_ref);

        let resp = self
            .authed(self.http.get(&url))
            .query(&[("ref", git_ref)])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        blob_lookup_outcome(status, &url, &body)
    }

    /// Creates or updates `path` on `branch` via the contents API.
    ///
    /// `prior_sha` must carry the current blob SHA when updating an existing
    /// file and `None` when creating a new one.
    pub async fn put_file(
        &self,
        path: &str,
        content: &str,
        prior_sha: Option<&str>,
        branch: &str,
        message: &str,
    ) -> GitPublishResult<()> {
        let url = self.repo_url(&format!("/contents/{path}"));
        debug!("PUT {} (branch={})", url, branch);

        let body = PutContentsRequest {
            message,
            content: BASE64.encode(content.as_bytes()),
            branch,
            sha: prior_sha,
        };
        let resp = self
            .authed(self.http.put(&url))
            .json(&body)
            .send()
            .await?;
        expect_success(resp, &url).await?;
        Ok(())
    }

    /// Opens a pull request and returns its HTML URL.
    pub async fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> GitPublishResult<String> {
        let url = self.repo_url("/pulls");
        debug!("POST {} ({} -> {})", url, head, base);

        let payload = CreatePullRequest {
            title,
            head,
            base,
            body,
        };
        let pr: PullRequestInfo = decode(
            self.authed(self.http.post(&url)).json(&payload).send().await?,
            &url,
        )
        .await?;
        Ok(pr.html_url)
    }
}

/// Maps a non-success status into [`GitPublishError::HttpStatus`].
async fn expect_success(resp: Response, url: &str) -> GitPublishResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let snippet = text.chars().take(240).collect::<String>();
    Err(GitPublishError::HttpStatus {
        status,
        url: url.to_string(),
        snippet,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(resp: Response, url: &str) -> GitPublishResult<T> {
    let resp = expect_success(resp, url).await?;
    Ok(resp.json().await?)
}

/// Maps a contents-lookup response into an optional blob SHA.
///
/// 404 means "file does not exist yet" and is not an error; any other
/// non-success status surfaces as-is.
fn blob_lookup_outcome(
    status: StatusCode,
    url: &str,
    body: &str,
) -> GitPublishResult<Option<String>> {
    if status == StatusCode::NOT_FOUND {
        debug!("blob lookup at {} returned 404, treating as absent", url);
        return Ok(None);
    }
    if !status.is_success() {
        return Err(GitPublishError::HttpStatus {
            status,
            url: url.to_string(),
            snippet: body.chars().take(240).collect(),
        });
    }
    let content: ContentInfo = serde_json::from_str(body)
        .map_err(|e| GitPublishError::Decode(format!("unexpected contents payload: {e}")))?;
    Ok(Some(content.sha))
}

/// Splits "owner/repo" into components or returns a validation error.
pub(crate) fn split_owner_repo(repository: &str) -> GitPublishResult<(String, String)> {
    let mut parts = repository.split('/');
    let owner = parts.next().unwrap_or("").trim();
    let repo = parts.next().unwrap_or("").trim();

    if owner.is_empty() || repo.is_empty() || parts.next().is_some() {
        return Err(GitPublishError::Validation(format!(
            "invalid repository id '{repository}', expected 'owner/repo'"
        )));
    }

    Ok((owner.to_string(), repo.to_string()))
}

/// Repository metadata (subset).
#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    object: GitRefObject,
}

#[derive(Debug, Deserialize)]
struct GitRefObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ContentInfo {
    sha: String,
}

#[derive(Debug, Serialize)]
struct CreateRefRequest<'a> {
    r#ref: String,
    sha: &'a str,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CreatePullRequest<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct PullRequestInfo {
    html_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_repo_splits_cleanly() {
        let (owner, repo) = split_owner_repo("acme/translator").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "translator");
    }

    #[test]
    fn malformed_repository_ids_are_rejected() {
        for bad in ["acme", "acme/", "/repo", "a/b/c", ""] {
            assert!(matches!(
                split_owner_repo(bad),
                Err(GitPublishError::Validation(_))
            ));
        }
    }

    #[test]
    fn base_api_override_changes_request_urls() {
        let client = GitHubClient::new("t", "acme/translator")
            .unwrap()
            .with_base_api("https://ghe.example/api/v3");
        assert_eq!(
            client.repo_url("/pulls"),
            "https://ghe.example/api/v3/repos/acme/translator/pulls"
        );
    }

    #[test]
    fn contents_payload_is_base64_encoded() {
        let body = PutContentsRequest {
            message: "fix: update",
            content: BASE64.encode("hello".as_bytes()),
            branch: "issue-7",
            sha: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["content"], "aGVsbG8=");
        // `sha` is omitted when creating a new file.
        assert!(json.get("sha").is_none());
    }

    #[test]
    fn blob_lookup_treats_404_as_absent() {
        let out = blob_lookup_outcome(StatusCode::NOT_FOUND, "u", "Not Found").unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn blob_lookup_returns_the_sha_on_success() {
        let out = blob_lookup_outcome(StatusCode::OK, "u", r#"{"sha":"abc123"}"#).unwrap();
        assert_eq!(out.as_deref(), Some("abc123"));
    }

    #[test]
    fn blob_lookup_surfaces_other_failures() {
        let err = blob_lookup_outcome(StatusCode::INTERNAL_SERVER_ERROR, "u", "boom").unwrap_err();
        assert!(matches!(err, GitPublishError::HttpStatus { .. }));
    }

    #[test]
    fn update_payload_carries_the_prior_sha() {
        let body = PutContentsRequest {
            message: "fix: update",
            content: BASE64.encode("x".as_bytes()),
            branch: "issue-7",
            sha: Some("abc123"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["sha"], "abc123");
    }
}
