//! The branch → commit → PR publishing state machine.

use services::{RetryPolicy, with_retry};
use tracing::{info, warn};

use crate::client::GitHubClient;
use crate::errors::GitPublishResult;

/// A drafted change for one file, consumed immediately by [`publish`].
#[derive(Debug, Clone)]
pub struct Patch {
    /// Repo-relative path of the file to create or update.
    pub target_file: String,
    /// Full new content of that file.
    pub new_content: String,
}

/// Branch naming scheme: one branch per issue, never reused.
pub fn branch_name(issue_number: u64) -> String {
    format!("issue-{issue_number}")
}

/// Publishes `patch` as a pull request referencing `issue_number`.
///
/// Strictly sequential: resolve the base SHA, create the branch, look up the
/// existing blob (404 means "file does not exist yet"), commit, open the PR.
/// Each remote step is retry-wrapped independently; a failure at any step
/// aborts the whole publish. There is deliberately no branch cleanup on a
/// late failure — the orphaned branch is logged and left for inspection.
pub async fn publish(
    client: &GitHubClient,
    issue_number: u64,
    patch: &Patch,
    retry: RetryPolicy,
) -> GitPublishResult<String> {
    let branch = branch_name(issue_number);

    let (base_branch, base_sha) = with_retry(retry, || client.default_branch()).await?;
    info!(base = %base_branch, sha = %base_sha, "resolved default branch");

    with_retry(retry, || client.create_branch(&branch, &base_sha)).await?;
    info!(branch = %branch, "branch created");

    let prior_sha =
        match with_retry(retry, || client.file_sha(&patch.target_file, &base_branch)).await {
            Ok(sha) => sha,
            Err(err) => {
                warn!(branch = %branch, "aborting publish; branch is left orphaned");
                return Err(err);
            }
        };

    let message = format!("Automated patch for issue #{issue_number}");
    if let Err(err) = with_retry(retry, || {
        client.put_file(
            &patch.target_file,
            &patch.new_content,
            prior_sha.as_deref(),
            &branch,
            &message,
        )
    })
    .await
    {
        warn!(branch = %branch, "aborting publish; branch is left orphaned");
        return Err(err);
    }
    info!(file = %patch.target_file, branch = %branch, "patch committed");

    let title = format!("Fix for issue #{issue_number}");
    let body = format!(
        "Automated patch proposal for issue #{issue_number}.\n\nCloses #{issue_number}."
    );
    let url = match with_retry(retry, || {
        client.create_pull_request(&title, &branch, &base_branch, &body)
    })
    .await
    {
        Ok(url) => url,
        Err(err) => {
            warn!(branch = %branch, "aborting publish; branch is left orphaned");
            return Err(err);
        }
    };

    info!(pr = %url, "pull request opened");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_name_embeds_the_issue_number() {
        assert_eq!(branch_name(42), "issue-42");
        assert_eq!(branch_name(0), "issue-0");
    }
}
