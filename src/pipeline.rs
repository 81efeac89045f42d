//! The two pipelines: offline indexing and per-issue analysis.

use std::path::Path;

use anyhow::Context;
use embedding_adapter::HttpEmbedder;
use git_publisher::{GitHubClient, Patch, publish};
use tracing::info;
use vector_index::{ChunkHit, VectorStore, index_tree, query_relevant};

use crate::config::{AppConfig, IssueContext};

/// Populates the vector store from the source tree at `root`.
pub async fn run_index(cfg: &AppConfig, root: &Path) -> anyhow::Result<()> {
    let provider = HttpEmbedder::new(cfg.embed.clone())?;
    let store = VectorStore::new(&cfg.index)?;

    let summary = index_tree(&cfg.index, &store, &provider, cfg.retry, root)
        .await
        .context("indexing run failed")?;

    info!(
        files = summary.files_seen,
        chunks = summary.chunks_upserted,
        failures = summary.failures,
        "indexing complete"
    );
    Ok(())
}

/// Embeds the issue, retrieves related chunks, drafts a patch and opens a PR.
pub async fn run_analyze(cfg: &AppConfig, issue: &IssueContext, top_k: u64) -> anyhow::Result<()> {
    let provider = HttpEmbedder::new(cfg.embed.clone())?;
    let store = VectorStore::new(&cfg.index)?;

    info!(issue = issue.issue_number, "analyzing issue");
    let hits = query_relevant(&store, &provider, &issue.issue_body, top_k, cfg.retry)
        .await
        .context("similarity query failed")?;

    for hit in &hits {
        info!(
            "match: {} | chunk {} | score {:.2}",
            hit.file, hit.chunk_id, hit.score
        );
    }

    let patch = draft_patch(issue, &hits);
    let mut client = GitHubClient::new(&issue.github_token, &issue.repository)?;
    if let Some(base) = &issue.api_base {
        client = client.with_base_api(base);
    }
    let pr_url = publish(&client, issue.issue_number, &patch, cfg.retry)
        .await
        .context("publishing failed")?;

    info!(pr = %pr_url, "analysis complete");
    Ok(())
}

/// Drafts the patch to publish for an issue.
///
/// Patch synthesis is a placeholder: until a real generator lands, the patch
/// is a triage report committed under `docs/triage/`, listing the retrieved
/// chunks so a maintainer starts from the most relevant code.
pub fn draft_patch(issue: &IssueContext, hits: &[ChunkHit]) -> Patch {
    let mut content = String::new();
    content.push_str(&format!("# Triage notes for issue #{}\n\n", issue.issue_number));
    content.push_str("## Reported issue\n\n");
    content.push_str(&issue.issue_body);
    content.push_str("\n\n## Most relevant code\n\n");
    content.push_str("| file | chunk | score |\n|---|---|---|\n");
    for hit in hits {
        content.push_str(&format!(
            "| `{}` | {} | {:.4} |\n",
            hit.file, hit.chunk_id, hit.score
        ));
    }

    Patch {
        target_file: format!("docs/triage/issue-{}.md", issue.issue_number),
        new_content: content,
    }
}
